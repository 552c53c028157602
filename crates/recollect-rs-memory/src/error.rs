//! Error types for memory operations.

/// Errors returned by memory stores.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// The backing service could not be reached.
    #[error("memory store unavailable: {0}")]
    Unavailable(String),
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Regex compilation error.
    #[error("regex error: {0}")]
    Regex(String),
    /// Scope key cannot address a partition.
    #[error("invalid scope: {0}")]
    InvalidScope(String),
}
