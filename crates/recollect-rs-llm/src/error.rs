//! Error types for completion calls.

/// Errors returned by completion services.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// Transport, quota, or protocol failure reaching the model backend.
    #[error("model unavailable: {0}")]
    Unavailable(String),
    /// Client construction failed.
    #[error("invalid completion client: {0}")]
    InvalidClient(String),
}
