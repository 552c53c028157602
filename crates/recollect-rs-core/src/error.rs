//! Error taxonomy surfaced by the pipeline.

use std::fmt;
use thiserror::Error;

/// Pipeline stage a failure occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Retrieve,
    Store,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Retrieve => "retrieve",
            Self::Store => "store",
        };
        f.write_str(label)
    }
}

/// Tagged failure of a pipeline request.
///
/// No variant is recovered inside the pipeline; the first failing stage
/// aborts the remaining ones.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The request was rejected before any stage ran.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// The memory store failed during search or add.
    #[error("memory store unavailable during {stage}: {message}")]
    StoreUnavailable {
        stage: PipelineStage,
        message: String,
    },
    /// The completion service failed.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),
}

/// Payload-free tag of a [`PipelineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineErrorKind {
    InvalidRequest,
    StoreUnavailable,
    ModelUnavailable,
}

impl PipelineError {
    pub fn kind(&self) -> PipelineErrorKind {
        match self {
            Self::InvalidRequest(_) => PipelineErrorKind::InvalidRequest,
            Self::StoreUnavailable { .. } => PipelineErrorKind::StoreUnavailable,
            Self::ModelUnavailable(_) => PipelineErrorKind::ModelUnavailable,
        }
    }

    pub(crate) fn store(stage: PipelineStage, err: recollect_rs_memory::MemoryError) -> Self {
        Self::StoreUnavailable {
            stage,
            message: err.to_string(),
        }
    }
}

impl From<recollect_rs_llm::CompletionError> for PipelineError {
    fn from(err: recollect_rs_llm::CompletionError) -> Self {
        Self::ModelUnavailable(err.to_string())
    }
}
