//! Completion service abstraction consumed by the pipeline.

use crate::error::CompletionError;
use async_trait::async_trait;

#[async_trait]
/// Turns a prompt into model text.
///
/// Implementations may suspend on network I/O. No retries are expected here;
/// a failed call is reported to the caller as-is.
pub trait CompletionService: Send + Sync {
    /// Complete a single prompt.
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}
