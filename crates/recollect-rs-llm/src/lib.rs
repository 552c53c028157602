//! Completion service interface and HTTP backends for Recollect.

pub mod completion;
pub mod error;
pub mod openai;

/// Prompt-to-text completion interface.
pub use completion::CompletionService;
/// Completion error type.
pub use error::CompletionError;
/// OpenAI-compatible chat completions backend.
pub use openai::{OpenAiCompletion, OpenAiCompletionOptions};
