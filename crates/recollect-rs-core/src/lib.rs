//! Core memory-augmented response pipeline for Recollect.
//!
//! A request flows through three fixed stages: retrieve scoped memory,
//! generate a response with that memory in the prompt, and store the new
//! exchange back under the same scope. The scope is resolved once per request
//! so reads and writes always target the same partition.

pub mod context;
pub mod error;
pub mod pipeline;
pub mod prompt;
pub mod scope;
pub mod state;

pub use context::{ContextAssembler, NO_CONTEXT_SENTINEL};
pub use error::{PipelineError, PipelineErrorKind, PipelineStage};
pub use pipeline::{Pipeline, PipelineOptions};
pub use prompt::PromptBuilder;
pub use scope::{Mode, ScopeResolver};
pub use state::{ModeState, PipelineRequest, PipelineResponse, PipelineState};
