//! Test helpers shared across Recollect crates.

pub mod llm;
pub mod memory;

pub use llm::{FailingCompletion, FixedCompletion, RecordingCompletion};
pub use memory::{AddCall, FailingStore, RecordingStore, SearchCall};
