//! Scoped memory storage for Recollect.
//!
//! Memory is partitioned by [`ScopeKey`]: an individual partition holds one
//! requester's private history, a collective partition holds knowledge shared
//! by every requester of an agent. Stores never return items across
//! partitions.

pub mod error;
pub mod model;
pub mod policy;
mod rank;
pub mod store;

/// Memory error type.
pub use error::MemoryError;
/// Memory data model.
pub use model::{Exchange, MemoryItem, Metadata, ScopeKey, ScopeKind};
/// Capture policy applied before persisting.
pub use policy::MemoryCapturePolicy;
/// Memory store interface and default file implementation.
pub use store::{FileMemoryStore, MemoryStore};
