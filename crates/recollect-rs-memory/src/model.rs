//! Memory data model shared by stores and the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Free-form metadata attached to a stored memory item.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Partition identifier passed to the store for both read and write.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ScopeKey {
    /// Private partition of one requester.
    Individual(String),
    /// Partition shared by every requester of an agent or domain.
    Collective(String),
}

impl ScopeKey {
    /// Partition variant without the identifier.
    pub fn kind(&self) -> ScopeKind {
        match self {
            Self::Individual(_) => ScopeKind::Individual,
            Self::Collective(_) => ScopeKind::Collective,
        }
    }

    /// Identifier inside the partition variant.
    pub fn id(&self) -> &str {
        match self {
            Self::Individual(id) | Self::Collective(id) => id,
        }
    }
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id())
    }
}

/// Variant of a [`ScopeKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    Individual,
    Collective,
}

impl ScopeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Collective => "collective",
        }
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stored recollection. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryItem {
    /// Item identifier.
    pub id: Uuid,
    /// Partition the item was stored under.
    pub scope: ScopeKey,
    /// Free-text content.
    pub content: String,
    /// Additional metadata, e.g. `{"scope": "episodic"}`.
    #[serde(default)]
    pub metadata: Metadata,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Query/response pair appended to memory after generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub query: String,
    pub response: String,
}

impl Exchange {
    pub fn new(query: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            response: response.into(),
        }
    }

    /// Single-line rendering used as the stored content.
    pub fn to_content(&self) -> String {
        format!(
            "User: {} | Assistant: {}",
            flatten(&self.query),
            flatten(&self.response)
        )
    }
}

/// Collapse line breaks so a stored exchange occupies one context line.
fn flatten(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
