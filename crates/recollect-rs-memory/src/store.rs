//! Memory store interface and the JSONL file-backed implementation.

use crate::error::MemoryError;
use crate::model::{Exchange, MemoryItem, Metadata, ScopeKey};
use crate::policy::MemoryCapturePolicy;
use crate::rank::rank;
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[async_trait]
/// Memory store client used by the pipeline.
///
/// Implementations must keep partitions disjoint: a search under one
/// [`ScopeKey`] never returns items added under another.
pub trait MemoryStore: Send + Sync {
    /// Return up to `limit` items of the partition, most relevant first.
    async fn search(
        &self,
        query: &str,
        scope: &ScopeKey,
        limit: usize,
    ) -> Result<Vec<MemoryItem>, MemoryError>;

    /// Append an exchange to the partition and return the stored item.
    ///
    /// Repeated adds are accepted and accumulate.
    async fn add(
        &self,
        exchange: &Exchange,
        scope: &ScopeKey,
        metadata: Metadata,
    ) -> Result<MemoryItem, MemoryError>;
}

/// File-backed store keeping one JSONL file per partition.
#[derive(Debug)]
pub struct FileMemoryStore {
    /// Root directory for partition files.
    root: PathBuf,
    /// Policy applied to content before it is written.
    capture_policy: MemoryCapturePolicy,
    /// Serializes appends across concurrent requests.
    write_lock: Mutex<()>,
}

impl FileMemoryStore {
    /// Create a new file-backed store under the given root.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, MemoryError> {
        Self::with_policy(root, MemoryCapturePolicy::default())
    }

    /// Create a store that applies the given capture policy on add.
    pub fn with_policy(
        root: impl AsRef<Path>,
        capture_policy: MemoryCapturePolicy,
    ) -> Result<Self, MemoryError> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        info!("initialized file memory store (root={})", root.display());
        Ok(Self {
            root,
            capture_policy,
            write_lock: Mutex::new(()),
        })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the partition JSONL file.
    fn partition_path(&self, scope: &ScopeKey) -> Result<PathBuf, MemoryError> {
        if scope.id().trim().is_empty() {
            return Err(MemoryError::InvalidScope(format!(
                "empty {} identifier",
                scope.kind()
            )));
        }
        Ok(self
            .root
            .join(scope.kind().as_str())
            .join(format!("{}.jsonl", file_stem(scope.id()))))
    }

    /// Load all items of a partition in insertion order.
    fn load_items(&self, scope: &ScopeKey) -> Result<Vec<MemoryItem>, MemoryError> {
        let path = self.partition_path(scope)?;
        if !path.exists() {
            return Ok(Vec::new());
        }
        let file = OpenOptions::new().read(true).open(path)?;
        let reader = BufReader::new(file);
        let mut items = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let item: MemoryItem = serde_json::from_str(&line)?;
            if item.scope == *scope {
                items.push(item);
            }
        }
        Ok(items)
    }
}

#[async_trait]
impl MemoryStore for FileMemoryStore {
    async fn search(
        &self,
        query: &str,
        scope: &ScopeKey,
        limit: usize,
    ) -> Result<Vec<MemoryItem>, MemoryError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let items = self.load_items(scope)?;
        let available = items.len();
        let ranked = rank(query, items, limit);
        debug!(
            "memory search (scope={}, available={}, returned={})",
            scope,
            available,
            ranked.len()
        );
        Ok(ranked)
    }

    async fn add(
        &self,
        exchange: &Exchange,
        scope: &ScopeKey,
        metadata: Metadata,
    ) -> Result<MemoryItem, MemoryError> {
        let path = self.partition_path(scope)?;
        let content = self.capture_policy.apply(&exchange.to_content())?;
        let query = self.capture_policy.apply(&exchange.query)?;
        let response = self.capture_policy.apply(&exchange.response)?;
        let mut metadata = metadata;
        metadata.insert("query".to_string(), query.into());
        metadata.insert("response".to_string(), response.into());
        let item = MemoryItem {
            id: Uuid::new_v4(),
            scope: scope.clone(),
            content,
            metadata,
            created_at: Utc::now(),
        };
        let line = serde_json::to_string(&item)?;
        {
            let _guard = self.write_lock.lock();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
            writeln!(file, "{line}")?;
        }
        debug!(
            "stored memory item (scope={}, id={}, content_len={})",
            scope,
            item.id,
            item.content.len()
        );
        Ok(item)
    }
}

/// Longest escaped identifier used verbatim as a file stem.
const MAX_STEM_LEN: usize = 96;

/// Namespace for name-based digests of long identifiers.
const STEM_NAMESPACE: Uuid = Uuid::from_u128(0x5f3c_2a9e_8d41_4b7a_9c06_e1d2_7a48_b3f5);

/// File stem for a scope id.
///
/// Distinct ids map to stems that stay distinct under case folding, and
/// stems never exceed [`MAX_STEM_LEN`] bytes. Long ids keep an escaped
/// prefix followed by `~` and a v5 digest of the full id.
fn file_stem(id: &str) -> String {
    let escaped = escape_id(id);
    if escaped.len() <= MAX_STEM_LEN {
        return escaped;
    }
    let digest = Uuid::new_v5(&STEM_NAMESPACE, id.as_bytes()).simple().to_string();
    let prefix_len = MAX_STEM_LEN - digest.len() - 1;
    format!("{}~{digest}", &escaped[..prefix_len])
}

/// Escape an identifier so it stays inside its directory.
///
/// Only lower-case ASCII letters, digits, `-` and `_` are kept; everything
/// else, upper-case letters included, becomes `%XX` with upper-case hex.
fn escape_id(id: &str) -> String {
    let mut escaped = String::with_capacity(id.len());
    for byte in id.bytes() {
        if byte.is_ascii_lowercase() || byte.is_ascii_digit() || byte == b'-' || byte == b'_' {
            escaped.push(char::from(byte));
        } else {
            escaped.push_str(&format!("%{byte:02X}"));
        }
    }
    escaped
}
