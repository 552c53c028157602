use async_trait::async_trait;
use chrono::{Duration, Utc};
use parking_lot::Mutex;
use recollect_rs_memory::{Exchange, MemoryError, MemoryItem, MemoryStore, Metadata, ScopeKey};
use std::collections::HashMap;
use uuid::Uuid;

/// Arguments of one `search` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCall {
    pub query: String,
    pub scope: ScopeKey,
    pub limit: usize,
}

/// Arguments of one `add` call.
#[derive(Debug, Clone, PartialEq)]
pub struct AddCall {
    pub exchange: Exchange,
    pub scope: ScopeKey,
    pub metadata: Metadata,
}

/// In-memory store that keeps partitions apart and records every call.
///
/// Search returns the newest items of the partition first, without any
/// relevance ranking.
#[derive(Default)]
pub struct RecordingStore {
    partitions: Mutex<HashMap<ScopeKey, Vec<MemoryItem>>>,
    searches: Mutex<Vec<SearchCall>>,
    adds: Mutex<Vec<AddCall>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<MemoryItem>) -> Self {
        let store = Self::new();
        {
            let mut partitions = store.partitions.lock();
            for item in items {
                partitions.entry(item.scope.clone()).or_default().push(item);
            }
        }
        store
    }

    /// Insert an item directly, bypassing call recording.
    ///
    /// Seeded items are stamped so that later seeds are newer.
    pub fn seed(&self, scope: &ScopeKey, content: impl Into<String>) -> MemoryItem {
        let mut partitions = self.partitions.lock();
        let partition = partitions.entry(scope.clone()).or_default();
        let item = MemoryItem {
            id: Uuid::new_v4(),
            scope: scope.clone(),
            content: content.into(),
            metadata: Metadata::new(),
            created_at: Utc::now() + Duration::milliseconds(partition.len() as i64),
        };
        partition.push(item.clone());
        item
    }

    pub fn items(&self, scope: &ScopeKey) -> Vec<MemoryItem> {
        self.partitions
            .lock()
            .get(scope)
            .cloned()
            .unwrap_or_default()
    }

    pub fn search_calls(&self) -> Vec<SearchCall> {
        self.searches.lock().clone()
    }

    pub fn add_calls(&self) -> Vec<AddCall> {
        self.adds.lock().clone()
    }
}

#[async_trait]
impl MemoryStore for RecordingStore {
    async fn search(
        &self,
        query: &str,
        scope: &ScopeKey,
        limit: usize,
    ) -> Result<Vec<MemoryItem>, MemoryError> {
        self.searches.lock().push(SearchCall {
            query: query.to_string(),
            scope: scope.clone(),
            limit,
        });
        let mut items = self.items(scope);
        items.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        items.truncate(limit);
        Ok(items)
    }

    async fn add(
        &self,
        exchange: &Exchange,
        scope: &ScopeKey,
        metadata: Metadata,
    ) -> Result<MemoryItem, MemoryError> {
        self.adds.lock().push(AddCall {
            exchange: exchange.clone(),
            scope: scope.clone(),
            metadata: metadata.clone(),
        });
        let item = MemoryItem {
            id: Uuid::new_v4(),
            scope: scope.clone(),
            content: exchange.to_content(),
            metadata,
            created_at: Utc::now(),
        };
        self.partitions
            .lock()
            .entry(scope.clone())
            .or_default()
            .push(item.clone());
        Ok(item)
    }
}

/// Store whose operations fail with [`MemoryError::Unavailable`].
#[derive(Default)]
pub struct FailingStore {
    fail_search: bool,
    searches: Mutex<usize>,
    adds: Mutex<usize>,
}

impl FailingStore {
    /// Fails both search and add.
    pub fn new() -> Self {
        Self {
            fail_search: true,
            ..Self::default()
        }
    }

    /// Searches succeed with no items; only add fails.
    pub fn failing_add() -> Self {
        Self::default()
    }

    pub fn search_count(&self) -> usize {
        *self.searches.lock()
    }

    pub fn add_count(&self) -> usize {
        *self.adds.lock()
    }
}

#[async_trait]
impl MemoryStore for FailingStore {
    async fn search(
        &self,
        _query: &str,
        _scope: &ScopeKey,
        _limit: usize,
    ) -> Result<Vec<MemoryItem>, MemoryError> {
        *self.searches.lock() += 1;
        if self.fail_search {
            return Err(MemoryError::Unavailable("store offline".to_string()));
        }
        Ok(Vec::new())
    }

    async fn add(
        &self,
        _exchange: &Exchange,
        _scope: &ScopeKey,
        _metadata: Metadata,
    ) -> Result<MemoryItem, MemoryError> {
        *self.adds.lock() += 1;
        Err(MemoryError::Unavailable("store offline".to_string()))
    }
}
