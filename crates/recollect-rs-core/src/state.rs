//! Request, per-request state, and response types.

use crate::error::PipelineError;
use crate::scope::Mode;
use recollect_rs_memory::{MemoryItem, ScopeKey};
use serde::{Deserialize, Serialize};

/// Incoming request to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineRequest {
    pub requester_id: String,
    pub query: String,
    pub mode: Mode,
}

impl PipelineRequest {
    pub fn new(requester_id: impl Into<String>, query: impl Into<String>, mode: Mode) -> Self {
        Self {
            requester_id: requester_id.into(),
            query: query.into(),
            mode,
        }
    }

    pub fn episodic(requester_id: impl Into<String>, query: impl Into<String>) -> Self {
        Self::new(requester_id, query, Mode::Episodic)
    }

    pub fn semantic(requester_id: impl Into<String>, query: impl Into<String>) -> Self {
        Self::new(requester_id, query, Mode::Semantic)
    }

    /// Reject requests no stage can serve.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.query.trim().is_empty() {
            return Err(PipelineError::InvalidRequest("query is empty".to_string()));
        }
        if self.mode == Mode::Episodic && self.requester_id.trim().is_empty() {
            return Err(PipelineError::InvalidRequest(
                "episodic requests require a requester id".to_string(),
            ));
        }
        Ok(())
    }
}

/// Mode-specific part of the pipeline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ModeState {
    Episodic {
        /// True iff retrieval returned at least one item.
        has_prior_history: bool,
    },
    Semantic,
}

impl ModeState {
    fn initial(mode: Mode) -> Self {
        match mode {
            Mode::Episodic => Self::Episodic {
                has_prior_history: false,
            },
            Mode::Semantic => Self::Semantic,
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Self::Episodic { .. } => Mode::Episodic,
            Self::Semantic => Mode::Semantic,
        }
    }

    /// Prior-history flag; `None` outside episodic mode.
    pub fn has_prior_history(&self) -> Option<bool> {
        match self {
            Self::Episodic { has_prior_history } => Some(*has_prior_history),
            Self::Semantic => None,
        }
    }
}

/// Value threaded through the three stages of one request.
///
/// The scope is fixed at construction and reused by both retrieval and
/// storage.
#[derive(Debug, Clone)]
pub struct PipelineState {
    pub requester_id: String,
    pub query: String,
    scope: ScopeKey,
    /// Retrieved items in store relevance order.
    pub history: Vec<MemoryItem>,
    pub response: String,
    pub mode: ModeState,
}

impl PipelineState {
    pub(crate) fn new(request: PipelineRequest, scope: ScopeKey) -> Self {
        Self {
            requester_id: request.requester_id,
            query: request.query,
            scope,
            history: Vec::new(),
            response: String::new(),
            mode: ModeState::initial(request.mode),
        }
    }

    pub fn scope(&self) -> &ScopeKey {
        &self.scope
    }

    /// Bind retrieval results and derive the prior-history flag.
    pub(crate) fn set_history(&mut self, history: Vec<MemoryItem>) {
        if let ModeState::Episodic { has_prior_history } = &mut self.mode {
            *has_prior_history = !history.is_empty();
        }
        self.history = history;
    }

    pub(crate) fn into_response(self) -> PipelineResponse {
        PipelineResponse {
            response: self.response,
            history_count: self.history.len(),
            mode: self.mode,
        }
    }
}

/// Result of a successful request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResponse {
    pub response: String,
    /// Number of memory items retrieved for this request.
    pub history_count: usize,
    pub mode: ModeState,
}

impl PipelineResponse {
    /// Whether the requester had stored history; `None` for semantic requests.
    pub fn had_prior_history(&self) -> Option<bool> {
        self.mode.has_prior_history()
    }
}
