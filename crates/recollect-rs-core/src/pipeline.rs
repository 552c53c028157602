//! Retrieve, generate, store: the pipeline controller.

use crate::context::ContextAssembler;
use crate::error::{PipelineError, PipelineStage};
use crate::prompt::PromptBuilder;
use crate::scope::ScopeResolver;
use crate::state::{PipelineRequest, PipelineResponse, PipelineState};
use log::{debug, info, warn};
use recollect_rs_config::PipelineConfig;
use recollect_rs_llm::CompletionService;
use recollect_rs_memory::{Exchange, MemoryItem, MemoryStore, Metadata, ScopeKey};
use serde_json::Value;
use std::sync::Arc;

/// Tunables for a [`Pipeline`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Maximum number of memory items retrieved per request.
    pub recall_limit: usize,
    /// Collective identifier for semantic requests.
    pub semantic_scope: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from(&PipelineConfig::default())
    }
}

impl From<&PipelineConfig> for PipelineOptions {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            recall_limit: config.recall_limit,
            semantic_scope: config.semantic_scope.clone(),
        }
    }
}

/// Memory-augmented response pipeline.
///
/// Each call to [`Pipeline::handle`] is independent; the only state shared
/// between requests lives in the memory store. Dropping the returned future
/// abandons whichever stage is in flight.
pub struct Pipeline {
    store: Arc<dyn MemoryStore>,
    completion: Arc<dyn CompletionService>,
    resolver: ScopeResolver,
    assembler: ContextAssembler,
    prompt_builder: PromptBuilder,
    recall_limit: usize,
}

impl Pipeline {
    pub fn new(
        store: Arc<dyn MemoryStore>,
        completion: Arc<dyn CompletionService>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            store,
            completion,
            resolver: ScopeResolver::new(options.semantic_scope),
            assembler: ContextAssembler,
            prompt_builder: PromptBuilder::new(),
            recall_limit: options.recall_limit,
        }
    }

    pub fn from_config(
        config: &PipelineConfig,
        store: Arc<dyn MemoryStore>,
        completion: Arc<dyn CompletionService>,
    ) -> Self {
        Self::new(store, completion, PipelineOptions::from(config))
    }

    /// Replace the prompt builder, e.g. to add an agent preamble.
    pub fn with_prompt_builder(mut self, prompt_builder: PromptBuilder) -> Self {
        self.prompt_builder = prompt_builder;
        self
    }

    pub fn resolver(&self) -> &ScopeResolver {
        &self.resolver
    }

    pub fn recall_limit(&self) -> usize {
        self.recall_limit
    }

    /// Answer one request.
    ///
    /// On success exactly one new exchange has been added under the request
    /// scope. A store failure after generation is still reported as an error
    /// even though a response was produced.
    pub async fn handle(
        &self,
        request: PipelineRequest,
    ) -> Result<PipelineResponse, PipelineError> {
        request.validate()?;
        let scope = self.resolver.resolve(request.mode, &request.requester_id);
        info!(
            "handling request (mode={}, scope={}, query_len={})",
            request.mode,
            scope,
            request.query.len()
        );
        let mut state = PipelineState::new(request, scope);

        let history = self.retrieve(state.scope(), &state.query, self.recall_limit).await?;
        state.set_history(history);

        state.response = self.generate(&state).await?;

        let stored = self.store_exchange(&state).await?;
        debug!(
            "exchange stored (scope={}, memory_id={})",
            state.scope(),
            stored.id
        );

        let response = state.into_response();
        info!(
            "request complete (history_count={}, response_len={})",
            response.history_count,
            response.response.len()
        );
        Ok(response)
    }

    /// Run only the retrieve stage for a request.
    ///
    /// Nothing is generated or stored. A `limit` of `None` uses the
    /// configured recall limit.
    pub async fn recall(
        &self,
        request: &PipelineRequest,
        limit: Option<usize>,
    ) -> Result<Vec<MemoryItem>, PipelineError> {
        request.validate()?;
        let scope = self.resolver.resolve(request.mode, &request.requester_id);
        self.retrieve(&scope, &request.query, limit.unwrap_or(self.recall_limit))
            .await
    }

    async fn retrieve(
        &self,
        scope: &ScopeKey,
        query: &str,
        limit: usize,
    ) -> Result<Vec<MemoryItem>, PipelineError> {
        let items = self
            .store
            .search(query, scope, limit)
            .await
            .map_err(|err| {
                warn!("memory search failed (scope={}, error={})", scope, err);
                PipelineError::store(PipelineStage::Retrieve, err)
            })?;
        debug!("retrieved memory (scope={}, count={})", scope, items.len());
        Ok(items)
    }

    async fn generate(&self, state: &PipelineState) -> Result<String, PipelineError> {
        let context = self.assembler.assemble(&state.history);
        let prompt = self.prompt_builder.build(state, &context);
        debug!(
            "calling completion service (prompt_len={}, has_context={})",
            prompt.len(),
            !ContextAssembler::is_sentinel(&context)
        );
        let response = self.completion.complete(&prompt).await.map_err(|err| {
            warn!("completion failed (error={})", err);
            PipelineError::from(err)
        })?;
        Ok(response.trim().to_string())
    }

    async fn store_exchange(&self, state: &PipelineState) -> Result<MemoryItem, PipelineError> {
        let exchange = Exchange::new(state.query.clone(), state.response.clone());
        let mut metadata = Metadata::new();
        metadata.insert(
            "scope".to_string(),
            Value::String(state.mode.mode().as_str().to_string()),
        );
        self.store
            .add(&exchange, state.scope(), metadata)
            .await
            .map_err(|err| {
                warn!("memory add failed (scope={}, error={})", state.scope(), err);
                PipelineError::store(PipelineStage::Store, err)
            })
    }
}
