//! Builds pipeline collaborators from configuration.

use log::{debug, info};
use recollect_rs_config::{MemoryCaptureConfig, MemoryConfig, ModelConfig, RecollectConfig};
use recollect_rs_core::Pipeline;
use recollect_rs_llm::{CompletionError, OpenAiCompletion, OpenAiCompletionOptions};
use recollect_rs_memory::{FileMemoryStore, MemoryCapturePolicy, MemoryError};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Memory root used when `memory.path` is unset, relative to the cwd.
pub const DEFAULT_MEMORY_PATH: &str = ".recollect/memory";

/// Failure while wiring the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("unsupported {kind} provider `{provider}`")]
    UnsupportedProvider {
        kind: &'static str,
        provider: String,
    },
    #[error(transparent)]
    Memory(#[from] MemoryError),
    #[error(transparent)]
    Completion(#[from] CompletionError),
}

pub fn capture_policy_from_config(config: &MemoryCaptureConfig) -> MemoryCapturePolicy {
    MemoryCapturePolicy {
        redact_patterns: config.redact_patterns.clone(),
        detect_secrets: config.detect_secrets,
        secret_entropy_threshold: config.secret_entropy_threshold,
        max_chars: config.max_chars,
        ..MemoryCapturePolicy::default()
    }
}

/// Open the file store configured under `memory`.
pub fn memory_store_from_config(
    config: &MemoryConfig,
    cwd: &Path,
) -> Result<FileMemoryStore, SetupError> {
    if config.provider != "file" {
        return Err(SetupError::UnsupportedProvider {
            kind: "memory",
            provider: config.provider.clone(),
        });
    }
    let root = match config.path.as_deref() {
        Some(path) => PathBuf::from(path),
        None => PathBuf::from(DEFAULT_MEMORY_PATH),
    };
    let root = if root.is_absolute() {
        root
    } else {
        cwd.join(root)
    };
    debug!("opening memory store (root={})", root.display());
    let policy = capture_policy_from_config(&config.capture);
    Ok(FileMemoryStore::with_policy(root, policy)?)
}

/// Build the completion client configured under `model`.
///
/// `api_key` is passed in rather than read here so callers decide where it
/// comes from.
pub fn completion_from_config(
    config: &ModelConfig,
    api_key: Option<String>,
) -> Result<OpenAiCompletion, SetupError> {
    if config.provider != "openai" {
        return Err(SetupError::UnsupportedProvider {
            kind: "model",
            provider: config.provider.clone(),
        });
    }
    let mut options = OpenAiCompletionOptions::new(config.name.clone());
    options.base_url = config.base_url.clone();
    options.api_key = api_key;
    options.temperature = config.temperature;
    options.max_tokens = config.max_tokens;
    Ok(OpenAiCompletion::new(options)?)
}

/// Wire a pipeline over the file store and the OpenAI-compatible client.
pub fn build_pipeline(
    config: &RecollectConfig,
    cwd: &Path,
    api_key: Option<String>,
) -> Result<Pipeline, SetupError> {
    let store = memory_store_from_config(&config.memory, cwd)?;
    let completion = completion_from_config(&config.model, api_key)?;
    info!(
        "pipeline ready (model={}, recall_limit={}, semantic_scope={})",
        completion.model(),
        config.pipeline.recall_limit,
        config.pipeline.semantic_scope
    );
    Ok(Pipeline::from_config(
        &config.pipeline,
        Arc::new(store),
        Arc::new(completion),
    ))
}
