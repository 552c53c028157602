//! Configuration schema for Recollect.

use serde::{Deserialize, Serialize};

/// Root config for the Recollect pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RecollectConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

impl RecollectConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> RecollectConfigBuilder {
        RecollectConfigBuilder::new()
    }
}

/// Builder for assembling a `RecollectConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct RecollectConfigBuilder {
    config: RecollectConfig,
}

impl RecollectConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: RecollectConfig::default(),
        }
    }

    /// Replace the pipeline configuration.
    pub fn pipeline(mut self, pipeline: PipelineConfig) -> Self {
        self.config.pipeline = pipeline;
        self
    }

    /// Replace the memory store configuration.
    pub fn memory(mut self, memory: MemoryConfig) -> Self {
        self.config.memory = memory;
        self
    }

    /// Replace the model configuration.
    pub fn model(mut self, model: ModelConfig) -> Self {
        self.config.model = model;
        self
    }

    /// Finalize and return the built `RecollectConfig`.
    pub fn build(self) -> RecollectConfig {
        self.config
    }
}

/// Pipeline controller settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Upper bound on memory items retrieved per request.
    #[serde(default = "default_recall_limit")]
    pub recall_limit: usize,
    /// Collective scope identifier shared by all semantic requests.
    #[serde(default = "default_semantic_scope")]
    pub semantic_scope: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            recall_limit: default_recall_limit(),
            semantic_scope: default_semantic_scope(),
        }
    }
}

/// Default number of memory items to retrieve.
fn default_recall_limit() -> usize {
    5
}

fn default_semantic_scope() -> String {
    "recollect_semantic_agent".to_string()
}

/// Memory store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_memory_provider")]
    pub provider: String,
    /// Storage root; relative paths resolve against the working directory.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub capture: MemoryCaptureConfig,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            provider: default_memory_provider(),
            path: None,
            capture: MemoryCaptureConfig::default(),
        }
    }
}

fn default_memory_provider() -> String {
    "file".to_string()
}

/// Content rewriting applied before exchanges are persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryCaptureConfig {
    #[serde(default)]
    pub redact_patterns: Vec<String>,
    #[serde(default = "default_detect_secrets")]
    pub detect_secrets: bool,
    #[serde(default = "default_secret_entropy_threshold")]
    pub secret_entropy_threshold: f32,
    #[serde(default)]
    pub max_chars: Option<usize>,
}

impl Default for MemoryCaptureConfig {
    fn default() -> Self {
        Self {
            redact_patterns: Vec::new(),
            detect_secrets: default_detect_secrets(),
            secret_entropy_threshold: default_secret_entropy_threshold(),
            max_chars: None,
        }
    }
}

fn default_detect_secrets() -> bool {
    true
}

fn default_secret_entropy_threshold() -> f32 {
    3.7
}

/// Completion model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model_provider")]
    pub provider: String,
    #[serde(default = "default_model_name")]
    pub name: String,
    #[serde(default = "default_model_base_url")]
    pub base_url: String,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: default_model_provider(),
            name: default_model_name(),
            base_url: default_model_base_url(),
            api_key_env: default_api_key_env(),
            temperature: None,
            max_tokens: None,
        }
    }
}

fn default_model_provider() -> String {
    "openai".to_string()
}

fn default_model_name() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_model_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}
