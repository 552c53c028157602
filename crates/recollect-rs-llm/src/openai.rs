//! OpenAI-compatible chat completions backend.

use crate::completion::CompletionService;
use crate::error::CompletionError;
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Settings for [`OpenAiCompletion`].
#[derive(Debug, Clone)]
pub struct OpenAiCompletionOptions {
    /// Base URL without the `/v1/...` suffix.
    pub base_url: String,
    /// Model name.
    pub model: String,
    /// Bearer token; omitted for local OpenAI-compatible servers.
    pub api_key: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl OpenAiCompletionOptions {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
            api_key: None,
            temperature: None,
            max_tokens: None,
        }
    }
}

/// Completion service backed by a `/v1/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiCompletion {
    options: OpenAiCompletionOptions,
    http_client: reqwest::Client,
}

impl OpenAiCompletion {
    /// Build a client; construct once and reuse across requests.
    pub fn new(options: OpenAiCompletionOptions) -> Result<Self, CompletionError> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|err| CompletionError::InvalidClient(err.to_string()))?;
        Ok(Self {
            options,
            http_client,
        })
    }

    /// Model name requests are sent with.
    pub fn model(&self) -> &str {
        &self.options.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.options.base_url.trim_end_matches('/')
        )
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.options.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.options.temperature,
            max_tokens: self.options.max_tokens,
        }
    }
}

#[async_trait]
impl CompletionService for OpenAiCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let url = self.endpoint();
        debug!(
            "sending completion request (model={}, prompt_len={})",
            self.options.model,
            prompt.len()
        );
        let mut request = self.http_client.post(&url).json(&self.request_body(prompt));
        if let Some(key) = &self.options.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| CompletionError::Unavailable(format!("request failed: {err}")))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Unavailable(format!(
                "api error {status}: {body}"
            )));
        }

        let body: ChatResponse = response.json().await.map_err(|err| {
            CompletionError::Unavailable(format!("failed to decode response: {err}"))
        })?;
        let text = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| CompletionError::Unavailable("no choices in response".to_string()))?;
        debug!("completion received (response_len={})", text.len());
        Ok(text)
    }
}
