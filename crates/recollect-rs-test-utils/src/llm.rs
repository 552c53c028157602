use async_trait::async_trait;
use parking_lot::Mutex;
use recollect_rs_llm::{CompletionError, CompletionService};

/// Completion service that always answers with the same text.
#[derive(Debug, Default)]
pub struct FixedCompletion {
    response: String,
    calls: Mutex<usize>,
}

impl FixedCompletion {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock()
    }
}

#[async_trait]
impl CompletionService for FixedCompletion {
    async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
        *self.calls.lock() += 1;
        Ok(self.response.clone())
    }
}

/// Completion service that captures prompts and replays queued responses.
///
/// Once the queue is empty the fallback response is returned.
#[derive(Debug, Default)]
pub struct RecordingCompletion {
    prompts: Mutex<Vec<String>>,
    responses: Mutex<Vec<String>>,
    fallback: String,
}

impl RecordingCompletion {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            responses: Mutex::new(Vec::new()),
            fallback: fallback.into(),
        }
    }

    pub fn with_responses(mut self, mut responses: Vec<String>) -> Self {
        responses.reverse();
        self.responses = Mutex::new(responses);
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().last().cloned()
    }
}

#[async_trait]
impl CompletionService for RecordingCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.prompts.lock().push(prompt.to_string());
        Ok(self
            .responses
            .lock()
            .pop()
            .unwrap_or_else(|| self.fallback.clone()))
    }
}

/// Completion service that always fails with [`CompletionError::Unavailable`].
#[derive(Debug, Default)]
pub struct FailingCompletion {
    message: String,
    calls: Mutex<usize>,
}

impl FailingCompletion {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock()
    }
}

#[async_trait]
impl CompletionService for FailingCompletion {
    async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
        *self.calls.lock() += 1;
        Err(CompletionError::Unavailable(self.message.clone()))
    }
}
