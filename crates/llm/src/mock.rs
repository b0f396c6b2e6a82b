//! Mock LLM Service Implementation
//!
//! Used by `LlmServiceFactory` when provider is `"mock"` and by tests.
//! Returns deterministic responses and remembers what it was asked.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::{CompletionRequest, CompletionResponse, LlmError, LlmMessage, LlmService};

const MOCK_MODEL: &str = "mock-model";

/// Mock LLM service for testing
#[derive(Debug, Default)]
pub struct MockLlmService {
    failure: Option<String>,
    calls: AtomicUsize,
    last_history: Mutex<Vec<LlmMessage>>,
}

impl MockLlmService {
    /// Create a mock that echoes the last message
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock whose every call fails with the given diagnostic
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Number of `complete` calls received so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// History passed to the most recent call
    pub fn last_history(&self) -> Vec<LlmMessage> {
        self.last_history
            .lock()
            .map(|history| history.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl LlmService for MockLlmService {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        tracing::info!(
            history_len = request.messages.len(),
            "Mock LLM service processing completion request"
        );

        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut history) = self.last_history.lock() {
            *history = request.messages.clone();
        }

        if let Some(message) = &self.failure {
            return Err(LlmError::Request(message.clone()));
        }

        let last_message = request
            .messages
            .last()
            .map(|m| m.content.as_str())
            .unwrap_or("empty");

        Ok(CompletionResponse {
            content: format!("Mock response to: {}", last_message),
            model: MOCK_MODEL.to_string(),
            finish_reason: "stop".to_string(),
        })
    }

    fn model(&self) -> &str {
        MOCK_MODEL
    }
}
