//! OpenAI-compatible Chat Completions implementation
//!
//! Calls `{base_url}/v1/chat/completions` (DeepSeek, OpenAI and most hosted
//! gateways speak this dialect) using the reqwest HTTP client.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{CompletionRequest, CompletionResponse, LlmConfig, LlmError, LlmService};

/// Chat Completions request body
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat Completions response body
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Error envelope returned by OpenAI-compatible APIs
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
    #[serde(rename = "type", default)]
    error_type: Option<String>,
}

/// Chat Completions LLM service implementation
pub struct ChatCompletionsService {
    client: Client,
    config: LlmConfig,
}

impl ChatCompletionsService {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.config.base_url)
    }

    fn build_body<'a>(&'a self, request: &'a CompletionRequest) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(ChatMessage {
            role: "system",
            content: &self.config.system_prompt,
        });
        messages.extend(request.messages.iter().map(|m| ChatMessage {
            role: m.role.as_str(),
            content: &m.content,
        }));

        ChatRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            top_p: self.config.top_p,
            max_tokens: self.config.max_tokens,
            stream: false,
        }
    }
}

/// Pull the first non-empty reply out of a parsed response
fn extract_reply(
    response: ChatResponse,
    fallback_model: &str,
) -> Result<CompletionResponse, LlmError> {
    let model = response
        .model
        .unwrap_or_else(|| fallback_model.to_string());

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::Response("response contained no choices".to_string()))?;

    let content = choice
        .message
        .and_then(|m| m.content)
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| LlmError::Response("response contained no text".to_string()))?;

    Ok(CompletionResponse {
        content,
        model,
        finish_reason: choice.finish_reason.unwrap_or_else(|| "stop".to_string()),
    })
}

/// Turn a non-success body into a diagnostic error
fn describe_failure(status: reqwest::StatusCode, body: &str) -> LlmError {
    let detail = match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) => format!(
            "provider error ({}, {}): {}",
            status,
            parsed.error.error_type.as_deref().unwrap_or("unknown"),
            parsed.error.message
        ),
        Err(_) => format!("provider returned {}: {}", status, body),
    };

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        LlmError::RateLimit(detail)
    } else {
        LlmError::Response(detail)
    }
}

#[async_trait::async_trait]
impl LlmService for ChatCompletionsService {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        if self.config.api_key.is_empty() {
            return Err(LlmError::Configuration(
                "no API key found; set LLM_API_KEY or provide an api_key file".to_string(),
            ));
        }

        let body = self.build_body(&request);

        tracing::debug!(
            model = %self.config.model,
            history_len = request.messages.len(),
            "Sending chat completions request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Request(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(describe_failure(status, &error_body));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Response(format!("Failed to parse response: {}", e)))?;

        extract_reply(parsed, &self.config.model)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
