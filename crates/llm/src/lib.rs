//! LLM reply provider for Parley
//!
//! Given an ordered conversation history, produce a single reply string.
//! The production implementation talks to any OpenAI-compatible
//! `/v1/chat/completions` endpoint (DeepSeek by default); the mock is used in
//! tests and when `LLM_PROVIDER=mock`.

pub mod chat_completions;
pub mod mock;

use std::path::PathBuf;
use std::sync::Arc;

pub use chat_completions::ChatCompletionsService;
pub use mock::MockLlmService;

const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";
const DEFAULT_MODEL: &str = "deepseek-chat";
const DEFAULT_API_KEY_FILE: &str = "api_key";
const DEFAULT_TEMPERATURE: f32 = 0.6;
const DEFAULT_TOP_P: f32 = 0.9;
const DEFAULT_SYSTEM_PROMPT: &str = "You are Parley, a friendly AI assistant. Answer confidently, \
stay on point and be warm. If the user asks for a human answer, follow the operator's instructions.";

/// Role of a message in the provider's view of the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmRole {
    User,
    Assistant,
}

impl LlmRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmRole::User => "user",
            LlmRole::Assistant => "assistant",
        }
    }
}

/// A single history entry sent to the provider
#[derive(Debug, Clone, PartialEq)]
pub struct LlmMessage {
    pub role: LlmRole,
    pub content: String,
}

impl LlmMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: LlmRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: LlmRole::Assistant,
            content: content.into(),
        }
    }
}

/// Completion request: ordered history, oldest first
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    pub messages: Vec<LlmMessage>,
}

/// Completion response
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
    pub finish_reason: String,
}

/// Provider failures
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider is not configured: {0}")]
    Configuration(String),

    #[error("Provider unavailable: {0}")]
    Request(String),

    #[error("Provider rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Provider returned an unusable response: {0}")]
    Response(String),
}

/// LLM reply provider
#[async_trait::async_trait]
pub trait LlmService: Send + Sync {
    /// Produce a reply for the given history
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Configured model name, for logs
    fn model(&self) -> &str;
}

/// Provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    /// Any OpenAI-compatible chat completions endpoint
    ChatCompletions,
    Mock,
}

impl std::str::FromStr for LlmProvider {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deepseek" | "openai" | "chat-completions" => Ok(LlmProvider::ChatCompletions),
            "mock" => Ok(LlmProvider::Mock),
            other => Err(LlmError::Configuration(format!(
                "unknown LLM_PROVIDER: {}",
                other
            ))),
        }
    }
}

/// Provider configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub base_url: String,
    pub model: String,
    /// Empty when no credential was found; requests then fail with `Configuration`
    pub api_key: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: Option<u32>,
    pub system_prompt: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::ChatCompletions,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            max_tokens: None,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl LlmConfig {
    /// Load provider configuration from the environment
    pub fn from_env() -> Result<Self, LlmError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load provider configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LlmError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = match non_empty("LLM_PROVIDER") {
            Some(raw) => raw.parse()?,
            None => defaults.provider,
        };

        let api_key = match non_empty("LLM_API_KEY").or_else(|| non_empty("DEEPSEEK_API_KEY")) {
            Some(key) => key.trim().to_string(),
            None => {
                let path = non_empty("LLM_API_KEY_FILE")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_API_KEY_FILE));
                read_api_key_file(&path)
            }
        };

        Ok(Self {
            provider,
            base_url: non_empty("LLM_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            model: non_empty("LLM_MODEL").unwrap_or(defaults.model),
            api_key,
            temperature: parse_number(non_empty("LLM_TEMPERATURE"), "LLM_TEMPERATURE")?
                .unwrap_or(defaults.temperature),
            top_p: parse_number(non_empty("LLM_TOP_P"), "LLM_TOP_P")?.unwrap_or(defaults.top_p),
            max_tokens: parse_number(non_empty("LLM_MAX_TOKENS"), "LLM_MAX_TOKENS")?,
            system_prompt: non_empty("LLM_SYSTEM_PROMPT").unwrap_or(defaults.system_prompt),
        })
    }
}

fn read_api_key_file(path: &std::path::Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(contents) => contents.trim().to_string(),
        Err(_) => {
            tracing::warn!(
                path = %path.display(),
                "No LLM API key configured; auto-replies will fail"
            );
            String::new()
        }
    }
}

fn parse_number<T: std::str::FromStr>(
    raw: Option<String>,
    key: &str,
) -> Result<Option<T>, LlmError> {
    raw.map(|value| {
        value
            .trim()
            .parse::<T>()
            .map_err(|_| LlmError::Configuration(format!("{} is not a valid number", key)))
    })
    .transpose()
}

/// Builds the configured provider
pub struct LlmServiceFactory;

impl LlmServiceFactory {
    pub fn create(config: LlmConfig) -> Arc<dyn LlmService> {
        match config.provider {
            LlmProvider::ChatCompletions => {
                tracing::info!(
                    base_url = %config.base_url,
                    model = %config.model,
                    "Using chat completions provider"
                );
                Arc::new(ChatCompletionsService::new(config))
            }
            LlmProvider::Mock => {
                tracing::info!("Using mock LLM provider");
                Arc::new(MockLlmService::new())
            }
        }
    }
}
