//! Common test utilities for integration tests
//!
//! Builds the full router (middleware included) over an in-memory store and
//! a mock reply provider, and exposes both so tests can check side effects.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use parley_common::Config;
use parley_conversations::{Conversation, ConversationStore, InMemoryConversationStore};
use parley_llm::MockLlmService;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub const ADMIN_PASSWORD: &str = "test-admin-secret"; // pragma: allowlist secret

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryConversationStore>,
    pub llm: Arc<MockLlmService>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_llm(MockLlmService::new())
    }

    pub fn with_llm(llm: MockLlmService) -> Self {
        Self::with_settings(llm, &[])
    }

    /// Build an app with extra environment-style settings layered on the defaults
    pub fn with_settings(llm: MockLlmService, settings: &[(&str, &str)]) -> Self {
        let mut env: HashMap<String, String> = HashMap::from([
            ("STORE_BACKEND".to_string(), "memory".to_string()),
            ("ADMIN_PASSWORD".to_string(), ADMIN_PASSWORD.to_string()),
        ]);
        for (key, value) in settings {
            env.insert(key.to_string(), value.to_string());
        }
        let config = Config::from_lookup(|key| env.get(key).cloned()).unwrap();

        let store = Arc::new(InMemoryConversationStore::new());
        let llm = Arc::new(llm);
        let router = parley_app::with_middleware(
            parley_app::create_app(&config, store.clone(), llm.clone()),
            &config.cors_allowed_origins,
        );

        Self { router, store, llm }
    }

    /// Send a request and return status plus parsed JSON body (Null when empty)
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        bearer: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(secret) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", secret));
        }
        let request = match body {
            Some(b) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::String(
                String::from_utf8_lossy(&bytes).into_owned(),
            ))
        };
        (status, json)
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body), None).await
    }

    pub async fn admin_post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body), Some(ADMIN_PASSWORD))
            .await
    }

    pub async fn admin_get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, Some(ADMIN_PASSWORD)).await
    }

    /// Start a session and return the new conversation id
    pub async fn create_session(&self, name: &str) -> Uuid {
        let (status, body) = self
            .post("/api/session", serde_json::json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "unexpected body: {}", body);
        body["conversation"]["id"]
            .as_str()
            .and_then(|id| id.parse().ok())
            .unwrap()
    }

    /// Read a conversation directly from the store
    pub async fn stored(&self, id: Uuid) -> Conversation {
        self.store.find_with_messages(id).await.unwrap().unwrap()
    }
}

/// Assert the standard error envelope
pub fn assert_error(body: &Value, code: &str) {
    assert_eq!(body["error"]["code"], code, "unexpected body: {}", body);
    assert!(body["error"]["message"].is_string());
}
