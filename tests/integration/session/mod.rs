//! Session bootstrap and polling

use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use crate::common::{assert_error, TestApp};

#[test_log::test(tokio::test)]
async fn test_create_session_returns_201_with_defaults() {
    let app = TestApp::new();

    let (status, body) = app.post("/api/session", json!({ "name": "  Alex  " })).await;

    assert_eq!(status, StatusCode::CREATED);
    let conversation = &body["conversation"];
    assert_eq!(conversation["name"], "Alex");
    assert_eq!(conversation["manualMode"], false);
    assert_eq!(conversation["waitingForManual"], false);
    assert_eq!(conversation["messages"], json!([]));
    assert!(conversation["createdAt"].is_string());
}

#[test_log::test(tokio::test)]
async fn test_create_session_truncates_long_name() {
    let app = TestApp::new();

    let (status, body) = app
        .post("/api/session", json!({ "name": "N".repeat(40) }))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["conversation"]["name"], "N".repeat(32));
}

#[test_log::test(tokio::test)]
async fn test_create_session_blank_name_rejected() {
    let app = TestApp::new();

    for name in ["", "   "] {
        let (status, body) = app.post("/api/session", json!({ "name": name })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error(&body, "INVALID_INPUT");
    }

    let (_, listing) = app.admin_get("/api/admin/conversations").await;
    assert_eq!(listing["conversations"], json!([]));
}

#[test_log::test(tokio::test)]
async fn test_create_session_malformed_body_rejected() {
    let app = TestApp::new();

    let (status, body) = app.post("/api/session", json!({ "nickname": "Alex" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, "INVALID_INPUT");
}

#[test_log::test(tokio::test)]
async fn test_get_conversation_returns_history() {
    let app = TestApp::new();
    let id = app.create_session("Alex").await;
    app.post("/api/chat", json!({ "conversationId": id, "message": "Hello" }))
        .await;

    let (status, body) = app
        .send(Method::GET, &format!("/api/conversation/{}", id), None, None)
        .await;

    assert_eq!(status, StatusCode::OK);
    let messages = body["conversation"]["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["sender"], "user");
    assert_eq!(messages[0]["text"], "Hello");
    assert!(messages[0].get("via").is_none());
    assert_eq!(messages[1]["sender"], "ai");
    assert_eq!(messages[1]["via"], "ai");
}

#[test_log::test(tokio::test)]
async fn test_get_unknown_conversation_returns_404() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/conversation/{}", Uuid::new_v4()),
            None,
            None,
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error(&body, "NOT_FOUND");
}

#[test_log::test(tokio::test)]
async fn test_get_conversation_malformed_id_returns_400() {
    let app = TestApp::new();

    let (status, _) = app
        .send(Method::GET, "/api/conversation/not-a-uuid", None, None)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn test_health_and_root() {
    let app = TestApp::new();

    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("OK"));

    let (status, _) = app.send(Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
}
