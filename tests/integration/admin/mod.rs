//! Admin gating: every operator route rejects bad credentials before any work

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use crate::common::{assert_error, TestApp, ADMIN_PASSWORD};

fn admin_routes(id: &str) -> Vec<(Method, &'static str, Option<Value>)> {
    vec![
        (Method::GET, "/api/admin/conversations", None),
        (
            Method::POST,
            "/api/admin/manual",
            Some(json!({ "conversationId": id, "enabled": true })),
        ),
        (
            Method::POST,
            "/api/admin/manual/toggle",
            Some(json!({ "conversationId": id })),
        ),
        (
            Method::POST,
            "/api/admin/reply",
            Some(json!({ "conversationId": id, "text": "Hi" })),
        ),
    ]
}

#[test_log::test(tokio::test)]
async fn test_admin_routes_reject_missing_and_wrong_secret() {
    let app = TestApp::new();
    let id = app.create_session("Alex").await;
    let id_str = id.to_string();

    for (method, uri, body) in admin_routes(&id_str) {
        for bearer in [None, Some("wrong"), Some(""), Some("test-admin-secret ")] {
            let (status, response) = app.send(method.clone(), uri, body.clone(), bearer).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {:?}", uri, bearer);
            assert_error(&response, "UNAUTHORIZED");
        }
    }

    let stored = app.stored(id).await;
    assert!(!stored.manual_mode);
    assert!(!stored.waiting_for_manual);
    assert!(stored.messages.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_admin_rejects_non_bearer_scheme() {
    let app = TestApp::new();

    let request = axum::http::Request::builder()
        .method(Method::GET)
        .uri("/api/admin/conversations")
        .header("authorization", format!("Basic {}", ADMIN_PASSWORD))
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[test_log::test(tokio::test)]
async fn test_auth_checked_before_body_validation() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            Method::POST,
            "/api/admin/reply",
            Some(json!({ "garbage": true })),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error(&body, "UNAUTHORIZED");
}

#[test_log::test(tokio::test)]
async fn test_list_conversations_newest_first_with_messages() {
    let app = TestApp::new();
    let first = app.create_session("First").await;
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    let second = app.create_session("Second").await;
    app.post("/api/chat", json!({ "conversationId": first, "message": "Hello" }))
        .await;

    let (status, body) = app.admin_get("/api/admin/conversations").await;

    assert_eq!(status, StatusCode::OK);
    let conversations = body["conversations"].as_array().unwrap();
    assert_eq!(conversations.len(), 2);
    assert_eq!(conversations[0]["id"], second.to_string());
    assert_eq!(conversations[1]["id"], first.to_string());
    assert_eq!(conversations[1]["messages"].as_array().unwrap().len(), 2);
}

#[test_log::test(tokio::test)]
async fn test_admin_unknown_conversation_returns_404() {
    let app = TestApp::new();
    let id = uuid::Uuid::new_v4();

    let (status, body) = app
        .admin_post("/api/admin/manual", json!({ "conversationId": id, "enabled": true }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error(&body, "NOT_FOUND");

    let (status, _) = app
        .admin_post("/api/admin/manual/toggle", json!({ "conversationId": id }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .admin_post("/api/admin/reply", json!({ "conversationId": id, "text": "Hi" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn test_admin_reply_empty_text_rejected() {
    let app = TestApp::new();
    let id = app.create_session("Alex").await;

    let (status, body) = app
        .admin_post("/api/admin/reply", json!({ "conversationId": id, "text": "  " }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, "INVALID_INPUT");
    assert!(app.stored(id).await.messages.is_empty());
}
