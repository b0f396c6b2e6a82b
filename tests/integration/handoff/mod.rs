//! Manual-mode handoff workflows across end-user and operator routes

use axum::http::StatusCode;
use serde_json::json;

use crate::common::TestApp;

#[test_log::test(tokio::test)]
async fn test_full_handoff_cycle() {
    let app = TestApp::new();
    let id = app.create_session("Alex").await;

    // Operator takes over
    let (status, body) = app
        .admin_post("/api/admin/manual/toggle", json!({ "conversationId": id }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["conversation"]["manualMode"], true);
    assert_eq!(body["conversation"]["waitingForManual"], false);

    // User writes; nobody answers automatically
    let (_, body) = app
        .post("/api/chat", json!({ "conversationId": id, "message": "Anyone there?" }))
        .await;
    assert_eq!(body["status"], "pending_manual");

    let (_, listing) = app.admin_get("/api/admin/conversations").await;
    assert_eq!(listing["conversations"][0]["waitingForManual"], true);

    // Operator answers; wait clears, manual mode stays
    let (status, body) = app
        .admin_post(
            "/api/admin/reply",
            json!({ "conversationId": id, "text": "Yes, a human" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"]["sender"], "admin");
    assert_eq!(body["reply"]["via"], "manual");
    assert_eq!(body["conversation"]["manualMode"], true);
    assert_eq!(body["conversation"]["waitingForManual"], false);
    assert_eq!(body["conversation"]["messages"].as_array().unwrap().len(), 2);

    // Back to automatic replies
    let (_, body) = app
        .admin_post("/api/admin/manual/toggle", json!({ "conversationId": id }))
        .await;
    assert_eq!(body["conversation"]["manualMode"], false);

    let (_, body) = app
        .post("/api/chat", json!({ "conversationId": id, "message": "Thanks" }))
        .await;
    assert_eq!(body["status"], "ok");

    // The provider saw the operator reply as an assistant turn
    let history = app.llm.last_history();
    assert_eq!(history.len(), 3);
    assert_eq!(history[1].content, "Yes, a human");
    assert_eq!(history[1].role.as_str(), "assistant");
}

#[test_log::test(tokio::test)]
async fn test_disabling_manual_mode_clears_waiting() {
    let app = TestApp::new();
    let id = app.create_session("Alex").await;
    app.admin_post(
        "/api/admin/manual",
        json!({ "conversationId": id, "enabled": true }),
    )
    .await;
    app.post("/api/chat", json!({ "conversationId": id, "message": "Help" }))
        .await;
    assert!(app.stored(id).await.waiting_for_manual);

    let (status, body) = app
        .admin_post(
            "/api/admin/manual",
            json!({ "conversationId": id, "enabled": false }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["conversation"]["manualMode"], false);
    assert_eq!(body["conversation"]["waitingForManual"], false);
}

#[test_log::test(tokio::test)]
async fn test_enabling_manual_mode_is_idempotent() {
    let app = TestApp::new();
    let id = app.create_session("Alex").await;

    for _ in 0..2 {
        let (status, body) = app
            .admin_post(
                "/api/admin/manual",
                json!({ "conversationId": id, "enabled": true }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["conversation"]["manualMode"], true);
        assert_eq!(body["conversation"]["waitingForManual"], false);
    }
}

#[test_log::test(tokio::test)]
async fn test_messages_ordered_across_senders() {
    let app = TestApp::new();
    let id = app.create_session("Alex").await;

    app.post("/api/chat", json!({ "conversationId": id, "message": "first" }))
        .await;
    app.admin_post("/api/admin/reply", json!({ "conversationId": id, "text": "second" }))
        .await;
    app.post("/api/chat", json!({ "conversationId": id, "message": "third" }))
        .await;

    let stored = app.stored(id).await;
    let texts: Vec<&str> = stored.messages.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "first",
            "Mock response to: first",
            "second",
            "third",
            "Mock response to: third"
        ]
    );
    assert!(stored.messages.windows(2).all(|pair| {
        (pair[0].created_at, pair[0].sequence) < (pair[1].created_at, pair[1].sequence)
    }));
}
