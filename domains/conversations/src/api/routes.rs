//! Route definitions for Conversations domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{admin, chat, session};
use super::middleware::ConversationsState;

/// End-user routes
fn chat_routes() -> Router<ConversationsState> {
    Router::new()
        .route("/api/session", post(session::create_session))
        .route("/api/conversation/{id}", get(session::get_conversation))
        .route("/api/chat", post(chat::post_message))
}

/// Operator routes; every handler takes `AdminAuth`
fn admin_routes() -> Router<ConversationsState> {
    Router::new()
        .route("/api/admin/conversations", get(admin::list_conversations))
        .route("/api/admin/manual", post(admin::set_manual_mode))
        .route("/api/admin/manual/toggle", post(admin::toggle_manual))
        .route("/api/admin/reply", post(admin::post_reply))
}

/// Create all Conversations domain API routes
pub fn routes() -> Router<ConversationsState> {
    Router::new().merge(chat_routes()).merge(admin_routes())
}
