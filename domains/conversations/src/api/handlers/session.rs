//! Session bootstrap and conversation polling

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use parley_common::{Result, ValidatedJson};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::ConversationEnvelope;
use crate::api::middleware::ConversationsState;

/// Request for starting a conversation
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSessionRequest {
    /// Display name; trimmed and capped at 32 characters
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
}

/// Start a new conversation
pub async fn create_session(
    State(state): State<ConversationsState>,
    ValidatedJson(req): ValidatedJson<CreateSessionRequest>,
) -> Result<(StatusCode, Json<ConversationEnvelope>)> {
    let conversation = state.conversations.create_conversation(&req.name).await?;
    Ok((StatusCode::CREATED, Json(conversation.into())))
}

/// Poll a conversation with its full history
pub async fn get_conversation(
    State(state): State<ConversationsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ConversationEnvelope>> {
    let conversation = state.conversations.get_conversation(id).await?;
    Ok(Json(conversation.into()))
}
