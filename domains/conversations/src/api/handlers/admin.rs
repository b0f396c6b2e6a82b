//! Operator handlers
//!
//! `AdminAuth` is extracted before any body parsing or store access, so a
//! bad credential is rejected with no side effects.

use axum::{extract::State, Json};
use parley_auth::AdminAuth;
use parley_common::{Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::ConversationEnvelope;
use crate::api::middleware::ConversationsState;
use crate::domain::entities::Conversation;
use crate::service::ManualReply;

#[derive(Debug, Serialize)]
pub struct ConversationList {
    pub conversations: Vec<Conversation>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetManualModeRequest {
    pub conversation_id: Uuid,
    pub enabled: bool,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ToggleManualRequest {
    pub conversation_id: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ManualReplyRequest {
    pub conversation_id: Uuid,

    #[validate(length(min = 1, message = "Reply text is required"))]
    pub text: String,
}

/// List every conversation, newest first
pub async fn list_conversations(
    _admin: AdminAuth,
    State(state): State<ConversationsState>,
) -> Result<Json<ConversationList>> {
    let conversations = state.handoff.list_conversations().await?;
    Ok(Json(ConversationList { conversations }))
}

/// Enable or disable manual mode
pub async fn set_manual_mode(
    _admin: AdminAuth,
    State(state): State<ConversationsState>,
    ValidatedJson(req): ValidatedJson<SetManualModeRequest>,
) -> Result<Json<ConversationEnvelope>> {
    let conversation = state
        .handoff
        .set_manual_mode(req.conversation_id, req.enabled)
        .await?;
    Ok(Json(conversation.into()))
}

/// Flip manual mode
pub async fn toggle_manual(
    _admin: AdminAuth,
    State(state): State<ConversationsState>,
    ValidatedJson(req): ValidatedJson<ToggleManualRequest>,
) -> Result<Json<ConversationEnvelope>> {
    let conversation = state.handoff.toggle_manual(req.conversation_id).await?;
    Ok(Json(conversation.into()))
}

/// Send an operator-authored reply
pub async fn post_reply(
    _admin: AdminAuth,
    State(state): State<ConversationsState>,
    ValidatedJson(req): ValidatedJson<ManualReplyRequest>,
) -> Result<Json<ManualReply>> {
    let reply = state
        .handoff
        .send_manual_reply(req.conversation_id, &req.text)
        .await?;
    Ok(Json(reply))
}
