//! End-user message handler

use axum::{extract::State, Json};
use parley_common::{Result, ValidatedJson};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::ConversationsState;
use crate::service::InboundOutcome;

/// Request for posting a user message
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PostMessageRequest {
    pub conversation_id: Uuid,

    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}

/// Post a user message; answers immediately or defers to an operator
pub async fn post_message(
    State(state): State<ConversationsState>,
    ValidatedJson(req): ValidatedJson<PostMessageRequest>,
) -> Result<Json<InboundOutcome>> {
    let outcome = state
        .inbound
        .handle_user_message(req.conversation_id, &req.message)
        .await?;
    Ok(Json(outcome))
}
