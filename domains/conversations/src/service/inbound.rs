//! Inbound Message Handler
//!
//! Append the user's message first, then branch on manual mode: either leave
//! it for an operator or ask the reply provider. A provider failure never
//! removes the stored user message.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use parley_common::{config::DEFAULT_HISTORY_WINDOW, is_blank, Error, Result};
use parley_llm::{CompletionRequest, LlmMessage, LlmService};

use crate::domain::entities::{Message, NewMessage, Sender};
use crate::domain::state::{HandoffEvent, HandoffStateMachine};
use crate::service::lifecycle::ConversationService;

/// Result of handling a user message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InboundOutcome {
    /// The provider answered; the reply is already stored
    #[serde(rename = "ok")]
    Replied { reply: Message },
    /// Manual mode is on; an operator will answer
    PendingManual,
}

#[derive(Clone)]
pub struct InboundMessageHandler {
    conversations: ConversationService,
    llm: Arc<dyn LlmService>,
    history_window: usize,
}

impl InboundMessageHandler {
    pub fn new(conversations: ConversationService, llm: Arc<dyn LlmService>) -> Self {
        Self {
            conversations,
            llm,
            history_window: DEFAULT_HISTORY_WINDOW,
        }
    }

    /// Number of trailing messages handed to the provider
    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window.max(1);
        self
    }

    pub async fn handle_user_message(
        &self,
        conversation_id: Uuid,
        raw_text: &str,
    ) -> Result<InboundOutcome> {
        if is_blank(raw_text) {
            return Err(Error::Validation("Message cannot be empty".to_string()));
        }

        // Existence check before anything is written
        self.conversations.get_conversation(conversation_id).await?;

        let conversation = self
            .conversations
            .append_message(NewMessage::user(conversation_id, raw_text))
            .await?;

        // The decision uses the flags as read after the append
        if conversation.manual_mode {
            let before = conversation.handoff_state();
            self.conversations.mark_waiting(conversation_id, true).await?;
            tracing::info!(
                conversation_id = %conversation_id,
                from = %before,
                to = %HandoffStateMachine::transition(before, HandoffEvent::UserMessage),
                "User message left for operator"
            );
            return Ok(InboundOutcome::PendingManual);
        }

        let history: Vec<LlmMessage> = conversation
            .recent_messages(self.history_window)
            .iter()
            .map(to_llm_message)
            .collect();

        let completion = self
            .llm
            .complete(CompletionRequest { messages: history })
            .await
            .map_err(|e| {
                tracing::warn!(
                    conversation_id = %conversation_id,
                    model = %self.llm.model(),
                    error = %e,
                    "Reply provider failed"
                );
                Error::Provider(e.to_string())
            })?;

        let reply = NewMessage::ai(conversation_id, &completion.content);
        let reply_id = reply.id();
        let conversation = self.conversations.append_message(reply).await?;

        let reply = conversation
            .find_message(reply_id)
            .cloned()
            .ok_or_else(|| Error::Internal("stored reply missing from conversation".to_string()))?;

        tracing::info!(
            conversation_id = %conversation_id,
            model = %completion.model,
            "Auto-reply stored"
        );

        Ok(InboundOutcome::Replied { reply })
    }
}

fn to_llm_message(message: &Message) -> LlmMessage {
    match message.sender {
        Sender::User => LlmMessage::user(message.text.clone()),
        Sender::Ai | Sender::Admin => LlmMessage::assistant(message.text.clone()),
    }
}
