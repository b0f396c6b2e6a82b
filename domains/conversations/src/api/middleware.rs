//! Conversations domain state and admin gate integration

use std::sync::Arc;

use axum::extract::FromRef;
use parley_auth::AdminGate;
use parley_llm::LlmService;

use crate::repository::ConversationStore;
use crate::service::{AdminHandoffHandler, ConversationService, InboundMessageHandler};

/// Application state for the Conversations domain
#[derive(Clone)]
pub struct ConversationsState {
    pub conversations: ConversationService,
    pub inbound: InboundMessageHandler,
    pub handoff: AdminHandoffHandler,
    pub gate: AdminGate,
}

impl ConversationsState {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        llm: Arc<dyn LlmService>,
        gate: AdminGate,
        history_window: usize,
    ) -> Self {
        let conversations = ConversationService::new(store);
        Self {
            inbound: InboundMessageHandler::new(conversations.clone(), llm)
                .with_history_window(history_window),
            handoff: AdminHandoffHandler::new(conversations.clone()),
            conversations,
            gate,
        }
    }
}

impl FromRef<ConversationsState> for AdminGate {
    fn from_ref(state: &ConversationsState) -> Self {
        state.gate.clone()
    }
}
