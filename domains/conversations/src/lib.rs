//! Conversations domain: chat threads, messages, manual-mode handoff

pub mod api;
pub mod domain;
pub mod repository;
pub mod service;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{
    Conversation, FlagUpdate, Message, NewMessage, ReplyVia, Sender, MAX_MESSAGE_LENGTH,
    MAX_NAME_LENGTH,
};
pub use domain::state::{HandoffEvent, HandoffState, HandoffStateMachine};

// Re-export repository types
pub use repository::{ConversationStore, InMemoryConversationStore, PgConversationStore};

// Re-export service types
pub use service::{
    AdminHandoffHandler, ConversationService, InboundMessageHandler, InboundOutcome, ManualReply,
};

// Re-export API types
pub use api::routes;
pub use api::ConversationsState;
