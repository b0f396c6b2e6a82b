//! Conversation services: lifecycle, inbound user messages, admin handoff

pub mod handoff;
pub mod inbound;
pub mod lifecycle;

pub use handoff::{AdminHandoffHandler, ManualReply};
pub use inbound::{InboundMessageHandler, InboundOutcome};
pub use lifecycle::ConversationService;
