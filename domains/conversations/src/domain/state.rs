//! State machine for manual-mode handoff
//!
//! States: Auto, ManualIdle, ManualWaiting. Derived from the conversation's
//! `(manual_mode, waiting_for_manual)` flag pair; there is no terminal state.

use serde::{Deserialize, Serialize};

/// Handoff states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandoffState {
    /// Replies are generated automatically
    Auto,
    /// An operator owns the conversation but nothing is pending
    ManualIdle,
    /// A user message is waiting for an operator reply
    ManualWaiting,
}

impl HandoffState {
    /// Map a flag pair onto a state. `(false, true)` cannot be stored and
    /// reads as `Auto`.
    pub fn from_flags(manual_mode: bool, waiting_for_manual: bool) -> Self {
        match (manual_mode, waiting_for_manual) {
            (false, _) => Self::Auto,
            (true, false) => Self::ManualIdle,
            (true, true) => Self::ManualWaiting,
        }
    }
}

impl std::fmt::Display for HandoffState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::ManualIdle => write!(f, "manual_idle"),
            Self::ManualWaiting => write!(f, "manual_waiting"),
        }
    }
}

/// Events that drive handoff transitions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HandoffEvent {
    /// Operator flips manual mode
    ToggleManual,
    /// A user message was appended
    UserMessage,
    /// An operator reply was appended
    ManualReply,
}

impl std::fmt::Display for HandoffEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ToggleManual => write!(f, "toggle_manual"),
            Self::UserMessage => write!(f, "user_message"),
            Self::ManualReply => write!(f, "manual_reply"),
        }
    }
}

/// Handoff state machine. Every event is accepted in every state.
pub struct HandoffStateMachine;

impl HandoffStateMachine {
    pub fn transition(current: HandoffState, event: HandoffEvent) -> HandoffState {
        use HandoffEvent::*;
        use HandoffState::*;

        match (current, event) {
            (Auto, ToggleManual) => ManualIdle,
            (ManualIdle | ManualWaiting, ToggleManual) => Auto,
            (Auto, UserMessage) => Auto,
            (ManualIdle | ManualWaiting, UserMessage) => ManualWaiting,
            (ManualWaiting, ManualReply) => ManualIdle,
            (state, ManualReply) => state,
        }
    }
}
