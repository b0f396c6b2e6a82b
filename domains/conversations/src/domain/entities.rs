//! Domain entities for the Conversations domain
//!
//! A conversation is a named, append-only message log plus the two flags that
//! drive manual-mode handoff. Messages are immutable once stored.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use parley_common::{clean_text, truncate_chars, Error, Result};

use crate::domain::state::HandoffState;

/// Maximum conversation name length, in characters, after trimming
pub const MAX_NAME_LENGTH: usize = 32;

/// Hard cap on stored message text, in characters
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "message_sender", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
    Admin,
}

impl Sender {
    /// Reply origin recorded alongside messages from this sender
    pub fn via(&self) -> Option<ReplyVia> {
        match self {
            Sender::User => None,
            Sender::Ai => Some(ReplyVia::Ai),
            Sender::Admin => Some(ReplyVia::Manual),
        }
    }
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Ai => write!(f, "ai"),
            Sender::Admin => write!(f, "admin"),
        }
    }
}

/// Distinguishes generated replies from operator-typed ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "reply_via", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReplyVia {
    Ai,
    Manual,
}

impl std::fmt::Display for ReplyVia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplyVia::Ai => write!(f, "ai"),
            ReplyVia::Manual => write!(f, "manual"),
        }
    }
}

/// Acceptance timestamp, truncated to the store's microsecond precision
pub fn accepted_at() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Conversation entity with its full, ordered message history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub manual_mode: bool,
    pub waiting_for_manual: bool,
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Create a new, empty conversation in `Auto` mode
    pub fn new(name: &str) -> Result<Self> {
        let cleaned = clean_text(name, usize::MAX);
        let trimmed = cleaned.trim();
        if trimmed.is_empty() {
            return Err(Error::Validation("Name cannot be empty".to_string()));
        }

        Ok(Conversation {
            id: Uuid::new_v4(),
            name: truncate_chars(trimmed, MAX_NAME_LENGTH),
            created_at: accepted_at(),
            manual_mode: false,
            waiting_for_manual: false,
            messages: Vec::new(),
        })
    }

    /// Current position in the manual handoff state machine
    pub fn handoff_state(&self) -> HandoffState {
        HandoffState::from_flags(self.manual_mode, self.waiting_for_manual)
    }

    /// The last `window` messages, oldest first
    pub fn recent_messages(&self, window: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(window);
        &self.messages[start..]
    }

    pub fn find_message(&self, id: Uuid) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }
}

/// Stored message entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender: Sender,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub via: Option<ReplyVia>,
    /// Store-assigned, strictly increasing; breaks `created_at` ties
    pub sequence: i64,
    pub created_at: DateTime<Utc>,
}

/// A message accepted for appending but not yet stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub(crate) id: Uuid,
    pub(crate) conversation_id: Uuid,
    pub(crate) sender: Sender,
    pub(crate) text: String,
    pub(crate) via: Option<ReplyVia>,
    pub(crate) created_at: DateTime<Utc>,
}

impl NewMessage {
    /// Accept a message: truncate the text and stamp it with the current time
    pub fn new(conversation_id: Uuid, sender: Sender, text: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            conversation_id,
            sender,
            text: clean_text(text, MAX_MESSAGE_LENGTH),
            via: sender.via(),
            created_at: accepted_at(),
        }
    }

    pub fn user(conversation_id: Uuid, text: &str) -> Self {
        Self::new(conversation_id, Sender::User, text)
    }

    pub fn ai(conversation_id: Uuid, text: &str) -> Self {
        Self::new(conversation_id, Sender::Ai, text)
    }

    pub fn admin(conversation_id: Uuid, text: &str) -> Self {
        Self::new(conversation_id, Sender::Admin, text)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn conversation_id(&self) -> Uuid {
        self.conversation_id
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn via(&self) -> Option<ReplyVia> {
        self.via
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Materialize the stored form once the store has assigned a sequence
    pub fn into_message(self, sequence: i64) -> Message {
        Message {
            id: self.id,
            conversation_id: self.conversation_id,
            sender: self.sender,
            text: self.text,
            via: self.via,
            sequence,
            created_at: self.created_at,
        }
    }
}

/// The only shape in which conversation flags are ever mutated.
///
/// Both fields change in one atomic step; `apply` is the rule every store
/// implements so `waiting_for_manual` can never be observed true while
/// `manual_mode` is false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagUpdate {
    pub manual_mode: Option<bool>,
    pub waiting_for_manual: Option<bool>,
}

impl FlagUpdate {
    /// Set manual mode; turning it off also clears the waiting flag
    pub fn manual_mode(enabled: bool) -> Self {
        Self {
            manual_mode: Some(enabled),
            waiting_for_manual: if enabled { None } else { Some(false) },
        }
    }

    pub fn waiting(waiting: bool) -> Self {
        Self {
            manual_mode: None,
            waiting_for_manual: Some(waiting),
        }
    }

    /// Resulting `(manual_mode, waiting_for_manual)` given the current pair
    pub fn apply(&self, manual_mode: bool, waiting_for_manual: bool) -> (bool, bool) {
        let manual = self.manual_mode.unwrap_or(manual_mode);
        let waiting = manual && self.waiting_for_manual.unwrap_or(waiting_for_manual);
        (manual, waiting)
    }
}
