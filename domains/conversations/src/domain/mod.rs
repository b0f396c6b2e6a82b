//! Domain layer: entities and the handoff state machine

pub mod entities;
pub mod state;
