//! HTTP API integration tests
//!
//! End-user session and chat flows, operator handoff, and admin gating.

#![allow(dead_code)]

mod admin;
mod chat;
mod common;
mod handoff;
mod session;
