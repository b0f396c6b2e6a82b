//! Shared utilities, configuration, and error handling for Parley
//!
//! This crate provides common functionality used across the Parley application:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - Shared-secret comparison
//! - Request extractors and text helpers

pub mod config;
pub mod crypto;
pub mod error;
pub mod extractors;
pub mod text;

pub use config::{Config, LogFormat, StoreBackend};
pub use crypto::secrets_match;
pub use error::{Error, Result};
pub use extractors::ValidatedJson;
pub use text::{clean_text, is_blank, truncate_chars};
