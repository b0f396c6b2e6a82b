//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config. Provider settings live in
//! `parley-llm` next to the client that consumes them.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Default number of trailing messages handed to the reply provider
pub const DEFAULT_HISTORY_WINDOW: usize = 12;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_RUST_LOG: &str = "parley=info,tower_http=info";

/// Which Persistence Gateway implementation backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(anyhow::anyhow!("Unknown STORE_BACKEND: {}", other)),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Persistence backend selection
    pub store_backend: StoreBackend,

    /// Database connection URL (required for the Postgres backend)
    pub database_url: Option<String>,

    /// Shared secret gating every admin operation
    #[serde(skip_serializing)]
    pub admin_password: String,

    /// Trailing messages sent to the reply provider
    pub history_window: usize,

    /// Runtime configuration
    pub port: u16,
    pub cors_allowed_origins: String,
    pub log_format: LogFormat,
    pub rust_log: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_backend = match lookup("STORE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => StoreBackend::default(),
        };

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(anyhow::anyhow!(
                "DATABASE_URL is required when STORE_BACKEND=postgres"
            ));
        }

        let admin_password = lookup("ADMIN_PASSWORD")
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| anyhow::anyhow!("ADMIN_PASSWORD is required"))?;

        let history_window = match lookup("HISTORY_WINDOW") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| anyhow::anyhow!("HISTORY_WINDOW must be a positive integer"))?,
            None => DEFAULT_HISTORY_WINDOW,
        };

        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            store_backend,
            database_url,
            admin_password,
            history_window,
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS").unwrap_or_else(|| "*".to_string()),
            log_format,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_RUST_LOG.to_string()),
        })
    }
}
