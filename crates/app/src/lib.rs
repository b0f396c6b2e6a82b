//! Parley application composition root
//!
//! Picks the persistence backend, builds domain state and composes the
//! router with shared middleware.

use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use parley_auth::AdminGate;
use parley_common::{Config, LogFormat, StoreBackend};
use parley_conversations::{
    ConversationStore, ConversationsState, InMemoryConversationStore, PgConversationStore,
};
use parley_llm::LlmService;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Request bodies above this size are rejected with 413
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Connect to the configured Persistence Gateway, running migrations for Postgres
pub async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn ConversationStore>> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory conversation store; data is lost on restart");
            Ok(Arc::new(InMemoryConversationStore::new()))
        }
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required when STORE_BACKEND=postgres")?;

            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(url)
                .await
                .context("Database connection failed")?;

            sqlx::migrate!("../../migrations")
                .run(&pool)
                .await
                .context("Database migration failed")?;

            tracing::info!("Database connection established");
            Ok(Arc::new(PgConversationStore::new(pool)))
        }
    }
}

/// Create the main application router with all routes
pub fn create_app(
    config: &Config,
    store: Arc<dyn ConversationStore>,
    llm: Arc<dyn LlmService>,
) -> Router {
    let conversations_state = ConversationsState::new(
        store,
        llm,
        AdminGate::new(config.admin_password.clone()),
        config.history_window,
    );

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { concat!("Parley API v", env!("CARGO_PKG_VERSION")) }),
        )
        .merge(parley_conversations::routes().with_state(conversations_state))
}

/// Apply the shared HTTP middleware stack.
///
/// CORS sits directly on the router: its inner response body must be
/// `Default`, which the body-limit response body is not.
pub fn with_middleware(app: Router, cors_origins: &str) -> Router {
    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(body_limit_layer())
            .layer(build_cors_layer(cors_origins))
            .into_inner(),
    )
}

/// Build a CORS layer from a comma-separated origin list; `*` allows any origin
pub fn build_cors_layer(origins: &str) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT]);

    if origins.trim() == "*" {
        return base.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("CORS: Invalid origin in config: {}", origin);
                None
            })
        })
        .collect();

    if parsed.is_empty() {
        tracing::warn!("CORS: No valid origins configured, denying cross-origin requests");
        base.allow_origin(AllowOrigin::exact(HeaderValue::from_static("null")))
    } else {
        base.allow_origin(parsed)
    }
}

pub fn body_limit_layer() -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(MAX_BODY_BYTES)
}

/// Install the global tracing subscriber
pub fn init_tracing(format: LogFormat, default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .pretty()
            .init(),
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
