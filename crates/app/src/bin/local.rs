// Parley API - Local Development Server

use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use parley_app::{build_store, create_app, init_tracing, with_middleware};
use parley_common::Config;
use parley_llm::{LlmConfig, LlmServiceFactory};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format, &config.rust_log);

    info!("Starting Parley API local development server");

    let llm_config = LlmConfig::from_env().map_err(|e| {
        error!("Failed to load reply provider configuration: {}", e);
        e
    })?;
    if llm_config.api_key.is_empty() {
        info!("No provider API key configured; auto-replies will fail until one is set");
    }
    let llm = LlmServiceFactory::create(llm_config);

    let store = build_store(&config).await.map_err(|e| {
        error!("Failed to initialize conversation store: {:#}", e);
        e
    })?;

    let app = with_middleware(
        create_app(&config, store, llm),
        &config.cors_allowed_origins,
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Health check available at http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
