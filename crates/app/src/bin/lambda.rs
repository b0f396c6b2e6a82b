//! Parley API - AWS Lambda Runtime

use lambda_http::{run, Error};
use tracing::info;

use parley_app::{build_store, create_app, with_middleware};
use parley_common::Config;
use parley_llm::{LlmConfig, LlmServiceFactory};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config =
        Config::from_env().map_err(|e| Error::from(format!("Configuration error: {}", e)))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.rust_log)),
        )
        .json()
        .without_time()
        .init();

    info!("Initializing Parley API Lambda");

    let llm_config = LlmConfig::from_env()
        .map_err(|e| Error::from(format!("Reply provider configuration error: {}", e)))?;
    let llm = LlmServiceFactory::create(llm_config);

    let store = build_store(&config)
        .await
        .map_err(|e| Error::from(format!("Store initialization error: {:#}", e)))?;

    let app = with_middleware(
        create_app(&config, store, llm),
        &config.cors_allowed_origins,
    );

    info!("Parley API Lambda ready to serve requests");

    run(app).await
}
