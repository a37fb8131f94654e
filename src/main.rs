//! NousQuest Server: multi-tenant session and authorization core.
//!
//! Main entry point that wires all crates together and starts the server.

use tracing_subscriber::{EnvFilter, fmt};

use nousquest_core::config::AppConfig;
use nousquest_core::error::AppError;
use nousquest_database::Stores;

#[tokio::main]
async fn main() {
    let env = std::env::var("NOUSQUEST_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Connect the stores and serve until shutdown.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting NousQuest v{}", env!("CARGO_PKG_VERSION"));

    let stores = Stores::connect(&config.database).await?;
    nousquest_api::run_server(config, stores).await
}
