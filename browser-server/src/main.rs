use axum::{routing::get, Router};
use schema_browser::{SchemaBrowserLayer, ServerConfig, StoreConfig};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let store_config = match StoreConfig::from_env() {
        Ok(config) => config,
        Err(failure) => {
            error!("Invalid store configuration: {}", failure);
            return ExitCode::FAILURE;
        }
    };
    let server_config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(failure) => {
            error!("Invalid server configuration: {}", failure);
            return ExitCode::FAILURE;
        }
    };

    let app = Router::new()
        .route("/health", get(health_handler))
        .merge(SchemaBrowserLayer::mysql(&server_config.base_path, &store_config).into_router());

    let listener = match tokio::net::TcpListener::bind(server_config.bind_address).await {
        Ok(listener) => listener,
        Err(failure) => {
            error!("Failed to bind {}: {}", server_config.bind_address, failure);
            return ExitCode::FAILURE;
        }
    };

    info!(
        "Server running at http://{}{}",
        server_config.bind_address, server_config.base_path
    );
    info!(
        "Tables at http://{}{}/api/tables",
        server_config.bind_address, server_config.base_path
    );

    if let Err(failure) = axum::serve(listener, app).await {
        error!("Server error: {}", failure);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn health_handler() -> &'static str {
    "Server is healthy"
}
