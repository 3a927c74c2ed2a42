//! SchemaBrowserLayer - Main Axum integration layer
//!
//! This module provides the entry point for mounting the browser's HTTP
//! surface into an Axum application.

use crate::config::StoreConfig;
use crate::database::mysql::MySqlExecutor;
use crate::database::traits::QueryExecutor;
use crate::gateway::SchemaGateway;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::api::create_api_router;

/// Main layer for mounting the schema browser API into an Axum application
///
/// # Example
///
/// ```rust,no_run
/// use axum::Router;
/// use schema_browser::{SchemaBrowserLayer, StoreConfig};
///
/// # fn example() -> Result<(), schema_browser::ConfigError> {
/// let config = StoreConfig::from_env()?;
/// let browser = SchemaBrowserLayer::mysql("/browser", &config);
/// let app: Router = Router::new().merge(browser.into_router());
/// # Ok(())
/// # }
/// ```
pub struct SchemaBrowserLayer<E: QueryExecutor> {
    base_path: String,
    gateway: Arc<SchemaGateway<E>>,
}

impl<E: QueryExecutor> SchemaBrowserLayer<E> {
    /// Create a new browser mounted at the given base path
    ///
    /// # Arguments
    ///
    /// * `base_path` - URL prefix for the API (e.g., "/browser"), may be empty
    /// * `gateway` - The gateway serving both endpoints
    pub fn new(base_path: impl Into<String>, gateway: SchemaGateway<E>) -> Self {
        Self {
            base_path: base_path.into().trim_end_matches('/').to_string(),
            gateway: Arc::new(gateway),
        }
    }

    /// Convert into an Axum Router that can be merged
    ///
    /// The returned router serves:
    /// - `GET {base_path}/api/tables`
    /// - `GET {base_path}/api/table/{name}`
    ///
    /// with permissive CORS for development.
    pub fn into_router(self) -> Router {
        let api_path = format!("{}/api", self.base_path);
        info!(
            "Schema browser API mounted at {} for database '{}'",
            api_path,
            self.gateway.database()
        );

        Router::new()
            .nest(&api_path, create_api_router(self.gateway))
            .layer(CorsLayer::permissive())
    }
}

impl SchemaBrowserLayer<MySqlExecutor> {
    /// Create a new browser for MySQL / MariaDB
    ///
    /// # Arguments
    ///
    /// * `base_path` - The URL path where the API will be mounted
    /// * `config` - Store settings; the database name scopes every query
    pub fn mysql(base_path: impl Into<String>, config: &StoreConfig) -> Self {
        let gateway = SchemaGateway::new(MySqlExecutor::from_config(config), &config.database);
        Self::new(base_path, gateway)
    }
}
