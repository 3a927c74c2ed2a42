//! # schema-browser
//!
//! Browse an unknown MySQL / MariaDB database: list its tables, then inspect
//! one table's column metadata and a sample of its rows, without any
//! table-specific code.
//!
//! ## Components
//!
//! - [`database`] - the query executor; one short-lived connection per call
//! - [`gateway`] - "list tables" and "describe + sample one table"
//! - [`api`] / [`layer`] - the read-only HTTP surface as an Axum router
//! - [`client`] - the client-side state machine that drives both fetches
//! - [`render`] - projects any column set and row set onto a display grid
//!
//! ## Security Warning
//!
//! **This is a development tool only!**
//!
//! - No authentication/authorization built-in
//! - Exposes full database schema and a sample of every table's data
//! - Should never be exposed in production or public networks
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use axum::{Router, routing::get};
//! use schema_browser::{SchemaBrowserLayer, StoreConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = StoreConfig::from_env().unwrap();
//!
//!     let app: Router = Router::new()
//!         .route("/", get(|| async { "Hello, World!" }))
//!         .merge(SchemaBrowserLayer::mysql("/browser", &config).into_router());
//!
//!     // Serve the application...
//! }
//! ```

// Public modules
pub mod api;
pub mod client;
pub mod config;
pub mod database;
pub mod gateway;
pub mod layer;
pub mod render;
pub mod schema;

// Public exports
pub use client::{BrowserController, BrowserState, ClientFetchError, HttpTableSource, TableSource};
pub use config::{ConfigError, ServerConfig, StoreConfig};
pub use gateway::{GatewayError, SchemaGateway};
pub use layer::SchemaBrowserLayer;
pub use render::{render_snapshot, render_view, BrowserView, DisplayGrid};
pub use schema::{ColumnDescriptor, ColumnKey, Row, ScalarValue, TableName, TableSnapshot};

// Re-export the executor
pub use database::mysql::MySqlExecutor;
pub use database::traits::{QueryExecutor, StoreError};
