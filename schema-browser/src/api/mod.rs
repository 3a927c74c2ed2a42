//! REST API endpoints
//!
//! This module contains the two read endpoints of the browser and the mapping
//! from gateway errors to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::database::traits::QueryExecutor;
use crate::gateway::{GatewayError, SchemaGateway};

pub mod tables;

// Re-export handlers for convenience
pub use tables::{describe_table_handler, describe_unnamed_table_handler, list_tables_handler};

/// Create the API router with all endpoints
///
/// * `GET /tables` - `{"tables": [...]}`
/// * `GET /table/{name}` - `{"table", "columns", "data"}`; 400 without a name,
///   404 when the name is not an exact catalog entry, 500 on store failure
///
/// # Arguments
///
/// * `gateway` - Arc-wrapped gateway shared by all handlers
///
/// # Returns
///
/// An Axum Router configured with all API routes
pub fn create_api_router<E: QueryExecutor>(gateway: Arc<SchemaGateway<E>>) -> Router {
    // Axum 0.8 uses {param} syntax; an empty segment never matches it, so
    // `/table/` gets its own route to produce the 400
    Router::new()
        .route("/tables", get(list_tables_handler::<E>))
        .route("/table/{name}", get(describe_table_handler::<E>))
        .route("/table/", get(describe_unnamed_table_handler::<E>))
        .route("/table", get(describe_unnamed_table_handler::<E>))
        .with_state(gateway)
}

/// Convert a gateway error into a JSON error response
///
/// * `InvalidArgument` - 400 `{"message"}`
/// * `TableNotFound` - 404 `{"message", "error"}`
/// * `OperationFailed` - 500 `{"message", "error"}` with `failure_message`
pub(crate) fn error_response(error: &GatewayError, failure_message: &str) -> Response {
    match error {
        GatewayError::InvalidArgument(message) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "message": message })),
        )
            .into_response(),
        GatewayError::TableNotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "message": "Table not found",
                "error": error.to_string()
            })),
        )
            .into_response(),
        GatewayError::OperationFailed(store_error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "message": failure_message,
                "error": store_error.message
            })),
        )
            .into_response(),
    }
}
