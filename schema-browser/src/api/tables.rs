//! Table listing and describe endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::error;

use crate::api::error_response;
use crate::database::traits::QueryExecutor;
use crate::gateway::{GatewayError, SchemaGateway};
use crate::schema::TablesResponse;

/// Handler for GET /api/tables
///
/// Returns the names of all tables in the configured database.
///
/// Response:
/// ```json
/// { "tables": ["customers", "orders"] }
/// ```
pub async fn list_tables_handler<E: QueryExecutor>(
    State(gateway): State<Arc<SchemaGateway<E>>>,
) -> Response {
    match gateway.list_tables().await {
        Ok(tables) => (StatusCode::OK, Json(TablesResponse { tables })).into_response(),
        Err(failure) => {
            error!("Failed to list tables: {}", failure);
            error_response(&failure, "Failed to get tables")
        }
    }
}

/// Handler for GET /api/table/{name}
///
/// Returns the column metadata of one table and up to 100 of its rows.
///
/// Response:
/// ```json
/// {
///   "table": "orders",
///   "columns": [{"column_name": "id", "data_type": "int", "column_key": "PRI", "is_nullable": "NO"}],
///   "data": [{"id": 1}]
/// }
/// ```
pub async fn describe_table_handler<E: QueryExecutor>(
    State(gateway): State<Arc<SchemaGateway<E>>>,
    Path(name): Path<String>,
) -> Response {
    describe(&gateway, &name).await
}

/// Handler for GET /api/table/ (no name supplied)
pub async fn describe_unnamed_table_handler<E: QueryExecutor>(
    State(gateway): State<Arc<SchemaGateway<E>>>,
) -> Response {
    describe(&gateway, "").await
}

async fn describe<E: QueryExecutor>(gateway: &SchemaGateway<E>, name: &str) -> Response {
    match gateway.describe_table(name).await {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(failure) => {
            if let GatewayError::OperationFailed(_) = failure {
                error!("Failed to describe table '{}': {}", name, failure);
            }
            error_response(&failure, "Operation failed")
        }
    }
}
