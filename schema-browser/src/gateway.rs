//! Schema and data gateway
//!
//! Composes executor calls into the two read operations the HTTP surface
//! exposes: listing tables and describing one table with a row sample.

use crate::database::traits::{QueryExecutor, StoreError};
use crate::schema::{
    ColumnDescriptor, ColumnKey, Row, ScalarValue, TableName, TableSnapshot, SAMPLE_SIZE,
};
use thiserror::Error;
use tracing::warn;

const LIST_TABLES_STATEMENT: &str = r#"
    SELECT table_name AS table_name
    FROM information_schema.tables
    WHERE table_schema = ?
"#;

const DESCRIBE_COLUMNS_STATEMENT: &str = r#"
    SELECT
        table_name AS table_name,
        column_name AS column_name,
        data_type AS data_type,
        column_key AS column_key,
        is_nullable AS is_nullable
    FROM information_schema.columns
    WHERE table_schema = ? AND table_name = ?
    ORDER BY ordinal_position
"#;

/// Gateway error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Malformed or missing request input, detected before touching the store
    #[error("{0}")]
    InvalidArgument(String),

    /// The name does not appear in the store's catalog
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// The store failed while serving the request
    #[error("{0}")]
    OperationFailed(#[from] StoreError),
}

/// Read-only access to the catalog and to table samples, scoped to one
/// logical database
pub struct SchemaGateway<E: QueryExecutor> {
    executor: E,
    database: String,
}

impl<E: QueryExecutor> SchemaGateway<E> {
    /// Create a new gateway
    ///
    /// # Arguments
    ///
    /// * `executor` - Executor used for every store call
    /// * `database` - Logical database (schema) all queries are scoped to
    pub fn new(executor: E, database: impl Into<String>) -> Self {
        Self {
            executor,
            database: database.into(),
        }
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// Quote an identifier for interpolation into statement text
    ///
    /// Only applied to names already confirmed against the catalog.
    fn quote_identifier(identifier: &str) -> String {
        format!("`{}`", identifier.replace('`', "``"))
    }

    /// List every table name in the configured database
    ///
    /// Issues exactly one executor call. Order is whatever the catalog returns.
    pub async fn list_tables(&self) -> Result<Vec<TableName>, GatewayError> {
        let rows = self
            .executor
            .execute(LIST_TABLES_STATEMENT, &[self.database_parameter()])
            .await?;

        let tables = rows
            .iter()
            .map(|row| required_text(row, "table_name").map(TableName::new))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tables)
    }

    /// Column metadata plus up to [`SAMPLE_SIZE`] rows of one table
    ///
    /// The column lookup doubles as the catalog-membership check: a name with
    /// no catalog columns is rejected and never reaches the sample statement.
    /// The catalog compares names under its own collation, so only rows whose
    /// `table_name` equals `name` byte for byte count as a match.
    /// The two reads are not transactionally consistent with each other.
    ///
    /// # Arguments
    ///
    /// * `name` - Table name as received from the caller
    pub async fn describe_table(&self, name: &str) -> Result<TableSnapshot, GatewayError> {
        if name.is_empty() {
            return Err(GatewayError::InvalidArgument(
                "Table name is required".to_string(),
            ));
        }

        let column_rows = self
            .executor
            .execute(
                DESCRIBE_COLUMNS_STATEMENT,
                &[self.database_parameter(), ScalarValue::from(name)],
            )
            .await?;

        let mut columns = Vec::with_capacity(column_rows.len());
        for row in &column_rows {
            if required_text(row, "table_name")? == name {
                columns.push(column_from_catalog(row)?);
            }
        }

        if columns.is_empty() {
            warn!(
                "Rejected table '{}': not present in catalog of database '{}'",
                name, self.database
            );
            return Err(GatewayError::TableNotFound(name.to_string()));
        }

        let sample_statement = format!("SELECT * FROM {} LIMIT ?", Self::quote_identifier(name));
        let rows = self
            .executor
            .execute(&sample_statement, &[ScalarValue::from(SAMPLE_SIZE as u64)])
            .await?;

        Ok(TableSnapshot {
            table: TableName::new(name),
            columns,
            rows,
        })
    }

    fn database_parameter(&self) -> ScalarValue {
        ScalarValue::from(self.database.as_str())
    }
}

fn required_text(row: &Row, column: &str) -> Result<String, StoreError> {
    row.get_text(column)
        .map(str::to_string)
        .ok_or_else(|| StoreError::new(format!("Catalog row is missing text column '{}'", column)))
}

/// Build a column descriptor from one row of the column catalog query
fn column_from_catalog(row: &Row) -> Result<ColumnDescriptor, StoreError> {
    Ok(ColumnDescriptor {
        name: required_text(row, "column_name")?,
        declared_type: required_text(row, "data_type")?,
        key: row
            .get_text("column_key")
            .map(ColumnKey::parse)
            .unwrap_or_default(),
        is_nullable: row
            .get_text("is_nullable")
            .is_some_and(|value| value.eq_ignore_ascii_case("YES")),
    })
}
