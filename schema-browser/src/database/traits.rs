//! Query executor trait
//!
//! This trait defines the single operation the gateway needs from a store:
//! run one parameterized statement and hand back its rows.

use crate::schema::{Row, ScalarValue};
use async_trait::async_trait;
use thiserror::Error;

/// Executes statements against the relational store
///
/// Implementations acquire a connection for the duration of one call and
/// release it before returning, on success and on failure alike. Nothing is
/// held between calls, so concurrent callers never share a connection.
#[async_trait]
pub trait QueryExecutor: Send + Sync + 'static {
    /// Execute a statement with bound parameters
    ///
    /// # Arguments
    ///
    /// * `statement` - SQL text using `?` placeholders
    /// * `parameters` - Values bound to the placeholders, in order
    ///
    /// # Returns
    ///
    /// All result rows, each keyed by column name in result-set order
    async fn execute(
        &self,
        statement: &str,
        parameters: &[ScalarValue],
    ) -> Result<Vec<Row>, StoreError>;
}

/// Any connectivity, authentication, statement or decoding failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        StoreError::new(error.to_string())
    }
}
