//! In-memory executor that replays scripted results and records every call

use crate::database::traits::{QueryExecutor, StoreError};
use crate::schema::{Row, ScalarValue};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedCall {
    pub statement: String,
    pub parameters: Vec<ScalarValue>,
}

/// Answers calls in order from a queue of scripted results
#[derive(Default)]
pub(crate) struct RecordingExecutor {
    responses: Mutex<VecDeque<Result<Vec<Row>, StoreError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_with(self, rows: Vec<Row>) -> Self {
        self.responses.lock().unwrap().push_back(Ok(rows));
        self
    }

    pub fn fail_with(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(StoreError::new(message)));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryExecutor for RecordingExecutor {
    async fn execute(
        &self,
        statement: &str,
        parameters: &[ScalarValue],
    ) -> Result<Vec<Row>, StoreError> {
        self.calls.lock().unwrap().push(RecordedCall {
            statement: statement.to_string(),
            parameters: parameters.to_vec(),
        });

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(StoreError::new("no scripted response left")))
    }
}

/// Build a row from `(column, value)` pairs
pub(crate) fn row<V: Into<ScalarValue>>(pairs: Vec<(&str, V)>) -> Row {
    pairs.into_iter().collect()
}

/// Catalog row for one column, in the shape the gateway's column query returns
pub(crate) fn column_row(
    table: &str,
    name: &str,
    data_type: &str,
    key: &str,
    nullable: &str,
) -> Row {
    row(vec![
        ("table_name", table),
        ("column_name", name),
        ("data_type", data_type),
        ("column_key", key),
        ("is_nullable", nullable),
    ])
}
