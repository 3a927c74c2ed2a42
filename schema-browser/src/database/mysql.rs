//! MySQL / MariaDB query executor implementation

use crate::config::StoreConfig;
use crate::database::traits::{QueryExecutor, StoreError};
use crate::schema::{Row, ScalarValue};
use async_trait::async_trait;
use sqlx::mysql::types::MySqlTime;
use sqlx::mysql::{MySqlArguments, MySqlColumn, MySqlConnectOptions, MySqlRow};
use sqlx::query::Query;
use sqlx::types::chrono::{NaiveDate, NaiveDateTime};
use sqlx::{Column, Connection, MySql, MySqlConnection, Row as _, TypeInfo, ValueRef};
use tracing::{debug, warn};

/// Executor that opens a fresh connection for every call
///
/// Only the connect options are kept between calls. The connection is closed
/// before `execute` returns, whichever way the statement went.
pub struct MySqlExecutor {
    options: MySqlConnectOptions,
}

impl MySqlExecutor {
    /// Create a new executor
    ///
    /// # Arguments
    ///
    /// * `options` - Connect options used for every call
    pub fn new(options: MySqlConnectOptions) -> Self {
        Self { options }
    }

    /// Create an executor from the environment-derived store settings
    pub fn from_config(config: &StoreConfig) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&config.user)
            .password(&config.password);

        Self::new(options)
    }

    /// Bind one scalar to the next placeholder
    fn bind_parameter<'q>(
        query: Query<'q, MySql, MySqlArguments>,
        value: &ScalarValue,
    ) -> Query<'q, MySql, MySqlArguments> {
        match value {
            ScalarValue::Null => query.bind(None::<String>),
            ScalarValue::Bool(value) => query.bind(*value),
            ScalarValue::Number(number) => {
                if let Some(value) = number.as_i64() {
                    query.bind(value)
                } else if let Some(value) = number.as_u64() {
                    query.bind(value)
                } else {
                    query.bind(number.as_f64())
                }
            }
            ScalarValue::Text(value) => query.bind(value.clone()),
        }
    }

    async fn fetch_rows(
        connection: &mut MySqlConnection,
        statement: &str,
        parameters: &[ScalarValue],
    ) -> Result<Vec<Row>, StoreError> {
        let mut query = sqlx::query(statement);
        for parameter in parameters {
            query = Self::bind_parameter(query, parameter);
        }

        let rows = query.fetch_all(&mut *connection).await?;
        rows.iter().map(Self::row_to_scalars).collect()
    }

    /// Convert a MySQL row to a column-name keyed row
    fn row_to_scalars(row: &MySqlRow) -> Result<Row, StoreError> {
        let mut values = Row::new();

        for column in row.columns() {
            let value = Self::extract_column_value(row, column)?;
            values.insert(column.name(), value);
        }

        Ok(values)
    }

    /// Extract a column value and collapse it into a scalar
    fn extract_column_value(row: &MySqlRow, column: &MySqlColumn) -> Result<ScalarValue, StoreError> {
        let index = column.ordinal();
        let type_name = column.type_info().name();

        if row.try_get_raw(index)?.is_null() {
            return Ok(ScalarValue::Null);
        }

        let value = match type_name {
            // TINYINT(1) is reported as BOOLEAN but may hold any tinyint value
            "BOOLEAN" => row
                .try_get::<i64, _>(index)
                .map(ScalarValue::from)
                .or_else(|_| row.try_get::<u64, _>(index).map(ScalarValue::from))
                .ok(),
            "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
                row.try_get::<i64, _>(index).ok().map(ScalarValue::from)
            }
            "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
            | "BIGINT UNSIGNED" => row.try_get::<u64, _>(index).ok().map(ScalarValue::from),
            "YEAR" => row
                .try_get_unchecked::<u16, _>(index)
                .ok()
                .map(|value| ScalarValue::from(value as u64)),
            "FLOAT" => row.try_get::<f32, _>(index).ok().map(float_to_scalar),
            "DOUBLE" => row.try_get::<f64, _>(index).ok().map(ScalarValue::from),
            "DATE" => row
                .try_get::<NaiveDate, _>(index)
                .map(|value| value.to_string())
                .ok()
                .or_else(|| Self::raw_temporal(row, index, false))
                .map(ScalarValue::Text),
            "DATETIME" | "TIMESTAMP" => row
                .try_get::<NaiveDateTime, _>(index)
                .map(|value| value.to_string())
                .ok()
                .or_else(|| Self::raw_temporal(row, index, true))
                .map(ScalarValue::Text),
            "TIME" => row
                .try_get::<MySqlTime, _>(index)
                .ok()
                .map(|value| ScalarValue::Text(time_to_text(&value))),
            "JSON" => row
                .try_get::<serde_json::Value, _>(index)
                .ok()
                .map(|value| ScalarValue::Text(value.to_string())),
            "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BIT" => row
                .try_get::<Vec<u8>, _>(index)
                .ok()
                .map(binary_to_scalar),
            // DECIMAL, ENUM, SET and character types read as text below
            _ => None,
        };

        if let Some(value) = value {
            return Ok(value);
        }

        // Fallback: textual form, then raw bytes
        if let Ok(value) = row.try_get_unchecked::<String, _>(index) {
            return Ok(ScalarValue::Text(value));
        }
        if let Ok(value) = row.try_get_unchecked::<Vec<u8>, _>(index) {
            return Ok(binary_to_scalar(value));
        }

        Err(StoreError::new(format!(
            "Unsupported value in column '{}' of type {}",
            column.name(),
            type_name
        )))
    }

    /// Dates chrono cannot represent (zero dates, zero month or day)
    fn raw_temporal(row: &MySqlRow, index: usize, with_time: bool) -> Option<String> {
        row.try_get_unchecked::<Vec<u8>, _>(index)
            .ok()
            .and_then(|bytes| temporal_from_binary(&bytes, with_time))
    }
}

/// Go through the shortest decimal form so `0.1` stays `0.1` after widening
fn float_to_scalar(value: f32) -> ScalarValue {
    value
        .to_string()
        .parse::<f64>()
        .map(ScalarValue::from)
        .unwrap_or(ScalarValue::Null)
}

/// `[-]HH:MM:SS[.ffffff]`, hours may exceed 24
fn time_to_text(time: &MySqlTime) -> String {
    let sign = if time.is_negative() { "-" } else { "" };
    let mut text = format!(
        "{}{:02}:{:02}:{:02}",
        sign,
        time.hours(),
        time.minutes(),
        time.seconds()
    );
    if time.microseconds() != 0 {
        text.push_str(&format!(".{:06}", time.microseconds()));
    }
    text
}

/// Format a binary-protocol DATE / DATETIME value, length byte included
///
/// Layout after the length byte: year (u16 LE), month, day, then optionally
/// hour, minute, second and microseconds (u32 LE). Omitted fields are zero.
fn temporal_from_binary(bytes: &[u8], with_time: bool) -> Option<String> {
    let (&length, payload) = bytes.split_first()?;
    let payload = payload.get(..length as usize)?;
    let field = |position: usize| payload.get(position).copied().unwrap_or(0);

    let year = u16::from_le_bytes([field(0), field(1)]);
    let date = format!("{:04}-{:02}-{:02}", year, field(2), field(3));
    if !with_time {
        return Some(date);
    }

    let mut text = format!("{} {:02}:{:02}:{:02}", date, field(4), field(5), field(6));
    let microseconds = u32::from_le_bytes([field(7), field(8), field(9), field(10)]);
    if microseconds != 0 {
        text.push_str(&format!(".{:06}", microseconds));
    }
    Some(text)
}

/// Binary data shows as text when it is valid UTF-8, otherwise as a size marker
fn binary_to_scalar(bytes: Vec<u8>) -> ScalarValue {
    match String::from_utf8(bytes) {
        Ok(text) => ScalarValue::Text(text),
        Err(error) => ScalarValue::Text(format!("[BLOB: {} bytes]", error.as_bytes().len())),
    }
}

#[async_trait]
impl QueryExecutor for MySqlExecutor {
    async fn execute(
        &self,
        statement: &str,
        parameters: &[ScalarValue],
    ) -> Result<Vec<Row>, StoreError> {
        debug!(parameters = parameters.len(), "Executing statement: {}", statement.trim());

        let mut connection = MySqlConnection::connect_with(&self.options).await?;
        let result = Self::fetch_rows(&mut connection, statement, parameters).await;

        if let Err(error) = connection.close().await {
            warn!("Failed to close store connection: {}", error);
        }

        result
    }
}
