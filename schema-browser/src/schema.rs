//! Schema types for dynamic database introspection
//!
//! These types carry table metadata and sample rows whose shape is only
//! discovered at runtime. Nothing here knows about any particular table.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Number of rows fetched when sampling a table
pub const SAMPLE_SIZE: u32 = 100;

/// Name of a table as reported by the store's catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableName(String);

impl TableName {
    /// Wrap a name taken from the store's catalog or from a gateway response
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A single cell value
///
/// The store's own types are collapsed into this union at the executor
/// boundary. `Null` is the store's "no value" sentinel and is distinct from
/// an empty string or zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl ScalarValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }
}

impl fmt::Display for ScalarValue {
    /// Canonical string form. `Null` prints as an empty string; callers that
    /// need the `NULL` marker go through the renderer.
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Null => Ok(()),
            ScalarValue::Bool(value) => write!(formatter, "{}", value),
            ScalarValue::Number(value) => write!(formatter, "{}", value),
            ScalarValue::Text(value) => formatter.write_str(value),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Text(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::Text(value)
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Bool(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Number(value.into())
    }
}

impl From<u64> for ScalarValue {
    fn from(value: u64) -> Self {
        ScalarValue::Number(value.into())
    }
}

impl From<f64> for ScalarValue {
    /// Whole values become integers so `1.0` reads as `1`. Non-finite floats
    /// have no JSON form and become `Null`.
    fn from(value: f64) -> Self {
        if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
            return ScalarValue::from(value as i64);
        }
        serde_json::Number::from_f64(value)
            .map(ScalarValue::Number)
            .unwrap_or(ScalarValue::Null)
    }
}

impl<T: Into<ScalarValue>> From<Option<T>> for ScalarValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ScalarValue::Null)
    }
}

/// One result row, keyed by column name in result-set order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(IndexMap<String, ScalarValue>);

impl Row {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<ScalarValue>) {
        self.0.insert(column.into(), value.into());
    }

    /// Look a value up by column name. `None` means the store omitted the column.
    pub fn get(&self, column: &str) -> Option<&ScalarValue> {
        self.0.get(column)
    }

    /// Text value of a column, if present and textual
    pub fn get_text(&self, column: &str) -> Option<&str> {
        match self.0.get(column) {
            Some(ScalarValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<ScalarValue>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(column, value)| (column.into(), value.into()))
                .collect(),
        )
    }
}

/// Key role of a column as reported by the catalog (`COLUMN_KEY`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColumnKey {
    Primary,
    Unique,
    Multiple,
    #[default]
    None,
    Other(String),
}

impl ColumnKey {
    pub fn parse(label: &str) -> Self {
        match label {
            "PRI" => ColumnKey::Primary,
            "UNI" => ColumnKey::Unique,
            "MUL" => ColumnKey::Multiple,
            "" => ColumnKey::None,
            other => ColumnKey::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ColumnKey::Primary => "PRI",
            ColumnKey::Unique => "UNI",
            ColumnKey::Multiple => "MUL",
            ColumnKey::None => "",
            ColumnKey::Other(label) => label,
        }
    }
}

impl Serialize for ColumnKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ColumnKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label.map(|label| ColumnKey::parse(&label)).unwrap_or_default())
    }
}

/// Metadata for one column, in the catalog's wire shape
///
/// ```json
/// {"column_name": "id", "data_type": "int", "column_key": "PRI", "is_nullable": "NO"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name, unique within its table
    #[serde(rename = "column_name")]
    pub name: String,

    /// Store-native type label, passed through untouched
    #[serde(rename = "data_type")]
    pub declared_type: String,

    #[serde(rename = "column_key", default)]
    pub key: ColumnKey,

    #[serde(rename = "is_nullable", with = "yes_no", default)]
    pub is_nullable: bool,
}

impl ColumnDescriptor {
    pub fn is_primary_key(&self) -> bool {
        self.key == ColumnKey::Primary
    }
}

/// The catalog reports nullability as the strings `YES` / `NO`
mod yes_no {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "YES" } else { "NO" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(matches!(label.as_deref(), Some(value) if value.eq_ignore_ascii_case("YES")))
    }
}

/// Column metadata plus a bounded sample of rows for one table
///
/// The two halves come from independent reads and may reflect slightly
/// different moments of a concurrently changing store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub table: TableName,

    /// Columns in ordinal order
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,

    /// At most [`SAMPLE_SIZE`] rows
    #[serde(rename = "data", default)]
    pub rows: Vec<Row>,
}

/// Response from listing tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TablesResponse {
    #[serde(default)]
    pub tables: Vec<TableName>,
}
