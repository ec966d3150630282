//! Parameter values and JSON rows.

use crate::DbError;
use serde::de::DeserializeOwned;
use serde_json::Map;
use std::cmp::Ordering;
use std::fmt;

/// A database value that can be used as a query parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Integer(i64),
    /// Real/float value.
    Real(f64),
    /// Text value.
    Text(String),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// Ordering of a JSON cell relative to this value.
    ///
    /// Numbers compare numerically, strings lexically, booleans by value.
    /// Anything else (including nulls) is unordered.
    pub(crate) fn compare_json(&self, cell: &serde_json::Value) -> Option<Ordering> {
        match (self, cell) {
            (Value::Bool(a), serde_json::Value::Bool(b)) => Some(b.cmp(a)),
            (Value::Text(a), serde_json::Value::String(b)) => Some(b.as_str().cmp(a.as_str())),
            (Value::Integer(_) | Value::Real(_), serde_json::Value::Number(n)) => {
                n.as_f64()?.partial_cmp(&self.as_number()?)
            }
            _ => None,
        }
    }

    /// Check whether a JSON cell holds this value.
    pub(crate) fn matches_json(&self, cell: &serde_json::Value) -> bool {
        match self {
            Value::Null => cell.is_null(),
            _ => self.compare_json(cell) == Some(Ordering::Equal),
        }
    }
}

/// Renders the value as a SQL literal.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
            Value::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => |$v:ident| $body:expr),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from($v: $ty) -> Self {
                    $body
                }
            }
        )*
    };
}

value_from! {
    bool => |v| Value::Bool(v),
    i32 => |v| Value::Integer(i64::from(v)),
    i64 => |v| Value::Integer(v),
    u32 => |v| Value::Integer(i64::from(v)),
    // Counters beyond i64::MAX saturate.
    u64 => |v| Value::Integer(i64::try_from(v).unwrap_or(i64::MAX)),
    f64 => |v| Value::Real(v),
    &str => |v| Value::Text(v.to_string()),
    String => |v| Value::Text(v),
    &String => |v| Value::Text(v.clone()),
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// One table row.
///
/// Rows are JSON objects so that joined sub-objects (e.g. a product's
/// creator profile) travel with the row unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    cells: Map<String, serde_json::Value>,
}

impl Row {
    /// Create a row from a JSON object.
    pub fn new(cells: Map<String, serde_json::Value>) -> Self {
        Self { cells }
    }

    /// Create a row from any JSON value, rejecting non-objects.
    pub fn from_json(value: serde_json::Value) -> Result<Self, DbError> {
        match value {
            serde_json::Value::Object(cells) => Ok(Self { cells }),
            other => Err(DbError::NotAnObject(json_kind(&other))),
        }
    }

    /// Get a cell by column name.
    pub fn get(&self, column: &str) -> Option<&serde_json::Value> {
        self.cells.get(column)
    }

    /// Get the column names.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(|k| k.as_str())
    }

    /// Decode the row into a typed struct.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, DbError> {
        let json = serde_json::Value::Object(self.cells.clone());
        Ok(serde_json::from_value(json)?)
    }
}

/// Rows matched by a select, in result order.
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    pub rows: Vec<Row>,
}

impl QueryResult {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Decode every row, failing on the first mismatch.
    pub fn decode_all<T: DeserializeOwned>(&self) -> Result<Vec<T>, DbError> {
        self.rows.iter().map(Row::decode).collect()
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
