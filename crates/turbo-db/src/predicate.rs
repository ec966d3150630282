//! Row predicates.

use crate::{Row, Value};
use std::cmp::Ordering;

/// A single condition on a row.
///
/// A [`Select`](crate::Select) combines its predicates with AND.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Column equals value.
    Eq { column: String, value: Value },
    /// Column is present and not null.
    NotNull(String),
    /// Column is greater than or equal to value.
    Gte { column: String, value: Value },
    /// Column is less than or equal to value.
    Lte { column: String, value: Value },
    /// Array column shares at least one element with the values.
    Overlaps { column: String, values: Vec<Value> },
    /// Column equals one of the values.
    In { column: String, values: Vec<Value> },
}

impl Predicate {
    /// Create an equality predicate.
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Eq {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Create a not-null predicate.
    pub fn not_null(column: impl Into<String>) -> Self {
        Predicate::NotNull(column.into())
    }

    /// Create a lower-bound predicate.
    pub fn gte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Gte {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Create an upper-bound predicate.
    pub fn lte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Lte {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Create an array-overlap predicate.
    pub fn overlaps(column: impl Into<String>, values: Vec<Value>) -> Self {
        Predicate::Overlaps {
            column: column.into(),
            values,
        }
    }

    /// Create a set-membership predicate.
    pub fn is_in(column: impl Into<String>, values: Vec<Value>) -> Self {
        Predicate::In {
            column: column.into(),
            values,
        }
    }

    /// Column this predicate constrains.
    pub fn column(&self) -> &str {
        match self {
            Predicate::Eq { column, .. }
            | Predicate::Gte { column, .. }
            | Predicate::Lte { column, .. }
            | Predicate::Overlaps { column, .. }
            | Predicate::In { column, .. } => column,
            Predicate::NotNull(column) => column,
        }
    }

    /// Build SQL WHERE clause component.
    ///
    /// An empty value list can never match, so it renders as `1=0`.
    pub fn to_sql(&self) -> (String, Vec<Value>) {
        match self {
            Predicate::Eq { column, value } => (format!("{} = ?", column), vec![value.clone()]),
            Predicate::NotNull(column) => (format!("{} IS NOT NULL", column), vec![]),
            Predicate::Gte { column, value } => (format!("{} >= ?", column), vec![value.clone()]),
            Predicate::Lte { column, value } => (format!("{} <= ?", column), vec![value.clone()]),
            Predicate::Overlaps { column, values } => {
                if values.is_empty() {
                    return ("1=0".to_string(), vec![]);
                }
                (
                    format!("{} && ARRAY[{}]", column, placeholders(values.len())),
                    values.clone(),
                )
            }
            Predicate::In { column, values } => {
                if values.is_empty() {
                    return ("1=0".to_string(), vec![]);
                }
                (
                    format!("{} IN ({})", column, placeholders(values.len())),
                    values.clone(),
                )
            }
        }
    }

    /// Evaluate the predicate against a row.
    pub fn matches(&self, row: &Row) -> bool {
        let cell = row.get(self.column());
        match self {
            Predicate::Eq { value, .. } => cell.is_some_and(|c| value.matches_json(c)),
            Predicate::NotNull(_) => cell.is_some_and(|c| !c.is_null()),
            Predicate::Gte { value, .. } => cell
                .and_then(|c| value.compare_json(c))
                .is_some_and(|o| o != Ordering::Less),
            Predicate::Lte { value, .. } => cell
                .and_then(|c| value.compare_json(c))
                .is_some_and(|o| o != Ordering::Greater),
            Predicate::Overlaps { values, .. } => match cell {
                Some(serde_json::Value::Array(items)) => items
                    .iter()
                    .any(|item| values.iter().any(|v| v.matches_json(item))),
                _ => false,
            },
            Predicate::In { values, .. } => {
                cell.is_some_and(|c| values.iter().any(|v| v.matches_json(c)))
            }
        }
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}
