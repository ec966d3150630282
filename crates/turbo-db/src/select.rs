//! Select query builder.

use crate::{Predicate, Value};
use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// A single ORDER BY term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: Direction,
}

/// A select query against one table.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    /// Table to read from.
    pub table: String,
    /// Predicates, combined with AND.
    pub predicates: Vec<Predicate>,
    /// Ordering terms, applied left to right.
    pub order_by: Vec<OrderBy>,
    /// Maximum number of rows.
    pub limit: Option<usize>,
}

impl Select {
    /// Start a query on a table.
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            predicates: Vec::new(),
            order_by: Vec::new(),
            limit: None,
        }
    }

    /// Add a predicate.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Add several predicates.
    pub fn filters(mut self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.predicates.extend(predicates);
        self
    }

    /// Add an ordering term.
    pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order_by.push(OrderBy {
            column: column.into(),
            direction,
        });
        self
    }

    /// Set the row limit.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Build SQL WHERE clause from predicates.
    pub fn where_clause(&self) -> (String, Vec<Value>) {
        if self.predicates.is_empty() {
            return ("1=1".to_string(), vec![]);
        }

        let mut clauses = Vec::new();
        let mut all_values = Vec::new();

        for predicate in &self.predicates {
            let (clause, values) = predicate.to_sql();
            clauses.push(format!("({})", clause));
            all_values.extend(values);
        }

        (clauses.join(" AND "), all_values)
    }

    /// Build the full SQL statement.
    pub fn to_sql(&self) -> (String, Vec<Value>) {
        let (where_clause, values) = self.where_clause();
        let mut sql = format!("SELECT * FROM {} WHERE {}", self.table, where_clause);

        if !self.order_by.is_empty() {
            let terms = self
                .order_by
                .iter()
                .map(|o| format!("{} {}", o.column, o.direction.as_sql()))
                .collect::<Vec<_>>()
                .join(", ");
            sql.push_str(&format!(" ORDER BY {}", terms));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        (sql, values)
    }
}
