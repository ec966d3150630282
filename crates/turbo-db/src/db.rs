//! In-process query execution.

use crate::{DbError, Direction, QueryResult, Row, Select};
use serde::de::DeserializeOwned;
use std::cmp::Ordering;
use std::collections::HashMap;

/// In-memory database of JSON rows.
///
/// Executes [`Select`] queries with the same semantics the hosted backend
/// gives them: AND of predicates, stable multi-key ordering, then limit.
#[derive(Debug, Clone, Default)]
pub struct MemoryDb {
    tables: HashMap<String, Vec<Row>>,
}

impl MemoryDb {
    /// Create an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table, keeping any rows already present.
    pub fn create_table(&mut self, table: &str) {
        self.tables.entry(table.to_string()).or_default();
    }

    /// Insert a row, creating the table on first use.
    pub fn insert(&mut self, table: &str, row: serde_json::Value) -> Result<(), DbError> {
        let row = Row::from_json(row)?;
        self.tables.entry(table.to_string()).or_default().push(row);
        Ok(())
    }

    /// Number of rows in a table.
    pub fn count(&self, table: &str) -> usize {
        self.tables.get(table).map(Vec::len).unwrap_or(0)
    }

    /// Execute a select and return raw rows.
    pub fn query(&self, select: &Select) -> Result<QueryResult, DbError> {
        let rows = self
            .tables
            .get(&select.table)
            .ok_or_else(|| DbError::UnknownTable(select.table.clone()))?;

        let mut matched: Vec<Row> = rows
            .iter()
            .filter(|row| select.predicates.iter().all(|p| p.matches(row)))
            .cloned()
            .collect();

        if !select.order_by.is_empty() {
            // sort_by is stable, so insertion order breaks remaining ties
            matched.sort_by(|a, b| {
                for term in &select.order_by {
                    let ord = compare_cells(a.get(&term.column), b.get(&term.column));
                    let ord = match term.direction {
                        Direction::Asc => ord,
                        Direction::Desc => ord.reverse(),
                    };
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                Ordering::Equal
            });
        }

        if let Some(limit) = select.limit {
            matched.truncate(limit);
        }

        Ok(QueryResult::new(matched))
    }

    /// Execute a select and decode the rows.
    pub fn query_as<T: DeserializeOwned>(&self, select: &Select) -> Result<Vec<T>, DbError> {
        self.query(select)?.decode_all()
    }
}

/// Order two cells with NULL treated as the largest value, which matches
/// Postgres defaults once DESC reverses it (NULLS LAST asc, NULLS FIRST desc).
fn compare_cells(a: Option<&serde_json::Value>, b: Option<&serde_json::Value>) -> Ordering {
    use serde_json::Value as J;

    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(J::Number(x)), Some(J::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(J::String(x)), Some(J::String(y))) => x.cmp(y),
        (Some(J::Bool(x)), Some(J::Bool(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{params, Predicate};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Item {
        id: String,
    }

    fn db() -> MemoryDb {
        let mut db = MemoryDb::new();
        for (id, price, store) in [
            ("a", 10.0, "Amazon"),
            ("b", 30.0, "Etsy"),
            ("c", 20.0, "Amazon"),
            ("d", 20.0, "Target"),
        ] {
            db.insert("products", json!({"id": id, "price": price, "store": store}))
                .unwrap();
        }
        db
    }

    fn ids(items: Vec<Item>) -> Vec<String> {
        items.into_iter().map(|i| i.id).collect()
    }

    #[test]
    fn test_unknown_table() {
        let err = db().query(&Select::from("missing")).unwrap_err();
        assert!(matches!(err, DbError::UnknownTable(t) if t == "missing"));
    }

    #[test]
    fn test_insert_rejects_non_object() {
        let mut db = MemoryDb::new();
        assert!(matches!(
            db.insert("products", json!("nope")),
            Err(DbError::NotAnObject("string"))
        ));
        assert_eq!(db.count("products"), 0);
    }

    #[test]
    fn test_filter_and_order() {
        let select = Select::from("products")
            .filter(Predicate::is_in("store", params!["Amazon", "Target"]))
            .order_by("price", Direction::Desc);
        let items: Vec<Item> = db().query_as(&select).unwrap();
        // c and d tie on price; insertion order is kept
        assert_eq!(ids(items), vec!["c", "d", "a"]);
    }

    #[test]
    fn test_secondary_order_and_limit() {
        let select = Select::from("products")
            .order_by("price", Direction::Asc)
            .order_by("id", Direction::Desc)
            .limit(3);
        let items: Vec<Item> = db().query_as(&select).unwrap();
        assert_eq!(ids(items), vec!["a", "d", "c"]);
    }

    #[test]
    fn test_nulls_sort_last() {
        let mut db = MemoryDb::new();
        db.insert("t", json!({"id": "x", "rank": null})).unwrap();
        db.insert("t", json!({"id": "y", "rank": 1})).unwrap();
        let items: Vec<Item> = db
            .query_as(&Select::from("t").order_by("rank", Direction::Asc))
            .unwrap();
        assert_eq!(ids(items), vec!["y", "x"]);
    }

    #[test]
    fn test_empty_table_is_empty_result() {
        let mut db = MemoryDb::new();
        db.create_table("follows");
        assert!(db.query(&Select::from("follows")).unwrap().is_empty());
    }
}
