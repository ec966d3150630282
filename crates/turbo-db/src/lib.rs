//! Predicate and query layer for TurboFeed.
//!
//! Feed queries are expressed as a [`Select`] made of [`Predicate`]s. A
//! `Select` renders to parameterized SQL for a hosted Postgres backend, and
//! can also be executed in-process by [`MemoryDb`] for development and tests.
//!
//! # Example
//!
//! ```rust
//! use turbo_db::{MemoryDb, Predicate, Select, Direction};
//! use serde_json::json;
//!
//! let mut db = MemoryDb::new();
//! db.insert("products", json!({"id": "p1", "price": 12.5, "is_published": true})).unwrap();
//! db.insert("products", json!({"id": "p2", "price": 80.0, "is_published": false})).unwrap();
//!
//! let select = Select::from("products")
//!     .filter(Predicate::eq("is_published", true))
//!     .order_by("price", Direction::Desc)
//!     .limit(10);
//!
//! let (sql, params) = select.to_sql();
//! assert_eq!(sql, "SELECT * FROM products WHERE (is_published = ?) ORDER BY price DESC LIMIT 10");
//! assert_eq!(params.len(), 1);
//!
//! let rows = db.query(&select).unwrap();
//! assert_eq!(rows.len(), 1);
//! ```

mod db;
mod error;
mod predicate;
mod select;
mod types;

pub use db::MemoryDb;
pub use error::DbError;
pub use predicate::Predicate;
pub use select::{Direction, OrderBy, Select};
pub use types::{QueryResult, Row, Value};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        params, DbError, Direction, MemoryDb, OrderBy, Predicate, QueryResult, Row, Select, Value,
    };
}

/// Create a parameter list for predicates that take several values.
///
/// # Example
///
/// ```rust
/// use turbo_db::{params, Value};
///
/// let values: Vec<Value> = params!["Fashion", "Tech"];
/// assert_eq!(values.len(), 2);
/// ```
#[macro_export]
macro_rules! params {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($param:expr),+ $(,)?) => {
        vec![$($crate::Value::from($param)),+]
    };
}
