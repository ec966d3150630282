//! In-process store over a JSON dataset.

use super::{FavoriteEdge, FeedStore, FollowEdge, FAVORITES_TABLE, FOLLOWS_TABLE};
use crate::catalog::{Creator, ProductRow};
use crate::error::{FeedError, StoreError};
use crate::filter::PRODUCTS_TABLE;
use crate::ids::{CreatorId, ProductId, UserId};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use turbo_db::{Direction, MemoryDb, Predicate, Select};

/// Everything a feed reads, as one JSON document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub creators: Vec<Creator>,
    pub products: Vec<ProductRow>,
    pub follows: Vec<FollowEdge>,
    pub favorites: Vec<FavoriteEdge>,
}

impl Dataset {
    pub fn from_json(input: &str) -> Result<Self, FeedError> {
        Ok(serde_json::from_str(input)?)
    }
}

#[derive(Deserialize)]
struct FavoriteCategories {
    #[serde(default)]
    categories: Vec<String>,
}

/// [`FeedStore`] backed by [`MemoryDb`].
///
/// Products are joined with their creator profile on load (a left join: a
/// product whose creator is missing keeps `creator: None`). Favorites carry
/// the categories of the favorited product.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    db: MemoryDb,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        let mut db = MemoryDb::new();
        db.create_table(PRODUCTS_TABLE);
        db.create_table(FOLLOWS_TABLE);
        db.create_table(FAVORITES_TABLE);
        Self { db }
    }

    pub fn from_dataset(dataset: Dataset) -> Result<Self, FeedError> {
        let mut store = Self::new();

        let creators: HashMap<CreatorId, Creator> = dataset
            .creators
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();

        let mut categories: HashMap<ProductId, Vec<String>> = HashMap::new();
        for mut row in dataset.products {
            row.creator = creators.get(&row.creator_id).cloned();
            categories.insert(row.id.clone(), row.categories.clone());
            store.insert_product(row)?;
        }

        for edge in dataset.follows {
            store.db.insert(FOLLOWS_TABLE, serde_json::to_value(&edge)?)?;
        }

        for edge in dataset.favorites {
            let mut cells = serde_json::to_value(&edge)?;
            cells["created_at"] = sortable_timestamp(edge.created_at);
            cells["categories"] =
                serde_json::to_value(categories.get(&edge.product_id).cloned().unwrap_or_default())?;
            store.db.insert(FAVORITES_TABLE, cells)?;
        }

        Ok(store)
    }

    pub fn from_json(input: &str) -> Result<Self, FeedError> {
        Self::from_dataset(Dataset::from_json(input)?)
    }

    /// Insert an already-joined product row.
    pub fn insert_product(&mut self, row: ProductRow) -> Result<(), FeedError> {
        let mut cells = serde_json::to_value(&row)?;
        cells["created_at"] = sortable_timestamp(row.created_at);
        self.db.insert(PRODUCTS_TABLE, cells)?;
        Ok(())
    }

    pub fn product_count(&self) -> usize {
        self.db.count(PRODUCTS_TABLE)
    }
}

/// Fixed-width RFC 3339, so timestamps order correctly as strings.
fn sortable_timestamp(at: DateTime<Utc>) -> serde_json::Value {
    serde_json::Value::String(at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[async_trait]
impl FeedStore for MemoryStore {
    async fn followed_creators(&self, follower: &UserId) -> Result<Vec<CreatorId>, StoreError> {
        let select = Select::from(FOLLOWS_TABLE).filter(Predicate::eq("follower_id", follower));
        let edges: Vec<FollowEdge> = self.db.query_as(&select)?;
        Ok(edges.into_iter().map(|e| e.creator_id).collect())
    }

    async fn favorite_categories(
        &self,
        user: &UserId,
        limit: usize,
    ) -> Result<Vec<Vec<String>>, StoreError> {
        let select = Select::from(FAVORITES_TABLE)
            .filter(Predicate::eq("user_id", user))
            .order_by("created_at", Direction::Desc)
            .limit(limit);
        let rows: Vec<FavoriteCategories> = self.db.query_as(&select)?;
        Ok(rows.into_iter().map(|r| r.categories).collect())
    }

    async fn fetch_products(&self, select: &Select) -> Result<Vec<ProductRow>, StoreError> {
        Ok(self.db.query_as(select)?)
    }
}
