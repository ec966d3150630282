//! Storage collaborator seam.
//!
//! The hosted backend owns products, follow edges and favorite edges; the
//! feed only reads them through [`FeedStore`].

mod memory;

pub use memory::{Dataset, MemoryStore};

use crate::catalog::ProductRow;
use crate::error::StoreError;
use crate::ids::{CreatorId, ProductId, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use turbo_db::Select;

/// Table of follow edges.
pub const FOLLOWS_TABLE: &str = "follows";
/// Table of favorite edges.
pub const FAVORITES_TABLE: &str = "favorites";

/// A follower → creator edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowEdge {
    pub follower_id: UserId,
    pub creator_id: CreatorId,
}

/// A user → product favorite edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEdge {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub created_at: DateTime<Utc>,
}

/// Read access to the backend.
#[async_trait]
pub trait FeedStore: Send + Sync {
    /// Creators the user follows.
    async fn followed_creators(&self, follower: &UserId) -> Result<Vec<CreatorId>, StoreError>;

    /// Category lists of the user's most recent favorites, newest first.
    async fn favorite_categories(
        &self,
        user: &UserId,
        limit: usize,
    ) -> Result<Vec<Vec<String>>, StoreError>;

    /// Run a product query. Rows come back joined with their creator.
    async fn fetch_products(&self, select: &Select) -> Result<Vec<ProductRow>, StoreError>;
}
