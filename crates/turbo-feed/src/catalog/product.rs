//! Affiliate products.

use crate::catalog::Creator;
use crate::error::FeedError;
use crate::ids::{CreatorId, ProductId};
use crate::money::{Currency, Money};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An affiliate product published by a creator.
///
/// `click_count` and `favorite_count` are maintained by the backend and
/// only ever read here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Money,
    pub categories: Vec<String>,
    pub click_count: u64,
    pub favorite_count: u64,
    pub created_at: DateTime<Utc>,
    pub coupon_code: Option<String>,
    pub store: Option<String>,
    pub is_published: bool,
    pub creator: Creator,
}

impl Product {
    /// Favorites plus clicks.
    pub fn interactions(&self) -> u64 {
        self.favorite_count.saturating_add(self.click_count)
    }

    /// Fractional days since creation. Negative for future timestamps.
    pub fn age_days(&self, now: DateTime<Utc>) -> f64 {
        (now - self.created_at).num_milliseconds() as f64 / MILLIS_PER_DAY
    }

    pub fn has_coupon(&self) -> bool {
        self.coupon_code.is_some()
    }

    pub fn creator_id(&self) -> &CreatorId {
        &self.creator.id
    }

    /// Check if the product lists a category.
    pub fn in_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}

const MILLIS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// A product row as returned by the storage collaborator.
///
/// Prices arrive as decimals with a separate currency code, and the
/// creator profile arrives as a nested object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRow {
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub click_count: u64,
    #[serde(default)]
    pub favorite_count: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub coupon_code: Option<String>,
    #[serde(default)]
    pub store: Option<String>,
    #[serde(default = "default_published")]
    pub is_published: bool,
    pub creator_id: CreatorId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<Creator>,
}

fn default_currency() -> String {
    Currency::USD.code().to_string()
}

fn default_published() -> bool {
    true
}

impl TryFrom<ProductRow> for Product {
    type Error = FeedError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let currency = Currency::from_code(&row.currency).ok_or_else(|| FeedError::InvalidRow {
            id: row.id.to_string(),
            reason: format!("unknown currency {}", row.currency),
        })?;

        let creator = row.creator.ok_or_else(|| FeedError::InvalidRow {
            id: row.id.to_string(),
            reason: format!("creator {} was not joined", row.creator_id),
        })?;

        if creator.id != row.creator_id {
            return Err(FeedError::InvalidRow {
                id: row.id.to_string(),
                reason: format!(
                    "joined creator {} does not match creator_id {}",
                    creator.id, row.creator_id
                ),
            });
        }

        Ok(Product {
            id: row.id,
            title: row.title,
            price: Money::from_decimal(row.price, currency),
            categories: row.categories,
            click_count: row.click_count,
            favorite_count: row.favorite_count,
            created_at: row.created_at,
            coupon_code: row.coupon_code,
            store: row.store,
            is_published: row.is_published,
            creator,
        })
    }
}
