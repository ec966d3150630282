//! Cache key for a feed response.

use crate::filter::{FeedFilters, FeedTab};
use crate::ids::UserId;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

/// Identifies one feed response: tab, viewer and filters.
///
/// Category and store selections are order-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeedCacheKey {
    key: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    components: Vec<String>,
}

impl FeedCacheKey {
    pub fn new(tab: FeedTab, user_id: Option<&UserId>, filters: &FeedFilters) -> Self {
        let components = filter_components(filters);
        let digest = digest(&components.join("|"));
        let key = format!(
            "feed:{}:{}:{:016x}",
            tab.as_str(),
            user_id.map(UserId::as_str).unwrap_or("anon"),
            digest
        );
        Self { key, components }
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Canonical filter components (for debugging).
    pub fn components(&self) -> &[String] {
        &self.components
    }
}

impl fmt::Display for FeedCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}

/// One `name=value` component per filter field.
///
/// Values are JSON-encoded, so separators inside a category or store name
/// stay quoted and cannot merge two components or list entries.
fn filter_components(filters: &FeedFilters) -> Vec<String> {
    let mut categories = filters.categories.clone();
    categories.sort();
    categories.dedup();

    let mut stores = filters.stores.clone();
    stores.sort();
    stores.dedup();

    vec![
        format!("type={}", json!(filters.content_type.as_str())),
        format!("cat={}", json!(categories)),
        format!("store={}", json!(stores)),
        format!("coupon={}", json!(filters.has_coupon)),
        format!("price={}", json!([price_bound(filters.price.min), price_bound(filters.price.max)])),
        format!("sort={}", json!(filters.sort_by.as_str())),
    ]
}

/// `-0.0` and `0.0` select the same rows.
fn price_bound(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

/// 64-bit FNV-1a.
fn digest(input: &str) -> u64 {
    input.bytes().fold(0xcbf2_9ce4_8422_2325, |acc, b| {
        (acc ^ b as u64).wrapping_mul(0x0000_0100_0000_01b3)
    })
}
