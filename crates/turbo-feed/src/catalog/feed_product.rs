//! Feed view-model.

use crate::catalog::Product;
use crate::ids::CreatorId;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A product as presented in a feed.
///
/// Recomputed on every fetch. `score` only exists to order one response
/// and is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedProduct {
    #[serde(flatten)]
    pub product: Product,
    /// The viewer follows this product's creator.
    pub is_from_followed: bool,
    /// Created within the "new" badge window.
    pub is_new: bool,
    /// Selected by the trending scorer.
    pub is_trending: bool,
    #[serde(skip)]
    pub score: Option<f64>,
}

impl FeedProduct {
    /// Wrap a product, computing the follow and "new" flags.
    pub fn new(
        product: Product,
        followed: &HashSet<CreatorId>,
        now: DateTime<Utc>,
        new_window: Duration,
    ) -> Self {
        let is_from_followed = followed.contains(product.creator_id());
        let is_new = now
            .checked_sub_signed(new_window)
            .map_or(true, |cutoff| product.created_at > cutoff);
        Self {
            product,
            is_from_followed,
            is_new,
            is_trending: false,
            score: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Creator;
    use crate::ids::ProductId;
    use crate::money::{Currency, Money};
    use chrono::TimeZone;

    fn product(hours_old: i64, now: DateTime<Utc>) -> Product {
        Product {
            id: ProductId::new("p1"),
            title: "Lamp".to_string(),
            price: Money::new(2500, Currency::USD),
            categories: vec!["Home".to_string()],
            click_count: 0,
            favorite_count: 0,
            created_at: now - Duration::hours(hours_old),
            coupon_code: None,
            store: None,
            is_published: true,
            creator: Creator::new("c1", "ana"),
        }
    }

    #[test]
    fn test_flags() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let followed: HashSet<CreatorId> = [CreatorId::new("c1")].into_iter().collect();

        let fresh = FeedProduct::new(product(2, now), &followed, now, Duration::hours(24));
        assert!(fresh.is_from_followed);
        assert!(fresh.is_new);
        assert!(!fresh.is_trending);

        let old = FeedProduct::new(product(30, now), &HashSet::new(), now, Duration::hours(24));
        assert!(!old.is_from_followed);
        assert!(!old.is_new);
    }

    #[test]
    fn test_unbounded_window_marks_everything_new() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let item = FeedProduct::new(product(24 * 365 * 30, now), &HashSet::new(), now, Duration::MAX);
        assert!(item.is_new);
    }

    #[test]
    fn test_serialized_shape() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let mut item = FeedProduct::new(product(1, now), &HashSet::new(), now, Duration::hours(24));
        item.score = Some(42.0);

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], "p1");
        assert_eq!(json["is_new"], true);
        assert_eq!(json["is_from_followed"], false);
        assert_eq!(json["is_trending"], false);
        assert!(json.get("click_count").is_some());
        assert!(json.get("isNew").is_none());
        assert!(json.get("score").is_none());
    }
}
