//! Client-side ranking for the `for_you` and `trending` tabs.
//!
//! Both scorers are pure functions of the fetched items, the viewer's
//! signals and an explicit `now`. Equal scores are ordered by newer
//! `created_at` first, then by ascending product id.

use crate::catalog::FeedProduct;
use crate::ids::CreatorId;
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, HashSet};

pub const FOLLOWED_BONUS: f64 = 50.0;
pub const CATEGORY_BONUS: f64 = 30.0;
pub const RECENCY_MAX_BONUS: f64 = 20.0;
pub const RECENCY_DECAY_PER_DAY: f64 = 3.0;
pub const RECENCY_WINDOW_DAYS: f64 = 7.0;
pub const POPULARITY_CAP: f64 = 20.0;
pub const POPULARITY_DIVISOR: f64 = 10.0;

/// Linearly decaying freshness bonus: 20 at day 0, 0 from ~6.67 days on.
///
/// Future timestamps count as day 0.
pub fn recency_bonus(days_old: f64) -> f64 {
    let days_old = days_old.max(0.0);
    if days_old < RECENCY_WINDOW_DAYS {
        (RECENCY_MAX_BONUS - days_old * RECENCY_DECAY_PER_DAY).max(0.0)
    } else {
        0.0
    }
}

/// One point per ten interactions, capped at 20.
pub fn popularity_bonus(interactions: u64) -> f64 {
    (interactions as f64 / POPULARITY_DIVISOR).min(POPULARITY_CAP)
}

/// Personalization score of a single item.
pub fn personal_score(
    item: &FeedProduct,
    followed: &HashSet<CreatorId>,
    top_categories: &[String],
    now: DateTime<Utc>,
) -> f64 {
    let product = &item.product;
    let mut score = 0.0;

    if followed.contains(product.creator_id()) {
        score += FOLLOWED_BONUS;
    }

    if top_categories.iter().any(|c| product.in_category(c)) {
        score += CATEGORY_BONUS;
    }

    score += recency_bonus(product.age_days(now));
    score += popularity_bonus(product.interactions());
    score
}

/// Score and order items for the `for_you` tab.
pub fn personalize(
    mut items: Vec<FeedProduct>,
    followed: &HashSet<CreatorId>,
    top_categories: &[String],
    now: DateTime<Utc>,
) -> Vec<FeedProduct> {
    for item in &mut items {
        item.score = Some(personal_score(item, followed, top_categories, now));
    }
    sort_by_score(&mut items);
    items
}

/// Interactions per day since creation, with age floored at one day.
pub fn trending_score(item: &FeedProduct, now: DateTime<Utc>) -> f64 {
    let days_old = item.product.age_days(now).max(1.0);
    item.product.interactions() as f64 / days_old
}

/// Select and order items for the `trending` tab.
///
/// Keeps items created within `window` that have at least
/// `min_interactions` favorites plus clicks, and marks them trending.
pub fn trending(
    items: Vec<FeedProduct>,
    now: DateTime<Utc>,
    window: Duration,
    min_interactions: u64,
) -> Vec<FeedProduct> {
    let cutoff = now.checked_sub_signed(window).unwrap_or(DateTime::<Utc>::MIN_UTC);

    let mut items: Vec<FeedProduct> = items
        .into_iter()
        .filter(|item| item.product.created_at > cutoff)
        .filter(|item| item.product.interactions() >= min_interactions)
        .map(|mut item| {
            item.score = Some(trending_score(&item, now));
            item.is_trending = true;
            item
        })
        .collect();

    sort_by_score(&mut items);
    items
}

/// Rank categories by how often they appear across favorited products.
///
/// Ties keep the order in which categories were first seen.
pub fn top_categories(favorites: &[Vec<String>], n: usize) -> Vec<String> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    let mut next_seen = 0;

    for category in favorites.iter().flatten() {
        let entry = counts.entry(category.as_str()).or_insert_with(|| {
            next_seen += 1;
            (0, next_seen)
        });
        entry.0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(category, (count, seen))| (category, count, seen))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(n)
        .map(|(category, _, _)| category.to_string())
        .collect()
}

fn sort_by_score(items: &mut [FeedProduct]) {
    items.sort_by(|a, b| {
        let sa = a.score.unwrap_or(0.0);
        let sb = b.score.unwrap_or(0.0);
        sb.total_cmp(&sa)
            .then_with(|| b.product.created_at.cmp(&a.product.created_at))
            .then_with(|| a.product.id.cmp(&b.product.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Creator, Product};
    use crate::ids::ProductId;
    use crate::money::{Currency, Money};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn item(id: &str, creator: &str, category: &str, favs: u64, clicks: u64, days: i64) -> FeedProduct {
        FeedProduct {
            product: Product {
                id: ProductId::new(id),
                title: id.to_uppercase(),
                price: Money::new(1000, Currency::USD),
                categories: vec![category.to_string()],
                click_count: clicks,
                favorite_count: favs,
                created_at: now() - Duration::days(days),
                coupon_code: None,
                store: None,
                is_published: true,
                creator: Creator::new(creator, creator),
            },
            is_from_followed: false,
            is_new: false,
            is_trending: false,
            score: None,
        }
    }

    fn ids(items: &[FeedProduct]) -> Vec<&str> {
        items.iter().map(|i| i.product.id.as_str()).collect()
    }

    #[test]
    fn test_recency_bonus_boundaries() {
        assert_eq!(recency_bonus(0.0), 20.0);
        assert_eq!(recency_bonus(1.0), 17.0);
        assert_eq!(recency_bonus(7.0), 0.0);
        assert_eq!(recency_bonus(6.9), 0.0);
        assert_eq!(recency_bonus(-2.0), 20.0);
    }

    #[test]
    fn test_popularity_bonus_cap() {
        assert_eq!(popularity_bonus(0), 0.0);
        assert_eq!(popularity_bonus(10), 1.0);
        assert!((popularity_bonus(1) - 0.1).abs() < 1e-12);
        assert_eq!(popularity_bonus(10_000), 20.0);
    }

    #[test]
    fn test_concrete_scenario() {
        let a = item("a", "followed", "Fashion", 10, 0, 1);
        let b = item("b", "stranger", "Tech", 0, 1, 10);
        let followed: HashSet<CreatorId> = [CreatorId::new("followed")].into_iter().collect();
        let top = vec!["Fashion".to_string()];

        let ranked = personalize(vec![b, a], &followed, &top, now());
        assert_eq!(ids(&ranked), vec!["a", "b"]);
        assert!((ranked[0].score.unwrap() - 98.0).abs() < 1e-9);
        assert!((ranked[1].score.unwrap() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_personalize_tie_break() {
        // identical scores: newer first, then id ascending
        let items = vec![
            item("z", "c", "Home", 0, 0, 30),
            item("y", "c", "Home", 0, 0, 20),
            item("x", "c", "Home", 0, 0, 20),
        ];
        let ranked = personalize(items, &HashSet::new(), &[], now());
        assert_eq!(ids(&ranked), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_trending_window_and_floor() {
        let items = vec![
            item("old", "c", "Tech", 500, 0, 8),
            item("quiet", "c", "Tech", 2, 2, 1),
            item("steady", "c", "Tech", 30, 0, 3),
            item("hot", "c", "Tech", 20, 10, 1),
            item("fresh", "c", "Tech", 5, 0, 0),
        ];
        let ranked = trending(items, now(), Duration::days(7), 5);

        assert_eq!(ids(&ranked), vec!["hot", "steady", "fresh"]);
        assert!(ranked.iter().all(|i| i.is_trending));
        assert_eq!(ranked[0].score, Some(30.0));
        assert_eq!(ranked[1].score, Some(10.0));
        // age floored at one day
        assert_eq!(ranked[2].score, Some(5.0));
    }

    #[test]
    fn test_trending_excludes_exact_window_edge() {
        let items = vec![item("edge", "c", "Tech", 100, 0, 7)];
        assert!(trending(items, now(), Duration::days(7), 5).is_empty());
    }

    #[test]
    fn test_trending_unbounded_window_keeps_old_items() {
        let items = vec![item("ancient", "c", "Tech", 100, 0, 3_000)];
        let ranked = trending(items, now(), Duration::MAX, 5);
        assert_eq!(ids(&ranked), vec!["ancient"]);
    }

    #[test]
    fn test_top_categories() {
        let favorites = vec![
            vec!["Tech".to_string(), "Home".to_string()],
            vec!["Fashion".to_string()],
            vec!["Home".to_string()],
            vec!["Fashion".to_string(), "Beauty".to_string()],
        ];
        let top = top_categories(&favorites, 3);
        // Home and Fashion tie at 2; Home was seen first
        assert_eq!(top, vec!["Home", "Fashion", "Tech"]);
        assert!(top_categories(&[], 5).is_empty());
    }
}
