//! De-duplication and result limit.

use crate::catalog::FeedProduct;
use std::collections::HashSet;

/// Keep the first occurrence of each product id, then truncate to `limit`.
///
/// Order is preserved, and applying this twice changes nothing.
pub fn dedup_and_limit(items: Vec<FeedProduct>, limit: usize) -> Vec<FeedProduct> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.product.id.clone()))
        .take(limit)
        .collect()
}
