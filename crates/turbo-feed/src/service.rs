//! Feed composition: signals, fetch, rank, de-duplicate.

use crate::cache_key::FeedCacheKey;
use crate::catalog::{FeedProduct, Product};
use crate::config::FeedConfig;
use crate::dedup::dedup_and_limit;
use crate::error::FeedError;
use crate::filter::{FeedFilters, FeedTab};
use crate::generation::FeedGeneration;
use crate::ids::{CreatorId, UserId};
use crate::scoring;
use crate::store::FeedStore;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{debug, warn};

/// One feed request.
///
/// The viewer is passed explicitly; `None` means an anonymous viewer with
/// no follows and no personalization.
#[derive(Debug, Clone)]
pub struct FeedRequest {
    pub user_id: Option<UserId>,
    pub tab: FeedTab,
    pub filters: FeedFilters,
    pub now: DateTime<Utc>,
}

impl FeedRequest {
    pub fn new(tab: FeedTab, now: DateTime<Utc>) -> Self {
        Self {
            user_id: None,
            tab,
            filters: FeedFilters::default(),
            now,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<UserId>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_filters(mut self, filters: FeedFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn cache_key(&self) -> FeedCacheKey {
        FeedCacheKey::new(self.tab, self.user_id.as_ref(), &self.filters)
    }
}

/// Result of a guarded fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedOutcome {
    /// This was the latest request; apply the items.
    Fresh(Vec<FeedProduct>),
    /// A newer request started while this one was in flight.
    Superseded,
}

/// Viewer signals loaded before the product fetch.
#[derive(Debug, Default)]
struct ViewerSignals {
    followed: Vec<CreatorId>,
    top_categories: Vec<String>,
}

/// Composes feeds from a [`FeedStore`].
pub struct FeedService<S: FeedStore> {
    store: S,
    config: FeedConfig,
}

impl<S: FeedStore> FeedService<S> {
    /// Create a service with default configuration.
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: FeedConfig::default(),
        }
    }

    /// Create a service with explicit configuration.
    pub fn with_config(store: S, config: FeedConfig) -> Result<Self, FeedError> {
        config.validate()?;
        Ok(Self { store, config })
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Compose the feed for one request.
    ///
    /// Any store failure fails the whole request; an empty feed is `Ok`.
    pub async fn fetch(&self, request: &FeedRequest) -> Result<Vec<FeedProduct>, FeedError> {
        let tab = request.tab;

        if !request.filters.content_type.includes_products() {
            debug!(
                content_type = request.filters.content_type.as_str(),
                "content type has no products"
            );
            return Ok(Vec::new());
        }

        let signals = self.load_signals(request).await?;

        if tab == FeedTab::Following && signals.followed.is_empty() {
            debug!("following tab with no followed creators");
            return Ok(Vec::new());
        }

        if request.filters.price.is_inverted() {
            warn!(
                min = request.filters.price.min,
                max = request.filters.price.max,
                "price range is inverted; no product can match"
            );
        }

        let select = request
            .filters
            .compile(tab, &signals.followed)
            .into_select(request.filters.sort_by, self.config.fetch_window);
        let rows = self.store.fetch_products(&select).await?;
        let fetched = rows.len();

        let followed: HashSet<CreatorId> = signals.followed.into_iter().collect();
        let new_window = self.config.new_badge_window();
        let items = rows
            .into_iter()
            .map(|row| {
                Product::try_from(row)
                    .map(|product| FeedProduct::new(product, &followed, request.now, new_window))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let ranked = match tab {
            FeedTab::ForYou => {
                scoring::personalize(items, &followed, &signals.top_categories, request.now)
            }
            FeedTab::Trending => scoring::trending(
                items,
                request.now,
                self.config.trending_window(),
                self.config.trending_min_interactions,
            ),
            FeedTab::Following => items,
        };

        let feed = dedup_and_limit(ranked, self.config.result_limit);
        debug!(tab = tab.as_str(), fetched, returned = feed.len(), "feed composed");
        Ok(feed)
    }

    /// Like [`fetch`](Self::fetch), but reports [`FeedOutcome::Superseded`]
    /// if another request on `generation` began before this one finished.
    pub async fn fetch_latest(
        &self,
        generation: &FeedGeneration,
        request: &FeedRequest,
    ) -> Result<FeedOutcome, FeedError> {
        let ticket = generation.begin();
        let result = self.fetch(request).await;

        if !generation.is_current(ticket) {
            debug!(ticket = ticket.value(), "discarding superseded feed response");
            return Ok(FeedOutcome::Superseded);
        }

        result.map(FeedOutcome::Fresh)
    }

    async fn load_signals(&self, request: &FeedRequest) -> Result<ViewerSignals, FeedError> {
        let Some(user) = &request.user_id else {
            return Ok(ViewerSignals::default());
        };

        let wants_affinity = request.tab == FeedTab::ForYou;
        let follows = self.store.followed_creators(user);
        let favorites = async {
            if wants_affinity {
                self.store
                    .favorite_categories(user, self.config.favorites_sample)
                    .await
            } else {
                Ok(Vec::new())
            }
        };

        let (followed, favorites) = futures::try_join!(follows, favorites)?;

        Ok(ViewerSignals {
            followed,
            top_categories: scoring::top_categories(&favorites, self.config.top_categories),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ContentType;
    use crate::store::MemoryStore;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn store() -> MemoryStore {
        MemoryStore::from_json(
            &json!({
                "creators": [{"id": "c1", "username": "ana"}, {"id": "c2", "username": "ben"}],
                "products": [
                    {"id": "p1", "title": "Scarf", "price": 35.0, "categories": ["Fashion"],
                     "created_at": "2026-10-19T06:00:00Z", "creator_id": "c1"},
                    {"id": "p2", "title": "Mouse", "price": 15.0, "categories": ["Tech"],
                     "created_at": "2026-10-18T06:00:00Z", "creator_id": "c2"},
                    {"id": "p3", "title": "Draft", "price": 5.0, "is_published": false,
                     "created_at": "2026-10-19T07:00:00Z", "creator_id": "c1"}
                ],
                "follows": [{"follower_id": "u1", "creator_id": "c1"}]
            })
            .to_string(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_non_product_content_type_is_empty() {
        let service = FeedService::new(store());
        let request = FeedRequest::new(FeedTab::ForYou, now())
            .with_filters(FeedFilters::new().with_content_type(ContentType::Posts));
        assert!(service.fetch(&request).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_following_requires_a_user() {
        let service = FeedService::new(store());
        let anonymous = FeedRequest::new(FeedTab::Following, now());
        assert!(service.fetch(&anonymous).await.unwrap().is_empty());

        let follower = FeedRequest::new(FeedTab::Following, now()).with_user("u1");
        let items = service.fetch(&follower).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product.id.as_str(), "p1");
        assert!(items[0].is_from_followed);
    }

    #[tokio::test]
    async fn test_unpublished_products_never_appear() {
        let service = FeedService::new(store());
        let items = service
            .fetch(&FeedRequest::new(FeedTab::ForYou, now()))
            .await
            .unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.product.is_published));
    }

    #[tokio::test]
    async fn test_anonymous_for_you_ranks_by_recency() {
        let service = FeedService::new(store());
        let items = service
            .fetch(&FeedRequest::new(FeedTab::ForYou, now()))
            .await
            .unwrap();
        let ids: Vec<&str> = items.iter().map(|i| i.product.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
        assert!(items.iter().all(|i| !i.is_from_followed));
        assert!(items[0].is_new);
    }

    #[tokio::test]
    async fn test_fetch_latest_single_request_is_fresh() {
        let service = FeedService::new(store());
        let generation = FeedGeneration::new();
        let outcome = service
            .fetch_latest(&generation, &FeedRequest::new(FeedTab::ForYou, now()))
            .await
            .unwrap();
        assert!(matches!(outcome, FeedOutcome::Fresh(items) if items.len() == 2));
    }

    #[test]
    fn test_with_config_validates() {
        let config = FeedConfig {
            result_limit: 0,
            ..FeedConfig::default()
        };
        assert!(matches!(
            FeedService::with_config(MemoryStore::new(), config),
            Err(FeedError::Config(_))
        ));
    }

    #[test]
    fn test_with_config_rejects_overflowing_window() {
        let config = FeedConfig {
            trending_window_days: 1_000_000_000,
            ..FeedConfig::default()
        };
        assert!(matches!(
            FeedService::with_config(store(), config),
            Err(FeedError::Config(_))
        ));
    }

    #[test]
    fn test_request_cache_key_tracks_viewer() {
        let anonymous = FeedRequest::new(FeedTab::Trending, now());
        let viewer = anonymous.clone().with_user("u1");
        assert_ne!(anonymous.cache_key(), viewer.cache_key());
        assert!(anonymous.cache_key().as_str().starts_with("feed:trending:anon:"));
    }
}
