//! Creator feed composition for TurboFeed.
//!
//! Turns a viewer, a tab and UI filters into a ranked list of at most 50
//! products:
//!
//! - **Filter**: compiles UI filters into backend predicates
//! - **Store**: reads products, follows and favorites from the backend
//! - **Scoring**: personalized (`for_you`) and trending ranking
//! - **Dedup**: removes repeated products and applies the result limit
//! - **Service**: runs the pipeline, with a latest-request-wins guard
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_feed::prelude::*;
//!
//! let store = MemoryStore::from_json(&std::fs::read_to_string("feed.json")?)?;
//! let service = FeedService::new(store);
//!
//! let request = FeedRequest::new(FeedTab::ForYou, chrono::Utc::now())
//!     .with_user("user-1")
//!     .with_filters(FeedFilters::new().with_category("Fashion"));
//!
//! for item in service.fetch(&request).await? {
//!     println!("{} {}", item.product.title, item.product.price);
//! }
//! ```

pub mod cache_key;
pub mod catalog;
pub mod config;
pub mod dedup;
pub mod error;
pub mod filter;
pub mod generation;
pub mod ids;
pub mod money;
pub mod scoring;
pub mod service;
pub mod store;

pub use config::FeedConfig;
pub use error::{FeedError, StoreError};
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cache_key::FeedCacheKey;
    pub use crate::catalog::{Creator, FeedProduct, Product, ProductRow};
    pub use crate::config::FeedConfig;
    pub use crate::error::{FeedError, StoreError};
    pub use crate::filter::{CompiledFilter, ContentType, FeedFilters, FeedTab, PriceRange, SortBy};
    pub use crate::generation::{FeedGeneration, FeedTicket};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};
    pub use crate::service::{FeedOutcome, FeedRequest, FeedService};
    pub use crate::store::{Dataset, FavoriteEdge, FeedStore, FollowEdge, MemoryStore};
}
