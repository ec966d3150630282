//! Feed tabs, user-selected filters and their compilation to a backend query.

use crate::error::FeedError;
use crate::ids::CreatorId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use turbo_db::{Direction, Predicate, Select, Value};

/// Table the feed reads from.
pub const PRODUCTS_TABLE: &str = "products";

/// Feed presentation mode. Each tab has its own ranking rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FeedTab {
    /// Personalized ranking.
    #[default]
    ForYou,
    /// Only creators the viewer follows, in backend order.
    Following,
    /// Recent items ranked by interactions per day.
    Trending,
}

impl FeedTab {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedTab::ForYou => "for_you",
            FeedTab::Following => "following",
            FeedTab::Trending => "trending",
        }
    }
}

impl fmt::Display for FeedTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FeedTab {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "for_you" | "foryou" => Ok(FeedTab::ForYou),
            "following" => Ok(FeedTab::Following),
            "trending" => Ok(FeedTab::Trending),
            _ => Err(FeedError::InvalidTab(s.to_string())),
        }
    }
}

/// Kind of content the viewer wants to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    #[default]
    All,
    Products,
    Posts,
    Collections,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::All => "all",
            ContentType::Products => "products",
            ContentType::Posts => "posts",
            ContentType::Collections => "collections",
        }
    }

    /// Whether the product feed has anything to show for this content type.
    pub fn includes_products(&self) -> bool {
        matches!(self, ContentType::All | ContentType::Products)
    }
}

impl FromStr for ContentType {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(ContentType::All),
            "products" => Ok(ContentType::Products),
            "posts" => Ok(ContentType::Posts),
            "collections" => Ok(ContentType::Collections),
            _ => Err(FeedError::InvalidContentType(s.to_string())),
        }
    }
}

/// Backend ordering for fetched products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Newest first.
    #[default]
    Recent,
    /// Most favorited first.
    Popular,
    /// Price, low to high.
    PriceLow,
    /// Price, high to low.
    PriceHigh,
}

impl SortBy {
    /// Column and direction for ORDER BY.
    pub fn order(&self) -> (&'static str, Direction) {
        match self {
            SortBy::Recent => ("created_at", Direction::Desc),
            SortBy::Popular => ("favorite_count", Direction::Desc),
            SortBy::PriceLow => ("price", Direction::Asc),
            SortBy::PriceHigh => ("price", Direction::Desc),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Recent => "recent",
            SortBy::Popular => "popular",
            SortBy::PriceLow => "price_low",
            SortBy::PriceHigh => "price_high",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortBy::Recent => "Most Recent",
            SortBy::Popular => "Most Popular",
            SortBy::PriceLow => "Price: Low to High",
            SortBy::PriceHigh => "Price: High to Low",
        }
    }
}

impl FromStr for SortBy {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "recent" | "newest" => Ok(SortBy::Recent),
            "popular" => Ok(SortBy::Popular),
            "price_low" | "price_asc" => Ok(SortBy::PriceLow),
            "price_high" | "price_desc" => Ok(SortBy::PriceHigh),
            _ => Err(FeedError::InvalidSort(s.to_string())),
        }
    }
}

/// Inclusive price bounds in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    /// Lower bound that means "no restriction".
    pub const UNRESTRICTED_MIN: f64 = 0.0;
    /// Upper bound that means "no restriction".
    pub const UNRESTRICTED_MAX: f64 = 10_000.0;

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn restricts_min(&self) -> bool {
        self.min != Self::UNRESTRICTED_MIN
    }

    pub fn restricts_max(&self) -> bool {
        self.max != Self::UNRESTRICTED_MAX
    }

    /// `min > max`. Such a range is compiled as given and matches nothing.
    pub fn is_inverted(&self) -> bool {
        self.min > self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::new(Self::UNRESTRICTED_MIN, Self::UNRESTRICTED_MAX)
    }
}

/// Filters selected in the feed UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FeedFilters {
    pub content_type: ContentType,
    pub categories: Vec<String>,
    pub stores: Vec<String>,
    pub has_coupon: bool,
    pub price: PriceRange,
    pub sort_by: SortBy,
}

impl FeedFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    pub fn with_store(mut self, store: impl Into<String>) -> Self {
        self.stores.push(store.into());
        self
    }

    pub fn with_coupon(mut self) -> Self {
        self.has_coupon = true;
        self
    }

    pub fn with_price(mut self, min: f64, max: f64) -> Self {
        self.price = PriceRange::new(min, max);
        self
    }

    pub fn with_sort(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// Compile to backend predicates.
    ///
    /// The result is the AND of `is_published = true` and one clause per
    /// active filter. `followed` is only consulted on the following tab.
    pub fn compile(&self, tab: FeedTab, followed: &[CreatorId]) -> CompiledFilter {
        let mut predicates = vec![Predicate::eq("is_published", true)];

        if self.has_coupon {
            predicates.push(Predicate::not_null("coupon_code"));
        }

        if self.price.restricts_min() {
            predicates.push(Predicate::gte("price", self.price.min));
        }
        if self.price.restricts_max() {
            predicates.push(Predicate::lte("price", self.price.max));
        }

        if !self.categories.is_empty() {
            predicates.push(Predicate::overlaps("categories", to_values(&self.categories)));
        }

        if !self.stores.is_empty() {
            predicates.push(Predicate::is_in("store", to_values(&self.stores)));
        }

        if tab == FeedTab::Following {
            predicates.push(Predicate::is_in(
                "creator_id",
                followed.iter().map(Value::from).collect(),
            ));
        }

        CompiledFilter { predicates }
    }
}

fn to_values(items: &[String]) -> Vec<Value> {
    items.iter().map(Value::from).collect()
}

/// Predicates produced by [`FeedFilters::compile`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFilter {
    predicates: Vec<Predicate>,
}

impl CompiledFilter {
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// True when nothing beyond the published-only baseline applies.
    pub fn is_unrestricted(&self) -> bool {
        self.predicates == [Predicate::eq("is_published", true)]
    }

    /// Build the product query: filters, the chosen ordering with `id` as
    /// a final tie-break, and the fetch window as row limit.
    pub fn into_select(self, sort_by: SortBy, limit: usize) -> Select {
        let (column, direction) = sort_by.order();
        Select::from(PRODUCTS_TABLE)
            .filters(self.predicates)
            .order_by(column, direction)
            .order_by("id", Direction::Asc)
            .limit(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filters_are_unrestricted() {
        let compiled = FeedFilters::default().compile(FeedTab::ForYou, &[]);
        assert!(compiled.is_unrestricted());

        let (sql, values) = compiled.into_select(SortBy::Recent, 100).to_sql();
        assert_eq!(
            sql,
            "SELECT * FROM products WHERE (is_published = ?) \
             ORDER BY created_at DESC, id ASC LIMIT 100"
        );
        assert_eq!(values, vec![Value::Bool(true)]);
    }

    #[test]
    fn test_trending_tab_adds_no_clause() {
        let compiled = FeedFilters::default().compile(FeedTab::Trending, &[CreatorId::new("c1")]);
        assert!(compiled.is_unrestricted());
    }

    #[test]
    fn test_all_clauses() {
        let filters = FeedFilters::new()
            .with_coupon()
            .with_price(10.0, 200.0)
            .with_category("Fashion")
            .with_category("Beauty")
            .with_store("Amazon");
        let followed = [CreatorId::new("c1"), CreatorId::new("c2")];

        let compiled = filters.compile(FeedTab::Following, &followed);
        assert!(!compiled.is_unrestricted());
        assert_eq!(compiled.predicates().len(), 7);

        let (sql, values) = compiled.into_select(SortBy::PriceLow, 100).to_sql();
        assert!(sql.contains("(coupon_code IS NOT NULL)"));
        assert!(sql.contains("(price >= ?) AND (price <= ?)"));
        assert!(sql.contains("(categories && ARRAY[?, ?])"));
        assert!(sql.contains("(store IN (?))"));
        assert!(sql.contains("(creator_id IN (?, ?))"));
        assert!(sql.contains("ORDER BY price ASC, id ASC"));
        // is_published, min, max, 2 categories, 1 store, 2 creators
        assert_eq!(values.len(), 8);
    }

    #[test]
    fn test_only_changed_price_bound_is_compiled() {
        let compiled = FeedFilters::new()
            .with_price(0.0, 50.0)
            .compile(FeedTab::ForYou, &[]);
        let (sql, _) = compiled.into_select(SortBy::Recent, 10).to_sql();
        assert!(sql.contains("price <= ?"));
        assert!(!sql.contains("price >= ?"));
    }

    #[test]
    fn test_inverted_price_passes_through() {
        let filters = FeedFilters::new().with_price(500.0, 20.0);
        assert!(filters.price.is_inverted());

        let compiled = filters.compile(FeedTab::ForYou, &[]);
        assert!(compiled
            .predicates()
            .contains(&Predicate::gte("price", 500.0)));
        assert!(compiled.predicates().contains(&Predicate::lte("price", 20.0)));
    }

    #[test]
    fn test_following_without_follows_matches_nothing() {
        let compiled = FeedFilters::default().compile(FeedTab::Following, &[]);
        let (sql, _) = compiled.into_select(SortBy::Recent, 10).to_sql();
        assert!(sql.contains("(1=0)"));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("for-you".parse::<FeedTab>().unwrap(), FeedTab::ForYou);
        assert_eq!("Trending".parse::<FeedTab>().unwrap(), FeedTab::Trending);
        assert!("home".parse::<FeedTab>().is_err());

        assert_eq!("price_desc".parse::<SortBy>().unwrap(), SortBy::PriceHigh);
        assert_eq!("newest".parse::<SortBy>().unwrap(), SortBy::Recent);
        assert!("cheapest".parse::<SortBy>().is_err());

        assert_eq!("posts".parse::<ContentType>().unwrap(), ContentType::Posts);
        assert!(!ContentType::Posts.includes_products());
        assert!(ContentType::All.includes_products());
    }

    #[test]
    fn test_filters_deserialize_with_defaults() {
        let filters: FeedFilters =
            serde_json::from_str(r#"{"categories":["Tech"],"sort_by":"popular"}"#).unwrap();
        assert_eq!(filters.categories, vec!["Tech"]);
        assert_eq!(filters.sort_by, SortBy::Popular);
        assert_eq!(filters.price, PriceRange::default());
        assert!(!filters.has_coupon);
    }
}
