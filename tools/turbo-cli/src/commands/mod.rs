//! CLI command implementations.

pub mod compile;
pub mod config;
pub mod feed;

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use turbo_feed::filter::{ContentType, FeedFilters, FeedTab, PriceRange, SortBy};

/// Feed filter flags shared by `feed` and `compile`.
#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// Content type: all, products, posts, collections.
    #[arg(long, default_value = "all")]
    pub content_type: String,

    /// Only show products in this category (repeatable).
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// Only show products from this store (repeatable).
    #[arg(long = "store")]
    pub stores: Vec<String>,

    /// Only show products with a coupon code.
    #[arg(long)]
    pub coupon: bool,

    /// Minimum price.
    #[arg(long)]
    pub min_price: Option<f64>,

    /// Maximum price.
    #[arg(long)]
    pub max_price: Option<f64>,

    /// Sort: recent, popular, price_low, price_high.
    #[arg(short, long, default_value = "recent")]
    pub sort: String,
}

impl FilterArgs {
    /// Build feed filters from the flags.
    pub fn to_filters(&self) -> Result<FeedFilters> {
        let mut filters = FeedFilters::new()
            .with_content_type(self.content_type.parse::<ContentType>()?)
            .with_sort(self.sort.parse::<SortBy>()?)
            .with_price(
                self.min_price.unwrap_or(PriceRange::UNRESTRICTED_MIN),
                self.max_price.unwrap_or(PriceRange::UNRESTRICTED_MAX),
            );

        for category in &self.categories {
            filters = filters.with_category(category);
        }
        for store in &self.stores {
            filters = filters.with_store(store);
        }
        if self.coupon {
            filters = filters.with_coupon();
        }

        Ok(filters)
    }
}

/// Parse a tab name, listing the valid names on failure.
pub fn parse_tab(tab: &str) -> Result<FeedTab> {
    match tab.parse::<FeedTab>() {
        Ok(tab) => Ok(tab),
        Err(_) => bail!("Unknown tab '{}'. Expected for_you, following or trending.", tab),
    }
}

/// Arguments for the feed command.
#[derive(Args)]
pub struct FeedArgs {
    /// Dataset file (default: data.path from the config).
    #[arg(short, long)]
    pub data: Option<String>,

    /// Feed tab: for_you, following, trending.
    #[arg(short, long, default_value = "for_you")]
    pub tab: String,

    /// Viewer user id (anonymous when omitted).
    #[arg(short, long)]
    pub user: Option<String>,

    /// Evaluate the feed at this RFC 3339 time instead of now.
    #[arg(long)]
    pub at: Option<String>,

    #[command(flatten)]
    pub filters: FilterArgs,
}

/// Arguments for the compile command.
#[derive(Args)]
pub struct CompileArgs {
    /// Feed tab: for_you, following, trending.
    #[arg(short, long, default_value = "for_you")]
    pub tab: String,

    /// Viewer user id, used for the cache key.
    #[arg(short, long)]
    pub user: Option<String>,

    /// Followed creator id (repeatable, following tab only).
    #[arg(long = "follows")]
    pub follows: Vec<String>,

    #[command(flatten)]
    pub filters: FilterArgs,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Dataset path to record in the new config.
        #[arg(short, long, default_value = "feed.json")]
        data: String,

        /// Write JSON instead of TOML.
        #[arg(long)]
        json: bool,

        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        filters: FilterArgs,
    }

    fn filters(args: &[&str]) -> Result<FeedFilters> {
        let mut argv = vec!["turbo"];
        argv.extend_from_slice(args);
        Harness::parse_from(argv).filters.to_filters()
    }

    #[test]
    fn test_no_flags_gives_default_filters() {
        assert_eq!(filters(&[]).unwrap(), FeedFilters::default());
    }

    #[test]
    fn test_flags_map_to_filters() {
        let filters = filters(&[
            "--category",
            "Fashion",
            "--category",
            "Home",
            "--store",
            "Zara",
            "--coupon",
            "--max-price",
            "120",
            "--sort",
            "price_low",
        ])
        .unwrap();

        assert_eq!(filters.categories, vec!["Fashion", "Home"]);
        assert_eq!(filters.stores, vec!["Zara"]);
        assert!(filters.has_coupon);
        assert_eq!(filters.price, PriceRange::new(0.0, 120.0));
        assert_eq!(filters.sort_by, SortBy::PriceLow);
    }

    #[test]
    fn test_unknown_sort_is_an_error() {
        assert!(filters(&["--sort", "cheapest"]).is_err());
        assert!(filters(&["--content-type", "videos"]).is_err());
    }

    #[test]
    fn test_parse_tab() {
        assert_eq!(parse_tab("for-you").unwrap(), FeedTab::ForYou);
        assert_eq!(parse_tab("trending").unwrap(), FeedTab::Trending);
        assert!(parse_tab("explore").is_err());
    }
}
