//! Feed tuning knobs.

use crate::error::FeedError;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Feed pipeline configuration.
///
/// Ranking runs only over the first `fetch_window` rows of the backend's
/// ordering, so items outside that window never surface in scored tabs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Rows fetched from the backend per request.
    pub fetch_window: usize,
    /// Maximum items returned.
    pub result_limit: usize,
    /// Favorites sampled to derive category affinity.
    pub favorites_sample: usize,
    /// Favorite categories that earn the affinity bonus.
    pub top_categories: usize,
    /// Age in hours under which an item carries the "new" badge.
    pub new_badge_hours: i64,
    /// Trending only considers items younger than this.
    pub trending_window_days: i64,
    /// Trending drops items with fewer interactions than this.
    pub trending_min_interactions: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            fetch_window: 100,
            result_limit: 50,
            favorites_sample: 50,
            top_categories: 5,
            new_badge_hours: 24,
            trending_window_days: 7,
            trending_min_interactions: 5,
        }
    }
}

/// Longest trending window accepted.
pub const MAX_TRENDING_WINDOW_DAYS: i64 = 365;
/// Longest "new" badge window accepted.
pub const MAX_NEW_BADGE_HOURS: i64 = 24 * 365;

impl FeedConfig {
    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), FeedError> {
        if self.fetch_window == 0 {
            return Err(FeedError::Config("fetch_window must be at least 1".into()));
        }
        if self.result_limit == 0 {
            return Err(FeedError::Config("result_limit must be at least 1".into()));
        }
        if !(1..=MAX_TRENDING_WINDOW_DAYS).contains(&self.trending_window_days)
            || Duration::try_days(self.trending_window_days).is_none()
        {
            return Err(FeedError::Config(format!(
                "trending_window_days must be between 1 and {}",
                MAX_TRENDING_WINDOW_DAYS
            )));
        }
        if !(0..=MAX_NEW_BADGE_HOURS).contains(&self.new_badge_hours)
            || Duration::try_hours(self.new_badge_hours).is_none()
        {
            return Err(FeedError::Config(format!(
                "new_badge_hours must be between 0 and {}",
                MAX_NEW_BADGE_HOURS
            )));
        }
        Ok(())
    }

    /// Clamped to the accepted range.
    pub fn new_badge_window(&self) -> Duration {
        Duration::hours(self.new_badge_hours.clamp(0, MAX_NEW_BADGE_HOURS))
    }

    /// Clamped to the accepted range.
    pub fn trending_window(&self) -> Duration {
        Duration::days(self.trending_window_days.clamp(1, MAX_TRENDING_WINDOW_DAYS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = FeedConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fetch_window, 100);
        assert_eq!(config.result_limit, 50);
    }

    #[test]
    fn test_partial_override() {
        let config: FeedConfig = serde_json::from_str(r#"{"fetch_window": 250}"#).unwrap();
        assert_eq!(config.fetch_window, 250);
        assert_eq!(config.trending_min_interactions, 5);
    }

    #[test]
    fn test_rejects_zero_window() {
        let config = FeedConfig {
            fetch_window: 0,
            ..FeedConfig::default()
        };
        assert!(matches!(config.validate(), Err(FeedError::Config(_))));
    }

    #[test]
    fn test_rejects_out_of_range_windows() {
        let huge_trending = FeedConfig {
            trending_window_days: 1_000_000_000,
            ..FeedConfig::default()
        };
        assert!(matches!(huge_trending.validate(), Err(FeedError::Config(_))));

        let huge_badge = FeedConfig {
            new_badge_hours: i64::MAX,
            ..FeedConfig::default()
        };
        assert!(matches!(huge_badge.validate(), Err(FeedError::Config(_))));

        let at_limit = FeedConfig {
            trending_window_days: MAX_TRENDING_WINDOW_DAYS,
            new_badge_hours: MAX_NEW_BADGE_HOURS,
            ..FeedConfig::default()
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn test_windows_clamp_unvalidated_values() {
        let config = FeedConfig {
            trending_window_days: 1_000_000_000,
            new_badge_hours: i64::MAX,
            ..FeedConfig::default()
        };
        assert_eq!(config.trending_window(), Duration::days(MAX_TRENDING_WINDOW_DAYS));
        assert_eq!(config.new_badge_window(), Duration::hours(MAX_NEW_BADGE_HOURS));
    }
}
