//! CLI configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use turbo_feed::FeedConfig;
use turbo_observability::{LogFormat, LogLevel};

/// File names searched for, in order, in each directory.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["turbo.toml", ".turbo.toml", "turbo.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Dataset location.
    #[serde(default)]
    pub data: DataConfig,

    /// Feed pipeline tuning.
    #[serde(default)]
    pub feed: FeedConfig,

    /// Log output.
    #[serde(default)]
    pub log: LogConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        Self::parse(path, &content)
    }

    /// Parse config content, choosing the format by file extension.
    pub fn parse(path: &str, content: &str) -> Result<Self> {
        if path.ends_with(".json") {
            serde_json::from_str(content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }
}

/// Dataset location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to a JSON dataset, relative to the working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Log output settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Minimum level for request summaries and tracing output.
    #[serde(default)]
    pub level: LogLevel,

    /// Request summary format.
    #[serde(default)]
    pub format: LogFormat,
}

/// Generate a default turbo.toml config file.
pub fn generate_default_config(data_path: &str) -> String {
    format!(
        r#"# TurboFeed configuration

[data]
path = "{data_path}"

[feed]
# Rows fetched from the backend before ranking.
fetch_window = 100
result_limit = 50
favorites_sample = 50
top_categories = 5
new_badge_hours = 24
trending_window_days = 7
trending_min_interactions = 5

[log]
level = "info"
format = "human"
"#,
        data_path = data_path
    )
}
