//! Configuration management commands.

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Init { data, json, force } => init_config(&data, json, force, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Current Configuration");

    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    ctx.output.info("[data]");
    ctx.output.kv(
        "path",
        ctx.config.data.path.as_deref().unwrap_or("(not set)"),
    );

    let feed = &ctx.config.feed;
    ctx.output.info("[feed]");
    ctx.output.kv("fetch_window", &feed.fetch_window.to_string());
    ctx.output.kv("result_limit", &feed.result_limit.to_string());
    ctx.output.kv("favorites_sample", &feed.favorites_sample.to_string());
    ctx.output.kv("top_categories", &feed.top_categories.to_string());
    ctx.output.kv("new_badge_hours", &feed.new_badge_hours.to_string());
    ctx.output
        .kv("trending_window_days", &feed.trending_window_days.to_string());
    ctx.output.kv(
        "trending_min_interactions",
        &feed.trending_min_interactions.to_string(),
    );

    ctx.output.info("[log]");
    ctx.output.kv("level", &ctx.config.log.level.to_string());
    ctx.output.kv("format", &format!("{:?}", ctx.config.log.format).to_lowercase());

    Ok(())
}

async fn init_config(data: &str, json: bool, force: bool, ctx: &Context) -> Result<()> {
    let file_name = if json { "turbo.json" } else { "turbo.toml" };
    let config_path = ctx.cwd.join(file_name);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    if json {
        let content = generate_default_config(data);
        let config = CliConfig::parse("turbo.toml", &content)?;
        config.save(&config_path.to_string_lossy())?;
    } else {
        std::fs::write(&config_path, generate_default_config(data))?;
    }

    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let warnings = lint(&ctx.config);

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if warnings.is_empty() {
        ctx.output.success("Configuration is valid");
    } else {
        ctx.output.success("Configuration is valid (with warnings)");
    }

    Ok(())
}

/// Settings that are accepted but probably not intended. Hard errors are
/// already rejected when the context loads.
fn lint(config: &CliConfig) -> Vec<String> {
    let feed = &config.feed;
    let mut warnings = Vec::new();

    if feed.fetch_window < feed.result_limit {
        warnings.push(format!(
            "feed.fetch_window ({}) is below feed.result_limit ({}); feeds can never fill up",
            feed.fetch_window, feed.result_limit
        ));
    }

    if feed.top_categories == 0 {
        warnings.push("feed.top_categories is 0; category affinity is disabled".to_string());
    }

    if feed.favorites_sample == 0 {
        warnings.push("feed.favorites_sample is 0; category affinity is disabled".to_string());
    }

    if config.data.path.is_none() {
        warnings.push("data.path is not set; `turbo feed` will need --data".to_string());
    }

    warnings
}
