//! Feed command: compose one feed over a dataset.

use std::fs;

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use serde_json::json;
use turbo_feed::prelude::*;
use turbo_observability::{RequestId, StructuredLogger, TimingContext};

use super::{parse_tab, FeedArgs};
use crate::context::Context;
use crate::output::{feed_badges, format_micros, format_score, truncate};

/// Run the feed command.
pub async fn run(args: FeedArgs, ctx: &Context) -> Result<()> {
    let mut timing = TimingContext::new();
    let logger = StructuredLogger::new(RequestId::generate())
        .with_component("feed")
        .with_min_level(ctx.config.log.level)
        .with_format(ctx.config.log.format);

    let request = build_request(&args)?;
    let store = load_store(&args, ctx)?;
    timing.mark("loaded");
    ctx.output
        .debug(&format!("Loaded {} products", store.product_count()));

    let service = FeedService::with_config(store, ctx.config.feed.clone())?;
    let items = match service.fetch(&request).await {
        Ok(items) => items,
        Err(e) => {
            logger.error_with(
                "feed request failed",
                &[
                    ("tab", json!(request.tab.as_str())),
                    ("error", json!(e.to_string())),
                ],
            );
            return Err(e).context("Feed request failed");
        }
    };
    timing.mark("composed");

    let mut fields = vec![
        ("tab", json!(request.tab.as_str())),
        ("user", json!(request.user_id.as_ref().map(|u| u.as_str()))),
        ("cache_key", json!(request.cache_key().as_str())),
        ("items", json!(items.len())),
    ];
    fields.extend(timing_fields(&timing));
    logger.info_with("feed served", &fields);

    if ctx.output.is_json() {
        ctx.output.json(&items);
        return Ok(());
    }

    render(&items, &request, ctx);
    ctx.output.debug(&format!(
        "Composed in {}",
        format_micros(timing.elapsed().as_micros() as u64)
    ));

    Ok(())
}

fn build_request(args: &FeedArgs) -> Result<FeedRequest> {
    let tab = parse_tab(&args.tab)?;
    let now = match &args.at {
        Some(at) => DateTime::parse_from_rfc3339(at)
            .with_context(|| format!("Invalid --at timestamp: {}", at))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let mut request = FeedRequest::new(tab, now).with_filters(args.filters.to_filters()?);
    if let Some(user) = &args.user {
        request = request.with_user(user.as_str());
    }
    Ok(request)
}

fn load_store(args: &FeedArgs, ctx: &Context) -> Result<MemoryStore> {
    let path = args
        .data
        .as_deref()
        .or(ctx.config.data.path.as_deref())
        .context("No dataset given. Pass --data or set data.path in turbo.toml")?;
    let path = ctx.resolve_path(path);

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read dataset: {}", path.display()))?;
    MemoryStore::from_json(&content)
        .with_context(|| format!("Failed to load dataset: {}", path.display()))
}

fn stage_field(mark: &str) -> &'static str {
    match mark {
        "loaded" => "load_us",
        "composed" => "total_us",
        _ => "stage_us",
    }
}

/// Per-stage durations for the request summary.
fn timing_fields(timing: &TimingContext) -> Vec<(&'static str, serde_json::Value)> {
    let mut fields: Vec<(&'static str, serde_json::Value)> = timing
        .marks_us()
        .into_iter()
        .map(|(mark, us)| (stage_field(&mark), json!(us)))
        .collect();
    if let Some(compose) = timing.between("loaded", "composed") {
        fields.push(("compose_us", json!(compose.as_micros() as u64)));
    }
    fields
}

fn render(items: &[FeedProduct], request: &FeedRequest, ctx: &Context) {
    let viewer = request
        .user_id
        .as_ref()
        .map(|u| u.to_string())
        .unwrap_or_else(|| "anonymous".to_string());
    ctx.output.header(&format!(
        "{} feed for {} ({})",
        request.tab,
        viewer,
        request.filters.sort_by.display_name()
    ));

    if items.is_empty() {
        ctx.output.info("No products match this feed.");
        return;
    }

    let widths = [4, 12, 32, 12, 18, 8];
    ctx.output
        .table_row(&["#", "ID", "TITLE", "PRICE", "CREATOR", "SCORE"], &widths);
    for (rank, item) in items.iter().enumerate() {
        let rank = (rank + 1).to_string();
        let title = truncate(&item.product.title, 32);
        let price = item.product.price.to_string();
        let creator = truncate(&item.product.creator.label(), 18);
        let score = format_score(item.score);
        ctx.output.table_row(
            &[
                rank.as_str(),
                item.product.id.as_str(),
                title.as_str(),
                price.as_str(),
                creator.as_str(),
                score.as_str(),
            ],
            &widths,
        );
        let badges = feed_badges(item);
        if !badges.is_empty() {
            ctx.output.list_item(&badges);
        }
    }

    ctx.output.success(&format!("{} products", items.len()));
}
