//! Compile command: show the backend query for a set of filters.

use anyhow::Result;
use serde::Serialize;
use turbo_feed::prelude::*;

use super::{parse_tab, CompileArgs};
use crate::context::Context;

/// Compiled query, as printed in JSON mode.
#[derive(Debug, Serialize)]
struct CompiledQuery {
    tab: FeedTab,
    sql: String,
    params: Vec<String>,
    unrestricted: bool,
    cache_key: String,
}

/// Run the compile command.
pub async fn run(args: CompileArgs, ctx: &Context) -> Result<()> {
    let query = compile(&args, ctx.config.feed.fetch_window)?;

    if ctx.output.is_json() {
        ctx.output.json(&query);
        return Ok(());
    }

    ctx.output.header(&format!("Compiled {} query", query.tab));
    ctx.output.kv("sql", &query.sql);
    ctx.output.kv("params", &query.params.join(", "));
    ctx.output.kv("cache key", &query.cache_key);
    if query.unrestricted {
        ctx.output.info("No filters beyond published-only.");
    }
    if query.tab == FeedTab::Following && args.follows.is_empty() {
        ctx.output
            .warn("Following tab with no --follows: the feed would be empty and no query is sent.");
    }

    Ok(())
}

fn compile(args: &CompileArgs, fetch_window: usize) -> Result<CompiledQuery> {
    let tab = parse_tab(&args.tab)?;
    let filters = args.filters.to_filters()?;
    let followed: Vec<CreatorId> = args.follows.iter().map(|c| CreatorId::new(c.as_str())).collect();

    let cache_key = FeedCacheKey::new(tab, args.user.as_deref().map(UserId::new).as_ref(), &filters);
    let compiled = filters.compile(tab, &followed);
    let unrestricted = compiled.is_unrestricted();
    let (sql, params) = compiled.into_select(filters.sort_by, fetch_window).to_sql();

    Ok(CompiledQuery {
        tab,
        sql,
        params: params.iter().map(ToString::to_string).collect(),
        unrestricted,
        cache_key: cache_key.as_str().to_string(),
    })
}
