//! Turbo CLI - Command line tool for TurboFeed.
//!
//! Commands:
//! - `turbo feed` - Compose a feed over a JSON dataset
//! - `turbo compile` - Show the backend query a set of filters compiles to
//! - `turbo config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use commands::{CompileArgs, ConfigArgs, FeedArgs};

/// Turbo CLI - Compose and inspect creator feeds
#[derive(Parser)]
#[command(name = "turbo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose a feed over a dataset
    Feed(FeedArgs),

    /// Print the query compiled from feed filters
    Compile(CompileArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);

    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    // RUST_LOG wins over the configured level.
    let default_level = if cli.verbose {
        "debug".to_string()
    } else {
        ctx.config.log.level.to_string().to_lowercase()
    };
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(config = ?ctx.config_path, "configuration loaded");

    let result = match cli.command {
        Commands::Feed(args) => commands::feed::run(args, &ctx).await,
        Commands::Compile(args) => commands::compile::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
