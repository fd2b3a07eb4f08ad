//! Command-line interface.
//!
//! - `serve`: run the HTTP API (default)
//! - `usage`: print the usage summary
//! - `reset-usage`: clear usage stats
//! - `parse`: parse a model reply into a decision
//! - `models`: show which model each player uses

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use tracing::info;

use nollmit::action::ActionParser;
use nollmit::config::AppConfig;
use nollmit::usage::{UsageCounter, UsageSummary};

/// LLM poker decision service
#[derive(Parser, Debug)]
#[command(name = "nollmit")]
#[command(about = "Ask language models for poker decisions and track provider usage")]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ./nollmit.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Show estimated provider usage
    Usage {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Clear all usage stats
    ResetUsage,
    /// Parse a model reply (argument or stdin) and print the decision as JSON
    Parse {
        /// Reply text; read from stdin when omitted
        text: Option<String>,
    },
    /// List players and the model each one resolves to
    Models,
}

/// Run the CLI command
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Parse { text }) => parse(text),
        Some(Commands::Usage { json }) => usage(&load(cli.config)?, json),
        Some(Commands::ResetUsage) => reset_usage(&load(cli.config)?),
        Some(Commands::Models) => models(&load(cli.config)?),
        Some(Commands::Serve) | None => {
            let config = load(cli.config)?;
            info!("Starting nollmit v{}", env!("CARGO_PKG_VERSION"));
            nollmit::server::serve(config).await
        }
    }
}

fn load(path: Option<PathBuf>) -> Result<AppConfig> {
    AppConfig::load(path.as_deref())
}

fn parse(text: Option<String>) -> Result<()> {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let decision = ActionParser::new().parse(&text);
    println!("{}", serde_json::to_string_pretty(&decision)?);
    Ok(())
}

fn usage(config: &AppConfig, json: bool) -> Result<()> {
    let summary = UsageCounter::open(config.usage_store()).summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &UsageSummary) {
    println!();
    println!("{}", summary.format());

    let free = &summary.limits.free;
    if free.daily_requests_remaining == 0 || free.tokens_remaining == 0 {
        println!("{}", "Free tier quota exhausted".red().bold());
    } else if free.tokens_used_pct >= 80.0 || free.daily_requests_used_pct >= 80.0 {
        println!("{}", "Free tier quota above 80%".yellow());
    }
}

fn reset_usage(config: &AppConfig) -> Result<()> {
    let mut counter = UsageCounter::open(config.usage_store());
    counter.reset();
    println!(
        "{} usage stats at {}",
        "Reset".green().bold(),
        config.usage.storage_path.display()
    );
    Ok(())
}

fn models(config: &AppConfig) -> Result<()> {
    let registry = config.registry();
    for player in registry.list() {
        println!("  {:<20} {}", player.bold(), registry.resolve(player));
    }
    println!("  {:<20} {}", "(default)".dimmed(), registry.default_model());
    Ok(())
}
