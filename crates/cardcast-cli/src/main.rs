//! Cardcast CLI - Spending forecast and card recommendation
//!
//! Usage:
//!   cardcast recommend --transactions FILE   Recommend a card from a CSV history
//!   cardcast demo --months 24                Run on generated sample data
//!   cardcast cards                           List the configured card catalog

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging on stderr so --json output stays clean
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Recommend {
            transactions,
            horizon,
            json,
            timeout_secs,
        } => commands::cmd_recommend(&config, &transactions, horizon, json, timeout_secs).await,
        Commands::Demo {
            months,
            seed,
            horizon,
            json,
        } => commands::cmd_demo(&config, months, seed, horizon, json).await,
        Commands::Cards => commands::cmd_cards(&config),
    }
}
