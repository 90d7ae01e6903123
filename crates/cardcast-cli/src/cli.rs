//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Cardcast - Forecast your spending and pick the card that pays most
#[derive(Parser)]
#[command(name = "cardcast")]
#[command(about = "Spending forecast and credit card recommendation", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the data-dir override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Recommend a card from a transaction history CSV
    ///
    /// The CSV needs a header row with date, category and amount columns.
    /// Dates may be YYYY-MM-DD or MM/DD/YYYY.
    Recommend {
        /// Transaction CSV file
        #[arg(short, long)]
        transactions: PathBuf,

        /// Months to forecast (defaults to the configured horizon)
        #[arg(long)]
        horizon: Option<usize>,

        /// Output the full report as JSON
        #[arg(long)]
        json: bool,

        /// Give up after this many seconds (0 = no limit)
        #[arg(long, default_value = "60")]
        timeout_secs: u64,
    },

    /// Run the pipeline on generated sample transactions
    Demo {
        /// Months of history to generate
        #[arg(long, default_value = "24")]
        months: usize,

        /// Seed for the generator
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Months to forecast (defaults to the configured horizon)
        #[arg(long)]
        horizon: Option<usize>,

        /// Output the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the configured card catalog
    Cards,
}
