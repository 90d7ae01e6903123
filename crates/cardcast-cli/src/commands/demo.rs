//! Demo command implementation
//!
//! Runs the full pipeline on generated transactions so the tool can be tried
//! without a real statement export.

use anyhow::{anyhow, Result};
use cardcast_core::fixtures::{generate_transactions, history_span};
use cardcast_core::{Config, PredictionService};
use chrono::{Local, NaiveDate};

use super::{emit_report, resolve_horizon, run_recommendation};

pub async fn cmd_demo(
    config: &Config,
    months: usize,
    seed: u64,
    horizon: Option<usize>,
    json: bool,
) -> Result<()> {
    // History ends today
    let start = history_span(months)
        .and_then(|span| Local::now().date_naive().checked_sub_signed(span))
        .ok_or_else(|| anyhow!("--months {} reaches past the supported date range", months))?;
    run_demo(config, months, seed, start, horizon, json).await
}

/// Demo with an explicit history start date
pub async fn run_demo(
    config: &Config,
    months: usize,
    seed: u64,
    start: NaiveDate,
    horizon: Option<usize>,
    json: bool,
) -> Result<()> {
    let horizon = resolve_horizon(config, horizon)?;
    let transactions = generate_transactions(months, start, seed)?;

    if !json {
        println!(
            "🎲 Generated {} sample transactions over {} months (seed {})",
            transactions.len(),
            months,
            seed
        );
    }

    let service = PredictionService::from_config(config);
    let report = run_recommendation(service, transactions, horizon, None).await?;

    emit_report(&report, json)
}
