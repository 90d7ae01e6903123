//! Recommend command implementation

use std::fs::File;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use cardcast_core::{parse_csv, sort_by_date, Config, PredictionService};

use super::{emit_report, resolve_horizon, run_recommendation};

pub async fn cmd_recommend(
    config: &Config,
    file: &Path,
    horizon: Option<usize>,
    json: bool,
    timeout_secs: u64,
) -> Result<()> {
    let horizon = resolve_horizon(config, horizon)?;

    let csv_file =
        File::open(file).with_context(|| format!("Failed to open file: {}", file.display()))?;
    let mut transactions = parse_csv(csv_file)
        .with_context(|| format!("Failed to parse transactions from {}", file.display()))?;
    sort_by_date(&mut transactions);

    if !json {
        println!(
            "🔮 Forecasting {} months from {} transactions in {}...",
            horizon,
            transactions.len(),
            file.display()
        );
    }

    let timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));
    let service = PredictionService::from_config(config);
    let report = run_recommendation(service, transactions, horizon, timeout).await?;

    emit_report(&report, json)
}
