//! Shared command utilities
//!
//! This module contains:
//! - `load_config` - Resolve the config from --config, the data dir, or defaults
//! - `run_recommendation` - Run the blocking pipeline with an optional timeout
//! - `print_report` - Console rendering of a recommendation report

use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use cardcast_core::{
    check_horizon, Category, Config, PredictionService, RecommendationReport, Transaction,
};

/// Resolve config, reporting where it came from
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let config = Config::load(explicit).context("Failed to load config")?;
    match &config.source {
        Some(path) => tracing::debug!(path = %path.display(), "Using config file"),
        None => tracing::debug!("Using built-in config"),
    }
    Ok(config)
}

/// Resolve the forecast horizon from the flag or the config
pub fn resolve_horizon(config: &Config, horizon: Option<usize>) -> Result<usize> {
    let horizon = horizon.unwrap_or(config.forecast.horizon);
    check_horizon(horizon).context("Invalid --horizon")?;
    Ok(horizon)
}

/// Run the recommendation pipeline off the async runtime
///
/// The pipeline is CPU-bound, so it runs on the blocking pool. A timeout of
/// `None` waits indefinitely.
pub async fn run_recommendation(
    service: PredictionService,
    transactions: Vec<Transaction>,
    horizon: usize,
    timeout: Option<Duration>,
) -> Result<RecommendationReport> {
    let task = tokio::task::spawn_blocking(move || service.recommend(&transactions, horizon));

    let joined = match timeout {
        Some(limit) => tokio::time::timeout(limit, task)
            .await
            .map_err(|_| anyhow!("Recommendation timed out after {}s", limit.as_secs()))?,
        None => task.await,
    };

    let report = joined
        .context("Recommendation task failed")?
        .context("Recommendation failed")?;
    Ok(report)
}

/// Print a report as JSON or as console tables
pub fn emit_report(report: &RecommendationReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print_report(report);
    }
    Ok(())
}

pub fn print_report(report: &RecommendationReport) {
    // Monthly forecast: categories down, months across
    println!();
    println!("📅 Predicted Monthly Spending");
    println!("   ─────────────────────────────────────────────────────────────");
    let mut header = format!("   {:14}", "Category");
    for step in &report.forecast {
        header.push_str(&format!(" │ {:>9}", format!("{}-{:02}", step.year, step.month)));
    }
    println!("{}", header);

    for category in Category::ALL {
        let mut line = format!("   {:14}", category.as_str());
        for step in &report.forecast {
            line.push_str(&format!(" │ {:>9.2}", step.predictions[category]));
        }
        println!("{}", line);
    }

    let mut total = format!("   {:14}", "Total");
    for step in &report.forecast {
        total.push_str(&format!(" │ {:>9.2}", step.total_predicted));
    }
    println!("{}", total);

    // Annualized profile
    println!();
    println!("📊 Annual Spending Profile");
    println!("   ─────────────────────────────────────────────────────────────");
    for (category, amount) in report.annual_spending.annual.iter() {
        println!("   {:14} ${:>10.2}", category.as_str(), amount);
    }
    println!("   {:14} ${:>10.2}", "Total", report.annual_spending.total());

    // Model accuracy
    println!();
    println!("🎯 Model Accuracy");
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:14} │ {:>9} │ {:>9} │ {:>8}",
        "Category", "Train MAE", "Test MAE", "Test R²"
    );
    for (category, metrics) in report.metrics.iter() {
        let r2 = metrics
            .test_r2
            .map(|r| format!("{:.3}", r))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "   {:14} │ {:>9.2} │ {:>9.2} │ {:>8}",
            category.as_str(),
            metrics.train_mae,
            metrics.test_mae,
            r2
        );
    }

    // Card ranking
    println!();
    println!("💳 Card Ranking");
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "     {:14} │ {:>10} │ {:>8} │ {:>10}",
        "Card", "Rewards", "Fee", "Net"
    );
    for reward in &report.comparison {
        let marker = if reward.card_id == report.recommended_card {
            "⭐"
        } else {
            "  "
        };
        println!(
            "   {}{:14} │ {:>10.2} │ {:>8.2} │ {:>10.2}",
            marker, reward.card_id, reward.gross_reward, reward.annual_fee, reward.net_reward
        );
    }

    println!();
    println!(
        "✅ Recommended: {} (net ${:.2}/year)",
        report.recommended_card, report.predicted_net_reward
    );
}
