//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cardcast_core::{
    fixtures::generate_transactions, Config, FittedRegressor, PredictionService, Regressor,
    RidgeRegressor, MAX_HORIZON,
};
use chrono::NaiveDate;
use clap::Parser;
use tempfile::{tempdir, TempDir};

use crate::cli::{Cli, Commands};
use crate::commands;

/// Small, fast config: ridge backend, default catalog
fn test_config() -> Config {
    Config::from_toml("[model]\nkind = \"ridge\"\n").unwrap()
}

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Write a six-month CSV history into a temp dir
fn write_history_csv(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("history.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "date,category,amount").unwrap();
    for month in 1..=6 {
        writeln!(file, "2024-{:02}-03,groceries,\"$3{}0.00\"", month, month).unwrap();
        writeln!(file, "{:02}/15/2024,dining,8{}.50", month, month).unwrap();
        writeln!(file, "2024-{:02}-20,gas,45.00", month).unwrap();
    }
    path
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_recommend_args() {
    let cli = Cli::try_parse_from([
        "cardcast",
        "recommend",
        "--transactions",
        "history.csv",
        "--horizon",
        "6",
        "--json",
    ])
    .unwrap();

    assert!(!cli.verbose);
    assert!(cli.config.is_none());
    match cli.command {
        Commands::Recommend {
            transactions,
            horizon,
            json,
            timeout_secs,
        } => {
            assert_eq!(transactions, PathBuf::from("history.csv"));
            assert_eq!(horizon, Some(6));
            assert!(json);
            assert_eq!(timeout_secs, 60);
        }
        _ => panic!("expected recommend"),
    }
}

#[test]
fn test_parse_global_flags_after_subcommand() {
    let cli =
        Cli::try_parse_from(["cardcast", "demo", "--config", "cards.toml", "-v", "--seed", "7"])
            .unwrap();

    assert!(cli.verbose);
    assert_eq!(cli.config.as_deref(), Some(Path::new("cards.toml")));
    match cli.command {
        Commands::Demo {
            months,
            seed,
            horizon,
            json,
        } => {
            assert_eq!(months, 24);
            assert_eq!(seed, 7);
            assert_eq!(horizon, None);
            assert!(!json);
        }
        _ => panic!("expected demo"),
    }
}

#[test]
fn test_recommend_requires_transactions() {
    assert!(Cli::try_parse_from(["cardcast", "recommend"]).is_err());
}

// ========== Config Tests ==========

#[test]
fn test_load_config_missing_file() {
    let result = commands::load_config(Some(Path::new("/nonexistent/cardcast.toml")));
    assert!(result.is_err());
}

#[test]
fn test_load_config_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cardcast.toml");
    std::fs::write(&path, "[forecast]\nhorizon = 4\n").unwrap();

    let config = commands::load_config(Some(&path)).unwrap();
    assert_eq!(config.forecast.horizon, 4);
    assert_eq!(config.source.as_deref(), Some(path.as_path()));
}

#[test]
fn test_resolve_horizon() {
    let config = test_config();
    assert_eq!(commands::resolve_horizon(&config, None).unwrap(), 3);
    assert_eq!(commands::resolve_horizon(&config, Some(5)).unwrap(), 5);
    assert!(commands::resolve_horizon(&config, Some(0)).is_err());
    assert_eq!(
        commands::resolve_horizon(&config, Some(MAX_HORIZON)).unwrap(),
        MAX_HORIZON
    );
    assert!(commands::resolve_horizon(&config, Some(MAX_HORIZON + 1)).is_err());
    assert!(commands::resolve_horizon(&config, Some(usize::MAX)).is_err());
}

// ========== Command Tests ==========

#[test]
fn test_cmd_cards() {
    let result = commands::cmd_cards(&test_config());
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cmd_recommend() {
    let dir = tempdir().unwrap();
    let csv = write_history_csv(&dir);

    let result = commands::cmd_recommend(&test_config(), &csv, Some(2), false, 30).await;
    assert!(result.is_ok(), "{:?}", result);

    let result = commands::cmd_recommend(&test_config(), &csv, None, true, 0).await;
    assert!(result.is_ok(), "{:?}", result);
}

#[tokio::test]
async fn test_cmd_recommend_missing_file() {
    let result = commands::cmd_recommend(
        &test_config(),
        Path::new("/nonexistent/history.csv"),
        None,
        false,
        30,
    )
    .await;

    assert!(result.unwrap_err().to_string().contains("Failed to open file"));
}

#[tokio::test]
async fn test_cmd_recommend_bad_csv() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    std::fs::write(&path, "date,category,amount\n2024-01-01,crypto,5.00\n").unwrap();

    let err = commands::cmd_recommend(&test_config(), &path, None, false, 30)
        .await
        .unwrap_err();
    assert!(format!("{:#}", err).contains("line 2"));
}

#[tokio::test]
async fn test_cmd_recommend_short_history() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("short.csv");
    std::fs::write(
        &path,
        "date,category,amount\n2024-01-01,dining,5.00\n2024-02-01,dining,6.00\n",
    )
    .unwrap();

    let err = commands::cmd_recommend(&test_config(), &path, None, false, 30)
        .await
        .unwrap_err();
    assert!(format!("{:#}", err).contains("Insufficient history"));
}

#[tokio::test]
async fn test_run_demo() {
    let result = commands::run_demo(&test_config(), 12, 42, start(), Some(3), false).await;
    assert!(result.is_ok(), "{:?}", result);

    let result = commands::run_demo(&test_config(), 12, 42, start(), Some(1), true).await;
    assert!(result.is_ok(), "{:?}", result);
}

#[tokio::test]
async fn test_cmd_demo_rejects_out_of_range_months() {
    for months in [usize::MAX, 10_000_000] {
        let err = commands::cmd_demo(&test_config(), months, 42, None, true)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("--months"), "{}", err);
    }

    let late = chrono::NaiveDate::MAX - chrono::Duration::days(10);
    assert!(commands::run_demo(&test_config(), 2, 42, late, None, true)
        .await
        .is_err());
}

#[tokio::test]
async fn test_run_demo_too_few_months() {
    let result = commands::run_demo(&test_config(), 1, 42, start(), None, false).await;
    assert!(result.is_err());
}

// ========== Pipeline Runner Tests ==========

#[tokio::test]
async fn test_run_recommendation_matches_direct_call() {
    let config = test_config();
    let transactions = generate_transactions(12, start(), 9).unwrap();

    let direct = PredictionService::from_config(&config)
        .recommend(&transactions, 2)
        .unwrap();
    let report = commands::run_recommendation(
        PredictionService::from_config(&config),
        transactions,
        2,
        Some(Duration::from_secs(30)),
    )
    .await
    .unwrap();

    assert_eq!(report, direct);
}

/// Regressor that blocks long enough to trip any short timeout
struct SlowRegressor;

impl Regressor for SlowRegressor {
    fn name(&self) -> &'static str {
        "slow"
    }

    fn fit(
        &self,
        features: &[Vec<f64>],
        targets: &[f64],
    ) -> cardcast_core::Result<Box<dyn FittedRegressor>> {
        std::thread::sleep(Duration::from_millis(200));
        RidgeRegressor::default().fit(features, targets)
    }
}

#[tokio::test]
async fn test_run_recommendation_times_out() {
    let config = test_config();
    let service = PredictionService::new(config.catalog.clone(), Box::new(SlowRegressor));
    let transactions = generate_transactions(6, start(), 1).unwrap();

    let err = commands::run_recommendation(
        service,
        transactions,
        1,
        Some(Duration::from_millis(50)),
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("timed out"));
}
