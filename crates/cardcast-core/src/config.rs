//! Cardcast configuration: forecast window, regressor and card catalog
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a layered resolution:
//! 1. An explicit path (`--config`), which must exist
//! 2. An override in the data dir (~/.local/share/cardcast/config/cardcast.toml)
//! 3. The embedded defaults (compiled into binary)
//!
//! Sections missing from a file fall back to the embedded defaults. A `[cards]`
//! section replaces the whole default catalog rather than merging with it.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::forecast::check_horizon;
use crate::regressor::RegressorConfig;
use crate::rewards::{CardCatalog, CardProduct};
use crate::training::DEFAULT_HOLDOUT;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/cardcast.toml");

/// Forecast window settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Months to forecast ahead
    pub horizon: usize,
    /// Trailing months held out for test metrics
    pub holdout: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: 3,
            holdout: DEFAULT_HOLDOUT,
        }
    }
}

/// Fully resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub forecast: ForecastConfig,
    pub model: RegressorConfig,
    pub catalog: CardCatalog,
    /// File the config was read from (`None` for embedded defaults)
    pub source: Option<PathBuf>,
}

impl Config {
    /// Embedded defaults only
    pub fn embedded() -> Result<Self> {
        let defaults = Self {
            forecast: ForecastConfig::default(),
            model: RegressorConfig::default(),
            catalog: CardCatalog::new(),
            source: None,
        };
        parse_config(DEFAULT_CONFIG, defaults)
    }

    /// Resolve config from an explicit path, the data-dir override, or defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                Some(path.to_path_buf())
            }
            None => default_config_path().filter(|p| p.exists()),
        };

        match path {
            Some(path) => Self::from_file(&path),
            None => Self::embedded(),
        }
    }

    /// Read a config file layered over the embedded defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let mut config = Self::from_toml(&content)?;
        config.source = Some(path.to_path_buf());
        debug!(path = %path.display(), cards = config.catalog.len(), "Loaded config");
        Ok(config)
    }

    /// Parse TOML content layered over the embedded defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content, Self::embedded()?)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("cardcast").join("config").join("cardcast.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    forecast: Option<RawForecast>,
    model: Option<RawModel>,
    cards: Option<toml::Table>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    horizon: Option<usize>,
    holdout: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawModel {
    kind: Option<String>,
    n_estimators: Option<usize>,
    max_depth: Option<usize>,
    min_samples_split: Option<usize>,
    seed: Option<u64>,
    alpha: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawCard {
    annual_fee: f64,
    rates: HashMap<String, f64>,
}

/// Parse config from TOML content over a base config
fn parse_config(content: &str, base: Config) -> Result<Config> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("invalid config TOML: {}", e)))?;

    let mut config = base;

    if let Some(forecast) = raw.forecast {
        if let Some(horizon) = forecast.horizon {
            check_horizon(horizon)
                .map_err(|e| Error::Config(format!("forecast.horizon: {}", e)))?;
            config.forecast.horizon = horizon;
        }
        if let Some(holdout) = forecast.holdout {
            config.forecast.holdout = holdout;
        }
    }

    if let Some(model) = raw.model {
        if let Some(kind) = model.kind {
            config.model.kind = kind.parse().map_err(Error::Config)?;
        }
        if let Some(n) = model.n_estimators {
            config.model.n_estimators = n;
        }
        if let Some(depth) = model.max_depth {
            config.model.max_depth = depth;
        }
        if let Some(min_split) = model.min_samples_split {
            config.model.min_samples_split = min_split;
        }
        if let Some(seed) = model.seed {
            config.model.seed = seed;
        }
        if let Some(alpha) = model.alpha {
            config.model.alpha = alpha;
        }
    }

    if let Some(cards) = raw.cards {
        config.catalog = parse_catalog(cards)?;
    }

    Ok(config)
}

/// Build a catalog from the `[cards]` table, keeping declaration order
fn parse_catalog(cards: toml::Table) -> Result<CardCatalog> {
    let mut catalog = CardCatalog::new();

    for (card_id, value) in cards {
        let raw = value
            .try_into::<RawCard>()
            .map_err(|e| Error::Config(format!("invalid card {}: {}", card_id, e)))?;
        let product = CardProduct::from_rate_map(&card_id, raw.annual_fee, &raw.rates)?;
        catalog.add(card_id, product)?;
    }

    if catalog.is_empty() {
        return Err(Error::EmptyCatalog);
    }
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use crate::regressor::RegressorKind;
    use std::io::Write;

    #[test]
    fn test_parse_default_config() {
        let config = Config::embedded().unwrap();

        assert_eq!(config.forecast.horizon, 3);
        assert_eq!(config.forecast.holdout, 2);
        assert_eq!(config.model, RegressorConfig::default());
        assert!(config.source.is_none());

        let ids: Vec<&str> = config.catalog.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["Card_A", "Card_B", "Card_C", "Card_D", "Card_E"]);

        let card_e = config.catalog.get("Card_E").unwrap();
        assert_eq!(card_e.annual_fee(), 450.0);
        assert_eq!(card_e.rate(Category::Others), 0.01);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [forecast]
            horizon = 6

            [model]
            kind = "ridge"
            alpha = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(config.forecast.horizon, 6);
        assert_eq!(config.forecast.holdout, 2);
        assert_eq!(config.model.kind, RegressorKind::Ridge);
        assert_eq!(config.model.alpha, 0.5);
        assert_eq!(config.model.seed, 42);
        assert_eq!(config.catalog.len(), 5);
    }

    #[test]
    fn test_cards_section_replaces_catalog_in_order() {
        let config = Config::from_toml(
            r#"
            [cards.Zeta]
            annual_fee = 10
            rates = { groceries = 0.01, dining = 0.01, travel = 0.01, gas = 0.01, online = 0.01, bills = 0.01, entertainment = 0.01, others = 0.01 }

            [cards.Alpha]
            annual_fee = 0.0
            rates = { groceries = 0.02, dining = 0.0, travel = 0.0, gas = 0.0, online = 0.0, bills = 0.0, entertainment = 0.0, others = 0.0 }
            "#,
        )
        .unwrap();

        let ids: Vec<&str> = config.catalog.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["Zeta", "Alpha"]);
        assert_eq!(config.catalog.get("Zeta").unwrap().annual_fee(), 10.0);
    }

    #[test]
    fn test_card_missing_category_fails() {
        let err = Config::from_toml(
            r#"
            [cards.Partial]
            annual_fee = 0.0
            rates = { groceries = 0.02, dining = 0.01 }
            "#,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            Error::UnknownCategoryRate { ref card, .. } if card == "Partial"
        ));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            Config::from_toml("[forecast]\nhorizon = 0\n"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_toml("[forecast]\nhorizon = 121\n"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_toml("[model]\nkind = \"svm\"\n"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_toml("not toml ["),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_toml("[cards.Bad]\nrates = {}\n"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[forecast]\nhorizon = 12").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.forecast.horizon, 12);
        assert_eq!(config.source.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let err = Config::load(Some(Path::new("/nonexistent/cardcast.toml"))).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_unreadable_path_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.starts_with("failed to read")));
    }
}
