//! Cardcast Core Library
//!
//! Spending forecast and credit card recommendation:
//! - Monthly feature engineering from raw transactions
//! - Per-category regression models (random forest or ridge)
//! - Iterative multi-month spending forecast
//! - Card ranking by net annual reward
//! - CSV transaction import and layered TOML configuration

pub mod config;
pub mod error;
pub mod features;
pub mod forecast;
pub mod import;
pub mod metrics;
pub mod models;
pub mod regressor;
pub mod rewards;
pub mod service;
pub mod training;

/// Synthetic transaction generator for demos and tests
#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use config::{default_config_path, Config, ForecastConfig};
pub use error::{Error, Result};
pub use features::{FeatureBuilder, MonthlyFeatureRow};
pub use forecast::{check_horizon, ForecastEngine, ForecastState, ForecastStep, MAX_HORIZON};
pub use import::{parse_csv, sort_by_date};
pub use models::{Category, PerCategory, Transaction};
pub use regressor::{
    FittedRegressor, RandomForestRegressor, Regressor, RegressorConfig, RegressorKind,
    RidgeRegressor, StandardScaler,
};
pub use rewards::{CardCatalog, CardProduct, CardReward, RewardOptimizer, SpendingProfile};
pub use service::{PredictionService, RecommendationReport};
pub use training::{CategoryModel, CategoryModelBank, TrainedModels, TrainingMetrics};
