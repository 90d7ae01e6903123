//! Pluggable regression backends
//!
//! The training and forecasting pipeline only needs a supervised regressor
//! that can be fitted on a feature matrix and then predict targets. Backends
//! implement [`Regressor`] and hand back a [`FittedRegressor`]:
//!
//! - [`RandomForestRegressor`] - bootstrap-aggregated CART trees (default)
//! - [`RidgeRegressor`] - closed-form L2-regularized linear regression
//!
//! [`RegressorConfig`] selects and parameterizes a backend from config.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

mod forest;
mod ridge;
mod scaler;

pub use forest::RandomForestRegressor;
pub use ridge::RidgeRegressor;
pub use scaler::StandardScaler;

/// A regression algorithm that can be fitted to data
pub trait Regressor: Send + Sync {
    /// Short identifier for logs and reports
    fn name(&self) -> &'static str;

    /// Fit on row-major features and matching targets
    fn fit(&self, features: &[Vec<f64>], targets: &[f64]) -> Result<Box<dyn FittedRegressor>>;
}

/// A trained model, read-only after fitting
pub trait FittedRegressor: Send + Sync + fmt::Debug {
    /// Predict one value per feature row
    fn predict(&self, features: &[Vec<f64>]) -> Vec<f64>;
}

/// Validate a training set, returning the feature width
pub(crate) fn check_training_data(features: &[Vec<f64>], targets: &[f64]) -> Result<usize> {
    if features.is_empty() {
        return Err(Error::Model("cannot fit on an empty training set".into()));
    }
    if features.len() != targets.len() {
        return Err(Error::Model(format!(
            "{} feature rows but {} targets",
            features.len(),
            targets.len()
        )));
    }

    let width = features[0].len();
    if width == 0 {
        return Err(Error::Model("feature rows are empty".into()));
    }
    if let Some(row) = features.iter().position(|r| r.len() != width) {
        return Err(Error::Model(format!(
            "feature row {} has {} columns, expected {}",
            row,
            features[row].len(),
            width
        )));
    }
    if features.iter().flatten().chain(targets).any(|v| !v.is_finite()) {
        return Err(Error::Model("training data contains non-finite values".into()));
    }

    Ok(width)
}

/// Supported regressor backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RegressorKind {
    #[default]
    RandomForest,
    Ridge,
}

impl RegressorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RandomForest => "random_forest",
            Self::Ridge => "ridge",
        }
    }
}

impl std::str::FromStr for RegressorKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random_forest" | "forest" | "rf" => Ok(Self::RandomForest),
            "ridge" | "linear" => Ok(Self::Ridge),
            _ => Err(format!("Unknown regressor: {}", s)),
        }
    }
}

impl fmt::Display for RegressorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Regressor selection and hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressorConfig {
    pub kind: RegressorKind,
    /// Trees in the forest
    pub n_estimators: usize,
    /// Maximum tree depth
    pub max_depth: usize,
    /// Minimum samples a node needs before it may split
    pub min_samples_split: usize,
    /// RNG seed for bootstrap sampling
    pub seed: u64,
    /// Ridge regularization strength
    pub alpha: f64,
}

impl Default for RegressorConfig {
    fn default() -> Self {
        Self {
            kind: RegressorKind::RandomForest,
            n_estimators: 100,
            max_depth: 8,
            min_samples_split: 3,
            seed: 42,
            alpha: 1.0,
        }
    }
}

impl RegressorConfig {
    /// Instantiate the configured backend
    pub fn build(&self) -> Box<dyn Regressor> {
        match self.kind {
            RegressorKind::RandomForest => Box::new(RandomForestRegressor::new(
                self.n_estimators,
                self.max_depth,
                self.min_samples_split,
                self.seed,
            )),
            RegressorKind::Ridge => Box::new(RidgeRegressor::new(self.alpha)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_training_data_errors() {
        assert!(check_training_data(&[], &[]).is_err());
        assert!(check_training_data(&[vec![1.0]], &[1.0, 2.0]).is_err());
        assert!(check_training_data(&[vec![1.0, 2.0], vec![1.0]], &[1.0, 2.0]).is_err());
        assert!(check_training_data(&[vec![f64::NAN]], &[1.0]).is_err());
        assert_eq!(
            check_training_data(&[vec![1.0, 2.0], vec![3.0, 4.0]], &[1.0, 2.0]).unwrap(),
            2
        );
    }

    #[test]
    fn test_regressor_kind_parse() {
        assert_eq!(
            "random_forest".parse::<RegressorKind>().unwrap(),
            RegressorKind::RandomForest
        );
        assert_eq!("Ridge".parse::<RegressorKind>().unwrap(), RegressorKind::Ridge);
        assert!("svm".parse::<RegressorKind>().is_err());
    }

    #[test]
    fn test_config_builds_backend() {
        let forest = RegressorConfig::default().build();
        assert_eq!(forest.name(), "random_forest");

        let ridge = RegressorConfig {
            kind: RegressorKind::Ridge,
            ..Default::default()
        }
        .build();
        assert_eq!(ridge.name(), "ridge");
    }
}
