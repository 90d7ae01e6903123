//! Per-category model training
//!
//! One regressor per spending category, each trained on the monthly feature
//! table with a chronological holdout: the most recent months are reserved
//! for test metrics and never seen by the scaler or the regressor.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::features::{feature_names, MonthlyFeatureRow};
use crate::metrics::{mean_absolute_error, r2_score};
use crate::models::{Category, PerCategory};
use crate::regressor::{FittedRegressor, Regressor, StandardScaler};

/// Months held out for test metrics by default
pub const DEFAULT_HOLDOUT: usize = 2;

/// A fitted model for one category
///
/// Immutable after training; the scaler and feature names travel with the
/// regressor so forecasting reproduces the exact training transform.
pub struct CategoryModel {
    category: Category,
    regressor: Box<dyn FittedRegressor>,
    scaler: StandardScaler,
    feature_names: Vec<String>,
}

impl CategoryModel {
    pub fn new(
        category: Category,
        regressor: Box<dyn FittedRegressor>,
        scaler: StandardScaler,
        feature_names: Vec<String>,
    ) -> Self {
        Self {
            category,
            regressor,
            scaler,
            feature_names,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    /// Scale raw feature rows and predict
    pub fn predict(&self, features: &[Vec<f64>]) -> Vec<f64> {
        self.regressor.predict(&self.scaler.transform_all(features))
    }

    /// Predict for a single monthly row
    pub fn predict_row(&self, row: &MonthlyFeatureRow) -> f64 {
        let scaled = self.scaler.transform(&row.features_for(self.category));
        self.regressor
            .predict(&[scaled])
            .first()
            .copied()
            .unwrap_or(0.0)
    }
}

impl fmt::Debug for CategoryModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategoryModel")
            .field("category", &self.category)
            .field("feature_names", &self.feature_names)
            .finish_non_exhaustive()
    }
}

/// Diagnostic accuracy for one category's model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub train_mae: f64,
    pub test_mae: f64,
    /// `None` when the split has fewer than two samples
    pub train_r2: Option<f64>,
    pub test_r2: Option<f64>,
    pub train_samples: usize,
    pub test_samples: usize,
}

/// Output of [`CategoryModelBank::train`]
#[derive(Debug)]
pub struct TrainedModels {
    pub models: PerCategory<CategoryModel>,
    pub metrics: PerCategory<TrainingMetrics>,
}

/// Trains one model per category with a shared regressor backend
pub struct CategoryModelBank {
    regressor: Box<dyn Regressor>,
    holdout: usize,
}

impl CategoryModelBank {
    pub fn new(regressor: Box<dyn Regressor>) -> Self {
        Self {
            regressor,
            holdout: DEFAULT_HOLDOUT,
        }
    }

    /// Override the number of trailing months held out for testing
    pub fn with_holdout(mut self, holdout: usize) -> Self {
        self.holdout = holdout;
        self
    }

    pub fn holdout(&self) -> usize {
        self.holdout
    }

    /// Minimum monthly rows needed to train
    pub fn min_history(&self) -> usize {
        self.holdout + 1
    }

    /// Train every category's model on the monthly rows
    pub fn train(&self, rows: &[MonthlyFeatureRow]) -> Result<TrainedModels> {
        let required = self.min_history().max(3);
        if rows.len() < required {
            return Err(Error::InsufficientHistory {
                rows: rows.len(),
                required,
            });
        }

        let split = rows.len() - self.holdout;
        info!(
            regressor = self.regressor.name(),
            train_rows = split,
            test_rows = self.holdout,
            "Training category models"
        );

        let mut metrics: Vec<TrainingMetrics> = Vec::with_capacity(Category::COUNT);
        let models = PerCategory::try_from_fn(|category| {
            let (model, category_metrics) = self.train_category(category, rows, split)?;
            metrics.push(category_metrics);
            Ok::<_, Error>(model)
        })?;
        let mut metrics = metrics.into_iter();
        let metrics = PerCategory::try_from_fn(|category| {
            metrics.next().ok_or_else(|| {
                Error::Model(format!("missing training metrics for {}", category))
            })
        })?;

        Ok(TrainedModels { models, metrics })
    }

    fn train_category(
        &self,
        category: Category,
        rows: &[MonthlyFeatureRow],
        split: usize,
    ) -> Result<(CategoryModel, TrainingMetrics)> {
        let features: Vec<Vec<f64>> = rows.iter().map(|r| r.features_for(category)).collect();
        let targets: Vec<f64> = rows.iter().map(|r| r.spending[category]).collect();

        let (train_x, test_x) = features.split_at(split);
        let (train_y, test_y) = targets.split_at(split);

        let scaler = StandardScaler::fit(train_x)?;
        let fitted = self.regressor.fit(&scaler.transform_all(train_x), train_y)?;
        let model = CategoryModel::new(category, fitted, scaler, feature_names(category));

        let train_pred = model.predict(train_x);
        let test_pred = model.predict(test_x);

        let metrics = TrainingMetrics {
            train_mae: mean_absolute_error(train_y, &train_pred),
            test_mae: mean_absolute_error(test_y, &test_pred),
            train_r2: r2_score(train_y, &train_pred),
            test_r2: r2_score(test_y, &test_pred),
            train_samples: train_y.len(),
            test_samples: test_y.len(),
        };

        debug!(
            category = %category,
            train_mae = metrics.train_mae,
            test_mae = metrics.test_mae,
            "Trained category model"
        );

        Ok((model, metrics))
    }
}
