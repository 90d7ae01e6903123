//! End-to-end recommendation pipeline
//!
//! Transactions → monthly features → per-category models → iterative
//! forecast → card ranking. Every stage error propagates unchanged.

use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::features::FeatureBuilder;
use crate::forecast::{check_horizon, ForecastEngine, ForecastStep};
use crate::models::{PerCategory, Transaction};
use crate::regressor::Regressor;
use crate::rewards::{CardCatalog, CardReward, RewardOptimizer, SpendingProfile};
use crate::training::{CategoryModelBank, TrainingMetrics};

/// Result of a recommendation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationReport {
    /// Card with the highest net reward
    pub recommended_card: String,
    pub predicted_net_reward: f64,
    /// Every card, best first
    pub comparison: Vec<CardReward>,
    pub forecast: Vec<ForecastStep>,
    pub annual_spending: SpendingProfile,
    pub metrics: PerCategory<TrainingMetrics>,
}

impl RecommendationReport {
    /// The recommended card's ranking entry
    pub fn best(&self) -> Option<&CardReward> {
        self.comparison.first()
    }
}

/// Forecasts spending and recommends the best card from a catalog
///
/// Holds no state between calls: models are trained fresh for each request.
pub struct PredictionService {
    catalog: CardCatalog,
    bank: CategoryModelBank,
}

impl PredictionService {
    pub fn new(catalog: CardCatalog, regressor: Box<dyn Regressor>) -> Self {
        Self {
            catalog,
            bank: CategoryModelBank::new(regressor),
        }
    }

    /// Override the number of trailing months held out for testing
    pub fn with_holdout(mut self, holdout: usize) -> Self {
        self.bank = self.bank.with_holdout(holdout);
        self
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.catalog.clone(), config.model.build()).with_holdout(config.forecast.holdout)
    }

    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    /// Run the full pipeline for a transaction history
    pub fn recommend(
        &self,
        transactions: &[Transaction],
        horizon: usize,
    ) -> Result<RecommendationReport> {
        check_horizon(horizon)?;

        let rows = FeatureBuilder::build(transactions)?;
        let trained = self.bank.train(&rows)?;
        let forecast = ForecastEngine::forecast(&rows, &trained.models, horizon)?;
        let (comparison, annual_spending) = RewardOptimizer::rank(&forecast, &self.catalog)?;

        let best = comparison.first().ok_or(Error::EmptyCatalog)?;
        let recommended_card = best.card_id.clone();
        let predicted_net_reward = best.net_reward;

        info!(
            transactions = transactions.len(),
            months = rows.len(),
            horizon,
            card = %recommended_card,
            net_reward = predicted_net_reward,
            "Recommendation complete"
        );

        Ok(RecommendationReport {
            recommended_card,
            predicted_net_reward,
            comparison,
            forecast,
            annual_spending,
            metrics: trained.metrics,
        })
    }
}
