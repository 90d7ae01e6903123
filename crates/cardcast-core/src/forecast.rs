//! Iterative multi-step spending forecast
//!
//! Each forecast month is predicted from a feature row derived from the
//! previous month, so month k's lag features are month k-1's predictions.
//! The working sequence lives in an explicit [`ForecastState`] accumulator;
//! historical rows are borrowed, never mutated.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::features::MonthlyFeatureRow;
use crate::models::{Category, PerCategory};
use crate::training::CategoryModel;

/// Longest forecast, in months
pub const MAX_HORIZON: usize = 120;

/// Reject horizons outside `1..=MAX_HORIZON`
pub fn check_horizon(horizon: usize) -> Result<()> {
    if horizon == 0 || horizon > MAX_HORIZON {
        return Err(Error::InvalidHorizon(horizon));
    }
    Ok(())
}

/// Predicted spending for one future month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastStep {
    /// 1-based distance from the last historical month
    pub months_ahead: usize,
    /// Calendar month (1-12)
    pub month: u32,
    pub year: i32,
    /// Non-negative predicted spending per category
    pub predictions: PerCategory<f64>,
    pub total_predicted: f64,
}

/// Working sequence for a forecast run
///
/// Starts from the last historical row and grows by one provisional row per
/// step. Only the last row is needed to derive the next candidate: it carries
/// the previous month's spending and lag1, which become the new lag1 and
/// lag2.
#[derive(Debug, Clone)]
pub struct ForecastState {
    history_len: usize,
    projected: Vec<MonthlyFeatureRow>,
    last_historical: MonthlyFeatureRow,
}

impl ForecastState {
    pub fn new(history: &[MonthlyFeatureRow]) -> Result<Self> {
        let last = history.last().ok_or(Error::EmptyInput)?;
        Ok(Self {
            history_len: history.len(),
            projected: Vec::new(),
            last_historical: last.clone(),
        })
    }

    /// Most recent row, historical or projected
    pub fn last(&self) -> &MonthlyFeatureRow {
        self.projected.last().unwrap_or(&self.last_historical)
    }

    /// Candidate feature row for the next month
    pub fn next_candidate(&self) -> MonthlyFeatureRow {
        self.last().successor()
    }

    /// Record a completed month so the next step can lag on it
    pub fn push(&mut self, row: MonthlyFeatureRow) {
        self.projected.push(row);
    }

    /// Rows appended by the forecast so far
    pub fn projected(&self) -> &[MonthlyFeatureRow] {
        &self.projected
    }

    /// History length plus projected rows
    pub fn len(&self) -> usize {
        self.history_len + self.projected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Rolls trained category models forward month by month
pub struct ForecastEngine;

impl ForecastEngine {
    /// Forecast `horizon` months beyond the last historical row
    pub fn forecast(
        rows: &[MonthlyFeatureRow],
        models: &PerCategory<CategoryModel>,
        horizon: usize,
    ) -> Result<Vec<ForecastStep>> {
        check_horizon(horizon)?;

        let mut state = ForecastState::new(rows)?;
        let mut steps = Vec::with_capacity(horizon);

        for months_ahead in 1..=horizon {
            let (step, row) = Self::step(&state, models, months_ahead);
            debug!(
                months_ahead,
                month = step.month,
                total = step.total_predicted,
                "Forecast step"
            );
            state.push(row);
            steps.push(step);
        }

        Ok(steps)
    }

    /// Predict one month from the current state
    ///
    /// Returns the step and the completed row to append. Categories are
    /// independent of each other within a step.
    pub fn step(
        state: &ForecastState,
        models: &PerCategory<CategoryModel>,
        months_ahead: usize,
    ) -> (ForecastStep, MonthlyFeatureRow) {
        let mut row = state.next_candidate();

        let predictions =
            PerCategory::from_fn(|category: Category| models[category].predict_row(&row).max(0.0));
        row.spending = predictions.clone();

        let step = ForecastStep {
            months_ahead,
            month: row.month,
            year: row.year,
            total_predicted: predictions.total(),
            predictions,
        };

        (step, row)
    }
}
