//! Monthly feature engineering
//!
//! Aggregates raw transactions into one row per calendar month and derives the
//! temporal features the per-category models train on:
//! - sequential month index and calendar month
//! - holiday (Nov-Dec) and summer (Jun-Aug) indicators
//! - monthly totals
//! - 1- and 2-month spending lags per category

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Category, PerCategory, Transaction};

/// Shared (non-lag) feature columns, in vector order
pub const BASE_FEATURES: [&str; 6] = [
    "month_index",
    "month",
    "is_holiday_season",
    "is_summer",
    "total_transactions",
    "total_spending",
];

/// Length of the feature vector built for each category
pub const FEATURE_COUNT: usize = BASE_FEATURES.len() + 2;

/// Column names of the feature vector for a category
pub fn feature_names(category: Category) -> Vec<String> {
    BASE_FEATURES
        .iter()
        .map(|name| name.to_string())
        .chain([
            format!("spending_{}_lag1", category),
            format!("spending_{}_lag2", category),
        ])
        .collect()
}

pub fn is_holiday_season(month: u32) -> bool {
    matches!(month, 11 | 12)
}

pub fn is_summer(month: u32) -> bool {
    matches!(month, 6..=8)
}

/// One month of aggregated spending plus engineered features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyFeatureRow {
    pub year: i32,
    /// Calendar month (1-12)
    pub month: u32,
    /// 0-based position in the monthly sequence
    pub month_index: usize,
    pub total_transactions: u32,
    pub total_spending: f64,
    pub spending: PerCategory<f64>,
    pub counts: PerCategory<u32>,
    pub is_holiday_season: bool,
    pub is_summer: bool,
    /// Spending in the same category one row earlier (0 without history)
    pub lag1: PerCategory<f64>,
    /// Spending in the same category two rows earlier (0 without history)
    pub lag2: PerCategory<f64>,
}

impl MonthlyFeatureRow {
    /// Feature vector for one category's model, ordered as [`feature_names`]
    pub fn features_for(&self, category: Category) -> Vec<f64> {
        vec![
            self.month_index as f64,
            self.month as f64,
            bool_feature(self.is_holiday_season),
            bool_feature(self.is_summer),
            self.total_transactions as f64,
            self.total_spending,
            self.lag1[category],
            self.lag2[category],
        ]
    }

    /// Candidate row for the following month
    ///
    /// Calendar month wraps December to January (incrementing the year),
    /// seasonal flags are recomputed and lags shift forward one position.
    /// Totals and counts carry forward unchanged since nothing predicts them.
    /// Spending is zeroed until the caller fills in predictions.
    pub fn successor(&self) -> MonthlyFeatureRow {
        let month = (self.month % 12) + 1;
        let year = if month == 1 { self.year + 1 } else { self.year };

        MonthlyFeatureRow {
            year,
            month,
            month_index: self.month_index + 1,
            total_transactions: self.total_transactions,
            total_spending: self.total_spending,
            spending: PerCategory::default(),
            counts: self.counts.clone(),
            is_holiday_season: is_holiday_season(month),
            is_summer: is_summer(month),
            lag1: self.spending.clone(),
            lag2: self.lag1.clone(),
        }
    }

    /// `YYYY-MM` label for display
    pub fn period(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

fn bool_feature(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

/// Per-month accumulator used while grouping transactions
struct MonthBucket {
    year: i32,
    month: u32,
    spending: PerCategory<f64>,
    counts: PerCategory<u32>,
}

/// Converts transaction history into monthly feature rows
pub struct FeatureBuilder;

impl FeatureBuilder {
    /// Group transactions by calendar year-month and derive features
    ///
    /// Periods are emitted in first-seen order; callers must supply
    /// transactions in ascending date order.
    pub fn build(transactions: &[Transaction]) -> Result<Vec<MonthlyFeatureRow>> {
        if transactions.is_empty() {
            return Err(Error::EmptyInput);
        }

        let mut buckets: Vec<MonthBucket> = Vec::new();
        for tx in transactions {
            let (year, month) = (tx.date().year(), tx.date().month());
            let position = match buckets
                .iter()
                .position(|b| b.year == year && b.month == month)
            {
                Some(position) => position,
                None => {
                    buckets.push(MonthBucket {
                        year,
                        month,
                        spending: PerCategory::default(),
                        counts: PerCategory::default(),
                    });
                    buckets.len() - 1
                }
            };

            let bucket = &mut buckets[position];
            bucket.spending[tx.category()] += tx.amount();
            bucket.counts[tx.category()] += 1;
        }

        let mut rows: Vec<MonthlyFeatureRow> = Vec::with_capacity(buckets.len());
        for (month_index, bucket) in buckets.into_iter().enumerate() {
            let lag1 = match rows.last() {
                Some(prev) => prev.spending.clone(),
                None => PerCategory::default(),
            };
            let lag2 = match month_index.checked_sub(2).map(|i| &rows[i]) {
                Some(prev) => prev.spending.clone(),
                None => PerCategory::default(),
            };

            rows.push(MonthlyFeatureRow {
                year: bucket.year,
                month: bucket.month,
                month_index,
                total_transactions: bucket.counts.values().sum(),
                total_spending: bucket.spending.total(),
                spending: bucket.spending,
                counts: bucket.counts,
                is_holiday_season: is_holiday_season(bucket.month),
                is_summer: is_summer(bucket.month),
                lag1,
                lag2,
            });
        }

        debug!(
            transactions = transactions.len(),
            months = rows.len(),
            "Built monthly feature rows"
        );

        Ok(rows)
    }
}
