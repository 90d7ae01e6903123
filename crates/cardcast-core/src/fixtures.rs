//! Synthetic transaction history for demos and tests
//!
//! Generates category-shaped spending with 2% monthly growth and seasonal
//! peaks (holidays x1.4, summer x1.2). Deterministic for a given seed.

use chrono::{Datelike, Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};
use crate::features::{is_holiday_season, is_summer};
use crate::models::{Category, Transaction};

/// Days between generated month starts
const MONTH_SPACING_DAYS: i64 = 30;

/// Smallest generated amount
const MIN_AMOUNT: f64 = 5.0;

/// Typical transactions per month before growth and seasonality
fn base_count(category: Category) -> f64 {
    match category {
        Category::Groceries => 25.0,
        Category::Dining => 15.0,
        Category::Travel => 3.0,
        Category::Gas => 8.0,
        Category::Online => 12.0,
        Category::Bills => 5.0,
        Category::Entertainment => 6.0,
        Category::Others => 8.0,
    }
}

fn seasonal_factor(month: u32) -> f64 {
    if is_holiday_season(month) {
        1.4
    } else if is_summer(month) {
        1.2
    } else {
        1.0
    }
}

/// Exponential sample with the given mean (inverse CDF)
fn exponential(rng: &mut StdRng, mean: f64) -> f64 {
    let u: f64 = rng.gen();
    -(1.0 - u).ln() * mean
}

/// Normal sample (Box-Muller)
fn normal(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + z * std_dev
}

fn sample_amount(rng: &mut StdRng, category: Category, growth: f64, seasonal: f64) -> f64 {
    let amount = match category {
        Category::Travel => exponential(rng, 300.0) * seasonal + 50.0,
        Category::Groceries => exponential(rng, 60.0) * growth + 20.0,
        Category::Dining => exponential(rng, 40.0) * growth + 15.0,
        Category::Gas => exponential(rng, 35.0) + 20.0,
        Category::Bills => normal(rng, 150.0, 30.0) * growth,
        Category::Online | Category::Entertainment | Category::Others => {
            exponential(rng, 50.0) + 10.0
        }
    };
    (amount.max(MIN_AMOUNT) * 100.0).round() / 100.0
}

/// Calendar span covered by `months` generated months
///
/// `None` when the span doesn't fit in a `Duration`.
pub fn history_span(months: usize) -> Option<Duration> {
    i64::try_from(months)
        .ok()?
        .checked_mul(MONTH_SPACING_DAYS)
        .and_then(Duration::try_days)
}

/// Generate `months` of synthetic spending starting at `start`, sorted by date
///
/// Months are spaced 30 days apart, so two generated months can fall in the
/// same calendar month over a long run. Fails if the last month would land
/// past the latest representable date.
pub fn generate_transactions(
    months: usize,
    start: NaiveDate,
    seed: u64,
) -> Result<Vec<Transaction>> {
    history_span(months)
        .and_then(|span| start.checked_add_signed(span))
        .ok_or_else(|| {
            Error::InvalidData(format!(
                "{} months from {} runs past the supported date range",
                months, start
            ))
        })?;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut transactions = Vec::new();

    for month in 0..months {
        let month_start = start + Duration::days(month as i64 * MONTH_SPACING_DAYS);
        let growth = 1.0 + month as f64 * 0.02;
        let seasonal = seasonal_factor(month_start.month());

        for category in Category::ALL {
            let jitter: f64 = rng.gen_range(0.8..1.2);
            let count = (base_count(category) * growth * seasonal * jitter) as usize;

            for _ in 0..count {
                let date = month_start + Duration::days(rng.gen_range(0..MONTH_SPACING_DAYS));
                let amount = sample_amount(&mut rng, category, growth, seasonal);
                // Amounts are floored at MIN_AMOUNT, so construction cannot fail
                if let Ok(tx) = Transaction::new(date, category, amount) {
                    transactions.push(tx);
                }
            }
        }
    }

    transactions.sort_by_key(|tx| tx.date());
    Ok(transactions)
}
