//! Card reward scoring
//!
//! Annualizes a spending forecast and ranks a card catalog by net reward
//! (gross cashback minus annual fee).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::forecast::ForecastStep;
use crate::models::{Category, PerCategory};

/// A credit card's fee and per-category reward rates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardProduct {
    annual_fee: f64,
    rates: PerCategory<f64>,
}

impl CardProduct {
    /// Validate and build a card from a complete rate table
    pub fn new(annual_fee: f64, rates: PerCategory<f64>) -> Result<Self> {
        if !annual_fee.is_finite() || annual_fee < 0.0 {
            return Err(Error::InvalidData(format!(
                "annual fee must be a non-negative number, got {}",
                annual_fee
            )));
        }
        if let Some((category, rate)) = rates.iter().find(|(_, r)| !r.is_finite() || **r < 0.0) {
            return Err(Error::InvalidData(format!(
                "reward rate for {} must be a non-negative fraction, got {}",
                category, rate
            )));
        }
        Ok(Self { annual_fee, rates })
    }

    /// Build a card from a label-keyed rate map
    ///
    /// Every category must be present; unknown labels are rejected.
    pub fn from_rate_map(card_id: &str, annual_fee: f64, rates: &HashMap<String, f64>) -> Result<Self> {
        let mut parsed: HashMap<Category, f64> = HashMap::with_capacity(rates.len());
        for (label, rate) in rates {
            parsed.insert(label.parse()?, *rate);
        }

        let table = PerCategory::try_from_fn(|category| {
            parsed
                .get(&category)
                .copied()
                .ok_or_else(|| Error::UnknownCategoryRate {
                    card: card_id.to_string(),
                    category,
                })
        })?;

        Self::new(annual_fee, table)
    }

    pub fn annual_fee(&self) -> f64 {
        self.annual_fee
    }

    pub fn rates(&self) -> &PerCategory<f64> {
        &self.rates
    }

    pub fn rate(&self, category: Category) -> f64 {
        self.rates[category]
    }

    /// Rewards earned on an annual spending profile, before the fee
    pub fn gross_reward(&self, annual: &PerCategory<f64>) -> f64 {
        annual
            .iter()
            .map(|(category, spend)| spend * self.rates[category])
            .sum()
    }
}

/// Ordered, read-only card catalog
///
/// Iteration order is insertion order, which decides ties when ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CardCatalog {
    cards: Vec<(String, CardProduct)>,
}

impl CardCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a card; ids must be unique
    pub fn add(&mut self, card_id: impl Into<String>, product: CardProduct) -> Result<()> {
        let card_id = card_id.into();
        if self.get(&card_id).is_some() {
            return Err(Error::DuplicateCard(card_id));
        }
        self.cards.push((card_id, product));
        Ok(())
    }

    pub fn with_card(mut self, card_id: impl Into<String>, product: CardProduct) -> Result<Self> {
        self.add(card_id, product)?;
        Ok(self)
    }

    pub fn get(&self, card_id: &str) -> Option<&CardProduct> {
        self.cards
            .iter()
            .find(|(id, _)| id == card_id)
            .map(|(_, card)| card)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CardProduct)> {
        self.cards.iter().map(|(id, card)| (id.as_str(), card))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Scored card in a ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardReward {
    pub card_id: String,
    pub gross_reward: f64,
    pub annual_fee: f64,
    pub net_reward: f64,
}

/// Annualized spending per category derived from a forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingProfile {
    pub annual: PerCategory<f64>,
}

impl SpendingProfile {
    /// Average the forecast months per category and scale to twelve months
    ///
    /// Treats the forecast window as representative of a full year.
    pub fn from_forecast(forecast: &[ForecastStep]) -> Result<Self> {
        if forecast.is_empty() {
            return Err(Error::InvalidHorizon(0));
        }

        let months = forecast.len() as f64;
        let annual = PerCategory::from_fn(|category| {
            let sum: f64 = forecast.iter().map(|step| step.predictions[category]).sum();
            sum / months * 12.0
        });

        Ok(Self { annual })
    }

    pub fn total(&self) -> f64 {
        self.annual.total()
    }
}

/// Ranks cards by net reward under a forecast
pub struct RewardOptimizer;

impl RewardOptimizer {
    /// Score every card against the annualized forecast, best first
    pub fn rank(
        forecast: &[ForecastStep],
        catalog: &CardCatalog,
    ) -> Result<(Vec<CardReward>, SpendingProfile)> {
        let profile = SpendingProfile::from_forecast(forecast)?;
        let ranking = Self::rank_profile(&profile, catalog)?;
        Ok((ranking, profile))
    }

    /// Score every card against an already annualized profile
    pub fn rank_profile(profile: &SpendingProfile, catalog: &CardCatalog) -> Result<Vec<CardReward>> {
        if catalog.is_empty() {
            return Err(Error::EmptyCatalog);
        }

        let mut ranking: Vec<CardReward> = catalog
            .iter()
            .map(|(card_id, card)| {
                let gross_reward = card.gross_reward(&profile.annual);
                CardReward {
                    card_id: card_id.to_string(),
                    gross_reward,
                    annual_fee: card.annual_fee(),
                    net_reward: gross_reward - card.annual_fee(),
                }
            })
            .collect();

        // Stable: equal net rewards keep catalog order
        ranking.sort_by(|a, b| b.net_reward.total_cmp(&a.net_reward));

        if let Some(best) = ranking.first() {
            debug!(
                card = %best.card_id,
                net_reward = best.net_reward,
                cards = ranking.len(),
                "Ranked card catalog"
            );
        }

        Ok(ranking)
    }
}
