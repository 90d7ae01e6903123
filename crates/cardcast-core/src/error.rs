//! Error types for Cardcast

use thiserror::Error;

use crate::models::Category;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No transactions supplied")]
    EmptyInput,

    #[error("Insufficient history: {rows} monthly rows, at least {required} required")]
    InsufficientHistory { rows: usize, required: usize },

    #[error("Card {card} has no reward rate for category {category}")]
    UnknownCategoryRate { card: String, category: Category },

    #[error("Invalid forecast horizon: {0} (must be between 1 and 120 months)")]
    InvalidHorizon(usize),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Card catalog is empty")]
    EmptyCatalog,

    #[error("Duplicate card id in catalog: {0}")]
    DuplicateCard(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
