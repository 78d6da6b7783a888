use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::RatingCategory;

#[derive(Debug, Error)]
pub enum CostOfDebtError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Rating lookup failed: {category} table does not cover coverage ratio {coverage_ratio} — {reason}")]
    RatingLookup {
        category: RatingCategory,
        coverage_ratio: Decimal,
        reason: String,
    },

    #[error("Invalid rating table: {category} — {reason}")]
    InvalidTable {
        category: RatingCategory,
        reason: String,
    },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CostOfDebtError {
    fn from(e: serde_json::Error) -> Self {
        CostOfDebtError::SerializationError(e.to_string())
    }
}
