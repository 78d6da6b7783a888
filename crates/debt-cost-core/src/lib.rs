pub mod error;
pub mod types;

#[cfg(feature = "rating")]
pub mod rating;

#[cfg(feature = "cost_of_debt")]
pub mod cost_of_debt;

#[cfg(feature = "market_data")]
pub mod market_data;

pub use error::CostOfDebtError;
pub use types::*;

/// Standard result type for all debt-cost operations
pub type DebtCostResult<T> = Result<T, CostOfDebtError>;
