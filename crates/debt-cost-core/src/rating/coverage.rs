use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Multiple};
use crate::{CostOfDebtError, DebtCostResult};

/// Coverage assigned when a company reports no interest expense.
///
/// Fixed regardless of EBIT; lands in the top bucket of every standard grid.
pub const NO_INTEREST_COVERAGE: Multiple = dec!(20);

/// Operating earnings and the interest they must service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageInput {
    /// Earnings before interest and taxes
    pub ebit: Money,
    /// Interest expense for the same period; must be non-negative
    pub interest_expense: Money,
}

impl CoverageInput {
    pub fn ratio(&self) -> DebtCostResult<Multiple> {
        coverage(self.ebit, self.interest_expense)
    }
}

/// Interest coverage: EBIT / interest expense.
///
/// Zero interest gives [`NO_INTEREST_COVERAGE`]. Negative EBIT is passed
/// through as a negative ratio. A quotient too large for `Decimal` is
/// rejected rather than overflowing.
pub fn coverage(ebit: Money, interest_expense: Money) -> DebtCostResult<Multiple> {
    if interest_expense < Decimal::ZERO {
        return Err(CostOfDebtError::InvalidInput {
            field: "interest_expense".into(),
            reason: format!("Interest expense cannot be negative, got {interest_expense}"),
        });
    }
    if interest_expense.is_zero() {
        return Ok(NO_INTEREST_COVERAGE);
    }
    ebit.checked_div(interest_expense)
        .ok_or_else(|| CostOfDebtError::InvalidInput {
            field: "ebit".into(),
            reason: format!(
                "Coverage {ebit} / {interest_expense} is outside the decimal range"
            ),
        })
}
