use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::Rate;

/// Pre- and after-tax cost of debt with the inputs that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostOfDebtResult {
    pub risk_free_rate: Rate,
    pub spread: Rate,
    /// Risk-free rate plus spread
    pub pre_tax_cost: Rate,
    pub tax_rate: Rate,
    /// Pre-tax cost net of the interest tax shield
    pub after_tax_cost: Rate,
}

/// Kd = (Rf + spread) * (1 - t)
///
/// Inputs are taken as given; range checks belong to the caller.
pub fn compose(risk_free_rate: Rate, spread: Rate, tax_rate: Rate) -> CostOfDebtResult {
    let pre_tax_cost = risk_free_rate + spread;
    let after_tax_cost = pre_tax_cost * (Decimal::ONE - tax_rate);
    debug!(%pre_tax_cost, %after_tax_cost, "composed cost of debt");
    CostOfDebtResult {
        risk_free_rate,
        spread,
        pre_tax_cost,
        tax_rate,
        after_tax_cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_compose_reference_case() {
        let r = compose(dec!(0.045), dec!(0.0045), dec!(0.21));
        assert_eq!(r.pre_tax_cost, dec!(0.0495));
        // 0.0495 * 0.79 = 0.039105
        assert_eq!(r.after_tax_cost, dec!(0.039105));
        assert_eq!(r.tax_rate, dec!(0.21));
    }

    #[test]
    fn test_compose_is_deterministic() {
        let a = compose(dec!(0.0425), dec!(0.0137), dec!(0.25));
        let b = compose(dec!(0.0425), dec!(0.0137), dec!(0.25));
        assert_eq!(a, b);
        assert_eq!(a.after_tax_cost.serialize(), b.after_tax_cost.serialize());
    }

    #[test]
    fn test_zero_tax_keeps_pre_tax() {
        let r = compose(dec!(0.03), dec!(0.02), Decimal::ZERO);
        assert_eq!(r.after_tax_cost, r.pre_tax_cost);
    }

    #[test]
    fn test_full_tax_zeroes_result() {
        let r = compose(dec!(0.03), dec!(0.02), Decimal::ONE);
        assert!(r.after_tax_cost.is_zero());
    }
}
