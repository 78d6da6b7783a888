use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::compose::{compose, CostOfDebtResult};
use crate::rating::classifier::LARGE_CAP_THRESHOLD;
use crate::rating::coverage::NO_INTEREST_COVERAGE;
use crate::rating::{
    coverage_warnings, synthetic_rating, CompanyProfile, CoverageInput, RatingTables,
};
use crate::types::{with_metadata, ComputationOutput, Multiple, Rate, RatingCategory};
use crate::{CostOfDebtError, DebtCostResult};

/// Tax rates above this are outside any statutory corporate rate in use.
const TAX_RATE_WARNING: Rate = dec!(0.60);

/// Government yields above this usually mean the rate was keyed as a percentage.
pub const RISK_FREE_WARNING: Rate = dec!(0.15);

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Everything one cost-of-debt estimate needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostOfDebtInput {
    /// Ticker or name, echoed into the output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub profile: CompanyProfile,
    pub coverage: CoverageInput,
    /// Government bond yield used as the base rate
    pub risk_free_rate: Rate,
    /// Marginal corporate tax rate
    pub tax_rate: Rate,
    pub tables: RatingTables,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostOfDebtOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub category: RatingCategory,
    pub interest_coverage: Multiple,
    pub rating: String,
    /// Coverage range of the matched row, e.g. "[8.5, 100000)"
    pub coverage_range: String,
    pub spread: Rate,
    pub risk_free_rate: Rate,
    pub pre_tax_cost_of_debt: Rate,
    pub tax_rate: Rate,
    pub after_tax_cost_of_debt: Rate,
    pub calculation_steps: Vec<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Classify, rate and price a company's debt in one pass.
pub fn evaluate(
    profile: &CompanyProfile,
    coverage: &CoverageInput,
    risk_free_rate: Rate,
    tax_rate: Rate,
    tables: &RatingTables,
) -> DebtCostResult<CostOfDebtResult> {
    let assignment = synthetic_rating(profile, coverage, tables)?;
    Ok(compose(risk_free_rate, assignment.spread(), tax_rate))
}

/// Synthetic-rating cost of debt with warnings and a step-by-step breakdown.
///
/// Kd = (Rf + spread(rating(EBIT / interest))) * (1 - t)
pub fn calculate_cost_of_debt(
    input: &CostOfDebtInput,
) -> DebtCostResult<ComputationOutput<CostOfDebtOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    // -- Rating ---------------------------------------------------------------
    let assignment = synthetic_rating(&input.profile, &input.coverage, &input.tables)?;
    warnings.extend(coverage_warnings(&input.coverage, &assignment));

    // -- Cost of debt ---------------------------------------------------------
    let result = compose(input.risk_free_rate, assignment.spread(), input.tax_rate);

    if input.tax_rate == Decimal::ONE {
        warnings.push("Tax rate of 100% zeroes the after-tax cost of debt.".into());
    } else if input.tax_rate > TAX_RATE_WARNING {
        warnings.push(format!(
            "Tax rate {} exceeds 60%; verify the marginal rate.",
            input.tax_rate
        ));
    }
    if input.risk_free_rate > RISK_FREE_WARNING {
        warnings.push(format!(
            "Risk-free rate {} exceeds 15%; rates are decimals (0.045 = 4.5%).",
            input.risk_free_rate
        ));
    }

    debug!(
        category = %assignment.category,
        rating = assignment.rating(),
        after_tax = %result.after_tax_cost,
        "cost of debt calculated"
    );

    let output = CostOfDebtOutput {
        company: input.company.clone(),
        category: assignment.category,
        interest_coverage: assignment.coverage_ratio,
        rating: assignment.rating().to_string(),
        coverage_range: format!(
            "[{}, {})",
            assignment.matched_entry.lower_bound, assignment.matched_entry.upper_bound
        ),
        spread: result.spread,
        risk_free_rate: result.risk_free_rate,
        pre_tax_cost_of_debt: result.pre_tax_cost,
        tax_rate: result.tax_rate,
        after_tax_cost_of_debt: result.after_tax_cost,
        calculation_steps: calculation_steps(&result),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "large_cap_threshold": LARGE_CAP_THRESHOLD.to_string(),
        "no_interest_coverage": NO_INTEREST_COVERAGE.to_string(),
        "boundary_convention": "[lower, upper)",
        "coverage_definition": "EBIT / interest expense",
    });

    Ok(with_metadata(
        "Synthetic rating cost of debt (interest coverage)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_input(input: &CostOfDebtInput) -> DebtCostResult<()> {
    if input.risk_free_rate < Decimal::ZERO {
        return Err(CostOfDebtError::InvalidInput {
            field: "risk_free_rate".into(),
            reason: "Risk-free rate cannot be negative".into(),
        });
    }
    if input.tax_rate < Decimal::ZERO || input.tax_rate > Decimal::ONE {
        return Err(CostOfDebtError::InvalidInput {
            field: "tax_rate".into(),
            reason: "Tax rate must be between 0 and 1".into(),
        });
    }
    input.profile.validate()
}

fn pct(rate: Rate, dp: u32) -> String {
    format!("{:.*}%", dp as usize, (rate * dec!(100)).round_dp(dp))
}

fn calculation_steps(r: &CostOfDebtResult) -> Vec<String> {
    let shield = Decimal::ONE - r.tax_rate;
    vec![
        "Cost of Debt = (Rf + Spread) × (1 - Tax Rate)".to_string(),
        format!("Rf = {}", pct(r.risk_free_rate, 2)),
        format!("Spread = {}", pct(r.spread, 2)),
        format!(
            "Pre-tax = {} + {} = {}",
            pct(r.risk_free_rate, 2),
            pct(r.spread, 2),
            pct(r.pre_tax_cost, 2)
        ),
        format!("Tax Shield = 1 - {} = {}", pct(r.tax_rate, 1), pct(shield, 1)),
        format!(
            "Cost of Debt = {} × {} = {}",
            pct(r.pre_tax_cost, 2),
            pct(shield, 1),
            pct(r.after_tax_cost, 2)
        ),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::RatingTableEntry;
    use rust_decimal_macros::dec;

    fn entries(top_floor: Decimal) -> Vec<RatingTableEntry> {
        vec![
            RatingTableEntry::new(dec!(-100000), dec!(1.5), "Caa/CCC", dec!(0.0900)),
            RatingTableEntry::new(dec!(1.5), top_floor, "Baa2/BBB", dec!(0.0150)),
            RatingTableEntry::new(top_floor, dec!(100000), "Aaa/AAA", dec!(0.0045)),
        ]
    }

    fn tables() -> RatingTables {
        RatingTables::from_entries(entries(dec!(8.5)), entries(dec!(12.5)), entries(dec!(3)))
            .unwrap()
    }

    fn sample_input() -> CostOfDebtInput {
        CostOfDebtInput {
            company: Some("ACME".into()),
            profile: CompanyProfile::new(Some(dec!(50_000_000_000)), false),
            coverage: CoverageInput {
                ebit: dec!(123_000),
                interest_expense: dec!(3_000),
            },
            risk_free_rate: dec!(0.045),
            tax_rate: dec!(0.21),
            tables: tables(),
        }
    }

    #[test]
    fn test_evaluate_reference_scenario() {
        let input = sample_input();
        let r = evaluate(
            &input.profile,
            &input.coverage,
            input.risk_free_rate,
            input.tax_rate,
            &input.tables,
        )
        .unwrap();
        assert_eq!(r.spread, dec!(0.0045));
        assert_eq!(r.pre_tax_cost, dec!(0.0495));
        assert_eq!(r.after_tax_cost, dec!(0.039105));
    }

    #[test]
    fn test_category_selects_grid() {
        // Coverage 10x: AAA on the large-cap grid, BBB on the small-cap grid.
        let mut input = sample_input();
        input.coverage.ebit = dec!(30_000);
        let out = calculate_cost_of_debt(&input).unwrap();
        assert_eq!(out.result.category, RatingCategory::LargeCap);
        assert_eq!(out.result.rating, "Aaa/AAA");

        input.profile.market_cap = Some(dec!(900_000_000));
        let out = calculate_cost_of_debt(&input).unwrap();
        assert_eq!(out.result.category, RatingCategory::SmallCap);
        assert_eq!(out.result.rating, "Baa2/BBB");
        assert_eq!(out.result.coverage_range, "[1.5, 12.5)");
    }

    #[test]
    fn test_calculation_steps() {
        let out = calculate_cost_of_debt(&sample_input()).unwrap();
        let steps = &out.result.calculation_steps;
        assert_eq!(steps.len(), 6);
        assert_eq!(steps[1], "Rf = 4.50%");
        assert_eq!(steps[2], "Spread = 0.45%");
        assert_eq!(steps[3], "Pre-tax = 4.50% + 0.45% = 4.95%");
        assert_eq!(steps[4], "Tax Shield = 1 - 21.0% = 79.0%");
        assert_eq!(steps[5], "Cost of Debt = 4.95% × 79.0% = 3.91%");
    }

    #[test]
    fn test_zero_interest_warning() {
        let mut input = sample_input();
        input.coverage.interest_expense = Decimal::ZERO;
        let out = calculate_cost_of_debt(&input).unwrap();
        assert_eq!(out.result.interest_coverage, dec!(20));
        assert_eq!(out.result.rating, "Aaa/AAA");
        assert!(out.warnings.iter().any(|w| w.contains("Interest expense is zero")));
    }

    #[test]
    fn test_negative_coverage_warning() {
        let mut input = sample_input();
        input.coverage.ebit = dec!(-6_000);
        let out = calculate_cost_of_debt(&input).unwrap();
        assert_eq!(out.result.interest_coverage, dec!(-2));
        assert_eq!(out.result.rating, "Caa/CCC");
        assert!(out.warnings.iter().any(|w| w.contains("Negative coverage")));
    }

    #[test]
    fn test_full_tax_rate_is_warning_not_error() {
        let mut input = sample_input();
        input.tax_rate = Decimal::ONE;
        let out = calculate_cost_of_debt(&input).unwrap();
        assert!(out.result.after_tax_cost_of_debt.is_zero());
        assert!(out.warnings.iter().any(|w| w.contains("100%")));
    }

    #[test]
    fn test_high_tax_warning() {
        let mut input = sample_input();
        input.tax_rate = dec!(0.65);
        let out = calculate_cost_of_debt(&input).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("exceeds 60%")));
    }

    #[test]
    fn test_percentage_risk_free_warning() {
        let mut input = sample_input();
        input.risk_free_rate = dec!(4.5);
        let out = calculate_cost_of_debt(&input).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("Risk-free rate")));
    }

    #[test]
    fn test_invalid_rates_rejected() {
        let mut input = sample_input();
        input.tax_rate = dec!(1.2);
        match calculate_cost_of_debt(&input).unwrap_err() {
            CostOfDebtError::InvalidInput { field, .. } => assert_eq!(field, "tax_rate"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }

        let mut input = sample_input();
        input.risk_free_rate = dec!(-0.01);
        match calculate_cost_of_debt(&input).unwrap_err() {
            CostOfDebtError::InvalidInput { field, .. } => assert_eq!(field, "risk_free_rate"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_market_cap_rejected() {
        let mut input = sample_input();
        input.profile.market_cap = Some(dec!(-1));
        match calculate_cost_of_debt(&input).unwrap_err() {
            CostOfDebtError::InvalidInput { field, .. } => assert_eq!(field, "market_cap"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_interest_propagates() {
        let mut input = sample_input();
        input.coverage.interest_expense = dec!(-10);
        assert!(matches!(
            calculate_cost_of_debt(&input),
            Err(CostOfDebtError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_metadata_populated() {
        let out = calculate_cost_of_debt(&sample_input()).unwrap();
        assert_eq!(
            out.methodology,
            "Synthetic rating cost of debt (interest coverage)"
        );
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
        assert_eq!(out.result.company.as_deref(), Some("ACME"));
    }
}
