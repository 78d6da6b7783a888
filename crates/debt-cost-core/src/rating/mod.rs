pub mod classifier;
pub mod coverage;
pub mod lookup;
pub mod table;

pub use classifier::{classify, is_financial_sector, CompanyProfile};
pub use coverage::{coverage, CoverageInput};
pub use lookup::{lookup, RatingAssignment};
pub use table::{RatingTable, RatingTableEntry, RatingTables};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::types::{with_metadata, ComputationOutput};
use crate::DebtCostResult;

/// Request for a rating without pricing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticRatingInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub profile: CompanyProfile,
    pub coverage: CoverageInput,
    pub tables: RatingTables,
}

/// Classify the company, compute its coverage and match it against the
/// grid for its category.
pub fn synthetic_rating(
    profile: &CompanyProfile,
    input: &CoverageInput,
    tables: &RatingTables,
) -> DebtCostResult<RatingAssignment> {
    let category = classify(profile);
    let ratio = input.ratio()?;
    lookup(tables.table(category), ratio)
}

/// [`synthetic_rating`] wrapped in the standard output envelope.
pub fn calculate_synthetic_rating(
    input: &SyntheticRatingInput,
) -> DebtCostResult<ComputationOutput<RatingAssignment>> {
    let start = Instant::now();
    input.profile.validate()?;
    let assignment = synthetic_rating(&input.profile, &input.coverage, &input.tables)?;
    let warnings = coverage_warnings(&input.coverage, &assignment);
    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Synthetic rating from interest coverage",
        &serde_json::json!({
            "company": input.company,
            "large_cap_threshold": classifier::LARGE_CAP_THRESHOLD.to_string(),
            "no_interest_coverage": coverage::NO_INTEREST_COVERAGE.to_string(),
            "boundary_convention": "[lower, upper)",
        }),
        warnings,
        elapsed,
        assignment,
    ))
}

/// Flags the two coverage conventions a reader should know were applied.
pub(crate) fn coverage_warnings(input: &CoverageInput, assignment: &RatingAssignment) -> Vec<String> {
    let mut warnings = Vec::new();
    if input.interest_expense.is_zero() {
        warnings.push(format!(
            "Interest expense is zero; coverage set to {}x.",
            coverage::NO_INTEREST_COVERAGE
        ));
    }
    if assignment.coverage_ratio < Decimal::ZERO {
        warnings.push(format!(
            "Negative coverage ({}x) from negative EBIT; rated {} by numeric ordering.",
            assignment.coverage_ratio.round_dp(2),
            assignment.rating()
        ));
    }
    warnings
}
