use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use debt_cost_core::rating::{self, CompanyProfile};
use debt_cost_core::RatingCategory;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Cost of debt
// ---------------------------------------------------------------------------

#[napi]
pub fn cost_of_debt(input_json: String) -> NapiResult<String> {
    let input: debt_cost_core::cost_of_debt::CostOfDebtInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = debt_cost_core::cost_of_debt::calculate_cost_of_debt(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Rating
// ---------------------------------------------------------------------------

#[napi]
pub fn synthetic_rating(input_json: String) -> NapiResult<String> {
    let input: rating::SyntheticRatingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = rating::calculate_synthetic_rating(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct ClassifyInput {
    #[serde(default)]
    market_cap: Option<Decimal>,
    #[serde(default)]
    is_financial_services: bool,
    #[serde(default)]
    sector: Option<String>,
    #[serde(default)]
    industry: Option<String>,
}

#[derive(Serialize)]
struct ClassifyOutput {
    category: RatingCategory,
    is_financial_services: bool,
}

/// Pick the rating grid. A firm is financial when `is_financial_services`
/// is set or when its sector / industry mentions a financial keyword.
#[napi]
pub fn classify_company(input_json: String) -> NapiResult<String> {
    let input: ClassifyInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let profile = CompanyProfile::from_flag_and_sector(
        input.market_cap,
        input.is_financial_services,
        input.sector.as_deref(),
        input.industry.as_deref(),
    );
    profile.validate().map_err(to_napi_error)?;
    let output = ClassifyOutput {
        category: rating::classify(&profile),
        is_financial_services: profile.is_financial_services,
    };
    serde_json::to_string(&output).map_err(to_napi_error)
}
