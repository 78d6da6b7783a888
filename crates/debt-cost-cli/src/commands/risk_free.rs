use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tracing::warn;

use debt_cost_core::cost_of_debt::RISK_FREE_WARNING;

use crate::input;

/// Arguments for the risk-free rate lookup
#[derive(Args)]
pub struct RiskFreeArgs {
    /// Government bond yields (JSON, or CSV with Country and yield columns)
    #[arg(long)]
    pub bond_yields: String,

    /// Country to resolve; omit to list every country in the sheet
    #[arg(long)]
    pub country: Option<String>,
}

pub fn run_risk_free(args: RiskFreeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let table = input::tables::load_bond_yields(&args.bond_yields)?;

    match args.country {
        Some(country) => {
            let rate = table.risk_free_rate(&country)?;
            Ok(json!({
                "result": {
                    "country": country,
                    "risk_free_rate": rate,
                },
                "methodology": "10-year government bond yield",
                "warnings": rate_warnings(&country, rate),
            }))
        }
        None => Ok(Value::Array(
            table
                .countries()
                .map(|(country, rate)| {
                    for w in rate_warnings(country, rate) {
                        warn!("{}", w);
                    }
                    json!({ "country": country, "risk_free_rate": rate })
                })
                .collect(),
        )),
    }
}

/// Sheet values above 1 are read as percentages, so a sub-1% yield keyed
/// as a percentage (0.9 for 0.9%) comes back as 90%.
fn rate_warnings(country: &str, rate: Decimal) -> Vec<String> {
    if rate > RISK_FREE_WARNING {
        vec![format!(
            "Risk-free rate {} for {} exceeds 15%; a yield below 1% keyed as a percentage is read as a decimal.",
            rate, country
        )]
    } else {
        Vec::new()
    }
}
