use clap::Args;
use serde_json::Value;

use debt_cost_core::rating::{self, SyntheticRatingInput};

use super::cost_of_debt::CompanyArgs;
use crate::input;

/// Arguments for a synthetic rating without pricing
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct RatingArgs {
    #[command(flatten)]
    pub firm: CompanyArgs,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_synthetic_rating(args: RatingArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rating_input: SyntheticRatingInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let ratings = args
            .firm
            .ratings
            .as_deref()
            .ok_or("--ratings is required (or provide --input)")?;
        SyntheticRatingInput {
            company: args.firm.company.clone(),
            profile: args.firm.profile(),
            coverage: args.firm.coverage()?,
            tables: input::tables::load_rating_tables(ratings)?,
        }
    };

    let result = rating::calculate_synthetic_rating(&rating_input)?;
    Ok(serde_json::to_value(result)?)
}
