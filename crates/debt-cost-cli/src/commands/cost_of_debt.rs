use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use debt_cost_core::cost_of_debt::{self, CostOfDebtInput};
use debt_cost_core::rating::{CompanyProfile, CoverageInput};

use crate::input;

/// Company fields shared by the rating and cost-of-debt commands
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct CompanyArgs {
    /// Ticker or company name (echoed in the output)
    #[arg(long)]
    pub company: Option<String>,

    /// Earnings before interest and taxes
    #[arg(long)]
    pub ebit: Option<Decimal>,

    /// Interest expense (0 if the company has none)
    #[arg(long, alias = "interest")]
    pub interest_expense: Option<Decimal>,

    /// Equity market capitalisation
    #[arg(long)]
    pub market_cap: Option<Decimal>,

    /// Treat as a financial-services firm
    #[arg(long)]
    pub financial: bool,

    /// Sector description; financial keywords mark a financial firm
    #[arg(long)]
    pub sector: Option<String>,

    /// Industry description; financial keywords mark a financial firm
    #[arg(long)]
    pub industry: Option<String>,

    /// Rating grids (JSON, or CSV: category,lower_bound,upper_bound,rating,spread)
    #[arg(long)]
    pub ratings: Option<String>,
}

impl CompanyArgs {
    pub fn profile(&self) -> CompanyProfile {
        CompanyProfile::from_flag_and_sector(
            self.market_cap,
            self.financial,
            self.sector.as_deref(),
            self.industry.as_deref(),
        )
    }

    pub fn coverage(&self) -> Result<CoverageInput, Box<dyn std::error::Error>> {
        Ok(CoverageInput {
            ebit: self.ebit.ok_or("--ebit is required (or provide --input)")?,
            interest_expense: self
                .interest_expense
                .ok_or("--interest-expense is required (or provide --input)")?,
        })
    }
}

/// Arguments for the after-tax cost of debt
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct CostOfDebtArgs {
    #[command(flatten)]
    pub firm: CompanyArgs,

    /// Risk-free rate (e.g. 0.045 for 4.5%)
    #[arg(long, alias = "rf")]
    pub risk_free_rate: Option<Decimal>,

    /// Country whose 10-year yield is the risk-free rate (needs --bond-yields)
    #[arg(long)]
    pub country: Option<String>,

    /// Government bond yields (JSON, or CSV with Country and yield columns)
    #[arg(long)]
    pub bond_yields: Option<String>,

    /// Marginal corporate tax rate (e.g. 0.21 for 21%)
    #[arg(long)]
    pub tax_rate: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_cost_of_debt(args: CostOfDebtArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let kd_input: CostOfDebtInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let ratings = args
            .firm
            .ratings
            .as_deref()
            .ok_or("--ratings is required (or provide --input)")?;
        CostOfDebtInput {
            company: args.firm.company.clone(),
            profile: args.firm.profile(),
            coverage: args.firm.coverage()?,
            risk_free_rate: resolve_risk_free(&args)?,
            tax_rate: args
                .tax_rate
                .ok_or("--tax-rate is required (or provide --input)")?,
            tables: input::tables::load_rating_tables(ratings)?,
        }
    };

    debug!(company = ?kd_input.company, "running cost of debt");
    let result = cost_of_debt::calculate_cost_of_debt(&kd_input)?;
    Ok(serde_json::to_value(result)?)
}

/// An explicit rate wins; otherwise look the country up in the bond sheet.
fn resolve_risk_free(args: &CostOfDebtArgs) -> Result<Decimal, Box<dyn std::error::Error>> {
    if let Some(rf) = args.risk_free_rate {
        return Ok(rf);
    }
    match (&args.country, &args.bond_yields) {
        (Some(country), Some(path)) => {
            let table = input::tables::load_bond_yields(path)?;
            let rf = table.risk_free_rate(country)?;
            debug!(country = %country, %rf, "risk-free rate from bond sheet");
            Ok(rf)
        }
        (Some(_), None) => Err("--country needs --bond-yields".into()),
        _ => Err(
            "--risk-free-rate is required (or provide --country with --bond-yields, or --input)"
                .into(),
        ),
    }
}
