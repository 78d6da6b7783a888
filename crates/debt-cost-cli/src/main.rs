mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commands::cost_of_debt::CostOfDebtArgs;
use commands::rating::RatingArgs;
use commands::risk_free::RiskFreeArgs;

/// After-tax cost of debt from synthetic credit ratings
#[derive(Parser)]
#[command(
    name = "kdebt",
    version,
    about = "After-tax cost of debt from synthetic credit ratings",
    long_about = "Rates a company from its interest coverage against large-cap, small-cap \
                  or financial-services grids, looks up the default spread and prices \
                  its debt as (Rf + spread) x (1 - tax rate), with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Debug logging to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the after-tax cost of debt
    CostOfDebt(CostOfDebtArgs),
    /// Assign a synthetic rating and spread from interest coverage
    SyntheticRating(RatingArgs),
    /// Look up a country's risk-free rate, or list the bond sheet
    RiskFree(RiskFreeArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("kdebt=debug,debt_cost_core=debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    debug!(verbose = cli.verbose, "logging initialised");

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::CostOfDebt(args) => commands::cost_of_debt::run_cost_of_debt(args),
        Commands::SyntheticRating(args) => commands::rating::run_synthetic_rating(args),
        Commands::RiskFree(args) => commands::risk_free::run_risk_free(args),
        Commands::Version => {
            println!("kdebt {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
