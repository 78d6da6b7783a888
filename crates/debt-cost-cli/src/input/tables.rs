use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::str::FromStr;
use tracing::{debug, info};

use debt_cost_core::market_data::{BondYield, BondYieldTable};
use debt_cost_core::rating::{RatingTableEntry, RatingTables};
use debt_cost_core::RatingCategory;

use super::file;

/// Header names accepted for the yield column of a bond sheet.
const YIELD_COLUMNS: [&str; 4] = ["yield 10y", "10y yield", "yield", "10 year yield"];

/// One row of the long-form ratings CSV.
#[derive(Debug, Deserialize)]
struct RatingRow {
    category: RatingCategory,
    lower_bound: Decimal,
    upper_bound: Decimal,
    rating: String,
    spread: Decimal,
}

/// Load the three rating grids from JSON (`RatingTables` shape) or a CSV
/// with columns `category,lower_bound,upper_bound,rating,spread`.
pub fn load_rating_tables(path: &str) -> Result<RatingTables, Box<dyn std::error::Error>> {
    let tables = if file::is_csv(path) {
        let (canonical, f) = file::open(path)?;
        parse_rating_csv(f)
            .map_err(|e| format!("Failed to load ratings '{}': {}", canonical.display(), e))?
    } else {
        file::read_json(path)?
    };
    info!(
        path,
        large_cap = tables.table(RatingCategory::LargeCap).len(),
        small_cap = tables.table(RatingCategory::SmallCap).len(),
        financial_services = tables.table(RatingCategory::FinancialServices).len(),
        "loaded rating tables"
    );
    Ok(tables)
}

pub fn parse_rating_csv<R: Read>(reader: R) -> Result<RatingTables, Box<dyn std::error::Error>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut large_cap = Vec::new();
    let mut small_cap = Vec::new();
    let mut financial = Vec::new();

    for (i, record) in rdr.deserialize::<RatingRow>().enumerate() {
        let row = record.map_err(|e| format!("row {}: {}", i + 1, e))?;
        let entry = RatingTableEntry::new(row.lower_bound, row.upper_bound, row.rating, row.spread);
        match row.category {
            RatingCategory::LargeCap => large_cap.push(entry),
            RatingCategory::SmallCap => small_cap.push(entry),
            RatingCategory::FinancialServices => financial.push(entry),
        }
    }

    Ok(RatingTables::from_entries(large_cap, small_cap, financial)?)
}

/// Load government bond yields from JSON (`[{country, yield}]`) or a CSV
/// with a `Country` column and one of the usual yield headers.
pub fn load_bond_yields(path: &str) -> Result<BondYieldTable, Box<dyn std::error::Error>> {
    let table = if file::is_csv(path) {
        let (canonical, f) = file::open(path)?;
        parse_bond_csv(f)
            .map_err(|e| format!("Failed to load bond yields '{}': {}", canonical.display(), e))?
    } else {
        file::read_json(path)?
    };
    info!(path, countries = table.len(), "loaded bond yields");
    Ok(table)
}

pub fn parse_bond_csv<R: Read>(reader: R) -> Result<BondYieldTable, Box<dyn std::error::Error>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_lowercase()).collect();
    let country_col = headers
        .iter()
        .position(|h| h == "country")
        .ok_or("bond sheet must have a 'Country' column")?;
    let yield_col = YIELD_COLUMNS
        .iter()
        .find_map(|name| headers.iter().position(|h| h == name))
        .ok_or("could not find a yield column ('Yield 10y', '10Y Yield', 'Yield', '10 Year Yield')")?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let (Some(country), Some(raw)) = (record.get(country_col), record.get(yield_col)) else {
            continue;
        };
        if country.is_empty() || raw.is_empty() {
            continue;
        }
        // Unparseable cells are skipped, as blank ones are.
        match Decimal::from_str(raw.trim_end_matches('%')) {
            Ok(yield_10y) => rows.push(BondYield {
                country: country.to_string(),
                yield_10y,
            }),
            Err(e) => debug!(country, raw, error = %e, "skipping bond row"),
        }
    }

    Ok(BondYieldTable::from_rows(rows)?)
}
