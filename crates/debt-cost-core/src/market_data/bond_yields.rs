use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::types::Rate;
use crate::{CostOfDebtError, DebtCostResult};

/// Alternative spellings tried when a country is not found verbatim.
const COUNTRY_ALIASES: [(&str, &[&str]); 6] = [
    ("USA", &["UNITED STATES", "US"]),
    ("UNITED STATES", &["USA", "US"]),
    ("US", &["UNITED STATES", "USA"]),
    ("UK", &["UNITED KINGDOM", "BRITAIN"]),
    ("UNITED KINGDOM", &["UK", "BRITAIN"]),
    ("BRITAIN", &["UNITED KINGDOM", "UK"]),
];

/// One row of a government bond yield sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondYield {
    pub country: String,
    /// 10-year yield, either a decimal (0.042) or a percentage (4.2)
    #[serde(alias = "yield")]
    pub yield_10y: Rate,
}

/// 10-year government yields keyed by upper-cased country name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<BondYield>", into = "Vec<BondYield>")]
pub struct BondYieldTable {
    yields: BTreeMap<String, Rate>,
}

impl TryFrom<Vec<BondYield>> for BondYieldTable {
    type Error = CostOfDebtError;

    fn try_from(rows: Vec<BondYield>) -> Result<Self, Self::Error> {
        BondYieldTable::from_rows(rows)
    }
}

impl From<BondYieldTable> for Vec<BondYield> {
    fn from(table: BondYieldTable) -> Self {
        table
            .yields
            .into_iter()
            .map(|(country, yield_10y)| BondYield { country, yield_10y })
            .collect()
    }
}

impl BondYieldTable {
    /// Normalise rows: country names are trimmed and upper-cased, and any
    /// yield above 1 is read as a percentage. Later duplicates win.
    ///
    /// Rows with a negative yield are skipped; they cannot serve as a
    /// risk-free rate and must not stop the other countries loading.
    pub fn from_rows(rows: impl IntoIterator<Item = BondYield>) -> DebtCostResult<Self> {
        let mut yields = BTreeMap::new();
        for row in rows {
            let country = row.country.trim().to_uppercase();
            if country.is_empty() {
                continue;
            }
            if row.yield_10y < Decimal::ZERO {
                debug!(%country, yield_10y = %row.yield_10y, "skipping negative bond yield");
                continue;
            }
            let y = if row.yield_10y > Decimal::ONE {
                row.yield_10y / Decimal::ONE_HUNDRED
            } else {
                row.yield_10y
            };
            yields.insert(country, y);
        }
        Ok(Self { yields })
    }

    /// Risk-free rate for `country`, matched case-insensitively, then via
    /// known aliases (USA / US / United States, UK / United Kingdom / Britain).
    pub fn risk_free_rate(&self, country: &str) -> DebtCostResult<Rate> {
        let key = country.trim().to_uppercase();
        if let Some(y) = self.yields.get(&key) {
            return Ok(*y);
        }
        COUNTRY_ALIASES
            .iter()
            .filter(|(name, _)| *name == key)
            .flat_map(|(_, alts)| alts.iter())
            .find_map(|alt| self.yields.get(*alt).copied())
            .ok_or_else(|| {
                CostOfDebtError::InsufficientData(format!(
                    "No government bond yield for country '{}'",
                    country.trim()
                ))
            })
    }

    /// Countries in alphabetical order with their yields.
    pub fn countries(&self) -> impl Iterator<Item = (&str, Rate)> {
        self.yields.iter().map(|(c, y)| (c.as_str(), *y))
    }

    pub fn len(&self) -> usize {
        self.yields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.yields.is_empty()
    }
}
