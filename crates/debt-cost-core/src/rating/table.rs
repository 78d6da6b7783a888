use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Multiple, Rate, RatingCategory};
use crate::{CostOfDebtError, DebtCostResult};

/// Upper bound at or above which the last row of a table is open ended.
///
/// Published grids close their top row at 100,000x; any ratio at or above
/// the row's lower bound belongs to it.
pub const OPEN_END_SENTINEL: Multiple = dec!(100000);

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// One row of a rating grid: `[lower_bound, upper_bound) -> rating, spread`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingTableEntry {
    /// Inclusive lower coverage bound
    pub lower_bound: Multiple,
    /// Exclusive upper coverage bound
    pub upper_bound: Multiple,
    /// Rating label as published, e.g. "Aaa/AAA"
    pub rating: String,
    /// Default spread over the risk-free rate (0.0045 = 45bp)
    pub spread: Rate,
}

impl RatingTableEntry {
    pub fn new(
        lower_bound: Multiple,
        upper_bound: Multiple,
        rating: impl Into<String>,
        spread: Rate,
    ) -> Self {
        Self {
            lower_bound,
            upper_bound,
            rating: rating.into(),
            spread,
        }
    }

    /// True when the row's upper bound reaches the open-end sentinel.
    pub fn is_open_ended(&self) -> bool {
        self.upper_bound >= OPEN_END_SENTINEL
    }
}

impl std::fmt::Display for RatingTableEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}, {}) -> {} ({}%)",
            self.lower_bound,
            self.upper_bound,
            self.rating,
            (self.spread * dec!(100)).round_dp(2)
        )
    }
}

// ---------------------------------------------------------------------------
// Single table
// ---------------------------------------------------------------------------

/// An ordered, gap-free rating grid for one category.
///
/// Built through [`RatingTable::new`], which sorts and validates the rows.
/// Deserialisation goes through the same validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRatingTable")]
pub struct RatingTable {
    category: RatingCategory,
    entries: Vec<RatingTableEntry>,
}

#[derive(Deserialize)]
struct RawRatingTable {
    category: RatingCategory,
    entries: Vec<RatingTableEntry>,
}

impl TryFrom<RawRatingTable> for RatingTable {
    type Error = CostOfDebtError;

    fn try_from(raw: RawRatingTable) -> Result<Self, Self::Error> {
        RatingTable::new(raw.category, raw.entries)
    }
}

impl RatingTable {
    /// Sort `entries` by lower bound and check the grid covers
    /// `[<= 0, OPEN_END_SENTINEL)` without gaps or overlaps.
    pub fn new(
        category: RatingCategory,
        mut entries: Vec<RatingTableEntry>,
    ) -> DebtCostResult<Self> {
        entries.sort_by(|a, b| a.lower_bound.cmp(&b.lower_bound));
        validate_entries(category, &entries)?;
        Ok(Self { category, entries })
    }

    /// Build a table without shape checks. Entries must already be sorted by
    /// lower bound; lookups against a partial grid fail rather than guess.
    pub fn new_unchecked(category: RatingCategory, entries: Vec<RatingTableEntry>) -> Self {
        Self { category, entries }
    }

    pub fn category(&self) -> RatingCategory {
        self.category
    }

    pub fn entries(&self) -> &[RatingTableEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The highest-rated row (the last one in ascending bound order).
    pub fn top(&self) -> Option<&RatingTableEntry> {
        self.entries.last()
    }
}

fn validate_entries(category: RatingCategory, entries: &[RatingTableEntry]) -> DebtCostResult<()> {
    let invalid = |reason: String| CostOfDebtError::InvalidTable { category, reason };

    let (first, last) = match (entries.first(), entries.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return Err(invalid("table has no entries".into())),
    };

    for (i, entry) in entries.iter().enumerate() {
        if entry.rating.trim().is_empty() {
            return Err(invalid(format!("row {i} has an empty rating label")));
        }
        if entry.lower_bound >= entry.upper_bound {
            return Err(invalid(format!(
                "row {i} ({}) has lower bound {} not below upper bound {}",
                entry.rating, entry.lower_bound, entry.upper_bound
            )));
        }
        if entry.spread < Decimal::ZERO {
            return Err(invalid(format!(
                "row {i} ({}) has negative spread {}",
                entry.rating, entry.spread
            )));
        }
    }

    for pair in entries.windows(2) {
        let (lo, hi) = (&pair[0], &pair[1]);
        if lo.upper_bound < hi.lower_bound {
            return Err(invalid(format!(
                "gap between {} (upper {}) and {} (lower {})",
                lo.rating, lo.upper_bound, hi.rating, hi.lower_bound
            )));
        }
        if lo.upper_bound > hi.lower_bound {
            return Err(invalid(format!(
                "{} (upper {}) overlaps {} (lower {})",
                lo.rating, lo.upper_bound, hi.rating, hi.lower_bound
            )));
        }
    }

    if first.lower_bound > Decimal::ZERO {
        return Err(invalid(format!(
            "lowest bound {} leaves coverage ratios below it unrated",
            first.lower_bound
        )));
    }
    if !last.is_open_ended() {
        return Err(invalid(format!(
            "top row {} closes at {}; expected an open-ended row reaching {OPEN_END_SENTINEL}",
            last.rating, last.upper_bound
        )));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Table set
// ---------------------------------------------------------------------------

/// The three grids a calculation may draw from, one per category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRatingTables", into = "RawRatingTables")]
pub struct RatingTables {
    large_cap: RatingTable,
    small_cap: RatingTable,
    financial_services: RatingTable,
}

#[derive(Serialize, Deserialize)]
struct RawRatingTables {
    large_cap: Vec<RatingTableEntry>,
    small_cap: Vec<RatingTableEntry>,
    #[serde(alias = "financial")]
    financial_services: Vec<RatingTableEntry>,
}

impl TryFrom<RawRatingTables> for RatingTables {
    type Error = CostOfDebtError;

    fn try_from(raw: RawRatingTables) -> Result<Self, Self::Error> {
        RatingTables::from_entries(raw.large_cap, raw.small_cap, raw.financial_services)
    }
}

impl From<RatingTables> for RawRatingTables {
    fn from(tables: RatingTables) -> Self {
        RawRatingTables {
            large_cap: tables.large_cap.entries,
            small_cap: tables.small_cap.entries,
            financial_services: tables.financial_services.entries,
        }
    }
}

impl RatingTables {
    /// Assemble a set from already-built tables. Each table must carry the
    /// category of the slot it is placed in.
    pub fn new(
        large_cap: RatingTable,
        small_cap: RatingTable,
        financial_services: RatingTable,
    ) -> DebtCostResult<Self> {
        for (slot, table) in [
            (RatingCategory::LargeCap, &large_cap),
            (RatingCategory::SmallCap, &small_cap),
            (RatingCategory::FinancialServices, &financial_services),
        ] {
            if table.category != slot {
                return Err(CostOfDebtError::InvalidTable {
                    category: slot,
                    reason: format!("slot holds a {} table", table.category),
                });
            }
        }
        Ok(Self {
            large_cap,
            small_cap,
            financial_services,
        })
    }

    /// Validate and assemble from raw rows.
    pub fn from_entries(
        large_cap: Vec<RatingTableEntry>,
        small_cap: Vec<RatingTableEntry>,
        financial_services: Vec<RatingTableEntry>,
    ) -> DebtCostResult<Self> {
        Ok(Self {
            large_cap: RatingTable::new(RatingCategory::LargeCap, large_cap)?,
            small_cap: RatingTable::new(RatingCategory::SmallCap, small_cap)?,
            financial_services: RatingTable::new(
                RatingCategory::FinancialServices,
                financial_services,
            )?,
        })
    }

    pub fn table(&self, category: RatingCategory) -> &RatingTable {
        match category {
            RatingCategory::LargeCap => &self.large_cap,
            RatingCategory::SmallCap => &self.small_cap,
            RatingCategory::FinancialServices => &self.financial_services,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
