use serde::{Deserialize, Serialize};
use tracing::debug;

use super::table::{RatingTable, RatingTableEntry};
use crate::types::{Multiple, Rate, RatingCategory};
use crate::{CostOfDebtError, DebtCostResult};

/// A coverage ratio matched to one row of a rating grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingAssignment {
    pub category: RatingCategory,
    pub coverage_ratio: Multiple,
    pub matched_entry: RatingTableEntry,
}

impl RatingAssignment {
    pub fn rating(&self) -> &str {
        &self.matched_entry.rating
    }

    pub fn spread(&self) -> Rate {
        self.matched_entry.spread
    }
}

/// Find the row with `lower_bound <= ratio < upper_bound`.
///
/// Bounds are half-open, so a ratio equal to a shared boundary belongs to
/// the higher row. The last row also takes every ratio above its upper
/// bound when that bound reaches the open-end sentinel. A ratio the grid
/// does not cover is an error, never a default rating.
pub fn lookup(table: &RatingTable, coverage_ratio: Multiple) -> DebtCostResult<RatingAssignment> {
    let category = table.category();
    let entries = table.entries();
    let not_covered = |reason: String| CostOfDebtError::RatingLookup {
        category,
        coverage_ratio,
        reason,
    };

    // Rows are sorted by lower bound: the candidate is the last row whose
    // lower bound does not exceed the ratio.
    let idx = entries.partition_point(|e| e.lower_bound <= coverage_ratio);
    if idx == 0 {
        return Err(not_covered(match entries.first() {
            Some(first) => format!("below the lowest bound {}", first.lower_bound),
            None => "table has no entries".into(),
        }));
    }

    let entry = &entries[idx - 1];
    let is_last = idx == entries.len();
    let matched = coverage_ratio < entry.upper_bound || (is_last && entry.is_open_ended());
    if !matched {
        return Err(not_covered(if is_last {
            format!(
                "above the highest bound {} and the top row is not open ended",
                entry.upper_bound
            )
        } else {
            format!(
                "falls in the gap between {} and {}",
                entry.upper_bound,
                entries[idx].lower_bound
            )
        }));
    }

    debug!(
        %category,
        %coverage_ratio,
        rating = %entry.rating,
        spread = %entry.spread,
        "matched rating row"
    );

    Ok(RatingAssignment {
        category,
        coverage_ratio,
        matched_entry: entry.clone(),
    })
}
