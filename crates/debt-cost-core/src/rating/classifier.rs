use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{Money, RatingCategory};
use crate::{CostOfDebtError, DebtCostResult};

/// Market cap above which a non-financial firm uses the large-cap grid.
pub const LARGE_CAP_THRESHOLD: Money = dec!(5_000_000_000);

/// Sector / industry keywords that mark a financial-services firm.
const FINANCIAL_KEYWORDS: [&str; 8] = [
    "financial",
    "bank",
    "insurance",
    "credit",
    "mortgage",
    "investment",
    "securities",
    "asset management",
];

/// Company metadata used only to pick a rating grid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyProfile {
    /// Equity market capitalisation, same currency unit as the grids
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<Money>,
    /// Banks, insurers, brokers and similar
    #[serde(default)]
    pub is_financial_services: bool,
}

impl CompanyProfile {
    pub fn new(market_cap: Option<Money>, is_financial_services: bool) -> Self {
        Self {
            market_cap,
            is_financial_services,
        }
    }

    /// Build a profile, detecting financial services from free-text
    /// sector and industry descriptions.
    pub fn from_sector(market_cap: Option<Money>, sector: &str, industry: &str) -> Self {
        Self::new(market_cap, is_financial_sector(sector, industry))
    }

    /// Profile from an explicit flag plus optional descriptions. The firm is
    /// financial when flagged or when either description matches; an unset
    /// flag never overrides the keywords.
    pub fn from_flag_and_sector(
        market_cap: Option<Money>,
        flagged_financial: bool,
        sector: Option<&str>,
        industry: Option<&str>,
    ) -> Self {
        let detected =
            is_financial_sector(sector.unwrap_or_default(), industry.unwrap_or_default());
        Self::new(market_cap, flagged_financial || detected)
    }

    /// A negative market cap is a data error, not a small company.
    pub fn validate(&self) -> DebtCostResult<()> {
        match self.market_cap {
            Some(mc) if mc < Decimal::ZERO => Err(CostOfDebtError::InvalidInput {
                field: "market_cap".into(),
                reason: "Market cap cannot be negative".into(),
            }),
            _ => Ok(()),
        }
    }
}

/// Pick the rating grid for a company. First match wins:
/// financial services, then market cap above [`LARGE_CAP_THRESHOLD`],
/// otherwise small cap (including a missing market cap).
pub fn classify(profile: &CompanyProfile) -> RatingCategory {
    let category = if profile.is_financial_services {
        RatingCategory::FinancialServices
    } else if profile
        .market_cap
        .is_some_and(|mc| mc > LARGE_CAP_THRESHOLD)
    {
        RatingCategory::LargeCap
    } else {
        RatingCategory::SmallCap
    };
    debug!(
        market_cap = ?profile.market_cap,
        financial = profile.is_financial_services,
        %category,
        "classified company"
    );
    category
}

/// True when either description mentions a financial-services keyword.
pub fn is_financial_sector(sector: &str, industry: &str) -> bool {
    let sector = sector.to_lowercase();
    let industry = industry.to_lowercase();
    FINANCIAL_KEYWORDS
        .iter()
        .any(|kw| sector.contains(kw) || industry.contains(kw))
}
