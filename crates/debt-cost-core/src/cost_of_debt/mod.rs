pub mod compose;
pub mod pipeline;

pub use compose::{compose, CostOfDebtResult};
pub use pipeline::{
    calculate_cost_of_debt, evaluate, CostOfDebtInput, CostOfDebtOutput, RISK_FREE_WARNING,
};
