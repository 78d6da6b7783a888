pub mod cost_of_debt;
pub mod rating;
pub mod risk_free;
