pub mod bond_yields;

pub use bond_yields::{BondYield, BondYieldTable};
