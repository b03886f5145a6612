pub mod engine_config;
pub mod collateral_ledger;
pub mod debt_ledger;

pub use engine_config::*;
pub use collateral_ledger::*;
pub use debt_ledger::*;
