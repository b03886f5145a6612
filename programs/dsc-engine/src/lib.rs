#![allow(unexpected_cfgs)]

//! Over-collateralized stablecoin engine
//!
//! Users deposit accepted collateral, mint DSC against it while keeping a
//! health factor of at least 1.0, and burn DSC to redeem. Positions whose
//! health factor drops below 1.0 can be liquidated by anyone at a 10%
//! collateral bonus.

pub mod constants;
pub mod engine;
pub mod errors;
pub mod events;
pub mod guard;
pub mod health;
pub mod instructions;
pub mod math;
pub mod network;
pub mod oracle;
pub mod settlement;
pub mod state;
pub mod token;

pub use engine::DscEngine;
pub use errors::DscError;
pub use events::EngineEvent;
pub use health::calculate_health_factor;
pub use network::LocalNetwork;
pub use oracle::{ManualClock, ManualPriceFeeds, PriceFeeds, PriceQuote, SysvarClock, UnixClock};
pub use state::{CollateralAsset, CollateralPosition, DebtPosition, InitializeEngineParams};
pub use token::{CollateralCustody, DebtToken, StableCoin, TokenVault};
