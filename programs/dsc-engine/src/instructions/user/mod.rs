pub mod deposit_collateral;
pub mod redeem_collateral;
pub mod mint_dsc;
pub mod burn_dsc;
