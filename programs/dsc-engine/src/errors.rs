use anchor_lang::prelude::*;

#[error_code]
pub enum DscError {
    #[msg("Amount must be greater than zero")]
    InvalidAmount,

    #[msg("Collateral asset is not accepted")]
    AssetNotAccepted,

    #[msg("Insufficient collateral deposited")]
    InsufficientCollateral,

    #[msg("Burn amount exceeds minted debt")]
    InsufficientDebt,

    #[msg("Token transfer failed")]
    TransferFailed,

    #[msg("DSC mint failed")]
    MintFailed,

    #[msg("Health factor below minimum after operation")]
    HealthFactorBroken,

    #[msg("Position is healthy, cannot liquidate")]
    HealthFactorFine,

    #[msg("Liquidation did not improve health factor")]
    HealthFactorNotImproved,

    #[msg("Oracle price is stale")]
    StalePrice,

    #[msg("Oracle price must be positive")]
    InvalidPrice,

    #[msg("Price feed not found")]
    PriceFeedNotFound,

    #[msg("Math overflow")]
    MathOverflow,

    #[msg("Engine call already in progress")]
    ReentrantCall,

    #[msg("At least one collateral asset is required")]
    EmptyCollateralConfig,

    #[msg("Collateral mints and price feeds must be the same length")]
    CollateralConfigLengthMismatch,

    #[msg("Collateral asset listed more than once")]
    DuplicateCollateralAsset,

    #[msg("Maximum number of collateral assets exceeded")]
    TooManyCollateralAssets,
}
