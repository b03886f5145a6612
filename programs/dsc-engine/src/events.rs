use anchor_lang::prelude::*;

// ============================================================================
// ENGINE EVENTS
// ============================================================================

/// Emitted once when the engine is initialized
#[event]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineInitialized {
    pub authority: Pubkey,
    pub collateral_mints: Vec<Pubkey>,
    pub price_feeds: Vec<Pubkey>,
    pub timestamp: i64,
}

// ============================================================================
// POSITION EVENTS
// ============================================================================

/// Emitted when a user deposits collateral
#[event]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollateralDeposited {
    pub user: Pubkey,
    pub collateral_mint: Pubkey,
    pub amount: u128,
    pub new_deposit_amount: u128,
    pub timestamp: i64,
}

/// Emitted when collateral leaves a position, by redemption or liquidation
#[event]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollateralRedeemed {
    pub redeemed_from: Pubkey,
    pub redeemed_to: Pubkey,
    pub collateral_mint: Pubkey,
    pub amount: u128,
    pub remaining_deposit: u128,
    pub timestamp: i64,
}

/// Emitted when a user mints DSC
#[event]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DscMinted {
    pub user: Pubkey,
    pub amount: u128,
    pub total_minted: u128,
    pub timestamp: i64,
}

/// Emitted when debt is burned; `dsc_from` paid the tokens
#[event]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DscBurned {
    pub on_behalf_of: Pubkey,
    pub dsc_from: Pubkey,
    pub amount: u128,
    pub remaining_debt: u128,
    pub timestamp: i64,
}

// ============================================================================
// LIQUIDATION EVENTS
// ============================================================================

/// Emitted when a position is liquidated
#[event]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionLiquidated {
    pub liquidator: Pubkey,
    pub user: Pubkey,
    pub collateral_mint: Pubkey,
    pub debt_covered: u128,
    pub collateral_seized: u128,
    pub liquidation_bonus: u128,
    pub starting_health_factor: u128,
    pub ending_health_factor: u128,
    pub timestamp: i64,
}

/// Any event the engine records
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineEvent {
    EngineInitialized(EngineInitialized),
    CollateralDeposited(CollateralDeposited),
    CollateralRedeemed(CollateralRedeemed),
    DscMinted(DscMinted),
    DscBurned(DscBurned),
    PositionLiquidated(PositionLiquidated),
}

impl EngineEvent {
    /// Write the event to the program log
    pub fn emit(&self) {
        match self {
            EngineEvent::EngineInitialized(event) => {
                emit!(event.clone());
            }
            EngineEvent::CollateralDeposited(event) => {
                emit!(event.clone());
            }
            EngineEvent::CollateralRedeemed(event) => {
                emit!(event.clone());
            }
            EngineEvent::DscMinted(event) => {
                emit!(event.clone());
            }
            EngineEvent::DscBurned(event) => {
                emit!(event.clone());
            }
            EngineEvent::PositionLiquidated(event) => {
                emit!(event.clone());
            }
        }
    }
}
