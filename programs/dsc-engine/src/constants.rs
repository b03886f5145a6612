/// DSC Engine Constants

// ============================================================================
// SCALING CONSTANTS
// ============================================================================

/// Fixed-point scale for token amounts, USD values and health factors (1e18)
pub const PRECISION: u128 = 1_000_000_000_000_000_000; // 10^18

/// Scale of a raw price feed answer (1e8)
pub const FEED_PRECISION: u128 = 100_000_000; // 10^8

/// Lifts an 8-decimal feed answer to 18 decimals (1e10)
pub const ADDITIONAL_FEED_PRECISION: u128 = 10_000_000_000; // 10^10

// ============================================================================
// RISK PARAMETERS
// ============================================================================

/// Share of collateral value that counts toward solvency (50%)
/// Debt may be at most half of collateral value, i.e. 200% collateralization
pub const LIQUIDATION_THRESHOLD: u128 = 50;

/// Denominator for LIQUIDATION_THRESHOLD and LIQUIDATION_BONUS
pub const LIQUIDATION_PRECISION: u128 = 100;

/// Bonus collateral a liquidator receives on top of the covered debt (10%)
pub const LIQUIDATION_BONUS: u128 = 10;

/// Health factor below which a position may be liquidated (1.0)
pub const MIN_HEALTH_FACTOR: u128 = PRECISION;

/// Health factor reported for a position without debt
pub const MAX_HEALTH_FACTOR: u128 = u128::MAX;

// ============================================================================
// ORACLE
// ============================================================================

/// Maximum age of a price quote before it is rejected (seconds)
pub const STALENESS_TIMEOUT_SECONDS: i64 = 60 * 60;

// ============================================================================
// LIMITS
// ============================================================================

/// Maximum number of accepted collateral assets
pub const MAX_COLLATERAL_ASSETS: usize = 32;
