use anchor_lang::prelude::*;

use crate::constants::{LIQUIDATION_BONUS, LIQUIDATION_PRECISION, MIN_HEALTH_FACTOR};
use crate::engine::DscEngine;
use crate::errors::DscError;
use crate::events::{EngineEvent, PositionLiquidated};
use crate::instructions::user::burn_dsc::burn;
use crate::instructions::user::redeem_collateral::redeem;
use crate::math::mul_div;

/// Liquidate an unhealthy position
///
/// When a user's health factor falls below 1.0, anyone may repay part of
/// their debt. The liquidator:
/// 1. Pays `debt_to_cover` DSC, burned against the user's debt
/// 2. Receives collateral worth the covered debt plus a 10% bonus
///
/// The user's health factor must strictly improve and the liquidator must
/// be healthy afterwards. Seizing more collateral than the user holds
/// fails with `InsufficientCollateral`; there is no partial seizure.
///
/// # Arguments
/// * `engine` - The engine whose ledgers are updated
/// * `liquidator` - Payer of the DSC and recipient of the collateral
/// * `collateral_mint` - Collateral asset to seize
/// * `user` - Owner of the unhealthy position
/// * `debt_to_cover` - DSC to repay (18 decimals, equal to USD)
pub fn handler(
    engine: &mut DscEngine,
    liquidator: Pubkey,
    collateral_mint: Pubkey,
    user: Pubkey,
    debt_to_cover: u128,
) -> Result<()> {
    require!(debt_to_cover > 0, DscError::InvalidAmount);
    let asset = *engine.collateral.asset(&collateral_mint)?;

    let (starting_health_factor, collateral_seized, liquidation_bonus) = {
        let health = engine.health()?;

        // Verify position is liquidatable (health factor < 1.0)
        let starting_health_factor = health.health_factor(&user)?;
        require!(
            starting_health_factor < MIN_HEALTH_FACTOR,
            DscError::HealthFactorFine
        );

        // Collateral worth the covered debt, plus the bonus on top
        let collateral_seized = health.oracle().asset_amount_from_usd(&asset, debt_to_cover)?;
        let liquidation_bonus = mul_div(collateral_seized, LIQUIDATION_BONUS, LIQUIDATION_PRECISION)?;

        (starting_health_factor, collateral_seized, liquidation_bonus)
    };

    let total_collateral_to_redeem = collateral_seized
        .checked_add(liquidation_bonus)
        .ok_or(DscError::MathOverflow)?;

    redeem(engine, user, liquidator, collateral_mint, total_collateral_to_redeem)?;
    burn(engine, user, liquidator, debt_to_cover)?;

    let ending_health_factor = {
        let health = engine.health()?;
        let ending_health_factor = health.health_factor(&user)?;
        require!(
            ending_health_factor > starting_health_factor,
            DscError::HealthFactorNotImproved
        );
        health.assert_healthy(&liquidator)?;
        ending_health_factor
    };

    let timestamp = engine.now()?;
    engine.record(EngineEvent::PositionLiquidated(PositionLiquidated {
        liquidator,
        user,
        collateral_mint,
        debt_covered: debt_to_cover,
        collateral_seized,
        liquidation_bonus,
        starting_health_factor,
        ending_health_factor,
        timestamp,
    }));

    msg!(
        "Liquidated {}: covered {} DSC, seized {} of {} (bonus {}), health {} -> {}",
        user,
        debt_to_cover,
        total_collateral_to_redeem,
        collateral_mint,
        liquidation_bonus,
        starting_health_factor,
        ending_health_factor
    );

    Ok(())
}
