use anchor_lang::prelude::*;

use crate::engine::DscEngine;
use crate::events::{CollateralRedeemed, EngineEvent};
use crate::settlement::Transfer;

/// Withdraw collateral from a user's position
///
/// The user must remain healthy once the collateral is gone.
pub fn handler(engine: &mut DscEngine, user: Pubkey, collateral_mint: Pubkey, amount: u128) -> Result<()> {
    redeem(engine, user, user, collateral_mint, amount)?;
    engine.health()?.assert_healthy(&user)?;

    msg!("Redeemed {} of {} for {}", amount, collateral_mint, user);

    Ok(())
}

/// Debit `from`'s position and stage the payout to `to`
///
/// Shared with liquidation, where the two differ. Returns the collateral
/// left in the position.
pub(crate) fn redeem(
    engine: &mut DscEngine,
    from: Pubkey,
    to: Pubkey,
    collateral_mint: Pubkey,
    amount: u128,
) -> Result<u128> {
    let remaining_deposit = engine.collateral.withdraw(&from, &collateral_mint, amount)?;
    let timestamp = engine.now()?;

    engine.settlement.push(Transfer::CollateralOut {
        mint: collateral_mint,
        to,
        amount,
    });

    engine.record(EngineEvent::CollateralRedeemed(CollateralRedeemed {
        redeemed_from: from,
        redeemed_to: to,
        collateral_mint,
        amount,
        remaining_deposit,
        timestamp,
    }));

    Ok(remaining_deposit)
}
