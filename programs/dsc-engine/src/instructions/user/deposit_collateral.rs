use anchor_lang::prelude::*;

use crate::engine::DscEngine;
use crate::events::{CollateralDeposited, EngineEvent};
use crate::settlement::Transfer;

/// Deposit collateral into a user's position
///
/// Credits the collateral ledger and stages the pull from the user into
/// the vault. No health check: a deposit never lowers the health factor.
///
/// # Arguments
/// * `engine` - The engine whose ledgers are updated
/// * `user` - Owner of the position, and source of the tokens
/// * `collateral_mint` - Accepted collateral asset
/// * `amount` - Amount to deposit (18 decimals)
pub fn handler(engine: &mut DscEngine, user: Pubkey, collateral_mint: Pubkey, amount: u128) -> Result<()> {
    let new_deposit_amount = engine.collateral.deposit(&user, &collateral_mint, amount)?;
    let timestamp = engine.now()?;

    engine.settlement.push(Transfer::CollateralIn {
        mint: collateral_mint,
        from: user,
        amount,
    });

    engine.record(EngineEvent::CollateralDeposited(CollateralDeposited {
        user,
        collateral_mint,
        amount,
        new_deposit_amount,
        timestamp,
    }));

    msg!("Deposited {} of {} for {}", amount, collateral_mint, user);

    Ok(())
}
