use anchor_lang::prelude::*;

use crate::engine::DscEngine;
use crate::events::{DscMinted, EngineEvent};
use crate::settlement::Transfer;

/// Mint DSC against a user's collateral
///
/// Records the debt first, then requires the position to stay healthy
/// with it. The token mint itself is staged and happens on settlement.
///
/// # Arguments
/// * `engine` - The engine whose ledgers are updated
/// * `user` - Borrower, and recipient of the minted DSC
/// * `amount` - DSC to mint (18 decimals)
pub fn handler(engine: &mut DscEngine, user: Pubkey, amount: u128) -> Result<()> {
    let total_minted = engine.debt.mint(&user, amount)?;
    engine.health()?.assert_healthy(&user)?;
    let timestamp = engine.now()?;

    engine.settlement.push(Transfer::DebtMint { to: user, amount });

    engine.record(EngineEvent::DscMinted(DscMinted {
        user,
        amount,
        total_minted,
        timestamp,
    }));

    msg!("Minted {} DSC for {}, total debt {}", amount, user, total_minted);

    Ok(())
}
