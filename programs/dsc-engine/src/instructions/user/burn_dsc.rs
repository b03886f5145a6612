use anchor_lang::prelude::*;

use crate::engine::DscEngine;
use crate::events::{DscBurned, EngineEvent};
use crate::settlement::Transfer;

/// Repay a user's own DSC debt
///
/// No health check: burning debt never lowers the health factor.
pub fn handler(engine: &mut DscEngine, user: Pubkey, amount: u128) -> Result<()> {
    let remaining_debt = burn(engine, user, user, amount)?;

    msg!("Burned {} DSC for {}, remaining debt {}", amount, user, remaining_debt);

    Ok(())
}

/// Reduce `on_behalf_of`'s debt, paid with DSC pulled from `dsc_from`
///
/// Returns the debt left on the position.
pub(crate) fn burn(engine: &mut DscEngine, on_behalf_of: Pubkey, dsc_from: Pubkey, amount: u128) -> Result<u128> {
    let remaining_debt = engine.debt.burn(&on_behalf_of, amount)?;
    let timestamp = engine.now()?;

    engine.settlement.push(Transfer::DebtIn {
        from: dsc_from,
        amount,
    });
    engine.settlement.push(Transfer::DebtBurn { amount });

    engine.record(EngineEvent::DscBurned(DscBurned {
        on_behalf_of,
        dsc_from,
        amount,
        remaining_debt,
        timestamp,
    }));

    Ok(remaining_debt)
}
