use anchor_lang::prelude::*;

use crate::errors::DscError;
use crate::token::{CollateralCustody, DebtToken};

/// An external token movement requested by an operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transfer {
    /// Pull collateral from a user into the vault
    CollateralIn { mint: Pubkey, from: Pubkey, amount: u128 },

    /// Pull DSC from a holder into escrow
    DebtIn { from: Pubkey, amount: u128 },

    /// Mint fresh DSC to a user
    DebtMint { to: Pubkey, amount: u128 },

    /// Release collateral from the vault
    CollateralOut { mint: Pubkey, to: Pubkey, amount: u128 },

    /// Destroy escrowed DSC
    DebtBurn { amount: u128 },
}

impl Transfer {
    /// Execution order: pulls, mint, payouts, burn
    fn stage(&self) -> u8 {
        match self {
            Transfer::CollateralIn { .. } | Transfer::DebtIn { .. } => 0,
            Transfer::DebtMint { .. } => 1,
            Transfer::CollateralOut { .. } => 2,
            Transfer::DebtBurn { .. } => 3,
        }
    }

    fn failure(&self) -> DscError {
        match self {
            Transfer::DebtMint { .. } => DscError::MintFailed,
            _ => DscError::TransferFailed,
        }
    }
}

/// Token movements staged while an operation mutates the ledgers
///
/// Nothing leaves the engine until `execute`, which runs after every ledger
/// check has passed. A failed step unwinds the steps already taken.
#[derive(Clone, Debug, Default)]
pub struct Settlement {
    transfers: Vec<Transfer>,
}

impl Settlement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, transfer: Transfer) {
        self.transfers.push(transfer);
    }

    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }

    pub fn clear(&mut self) {
        self.transfers.clear();
    }

    /// Run the staged transfers in stage order
    ///
    /// Staging order is kept within a stage. On failure the completed steps
    /// are reversed and the failing step's error is returned; the queue is
    /// empty afterwards either way.
    pub fn execute(
        &mut self,
        custody: &mut dyn CollateralCustody,
        coin: &mut dyn DebtToken,
    ) -> Result<()> {
        let mut transfers = std::mem::take(&mut self.transfers);
        transfers.sort_by_key(Transfer::stage);

        for (index, transfer) in transfers.iter().enumerate() {
            if !apply(transfer, custody, coin) {
                msg!("Settlement step {:?} failed, unwinding {} steps", transfer, index);
                for completed in transfers[..index].iter().rev() {
                    compensate(completed, custody, coin);
                }
                let code = transfer.failure();
                return Err(error!(code));
            }
        }

        Ok(())
    }
}

fn apply(transfer: &Transfer, custody: &mut dyn CollateralCustody, coin: &mut dyn DebtToken) -> bool {
    match *transfer {
        Transfer::CollateralIn { mint, from, amount } => custody.transfer_in(&mint, &from, amount),
        Transfer::DebtIn { from, amount } => coin.transfer_in(&from, amount),
        Transfer::DebtMint { to, amount } => coin.mint(&to, amount),
        Transfer::CollateralOut { mint, to, amount } => custody.transfer_out(&mint, &to, amount),
        Transfer::DebtBurn { amount } => {
            coin.burn(amount);
            true
        }
    }
}

fn compensate(transfer: &Transfer, custody: &mut dyn CollateralCustody, coin: &mut dyn DebtToken) {
    let restored = match *transfer {
        Transfer::CollateralIn { mint, from, amount } => custody.transfer_out(&mint, &from, amount),
        Transfer::DebtIn { from, amount } => coin.transfer_out(&from, amount),
        Transfer::DebtMint { to, amount } => {
            let recalled = coin.transfer_in(&to, amount);
            if recalled {
                coin.burn(amount);
            }
            recalled
        }
        Transfer::CollateralOut { mint, to, amount } => custody.transfer_in(&mint, &to, amount),
        // Burns run last; nothing follows them that could fail
        Transfer::DebtBurn { .. } => true,
    };

    if restored {
        msg!("Reverted {:?}", transfer);
    } else {
        msg!("Could not revert {:?}", transfer);
    }
}
