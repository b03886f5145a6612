use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use anchor_lang::prelude::*;

/// Moves collateral between users and the engine's vault
///
/// `false` means the transfer did not happen; the engine treats it as
/// `TransferFailed`.
pub trait CollateralCustody {
    /// Pull `amount` of `mint` from `from` into the vault
    fn transfer_in(&mut self, mint: &Pubkey, from: &Pubkey, amount: u128) -> bool;

    /// Push `amount` of `mint` from the vault to `to`
    fn transfer_out(&mut self, mint: &Pubkey, to: &Pubkey, amount: u128) -> bool;

    fn balance_of(&self, mint: &Pubkey, holder: &Pubkey) -> u128;
}

/// Token balances per (mint, owner) with one vault holder
///
/// Clones share balances, so tests and local tooling can fund users and
/// inspect the vault while the engine owns another handle.
#[derive(Clone, Debug)]
pub struct TokenVault {
    holder: Pubkey,
    balances: Arc<RwLock<BTreeMap<(Pubkey, Pubkey), u128>>>,
}

impl TokenVault {
    pub fn new(holder: Pubkey) -> Self {
        Self {
            holder,
            balances: Arc::default(),
        }
    }

    /// Account the vault holds collateral under
    pub fn holder(&self) -> Pubkey {
        self.holder
    }

    /// Mint test tokens straight into an owner's balance
    pub fn fund(&self, mint: &Pubkey, owner: &Pubkey, amount: u128) {
        let mut balances = self.balances.write().unwrap_or_else(PoisonError::into_inner);
        let balance = balances.entry((*mint, *owner)).or_insert(0);
        *balance = balance.saturating_add(amount);
    }

    pub fn balance(&self, mint: &Pubkey, owner: &Pubkey) -> u128 {
        self.balances
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(*mint, *owner))
            .copied()
            .unwrap_or(0)
    }

    /// Move tokens between two owners; `false` if `from` is short
    pub fn transfer(&self, mint: &Pubkey, from: &Pubkey, to: &Pubkey, amount: u128) -> bool {
        let mut balances = self.balances.write().unwrap_or_else(PoisonError::into_inner);

        let from_balance = balances.get(&(*mint, *from)).copied().unwrap_or(0);
        let Some(from_remaining) = from_balance.checked_sub(amount) else {
            msg!("Transfer of {} from {} rejected: balance {}", amount, from, from_balance);
            return false;
        };
        balances.insert((*mint, *from), from_remaining);

        let to_balance = balances.entry((*mint, *to)).or_insert(0);
        *to_balance = to_balance.saturating_add(amount);
        true
    }
}

impl CollateralCustody for TokenVault {
    fn transfer_in(&mut self, mint: &Pubkey, from: &Pubkey, amount: u128) -> bool {
        let holder = self.holder;
        self.transfer(mint, from, &holder, amount)
    }

    fn transfer_out(&mut self, mint: &Pubkey, to: &Pubkey, amount: u128) -> bool {
        let holder = self.holder;
        self.transfer(mint, &holder, to, amount)
    }

    fn balance_of(&self, mint: &Pubkey, holder: &Pubkey) -> u128 {
        self.balance(mint, holder)
    }
}
