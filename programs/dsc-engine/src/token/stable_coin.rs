use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use anchor_lang::prelude::*;

/// The debt token the engine mints and burns
///
/// Burned tokens are always pulled into the engine's escrow first, so
/// `burn` has no failure mode.
pub trait DebtToken {
    /// Mint new tokens to `to`
    fn mint(&mut self, to: &Pubkey, amount: u128) -> bool;

    /// Pull tokens from `from` into escrow
    fn transfer_in(&mut self, from: &Pubkey, amount: u128) -> bool;

    /// Return escrowed tokens to `to`
    fn transfer_out(&mut self, to: &Pubkey, amount: u128) -> bool;

    /// Destroy escrowed tokens
    fn burn(&mut self, amount: u128);
}

#[derive(Debug, Default)]
struct Ledger {
    balances: BTreeMap<Pubkey, u128>,
    total_supply: u128,
}

impl Ledger {
    fn balance(&self, holder: &Pubkey) -> u128 {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    fn debit(&mut self, holder: &Pubkey, amount: u128) -> bool {
        let Some(remaining) = self.balance(holder).checked_sub(amount) else {
            return false;
        };
        self.balances.insert(*holder, remaining);
        true
    }

    fn credit(&mut self, holder: &Pubkey, amount: u128) {
        let balance = self.balances.entry(*holder).or_insert(0);
        *balance = balance.saturating_add(amount);
    }
}

/// Decentralized stable coin, pegged to one USD with 18 decimals
///
/// Only the owner (the engine's escrow) can mint and burn. Clones share
/// balances.
#[derive(Clone, Debug)]
pub struct StableCoin {
    owner: Pubkey,
    ledger: Arc<RwLock<Ledger>>,
}

impl StableCoin {
    pub fn new(owner: Pubkey) -> Self {
        Self {
            owner,
            ledger: Arc::default(),
        }
    }

    /// Escrow account that mints and burns
    pub fn owner(&self) -> Pubkey {
        self.owner
    }

    pub fn balance_of(&self, holder: &Pubkey) -> u128 {
        self.ledger
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .balance(holder)
    }

    pub fn total_supply(&self) -> u128 {
        self.ledger
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .total_supply
    }

    /// Holder-to-holder transfer; `false` if `from` is short
    pub fn transfer(&self, from: &Pubkey, to: &Pubkey, amount: u128) -> bool {
        let mut ledger = self.ledger.write().unwrap_or_else(PoisonError::into_inner);
        if !ledger.debit(from, amount) {
            msg!("DSC transfer of {} from {} rejected", amount, from);
            return false;
        }
        ledger.credit(to, amount);
        true
    }
}

impl DebtToken for StableCoin {
    fn mint(&mut self, to: &Pubkey, amount: u128) -> bool {
        if *to == Pubkey::default() || amount == 0 {
            msg!("DSC mint of {} to {} rejected", amount, to);
            return false;
        }

        let mut ledger = self.ledger.write().unwrap_or_else(PoisonError::into_inner);
        let Some(total_supply) = ledger.total_supply.checked_add(amount) else {
            return false;
        };
        ledger.total_supply = total_supply;
        ledger.credit(to, amount);
        true
    }

    fn transfer_in(&mut self, from: &Pubkey, amount: u128) -> bool {
        let owner = self.owner;
        self.transfer(from, &owner, amount)
    }

    fn transfer_out(&mut self, to: &Pubkey, amount: u128) -> bool {
        let owner = self.owner;
        self.transfer(&owner, to, amount)
    }

    fn burn(&mut self, amount: u128) {
        let mut ledger = self.ledger.write().unwrap_or_else(PoisonError::into_inner);
        let owner = self.owner;
        let burned = amount.min(ledger.balance(&owner));
        ledger.debit(&owner, burned);
        ledger.total_supply = ledger.total_supply.saturating_sub(burned);
    }
}
