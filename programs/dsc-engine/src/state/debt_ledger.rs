use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::errors::DscError;

/// DSC a user has minted against their collateral
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DebtPosition {
    /// Owner of the debt
    pub owner: Pubkey,

    /// DSC minted and not yet burned (18 decimals)
    pub minted_amount: u128,
}

/// Per-user minted DSC, journaled like the collateral ledger
#[derive(Clone, Debug, Default)]
pub struct DebtLedger {
    minted: BTreeMap<Pubkey, u128>,
    journal: Vec<(Pubkey, Option<u128>)>,
}

impl DebtLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn debt_of(&self, user: &Pubkey) -> u128 {
        self.minted.get(user).copied().unwrap_or(0)
    }

    pub fn position_of(&self, user: &Pubkey) -> DebtPosition {
        DebtPosition {
            owner: *user,
            minted_amount: self.debt_of(user),
        }
    }

    /// DSC outstanding across all users
    pub fn total_debt(&self) -> u128 {
        self.minted.values().fold(0u128, |total, amount| total.saturating_add(*amount))
    }

    /// Record newly minted DSC, returning the user's total
    pub fn mint(&mut self, user: &Pubkey, amount: u128) -> Result<u128> {
        require!(amount > 0, DscError::InvalidAmount);

        let total = self
            .debt_of(user)
            .checked_add(amount)
            .ok_or(DscError::MathOverflow)?;
        self.write(*user, total);

        Ok(total)
    }

    /// Check a burn would succeed without applying it
    pub fn ensure_burnable(&self, user: &Pubkey, amount: u128) -> Result<()> {
        require!(amount > 0, DscError::InvalidAmount);
        require!(self.debt_of(user) >= amount, DscError::InsufficientDebt);
        Ok(())
    }

    /// Remove burned DSC, returning the user's remaining debt
    pub fn burn(&mut self, user: &Pubkey, amount: u128) -> Result<u128> {
        self.ensure_burnable(user, amount)?;

        let remaining = self
            .debt_of(user)
            .checked_sub(amount)
            .ok_or(DscError::InsufficientDebt)?;
        self.write(*user, remaining);

        Ok(remaining)
    }

    pub fn checkpoint(&self) -> usize {
        self.journal.len()
    }

    pub fn rollback(&mut self, checkpoint: usize) {
        while self.journal.len() > checkpoint {
            let Some((user, previous)) = self.journal.pop() else {
                break;
            };
            match previous {
                Some(amount) => {
                    self.minted.insert(user, amount);
                }
                None => {
                    self.minted.remove(&user);
                }
            }
        }
    }

    pub fn commit(&mut self) {
        self.journal.clear();
    }

    fn write(&mut self, user: Pubkey, amount: u128) {
        let previous = self.minted.insert(user, amount);
        self.journal.push((user, previous));
    }
}
