use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::errors::DscError;
use crate::oracle::PriceOracle;
use crate::state::CollateralAsset;

/// Collateral a user holds in one asset
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CollateralPosition {
    /// Owner of the deposit
    pub owner: Pubkey,

    /// Collateral mint
    pub mint: Pubkey,

    /// Amount deposited (18 decimals)
    pub deposited_amount: u128,
}

/// Value a deposit held before it was touched by the running operation
#[derive(Clone, Copy, Debug)]
struct JournalEntry {
    key: (Pubkey, Pubkey),
    previous: Option<u128>,
}

/// Per-user, per-asset deposits plus the registry of accepted assets
///
/// Mutations are journaled so an aborted operation can restore the exact
/// prior state with `rollback`; `commit` forgets the journal.
#[derive(Clone, Debug, Default)]
pub struct CollateralLedger {
    assets: Vec<CollateralAsset>,
    deposits: BTreeMap<(Pubkey, Pubkey), u128>,
    journal: Vec<JournalEntry>,
}

impl CollateralLedger {
    pub fn new(assets: Vec<CollateralAsset>) -> Self {
        Self {
            assets,
            deposits: BTreeMap::new(),
            journal: Vec::new(),
        }
    }

    /// Accepted assets in registration order
    pub fn assets(&self) -> &[CollateralAsset] {
        &self.assets
    }

    /// Registry entry for a mint
    pub fn asset(&self, mint: &Pubkey) -> Result<&CollateralAsset> {
        self.assets
            .iter()
            .find(|asset| &asset.mint == mint)
            .ok_or_else(|| error!(DscError::AssetNotAccepted))
    }

    pub fn is_accepted(&self, mint: &Pubkey) -> bool {
        self.assets.iter().any(|asset| &asset.mint == mint)
    }

    pub fn balance_of(&self, user: &Pubkey, mint: &Pubkey) -> u128 {
        self.deposits.get(&(*user, *mint)).copied().unwrap_or(0)
    }

    /// Sum of every user's deposit of a mint
    pub fn total_deposited(&self, mint: &Pubkey) -> u128 {
        self.deposits
            .iter()
            .filter(|((_, deposit_mint), _)| deposit_mint == mint)
            .fold(0u128, |total, (_, amount)| total.saturating_add(*amount))
    }

    /// Positions of a user, in registration order, zero balances included
    /// once touched
    pub fn positions_of(&self, user: &Pubkey) -> Vec<CollateralPosition> {
        self.assets
            .iter()
            .filter_map(|asset| {
                self.deposits
                    .get(&(*user, asset.mint))
                    .map(|deposited_amount| CollateralPosition {
                        owner: *user,
                        mint: asset.mint,
                        deposited_amount: *deposited_amount,
                    })
            })
            .collect()
    }

    /// Credit a deposit, returning the new balance
    pub fn deposit(&mut self, user: &Pubkey, mint: &Pubkey, amount: u128) -> Result<u128> {
        require!(amount > 0, DscError::InvalidAmount);
        require!(self.is_accepted(mint), DscError::AssetNotAccepted);

        let new_amount = self
            .balance_of(user, mint)
            .checked_add(amount)
            .ok_or(DscError::MathOverflow)?;
        self.write(*user, *mint, new_amount);

        Ok(new_amount)
    }

    /// Debit a deposit, returning the remaining balance
    pub fn withdraw(&mut self, user: &Pubkey, mint: &Pubkey, amount: u128) -> Result<u128> {
        require!(amount > 0, DscError::InvalidAmount);
        require!(self.is_accepted(mint), DscError::AssetNotAccepted);

        let remaining = self
            .balance_of(user, mint)
            .checked_sub(amount)
            .ok_or(DscError::InsufficientCollateral)?;
        self.write(*user, *mint, remaining);

        Ok(remaining)
    }

    /// USD value of everything a user deposited
    ///
    /// Every registered asset is priced, in registration order, so a stale
    /// feed fails the valuation even for a zero balance.
    pub fn total_value_usd(&self, user: &Pubkey, oracle: &PriceOracle) -> Result<u128> {
        let mut total: u128 = 0;
        for asset in &self.assets {
            let amount = self.balance_of(user, &asset.mint);
            let value = oracle.usd_value(asset, amount)?;
            total = total.checked_add(value).ok_or(DscError::MathOverflow)?;
        }
        Ok(total)
    }

    /// Journal position to roll back to
    pub fn checkpoint(&self) -> usize {
        self.journal.len()
    }

    /// Undo every mutation made after `checkpoint`
    pub fn rollback(&mut self, checkpoint: usize) {
        while self.journal.len() > checkpoint {
            let Some(entry) = self.journal.pop() else {
                break;
            };
            match entry.previous {
                Some(amount) => {
                    self.deposits.insert(entry.key, amount);
                }
                None => {
                    self.deposits.remove(&entry.key);
                }
            }
        }
    }

    pub fn commit(&mut self) {
        self.journal.clear();
    }

    fn write(&mut self, user: Pubkey, mint: Pubkey, amount: u128) {
        let key = (user, mint);
        let previous = self.deposits.insert(key, amount);
        self.journal.push(JournalEntry { key, previous });
    }
}
