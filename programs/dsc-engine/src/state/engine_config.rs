use std::collections::BTreeSet;

use anchor_lang::prelude::*;

use crate::constants::MAX_COLLATERAL_ASSETS;
use crate::errors::DscError;

/// An accepted collateral asset and the feed that prices it
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollateralAsset {
    /// Token mint of the collateral
    pub mint: Pubkey,

    /// Price feed quoting the mint in USD (8 decimals)
    pub price_feed: Pubkey,
}

/// Parameters for initializing an engine
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default)]
pub struct InitializeEngineParams {
    /// Account that custodies collateral and escrows DSC for the engine
    pub authority: Pubkey,

    /// Accepted collateral mints, in registration order
    pub collateral_mints: Vec<Pubkey>,

    /// Price feed for each entry of `collateral_mints`
    pub price_feeds: Vec<Pubkey>,
}

impl InitializeEngineParams {
    /// Validate the mint/feed lists and pair them into a registry
    ///
    /// The lists must be non-empty, equally long, free of duplicate mints
    /// and no longer than `MAX_COLLATERAL_ASSETS`.
    pub fn collateral_assets(&self) -> Result<Vec<CollateralAsset>> {
        require!(
            !self.collateral_mints.is_empty(),
            DscError::EmptyCollateralConfig
        );
        require!(
            self.collateral_mints.len() == self.price_feeds.len(),
            DscError::CollateralConfigLengthMismatch
        );
        require!(
            self.collateral_mints.len() <= MAX_COLLATERAL_ASSETS,
            DscError::TooManyCollateralAssets
        );

        let mut seen = BTreeSet::new();
        let mut assets = Vec::with_capacity(self.collateral_mints.len());
        for (mint, price_feed) in self.collateral_mints.iter().zip(&self.price_feeds) {
            require!(seen.insert(*mint), DscError::DuplicateCollateralAsset);
            assets.push(CollateralAsset {
                mint: *mint,
                price_feed: *price_feed,
            });
        }

        Ok(assets)
    }
}
