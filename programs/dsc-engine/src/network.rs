//! One-call local deployment
//!
//! Stands up the engine with in-memory collaborators: WETH and WBTC as
//! collateral, manual price feeds, a token vault and the stable coin. The
//! returned handles share state with the engine, so callers can fund
//! users, move prices and advance time from outside.

use anchor_lang::prelude::*;

use crate::engine::DscEngine;
use crate::oracle::{ManualClock, ManualPriceFeeds};
use crate::state::InitializeEngineParams;
use crate::token::{StableCoin, TokenVault};

/// Initial WETH price, $2,000 (8 decimals)
pub const ETH_USD_PRICE: i128 = 2_000 * 100_000_000;

/// Initial WBTC price, $1,000 (8 decimals)
pub const BTC_USD_PRICE: i128 = 1_000 * 100_000_000;

/// Clock value at deployment
pub const GENESIS_TIMESTAMP: i64 = 1_700_000_000;

/// A deployed engine and the handles around it
pub struct LocalNetwork {
    pub engine: DscEngine,
    pub authority: Pubkey,
    pub weth: Pubkey,
    pub wbtc: Pubkey,
    pub weth_usd_price_feed: Pubkey,
    pub wbtc_usd_price_feed: Pubkey,
    pub vault: TokenVault,
    pub stable_coin: StableCoin,
    pub price_feeds: ManualPriceFeeds,
    pub clock: ManualClock,
}

impl LocalNetwork {
    pub fn deploy() -> Result<Self> {
        let authority = Pubkey::new_unique();
        let weth = Pubkey::new_unique();
        let wbtc = Pubkey::new_unique();
        let weth_usd_price_feed = Pubkey::new_unique();
        let wbtc_usd_price_feed = Pubkey::new_unique();

        let clock = ManualClock::new(GENESIS_TIMESTAMP);
        let price_feeds = ManualPriceFeeds::new(clock.clone());
        price_feeds.update_answer(weth_usd_price_feed, ETH_USD_PRICE);
        price_feeds.update_answer(wbtc_usd_price_feed, BTC_USD_PRICE);

        let vault = TokenVault::new(authority);
        let stable_coin = StableCoin::new(authority);

        let params = InitializeEngineParams {
            authority,
            collateral_mints: vec![weth, wbtc],
            price_feeds: vec![weth_usd_price_feed, wbtc_usd_price_feed],
        };
        let engine = DscEngine::initialize(
            params,
            Box::new(price_feeds.clone()),
            Box::new(vault.clone()),
            Box::new(stable_coin.clone()),
            Box::new(clock.clone()),
        )?;

        msg!("Local network deployed: WETH {}, WBTC {}", weth, wbtc);

        Ok(Self {
            engine,
            authority,
            weth,
            wbtc,
            weth_usd_price_feed,
            wbtc_usd_price_feed,
            vault,
            stable_coin,
            price_feeds,
            clock,
        })
    }

    /// Publish a new WETH price stamped now
    pub fn set_eth_price(&self, price: i128) {
        self.price_feeds.update_answer(self.weth_usd_price_feed, price);
    }

    /// Publish a new WBTC price stamped now
    pub fn set_btc_price(&self, price: i128) {
        self.price_feeds.update_answer(self.wbtc_usd_price_feed, price);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PRECISION;

    #[test]
    fn deploys_with_both_collaterals_priced() {
        let network = LocalNetwork::deploy().unwrap();
        let engine = &network.engine;

        assert_eq!(engine.collateral_mints(), vec![network.weth, network.wbtc]);
        assert_eq!(engine.authority(), network.authority);
        // The engine's authority holds the vault and escrows DSC
        assert_eq!(network.vault.holder(), network.authority);
        assert_eq!(network.stable_coin.owner(), network.authority);
        assert_eq!(
            engine.collateral_price_feed(&network.wbtc).unwrap(),
            network.wbtc_usd_price_feed
        );
        assert_eq!(engine.usd_value(&network.weth, PRECISION).unwrap(), 2_000 * PRECISION);
        assert_eq!(engine.usd_value(&network.wbtc, PRECISION).unwrap(), 1_000 * PRECISION);
    }
}
