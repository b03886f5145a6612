use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use anchor_lang::prelude::*;

use crate::constants::{ADDITIONAL_FEED_PRECISION, PRECISION, STALENESS_TIMEOUT_SECONDS};
use crate::errors::DscError;
use crate::math::mul_div;
use crate::state::CollateralAsset;

/// Latest answer of a price feed
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceQuote {
    /// USD price with 8 decimals
    pub price: i128,

    /// Unix timestamp of the last update
    pub updated_at: i64,
}

/// Source of price quotes, keyed by feed address
pub trait PriceFeeds {
    fn latest_quote(&self, feed: &Pubkey) -> Result<PriceQuote>;
}

/// Source of the current unix time
pub trait UnixClock {
    fn unix_timestamp(&self) -> Result<i64>;
}

/// Reads time from the Clock sysvar
#[derive(Clone, Copy, Debug, Default)]
pub struct SysvarClock;

impl UnixClock for SysvarClock {
    fn unix_timestamp(&self) -> Result<i64> {
        Ok(Clock::get()?.unix_timestamp)
    }
}

/// Settable clock shared between clones
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(unix_timestamp: i64) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(unix_timestamp)),
        }
    }

    pub fn now(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }

    pub fn set(&self, unix_timestamp: i64) {
        self.now.store(unix_timestamp, Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: i64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl UnixClock for ManualClock {
    fn unix_timestamp(&self) -> Result<i64> {
        Ok(self.now())
    }
}

/// Price feeds answered from memory, for local deployments
///
/// Clones share the same quotes, so a handle kept outside the engine can
/// move prices while the engine holds another.
#[derive(Clone, Debug, Default)]
pub struct ManualPriceFeeds {
    quotes: Arc<RwLock<BTreeMap<Pubkey, PriceQuote>>>,
    clock: ManualClock,
}

impl ManualPriceFeeds {
    pub fn new(clock: ManualClock) -> Self {
        Self {
            quotes: Arc::default(),
            clock,
        }
    }

    /// Overwrite a feed with an explicit update time
    pub fn set_quote(&self, feed: Pubkey, price: i128, updated_at: i64) {
        self.quotes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(feed, PriceQuote { price, updated_at });
    }

    /// Publish a new answer stamped with the current clock time
    pub fn update_answer(&self, feed: Pubkey, price: i128) {
        self.set_quote(feed, price, self.clock.now());
    }
}

impl PriceFeeds for ManualPriceFeeds {
    fn latest_quote(&self, feed: &Pubkey) -> Result<PriceQuote> {
        self.quotes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(feed)
            .copied()
            .ok_or_else(|| error!(DscError::PriceFeedNotFound))
    }
}

/// Converts between collateral amounts and USD using fresh quotes only
///
/// Every read checks the quote age against `STALENESS_TIMEOUT_SECONDS`;
/// a stale or non-positive quote aborts the calling operation.
pub struct PriceOracle<'a> {
    feeds: &'a dyn PriceFeeds,
    now: i64,
}

impl<'a> PriceOracle<'a> {
    pub fn new(feeds: &'a dyn PriceFeeds, now: i64) -> Self {
        Self { feeds, now }
    }

    /// Fresh 8-decimal price for an asset
    pub fn fresh_price(&self, asset: &CollateralAsset) -> Result<u128> {
        let quote = self.feeds.latest_quote(&asset.price_feed)?;

        // Quotes stamped ahead of the clock count as brand new
        let age = self.now.saturating_sub(quote.updated_at).max(0);
        if age > STALENESS_TIMEOUT_SECONDS {
            return Err(error!(DscError::StalePrice).with_values((age, STALENESS_TIMEOUT_SECONDS)));
        }

        require!(quote.price > 0, DscError::InvalidPrice);
        u128::try_from(quote.price).map_err(|_| error!(DscError::InvalidPrice))
    }

    /// USD value (18 decimals) of `amount` units of the asset
    ///
    /// usd = price * 1e10 * amount / 1e18
    pub fn usd_value(&self, asset: &CollateralAsset, amount: u128) -> Result<u128> {
        let price = self.scaled_price(asset)?;
        mul_div(price, amount, PRECISION)
    }

    /// Asset amount worth `usd_amount` (18 decimals)
    ///
    /// amount = usd * 1e18 / (price * 1e10)
    pub fn asset_amount_from_usd(&self, asset: &CollateralAsset, usd_amount: u128) -> Result<u128> {
        let price = self.scaled_price(asset)?;
        mul_div(usd_amount, PRECISION, price)
    }

    fn scaled_price(&self, asset: &CollateralAsset) -> Result<u128> {
        self.fresh_price(asset)?
            .checked_mul(ADDITIONAL_FEED_PRECISION)
            .ok_or_else(|| error!(DscError::MathOverflow))
    }
}
