#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anchor_lang::prelude::*;
use dsc_engine::constants::PRECISION;
use dsc_engine::{
    CollateralCustody, DscEngine, DscError, InitializeEngineParams, LocalNetwork, TokenVault,
};

/// Collateral each fresh user is funded with, per asset
pub const STARTING_BALANCE: u128 = 100 * PRECISION;

pub const AMOUNT_COLLATERAL: u128 = 10 * PRECISION;

/// 10 WETH at $2,000 backs exactly this much DSC
pub const MAX_MINT_FOR_COLLATERAL: u128 = 10_000 * PRECISION;

pub fn err(code: DscError) -> anchor_lang::error::Error {
    code.into()
}

pub fn deploy() -> LocalNetwork {
    LocalNetwork::deploy().unwrap()
}

/// New user holding `STARTING_BALANCE` of both collaterals
pub fn funded_user(network: &LocalNetwork) -> Pubkey {
    let user = Pubkey::new_unique();
    network.vault.fund(&network.weth, &user, STARTING_BALANCE);
    network.vault.fund(&network.wbtc, &user, STARTING_BALANCE);
    user
}

/// Every balance an operation may touch for one user
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub weth_deposit: u128,
    pub wbtc_deposit: u128,
    pub dsc_minted: u128,
    pub weth_wallet: u128,
    pub wbtc_wallet: u128,
    pub dsc_wallet: u128,
    pub weth_custodied: u128,
    pub wbtc_custodied: u128,
    pub dsc_supply: u128,
    pub events: usize,
}

pub fn snapshot(network: &LocalNetwork, user: &Pubkey) -> Snapshot {
    let engine = &network.engine;
    Snapshot {
        weth_deposit: engine.collateral_balance(user, &network.weth),
        wbtc_deposit: engine.collateral_balance(user, &network.wbtc),
        dsc_minted: engine.dsc_minted(user),
        weth_wallet: network.vault.balance(&network.weth, user),
        wbtc_wallet: network.vault.balance(&network.wbtc, user),
        dsc_wallet: network.stable_coin.balance_of(user),
        weth_custodied: engine.custodied_balance(&network.weth),
        wbtc_custodied: engine.custodied_balance(&network.wbtc),
        dsc_supply: network.stable_coin.total_supply(),
        events: engine.events().len(),
    }
}

/// Vault whose payouts can be switched off
pub struct FlakyVault {
    vault: TokenVault,
    refuse_payouts: Arc<AtomicBool>,
}

impl CollateralCustody for FlakyVault {
    fn transfer_in(&mut self, mint: &Pubkey, from: &Pubkey, amount: u128) -> bool {
        self.vault.transfer_in(mint, from, amount)
    }

    fn transfer_out(&mut self, mint: &Pubkey, to: &Pubkey, amount: u128) -> bool {
        if self.refuse_payouts.load(Ordering::SeqCst) {
            return false;
        }
        self.vault.transfer_out(mint, to, amount)
    }

    fn balance_of(&self, mint: &Pubkey, holder: &Pubkey) -> u128 {
        self.vault.balance_of(mint, holder)
    }
}

/// Local network whose engine pays out through a `FlakyVault`
///
/// The returned flag refuses every payout while set.
pub fn deploy_with_flaky_vault() -> (LocalNetwork, Arc<AtomicBool>) {
    let mut network = deploy();
    let refuse_payouts = Arc::new(AtomicBool::new(false));
    let custody = FlakyVault {
        vault: network.vault.clone(),
        refuse_payouts: Arc::clone(&refuse_payouts),
    };

    network.engine = DscEngine::initialize(
        InitializeEngineParams {
            authority: network.authority,
            collateral_mints: vec![network.weth, network.wbtc],
            price_feeds: vec![network.weth_usd_price_feed, network.wbtc_usd_price_feed],
        },
        Box::new(network.price_feeds.clone()),
        Box::new(custody),
        Box::new(network.stable_coin.clone()),
        Box::new(network.clock.clone()),
    )
    .unwrap();

    (network, refuse_payouts)
}
