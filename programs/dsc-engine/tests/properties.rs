//! Property tests over random operation sequences
//!
//! Failed operations must leave every balance untouched; successful ones
//! must keep the protocol solvent.

mod common;

use anchor_lang::prelude::*;
use common::*;
use dsc_engine::constants::{FEED_PRECISION, MIN_HEALTH_FACTOR, PRECISION};
use dsc_engine::LocalNetwork;
use proptest::prelude::*;

const USERS: usize = 3;

/// Whole-dollar prices of WETH and WBTC on the local network
const USD_PRICES: [u128; 2] = [2_000, 1_000];

#[derive(Clone, Debug)]
enum Action {
    Deposit { user: usize, asset: usize, amount: u128 },
    Redeem { user: usize, asset: usize, amount: u128 },
    Mint { user: usize, amount: u128 },
    Burn { user: usize, amount: u128 },
    DepositAndMint { user: usize, asset: usize, amount: u128, dsc: u128 },
    RedeemForDsc { user: usize, asset: usize, amount: u128, dsc: u128 },
}

impl Action {
    fn user(&self) -> usize {
        match *self {
            Action::Deposit { user, .. }
            | Action::Redeem { user, .. }
            | Action::Mint { user, .. }
            | Action::Burn { user, .. }
            | Action::DepositAndMint { user, .. }
            | Action::RedeemForDsc { user, .. } => user,
        }
    }
}

fn collateral_amount() -> impl Strategy<Value = u128> {
    prop_oneof![1..=1_000u128, 1..=20 * PRECISION]
}

fn dsc_amount() -> impl Strategy<Value = u128> {
    prop_oneof![1..=1_000u128, 1..=15_000 * PRECISION]
}

fn action() -> impl Strategy<Value = Action> {
    let user = 0..USERS;
    let asset = 0..2usize;
    prop_oneof![
        (user.clone(), asset.clone(), collateral_amount())
            .prop_map(|(user, asset, amount)| Action::Deposit { user, asset, amount }),
        (user.clone(), asset.clone(), collateral_amount())
            .prop_map(|(user, asset, amount)| Action::Redeem { user, asset, amount }),
        (user.clone(), dsc_amount()).prop_map(|(user, amount)| Action::Mint { user, amount }),
        (user.clone(), dsc_amount()).prop_map(|(user, amount)| Action::Burn { user, amount }),
        (user.clone(), asset.clone(), collateral_amount(), dsc_amount()).prop_map(
            |(user, asset, amount, dsc)| Action::DepositAndMint { user, asset, amount, dsc }
        ),
        (user, asset, collateral_amount(), dsc_amount()).prop_map(
            |(user, asset, amount, dsc)| Action::RedeemForDsc { user, asset, amount, dsc }
        ),
    ]
}

fn apply(network: &mut LocalNetwork, users: &[Pubkey], action: &Action) -> Result<()> {
    let mints = [network.weth, network.wbtc];
    let engine = &mut network.engine;
    match *action {
        Action::Deposit { user, asset, amount } => engine.deposit_collateral(users[user], mints[asset], amount),
        Action::Redeem { user, asset, amount } => engine.redeem_collateral(users[user], mints[asset], amount),
        Action::Mint { user, amount } => engine.mint_dsc(users[user], amount),
        Action::Burn { user, amount } => engine.burn_dsc(users[user], amount),
        Action::DepositAndMint { user, asset, amount, dsc } => {
            engine.deposit_collateral_and_mint_dsc(users[user], mints[asset], amount, dsc)
        }
        Action::RedeemForDsc { user, asset, amount, dsc } => {
            engine.redeem_collateral_for_dsc(users[user], mints[asset], amount, dsc)
        }
    }
}

/// Position of one user, kept independently of the engine's health math
struct Position {
    deposits: [u128; 2],
    wallet: [u128; 2],
    debt: u128,
    dsc_wallet: u128,
}

impl Position {
    fn read(network: &LocalNetwork, user: &Pubkey) -> Self {
        let mints = [network.weth, network.wbtc];
        Self {
            deposits: mints.map(|mint| network.engine.collateral_balance(user, &mint)),
            wallet: mints.map(|mint| network.vault.balance(&mint, user)),
            debt: network.engine.dsc_minted(user),
            dsc_wallet: network.stable_coin.balance_of(user),
        }
    }

    /// Debt allowed at a 200% collateral ratio
    fn borrow_limit(&self) -> u128 {
        (self.deposits[0] * USD_PRICES[0] + self.deposits[1] * USD_PRICES[1]) / 2
    }

    fn deposit(&mut self, asset: usize, amount: u128) -> bool {
        if self.wallet[asset] < amount {
            return false;
        }
        self.wallet[asset] -= amount;
        self.deposits[asset] += amount;
        true
    }

    fn redeem(&mut self, asset: usize, amount: u128) -> bool {
        if self.deposits[asset] < amount {
            return false;
        }
        self.deposits[asset] -= amount;
        self.debt <= self.borrow_limit()
    }

    fn mint(&mut self, amount: u128) -> bool {
        self.debt += amount;
        self.debt <= self.borrow_limit()
    }

    fn burn(&mut self, amount: u128) -> bool {
        if self.debt < amount || self.dsc_wallet < amount {
            return false;
        }
        self.debt -= amount;
        self.dsc_wallet -= amount;
        true
    }
}

/// Whether a valid action must succeed, judged from balances alone
fn should_succeed(network: &LocalNetwork, users: &[Pubkey], action: &Action) -> bool {
    let mut position = Position::read(network, &users[action.user()]);
    match *action {
        Action::Deposit { asset, amount, .. } => position.deposit(asset, amount),
        Action::Redeem { asset, amount, .. } => position.redeem(asset, amount),
        Action::Mint { amount, .. } => position.mint(amount),
        Action::Burn { amount, .. } => position.burn(amount),
        Action::DepositAndMint { asset, amount, dsc, .. } => {
            position.deposit(asset, amount) && position.mint(dsc)
        }
        Action::RedeemForDsc { asset, amount, dsc, .. } => {
            position.burn(dsc) && position.redeem(asset, amount)
        }
    }
}

fn assert_protocol_invariants(network: &LocalNetwork, users: &[Pubkey]) {
    let engine = &network.engine;

    for user in users {
        if engine.dsc_minted(user) > 0 {
            assert!(engine.health_factor(user).unwrap() >= MIN_HEALTH_FACTOR);
        }
    }

    // Vault holdings match the ledger, DSC supply matches recorded debt
    let mut custodied_usd: u128 = 0;
    for mint in engine.collateral_mints() {
        let custodied = engine.custodied_balance(&mint);
        assert_eq!(custodied, engine.total_collateral_deposited(&mint));
        custodied_usd += engine.usd_value(&mint, custodied).unwrap();
    }
    let supply = network.stable_coin.total_supply();
    assert_eq!(supply, engine.total_dsc_minted());
    assert!(custodied_usd >= supply);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn operations_keep_protocol_solvent(actions in prop::collection::vec(action(), 1..40)) {
        let mut network = deploy();
        let users: Vec<Pubkey> = (0..USERS).map(|_| funded_user(&network)).collect();

        for action in &actions {
            let acting_user = users[action.user()];
            let before = snapshot(&network, &acting_user);
            let expected = should_succeed(&network, &users, action);

            let result = apply(&mut network, &users, action);
            prop_assert_eq!(result.is_ok(), expected, "{:?} gave {:?}", action, result);
            if result.is_err() {
                prop_assert_eq!(snapshot(&network, &acting_user), before);
            }
            assert_protocol_invariants(&network, &users);
        }
    }

    #[test]
    fn price_round_trip_truncates_within_bound(
        amount in 0..=1_000_000 * PRECISION,
        price in 1..=10_000_000 * FEED_PRECISION,
    ) {
        let network = deploy();
        network.set_eth_price(price as i128);
        let engine = &network.engine;

        let usd = engine.usd_value(&network.weth, amount).unwrap();
        let back = engine.asset_amount_from_usd(&network.weth, usd).unwrap();

        prop_assert!(back <= amount);
        prop_assert!(amount - back <= FEED_PRECISION / price + 1);
    }

    #[test]
    fn price_round_trip_is_monotonic(
        a in 0..=1_000_000 * PRECISION,
        b in 0..=1_000_000 * PRECISION,
        price in 1..=10_000_000 * FEED_PRECISION,
    ) {
        let network = deploy();
        network.set_eth_price(price as i128);
        let engine = &network.engine;
        let (low, high) = if a <= b { (a, b) } else { (b, a) };

        let round_trip = |amount| {
            let usd = engine.usd_value(&network.weth, amount).unwrap();
            engine.asset_amount_from_usd(&network.weth, usd).unwrap()
        };

        prop_assert!(round_trip(low) <= round_trip(high));
    }

    #[test]
    fn successful_liquidation_strictly_improves_health(
        crash_price in 1_100u128..2_000,
        debt_to_cover in prop_oneof![
            1..=1_000u128,
            1..=10_000 * PRECISION,
            (10_000 * PRECISION - 1_000)..=10_000 * PRECISION
        ],
    ) {
        let mut network = deploy();
        let user = funded_user(&network);
        let liquidator = funded_user(&network);
        network
            .engine
            .deposit_collateral_and_mint_dsc(user, network.weth, AMOUNT_COLLATERAL, MAX_MINT_FOR_COLLATERAL)
            .unwrap();
        network
            .engine
            .deposit_collateral_and_mint_dsc(liquidator, network.weth, 100 * PRECISION, MAX_MINT_FOR_COLLATERAL)
            .unwrap();

        network.set_eth_price((crash_price * FEED_PRECISION) as i128);
        let starting = network.engine.health_factor(&user).unwrap();
        let user_before = snapshot(&network, &user);

        match network.engine.liquidate(liquidator, network.weth, user, debt_to_cover) {
            Ok(()) => {
                prop_assert!(network.engine.health_factor(&user).unwrap() > starting);
                prop_assert_eq!(
                    network.engine.dsc_minted(&user),
                    MAX_MINT_FOR_COLLATERAL - debt_to_cover
                );
            }
            Err(_) => prop_assert_eq!(snapshot(&network, &user), user_before),
        }
    }
}
