use anchor_lang::prelude::*;

use crate::events::{EngineEvent, EngineInitialized};
use crate::guard::ReentrancyGuard;
use crate::health::{self, HealthFactorEngine};
use crate::instructions;
use crate::oracle::{PriceFeeds, PriceOracle, UnixClock};
use crate::settlement::Settlement;
use crate::state::{
    CollateralLedger, CollateralPosition, DebtLedger, DebtPosition, InitializeEngineParams,
};
use crate::token::{CollateralCustody, DebtToken};

/// Over-collateralized stablecoin engine
///
/// Owns the collateral and debt ledgers and is the only writer to them.
/// Every state-changing entry point runs under the re-entrancy guard and is
/// atomic: ledgers, token movements and events are either all applied or
/// all discarded.
pub struct DscEngine {
    pub(crate) authority: Pubkey,
    pub(crate) collateral: CollateralLedger,
    pub(crate) debt: DebtLedger,
    pub(crate) price_feeds: Box<dyn PriceFeeds>,
    pub(crate) custody: Box<dyn CollateralCustody>,
    pub(crate) stable_coin: Box<dyn DebtToken>,
    pub(crate) clock: Box<dyn UnixClock>,
    pub(crate) guard: ReentrancyGuard,
    pub(crate) settlement: Settlement,
    pending_events: Vec<EngineEvent>,
    events: Vec<EngineEvent>,
}

impl DscEngine {
    /// Register the accepted collateral and wire up the collaborators
    pub fn initialize(
        params: InitializeEngineParams,
        price_feeds: Box<dyn PriceFeeds>,
        custody: Box<dyn CollateralCustody>,
        stable_coin: Box<dyn DebtToken>,
        clock: Box<dyn UnixClock>,
    ) -> Result<Self> {
        let assets = params.collateral_assets()?;
        let timestamp = clock.unix_timestamp()?;

        let initialized = EngineInitialized {
            authority: params.authority,
            collateral_mints: params.collateral_mints,
            price_feeds: params.price_feeds,
            timestamp,
        };
        let event = EngineEvent::EngineInitialized(initialized);
        event.emit();

        msg!(
            "DSC engine initialized with {} collateral assets, authority {}",
            assets.len(),
            params.authority
        );

        Ok(Self {
            authority: params.authority,
            collateral: CollateralLedger::new(assets),
            debt: DebtLedger::new(),
            price_feeds,
            custody,
            stable_coin,
            clock,
            guard: ReentrancyGuard::new(),
            settlement: Settlement::new(),
            pending_events: Vec::new(),
            events: vec![event],
        })
    }

    // ============================================================================
    // USER OPERATIONS
    // ============================================================================

    /// Deposit collateral into the caller's position
    pub fn deposit_collateral(&mut self, user: Pubkey, collateral_mint: Pubkey, amount: u128) -> Result<()> {
        self.execute(|engine| {
            instructions::user::deposit_collateral::handler(engine, user, collateral_mint, amount)
        })
    }

    /// Withdraw collateral; the caller must stay healthy
    pub fn redeem_collateral(&mut self, user: Pubkey, collateral_mint: Pubkey, amount: u128) -> Result<()> {
        self.execute(|engine| {
            instructions::user::redeem_collateral::handler(engine, user, collateral_mint, amount)
        })
    }

    /// Mint DSC against deposited collateral; the caller must stay healthy
    pub fn mint_dsc(&mut self, user: Pubkey, amount: u128) -> Result<()> {
        self.execute(|engine| instructions::user::mint_dsc::handler(engine, user, amount))
    }

    /// Repay DSC debt with the caller's own tokens
    pub fn burn_dsc(&mut self, user: Pubkey, amount: u128) -> Result<()> {
        self.execute(|engine| instructions::user::burn_dsc::handler(engine, user, amount))
    }

    /// Deposit collateral and mint DSC in one atomic step
    pub fn deposit_collateral_and_mint_dsc(
        &mut self,
        user: Pubkey,
        collateral_mint: Pubkey,
        collateral_amount: u128,
        dsc_amount: u128,
    ) -> Result<()> {
        self.execute(|engine| {
            instructions::user::deposit_collateral::handler(engine, user, collateral_mint, collateral_amount)?;
            instructions::user::mint_dsc::handler(engine, user, dsc_amount)
        })
    }

    /// Burn DSC and withdraw collateral in one atomic step
    ///
    /// Debt is burned first so the health check after the withdrawal sees
    /// the reduced debt.
    pub fn redeem_collateral_for_dsc(
        &mut self,
        user: Pubkey,
        collateral_mint: Pubkey,
        collateral_amount: u128,
        dsc_amount: u128,
    ) -> Result<()> {
        self.execute(|engine| {
            instructions::user::burn_dsc::handler(engine, user, dsc_amount)?;
            instructions::user::redeem_collateral::handler(engine, user, collateral_mint, collateral_amount)
        })
    }

    // ============================================================================
    // PERMISSIONLESS OPERATIONS
    // ============================================================================

    /// Repay part of an unhealthy user's debt in exchange for their
    /// collateral plus a bonus
    pub fn liquidate(
        &mut self,
        liquidator: Pubkey,
        collateral_mint: Pubkey,
        user: Pubkey,
        debt_to_cover: u128,
    ) -> Result<()> {
        self.execute(|engine| {
            instructions::permissionless::liquidate::handler(
                engine,
                liquidator,
                collateral_mint,
                user,
                debt_to_cover,
            )
        })
    }

    // ============================================================================
    // QUERIES
    // ============================================================================

    pub fn health_factor(&self, user: &Pubkey) -> Result<u128> {
        self.health()?.health_factor(user)
    }

    pub fn collateral_value_usd(&self, user: &Pubkey) -> Result<u128> {
        self.health()?.collateral_value_usd(user)
    }

    /// USD value (18 decimals) of `amount` of a collateral mint
    pub fn usd_value(&self, collateral_mint: &Pubkey, amount: u128) -> Result<u128> {
        let asset = self.collateral.asset(collateral_mint)?;
        self.oracle()?.usd_value(asset, amount)
    }

    /// Amount of a collateral mint worth `usd_amount` (18 decimals)
    pub fn asset_amount_from_usd(&self, collateral_mint: &Pubkey, usd_amount: u128) -> Result<u128> {
        let asset = self.collateral.asset(collateral_mint)?;
        self.oracle()?.asset_amount_from_usd(asset, usd_amount)
    }

    /// (DSC minted, collateral value in USD)
    pub fn account_information(&self, user: &Pubkey) -> Result<(u128, u128)> {
        self.health()?.account_information(user)
    }

    pub fn collateral_balance(&self, user: &Pubkey, collateral_mint: &Pubkey) -> u128 {
        self.collateral.balance_of(user, collateral_mint)
    }

    /// Accepted collateral mints in registration order
    pub fn collateral_mints(&self) -> Vec<Pubkey> {
        self.collateral.assets().iter().map(|asset| asset.mint).collect()
    }

    pub fn calculate_health_factor(&self, total_dsc_minted: u128, collateral_value_usd: u128) -> Result<u128> {
        health::calculate_health_factor(total_dsc_minted, collateral_value_usd)
    }

    pub fn dsc_minted(&self, user: &Pubkey) -> u128 {
        self.debt.debt_of(user)
    }

    /// DSC outstanding across every user
    pub fn total_dsc_minted(&self) -> u128 {
        self.debt.total_debt()
    }

    pub fn debt_position(&self, user: &Pubkey) -> DebtPosition {
        self.debt.position_of(user)
    }

    pub fn collateral_price_feed(&self, collateral_mint: &Pubkey) -> Result<Pubkey> {
        Ok(self.collateral.asset(collateral_mint)?.price_feed)
    }

    pub fn collateral_positions(&self, user: &Pubkey) -> Vec<CollateralPosition> {
        self.collateral.positions_of(user)
    }

    /// Ledger total of a mint across every user
    pub fn total_collateral_deposited(&self, collateral_mint: &Pubkey) -> u128 {
        self.collateral.total_deposited(collateral_mint)
    }

    /// Collateral the custody collaborator actually holds for the engine
    pub fn custodied_balance(&self, collateral_mint: &Pubkey) -> u128 {
        self.custody.balance_of(collateral_mint, &self.authority)
    }

    pub fn authority(&self) -> Pubkey {
        self.authority
    }

    /// Handle on the in-progress flag, for collaborators that must refuse
    /// to call back into a running operation
    pub fn reentrancy_guard(&self) -> ReentrancyGuard {
        self.guard.clone()
    }

    /// Events of committed operations, oldest first
    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    // ============================================================================
    // INTERNALS
    // ============================================================================

    /// Run one operation atomically under the re-entrancy guard
    fn execute<T>(&mut self, operation: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let _token = self.guard.enter()?;

        let collateral_checkpoint = self.collateral.checkpoint();
        let debt_checkpoint = self.debt.checkpoint();
        self.settlement.clear();
        self.pending_events.clear();

        let outcome = match operation(self) {
            Ok(value) => self
                .settlement
                .execute(self.custody.as_mut(), self.stable_coin.as_mut())
                .map(|()| value),
            Err(error) => Err(error),
        };

        match outcome {
            Ok(value) => {
                self.collateral.commit();
                self.debt.commit();
                for event in self.pending_events.drain(..) {
                    event.emit();
                    self.events.push(event);
                }
                Ok(value)
            }
            Err(error) => {
                self.collateral.rollback(collateral_checkpoint);
                self.debt.rollback(debt_checkpoint);
                self.settlement.clear();
                self.pending_events.clear();
                msg!("Operation rolled back: {}", error);
                Err(error)
            }
        }
    }

    pub(crate) fn now(&self) -> Result<i64> {
        self.clock.unix_timestamp()
    }

    pub(crate) fn oracle(&self) -> Result<PriceOracle<'_>> {
        Ok(PriceOracle::new(self.price_feeds.as_ref(), self.now()?))
    }

    pub(crate) fn health(&self) -> Result<HealthFactorEngine<'_>> {
        Ok(HealthFactorEngine::new(&self.collateral, &self.debt, self.oracle()?))
    }

    /// Stage an event for emission if the running operation commits
    pub(crate) fn record(&mut self, event: EngineEvent) {
        self.pending_events.push(event);
    }
}

impl std::fmt::Debug for DscEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DscEngine")
            .field("authority", &self.authority)
            .field("collateral", &self.collateral)
            .field("debt", &self.debt)
            .field("events", &self.events.len())
            .finish_non_exhaustive()
    }
}
