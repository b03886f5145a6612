use anchor_lang::prelude::*;

use crate::constants::{
    LIQUIDATION_PRECISION,
    LIQUIDATION_THRESHOLD,
    MAX_HEALTH_FACTOR,
    MIN_HEALTH_FACTOR,
    PRECISION,
};
use crate::errors::DscError;
use crate::math::{checked_mul_div, mul_div};
use crate::oracle::PriceOracle;
use crate::state::{CollateralLedger, DebtLedger};

/// Health factor for a debt and a collateral value (18 decimals)
///
/// Formula: Health = (collateral_usd * LIQUIDATION_THRESHOLD / LIQUIDATION_PRECISION) * 1e18 / debt
///
/// Returns:
/// - MAX_HEALTH_FACTOR = No debt (infinite health), or a ratio too large for u128
/// - >= 1e18 = Healthy
/// - < 1e18 = Liquidatable
pub fn calculate_health_factor(total_dsc_minted: u128, collateral_value_usd: u128) -> Result<u128> {
    if total_dsc_minted == 0 {
        return Ok(MAX_HEALTH_FACTOR);
    }

    let collateral_adjusted_for_threshold =
        mul_div(collateral_value_usd, LIQUIDATION_THRESHOLD, LIQUIDATION_PRECISION)?;
    Ok(checked_mul_div(collateral_adjusted_for_threshold, PRECISION, total_dsc_minted)
        .unwrap_or(MAX_HEALTH_FACTOR))
}

/// Solvency view over both ledgers, priced by a fresh oracle
pub struct HealthFactorEngine<'a> {
    collateral: &'a CollateralLedger,
    debt: &'a DebtLedger,
    oracle: PriceOracle<'a>,
}

impl<'a> HealthFactorEngine<'a> {
    pub fn new(collateral: &'a CollateralLedger, debt: &'a DebtLedger, oracle: PriceOracle<'a>) -> Self {
        Self {
            collateral,
            debt,
            oracle,
        }
    }

    pub fn oracle(&self) -> &PriceOracle<'a> {
        &self.oracle
    }

    pub fn collateral_value_usd(&self, user: &Pubkey) -> Result<u128> {
        self.collateral.total_value_usd(user, &self.oracle)
    }

    /// (DSC minted, collateral value in USD)
    pub fn account_information(&self, user: &Pubkey) -> Result<(u128, u128)> {
        let total_dsc_minted = self.debt.debt_of(user);
        let collateral_value_usd = self.collateral_value_usd(user)?;
        Ok((total_dsc_minted, collateral_value_usd))
    }

    /// Current health factor; a user without debt never reads a price
    pub fn health_factor(&self, user: &Pubkey) -> Result<u128> {
        let total_dsc_minted = self.debt.debt_of(user);
        if total_dsc_minted == 0 {
            return Ok(MAX_HEALTH_FACTOR);
        }

        let collateral_value_usd = self.collateral_value_usd(user)?;
        calculate_health_factor(total_dsc_minted, collateral_value_usd)
    }

    /// Fails with `HealthFactorBroken` carrying (ratio, minimum) when below 1.0
    pub fn assert_healthy(&self, user: &Pubkey) -> Result<()> {
        let health_factor = self.health_factor(user)?;
        if health_factor < MIN_HEALTH_FACTOR {
            return Err(error!(DscError::HealthFactorBroken).with_values((health_factor, MIN_HEALTH_FACTOR)));
        }
        Ok(())
    }
}
