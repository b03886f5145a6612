//! Fixed-point helpers
//!
//! Amounts, USD values and health factors all carry 18 decimals, so the
//! product of two of them can exceed `u128`. `mul_div` keeps the full
//! 256-bit product and divides it back down, truncating toward zero.

use anchor_lang::prelude::*;

use crate::errors::DscError;

const LOW_MASK: u128 = u64::MAX as u128;

/// Full 256-bit product of two u128 values, returned as (high, low)
fn wide_mul(a: u128, b: u128) -> (u128, u128) {
    let a0 = a & LOW_MASK;
    let a1 = a >> 64;
    let b0 = b & LOW_MASK;
    let b1 = b >> 64;

    let ll = a0 * b0;
    let lh = a0 * b1;
    let hl = a1 * b0;
    let hh = a1 * b1;

    // Carry of the middle 64-bit column, at most 3 * (2^64 - 1)
    let mid = (ll >> 64) + (lh & LOW_MASK) + (hl & LOW_MASK);

    let low = (ll & LOW_MASK) | ((mid & LOW_MASK) << 64);
    let high = hh + (lh >> 64) + (hl >> 64) + (mid >> 64);

    (high, low)
}

/// Computes `a * b / denominator` without intermediate overflow
///
/// Returns `None` when the denominator is zero or the quotient does not
/// fit in a u128.
pub fn checked_mul_div(a: u128, b: u128, denominator: u128) -> Option<u128> {
    if denominator == 0 {
        return None;
    }

    if let Some(product) = a.checked_mul(b) {
        return Some(product / denominator);
    }

    let (high, low) = wide_mul(a, b);

    // Quotient would need more than 128 bits
    if high >= denominator {
        return None;
    }

    // Restoring long division of (high, low) by the denominator
    let mut remainder = high;
    let mut quotient: u128 = 0;
    for bit in (0..128).rev() {
        let carry = remainder >> 127;
        remainder = (remainder << 1) | ((low >> bit) & 1);
        quotient <<= 1;
        if carry == 1 || remainder >= denominator {
            remainder = remainder.wrapping_sub(denominator);
            quotient |= 1;
        }
    }

    Some(quotient)
}

/// `checked_mul_div` mapped onto the engine error
pub fn mul_div(a: u128, b: u128, denominator: u128) -> Result<u128> {
    checked_mul_div(a, b, denominator).ok_or_else(|| error!(DscError::MathOverflow))
}
