//! Liquidity share accounting.
//!
//! Converts between liquidity-share tokens and underlying reserve value.
//! The formulas are the standard proportional-stake ones: issuance mints
//! exactly enough shares that the post-issuance share price is
//! unchanged, and retirement redeems a pro-rata slice of the reserves.
//! Both floor, so rounding residue stays with the pool.

use crate::error::{AmmError, Result};

/// Shares to mint for a deposit of `deposit_value` (working-precision
/// units) into a pool currently holding `total_reserve_value` backed by
/// `total_supply` shares.
///
/// For an empty pool (`total_supply == 0`) the bootstrap issuance is
/// `deposit_value × bootstrap_ratio`; afterwards
///
/// ```text
/// minted = ⌊(R + v)·S / R⌋ − S
/// ```
///
/// # Examples
///
/// ```
/// use stableswap_amm::accountant;
///
/// let minted = accountant::issue(10_000, 1_000_000, 10_000_000_000, 10_000)
///     .expect("valid inputs");
/// assert_eq!(minted, 100_000_000);
/// ```
///
/// # Errors
///
/// - [`AmmError::InvalidAmount`] if `deposit_value` is zero, or if a
///   nonzero supply is backed by zero reserve value.
/// - [`AmmError::ArithmeticOverflow`] if the minted amount does not fit
///   in 64 bits.
pub fn issue(
    deposit_value: u64,
    total_reserve_value: u64,
    total_supply: u64,
    bootstrap_ratio: u64,
) -> Result<u64> {
    if deposit_value == 0 {
        return Err(AmmError::InvalidAmount("deposit value must be positive"));
    }

    if total_supply == 0 {
        let minted = deposit_value as u128 * bootstrap_ratio as u128;
        if minted > u64::MAX as u128 {
            return Err(AmmError::ArithmeticOverflow("issue: bootstrap"));
        }
        return Ok(minted as u64);
    }

    if total_reserve_value == 0 {
        return Err(AmmError::InvalidAmount("reserve value must be positive"));
    }

    let grown = total_reserve_value as u128 + deposit_value as u128;
    let minted = grown
        .checked_mul(total_supply as u128)
        .ok_or(AmmError::ArithmeticOverflow("issue: dilution product"))?
        / total_reserve_value as u128
        - total_supply as u128;
    if minted > u64::MAX as u128 {
        return Err(AmmError::ArithmeticOverflow("issue: minted"));
    }
    Ok(minted as u64)
}

/// Reserve value redeemed by retiring `payment` shares out of
/// `total_supply`, against `total_reserve_value`.
///
/// ```text
/// value = ⌊p·R / S⌋
/// ```
///
/// # Examples
///
/// ```
/// use stableswap_amm::accountant;
///
/// let value = accountant::retire(100_000_000, 1_000_000, 10_000_000_000)
///     .expect("valid inputs");
/// assert_eq!(value, 10_000);
/// ```
///
/// # Errors
///
/// - [`AmmError::InvalidAmount`] if any input is zero.
/// - [`AmmError::ArithmeticOverflow`] if the redeemed value does not fit
///   in 64 bits (impossible while `payment ≤ total_supply`).
pub fn retire(payment: u64, total_reserve_value: u64, total_supply: u64) -> Result<u64> {
    if payment == 0 {
        return Err(AmmError::InvalidAmount("payment must be positive"));
    }
    if total_reserve_value == 0 {
        return Err(AmmError::InvalidAmount("reserve value must be positive"));
    }
    if total_supply == 0 {
        return Err(AmmError::InvalidAmount("supply must be positive"));
    }

    let value = payment as u128 * total_reserve_value as u128 / total_supply as u128;
    if value > u64::MAX as u128 {
        return Err(AmmError::ArithmeticOverflow("retire: value"));
    }
    Ok(value as u64)
}
