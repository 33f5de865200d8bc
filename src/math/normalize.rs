//! Lossless conversion of amounts between decimal precisions.
//!
//! Cross-asset arithmetic in the engine always runs at the *working
//! precision* — the larger of the two assets' precisions — and converts
//! back only at the output boundary. Scaling up is checked; scaling down
//! truncates toward zero, deliberately: any fractional remainder is
//! dropped in the pool's favour, never the trader's.

use crate::domain::{Amount, Precision};
use crate::error::{AmmError, Result};

/// Returns the working precision for combining two assets: the larger
/// of the two precisions.
#[must_use]
pub const fn working_precision(a: Precision, b: Precision) -> Precision {
    Precision::max_of(a, b)
}

/// Scales `amount` from `from` decimals up to `to` decimals.
///
/// Multiplies by `10^(to − from)`, checked: the scaled value must
/// round-trip through [`normalize_down`] unchanged, which for a
/// power-of-ten multiply is exactly the no-overflow condition.
///
/// # Errors
///
/// - [`AmmError::InvalidPrecision`] if `to < from`.
/// - [`AmmError::ArithmeticOverflow`] if the scaled value exceeds `u64`.
pub const fn normalize_up(amount: Amount, from: Precision, to: Precision) -> Result<Amount> {
    if to.get() < from.get() {
        return Err(AmmError::InvalidPrecision(
            "normalize_up requires to >= from",
        ));
    }
    let factor = 10u64.pow((to.get() - from.get()) as u32);
    match amount.get().checked_mul(factor) {
        Some(scaled) => Ok(Amount::new(scaled)),
        None => Err(AmmError::ArithmeticOverflow("normalize_up")),
    }
}

/// Scales `amount` from `from` decimals down to `to` decimals.
///
/// True integer division by `10^(from − to)`; the remainder is
/// permanently dropped.
///
/// # Errors
///
/// Returns [`AmmError::InvalidPrecision`] if `to > from`.
pub const fn normalize_down(amount: Amount, from: Precision, to: Precision) -> Result<Amount> {
    if to.get() > from.get() {
        return Err(AmmError::InvalidPrecision(
            "normalize_down requires to <= from",
        ));
    }
    let factor = 10u64.pow((from.get() - to.get()) as u32);
    Ok(Amount::new(amount.get() / factor))
}
