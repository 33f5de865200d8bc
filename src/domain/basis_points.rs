//! Basis-point fee rates.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Amount, Rounding};
use crate::error::AmmError;

/// Basis points representing 100%.
const MAX_BPS: u32 = 10_000;

/// A rate expressed in basis points (1 bp = 0.01%, 10 000 bp = 100%).
///
/// # Examples
///
/// ```
/// use stableswap_amm::domain::{Amount, BasisPoints, Rounding};
///
/// let fee = BasisPoints::new(4);
/// let charged = fee.apply(Amount::new(1_000_000), Rounding::Down).expect("no overflow");
/// assert_eq!(charged, Amount::new(400));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BasisPoints(u32);

impl BasisPoints {
    /// Zero basis points (0%).
    pub const ZERO: Self = Self(0);

    /// 100% expressed in basis points.
    pub const MAX_PERCENT: Self = Self(MAX_BPS);

    /// Creates a new `BasisPoints` from a raw `u32` value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the underlying `u32` value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns `true` if the value is a valid percentage (`0..=10_000`).
    #[must_use]
    pub const fn is_valid_percent(&self) -> bool {
        self.0 <= MAX_BPS
    }

    /// Computes `amount × self / 10_000` with explicit rounding.
    ///
    /// The intermediate product is taken in `u128`, so the only failure
    /// mode is the result not fitting back into 64 bits.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::ArithmeticOverflow`] if the scaled result
    /// exceeds `u64::MAX` (only possible for rates above 100%).
    pub const fn apply(&self, amount: Amount, rounding: Rounding) -> Result<Amount, AmmError> {
        let product = amount.widened() * self.0 as u128;
        let divisor = MAX_BPS as u128;
        let scaled = match rounding {
            Rounding::Down => product / divisor,
            Rounding::Up => (product + divisor - 1) / divisor,
        };
        if scaled > u64::MAX as u128 {
            return Err(AmmError::ArithmeticOverflow("basis points apply"));
        }
        Ok(Amount::new(scaled as u64))
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn new_and_get() {
        assert_eq!(BasisPoints::new(30).get(), 30);
    }

    #[test]
    fn constants() {
        assert_eq!(BasisPoints::ZERO.get(), 0);
        assert_eq!(BasisPoints::MAX_PERCENT.get(), 10_000);
    }

    #[test]
    fn is_valid_percent_bounds() {
        assert!(BasisPoints::ZERO.is_valid_percent());
        assert!(BasisPoints::MAX_PERCENT.is_valid_percent());
        assert!(!BasisPoints::new(10_001).is_valid_percent());
    }

    // -- apply --------------------------------------------------------------

    #[test]
    fn apply_round_down() {
        let Ok(fee) = BasisPoints::new(30).apply(Amount::new(1_000_000), Rounding::Down) else {
            panic!("expected Ok");
        };
        assert_eq!(fee, Amount::new(3_000));
    }

    #[test]
    fn apply_truncates_dust() {
        // 30bp of 1 = 0.003 → floor 0, ceil 1
        let Ok(down) = BasisPoints::new(30).apply(Amount::new(1), Rounding::Down) else {
            panic!("expected Ok");
        };
        let Ok(up) = BasisPoints::new(30).apply(Amount::new(1), Rounding::Up) else {
            panic!("expected Ok");
        };
        assert_eq!(down, Amount::ZERO);
        assert_eq!(up, Amount::new(1));
    }

    #[test]
    fn apply_full_percent_is_identity() {
        let Ok(all) = BasisPoints::MAX_PERCENT.apply(Amount::new(1_234), Rounding::Down) else {
            panic!("expected Ok");
        };
        assert_eq!(all, Amount::new(1_234));
    }

    #[test]
    fn apply_zero_rate() {
        let Ok(none) = BasisPoints::ZERO.apply(Amount::new(1_000_000), Rounding::Down) else {
            panic!("expected Ok");
        };
        assert_eq!(none, Amount::ZERO);
    }

    #[test]
    fn apply_overflow_above_full_percent() {
        let result = BasisPoints::new(u32::MAX).apply(Amount::MAX, Rounding::Down);
        assert!(matches!(result, Err(AmmError::ArithmeticOverflow(_))));
    }

    #[test]
    fn apply_max_amount_full_percent_fits() {
        let Ok(all) = BasisPoints::MAX_PERCENT.apply(Amount::MAX, Rounding::Down) else {
            panic!("expected Ok");
        };
        assert_eq!(all, Amount::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", BasisPoints::new(4)), "4bp");
    }
}
