//! Decimal precision of an asset.

use serde::{Deserialize, Serialize};

use crate::error::AmmError;

/// Global cap on decimal places.
///
/// All cross-asset arithmetic is performed at the larger of the two
/// operands' precisions, so the cap bounds the scale factor any amount
/// can be multiplied by (`10^9`).
const MAX_PRECISION: u8 = 9;

/// The number of decimal places of an asset amount.
///
/// Valid range is `0..=9`. Construction is validated; values above the
/// cap are rejected so the working-precision scale factor always fits
/// comfortably in 64 bits.
///
/// # Examples
///
/// ```
/// use stableswap_amm::domain::Precision;
///
/// let p = Precision::new(4).expect("4 is valid");
/// assert_eq!(p.get(), 4);
/// assert_eq!(p.factor(), 10_000);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Precision(u8);

impl Precision {
    /// Zero decimal places.
    pub const ZERO: Self = Self(0);

    /// Maximum supported decimal places.
    pub const MAX: Self = Self(MAX_PRECISION);

    /// Creates a new `Precision` after validating the range.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidPrecision`] if `value` exceeds 9.
    pub const fn new(value: u8) -> Result<Self, AmmError> {
        if value > MAX_PRECISION {
            return Err(AmmError::InvalidPrecision("precision must be 0..=9"));
        }
        Ok(Self(value))
    }

    /// Returns the raw decimal count.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Returns `10^precision`.
    #[must_use]
    pub const fn factor(&self) -> u64 {
        10u64.pow(self.0 as u32)
    }

    /// Returns the larger of two precisions — the working precision for
    /// arithmetic combining amounts of both.
    #[must_use]
    pub const fn max_of(a: Self, b: Self) -> Self {
        if a.0 >= b.0 {
            a
        } else {
            b
        }
    }
}
