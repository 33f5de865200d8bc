//! A typed quantity of one asset.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Amount, Precision, SymbolCode};
use crate::error::AmmError;

/// An amount of a specific asset: raw units, symbol, and precision.
///
/// Two assets are the *same unit* when both symbol and precision match;
/// arithmetic between differing units is rejected with
/// [`AmmError::ReserveMismatch`] rather than silently coerced. Conversion
/// between precisions is the normalizer's job
/// ([`math::normalize`](crate::math::normalize)), never `Asset`'s.
///
/// # Examples
///
/// ```
/// use stableswap_amm::domain::{Amount, Asset, Precision, SymbolCode};
///
/// let usdt = SymbolCode::new("USDT").expect("valid");
/// let p4 = Precision::new(4).expect("valid");
/// let a = Asset::new(Amount::new(1_000_000), usdt, p4);
/// assert_eq!(a.to_string(), "100.0000 USDT");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    amount: Amount,
    symbol: SymbolCode,
    precision: Precision,
}

impl Asset {
    /// Creates a new asset quantity.
    #[must_use]
    pub const fn new(amount: Amount, symbol: SymbolCode, precision: Precision) -> Self {
        Self {
            amount,
            symbol,
            precision,
        }
    }

    /// Creates a zero quantity of the given unit.
    #[must_use]
    pub const fn zero(symbol: SymbolCode, precision: Precision) -> Self {
        Self::new(Amount::ZERO, symbol, precision)
    }

    /// Returns the raw amount.
    #[must_use]
    pub const fn amount(&self) -> Amount {
        self.amount
    }

    /// Returns the symbol code.
    #[must_use]
    pub const fn symbol(&self) -> SymbolCode {
        self.symbol
    }

    /// Returns the decimal precision.
    #[must_use]
    pub const fn precision(&self) -> Precision {
        self.precision
    }

    /// Returns `true` if the raw amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns `true` if `other` denominates the same unit
    /// (symbol and precision both match).
    #[must_use]
    pub const fn same_unit(&self, other: &Self) -> bool {
        self.symbol.raw() == other.symbol.raw() && self.precision.get() == other.precision.get()
    }

    /// Returns a copy with a different raw amount, same unit.
    #[must_use]
    pub const fn with_amount(&self, amount: Amount) -> Self {
        Self::new(amount, self.symbol, self.precision)
    }

    /// Checked addition of a same-unit quantity.
    ///
    /// # Errors
    ///
    /// - [`AmmError::ReserveMismatch`] if the units differ.
    /// - [`AmmError::ArithmeticOverflow`] on overflow.
    pub fn checked_add(&self, other: &Self) -> Result<Self, AmmError> {
        if !self.same_unit(other) {
            return Err(AmmError::ReserveMismatch("asset add: unit mismatch"));
        }
        let amount = self
            .amount
            .checked_add(&other.amount)
            .ok_or(AmmError::ArithmeticOverflow("asset add"))?;
        Ok(self.with_amount(amount))
    }

    /// Checked subtraction of a same-unit quantity.
    ///
    /// # Errors
    ///
    /// - [`AmmError::ReserveMismatch`] if the units differ.
    /// - [`AmmError::ArithmeticOverflow`] on underflow.
    pub fn checked_sub(&self, other: &Self) -> Result<Self, AmmError> {
        if !self.same_unit(other) {
            return Err(AmmError::ReserveMismatch("asset sub: unit mismatch"));
        }
        let amount = self
            .amount
            .checked_sub(&other.amount)
            .ok_or(AmmError::ArithmeticOverflow("asset sub"))?;
        Ok(self.with_amount(amount))
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let factor = self.precision.factor();
        let whole = self.amount.get() / factor;
        let frac = self.amount.get() % factor;
        if self.precision.get() == 0 {
            write!(f, "{whole} {}", self.symbol)
        } else {
            write!(
                f,
                "{whole}.{frac:0width$} {}",
                self.symbol,
                width = self.precision.get() as usize
            )
        }
    }
}
