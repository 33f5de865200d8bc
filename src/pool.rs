//! The authoritative per-pool record.
//!
//! A [`Pool`] holds an ordered pair of reserves, the outstanding
//! liquidity-share supply, the current amplifier, and derived trading
//! metrics. All mutation goes through the transition functions in
//! [`ledger`](crate::ledger) — nothing else in the crate writes these
//! fields — so the conservation invariants are enforced at one choke
//! point.
//!
//! Derived metrics (`virtual_price`, `price0_last`, `price1_last`) are
//! `f64` by design: they are externally observed read-outs, never inputs
//! to the solved amounts.

use serde::{Deserialize, Serialize};

use crate::domain::{Amount, Asset, Precision, SymbolCode, Timestamp};
use crate::error::{AmmError, Result};
use crate::math::normalize;

/// Decimal precision of liquidity-share assets.
///
/// Shares are always issued at four decimals; the bootstrap issuance
/// ratio is `10^4` accordingly, so an initial share prices one
/// working-precision unit at `10⁻⁴` shares.
pub const SHARE_PRECISION: Precision = match Precision::new(4) {
    Ok(p) => p,
    Err(_) => panic!("share precision is within bounds"),
};

/// One side of a pool's reserve pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// The `reserve0` side.
    Zero,
    /// The `reserve1` side.
    One,
}

impl Side {
    /// Returns the opposite side.
    #[must_use]
    pub const fn other(&self) -> Self {
        match self {
            Self::Zero => Self::One,
            Self::One => Self::Zero,
        }
    }
}

/// One liquidity pool for an ordered pair of reserve assets.
///
/// Created empty — reserves and share supply start at zero and a pool
/// holds reserves exactly when shares are outstanding. The pool id is
/// also the symbol of its liquidity-share asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub(crate) id: SymbolCode,
    pub(crate) reserve0: Asset,
    pub(crate) reserve1: Asset,
    pub(crate) liquidity: Asset,
    pub(crate) amplifier: u64,
    pub(crate) virtual_price: f64,
    pub(crate) price0_last: f64,
    pub(crate) price1_last: f64,
    pub(crate) volume0: Amount,
    pub(crate) volume1: Amount,
    pub(crate) trade_count: u64,
    pub(crate) last_updated: Timestamp,
}

impl Pool {
    /// Creates an empty pool for the given reserve pair.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidSymbol`] if the reserve symbols are equal,
    ///   or if the pool id collides with either reserve symbol.
    /// - [`AmmError::InvalidAmplifier`] if `amplifier` is zero.
    pub fn new(
        id: SymbolCode,
        symbol0: SymbolCode,
        precision0: Precision,
        symbol1: SymbolCode,
        precision1: Precision,
        amplifier: u64,
        now: Timestamp,
    ) -> Result<Self> {
        if symbol0 == symbol1 {
            return Err(AmmError::InvalidSymbol("reserve symbols must differ"));
        }
        if id == symbol0 || id == symbol1 {
            return Err(AmmError::InvalidSymbol(
                "pool id must differ from reserve symbols",
            ));
        }
        if amplifier == 0 {
            return Err(AmmError::InvalidAmplifier);
        }
        Ok(Self {
            id,
            reserve0: Asset::zero(symbol0, precision0),
            reserve1: Asset::zero(symbol1, precision1),
            liquidity: Asset::zero(id, SHARE_PRECISION),
            amplifier,
            virtual_price: 0.0,
            price0_last: 0.0,
            price1_last: 0.0,
            volume0: Amount::ZERO,
            volume1: Amount::ZERO,
            trade_count: 0,
            last_updated: now,
        })
    }

    /// Returns the pool identifier.
    #[must_use]
    pub const fn id(&self) -> SymbolCode {
        self.id
    }

    /// Returns the side-0 reserve.
    #[must_use]
    pub const fn reserve0(&self) -> &Asset {
        &self.reserve0
    }

    /// Returns the side-1 reserve.
    #[must_use]
    pub const fn reserve1(&self) -> &Asset {
        &self.reserve1
    }

    /// Returns the outstanding liquidity-share supply.
    #[must_use]
    pub const fn liquidity(&self) -> &Asset {
        &self.liquidity
    }

    /// Returns the stored (un-ramped) amplifier.
    #[must_use]
    pub const fn amplifier(&self) -> u64 {
        self.amplifier
    }

    /// Normalized reserve value per outstanding share.
    #[must_use]
    pub const fn virtual_price(&self) -> f64 {
        self.virtual_price
    }

    /// Most recent trade price selling side 0.
    #[must_use]
    pub const fn price0_last(&self) -> f64 {
        self.price0_last
    }

    /// Most recent trade price selling side 1.
    #[must_use]
    pub const fn price1_last(&self) -> f64 {
        self.price1_last
    }

    /// Cumulative input volume on side 0, in native units.
    #[must_use]
    pub const fn volume0(&self) -> Amount {
        self.volume0
    }

    /// Cumulative input volume on side 1, in native units.
    #[must_use]
    pub const fn volume1(&self) -> Amount {
        self.volume1
    }

    /// Number of swaps executed against this pool.
    #[must_use]
    pub const fn trade_count(&self) -> u64 {
        self.trade_count
    }

    /// Timestamp of the last reserve-mutating transition.
    #[must_use]
    pub const fn last_updated(&self) -> Timestamp {
        self.last_updated
    }

    /// Returns `true` while no shares are outstanding.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.liquidity.is_zero()
    }

    /// Returns which side `symbol` sits on, if either.
    #[must_use]
    pub fn side_of(&self, symbol: SymbolCode) -> Option<Side> {
        if symbol == self.reserve0.symbol() {
            Some(Side::Zero)
        } else if symbol == self.reserve1.symbol() {
            Some(Side::One)
        } else {
            None
        }
    }

    /// Returns the reserve on the given side.
    #[must_use]
    pub const fn reserve(&self, side: Side) -> &Asset {
        match side {
            Side::Zero => &self.reserve0,
            Side::One => &self.reserve1,
        }
    }

    /// Returns `(reserve_in, reserve_out)` for a trade entering on
    /// `side_in`.
    #[must_use]
    pub const fn oriented(&self, side_in: Side) -> (&Asset, &Asset) {
        match side_in {
            Side::Zero => (&self.reserve0, &self.reserve1),
            Side::One => (&self.reserve1, &self.reserve0),
        }
    }

    /// The working precision for this pool's cross-asset arithmetic.
    #[must_use]
    pub fn working_precision(&self) -> Precision {
        normalize::working_precision(self.reserve0.precision(), self.reserve1.precision())
    }

    /// Both reserves normalized to the working precision.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::ArithmeticOverflow`] if a reserve cannot be
    /// represented at the working precision.
    pub fn normalized_reserves(&self) -> Result<(Amount, Amount)> {
        let wp = self.working_precision();
        let r0 = normalize::normalize_up(self.reserve0.amount(), self.reserve0.precision(), wp)?;
        let r1 = normalize::normalize_up(self.reserve1.amount(), self.reserve1.precision(), wp)?;
        Ok((r0, r1))
    }

    /// Recomputes `virtual_price` from current reserves and supply.
    ///
    /// Called by every reserve-mutating transition after the reserve
    /// triple has been committed.
    pub(crate) fn refresh_virtual_price(&mut self) -> Result<()> {
        if self.liquidity.is_zero() {
            self.virtual_price = 0.0;
            return Ok(());
        }
        let (r0, r1) = self.normalized_reserves()?;
        let total = r0
            .checked_add(&r1)
            .ok_or(AmmError::ArithmeticOverflow("virtual price: reserve sum"))?;
        #[allow(clippy::cast_precision_loss)]
        {
            self.virtual_price = total.get() as f64 / self.liquidity.amount().get() as f64;
        }
        Ok(())
    }
}

/// Per-depositor, per-pool accumulator of contributed reserve assets
/// not yet converted into liquidity shares.
///
/// Depositors contribute one asset side at a time; the accumulator must
/// hold a nonzero amount of *both* sides before it can be finalized.
/// Cancelling refunds both sides in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingDeposit {
    pub(crate) amount0: Asset,
    pub(crate) amount1: Asset,
}

impl PendingDeposit {
    /// Creates an empty accumulator matching `pool`'s reserve units.
    #[must_use]
    pub fn new(pool: &Pool) -> Self {
        Self {
            amount0: Asset::zero(pool.reserve0.symbol(), pool.reserve0.precision()),
            amount1: Asset::zero(pool.reserve1.symbol(), pool.reserve1.precision()),
        }
    }

    /// Returns the accumulated side-0 contribution.
    #[must_use]
    pub const fn amount0(&self) -> &Asset {
        &self.amount0
    }

    /// Returns the accumulated side-1 contribution.
    #[must_use]
    pub const fn amount1(&self) -> &Asset {
        &self.amount1
    }

    /// Adds a contribution to whichever side matches its unit.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidAmount`] if `asset` is zero.
    /// - [`AmmError::ReserveMismatch`] if `asset` matches neither side.
    /// - [`AmmError::ArithmeticOverflow`] on accumulator overflow.
    pub fn credit(&mut self, asset: &Asset) -> Result<()> {
        if asset.is_zero() {
            return Err(AmmError::InvalidAmount("deposit must be positive"));
        }
        if asset.same_unit(&self.amount0) {
            self.amount0 = self.amount0.checked_add(asset)?;
            Ok(())
        } else if asset.same_unit(&self.amount1) {
            self.amount1 = self.amount1.checked_add(asset)?;
            Ok(())
        } else {
            Err(AmmError::ReserveMismatch(
                "deposit asset matches neither pool side",
            ))
        }
    }

    /// Returns `true` once both sides hold a nonzero amount.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        !self.amount0.is_zero() && !self.amount1.is_zero()
    }
}
