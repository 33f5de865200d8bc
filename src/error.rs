//! Unified error type for the StableSwap engine.
//!
//! All fallible operations across the crate return [`AmmError`]. Every
//! variant is a terminal precondition failure: nothing is retried
//! internally, and no state is mutated once an error has been produced —
//! validation always precedes mutation.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, AmmError>;

/// Errors produced by the StableSwap engine.
///
/// The static string payloads identify the failing computation site and
/// are intended for operators reading logs, not for programmatic matching
/// — match on the variant instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AmmError {
    /// A quantity that must be strictly positive was zero.
    #[error("invalid amount: {0}")]
    InvalidAmount(&'static str),

    /// Amplifier is zero or outside the configured bound.
    #[error("amplifier out of range")]
    InvalidAmplifier,

    /// Ramp window is non-positive or shorter than the configured minimum.
    #[error("invalid ramp duration")]
    InvalidDuration,

    /// A pool-side reserve required for the operation is zero.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// The pool holds no reserves at all.
    #[error("pool is empty")]
    EmptyPool,

    /// The solver produced an output reserve not strictly below the
    /// current reserve.
    #[error("insufficient output reserve")]
    InsufficientReserve,

    /// A checked multiply or scale exceeded the representable range.
    #[error("arithmetic overflow: {0}")]
    ArithmeticOverflow(&'static str),

    /// Asset identity in the request does not match the pool's reserves.
    #[error("reserve mismatch: {0}")]
    ReserveMismatch(&'static str),

    /// No direct or two-hop path connects the requested assets.
    #[error("no trade path found")]
    NoPathFound,

    /// Every candidate path simulated to a zero return.
    #[error("no path yields a positive return")]
    NoMatchingTrade,

    /// Final output fell below the caller's stated minimum return.
    #[error("return below minimum")]
    SlippageExceeded,

    /// Both sides of a withdrawal rounded down to zero.
    #[error("withdrawal rounds to zero")]
    WithdrawTooSmall,

    /// Combined trade and protocol fee exceeds the global cap.
    #[error("fee exceeds maximum")]
    FeeTooHigh,

    /// Decimal precision outside the supported range.
    #[error("invalid precision: {0}")]
    InvalidPrecision(&'static str),

    /// Symbol code failed validation.
    #[error("invalid symbol: {0}")]
    InvalidSymbol(&'static str),

    /// No pool registered under the given identifier.
    #[error("pool not found")]
    PoolNotFound,

    /// A pool with this identifier or reserve pair already exists.
    #[error("pool already exists")]
    PoolAlreadyExists,

    /// No pending deposit recorded for the given owner and pool.
    #[error("pending deposit not found")]
    DepositNotFound,

    /// No amplifier ramp is active for the given pool.
    #[error("no active ramp")]
    RampNotFound,

    /// Operational status forbids this operation.
    #[error("operations suspended")]
    Suspended,

    /// A Newton iteration exhausted its iteration budget.
    #[error("iteration did not converge: {0}")]
    NonConvergence(&'static str),
}
