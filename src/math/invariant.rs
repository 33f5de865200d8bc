//! StableSwap invariant solver.
//!
//! Computes the invariant `D` and post-trade output reserve `x` for a
//! two-asset pool by fixed-point Newton iteration, entirely in integer
//! arithmetic. For `n = 2` assets the invariant is
//!
//! ```text
//! A·S·n² + D = A·D·n² + D³ / (n²·x·y)
//! ```
//!
//! with `S = x + y`. `D` is found by iterating
//!
//! ```text
//! prod1 = D²/(2x) · D/(2y)
//! D ← 2·D·(A·S + prod1) / ((2A − 1)·D + 3·prod1)
//! ```
//!
//! from `D₀ = S`, and the post-trade output reserve is the positive root
//! of `x² + b·x = c`, iterated as `x ← (x² + c)/(2x + b)` from `x₀ = D`.
//!
//! Both iterations stop when consecutive iterates differ by at most one
//! base unit. That bound is a contract, not a heuristic: callers rely on
//! the result being within one unit of the fixed point, and on the
//! iteration terminating within [`MAX_ITERATIONS`] for any reserves up
//! to 10¹⁵ and amplifiers up to 10⁶.
//!
//! Intermediates are `U256` — the cubic products reach `D³`, which for
//! 64-bit reserves needs more than 128 bits. `D₀ = S` bounds every
//! iterate by the reserve sum, so within 256 bits the arithmetic cannot
//! overflow for any 64-bit inputs; the multiplications stay checked
//! regardless. The coefficient `b` may be negative; rather than
//! switching to signed arithmetic, its `−D` term is folded into the
//! iteration denominator, which stays strictly positive for any iterate
//! at or above the root.

use primitive_types::U256;

use crate::domain::{Amount, BasisPoints, Rounding};
use crate::error::{AmmError, Result};

/// Iteration budget before declaring non-convergence.
pub const MAX_ITERATIONS: u32 = 255;

/// Narrows a `U256` back to `u128`.
fn narrow(value: U256, context: &'static str) -> Result<u128> {
    if value.bits() > 128 {
        return Err(AmmError::ArithmeticOverflow(context));
    }
    Ok(value.low_u128())
}

/// Computes the invariant `D` for two same-precision reserves.
///
/// # Errors
///
/// - [`AmmError::InvalidAmplifier`] if `amplifier` is zero.
/// - [`AmmError::InsufficientLiquidity`] if either reserve is zero.
/// - [`AmmError::ArithmeticOverflow`] if an intermediate product
///   exceeds 256 bits.
/// - [`AmmError::NonConvergence`] if the iteration budget is exhausted.
pub fn compute_d(reserve_in: u64, reserve_out: u64, amplifier: u64) -> Result<u128> {
    if amplifier == 0 {
        return Err(AmmError::InvalidAmplifier);
    }
    if reserve_in == 0 || reserve_out == 0 {
        return Err(AmmError::InsufficientLiquidity);
    }

    let two = U256::from(2u8);
    let three = U256::from(3u8);
    let rin2 = U256::from(reserve_in) * two;
    let rout2 = U256::from(reserve_out) * two;
    let amp = U256::from(amplifier);
    let sum = U256::from(reserve_in) + U256::from(reserve_out);

    let mut d = sum;
    for _ in 0..MAX_ITERATIONS {
        // prod1 = D²/(2·reserve_in) · D/(2·reserve_out)
        let prod1 = d
            .checked_mul(d)
            .ok_or(AmmError::ArithmeticOverflow("invariant: D²"))?
            / rin2;
        let prod1 = prod1
            .checked_mul(d)
            .ok_or(AmmError::ArithmeticOverflow("invariant: prod1·D"))?
            / rout2;

        let d_prev = d;

        // D ← 2·D·(A·S + prod1) / ((2A − 1)·D + 3·prod1)
        let leverage = amp
            .checked_mul(sum)
            .ok_or(AmmError::ArithmeticOverflow("invariant: A·S"))?
            .checked_add(prod1)
            .ok_or(AmmError::ArithmeticOverflow("invariant: A·S + prod1"))?;
        let numerator = d
            .checked_mul(leverage)
            .ok_or(AmmError::ArithmeticOverflow("invariant: numerator"))?
            .checked_mul(two)
            .ok_or(AmmError::ArithmeticOverflow("invariant: 2·numerator"))?;
        let denominator = (amp * two - U256::one())
            .checked_mul(d)
            .ok_or(AmmError::ArithmeticOverflow("invariant: (2A−1)·D"))?
            .checked_add(
                prod1
                    .checked_mul(three)
                    .ok_or(AmmError::ArithmeticOverflow("invariant: 3·prod1"))?,
            )
            .ok_or(AmmError::ArithmeticOverflow("invariant: denominator"))?;
        if denominator.is_zero() {
            return Err(AmmError::ArithmeticOverflow("invariant: zero denominator"));
        }

        d = numerator / denominator;

        let diff = if d > d_prev { d - d_prev } else { d_prev - d };
        if diff <= U256::one() {
            return narrow(d, "invariant: D exceeds 128 bits");
        }
    }

    Err(AmmError::NonConvergence("invariant D"))
}

/// Computes the post-trade output reserve `x` for a given post-trade
/// input reserve `new_reserve_in`, invariant `d`, and amplifier.
///
/// Solves `x² + b·x = c` with
/// `b = new_reserve_in + D/(2A) − D` and
/// `c = D²/(2·new_reserve_in) · D/(4A)`,
/// seeded at `x₀ = D`.
///
/// # Errors
///
/// - [`AmmError::InvalidAmplifier`] if `amplifier` is zero.
/// - [`AmmError::InsufficientLiquidity`] if `new_reserve_in` is zero.
/// - [`AmmError::ArithmeticOverflow`] on any intermediate overflow, or
///   if the iteration denominator degenerates to zero.
/// - [`AmmError::NonConvergence`] if the iteration budget is exhausted.
pub fn compute_x(new_reserve_in: u128, d: u128, amplifier: u64) -> Result<u128> {
    if amplifier == 0 {
        return Err(AmmError::InvalidAmplifier);
    }
    if new_reserve_in == 0 {
        return Err(AmmError::InsufficientLiquidity);
    }

    let two = U256::from(2u8);
    let four = U256::from(4u8);
    let amp = U256::from(amplifier);
    let new_in = U256::from(new_reserve_in);
    let d_wide = U256::from(d);

    // b without its −D term; the subtraction happens in the denominator
    // where the total is provably positive.
    let b_plus = new_in
        .checked_add(d_wide / (two * amp))
        .ok_or(AmmError::ArithmeticOverflow("output reserve: b"))?;

    // c = D²/(2·new_reserve_in) · D/(4A)
    let c = d_wide
        .checked_mul(d_wide)
        .ok_or(AmmError::ArithmeticOverflow("output reserve: D²"))?
        / (two * new_in);
    let c = c
        .checked_mul(d_wide)
        .ok_or(AmmError::ArithmeticOverflow("output reserve: c·D"))?
        / (four * amp);

    let mut x = d_wide;
    for _ in 0..MAX_ITERATIONS {
        let x_prev = x;

        // x ← (x² + c) / (2x + b)
        let numerator = x
            .checked_mul(x)
            .ok_or(AmmError::ArithmeticOverflow("output reserve: x²"))?
            .checked_add(c)
            .ok_or(AmmError::ArithmeticOverflow("output reserve: x² + c"))?;
        let denominator = x
            .checked_mul(two)
            .ok_or(AmmError::ArithmeticOverflow("output reserve: 2x"))?
            .checked_add(b_plus)
            .ok_or(AmmError::ArithmeticOverflow("output reserve: 2x + b"))?
            .checked_sub(d_wide)
            .ok_or(AmmError::ArithmeticOverflow("output reserve: denominator"))?;
        if denominator.is_zero() {
            return Err(AmmError::ArithmeticOverflow(
                "output reserve: zero denominator",
            ));
        }

        x = numerator / denominator;

        let diff = if x > x_prev { x - x_prev } else { x_prev - x };
        if diff <= U256::one() {
            return narrow(x, "output reserve: x exceeds 128 bits");
        }
    }

    Err(AmmError::NonConvergence("output reserve x"))
}

/// Gross output and fee for one swap, before the fee is retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapBreakdown {
    /// Output before the trading fee: `reserve_out − x`.
    pub gross: Amount,
    /// Trading fee, truncated out of `gross`.
    pub fee: Amount,
}

impl SwapBreakdown {
    /// The amount actually delivered: `gross − fee`.
    #[must_use]
    pub const fn net(&self) -> Amount {
        Amount::new(self.gross.get().saturating_sub(self.fee.get()))
    }
}

/// Computes the output of swapping `amount_in` against the given
/// reserves, all at the same working precision.
///
/// # Errors
///
/// - [`AmmError::InvalidAmount`] if `amount_in` is zero.
/// - [`AmmError::InvalidAmplifier`] if `amplifier` is zero.
/// - [`AmmError::InsufficientLiquidity`] if either reserve is zero.
/// - [`AmmError::FeeTooHigh`] if `fee` exceeds 100%.
/// - [`AmmError::InsufficientReserve`] if the solved output reserve is
///   not strictly below the current one.
/// - Any solver error from [`compute_d`] / [`compute_x`].
pub fn swap_output(
    amount_in: u64,
    reserve_in: u64,
    reserve_out: u64,
    amplifier: u64,
    fee: BasisPoints,
) -> Result<SwapBreakdown> {
    if amount_in == 0 {
        return Err(AmmError::InvalidAmount("amount_in must be positive"));
    }
    if amplifier == 0 {
        return Err(AmmError::InvalidAmplifier);
    }
    if reserve_in == 0 || reserve_out == 0 {
        return Err(AmmError::InsufficientLiquidity);
    }
    if !fee.is_valid_percent() {
        return Err(AmmError::FeeTooHigh);
    }

    let d = compute_d(reserve_in, reserve_out, amplifier)?;
    let new_reserve_in = reserve_in as u128 + amount_in as u128;
    let x = compute_x(new_reserve_in, d, amplifier)?;

    if x >= reserve_out as u128 {
        return Err(AmmError::InsufficientReserve);
    }
    // x < reserve_out ≤ u64::MAX, so the narrowing is exact.
    let gross = reserve_out - x as u64;
    let fee_amount = fee.apply(Amount::new(gross), Rounding::Down)?;

    Ok(SwapBreakdown {
        gross: Amount::new(gross),
        fee: fee_amount,
    })
}

/// Convenience wrapper returning only the delivered amount.
///
/// # Errors
///
/// Same as [`swap_output`].
pub fn get_amount_out(
    amount_in: u64,
    reserve_in: u64,
    reserve_out: u64,
    amplifier: u64,
    fee: BasisPoints,
) -> Result<u64> {
    Ok(swap_output(amount_in, reserve_in, reserve_out, amplifier, fee)?.net().get())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    // -- Reference vector ----------------------------------------------------

    #[test]
    fn reference_amount_out() {
        let Ok(out) = get_amount_out(100_000, 3_432_247_548, 6_169_362_700, 450, BasisPoints::new(4))
        else {
            panic!("expected Ok");
        };
        assert_eq!(out, 100_110);
    }

    #[test]
    fn reference_breakdown() {
        let Ok(breakdown) =
            swap_output(100_000, 3_432_247_548, 6_169_362_700, 450, BasisPoints::new(4))
        else {
            panic!("expected Ok");
        };
        assert_eq!(breakdown.gross, Amount::new(100_150));
        assert_eq!(breakdown.fee, Amount::new(40));
        assert_eq!(breakdown.net(), Amount::new(100_110));
    }

    #[test]
    fn reference_invariant_d() {
        let Ok(d) = compute_d(3_432_247_548, 6_169_362_700, 450) else {
            panic!("expected Ok");
        };
        assert_eq!(d, 9_600_668_971);
    }

    #[test]
    fn zero_fee_delivers_gross() {
        let Ok(out) = get_amount_out(100_000, 3_432_247_548, 6_169_362_700, 450, BasisPoints::ZERO)
        else {
            panic!("expected Ok");
        };
        assert_eq!(out, 100_150);
    }

    // -- compute_d -----------------------------------------------------------

    #[test]
    fn d_at_peg_is_total_reserves() {
        let Ok(d) = compute_d(1_000_000, 1_000_000, 100) else {
            panic!("expected Ok");
        };
        assert_eq!(d, 2_000_000);
    }

    #[test]
    fn d_rejects_zero_amplifier() {
        assert_eq!(compute_d(1, 1, 0), Err(AmmError::InvalidAmplifier));
    }

    #[test]
    fn d_rejects_empty_reserve() {
        assert_eq!(compute_d(0, 1, 100), Err(AmmError::InsufficientLiquidity));
        assert_eq!(compute_d(1, 0, 100), Err(AmmError::InsufficientLiquidity));
    }

    #[test]
    fn d_is_deterministic() {
        let Ok(a) = compute_d(3_432_247_548, 6_169_362_700, 450) else {
            panic!("expected Ok");
        };
        let Ok(b) = compute_d(3_432_247_548, 6_169_362_700, 450) else {
            panic!("expected Ok");
        };
        assert_eq!(a, b);
    }

    #[test]
    fn d_survives_extreme_imbalance() {
        // One raw unit against 10¹⁵: the cubic intermediates here
        // exceed 128 bits.
        let Ok(d) = compute_d(1, 1_000_000_000_000_000, 1) else {
            panic!("expected Ok");
        };
        assert!(d >= 1);
        assert!(d < 2_000_000_000_000_000);
    }

    // -- compute_x -----------------------------------------------------------

    #[test]
    fn x_round_trips_at_peg() {
        // With the input reserve unchanged, the solved output reserve is
        // the current one.
        let Ok(d) = compute_d(1_000_000, 1_000_000, 100) else {
            panic!("expected Ok");
        };
        let Ok(x) = compute_x(1_000_000, d, 100) else {
            panic!("expected Ok");
        };
        assert_eq!(x, 1_000_000);
    }

    #[test]
    fn x_rejects_zero_inputs() {
        assert_eq!(compute_x(0, 100, 10), Err(AmmError::InsufficientLiquidity));
        assert_eq!(compute_x(100, 100, 0), Err(AmmError::InvalidAmplifier));
    }

    // -- swap_output preconditions -------------------------------------------

    #[test]
    fn rejects_zero_amount() {
        assert!(matches!(
            swap_output(0, 1_000, 1_000, 100, BasisPoints::ZERO),
            Err(AmmError::InvalidAmount(_))
        ));
    }

    #[test]
    fn rejects_fee_above_full_percent() {
        assert_eq!(
            swap_output(1, 1_000, 1_000, 100, BasisPoints::new(10_001)),
            Err(AmmError::FeeTooHigh)
        );
    }

    #[test]
    fn full_percent_fee_delivers_nothing() {
        let Ok(breakdown) = swap_output(1_000, 1_000_000, 1_000_000, 100, BasisPoints::MAX_PERCENT)
        else {
            panic!("expected Ok");
        };
        assert_eq!(breakdown.net(), Amount::ZERO);
        assert_eq!(breakdown.fee, breakdown.gross);
    }

    // -- Behaviour -----------------------------------------------------------

    #[test]
    fn output_increases_with_input() {
        let Ok(small) = get_amount_out(10_000, 1_000_000_000, 1_000_000_000, 450, BasisPoints::new(4))
        else {
            panic!("expected Ok");
        };
        let Ok(large) = get_amount_out(20_000, 1_000_000_000, 1_000_000_000, 450, BasisPoints::new(4))
        else {
            panic!("expected Ok");
        };
        assert_eq!(small, 9_996);
        assert_eq!(large, 19_992);
        assert!(large > small);
    }

    #[test]
    fn output_below_input_away_from_peg() {
        let Ok(breakdown) = swap_output(100_000, 1_000_000, 1_500_000, 50, BasisPoints::new(30))
        else {
            panic!("expected Ok");
        };
        assert_eq!(breakdown.gross, Amount::new(100_663));
        assert_eq!(breakdown.fee, Amount::new(301));
        assert_eq!(breakdown.net(), Amount::new(100_362));
    }

    #[test]
    fn higher_amplifier_means_less_slippage() {
        let mut prev = 0u64;
        for amplifier in [1u64, 10, 100, 1_000, 10_000] {
            let Ok(out) =
                get_amount_out(50_000, 1_000_000, 1_000_000, amplifier, BasisPoints::new(30))
            else {
                panic!("expected Ok for amplifier {amplifier}");
            };
            assert!(out >= prev, "amplifier {amplifier}: {out} < {prev}");
            prev = out;
        }
    }

    #[test]
    fn extreme_range_converges() {
        let Ok(out) = get_amount_out(
            1_000_000_000_000_000,
            1_000_000_000_000_000,
            1_000_000_000_000_000,
            1_000_000,
            BasisPoints::new(100),
        ) else {
            panic!("expected Ok");
        };
        assert_eq!(out, 989_300_459_111_617);
    }

    #[test]
    fn one_unit_pool() {
        let Ok(breakdown) = swap_output(1, 1, 1, 1, BasisPoints::ZERO) else {
            panic!("expected Ok");
        };
        assert_eq!(breakdown.gross, Amount::new(1));
    }
}
