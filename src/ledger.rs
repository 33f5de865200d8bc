//! Pool state transitions: swap, deposit, withdraw.
//!
//! This module is the single choke point through which pool state is
//! mutated. Every transition follows the same discipline: validate the
//! request and compute the complete result first, then assign the new
//! `(reserve0, reserve1, liquidity)` triple in one step — a transition
//! either fully commits or leaves the pool untouched.
//!
//! Rounding policy throughout: anything leaving a pool is truncated,
//! anything retained by a pool keeps the remainder.

use crate::accountant;
use crate::config::FeePolicy;
use crate::domain::{Amount, Asset, Rounding, Timestamp};
use crate::error::{AmmError, Result};
use crate::math::{invariant, normalize};
use crate::pool::{PendingDeposit, Pool, Side, SHARE_PRECISION};

/// Result of a committed (or simulated) swap against one pool.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapOutcome {
    /// The input quantity, as supplied by the trader.
    pub amount_in: Asset,
    /// The quantity delivered to the trader.
    pub amount_out: Asset,
    /// Trading fee retained by the pool, in output units.
    pub fee: Asset,
    /// Protocol fee carved out of the input, in input units.
    pub protocol_fee: Asset,
    /// Delivered output per input unit, at working precision.
    pub trade_price: f64,
}

/// Result of finalizing a pending deposit.
#[derive(Debug, Clone, PartialEq)]
pub struct DepositOutcome {
    /// Liquidity shares issued to the depositor.
    pub issued: Asset,
    /// Side-0 contribution actually absorbed by the pool.
    pub used0: Asset,
    /// Side-1 contribution actually absorbed by the pool.
    pub used1: Asset,
    /// Side-0 excess returned to the depositor.
    pub refund0: Asset,
    /// Side-1 excess returned to the depositor.
    pub refund1: Asset,
}

/// Result of a withdrawal.
#[derive(Debug, Clone, PartialEq)]
pub struct WithdrawOutcome {
    /// Shares retired.
    pub retired: Asset,
    /// Side-0 reserve paid out.
    pub amount0: Asset,
    /// Side-1 reserve paid out.
    pub amount1: Asset,
}

/// Everything a swap will change, computed before any mutation.
struct SwapPlan {
    side_in: Side,
    new_reserve_in: Asset,
    new_reserve_out: Asset,
    outcome: SwapOutcome,
}

fn plan_swap(
    pool: &Pool,
    asset_in: &Asset,
    amplifier: u64,
    fees: &FeePolicy,
) -> Result<SwapPlan> {
    let side_in = pool
        .side_of(asset_in.symbol())
        .ok_or(AmmError::ReserveMismatch(
            "input asset matches neither pool side",
        ))?;
    let (reserve_in, reserve_out) = pool.oriented(side_in);
    if !asset_in.same_unit(reserve_in) {
        return Err(AmmError::ReserveMismatch("input asset precision mismatch"));
    }
    if asset_in.is_zero() {
        return Err(AmmError::InvalidAmount("swap input must be positive"));
    }
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(AmmError::EmptyPool);
    }

    // Everything below runs at the working precision.
    let wp = pool.working_precision();
    let rin_n = normalize::normalize_up(reserve_in.amount(), reserve_in.precision(), wp)?;
    let rout_n = normalize::normalize_up(reserve_out.amount(), reserve_out.precision(), wp)?;
    let ain_n = normalize::normalize_up(asset_in.amount(), asset_in.precision(), wp)?;

    let breakdown = invariant::swap_output(
        ain_n.get(),
        rin_n.get(),
        rout_n.get(),
        amplifier,
        fees.trade_fee(),
    )?;
    let net_n = breakdown.net();

    // De-normalize at the output boundary only; truncation favours the
    // pool.
    let out_amount = normalize::normalize_down(net_n, wp, reserve_out.precision())?;
    let fee_amount = normalize::normalize_down(breakdown.fee, wp, reserve_out.precision())?;
    let amount_out = reserve_out.with_amount(out_amount);
    let fee = reserve_out.with_amount(fee_amount);

    // Protocol fee leaves the input before the reserve is credited.
    let protocol_amount = fees
        .protocol_fee()
        .apply(asset_in.amount(), Rounding::Down)?;
    let protocol_fee = asset_in.with_amount(protocol_amount);
    let credited = asset_in.checked_sub(&protocol_fee)?;

    let new_reserve_in = reserve_in.checked_add(&credited)?;
    let new_reserve_out = reserve_out.checked_sub(&amount_out)?;

    // Committed reserves must normalize and sum within u64 before any
    // assignment happens.
    let new_in_n =
        normalize::normalize_up(new_reserve_in.amount(), new_reserve_in.precision(), wp)?;
    let new_out_n =
        normalize::normalize_up(new_reserve_out.amount(), new_reserve_out.precision(), wp)?;
    new_in_n
        .checked_add(&new_out_n)
        .ok_or(AmmError::ArithmeticOverflow("swap: reserve sum"))?;

    #[allow(clippy::cast_precision_loss)]
    let trade_price = net_n.get() as f64 / ain_n.get() as f64;

    Ok(SwapPlan {
        side_in,
        new_reserve_in,
        new_reserve_out,
        outcome: SwapOutcome {
            amount_in: *asset_in,
            amount_out,
            fee,
            protocol_fee,
            trade_price,
        },
    })
}

/// Executes a swap against `pool`, mutating its reserves and metrics.
///
/// `amplifier` is the *effective* amplifier — ramp interpolation happens
/// at the store layer, which owns the ramp records.
///
/// # Errors
///
/// - [`AmmError::ReserveMismatch`] if the input asset matches neither
///   pool side (or matches a side at the wrong precision).
/// - [`AmmError::InvalidAmount`] if the input is zero.
/// - [`AmmError::EmptyPool`] if either reserve is zero.
/// - Any solver error from [`invariant::swap_output`].
pub fn swap(
    pool: &mut Pool,
    asset_in: &Asset,
    amplifier: u64,
    fees: &FeePolicy,
    now: Timestamp,
) -> Result<SwapOutcome> {
    let plan = plan_swap(pool, asset_in, amplifier, fees)?;

    match plan.side_in {
        Side::Zero => {
            pool.reserve0 = plan.new_reserve_in;
            pool.reserve1 = plan.new_reserve_out;
            pool.volume0 = pool
                .volume0
                .checked_add(&plan.outcome.amount_in.amount())
                .unwrap_or(Amount::MAX);
        }
        Side::One => {
            pool.reserve1 = plan.new_reserve_in;
            pool.reserve0 = plan.new_reserve_out;
            pool.volume1 = pool
                .volume1
                .checked_add(&plan.outcome.amount_in.amount())
                .unwrap_or(Amount::MAX);
        }
    }
    pool.trade_count += 1;
    if plan.outcome.trade_price > 0.0 {
        match plan.side_in {
            Side::Zero => {
                pool.price0_last = plan.outcome.trade_price;
                pool.price1_last = plan.outcome.trade_price.recip();
            }
            Side::One => {
                pool.price1_last = plan.outcome.trade_price;
                pool.price0_last = plan.outcome.trade_price.recip();
            }
        }
    }
    pool.refresh_virtual_price()?;
    pool.last_updated = now;

    Ok(plan.outcome)
}

/// Simulates a swap without touching pool state.
///
/// Used by the router for read-only path evaluation; the computation is
/// byte-for-byte the one [`swap`] commits.
///
/// # Errors
///
/// Same as [`swap`].
pub fn quote(
    pool: &Pool,
    asset_in: &Asset,
    amplifier: u64,
    fees: &FeePolicy,
) -> Result<SwapOutcome> {
    Ok(plan_swap(pool, asset_in, amplifier, fees)?.outcome)
}

/// Finalizes a pending deposit: issues shares for the in-ratio portion
/// of the contribution and computes the excess to refund.
///
/// For a non-empty pool the two contributed amounts are compared
/// against the current reserve ratio; the side in excess is truncated
/// down to the proportional amount and the leftover is refunded, not
/// absorbed. At exact ratio equality side 0 is kept whole.
///
/// # Errors
///
/// - [`AmmError::ReserveMismatch`] if the pending units are not this
///   pool's reserve units.
/// - [`AmmError::InvalidAmount`] if either side is zero, or the deposit
///   is too small to issue a single share.
/// - [`AmmError::ArithmeticOverflow`] on normalization or issuance
///   overflow.
pub fn deposit(pool: &mut Pool, pending: &PendingDeposit, now: Timestamp) -> Result<DepositOutcome> {
    let a0 = *pending.amount0();
    let a1 = *pending.amount1();
    if !a0.same_unit(&pool.reserve0) || !a1.same_unit(&pool.reserve1) {
        return Err(AmmError::ReserveMismatch(
            "pending deposit units do not match pool",
        ));
    }
    if a0.is_zero() || a1.is_zero() {
        return Err(AmmError::InvalidAmount("deposit requires both sides"));
    }

    let wp = pool.working_precision();
    let a0n = normalize::normalize_up(a0.amount(), a0.precision(), wp)?;
    let a1n = normalize::normalize_up(a1.amount(), a1.precision(), wp)?;

    let (used0, used1, used0n, used1n) = if pool.is_empty() {
        debug_assert!(pool.reserve0.is_zero() && pool.reserve1.is_zero());
        (a0, a1, a0n, a1n)
    } else {
        let (r0n, r1n) = pool.normalized_reserves()?;
        if r0n.is_zero() || r1n.is_zero() {
            return Err(AmmError::EmptyPool);
        }
        let cross0 = a0n.widened() * r1n.widened();
        let cross1 = a1n.widened() * r0n.widened();
        if cross0 <= cross1 {
            // Side 1 is in excess (or the ratio is exact): side 0 is
            // kept whole and side 1 truncated to the proportional
            // amount.
            let proportional = cross0 / r0n.widened();
            let raw = u64::try_from(proportional)
                .map_err(|_| AmmError::ArithmeticOverflow("deposit: proportional side 1"))?;
            let used1 =
                a1.with_amount(normalize::normalize_down(Amount::new(raw), wp, a1.precision())?);
            let used1n = normalize::normalize_up(used1.amount(), used1.precision(), wp)?;
            (a0, used1, a0n, used1n)
        } else {
            let proportional = cross1 / r1n.widened();
            let raw = u64::try_from(proportional)
                .map_err(|_| AmmError::ArithmeticOverflow("deposit: proportional side 0"))?;
            let used0 =
                a0.with_amount(normalize::normalize_down(Amount::new(raw), wp, a0.precision())?);
            let used0n = normalize::normalize_up(used0.amount(), used0.precision(), wp)?;
            (used0, a1, used0n, a1n)
        }
    };

    let deposit_value = used0n
        .checked_add(&used1n)
        .ok_or(AmmError::ArithmeticOverflow("deposit: value"))?;
    let (r0n, r1n) = pool.normalized_reserves()?;
    let reserve_value = r0n
        .checked_add(&r1n)
        .ok_or(AmmError::ArithmeticOverflow("deposit: reserve value"))?;
    let issued_amount = accountant::issue(
        deposit_value.get(),
        reserve_value.get(),
        pool.liquidity.amount().get(),
        SHARE_PRECISION.factor(),
    )?;
    if issued_amount == 0 {
        return Err(AmmError::InvalidAmount("deposit too small to issue shares"));
    }
    let issued = pool.liquidity.with_amount(Amount::new(issued_amount));

    let refund0 = a0.checked_sub(&used0)?;
    let refund1 = a1.checked_sub(&used1)?;

    let new_reserve0 = pool.reserve0.checked_add(&used0)?;
    let new_reserve1 = pool.reserve1.checked_add(&used1)?;
    let new_liquidity = pool.liquidity.checked_add(&issued)?;
    // Grown reserves must normalize and sum within u64 before any
    // assignment happens.
    let new_r0n = normalize::normalize_up(new_reserve0.amount(), new_reserve0.precision(), wp)?;
    let new_r1n = normalize::normalize_up(new_reserve1.amount(), new_reserve1.precision(), wp)?;
    new_r0n
        .checked_add(&new_r1n)
        .ok_or(AmmError::ArithmeticOverflow("deposit: grown reserve sum"))?;

    // All checks passed; commit the new triple.
    pool.reserve0 = new_reserve0;
    pool.reserve1 = new_reserve1;
    pool.liquidity = new_liquidity;
    pool.refresh_virtual_price()?;
    pool.last_updated = now;

    Ok(DepositOutcome {
        issued,
        used0,
        used1,
        refund0,
        refund1,
    })
}

/// Retires `shares` and pays out the proportional slice of both
/// reserves.
///
/// A withdrawal of the entire outstanding supply snaps to exactly drain
/// both reserves, so the final withdrawer is never left chasing a
/// one-unit rounding residual.
///
/// # Errors
///
/// - [`AmmError::ReserveMismatch`] if `shares` is not this pool's
///   liquidity asset.
/// - [`AmmError::InvalidAmount`] if `shares` is zero.
/// - [`AmmError::InsufficientLiquidity`] if `shares` exceeds the supply.
/// - [`AmmError::WithdrawTooSmall`] if both payouts round to zero.
pub fn withdraw(pool: &mut Pool, shares: &Asset, now: Timestamp) -> Result<WithdrawOutcome> {
    if !shares.same_unit(&pool.liquidity) {
        return Err(AmmError::ReserveMismatch(
            "share asset does not match pool liquidity",
        ));
    }
    if shares.is_zero() {
        return Err(AmmError::InvalidAmount("withdrawal must be positive"));
    }
    let supply = pool.liquidity.amount();
    if shares.amount() > supply {
        return Err(AmmError::InsufficientLiquidity);
    }

    let wp = pool.working_precision();
    let (r0n, r1n) = pool.normalized_reserves()?;
    let total_n = r0n
        .checked_add(&r1n)
        .ok_or(AmmError::ArithmeticOverflow("withdraw: reserve value"))?;

    let (out0, out1) = if shares.amount() == supply {
        // Final withdrawal: drain both sides exactly.
        (pool.reserve0, pool.reserve1)
    } else {
        let value = accountant::retire(shares.amount().get(), total_n.get(), supply.get())?;
        let out0n = value as u128 * r0n.widened() / total_n.widened();
        let out1n = value as u128 * r1n.widened() / total_n.widened();
        let out0_raw = u64::try_from(out0n)
            .map_err(|_| AmmError::ArithmeticOverflow("withdraw: side 0"))?;
        let out1_raw = u64::try_from(out1n)
            .map_err(|_| AmmError::ArithmeticOverflow("withdraw: side 1"))?;
        let out0 = pool.reserve0.with_amount(normalize::normalize_down(
            Amount::new(out0_raw),
            wp,
            pool.reserve0.precision(),
        )?);
        let out1 = pool.reserve1.with_amount(normalize::normalize_down(
            Amount::new(out1_raw),
            wp,
            pool.reserve1.precision(),
        )?);
        (out0, out1)
    };

    if out0.is_zero() && out1.is_zero() {
        return Err(AmmError::WithdrawTooSmall);
    }

    pool.reserve0 = pool.reserve0.checked_sub(&out0)?;
    pool.reserve1 = pool.reserve1.checked_sub(&out1)?;
    pool.liquidity = pool.liquidity.checked_sub(shares)?;
    pool.refresh_virtual_price()?;
    pool.last_updated = now;

    Ok(WithdrawOutcome {
        retired: *shares,
        amount0: out0,
        amount1: out1,
    })
}
