//! Property-based tests using `proptest` for the engine invariants.
//!
//! Covers the contract-level properties:
//!
//! 1. **Convergence** — `D` and `x` iterations terminate within budget
//!    for any reserves in `[1, 10¹⁵]` and amplifiers in `[1, 10⁶]`.
//! 2. **Conservation** — swap reserve updates are exact to the unit.
//! 3. **Monotonicity** — output never decreases with input; strictly
//!    increases on balanced pools.
//! 4. **Share-price invariance** — deposit then withdraw of the issued
//!    shares never returns more than was contributed.
//! 5. **Ramp snap idempotence** — at or after `end_time` the effective
//!    amplifier is exactly the target, however often queried.
//! 6. **Deposit ratio boundary** — a deposit at the exact reserve ratio
//!    refunds nothing on either side.

use proptest::prelude::*;

use crate::config::FeePolicy;
use crate::domain::{Amount, Asset, BasisPoints, Precision, SymbolCode, Timestamp};
use crate::ledger;
use crate::math::invariant;
use crate::pool::{PendingDeposit, Pool};
use crate::ramp::{AmplifierRamp, MAX_AMP, MIN_RAMP_DURATION};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn sym(text: &str) -> SymbolCode {
    let Ok(s) = SymbolCode::new(text) else {
        panic!("valid symbol");
    };
    s
}

fn p4() -> Precision {
    let Ok(prec) = Precision::new(4) else {
        panic!("valid precision");
    };
    prec
}

fn asset(amount: u64, symbol: &str) -> Asset {
    Asset::new(Amount::new(amount), sym(symbol), p4())
}

/// Seeds a fresh A/B pool (precision 4 both sides) with the given
/// reserves via a real bootstrap deposit.
fn seeded_pool(reserve0: u64, reserve1: u64) -> Pool {
    let Ok(mut pool) = Pool::new(
        sym("AB"),
        sym("A"),
        p4(),
        sym("B"),
        p4(),
        450,
        Timestamp::new(1),
    ) else {
        panic!("valid pool");
    };
    let mut pending = PendingDeposit::new(&pool);
    let (Ok(()), Ok(())) = (
        pending.credit(&asset(reserve0, "A")),
        pending.credit(&asset(reserve1, "B")),
    ) else {
        panic!("credits");
    };
    let Ok(_) = ledger::deposit(&mut pool, &pending, Timestamp::new(1)) else {
        panic!("bootstrap deposit");
    };
    pool
}

// ---------------------------------------------------------------------------
// 1. Convergence
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn solver_converges_over_contract_range(
        reserve_in in 1u64..=1_000_000_000_000_000,
        reserve_out in 1u64..=1_000_000_000_000_000,
        amplifier in 1u64..=1_000_000,
        amount_in in 1u64..=1_000_000_000_000_000,
    ) {
        let d = invariant::compute_d(reserve_in, reserve_out, amplifier);
        prop_assert!(d.is_ok(), "D diverged: {d:?}");
        let Ok(d) = d else { unreachable!() };
        let x = invariant::compute_x(reserve_in as u128 + amount_in as u128, d, amplifier);
        prop_assert!(x.is_ok(), "x diverged: {x:?}");
    }
}

// ---------------------------------------------------------------------------
// 2. Conservation
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn swap_conserves_to_the_unit(
        reserve0 in 1_000_000u64..=100_000_000,
        reserve1 in 1_000_000u64..=100_000_000,
        amount_in in 1_000u64..=100_000,
        trade_bps in 0u32..=100,
        protocol_bps in 0u32..=100,
    ) {
        let mut pool = seeded_pool(reserve0, reserve1);
        let Ok(fees) = FeePolicy::new(
            BasisPoints::new(trade_bps),
            BasisPoints::new(protocol_bps),
        ) else {
            panic!("valid fees");
        };
        let input = asset(amount_in, "A");
        let outcome = ledger::swap(&mut pool, &input, 450, &fees, Timestamp::new(2));
        prop_assert!(outcome.is_ok(), "swap failed: {outcome:?}");
        let Ok(outcome) = outcome else { unreachable!() };

        prop_assert_eq!(
            pool.reserve0().amount().get(),
            reserve0 + amount_in - outcome.protocol_fee.amount().get(),
        );
        prop_assert_eq!(
            pool.reserve1().amount().get(),
            reserve1 - outcome.amount_out.amount().get(),
        );
    }
}

// ---------------------------------------------------------------------------
// 3. Monotonicity
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn output_never_decreases_with_input(
        reserve_in in 1_000_000u64..=1_000_000_000,
        reserve_out in 1_000_000u64..=1_000_000_000,
        amplifier in 1u64..=1_000_000,
        amount in 1_000u64..=1_000_000,
        delta in 1u64..=1_000_000,
    ) {
        let Ok(smaller) = invariant::get_amount_out(
            amount, reserve_in, reserve_out, amplifier, BasisPoints::new(4),
        ) else {
            panic!("solver");
        };
        let Ok(larger) = invariant::get_amount_out(
            amount + delta, reserve_in, reserve_out, amplifier, BasisPoints::new(4),
        ) else {
            panic!("solver");
        };
        prop_assert!(larger >= smaller, "{larger} < {smaller}");
    }

    #[test]
    fn output_strictly_increases_on_balanced_pools(
        reserve in 1_000_000u64..=1_000_000_000,
        amplifier in 1u64..=1_000_000,
        amount in 1_000u64..=100_000,
        delta in 1_000u64..=100_000,
    ) {
        let Ok(smaller) = invariant::get_amount_out(
            amount, reserve, reserve, amplifier, BasisPoints::ZERO,
        ) else {
            panic!("solver");
        };
        let Ok(larger) = invariant::get_amount_out(
            amount + delta, reserve, reserve, amplifier, BasisPoints::ZERO,
        ) else {
            panic!("solver");
        };
        prop_assert!(larger > smaller, "{larger} <= {smaller}");
    }
}

/// Coarse direction check for reserve availability: in the
/// constant-product regime a deeper output side pays strictly more.
#[test]
fn deeper_output_reserve_pays_more() {
    let Ok(shallow) = invariant::get_amount_out(100_000, 1_000_000, 1_000_000, 1, BasisPoints::ZERO)
    else {
        panic!("solver");
    };
    let Ok(deep) = invariant::get_amount_out(100_000, 1_000_000, 2_000_000, 1, BasisPoints::ZERO)
    else {
        panic!("solver");
    };
    assert!(deep > shallow);
}

// ---------------------------------------------------------------------------
// 4. Share-price invariance
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn deposit_withdraw_round_trip_never_profits(
        reserve0 in 100_000u64..=1_000_000_000,
        reserve1 in 100_000u64..=1_000_000_000,
        amount0 in 1_000u64..=10_000_000,
        amount1 in 1_000u64..=10_000_000,
    ) {
        let mut pool = seeded_pool(reserve0, reserve1);
        let mut pending = PendingDeposit::new(&pool);
        let (Ok(()), Ok(())) = (
            pending.credit(&asset(amount0, "A")),
            pending.credit(&asset(amount1, "B")),
        ) else {
            panic!("credits");
        };
        let deposited = ledger::deposit(&mut pool, &pending, Timestamp::new(2));
        prop_assert!(deposited.is_ok(), "deposit failed: {deposited:?}");
        let Ok(deposited) = deposited else { unreachable!() };

        let withdrawn = ledger::withdraw(&mut pool, &deposited.issued, Timestamp::new(3));
        prop_assert!(withdrawn.is_ok(), "withdraw failed: {withdrawn:?}");
        let Ok(withdrawn) = withdrawn else { unreachable!() };

        prop_assert!(withdrawn.amount0.amount() <= deposited.used0.amount());
        prop_assert!(withdrawn.amount1.amount() <= deposited.used1.amount());
    }
}

// ---------------------------------------------------------------------------
// 5. Ramp snap idempotence
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn ramp_snaps_exactly_to_target(
        start in 1u64..=MAX_AMP,
        target in 1u64..=MAX_AMP,
        window in MIN_RAMP_DURATION..=10 * MIN_RAMP_DURATION,
        after in 0u64..=1_000_000_000,
    ) {
        let t0 = Timestamp::new(1_000_000);
        let t1 = t0.saturating_add(window);
        let Ok(ramp) = AmplifierRamp::new(start, target, t0, t1, MIN_RAMP_DURATION, MAX_AMP)
        else {
            panic!("valid ramp");
        };
        let queried = t1.saturating_add(after);
        prop_assert_eq!(ramp.amplifier_at(queried), target);
        prop_assert_eq!(ramp.amplifier_at(queried), target);

        // And the interpolation stays within the endpoint envelope
        // before that.
        let mid = Timestamp::new(t0.get() + window / 3);
        let between = ramp.amplifier_at(mid);
        prop_assert!(between >= start.min(target) && between <= start.max(target));
    }
}

// ---------------------------------------------------------------------------
// 6. Deposit ratio boundary
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn deposit_at_exact_ratio_refunds_nothing(
        reserve0 in 10_000u64..=1_000_000_000,
        reserve1 in 10_000u64..=1_000_000_000,
    ) {
        let mut pool = seeded_pool(reserve0, reserve1);
        // Re-deposit the exact current reserves: the contribution ratio
        // equals the reserve ratio by construction.
        let mut pending = PendingDeposit::new(&pool);
        let (Ok(()), Ok(())) = (
            pending.credit(&asset(reserve0, "A")),
            pending.credit(&asset(reserve1, "B")),
        ) else {
            panic!("credits");
        };
        let deposited = ledger::deposit(&mut pool, &pending, Timestamp::new(2));
        prop_assert!(deposited.is_ok(), "deposit failed: {deposited:?}");
        let Ok(deposited) = deposited else { unreachable!() };

        prop_assert_eq!(deposited.refund0.amount(), Amount::ZERO);
        prop_assert_eq!(deposited.refund1.amount(), Amount::ZERO);
        prop_assert_eq!(deposited.used0.amount().get(), reserve0);
        prop_assert_eq!(deposited.used1.amount().get(), reserve1);
        // Doubling the reserves doubles the supply exactly.
        prop_assert_eq!(
            pool.liquidity().amount().get(),
            2 * (reserve0 + reserve1) * 10_000,
        );
    }
}
