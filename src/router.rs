//! Trade path discovery and best-return selection.
//!
//! Given an input asset and a desired output symbol, the router
//! enumerates every direct and two-hop path across the pool set, runs a
//! read-only simulation of each through the real ledger swap logic, and
//! picks the path with the strictly greatest final output. Ties keep
//! the first path found, so selection is deterministic in store
//! iteration order.

use crate::config::FeePolicy;
use crate::domain::{Asset, SymbolCode, Timestamp};
use crate::error::{AmmError, Result};
use crate::ledger;
use crate::store::PoolStore;

/// An ordered list of pools a trade traverses: one hop, or two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradePath {
    hops: Vec<SymbolCode>,
}

impl TradePath {
    /// A direct, single-pool path.
    #[must_use]
    pub fn direct(pool: SymbolCode) -> Self {
        Self { hops: vec![pool] }
    }

    /// A two-hop path through an intermediate asset.
    #[must_use]
    pub fn two_hop(first: SymbolCode, second: SymbolCode) -> Self {
        Self {
            hops: vec![first, second],
        }
    }

    /// The pool ids in traversal order.
    #[must_use]
    pub fn hops(&self) -> &[SymbolCode] {
        &self.hops
    }
}

/// The selected path and its simulated return.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteQuote {
    /// The winning path.
    pub path: TradePath,
    /// Final output of the read-only simulation.
    pub amount_out: Asset,
}

/// Enumerates all candidate paths from `symbol_in` to `symbol_out`.
///
/// A direct path exists for every pool holding both symbols. A two-hop
/// path `(a, b)` exists when `a` connects the input to an intermediate
/// asset and `b` connects that intermediate to the output; pools that
/// already serve as a direct path never reappear as a hop, so no
/// redundant duplicate routes are produced.
///
/// # Errors
///
/// Returns [`AmmError::NoPathFound`] if the symbols are equal or no
/// candidate connects them.
pub fn find_trade_paths(
    store: &PoolStore,
    symbol_in: SymbolCode,
    symbol_out: SymbolCode,
) -> Result<Vec<TradePath>> {
    if symbol_in == symbol_out {
        return Err(AmmError::NoPathFound);
    }

    let mut paths = Vec::new();
    let mut first_hops: Vec<(SymbolCode, SymbolCode)> = Vec::new();
    for pool in store.pools() {
        let Some(side_in) = pool.side_of(symbol_in) else {
            continue;
        };
        let intermediate = pool.reserve(side_in.other()).symbol();
        if intermediate == symbol_out {
            paths.push(TradePath::direct(pool.id()));
        } else {
            first_hops.push((pool.id(), intermediate));
        }
    }

    for (first, intermediate) in first_hops {
        if let Some(second) = store.find_pair_id(intermediate, symbol_out) {
            paths.push(TradePath::two_hop(first, second));
        }
    }

    if paths.is_empty() {
        return Err(AmmError::NoPathFound);
    }
    Ok(paths)
}

/// Simulates `asset_in` end-to-end along `path` without committing
/// anything: each hop runs the ledger's swap computation against a
/// clone of its pool.
///
/// # Errors
///
/// Propagates ledger/solver errors from any hop, and
/// [`AmmError::PoolNotFound`] for a dangling hop id.
pub fn simulate_path(
    store: &PoolStore,
    path: &TradePath,
    asset_in: &Asset,
    fees: &FeePolicy,
    now: Timestamp,
) -> Result<Asset> {
    let mut carried = *asset_in;
    for &hop in path.hops() {
        let amplifier = store.effective_amplifier(hop, now)?;
        let pool = store.pool(hop)?;
        let outcome = ledger::quote(pool, &carried, amplifier, fees)?;
        carried = outcome.amount_out;
    }
    Ok(carried)
}

/// Finds the path from `asset_in` to `symbol_out` with the greatest
/// simulated return.
///
/// Paths that fail to simulate (an empty intermediate pool, a dust
/// amount that solves to nothing) are treated as yielding zero rather
/// than aborting the search.
///
/// # Errors
///
/// - [`AmmError::NoPathFound`] if no candidate path exists.
/// - [`AmmError::NoMatchingTrade`] if every candidate yields zero.
pub fn best_path(
    store: &PoolStore,
    asset_in: &Asset,
    symbol_out: SymbolCode,
    fees: &FeePolicy,
    now: Timestamp,
) -> Result<RouteQuote> {
    let paths = find_trade_paths(store, asset_in.symbol(), symbol_out)?;

    let mut best: Option<RouteQuote> = None;
    for path in paths {
        let Ok(amount_out) = simulate_path(store, &path, asset_in, fees, now) else {
            continue;
        };
        let improves = match &best {
            Some(current) => amount_out.amount() > current.amount_out.amount(),
            None => !amount_out.is_zero(),
        };
        if improves {
            best = Some(RouteQuote { path, amount_out });
        }
    }

    best.ok_or(AmmError::NoMatchingTrade)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Amount, Precision};
    use crate::pool::{PendingDeposit, Pool};

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

    /// Adds a pool and, when reserves are given, seeds it.
    fn add_pool(store: &mut PoolStore, id: &str, s0: &str, s1: &str, seed: Option<(u64, u64)>) {
        let Ok(pool) = Pool::new(sym(id), sym(s0), p4(), sym(s1), p4(), 450, Timestamp::new(1))
        else {
            panic!("valid pool");
        };
        let Ok(()) = store.create_pool(pool) else {
            panic!("create pool {id}");
        };
        if let Some((r0, r1)) = seed {
            let Ok(pool) = store.pool(sym(id)) else {
                panic!("pool {id}");
            };
            let mut pending = PendingDeposit::new(pool);
            let (Ok(()), Ok(())) = (
                pending.credit(&asset(r0, s0)),
                pending.credit(&asset(r1, s1)),
            ) else {
                panic!("credits");
            };
            let Ok(pool) = store.pool_mut(sym(id)) else {
                panic!("pool {id}");
            };
            let Ok(_) = ledger::deposit(pool, &pending, Timestamp::new(1)) else {
                panic!("seed {id}");
            };
        }
    }

    // -- find_trade_paths ---------------------------------------------------

    #[test]
    fn direct_path_found() {
        let mut store = PoolStore::new();
        add_pool(&mut store, "AB", "A", "B", Some((1_000_000, 1_000_000)));
        let Ok(paths) = find_trade_paths(&store, sym("A"), sym("B")) else {
            panic!("expected Ok");
        };
        assert_eq!(paths, vec![TradePath::direct(sym("AB"))]);
    }

    #[test]
    fn two_hop_path_found_without_direct_pool() {
        let mut store = PoolStore::new();
        add_pool(&mut store, "AB", "A", "B", Some((1_000_000, 1_000_000)));
        add_pool(&mut store, "BC", "B", "C", Some((1_000_000, 1_000_000)));
        let Ok(paths) = find_trade_paths(&store, sym("A"), sym("C")) else {
            panic!("expected Ok");
        };
        assert_eq!(paths, vec![TradePath::two_hop(sym("AB"), sym("BC"))]);
    }

    #[test]
    fn direct_and_two_hop_coexist() {
        let mut store = PoolStore::new();
        add_pool(&mut store, "AB", "A", "B", Some((1_000_000, 1_000_000)));
        add_pool(&mut store, "BC", "B", "C", Some((1_000_000, 1_000_000)));
        add_pool(&mut store, "AC", "A", "C", Some((1_000_000, 1_000_000)));
        let Ok(paths) = find_trade_paths(&store, sym("A"), sym("C")) else {
            panic!("expected Ok");
        };
        assert!(paths.contains(&TradePath::direct(sym("AC"))));
        assert!(paths.contains(&TradePath::two_hop(sym("AB"), sym("BC"))));
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn same_symbol_rejected() {
        let mut store = PoolStore::new();
        add_pool(&mut store, "AB", "A", "B", None);
        assert_eq!(
            find_trade_paths(&store, sym("A"), sym("A")),
            Err(AmmError::NoPathFound)
        );
    }

    #[test]
    fn unconnected_symbols_rejected() {
        let mut store = PoolStore::new();
        add_pool(&mut store, "AB", "A", "B", None);
        assert_eq!(
            find_trade_paths(&store, sym("A"), sym("Z")),
            Err(AmmError::NoPathFound)
        );
    }

    // -- simulate_path ------------------------------------------------------

    #[test]
    fn simulation_is_read_only() {
        let mut store = PoolStore::new();
        add_pool(&mut store, "AB", "A", "B", Some((1_000_000, 1_000_000)));
        let snapshot = store.clone();
        let path = TradePath::direct(sym("AB"));
        let Ok(out) = simulate_path(
            &store,
            &path,
            &asset(10_000, "A"),
            &FeePolicy::FREE,
            Timestamp::new(2),
        ) else {
            panic!("expected Ok");
        };
        assert!(out.amount().get() > 0);
        assert_eq!(out.symbol(), sym("B"));
        assert_eq!(store, snapshot);
    }

    #[test]
    fn two_hop_simulation_chains_outputs() {
        let mut store = PoolStore::new();
        add_pool(&mut store, "AB", "A", "B", Some((1_000_000, 1_000_000)));
        add_pool(&mut store, "BC", "B", "C", Some((1_000_000, 1_000_000)));
        let path = TradePath::two_hop(sym("AB"), sym("BC"));
        let Ok(out) = simulate_path(
            &store,
            &path,
            &asset(10_000, "A"),
            &FeePolicy::FREE,
            Timestamp::new(2),
        ) else {
            panic!("expected Ok");
        };
        assert_eq!(out.symbol(), sym("C"));
        // Two at-peg hops lose only slippage; output stays close to input.
        assert!(out.amount().get() > 9_900);
        assert!(out.amount().get() < 10_000);
    }

    // -- best_path ----------------------------------------------------------

    #[test]
    fn best_path_prefers_greater_return() {
        let mut store = PoolStore::new();
        // Direct pool is shallow, indirect route is deep: the router
        // must pick the two-hop path.
        add_pool(&mut store, "AC", "A", "C", Some((1_000, 1_000)));
        add_pool(&mut store, "AB", "A", "B", Some((100_000_000, 100_000_000)));
        add_pool(&mut store, "BC", "B", "C", Some((100_000_000, 100_000_000)));
        let Ok(quote) = best_path(
            &store,
            &asset(10_000, "A"),
            sym("C"),
            &FeePolicy::FREE,
            Timestamp::new(2),
        ) else {
            panic!("expected Ok");
        };
        assert_eq!(quote.path, TradePath::two_hop(sym("AB"), sym("BC")));
    }

    #[test]
    fn best_path_requires_liquidity() {
        let mut store = PoolStore::new();
        add_pool(&mut store, "AB", "A", "B", None);
        assert_eq!(
            best_path(
                &store,
                &asset(10_000, "A"),
                sym("B"),
                &FeePolicy::FREE,
                Timestamp::new(2),
            ),
            Err(AmmError::NoMatchingTrade)
        );
    }

    #[test]
    fn best_path_no_candidates() {
        let store = PoolStore::new();
        assert_eq!(
            best_path(
                &store,
                &asset(10_000, "A"),
                sym("B"),
                &FeePolicy::FREE,
                Timestamp::new(2),
            ),
            Err(AmmError::NoPathFound)
        );
    }

    #[test]
    fn empty_intermediate_pool_is_skipped() {
        let mut store = PoolStore::new();
        add_pool(&mut store, "AB", "A", "B", Some((1_000_000, 1_000_000)));
        add_pool(&mut store, "BC", "B", "C", None); // no liquidity
        add_pool(&mut store, "AD", "A", "D", Some((1_000_000, 1_000_000)));
        add_pool(&mut store, "DC", "D", "C", Some((1_000_000, 1_000_000)));
        let Ok(quote) = best_path(
            &store,
            &asset(10_000, "A"),
            sym("C"),
            &FeePolicy::FREE,
            Timestamp::new(2),
        ) else {
            panic!("expected Ok");
        };
        assert_eq!(quote.path, TradePath::two_hop(sym("AD"), sym("DC")));
    }
}
