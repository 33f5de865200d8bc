//! # StableSwap AMM
//!
//! An automated market-making engine on the StableSwap bonding curve:
//! it prices and executes swaps between two reserve assets per pool,
//! tracks proportional liquidity shares, routes trades across pools
//! (direct and two-hop), and ramps the curvature parameter smoothly
//! over time.
//!
//! The engine is a pure state machine. Token transfers, persistence,
//! and authorization belong to external collaborators: commands arrive
//! fully typed, and every execution answers with settlement
//! instructions for the collaborator to carry out.
//!
//! # Design rules
//!
//! - **Exact integer math.** Swap amounts come out of a fixed-point
//!   Newton solver over `u128` intermediates; floating point appears
//!   only in derived metrics (prices, virtual price), never in solved
//!   amounts.
//! - **Fail fast, mutate last.** Every transition validates completely
//!   before touching state; there is no partial application and no
//!   rollback machinery.
//! - **Rounding favours the pool.** Outbound quantities truncate;
//!   rounding residue accrues to liquidity providers.
//!
//! # Quick start
//!
//! ```
//! use stableswap_amm::config::{EngineConfig, FeePolicy};
//! use stableswap_amm::domain::{
//!     AccountId, Amount, Asset, BasisPoints, Precision, SymbolCode, Timestamp,
//! };
//! use stableswap_amm::engine::{Command, Engine};
//! use stableswap_amm::store::PoolStore;
//!
//! let fees = FeePolicy::new(BasisPoints::new(4), BasisPoints::new(1)).expect("fees in range");
//! let config = EngineConfig::with_defaults(fees, AccountId::new("feepot")).expect("valid config");
//! let mut store = PoolStore::new();
//! let now = Timestamp::new(1_700_000_000);
//!
//! let a = SymbolCode::new("A").expect("valid symbol");
//! let b = SymbolCode::new("B").expect("valid symbol");
//! let p4 = Precision::new(4).expect("valid precision");
//!
//! let mut engine = Engine::new(&mut store, &config);
//! engine
//!     .execute(
//!         Command::CreatePool {
//!             id: SymbolCode::new("AB").expect("valid symbol"),
//!             symbol0: a,
//!             precision0: p4,
//!             symbol1: b,
//!             precision1: p4,
//!             amplifier: 450,
//!         },
//!         now,
//!     )
//!     .expect("pool created");
//!
//! // Seed liquidity, then trade.
//! let alice = AccountId::new("alice");
//! for asset in [
//!     Asset::new(Amount::new(1_000_0000), a, p4),
//!     Asset::new(Amount::new(1_000_0000), b, p4),
//! ] {
//!     engine
//!         .execute(
//!             Command::CreditDeposit {
//!                 owner: alice.clone(),
//!                 pool: SymbolCode::new("AB").expect("valid symbol"),
//!                 asset,
//!             },
//!             now,
//!         )
//!         .expect("credited");
//! }
//! engine
//!     .execute(
//!         Command::FinalizeDeposit {
//!             owner: alice.clone(),
//!             pool: SymbolCode::new("AB").expect("valid symbol"),
//!         },
//!         now,
//!     )
//!     .expect("liquidity issued");
//!
//! let receipt = engine
//!     .execute(
//!         Command::Swap {
//!             owner: alice,
//!             asset_in: Asset::new(Amount::new(10_0000), a, p4),
//!             min_out: Asset::new(Amount::ZERO, b, p4),
//!             receiver: None,
//!         },
//!         now,
//!     )
//!     .expect("swap executed");
//! assert!(!receipt.swaps.is_empty());
//! ```
//!
//! # Module guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Newtype value types: [`Amount`](domain::Amount), [`Asset`](domain::Asset), [`SymbolCode`](domain::SymbolCode), … |
//! | [`math`] | The precision normalizer and the Newton invariant solver |
//! | [`pool`] | The [`Pool`](pool::Pool) record and [`PendingDeposit`](pool::PendingDeposit) |
//! | [`ledger`] | Swap / deposit / withdraw state transitions |
//! | [`accountant`] | Share issuance and retirement formulas |
//! | [`ramp`] | Linear amplifier ramps |
//! | [`router`] | Path discovery and best-return selection |
//! | [`store`] | The explicit ledger store passed into every operation |
//! | [`engine`] | Typed commands in, settlement instructions out |
//! | [`config`] | Fees, bounds, and the operational status gate |
//! | [`events`] | Telemetry records |
//! | [`error`] | The unified [`AmmError`](error::AmmError) enum |

pub mod accountant;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod events;
pub mod ledger;
pub mod math;
pub mod pool;
pub mod prelude;
pub mod ramp;
pub mod router;
pub mod store;

#[cfg(test)]
mod properties;
