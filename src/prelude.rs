//! Convenience re-exports for common types.
//!
//! ```rust
//! use stableswap_amm::prelude::*;
//! ```

pub use crate::config::{EngineConfig, FeePolicy, OperationalStatus};
pub use crate::domain::{
    AccountId, Amount, Asset, BasisPoints, Precision, Rounding, SymbolCode, Timestamp,
};
pub use crate::engine::{Command, Engine, Receipt, Settlement};
pub use crate::error::{AmmError, Result};
pub use crate::events::{LiquidityAction, LiquidityRecord, SwapRecord};
pub use crate::pool::{PendingDeposit, Pool, Side};
pub use crate::ramp::AmplifierRamp;
pub use crate::router::{RouteQuote, TradePath};
pub use crate::store::PoolStore;
