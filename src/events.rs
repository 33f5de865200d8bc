//! Telemetry records.
//!
//! Fire-and-forget observational payloads describing what a transition
//! did: one record per swap hop, one per liquidity change. The engine
//! both emits them through `tracing` and returns them in the execution
//! receipt; they are not part of the correctness contract.

use serde::{Deserialize, Serialize};

use crate::domain::{AccountId, Asset, SymbolCode};

/// Which liquidity transition a [`LiquidityRecord`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiquidityAction {
    /// Pending deposit finalized into shares.
    Deposit,
    /// Shares retired for reserves.
    Withdraw,
    /// Pending deposit cancelled and refunded.
    Cancel,
}

/// One executed swap against one pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapRecord {
    /// Pool traded against.
    pub pool: SymbolCode,
    /// Trading party.
    pub owner: AccountId,
    /// Input quantity supplied.
    pub amount_in: Asset,
    /// Output quantity delivered.
    pub amount_out: Asset,
    /// Trading fee retained by the pool, in output units.
    pub fee: Asset,
    /// Protocol fee carved from the input.
    pub protocol_fee: Asset,
    /// Delivered output per input unit at working precision.
    pub trade_price: f64,
    /// Side-0 reserve after the swap.
    pub reserve0: Asset,
    /// Side-1 reserve after the swap.
    pub reserve1: Asset,
}

/// One liquidity change against one pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidityRecord {
    /// Pool affected.
    pub pool: SymbolCode,
    /// Depositing / withdrawing party.
    pub owner: AccountId,
    /// Which transition produced this record.
    pub action: LiquidityAction,
    /// Shares issued or retired (zero for a cancel).
    pub liquidity: Asset,
    /// Side-0 reserve delta, as moved (absorbed, paid out, or refunded).
    pub amount0: Asset,
    /// Side-1 reserve delta, as moved.
    pub amount1: Asset,
    /// Outstanding share supply after the transition.
    pub total_liquidity: Asset,
    /// Side-0 reserve after the transition.
    pub reserve0: Asset,
    /// Side-1 reserve after the transition.
    pub reserve1: Asset,
}
