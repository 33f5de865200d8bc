//! The typed command surface.
//!
//! External collaborators hand the engine fully-parsed [`Command`]
//! values; the engine validates them against the configuration gate and
//! the store, drives the ledger transitions, and answers with a
//! [`Receipt`]: the settlement instructions the collaborator must
//! execute (token transfers, share issuance/retirement) plus telemetry
//! records. The engine itself never moves tokens.
//!
//! Multi-hop swaps are validated end-to-end by read-only simulation
//! before the first hop commits; the commit replays the identical
//! computation hop by hop, in path order.

use tracing::{debug, info};

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::domain::{AccountId, Asset, Precision, SymbolCode, Timestamp};
use crate::error::{AmmError, Result};
use crate::events::{LiquidityAction, LiquidityRecord, SwapRecord};
use crate::ledger;
use crate::pool::Pool;
use crate::ramp::AmplifierRamp;
use crate::router::{self, RouteQuote};
use crate::store::PoolStore;

/// A fully-typed engine request.
///
/// The memo-string conventions of the surrounding dispatch layer are
/// parsed *before* the core is invoked; nothing here is stringly typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Register a new, empty pool.
    CreatePool {
        /// Pool id, which doubles as the liquidity-share symbol.
        id: SymbolCode,
        /// Side-0 reserve asset symbol.
        symbol0: SymbolCode,
        /// Side-0 precision.
        precision0: Precision,
        /// Side-1 reserve asset symbol.
        symbol1: SymbolCode,
        /// Side-1 precision.
        precision1: Precision,
        /// Initial amplifier.
        amplifier: u64,
    },
    /// Swap `asset_in` for the best available return in
    /// `min_out`'s asset, across direct and two-hop paths.
    Swap {
        /// Trading party (receives the output unless `receiver` set).
        owner: AccountId,
        /// Input quantity.
        asset_in: Asset,
        /// Desired output asset and minimum acceptable return; an
        /// amount of zero disables the minimum check.
        min_out: Asset,
        /// Optional alternate recipient of the output.
        receiver: Option<AccountId>,
    },
    /// Credit one asset side to the owner's pending deposit.
    CreditDeposit {
        /// Depositing party.
        owner: AccountId,
        /// Target pool.
        pool: SymbolCode,
        /// Contributed quantity (must match one reserve side).
        asset: Asset,
    },
    /// Convert the owner's pending deposit into liquidity shares,
    /// refunding any off-ratio excess.
    FinalizeDeposit {
        /// Depositing party.
        owner: AccountId,
        /// Target pool.
        pool: SymbolCode,
    },
    /// Erase the owner's pending deposit and refund it in full.
    CancelDeposit {
        /// Depositing party.
        owner: AccountId,
        /// Target pool.
        pool: SymbolCode,
    },
    /// Retire liquidity shares for a proportional slice of reserves.
    Withdraw {
        /// Withdrawing party.
        owner: AccountId,
        /// Shares to retire; the symbol identifies the pool.
        shares: Asset,
    },
    /// Start (or replace) a linear amplifier ramp from the current
    /// effective value to `target_amplifier`.
    SetRamp {
        /// Target pool.
        pool: SymbolCode,
        /// Amplifier to reach at `end_time`.
        target_amplifier: u64,
        /// End of the ramp window.
        end_time: Timestamp,
    },
    /// Stop an active ramp, freezing the current interpolated value.
    StopRamp {
        /// Target pool.
        pool: SymbolCode,
    },
}

/// A settlement instruction for the external token collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Settlement {
    /// Transfer `asset` to `to`.
    Transfer {
        /// Receiving party.
        to: AccountId,
        /// Quantity to move.
        asset: Asset,
    },
    /// Issue newly minted liquidity shares to `to`.
    IssueShares {
        /// Receiving party.
        to: AccountId,
        /// Shares to issue.
        shares: Asset,
    },
    /// Retire previously issued liquidity shares.
    RetireShares {
        /// Shares to retire.
        shares: Asset,
    },
}

/// What one command execution produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Receipt {
    /// Instructions the collaborator must execute, in order.
    pub settlements: Vec<Settlement>,
    /// One record per swap hop.
    pub swaps: Vec<SwapRecord>,
    /// One record per liquidity change.
    pub liquidity: Vec<LiquidityRecord>,
}

/// The engine: a store handle plus the configuration gate.
#[derive(Debug)]
pub struct Engine<'a> {
    store: &'a mut PoolStore,
    config: &'a EngineConfig,
}

impl<'a> Engine<'a> {
    /// Binds an engine to a store and configuration.
    pub fn new(store: &'a mut PoolStore, config: &'a EngineConfig) -> Self {
        Self { store, config }
    }

    /// Executes one command to completion against a consistent store
    /// snapshot. Either the whole command applies, or the store is
    /// untouched (multi-hop swaps are pre-validated by simulation).
    ///
    /// # Errors
    ///
    /// Any precondition failure of the individual operation; the status
    /// gate rejects with [`AmmError::Suspended`].
    pub fn execute(&mut self, command: Command, now: Timestamp) -> Result<Receipt> {
        debug!(?command, now = now.get(), "executing command");
        match command {
            Command::CreatePool {
                id,
                symbol0,
                precision0,
                symbol1,
                precision1,
                amplifier,
            } => self.create_pool(id, symbol0, precision0, symbol1, precision1, amplifier, now),
            Command::Swap {
                owner,
                asset_in,
                min_out,
                receiver,
            } => self.swap(owner, asset_in, min_out, receiver, now),
            Command::CreditDeposit { owner, pool, asset } => {
                self.credit_deposit(owner, pool, &asset)
            }
            Command::FinalizeDeposit { owner, pool } => self.finalize_deposit(owner, pool, now),
            Command::CancelDeposit { owner, pool } => self.cancel_deposit(owner, pool),
            Command::Withdraw { owner, shares } => self.withdraw(owner, shares, now),
            Command::SetRamp {
                pool,
                target_amplifier,
                end_time,
            } => self.set_ramp(pool, target_amplifier, end_time, now),
            Command::StopRamp { pool } => self.stop_ramp(pool, now),
        }
    }

    /// Read-only best-return quote for a prospective swap.
    ///
    /// # Errors
    ///
    /// Same routing errors as an executed swap, without the status gate.
    pub fn quote_swap(
        &self,
        asset_in: &Asset,
        symbol_out: SymbolCode,
        now: Timestamp,
    ) -> Result<RouteQuote> {
        router::best_path(self.store, asset_in, symbol_out, self.config.fees(), now)
    }

    fn create_pool(
        &mut self,
        id: SymbolCode,
        symbol0: SymbolCode,
        precision0: Precision,
        symbol1: SymbolCode,
        precision1: Precision,
        amplifier: u64,
        now: Timestamp,
    ) -> Result<Receipt> {
        self.config.ensure_active()?;
        if amplifier > self.config.max_amplifier() {
            return Err(AmmError::InvalidAmplifier);
        }
        let pool = Pool::new(id, symbol0, precision0, symbol1, precision1, amplifier, now)?;
        self.store.create_pool(pool)?;
        info!(pool = %id, %symbol0, %symbol1, amplifier, "pool created");
        Ok(Receipt::default())
    }

    fn swap(
        &mut self,
        owner: AccountId,
        asset_in: Asset,
        min_out: Asset,
        receiver: Option<AccountId>,
        now: Timestamp,
    ) -> Result<Receipt> {
        self.config.ensure_active()?;

        // Full read-only validation pass before anything commits.
        let quote = router::best_path(
            self.store,
            &asset_in,
            min_out.symbol(),
            self.config.fees(),
            now,
        )?;
        if !min_out.is_zero() {
            if !min_out.same_unit(&quote.amount_out) {
                return Err(AmmError::ReserveMismatch(
                    "minimum return precision mismatch",
                ));
            }
            if quote.amount_out.amount() < min_out.amount() {
                return Err(AmmError::SlippageExceeded);
            }
        }

        // Commit hop by hop, strictly in path order. The computation is
        // the one the simulation already ran against the same snapshot,
        // so no hop can fail here.
        let fees = *self.config.fees();
        let mut receipt = Receipt::default();
        let mut carried = asset_in;
        for &hop in quote.path.hops() {
            let amplifier = self.store.resolve_amplifier(hop, now)?;
            let outcome = ledger::swap(self.store.pool_mut(hop)?, &carried, amplifier, &fees, now)?;

            if !outcome.protocol_fee.is_zero() {
                receipt.settlements.push(Settlement::Transfer {
                    to: self.config.fee_recipient().clone(),
                    asset: outcome.protocol_fee,
                });
            }

            let pool = self.store.pool(hop)?;
            let record = SwapRecord {
                pool: hop,
                owner: owner.clone(),
                amount_in: outcome.amount_in,
                amount_out: outcome.amount_out,
                fee: outcome.fee,
                protocol_fee: outcome.protocol_fee,
                trade_price: outcome.trade_price,
                reserve0: *pool.reserve0(),
                reserve1: *pool.reserve1(),
            };
            info!(
                target: "stableswap_amm::telemetry",
                pool = %record.pool,
                owner = %record.owner,
                amount_in = %record.amount_in,
                amount_out = %record.amount_out,
                fee = %record.fee,
                trade_price = record.trade_price,
                "swap"
            );
            receipt.swaps.push(record);

            carried = outcome.amount_out;
        }
        debug_assert_eq!(carried, quote.amount_out);

        receipt.settlements.push(Settlement::Transfer {
            to: receiver.unwrap_or(owner),
            asset: carried,
        });
        Ok(receipt)
    }

    fn credit_deposit(
        &mut self,
        owner: AccountId,
        pool: SymbolCode,
        asset: &Asset,
    ) -> Result<Receipt> {
        self.config.ensure_active()?;
        let pending = self.store.credit_pending(pool, &owner, asset)?;
        debug!(
            pool = %pool,
            owner = %owner,
            amount0 = %pending.amount0(),
            amount1 = %pending.amount1(),
            "deposit credited"
        );
        // The contributed tokens already sit with the engine's account;
        // nothing settles until finalization or cancellation.
        Ok(Receipt::default())
    }

    fn finalize_deposit(
        &mut self,
        owner: AccountId,
        pool_id: SymbolCode,
        now: Timestamp,
    ) -> Result<Receipt> {
        self.config.ensure_active()?;
        let pending = self
            .store
            .pending_deposit(pool_id, &owner)
            .ok_or(AmmError::DepositNotFound)?
            .clone();

        let outcome = ledger::deposit(self.store.pool_mut(pool_id)?, &pending, now)?;
        // The transition committed; the accumulator is consumed.
        self.store.take_pending(pool_id, &owner)?;

        let mut receipt = Receipt::default();
        receipt.settlements.push(Settlement::IssueShares {
            to: owner.clone(),
            shares: outcome.issued,
        });
        if !outcome.refund0.is_zero() {
            receipt.settlements.push(Settlement::Transfer {
                to: owner.clone(),
                asset: outcome.refund0,
            });
        }
        if !outcome.refund1.is_zero() {
            receipt.settlements.push(Settlement::Transfer {
                to: owner.clone(),
                asset: outcome.refund1,
            });
        }

        let pool = self.store.pool(pool_id)?;
        let record = LiquidityRecord {
            pool: pool_id,
            owner,
            action: LiquidityAction::Deposit,
            liquidity: outcome.issued,
            amount0: outcome.used0,
            amount1: outcome.used1,
            total_liquidity: *pool.liquidity(),
            reserve0: *pool.reserve0(),
            reserve1: *pool.reserve1(),
        };
        info!(
            target: "stableswap_amm::telemetry",
            pool = %record.pool,
            owner = %record.owner,
            liquidity = %record.liquidity,
            amount0 = %record.amount0,
            amount1 = %record.amount1,
            "deposit"
        );
        receipt.liquidity.push(record);
        Ok(receipt)
    }

    fn cancel_deposit(&mut self, owner: AccountId, pool_id: SymbolCode) -> Result<Receipt> {
        self.config.ensure_withdrawable()?;
        let pending = self.store.take_pending(pool_id, &owner)?;

        let mut receipt = Receipt::default();
        if !pending.amount0().is_zero() {
            receipt.settlements.push(Settlement::Transfer {
                to: owner.clone(),
                asset: *pending.amount0(),
            });
        }
        if !pending.amount1().is_zero() {
            receipt.settlements.push(Settlement::Transfer {
                to: owner.clone(),
                asset: *pending.amount1(),
            });
        }

        let pool = self.store.pool(pool_id)?;
        let record = LiquidityRecord {
            pool: pool_id,
            owner,
            action: LiquidityAction::Cancel,
            liquidity: pool.liquidity().with_amount(crate::domain::Amount::ZERO),
            amount0: *pending.amount0(),
            amount1: *pending.amount1(),
            total_liquidity: *pool.liquidity(),
            reserve0: *pool.reserve0(),
            reserve1: *pool.reserve1(),
        };
        info!(
            target: "stableswap_amm::telemetry",
            pool = %record.pool,
            owner = %record.owner,
            amount0 = %record.amount0,
            amount1 = %record.amount1,
            "deposit cancelled"
        );
        receipt.liquidity.push(record);
        Ok(receipt)
    }

    fn withdraw(&mut self, owner: AccountId, shares: Asset, now: Timestamp) -> Result<Receipt> {
        self.config.ensure_withdrawable()?;
        let pool_id = shares.symbol();
        let outcome = ledger::withdraw(self.store.pool_mut(pool_id)?, &shares, now)?;

        let mut receipt = Receipt::default();
        receipt.settlements.push(Settlement::RetireShares {
            shares: outcome.retired,
        });
        if !outcome.amount0.is_zero() {
            receipt.settlements.push(Settlement::Transfer {
                to: owner.clone(),
                asset: outcome.amount0,
            });
        }
        if !outcome.amount1.is_zero() {
            receipt.settlements.push(Settlement::Transfer {
                to: owner.clone(),
                asset: outcome.amount1,
            });
        }

        let pool = self.store.pool(pool_id)?;
        let record = LiquidityRecord {
            pool: pool_id,
            owner,
            action: LiquidityAction::Withdraw,
            liquidity: outcome.retired,
            amount0: outcome.amount0,
            amount1: outcome.amount1,
            total_liquidity: *pool.liquidity(),
            reserve0: *pool.reserve0(),
            reserve1: *pool.reserve1(),
        };
        info!(
            target: "stableswap_amm::telemetry",
            pool = %record.pool,
            owner = %record.owner,
            liquidity = %record.liquidity,
            amount0 = %record.amount0,
            amount1 = %record.amount1,
            "withdraw"
        );
        receipt.liquidity.push(record);
        Ok(receipt)
    }

    fn set_ramp(
        &mut self,
        pool: SymbolCode,
        target_amplifier: u64,
        end_time: Timestamp,
        now: Timestamp,
    ) -> Result<Receipt> {
        self.config.ensure_active()?;
        let current = self.store.effective_amplifier(pool, now)?;
        let ramp = AmplifierRamp::new(
            current,
            target_amplifier,
            now,
            end_time,
            self.config.min_ramp_duration(),
            self.config.max_amplifier(),
        )?;
        self.store.set_ramp(pool, ramp)?;
        info!(pool = %pool, from = current, to = target_amplifier, end = end_time.get(), "ramp started");
        Ok(Receipt::default())
    }

    fn stop_ramp(&mut self, pool: SymbolCode, now: Timestamp) -> Result<Receipt> {
        self.config.ensure_active()?;
        let frozen = self.store.stop_ramp(pool, now)?;
        info!(pool = %pool, amplifier = frozen, "ramp stopped");
        Ok(Receipt::default())
    }
}
