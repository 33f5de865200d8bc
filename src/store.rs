//! The explicit ledger store.
//!
//! Pools, amplifier ramps, and pending deposits live in one store value
//! that is passed into every operation — there is no ambient state. The
//! storage collaborator persists the store and serializes concurrent
//! triggers against it; the engine assumes each invocation runs against
//! a consistent snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{AccountId, Asset, SymbolCode, Timestamp};
use crate::error::{AmmError, Result};
use crate::pool::{PendingDeposit, Pool};
use crate::ramp::AmplifierRamp;

/// In-memory ledger: every record the core declares as durable state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolStore {
    pools: BTreeMap<SymbolCode, Pool>,
    ramps: BTreeMap<SymbolCode, AmplifierRamp>,
    pending: BTreeMap<SymbolCode, BTreeMap<AccountId, PendingDeposit>>,
}

impl PoolStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- pools --------------------------------------------------------------

    /// Registers a new pool.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolAlreadyExists`] if the id is taken or a
    /// pool for the same reserve pair (in either order) already exists.
    pub fn create_pool(&mut self, pool: Pool) -> Result<()> {
        if self.pools.contains_key(&pool.id()) {
            return Err(AmmError::PoolAlreadyExists);
        }
        if self
            .find_pair_id(pool.reserve0().symbol(), pool.reserve1().symbol())
            .is_some()
        {
            return Err(AmmError::PoolAlreadyExists);
        }
        self.pools.insert(pool.id(), pool);
        Ok(())
    }

    /// Looks up a pool by id.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolNotFound`] if absent.
    pub fn pool(&self, id: SymbolCode) -> Result<&Pool> {
        self.pools.get(&id).ok_or(AmmError::PoolNotFound)
    }

    /// Mutable pool lookup — crate-internal so all mutation stays behind
    /// the ledger transitions.
    pub(crate) fn pool_mut(&mut self, id: SymbolCode) -> Result<&mut Pool> {
        self.pools.get_mut(&id).ok_or(AmmError::PoolNotFound)
    }

    /// Iterates all pools in id order.
    pub fn pools(&self) -> impl Iterator<Item = &Pool> {
        self.pools.values()
    }

    /// Number of registered pools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// Returns `true` if no pools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Finds the pool connecting two asset symbols, checking both
    /// reserve orderings.
    #[must_use]
    pub fn find_pair_id(&self, symbol_a: SymbolCode, symbol_b: SymbolCode) -> Option<SymbolCode> {
        self.pools
            .values()
            .find(|pool| {
                (pool.reserve0().symbol() == symbol_a && pool.reserve1().symbol() == symbol_b)
                    || (pool.reserve0().symbol() == symbol_b
                        && pool.reserve1().symbol() == symbol_a)
            })
            .map(Pool::id)
    }

    // -- ramps --------------------------------------------------------------

    /// Installs (or replaces) the amplifier ramp for a pool.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolNotFound`] if the pool does not exist.
    pub fn set_ramp(&mut self, id: SymbolCode, ramp: AmplifierRamp) -> Result<()> {
        self.pool(id)?;
        self.ramps.insert(id, ramp);
        Ok(())
    }

    /// Returns the active ramp for a pool, if any.
    #[must_use]
    pub fn ramp(&self, id: SymbolCode) -> Option<&AmplifierRamp> {
        self.ramps.get(&id)
    }

    /// The pool's effective amplifier at `now`: the ramp interpolation
    /// when a ramp is present, the stored amplifier otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolNotFound`] if the pool does not exist.
    pub fn effective_amplifier(&self, id: SymbolCode, now: Timestamp) -> Result<u64> {
        let pool = self.pool(id)?;
        Ok(match self.ramps.get(&id) {
            Some(ramp) => ramp.amplifier_at(now),
            None => pool.amplifier(),
        })
    }

    /// Like [`effective_amplifier`](Self::effective_amplifier), but
    /// snaps an elapsed ramp: the stored amplifier becomes the target
    /// and the ramp record is removed.
    ///
    /// Called by mutating transitions; read-only simulation uses
    /// [`effective_amplifier`](Self::effective_amplifier), which returns
    /// the same value for an elapsed ramp.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolNotFound`] if the pool does not exist.
    pub fn resolve_amplifier(&mut self, id: SymbolCode, now: Timestamp) -> Result<u64> {
        let effective = self.effective_amplifier(id, now)?;
        if self.ramps.get(&id).is_some_and(|ramp| ramp.is_complete(now)) {
            self.ramps.remove(&id);
            self.pool_mut(id)?.amplifier = effective;
        }
        Ok(effective)
    }

    /// Stops an active ramp, freezing the current interpolated value as
    /// the pool's static amplifier.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PoolNotFound`] if the pool does not exist.
    /// - [`AmmError::RampNotFound`] if no ramp is active.
    pub fn stop_ramp(&mut self, id: SymbolCode, now: Timestamp) -> Result<u64> {
        self.pool(id)?;
        let ramp = self.ramps.remove(&id).ok_or(AmmError::RampNotFound)?;
        let frozen = ramp.amplifier_at(now);
        self.pool_mut(id)?.amplifier = frozen;
        Ok(frozen)
    }

    // -- pending deposits ---------------------------------------------------

    /// Credits one asset side to the owner's pending deposit for a
    /// pool, creating the accumulator on first contribution.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PoolNotFound`] if the pool does not exist.
    /// - [`AmmError::ReserveMismatch`] / [`AmmError::InvalidAmount`]
    ///   from [`PendingDeposit::credit`].
    pub fn credit_pending(
        &mut self,
        id: SymbolCode,
        owner: &AccountId,
        asset: &Asset,
    ) -> Result<PendingDeposit> {
        let pool = self.pool(id)?;
        let mut updated = match self.pending.get(&id).and_then(|m| m.get(owner)) {
            Some(existing) => existing.clone(),
            None => PendingDeposit::new(pool),
        };
        // Validate the credit before the map is touched.
        updated.credit(asset)?;
        self.pending
            .entry(id)
            .or_default()
            .insert(owner.clone(), updated.clone());
        Ok(updated)
    }

    /// Returns the owner's pending deposit for a pool, if any.
    #[must_use]
    pub fn pending_deposit(&self, id: SymbolCode, owner: &AccountId) -> Option<&PendingDeposit> {
        self.pending.get(&id)?.get(owner)
    }

    /// Removes and returns the owner's pending deposit.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::DepositNotFound`] if nothing is pending.
    pub fn take_pending(&mut self, id: SymbolCode, owner: &AccountId) -> Result<PendingDeposit> {
        let per_pool = self.pending.get_mut(&id).ok_or(AmmError::DepositNotFound)?;
        let taken = per_pool.remove(owner).ok_or(AmmError::DepositNotFound)?;
        if per_pool.is_empty() {
            self.pending.remove(&id);
        }
        Ok(taken)
    }
}
