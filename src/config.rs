//! Engine configuration surface.
//!
//! Owned by an external collaborator and read by the core: fee rates,
//! the protocol fee recipient, amplifier and ramp bounds, and the
//! operational status gate. The engine refuses swaps and deposits
//! whenever the status forbids them and permits only withdrawals (and
//! pending-deposit cancellation) in the withdraw-only state.

use serde::{Deserialize, Serialize};

use crate::domain::{AccountId, BasisPoints};
use crate::error::{AmmError, Result};
use crate::ramp::{MAX_AMP, MIN_RAMP_DURATION};

/// Operational status of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationalStatus {
    /// All operations permitted.
    #[default]
    Normal,
    /// Only liquidity withdrawal and deposit cancellation permitted.
    WithdrawOnly,
    /// No operations permitted.
    Halted,
}

/// The two fee legs charged on a swap.
///
/// The trade fee is taken out of the gross output and implicitly
/// retained by the pool for liquidity providers; the protocol fee is
/// taken out of the input and paid to the fee recipient before the
/// reserve is credited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeePolicy {
    trade_fee: BasisPoints,
    protocol_fee: BasisPoints,
}

impl FeePolicy {
    /// Creates a fee policy, validating the combined rate.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::FeeTooHigh`] if the two legs together exceed
    /// 100%.
    pub const fn new(trade_fee: BasisPoints, protocol_fee: BasisPoints) -> Result<Self> {
        if trade_fee.get() as u64 + protocol_fee.get() as u64 > BasisPoints::MAX_PERCENT.get() as u64 {
            return Err(AmmError::FeeTooHigh);
        }
        Ok(Self {
            trade_fee,
            protocol_fee,
        })
    }

    /// A zero-fee policy, mostly useful in tests.
    pub const FREE: Self = Self {
        trade_fee: BasisPoints::ZERO,
        protocol_fee: BasisPoints::ZERO,
    };

    /// Returns the trade (liquidity-provider) fee rate.
    #[must_use]
    pub const fn trade_fee(&self) -> BasisPoints {
        self.trade_fee
    }

    /// Returns the protocol fee rate.
    #[must_use]
    pub const fn protocol_fee(&self) -> BasisPoints {
        self.protocol_fee
    }
}

/// Global engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    fees: FeePolicy,
    fee_recipient: AccountId,
    max_amplifier: u64,
    min_ramp_duration: u64,
    status: OperationalStatus,
}

impl EngineConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidAmplifier`] if `max_amplifier` is zero or
    ///   above the global ceiling.
    /// - [`AmmError::InvalidDuration`] if `min_ramp_duration` is zero.
    pub fn new(
        fees: FeePolicy,
        fee_recipient: AccountId,
        max_amplifier: u64,
        min_ramp_duration: u64,
    ) -> Result<Self> {
        if max_amplifier == 0 || max_amplifier > MAX_AMP {
            return Err(AmmError::InvalidAmplifier);
        }
        if min_ramp_duration == 0 {
            return Err(AmmError::InvalidDuration);
        }
        Ok(Self {
            fees,
            fee_recipient,
            max_amplifier,
            min_ramp_duration,
            status: OperationalStatus::Normal,
        })
    }

    /// A configuration with the global defaults and the given fee
    /// recipient.
    ///
    /// # Errors
    ///
    /// Propagates validation errors from [`EngineConfig::new`].
    pub fn with_defaults(fees: FeePolicy, fee_recipient: AccountId) -> Result<Self> {
        Self::new(fees, fee_recipient, MAX_AMP, MIN_RAMP_DURATION)
    }

    /// Returns the fee policy.
    #[must_use]
    pub const fn fees(&self) -> &FeePolicy {
        &self.fees
    }

    /// Returns the protocol fee recipient.
    #[must_use]
    pub const fn fee_recipient(&self) -> &AccountId {
        &self.fee_recipient
    }

    /// Returns the maximum amplifier pools may be configured with.
    #[must_use]
    pub const fn max_amplifier(&self) -> u64 {
        self.max_amplifier
    }

    /// Returns the minimum ramp window, in seconds.
    #[must_use]
    pub const fn min_ramp_duration(&self) -> u64 {
        self.min_ramp_duration
    }

    /// Returns the current operational status.
    #[must_use]
    pub const fn status(&self) -> OperationalStatus {
        self.status
    }

    /// Sets the operational status (collaborator-driven).
    pub fn set_status(&mut self, status: OperationalStatus) {
        self.status = status;
    }

    /// Rejects unless all operations are permitted.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Suspended`] unless the status is `Normal`.
    pub const fn ensure_active(&self) -> Result<()> {
        match self.status {
            OperationalStatus::Normal => Ok(()),
            _ => Err(AmmError::Suspended),
        }
    }

    /// Rejects unless withdrawals are permitted.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Suspended`] when halted.
    pub const fn ensure_withdrawable(&self) -> Result<()> {
        match self.status {
            OperationalStatus::Normal | OperationalStatus::WithdrawOnly => Ok(()),
            OperationalStatus::Halted => Err(AmmError::Suspended),
        }
    }
}
