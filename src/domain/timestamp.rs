//! Second-resolution timestamps.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A point in time, in whole seconds since the Unix epoch.
///
/// Second resolution matches the ledger the engine settles against; the
/// amplifier-ramp interpolation is integer arithmetic over these values.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch itself.
    pub const ZERO: Self = Self(0);

    /// Creates a timestamp from seconds since the epoch.
    #[must_use]
    pub const fn new(seconds: u64) -> Self {
        Self(seconds)
    }

    /// Returns seconds since the epoch.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Returns the timestamp advanced by `seconds`, saturating at the
    /// representable maximum.
    #[must_use]
    pub const fn saturating_add(&self, seconds: u64) -> Self {
        Self(self.0.saturating_add(seconds))
    }

    /// Seconds elapsed since `earlier`, or `None` if `earlier` is later
    /// than `self`.
    #[must_use]
    pub const fn seconds_since(&self, earlier: Self) -> Option<u64> {
        self.0.checked_sub(earlier.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
