//! Gradual amplifier adjustment.
//!
//! A pool's amplifier may be moved to a new value only by linear
//! interpolation over a time window, never by an instantaneous jump —
//! a sudden curvature change would reprice every reserve at once.
//! At most one ramp is active per pool; creating a new one replaces it,
//! and once the window has elapsed the pool's stored amplifier is
//! snapped to the target.

use serde::{Deserialize, Serialize};

use crate::domain::Timestamp;
use crate::error::{AmmError, Result};

/// Minimum legal amplifier.
pub const MIN_AMP: u64 = 1;

/// Maximum legal amplifier.
pub const MAX_AMP: u64 = 1_000_000;

/// Default minimum ramp duration, in seconds (one day).
pub const MIN_RAMP_DURATION: u64 = 86_400;

/// A linear amplifier ramp for one pool.
///
/// Consulted — never mutated — by every invariant computation to derive
/// the pool's effective amplifier at a given instant:
///
/// ```text
/// A(t) = A₀ + (A₁ − A₀)·(t − t₀)/(t₁ − t₀)
/// ```
///
/// clamped to `A₁` for `t ≥ t₁`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmplifierRamp {
    start_amplifier: u64,
    target_amplifier: u64,
    start_time: Timestamp,
    end_time: Timestamp,
}

impl AmplifierRamp {
    /// Creates a validated ramp.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidAmplifier`] if either endpoint is zero or
    ///   above `max_amplifier`.
    /// - [`AmmError::InvalidDuration`] if the window is non-positive or
    ///   shorter than `min_duration` seconds.
    pub fn new(
        start_amplifier: u64,
        target_amplifier: u64,
        start_time: Timestamp,
        end_time: Timestamp,
        min_duration: u64,
        max_amplifier: u64,
    ) -> Result<Self> {
        if start_amplifier < MIN_AMP || start_amplifier > max_amplifier {
            return Err(AmmError::InvalidAmplifier);
        }
        if target_amplifier < MIN_AMP || target_amplifier > max_amplifier {
            return Err(AmmError::InvalidAmplifier);
        }
        let Some(duration) = end_time.seconds_since(start_time) else {
            return Err(AmmError::InvalidDuration);
        };
        if duration == 0 || duration < min_duration {
            return Err(AmmError::InvalidDuration);
        }
        Ok(Self {
            start_amplifier,
            target_amplifier,
            start_time,
            end_time,
        })
    }

    /// Returns the starting amplifier `A₀`.
    #[must_use]
    pub const fn start_amplifier(&self) -> u64 {
        self.start_amplifier
    }

    /// Returns the target amplifier `A₁`.
    #[must_use]
    pub const fn target_amplifier(&self) -> u64 {
        self.target_amplifier
    }

    /// Returns the ramp start time `t₀`.
    #[must_use]
    pub const fn start_time(&self) -> Timestamp {
        self.start_time
    }

    /// Returns the ramp end time `t₁`.
    #[must_use]
    pub const fn end_time(&self) -> Timestamp {
        self.end_time
    }

    /// Returns `true` once the window has fully elapsed.
    #[must_use]
    pub fn is_complete(&self, now: Timestamp) -> bool {
        now >= self.end_time
    }

    /// The effective amplifier at `now`.
    ///
    /// Before `t₀` this is `A₀`; at or after `t₁` it is exactly `A₁`,
    /// however many times it is queried.
    #[must_use]
    pub fn amplifier_at(&self, now: Timestamp) -> u64 {
        if now <= self.start_time {
            return self.start_amplifier;
        }
        if now >= self.end_time {
            return self.target_amplifier;
        }
        // Window bounds guarantee both differences are nonzero and the
        // products fit i128: amplifiers ≤ 10⁶, durations < 2⁶⁴.
        let elapsed = (now.get() - self.start_time.get()) as i128;
        let window = (self.end_time.get() - self.start_time.get()) as i128;
        let a0 = self.start_amplifier as i128;
        let a1 = self.target_amplifier as i128;
        let interpolated = a0 + (a1 - a0) * elapsed / window;
        interpolated as u64
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn ramp(a0: u64, a1: u64, t0: u64, t1: u64) -> AmplifierRamp {
        let Ok(r) = AmplifierRamp::new(
            a0,
            a1,
            Timestamp::new(t0),
            Timestamp::new(t1),
            MIN_RAMP_DURATION,
            MAX_AMP,
        ) else {
            panic!("valid ramp");
        };
        r
    }

    // -- Validation ---------------------------------------------------------

    #[test]
    fn rejects_zero_target() {
        let result = AmplifierRamp::new(
            100,
            0,
            Timestamp::new(0),
            Timestamp::new(100_000),
            MIN_RAMP_DURATION,
            MAX_AMP,
        );
        assert_eq!(result, Err(AmmError::InvalidAmplifier));
    }

    #[test]
    fn rejects_target_above_maximum() {
        let result = AmplifierRamp::new(
            100,
            MAX_AMP + 1,
            Timestamp::new(0),
            Timestamp::new(100_000),
            MIN_RAMP_DURATION,
            MAX_AMP,
        );
        assert_eq!(result, Err(AmmError::InvalidAmplifier));
    }

    #[test]
    fn rejects_inverted_window() {
        let result = AmplifierRamp::new(
            100,
            200,
            Timestamp::new(100_000),
            Timestamp::new(0),
            MIN_RAMP_DURATION,
            MAX_AMP,
        );
        assert_eq!(result, Err(AmmError::InvalidDuration));
    }

    #[test]
    fn rejects_window_below_minimum() {
        let result = AmplifierRamp::new(
            100,
            200,
            Timestamp::new(0),
            Timestamp::new(MIN_RAMP_DURATION - 1),
            MIN_RAMP_DURATION,
            MAX_AMP,
        );
        assert_eq!(result, Err(AmmError::InvalidDuration));
    }

    #[test]
    fn accepts_exact_minimum_window() {
        let r = ramp(100, 200, 0, MIN_RAMP_DURATION);
        assert_eq!(r.start_amplifier(), 100);
        assert_eq!(r.target_amplifier(), 200);
    }

    // -- Interpolation ------------------------------------------------------

    #[test]
    fn interpolates_upward() {
        let r = ramp(100, 300, 0, 100_000);
        assert_eq!(r.amplifier_at(Timestamp::new(0)), 100);
        assert_eq!(r.amplifier_at(Timestamp::new(50_000)), 200);
        assert_eq!(r.amplifier_at(Timestamp::new(100_000)), 300);
    }

    #[test]
    fn interpolates_downward() {
        let r = ramp(300, 100, 0, 100_000);
        assert_eq!(r.amplifier_at(Timestamp::new(25_000)), 250);
        assert_eq!(r.amplifier_at(Timestamp::new(75_000)), 150);
    }

    #[test]
    fn clamps_before_start() {
        let r = ramp(100, 300, 1_000_000, 1_100_000);
        assert_eq!(r.amplifier_at(Timestamp::new(0)), 100);
    }

    #[test]
    fn snap_after_end_is_idempotent() {
        let r = ramp(100, 300, 0, 100_000);
        for t in [100_000u64, 100_001, 500_000, u64::MAX] {
            assert_eq!(r.amplifier_at(Timestamp::new(t)), 300);
            assert!(r.is_complete(Timestamp::new(t)));
        }
    }

    #[test]
    fn not_complete_before_end() {
        let r = ramp(100, 300, 0, 100_000);
        assert!(!r.is_complete(Timestamp::new(99_999)));
    }
}
