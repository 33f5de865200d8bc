//! Explicit rounding direction for integer division.

use serde::{Deserialize, Serialize};

/// Rounding direction for divisions on domain quantities.
///
/// Every division in the engine names its rounding direction explicitly.
/// The engine's standing policy is [`Rounding::Down`] for anything paid
/// out of a pool and [`Rounding::Up`] for anything charged to a trader,
/// so rounding residue always accrues to the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rounding {
    /// Round toward positive infinity (ceiling).
    Up,
    /// Round toward zero (truncation).
    Down,
}

impl Rounding {
    /// Returns `true` for [`Rounding::Up`].
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }

    /// Returns `true` for [`Rounding::Down`].
    #[must_use]
    pub const fn is_down(&self) -> bool {
        matches!(self, Self::Down)
    }
}
