//! Two-state logic levels used in truth tables.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Not;

/// A binary logic level.
///
/// Genetic circuits are evaluated over fully specified input combinations, so
/// unlike HDL simulation there are no unknown or high-impedance states.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[repr(u8)]
pub enum Level {
    /// Logic low (0, "OFF").
    Low = 0,
    /// Logic high (1, "ON").
    High = 1,
}

impl Level {
    /// Converts a bit (`0` or non-zero) to a level.
    pub fn from_bit(bit: u8) -> Self {
        if bit == 0 {
            Level::Low
        } else {
            Level::High
        }
    }

    /// Returns `0` for [`Level::Low`] and `1` for [`Level::High`].
    pub fn as_bit(self) -> u8 {
        self as u8
    }

    /// Returns `true` for [`Level::High`].
    pub fn is_high(self) -> bool {
        self == Level::High
    }

    /// Two-input NOR: high iff both operands are low.
    pub fn nor(self, other: Level) -> Level {
        match (self, other) {
            (Level::Low, Level::Low) => Level::High,
            _ => Level::Low,
        }
    }

    /// Returns the level of input `position` (0 = most significant) in truth
    /// table row `row` of a table with `width` inputs.
    pub fn of_row(row: usize, position: usize, width: usize) -> Level {
        Level::from_bit(((row >> (width - 1 - position)) & 1) as u8)
    }
}

impl From<bool> for Level {
    fn from(value: bool) -> Self {
        if value {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl Not for Level {
    type Output = Self;

    fn not(self) -> Self {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_bit())
    }
}
