//! Delay value types stored in the timing file.
//!
//! Values are kept exactly as supplied by the vendor file (signed integer
//! time units); nothing here rescales or reinterprets them.

use serde::{Deserialize, Serialize};

/// Rise-minimum value marking an arc that is not physically connected.
pub const NOT_CONNECTED: i32 = 123_456;

/// A min/typ/max delay triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TimingDelay {
    /// Minimum delay.
    pub min: i32,
    /// Typical delay.
    pub typ: i32,
    /// Maximum delay.
    pub max: i32,
}

impl TimingDelay {
    /// A zero delay.
    pub const ZERO: Self = Self {
        min: 0,
        typ: 0,
        max: 0,
    };

    /// Creates a delay triple from its three components.
    pub const fn new(min: i32, typ: i32, max: i32) -> Self {
        Self { min, typ, max }
    }

    /// Returns the componentwise sum of two triples, or `None` on overflow.
    pub fn add(self, other: Self) -> Option<Self> {
        Some(Self {
            min: self.min.checked_add(other.min)?,
            typ: self.typ.checked_add(other.typ)?,
            max: self.max.checked_add(other.max)?,
        })
    }

    /// Returns the componentwise difference `self - other`, or `None` on
    /// overflow.
    pub fn sub(self, other: Self) -> Option<Self> {
        Some(Self {
            min: self.min.checked_sub(other.min)?,
            typ: self.typ.checked_sub(other.typ)?,
            max: self.max.checked_sub(other.max)?,
        })
    }
}

/// Rise and fall delays of one timing arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TimingArc {
    /// Delay for a rising output transition.
    pub rise: TimingDelay,
    /// Delay for a falling output transition.
    pub fall: TimingDelay,
}

impl TimingArc {
    /// An arc with zero rise and fall delay.
    pub const ZERO: Self = Self {
        rise: TimingDelay::ZERO,
        fall: TimingDelay::ZERO,
    };

    /// The arc value the vendor file uses for unconnected positions.
    pub const UNCONNECTED: Self = Self {
        rise: TimingDelay::new(NOT_CONNECTED, NOT_CONNECTED, NOT_CONNECTED),
        fall: TimingDelay::new(NOT_CONNECTED, NOT_CONNECTED, NOT_CONNECTED),
    };

    /// Creates an arc from rise and fall triples.
    pub const fn new(rise: TimingDelay, fall: TimingDelay) -> Self {
        Self { rise, fall }
    }

    /// Creates an arc whose rise and fall delays are the same triple.
    pub const fn symmetric(delay: TimingDelay) -> Self {
        Self {
            rise: delay,
            fall: delay,
        }
    }

    /// Returns the componentwise sum over rise and fall, or `None` on
    /// overflow.
    pub fn add(self, other: Self) -> Option<Self> {
        Some(Self {
            rise: self.rise.add(other.rise)?,
            fall: self.fall.add(other.fall)?,
        })
    }

    /// Returns the componentwise difference over rise and fall, or `None`
    /// on overflow.
    pub fn sub(self, other: Self) -> Option<Self> {
        Some(Self {
            rise: self.rise.sub(other.rise)?,
            fall: self.fall.sub(other.fall)?,
        })
    }

    /// Returns `true` if this arc carries the "not connected" sentinel.
    pub fn is_connected(&self) -> bool {
        self.rise.min != NOT_CONNECTED
    }
}
