//! I/O banks and their pads.
//!
//! Every bank owns a contiguous stretch of one die edge. Pads sit on the odd
//! positions of that stretch, alternating between the A and B halves of each
//! differential pair.

use crate::chip::{DIE_X_MAX, DIE_X_MIN, DIE_Y_MAX, DIE_Y_MIN};
use crate::error::ChipError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// One of the four die edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Column `-2`.
    Left,
    /// Row `-2`.
    Bottom,
    /// Column `163`.
    Right,
    /// Row `131`.
    Top,
}

impl Side {
    /// All sides in table order.
    pub const ALL: [Self; 4] = [Self::Left, Self::Bottom, Self::Right, Self::Top];

    /// Single-letter tag used in tile and wire names.
    pub fn letter(self) -> char {
        match self {
            Self::Left => 'L',
            Self::Bottom => 'B',
            Self::Right => 'R',
            Self::Top => 'T',
        }
    }

    /// Returns `true` for the bottom and top edges.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Bottom | Self::Top)
    }

    /// Returns the local tile at `position` along this edge.
    pub fn tile_at(self, position: i32) -> (i32, i32) {
        match self {
            Self::Left => (DIE_X_MIN, position),
            Self::Right => (DIE_X_MAX, position),
            Self::Bottom => (position, DIE_Y_MIN),
            Self::Top => (position, DIE_Y_MAX),
        }
    }
}

/// Named I/O bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bank {
    /// North bank 1.
    N1,
    /// North bank 2.
    N2,
    /// East bank 1.
    E1,
    /// East bank 2.
    E2,
    /// West bank 1.
    W1,
    /// West bank 2.
    W2,
    /// South bank 1.
    S1,
    /// South bank 2.
    S2,
    /// South bank 3.
    S3,
    /// Lookup sentinel for names that are not banks.
    Unknown,
}

/// Pads per bank.
pub const PADS_PER_BANK: usize = 18;

impl Bank {
    /// All real banks.
    pub const ALL: [Self; 9] = [
        Self::N1,
        Self::N2,
        Self::E1,
        Self::E2,
        Self::W1,
        Self::W2,
        Self::S1,
        Self::S2,
        Self::S3,
    ];

    /// Looks up a bank by name, returning [`Bank::Unknown`] if none matches.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|b| b.name().eq_ignore_ascii_case(name))
            .unwrap_or(Self::Unknown)
    }

    /// Looks up a bank by name.
    ///
    /// # Errors
    ///
    /// Returns [`ChipError::UnknownBank`] if no bank matches.
    pub fn try_from_name(name: &str) -> Result<Self, ChipError> {
        match Self::from_name(name) {
            Self::Unknown => Err(ChipError::UnknownBank(name.to_string())),
            bank => Ok(bank),
        }
    }

    /// Returns the bank's name.
    pub fn name(self) -> &'static str {
        match self {
            Self::N1 => "N1",
            Self::N2 => "N2",
            Self::E1 => "E1",
            Self::E2 => "E2",
            Self::W1 => "W1",
            Self::W2 => "W2",
            Self::S1 => "S1",
            Self::S2 => "S2",
            Self::S3 => "S3",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Returns the die edge the bank sits on.
    pub fn side(self) -> Option<Side> {
        match self {
            Self::N1 | Self::N2 => Some(Side::Top),
            Self::E1 | Self::E2 => Some(Side::Right),
            Self::W1 | Self::W2 => Some(Side::Left),
            Self::S1 | Self::S2 | Self::S3 => Some(Side::Bottom),
            Self::Unknown => None,
        }
    }

    /// Returns the positions along the edge the bank covers.
    pub fn range(self) -> Option<RangeInclusive<i32>> {
        match self {
            Self::S3 => Some(5..=40),
            Self::S1 | Self::N1 => Some(57..=92),
            Self::S2 | Self::N2 => Some(101..=136),
            Self::W1 | Self::E1 => Some(25..=60),
            Self::W2 | Self::E2 => Some(69..=104),
            Self::Unknown => None,
        }
    }

    /// Returns the bank covering `position` on `side`, if any.
    pub fn at(side: Side, position: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|b| {
            b.side() == Some(side) && b.range().is_some_and(|r| r.contains(&position))
        })
    }

    /// Returns the bank's 18 pads, A pads first.
    pub fn pads(self) -> Vec<Pad> {
        let (Some(side), Some(range)) = (self.side(), self.range()) else {
            return Vec::new();
        };
        let start = *range.start();
        let mut pads = Vec::with_capacity(PADS_PER_BANK);
        for half in [PadHalf::A, PadHalf::B] {
            for index in 0..PADS_PER_BANK as u8 / 2 {
                let position = start + 4 * i32::from(index) + half.offset();
                let (x, y) = side.tile_at(position);
                pads.push(Pad {
                    bank: self,
                    half,
                    index,
                    x,
                    y,
                });
            }
        }
        pads
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Half of a differential pad pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PadHalf {
    /// The A (positive) pad.
    A,
    /// The B (negative) pad.
    B,
}

impl PadHalf {
    fn offset(self) -> i32 {
        match self {
            Self::A => 0,
            Self::B => 2,
        }
    }
}

/// A bonded I/O pad and the local tile it sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pad {
    /// Owning bank.
    pub bank: Bank,
    /// Pair half.
    pub half: PadHalf,
    /// Pair index, `0..9`.
    pub index: u8,
    /// Local tile column.
    pub x: i32,
    /// Local tile row.
    pub y: i32,
}

impl Pad {
    /// Returns the pad name, e.g. `IO_W1_A3`.
    pub fn name(&self) -> String {
        let half = match self.half {
            PadHalf::A => 'A',
            PadHalf::B => 'B',
        };
        format!("IO_{}_{half}{}", self.bank, self.index)
    }
}
