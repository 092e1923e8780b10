//! Global tile coordinates and their folding onto dies.
//!
//! A multi-die device is laid out as a grid of identical dies. Global
//! coordinates run continuously across the grid; each die sees its own
//! local coordinates in `-2..=163 × -2..=131`.

use gatemate_chip::{Chip, DIE_COLUMNS, DIE_ROWS, DIE_X_MIN, DIE_Y_MIN};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// A tile position in global chip coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoordinate {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl TileCoordinate {
    /// Creates a coordinate.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for TileCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.x, self.y)
    }
}

/// A tile position relative to one die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalCoordinate {
    /// Die index, row-major over the die grid.
    pub die: u32,
    /// Local column.
    pub x: i32,
    /// Local row.
    pub y: i32,
}

/// Arrangement of dies in a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChipLayout {
    /// Die columns.
    pub dies_x: u32,
    /// Die rows.
    pub dies_y: u32,
}

impl ChipLayout {
    /// A single-die device.
    pub const SINGLE: Self = Self {
        dies_x: 1,
        dies_y: 1,
    };

    /// Creates a layout of `dies_x × dies_y` dies.
    pub const fn new(dies_x: u32, dies_y: u32) -> Self {
        Self { dies_x, dies_y }
    }

    /// Returns the layout of a registry device.
    pub fn for_chip(chip: &Chip) -> Self {
        Self::new(chip.dies_x, chip.dies_y)
    }

    /// Number of dies.
    pub fn die_count(&self) -> u32 {
        self.dies_x * self.dies_y
    }

    /// Returns `true` for the two-die device whose dies are stacked
    /// vertically and stitched together across the seam.
    pub fn is_stacked_pair(&self) -> bool {
        self.dies_x == 1 && self.dies_y == 2
    }

    /// Global columns covered by the chip.
    pub fn x_range(&self) -> RangeInclusive<i32> {
        DIE_X_MIN..=DIE_X_MIN + DIE_COLUMNS * self.dies_x as i32 - 1
    }

    /// Global rows covered by the chip.
    pub fn y_range(&self) -> RangeInclusive<i32> {
        DIE_Y_MIN..=DIE_Y_MIN + DIE_ROWS * self.dies_y as i32 - 1
    }

    /// Returns `true` if `coord` lies on the chip.
    pub fn contains(&self, coord: TileCoordinate) -> bool {
        self.x_range().contains(&coord.x) && self.y_range().contains(&coord.y)
    }

    /// Folds a global coordinate onto its die, or `None` if off the chip.
    pub fn fold(&self, coord: TileCoordinate) -> Option<LocalCoordinate> {
        if !self.contains(coord) {
            return None;
        }
        let die_col = (coord.x - DIE_X_MIN).div_euclid(DIE_COLUMNS);
        let die_row = (coord.y - DIE_Y_MIN).div_euclid(DIE_ROWS);
        Some(LocalCoordinate {
            die: die_row as u32 * self.dies_x + die_col as u32,
            x: (coord.x - DIE_X_MIN).rem_euclid(DIE_COLUMNS) + DIE_X_MIN,
            y: (coord.y - DIE_Y_MIN).rem_euclid(DIE_ROWS) + DIE_Y_MIN,
        })
    }

    /// Maps a die-local coordinate back to global coordinates.
    pub fn unfold(&self, local: LocalCoordinate) -> TileCoordinate {
        let die_col = (local.die % self.dies_x) as i32;
        let die_row = (local.die / self.dies_x) as i32;
        TileCoordinate {
            x: die_col * DIE_COLUMNS + local.x,
            y: die_row * DIE_ROWS + local.y,
        }
    }

    /// Iterates over every coordinate of the chip, row by row.
    pub fn coordinates(&self) -> impl Iterator<Item = TileCoordinate> {
        let xs = self.x_range();
        self.y_range()
            .flat_map(move |y| xs.clone().map(move |x| TileCoordinate { x, y }))
    }
}

impl Default for ChipLayout {
    fn default() -> Self {
        Self::SINGLE
    }
}
