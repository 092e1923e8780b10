//! Classification of tiles from their coordinates alone.
//!
//! All predicates take die-local coordinates. The switchbox lattice is a
//! checkerboard over `(x+1, y+1)`; big and small switchboxes alternate along
//! its diagonals, with the comparison flipped between the odd and even
//! sub-lattices.

use crate::coord::{ChipLayout, TileCoordinate};
use gatemate_chip::{Bank, Side, DIE_X_MAX, DIE_X_MIN, DIE_Y_MAX, DIE_Y_MIN};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Returns `true` inside the CPE array.
pub fn is_cpe(x: i32, y: i32) -> bool {
    (1..=160).contains(&x) && (1..=128).contains(&y)
}

/// Returns `true` on a switchbox site of either size.
pub fn is_sb(x: i32, y: i32) -> bool {
    (-1..=162).contains(&x) && (-1..=130).contains(&y) && (x + 1) % 2 == (y + 1) % 2
}

/// Returns `true` on a big switchbox site.
pub fn is_sb_big(x: i32, y: i32) -> bool {
    if !is_sb(x, y) {
        return false;
    }
    let (u, v) = ((x + 1).rem_euclid(4), (y + 1).rem_euclid(4));
    if u % 2 == 1 {
        u != v
    } else {
        u == v
    }
}

/// Returns `true` on a small switchbox site.
pub fn is_sb_sml(x: i32, y: i32) -> bool {
    is_sb(x, y) && !is_sb_big(x, y)
}

/// Returns `true` on CPE tiles that also carry an output mux.
pub fn is_outmux(x: i32, y: i32) -> bool {
    is_cpe(x, y) && (x + 1) % 2 == (y + 1) % 2
}

/// Returns the edge a margin tile lies on. Corners belong to no edge.
pub fn edge_side(x: i32, y: i32) -> Option<Side> {
    let on_column = (DIE_Y_MIN + 1..=DIE_Y_MAX - 1).contains(&y);
    let on_row = (DIE_X_MIN + 1..=DIE_X_MAX - 1).contains(&x);
    match (x, y) {
        (DIE_X_MIN, _) if on_column => Some(Side::Left),
        (DIE_X_MAX, _) if on_column => Some(Side::Right),
        (_, DIE_Y_MIN) if on_row => Some(Side::Bottom),
        (_, DIE_Y_MAX) if on_row => Some(Side::Top),
        _ => None,
    }
}

fn edge_position(side: Side, x: i32, y: i32) -> i32 {
    if side.is_horizontal() {
        x
    } else {
        y
    }
}

/// Returns the bank whose I/O range covers this edge tile.
pub fn edge_bank(x: i32, y: i32) -> Option<Bank> {
    let side = edge_side(x, y)?;
    Bank::at(side, edge_position(side, x, y))
}

/// Returns `true` on edge tiles inside a bank's I/O range.
pub fn is_edge_io(x: i32, y: i32) -> bool {
    edge_bank(x, y).is_some()
}

/// Returns `true` on edge I/O tiles that hold a pad.
pub fn is_gpio(x: i32, y: i32) -> bool {
    edge_side(x, y)
        .filter(|_| is_edge_io(x, y))
        .is_some_and(|side| edge_position(side, x, y).rem_euclid(2) == 1)
}

/// Tile type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TileType {
    /// CPE with a big switchbox.
    CpeBig,
    /// CPE with a small switchbox.
    CpeSml,
    /// CPE without a switchbox.
    Cpe,
    /// Big switchbox outside the CPE array.
    SbBig,
    /// Small switchbox outside the CPE array.
    SbSml,
    /// Pad tile on the top edge.
    GpioT,
    /// Pad tile on the bottom edge.
    GpioB,
    /// Pad tile on the left edge.
    GpioL,
    /// Pad tile on the right edge.
    GpioR,
    /// I/O tile without a pad, top edge.
    EdgeIoT,
    /// I/O tile without a pad, bottom edge.
    EdgeIoB,
    /// I/O tile without a pad, left edge.
    EdgeIoL,
    /// I/O tile without a pad, right edge.
    EdgeIoR,
    /// Plain top edge tile.
    EdgeT,
    /// Plain bottom edge tile.
    EdgeB,
    /// Plain left edge tile.
    EdgeL,
    /// Plain right edge tile.
    EdgeR,
    /// Nothing here.
    None,
}

impl TileType {
    /// Every tag, in template-table order.
    pub const ALL: [Self; 18] = [
        Self::CpeBig,
        Self::CpeSml,
        Self::Cpe,
        Self::SbBig,
        Self::SbSml,
        Self::GpioT,
        Self::GpioB,
        Self::GpioL,
        Self::GpioR,
        Self::EdgeIoT,
        Self::EdgeIoB,
        Self::EdgeIoL,
        Self::EdgeIoR,
        Self::EdgeT,
        Self::EdgeB,
        Self::EdgeL,
        Self::EdgeR,
        Self::None,
    ];

    /// Position in [`TileType::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// The tag as printed in tile names.
    pub fn name(self) -> &'static str {
        match self {
            Self::CpeBig => "CPE_BIG",
            Self::CpeSml => "CPE_SML",
            Self::Cpe => "CPE",
            Self::SbBig => "SB_BIG",
            Self::SbSml => "SB_SML",
            Self::GpioT => "GPIO_T",
            Self::GpioB => "GPIO_B",
            Self::GpioL => "GPIO_L",
            Self::GpioR => "GPIO_R",
            Self::EdgeIoT => "EDGE_IO_T",
            Self::EdgeIoB => "EDGE_IO_B",
            Self::EdgeIoL => "EDGE_IO_L",
            Self::EdgeIoR => "EDGE_IO_R",
            Self::EdgeT => "EDGE_T",
            Self::EdgeB => "EDGE_B",
            Self::EdgeL => "EDGE_L",
            Self::EdgeR => "EDGE_R",
            Self::None => "NONE",
        }
    }

    fn gpio(side: Side) -> Self {
        match side {
            Side::Top => Self::GpioT,
            Side::Bottom => Self::GpioB,
            Side::Left => Self::GpioL,
            Side::Right => Self::GpioR,
        }
    }

    fn edge_io(side: Side) -> Self {
        match side {
            Side::Top => Self::EdgeIoT,
            Side::Bottom => Self::EdgeIoB,
            Side::Left => Self::EdgeIoL,
            Side::Right => Self::EdgeIoR,
        }
    }

    fn edge(side: Side) -> Self {
        match side {
            Side::Top => Self::EdgeT,
            Side::Bottom => Self::EdgeB,
            Side::Left => Self::EdgeL,
            Side::Right => Self::EdgeR,
        }
    }

    /// Returns `true` for the three CPE tags.
    pub fn is_cpe(self) -> bool {
        matches!(self, Self::CpeBig | Self::CpeSml | Self::Cpe)
    }

    /// Returns the switchbox size carried by this tile, if any.
    pub fn sb_size(self) -> Option<SbSize> {
        match self {
            Self::CpeBig | Self::SbBig => Some(SbSize::Big),
            Self::CpeSml | Self::SbSml => Some(SbSize::Small),
            _ => None,
        }
    }

    /// Returns `true` for GPIO tiles.
    pub fn is_gpio(self) -> bool {
        matches!(self, Self::GpioT | Self::GpioB | Self::GpioL | Self::GpioR)
    }

    /// Returns `true` for edge I/O tiles without a pad.
    pub fn is_edge_io(self) -> bool {
        matches!(
            self,
            Self::EdgeIoT | Self::EdgeIoB | Self::EdgeIoL | Self::EdgeIoR
        )
    }

    /// Returns the die edge of margin tiles.
    pub fn side(self) -> Option<Side> {
        match self {
            Self::GpioT | Self::EdgeIoT | Self::EdgeT => Some(Side::Top),
            Self::GpioB | Self::EdgeIoB | Self::EdgeB => Some(Side::Bottom),
            Self::GpioL | Self::EdgeIoL | Self::EdgeL => Some(Side::Left),
            Self::GpioR | Self::EdgeIoR | Self::EdgeR => Some(Side::Right),
            _ => None,
        }
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Switchbox size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SbSize {
    /// Big switchbox with long-distance inputs.
    Big,
    /// Small switchbox.
    Small,
}

impl SbSize {
    /// Prefix of this switchbox's wire and group names.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Big => "SB_BIG",
            Self::Small => "SB_SML",
        }
    }
}

/// Classifies a die-local coordinate.
pub fn classify(x: i32, y: i32) -> TileType {
    if is_cpe(x, y) {
        return if is_sb_big(x, y) {
            TileType::CpeBig
        } else if is_sb_sml(x, y) {
            TileType::CpeSml
        } else {
            TileType::Cpe
        };
    }
    if is_sb_big(x, y) {
        return TileType::SbBig;
    }
    if is_sb_sml(x, y) {
        return TileType::SbSml;
    }
    match edge_side(x, y) {
        Some(side) if is_gpio(x, y) => TileType::gpio(side),
        Some(side) if is_edge_io(x, y) => TileType::edge_io(side),
        Some(side) => TileType::edge(side),
        None => TileType::None,
    }
}

/// Classifies a global coordinate; anything off the chip is [`TileType::None`].
pub fn classify_global(layout: &ChipLayout, coord: TileCoordinate) -> TileType {
    layout
        .fold(coord)
        .map_or(TileType::None, |local| classify(local.x, local.y))
}
