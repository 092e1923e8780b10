//! Switchbox links across the seam of a vertically stacked die pair.

use crate::coord::{ChipLayout, LocalCoordinate};
use crate::graph::{Connection, ConnectionKind, Endpoint, DEL_D2D_DOWN, DEL_D2D_UP};
use crate::template::{sb_wire, SbWire};
use crate::tile_type::classify_global;
use std::ops::RangeInclusive;

/// Columns that carry die-to-die links.
pub const STITCH_COLUMNS: RangeInclusive<i32> = 27..=162;

/// Planes linked upward in a stitch column.
pub fn up_planes(x: i32) -> RangeInclusive<u8> {
    if x == *STITCH_COLUMNS.start() {
        2..=8
    } else {
        1..=8
    }
}

/// Planes linked downward in a stitch column, if any.
pub fn down_planes(x: i32) -> Option<RangeInclusive<u8>> {
    match x - STITCH_COLUMNS.start() {
        0 => None,
        1 => Some(5..=8),
        _ => Some(1..=8),
    }
}

/// Switchbox row of the lower die facing the seam.
fn lower_row(x: i32) -> i32 {
    if x % 2 == 0 {
        130
    } else {
        129
    }
}

/// Switchbox row of the upper die facing the seam.
fn upper_row(x: i32) -> i32 {
    if x % 2 == 0 {
        0
    } else {
        -1
    }
}

/// Returns every die-to-die link of the layout.
///
/// Only the stacked two-die device is stitched; every other layout
/// yields nothing.
pub fn die_stitches(layout: &ChipLayout) -> Vec<Connection> {
    let mut out = Vec::new();
    if !layout.is_stacked_pair() {
        return out;
    }
    for x in STITCH_COLUMNS {
        let lower = layout.unfold(LocalCoordinate {
            die: 0,
            x,
            y: lower_row(x),
        });
        let upper = layout.unfold(LocalCoordinate {
            die: 1,
            x,
            y: upper_row(x),
        });
        let (Some(lower_size), Some(upper_size)) = (
            classify_global(layout, lower).sb_size(),
            classify_global(layout, upper).sb_size(),
        ) else {
            continue;
        };
        for p in up_planes(x) {
            out.push(Connection {
                src: Endpoint::new(lower, sb_wire(lower_size, p, SbWire::Y(2))),
                dst: Endpoint::new(upper, sb_wire(upper_size, p, SbWire::D2(4))),
                delay: Some(DEL_D2D_UP),
                kind: ConnectionKind::DieStitch,
            });
        }
        for p in down_planes(x).into_iter().flatten() {
            out.push(Connection {
                src: Endpoint::new(upper, sb_wire(upper_size, p, SbWire::Y(4))),
                dst: Endpoint::new(lower, sb_wire(lower_size, p, SbWire::D2(2))),
                delay: Some(DEL_D2D_DOWN),
                kind: ConnectionKind::DieStitch,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::TileCoordinate;
    use crate::graph::ConnectionGraph;

    fn column(stitches: &[Connection], x: i32) -> (usize, usize) {
        let up = stitches
            .iter()
            .filter(|c| c.src.x == x && c.delay == Some(DEL_D2D_UP))
            .count();
        let down = stitches
            .iter()
            .filter(|c| c.src.x == x && c.delay == Some(DEL_D2D_DOWN))
            .count();
        (up, down)
    }

    #[test]
    fn only_stacked_pair_is_stitched() {
        assert!(die_stitches(&ChipLayout::SINGLE).is_empty());
        assert!(die_stitches(&ChipLayout::new(2, 2)).is_empty());
        assert!(!die_stitches(&ChipLayout::new(1, 2)).is_empty());
    }

    #[test]
    fn plane_counts_per_column() {
        let stitches = die_stitches(&ChipLayout::new(1, 2));
        assert_eq!(column(&stitches, 26), (0, 0));
        assert_eq!(column(&stitches, 27), (7, 0));
        assert_eq!(column(&stitches, 28), (8, 4));
        for x in 29..=162 {
            assert_eq!(column(&stitches, x), (8, 8), "column {x}");
        }
        assert_eq!(column(&stitches, 163), (0, 0));
        assert_eq!(stitches.len(), 7 + 12 + 134 * 16);
    }

    #[test]
    fn column_27_skips_plane_1() {
        let stitches = die_stitches(&ChipLayout::new(1, 2));
        assert!(!stitches
            .iter()
            .any(|c| c.src.x == 27 && c.src.wire.contains(".P01.")));
    }

    #[test]
    fn endpoints_sit_on_facing_rows() {
        let stitches = die_stitches(&ChipLayout::new(1, 2));
        // even column: lower row 130, upper local row 0 (global 134)
        let even = stitches
            .iter()
            .find(|c| c.src.x == 30 && c.delay == Some(DEL_D2D_UP))
            .unwrap();
        assert_eq!(even.src.tile(), TileCoordinate::new(30, 130));
        assert_eq!(even.dst.tile(), TileCoordinate::new(30, 134));
        // odd column: lower row 129, upper local row -1 (global 133)
        let odd = stitches
            .iter()
            .find(|c| c.src.x == 31 && c.delay == Some(DEL_D2D_DOWN))
            .unwrap();
        assert_eq!(odd.src.tile(), TileCoordinate::new(31, 133));
        assert_eq!(odd.dst.tile(), TileCoordinate::new(31, 129));
    }

    #[test]
    fn wires_follow_direction() {
        let stitches = die_stitches(&ChipLayout::new(1, 2));
        for c in &stitches {
            if c.delay == Some(DEL_D2D_UP) {
                assert!(c.src.wire.ends_with(".Y2"), "{}", c.src.wire);
                assert!(c.dst.wire.ends_with(".D2_4"), "{}", c.dst.wire);
            } else {
                assert!(c.src.wire.ends_with(".Y4"), "{}", c.src.wire);
                assert!(c.dst.wire.ends_with(".D2_2"), "{}", c.dst.wire);
            }
            assert!(c.src.wire.starts_with("SB_"));
            assert!(c.dst.wire.starts_with("SB_"));
        }
    }

    #[test]
    fn region_graph_keeps_stitches_into_region() {
        let layout = ChipLayout::new(1, 2);
        let graph = ConnectionGraph::build_region(&layout, 40..=40, 133..=134);
        let stitched: Vec<_> = graph.of_kind(ConnectionKind::DieStitch).collect();
        // column 40 is even: upward links land on row 134
        assert_eq!(stitched.len(), 8);
        assert!(stitched.iter().all(|c| c.dst.y == 134));
    }
}
