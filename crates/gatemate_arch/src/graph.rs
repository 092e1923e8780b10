//! Fixed routing connections between tile wires.
//!
//! Configurable muxes live in the tile templates; this module emits the
//! connections that are always present: input muxes feeding CPE pins,
//! output muxes feeding switchboxes, carry chains between neighbouring
//! CPEs, and the die-to-die seam of stacked devices.

use crate::coord::{ChipLayout, TileCoordinate};
use crate::stitch;
use crate::template::{
    cpe_wire, im_output, om_output, sb_wire, SbWire, FIRST_OUTMUX_PLANE, PLANES,
};
use crate::tile_type::{classify_global, TileType};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;
use tracing::debug;

/// Delay of the horizontal carry link.
pub const DEL_CPE_COUT_X: &str = "del_cpe_cout_x";
/// Delay of the vertical carry links.
pub const DEL_CPE_COUT_Y: &str = "del_cpe_cout_y";
/// Delay of the horizontal propagate link.
pub const DEL_CPE_POUT_X: &str = "del_cpe_pout_x";
/// Delay of the vertical propagate links.
pub const DEL_CPE_POUT_Y: &str = "del_cpe_pout_y";
/// Delay of an upward die crossing.
pub const DEL_D2D_UP: &str = "del_d2d_up";
/// Delay of a downward die crossing.
pub const DEL_D2D_DOWN: &str = "del_d2d_down";

/// Input-mux plane → CPE pin it drives.
const INMUX_TARGETS: [(u8, &str); 12] = [
    (1, "IN1"),
    (2, "IN2"),
    (3, "IN3"),
    (4, "IN4"),
    (5, "IN5"),
    (6, "IN6"),
    (7, "IN7"),
    (8, "IN8"),
    (9, "CLK"),
    (10, "EN"),
    (11, "SR"),
    (12, "RAM_I1"),
];

/// Vertical links from the CPE below: (source pin, destination pin, delay).
const VERTICAL_LINKS: [(&str, &str, &str); 4] = [
    ("COUTY1", "CINY1", DEL_CPE_COUT_Y),
    ("COUTY2", "CINY2", DEL_CPE_COUT_Y),
    ("POUTY1", "PINY1", DEL_CPE_POUT_Y),
    ("POUTY2", "PINY2", DEL_CPE_POUT_Y),
];

/// Horizontal links from the CPE to the left.
const HORIZONTAL_LINKS: [(&str, &str, &str); 2] = [
    ("COUTX", "CINX", DEL_CPE_COUT_X),
    ("POUTX", "PINX", DEL_CPE_POUT_X),
];

/// A wire of a specific tile, in global coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Endpoint {
    /// Tile column.
    pub x: i32,
    /// Tile row.
    pub y: i32,
    /// Tile-local wire name.
    pub wire: &'static str,
}

impl Endpoint {
    /// Creates an endpoint.
    pub fn new(coord: TileCoordinate, wire: &'static str) -> Self {
        Self {
            x: coord.x,
            y: coord.y,
            wire,
        }
    }

    /// Adjacency key, `x/y/wire`.
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// The tile this endpoint belongs to.
    pub fn tile(&self) -> TileCoordinate {
        TileCoordinate::new(self.x, self.y)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.x, self.y, self.wire)
    }
}

/// What produced a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConnectionKind {
    /// Input mux to CPE pin.
    InmuxToCpe,
    /// Output mux to switchbox plane input.
    OutmuxToSb,
    /// Carry or propagate link between neighbouring CPEs.
    Carry,
    /// Switchbox link across a die seam.
    DieStitch,
}

/// A fixed connection between two endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Connection {
    /// Driving endpoint.
    pub src: Endpoint,
    /// Driven endpoint.
    pub dst: Endpoint,
    /// Name of the timing arc describing this connection, if any.
    pub delay: Option<&'static str>,
    /// Origin of the connection.
    pub kind: ConnectionKind,
}

/// One element of an adjacency list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdjacencyEntry {
    /// The endpoint.
    pub endpoint: Endpoint,
    /// Delay name of the connection reaching this endpoint.
    pub delay: Option<&'static str>,
    /// `false` only for the leading entry restating the source.
    pub terminal: bool,
}

/// Adjacency lists keyed by `x/y/wire` of the source.
pub type Adjacency = BTreeMap<String, Vec<AdjacencyEntry>>;

/// All fixed connections of a chip (or a region of it).
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionGraph {
    layout: ChipLayout,
    connections: Vec<Connection>,
}

/// Builds the connection graph of a whole chip.
pub fn connections(layout: &ChipLayout) -> ConnectionGraph {
    ConnectionGraph::build(layout)
}

impl ConnectionGraph {
    /// Builds the graph for every tile of the chip.
    pub fn build(layout: &ChipLayout) -> Self {
        Self::build_region(layout, layout.x_range(), layout.y_range())
    }

    /// Builds the connections whose destination tile lies in the region.
    pub fn build_region(
        layout: &ChipLayout,
        xs: RangeInclusive<i32>,
        ys: RangeInclusive<i32>,
    ) -> Self {
        let mut connections = Vec::new();
        for y in ys.clone() {
            for x in xs.clone() {
                let coord = TileCoordinate::new(x, y);
                let tile_type = classify_global(layout, coord);
                if tile_type.is_cpe() {
                    tile_connections(layout, coord, tile_type, &mut connections);
                }
            }
        }
        let before = connections.len();
        connections.extend(
            stitch::die_stitches(layout)
                .into_iter()
                .filter(|c| xs.contains(&c.dst.x) && ys.contains(&c.dst.y)),
        );
        debug!(
            total = connections.len(),
            stitches = connections.len() - before,
            "built connection graph"
        );
        Self {
            layout: *layout,
            connections,
        }
    }

    /// The layout the graph was built for.
    pub fn layout(&self) -> &ChipLayout {
        &self.layout
    }

    /// All connections in build order: per tile, then die stitches.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Number of connections.
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// Returns `true` if there are no connections.
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Connections of one kind.
    pub fn of_kind(&self, kind: ConnectionKind) -> impl Iterator<Item = &Connection> {
        self.connections.iter().filter(move |c| c.kind == kind)
    }

    /// Groups connections by source.
    ///
    /// Each list starts with the source itself (no delay, not terminal),
    /// followed by every destination in build order.
    pub fn adjacency(&self) -> Adjacency {
        let mut adjacency = Adjacency::new();
        for c in &self.connections {
            adjacency
                .entry(c.src.key())
                .or_insert_with(|| {
                    vec![AdjacencyEntry {
                        endpoint: c.src,
                        delay: None,
                        terminal: false,
                    }]
                })
                .push(AdjacencyEntry {
                    endpoint: c.dst,
                    delay: c.delay,
                    terminal: true,
                });
        }
        adjacency
    }
}

fn tile_connections(
    layout: &ChipLayout,
    coord: TileCoordinate,
    tile_type: TileType,
    out: &mut Vec<Connection>,
) {
    for (plane, pin) in INMUX_TARGETS {
        if let Some(wire) = cpe_wire(pin) {
            out.push(Connection {
                src: Endpoint::new(coord, im_output(plane)),
                dst: Endpoint::new(coord, wire),
                delay: None,
                kind: ConnectionKind::InmuxToCpe,
            });
        }
    }

    if let Some(size) = tile_type.sb_size() {
        for plane in FIRST_OUTMUX_PLANE..=PLANES {
            out.push(Connection {
                src: Endpoint::new(coord, om_output(plane)),
                dst: Endpoint::new(coord, sb_wire(size, plane, SbWire::D0)),
                delay: None,
                kind: ConnectionKind::OutmuxToSb,
            });
        }
    }

    let below = TileCoordinate::new(coord.x, coord.y - 1);
    if classify_global(layout, below).is_cpe() {
        push_links(below, coord, &VERTICAL_LINKS, out);
    }
    let left = TileCoordinate::new(coord.x - 1, coord.y);
    if classify_global(layout, left).is_cpe() {
        push_links(left, coord, &HORIZONTAL_LINKS, out);
    }
}

fn push_links(
    from: TileCoordinate,
    to: TileCoordinate,
    links: &[(&str, &str, &'static str)],
    out: &mut Vec<Connection>,
) {
    for &(src, dst, delay) in links {
        if let (Some(src), Some(dst)) = (cpe_wire(src), cpe_wire(dst)) {
            out.push(Connection {
                src: Endpoint::new(from, src),
                dst: Endpoint::new(to, dst),
                delay: Some(delay),
                kind: ConnectionKind::Carry,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_die_connection_counts() {
        let graph = connections(&ChipLayout::SINGLE);
        let count = |kind| graph.of_kind(kind).count();
        assert_eq!(count(ConnectionKind::InmuxToCpe), 160 * 128 * 12);
        assert_eq!(count(ConnectionKind::OutmuxToSb), 160 * 128 / 2 * 4);
        assert_eq!(count(ConnectionKind::Carry), 160 * 127 * 4 + 159 * 128 * 2);
        assert_eq!(count(ConnectionKind::DieStitch), 0);
    }

    #[test]
    fn corner_cpe_has_no_carry_inputs() {
        let graph = ConnectionGraph::build_region(&ChipLayout::SINGLE, 1..=1, 1..=1);
        assert_eq!(graph.of_kind(ConnectionKind::Carry).count(), 0);
        // (1, 1) carries a big switchbox
        assert!(graph
            .connections()
            .iter()
            .any(|c| c.dst.wire == "SB_BIG.P09.D0" && c.src.wire == "OM.P09.Y"));
        assert_eq!(graph.len(), 12 + 4);
    }

    #[test]
    fn inmux_planes_drive_control_pins() {
        let graph = ConnectionGraph::build_region(&ChipLayout::SINGLE, 5..=5, 6..=6);
        let target = |src: &str| {
            graph
                .connections()
                .iter()
                .find(|c| c.src.wire == src)
                .map(|c| c.dst.wire)
        };
        assert_eq!(target("IM.P01.Y"), Some("CPE.IN1"));
        assert_eq!(target("IM.P09.Y"), Some("CPE.CLK"));
        assert_eq!(target("IM.P10.Y"), Some("CPE.EN"));
        assert_eq!(target("IM.P11.Y"), Some("CPE.SR"));
        assert_eq!(target("IM.P12.Y"), Some("CPE.RAM_I1"));
    }

    #[test]
    fn carry_links_come_from_neighbours() {
        let graph = ConnectionGraph::build_region(&ChipLayout::SINGLE, 10..=10, 20..=20);
        let carry: Vec<_> = graph.of_kind(ConnectionKind::Carry).collect();
        assert_eq!(carry.len(), 6);
        for c in &carry {
            assert_eq!(c.dst.tile(), TileCoordinate::new(10, 20));
            assert!(c.delay.is_some());
        }
        let cout_y = carry.iter().find(|c| c.dst.wire == "CPE.CINY2").unwrap();
        assert_eq!(cout_y.src.tile(), TileCoordinate::new(10, 19));
        assert_eq!(cout_y.src.wire, "CPE.COUTY2");
        assert_eq!(cout_y.delay, Some(DEL_CPE_COUT_Y));
        let pout_x = carry.iter().find(|c| c.dst.wire == "CPE.PINX").unwrap();
        assert_eq!(pout_x.src.tile(), TileCoordinate::new(9, 20));
        assert_eq!(pout_x.delay, Some(DEL_CPE_POUT_X));
    }

    #[test]
    fn no_carry_across_die_seam() {
        let layout = ChipLayout::new(1, 2);
        // first CPE row of the upper die
        let graph = ConnectionGraph::build_region(&layout, 50..=50, 135..=135);
        assert!(graph
            .of_kind(ConnectionKind::Carry)
            .all(|c| c.src.y == 135));
    }

    #[test]
    fn adjacency_lists_restate_their_source() {
        let graph = ConnectionGraph::build_region(&ChipLayout::SINGLE, 1..=6, 1..=6);
        let adjacency = graph.adjacency();
        assert!(!adjacency.is_empty());
        for (key, entries) in &adjacency {
            assert!(entries.len() >= 2);
            assert_eq!(&entries[0].endpoint.key(), key);
            assert_eq!(entries[0].delay, None);
            assert!(!entries[0].terminal);
            assert!(entries[1..].iter().all(|e| e.terminal));
        }
        let vertical = &adjacency["3/4/CPE.COUTY1"];
        assert_eq!(vertical.len(), 2);
        assert_eq!(vertical[1].endpoint.key(), "3/5/CPE.CINY1");
    }

    #[test]
    fn connections_serialize() {
        let graph = ConnectionGraph::build_region(&ChipLayout::SINGLE, 2..=2, 2..=2);
        let json = serde_json::to_value(&graph.connections()[0]).unwrap();
        assert_eq!(json["src"]["wire"], "IM.P01.Y");
        assert_eq!(json["dst"]["wire"], "CPE.IN1");
        assert_eq!(json["kind"], "InmuxToCpe");
        assert!(json["delay"].is_null());
    }

    #[test]
    fn endpoint_key_format() {
        let e = Endpoint::new(TileCoordinate::new(-1, 130), "SB_BIG.P01.Y2");
        assert_eq!(e.key(), "-1/130/SB_BIG.P01.Y2");
    }
}
