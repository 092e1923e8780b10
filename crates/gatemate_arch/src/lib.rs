//! Fabric topology of the GateMate family.
//!
//! Tiles are classified purely from their coordinates ([`classify`]),
//! every tile type has a shared wiring template ([`tile_template`]) and
//! the fixed connections between tiles form a [`ConnectionGraph`].
//!
//! ```
//! use gatemate_arch::{classify, tile_template, TileType};
//!
//! assert_eq!(classify(1, 1), TileType::CpeBig);
//! assert!(tile_template(TileType::CpeBig).has_wire("CPE.IN1"));
//! ```

#![warn(missing_docs)]

pub mod coord;
pub mod graph;
pub mod stitch;
pub mod template;
pub mod tile_type;

pub use coord::{ChipLayout, LocalCoordinate, TileCoordinate};
pub use graph::{
    connections, Adjacency, AdjacencyEntry, Connection, ConnectionGraph, ConnectionKind,
    Endpoint,
};
pub use stitch::die_stitches;
pub use template::{
    tile_template, Mux, Pin, PinDir, Primitive, TileTemplate, Wire, WireClass,
    CPE_INPUTS, CPE_OUTPUTS,
};
pub use tile_type::{classify, classify_global, SbSize, TileType};
