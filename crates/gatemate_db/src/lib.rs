//! Architecture database for the GateMate FPGA family.
//!
//! [`Database`] ties the device registry, the fabric topology and the
//! timing corners of one device together:
//!
//! ```no_run
//! use gatemate_arch::TileCoordinate;
//! use gatemate_db::Database;
//!
//! let mut db = Database::for_device("CCGM1A1", "/opt/cc-toolchain/bin/p_r").unwrap();
//! let tile = db.classify(TileCoordinate::new(1, 1));
//! let graph = db.connections();
//! let annotated = db.annotate(&graph, "typ_spd").unwrap();
//! println!("{tile}: {} connections", annotated.len());
//! ```

#![warn(missing_docs)]

pub mod annotate;
pub mod database;
pub mod error;

pub use annotate::{annotate, AnnotatedConnection};
pub use database::Database;
pub use error::DbError;
