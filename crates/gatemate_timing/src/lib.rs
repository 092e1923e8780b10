//! Timing-characterization data for the GateMate FPGA family.
//!
//! The vendor ships one zlib-compressed file per process/voltage/temperature
//! corner. The decompressed image is a fixed sequence of nested tables with
//! no framing, described statically in [`layout`]. This crate decodes that
//! image into [`RawTimingData`] and projects it onto named arcs with
//! [`resolve`].
//!
//! # Usage
//!
//! ```no_run
//! use gatemate_timing::load_corner;
//! use std::path::Path;
//!
//! let timings = load_corner(Path::new("/opt/cc-toolchain/bin/p_r"), "typ_spd").unwrap();
//! if let Some(arc) = timings.get("glbout_FEEDBACK_delay") {
//!     println!("feedback: {:?}", arc.rise);
//! }
//! ```
//!
//! # Layering
//!
//! - [`reader`] and [`record`] consume exact byte counts from a cursor.
//! - [`table`] and [`layout`] describe where every section lives.
//! - [`decode`] and [`writer`] convert between images and raw tables.
//! - [`names`] and [`resolve`] attach physical names and filter sentinels.
//! - [`loader`] handles files and compression.

#![warn(missing_docs)]

pub mod decode;
pub mod delay;
pub mod error;
pub mod layout;
pub mod loader;
pub mod names;
pub mod reader;
pub mod record;
pub mod resolve;
pub mod table;
pub mod writer;

pub use decode::{decode, RamTable, RawTimingData, TrailingValue};
pub use delay::{TimingArc, TimingDelay, NOT_CONNECTED};
pub use error::TimingError;
pub use layout::{image_len, section_offsets, RamFlavor, TRAILING_FIELDS};
pub use loader::{
    compress, decompress, is_known_corner, load_corner, load_raw, timing_file_name,
    KNOWN_CORNERS,
};
pub use record::{RamDelayEntry, RamKey, RamPinPair, RawDelayRecord, RawDelayRecordTri};
pub use resolve::{resolve, ResolvedTimings};
pub use table::Table;
pub use writer::encode;
