//! Static registry of GateMate devices, I/O banks and packages.
//!
//! Everything here is compile-time data. Lookups by name go through
//! [`chip`] and [`Bank::try_from_name`]; both are case-insensitive.
//!
//! ```
//! use gatemate_chip::{chip, Bank};
//!
//! let a2 = chip("CCGM1A2").unwrap();
//! assert_eq!(a2.die_count(), 2);
//! assert_eq!(Bank::W1.pads()[0].name(), "IO_W1_A0");
//! ```

#![warn(missing_docs)]

pub mod bank;
pub mod chip;
pub mod error;

pub use bank::{Bank, Pad, PadHalf, Side, PADS_PER_BANK};
pub use chip::{
    chip, Chip, Package, CHIPS, DIE_COLUMNS, DIE_ROWS, DIE_X_MAX, DIE_X_MIN, DIE_Y_MAX,
    DIE_Y_MIN,
};
pub use error::ChipError;
