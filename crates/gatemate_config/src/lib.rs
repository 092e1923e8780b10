//! Parsing and validation of `gatemate.toml` database configuration.
//!
//! The file names a registry device, the directory holding the compressed
//! timing files and the corners to load:
//!
//! ```toml
//! [database]
//! device = "CCGM1A1"
//! timing_dir = "delay"
//! corners = ["typ_lpr", "worst_spd"]
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use resolve::{resolve_database, resolve_database_with, ResolvedDatabase, TIMING_DIR_ENV};
pub use types::*;
