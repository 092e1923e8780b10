//! Configuration types deserialized from `gatemate.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The top-level configuration parsed from `gatemate.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatemateConfig {
    /// Database settings.
    pub database: DatabaseConfig,
}

/// The `[database]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Registry device name, e.g. `CCGM1A1`.
    pub device: String,
    /// Directory holding the `cc_<corner>_dly.dly` files.
    #[serde(default = "default_timing_dir")]
    pub timing_dir: PathBuf,
    /// Corners to load. Empty means every known corner.
    #[serde(default)]
    pub corners: Vec<String>,
}

fn default_timing_dir() -> PathBuf {
    PathBuf::from("delay")
}

impl DatabaseConfig {
    /// Creates a configuration for `device` with default settings.
    pub fn for_device(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            timing_dir: default_timing_dir(),
            corners: Vec::new(),
        }
    }
}
