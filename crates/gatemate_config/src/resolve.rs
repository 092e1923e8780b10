//! Resolution of a parsed configuration against the device registry and
//! the environment.

use crate::error::ConfigError;
use crate::types::DatabaseConfig;
use gatemate_chip::Chip;
use gatemate_timing::KNOWN_CORNERS;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding `database.timing_dir`.
pub const TIMING_DIR_ENV: &str = "GATEMATE_TIMING_DIR";

/// A configuration with its device looked up and defaults applied.
#[derive(Debug, Clone)]
pub struct ResolvedDatabase {
    /// The registry device.
    pub chip: &'static Chip,
    /// Directory the timing files are read from.
    pub timing_dir: PathBuf,
    /// Corners to load, never empty.
    pub corners: Vec<String>,
}

/// Resolves `config`, honouring [`TIMING_DIR_ENV`] if it is set.
pub fn resolve_database(config: &DatabaseConfig) -> Result<ResolvedDatabase, ConfigError> {
    let env_dir = std::env::var_os(TIMING_DIR_ENV).map(PathBuf::from);
    resolve_database_with(config, env_dir.as_deref())
}

/// Resolves `config` with an explicit timing directory override.
pub fn resolve_database_with(
    config: &DatabaseConfig,
    timing_dir_override: Option<&Path>,
) -> Result<ResolvedDatabase, ConfigError> {
    let chip = gatemate_chip::chip(&config.device)
        .map_err(|_| ConfigError::UnknownDevice(config.device.clone()))?;

    let timing_dir = match timing_dir_override {
        Some(dir) => {
            debug!(dir = %dir.display(), "timing directory overridden by {TIMING_DIR_ENV}");
            dir.to_path_buf()
        }
        None => config.timing_dir.clone(),
    };

    let corners = if config.corners.is_empty() {
        KNOWN_CORNERS.iter().map(|c| c.to_string()).collect()
    } else {
        config.corners.clone()
    };

    Ok(ResolvedDatabase {
        chip,
        timing_dir,
        corners,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_defaults() {
        let config = DatabaseConfig::for_device("ccgm1a2");
        let resolved = resolve_database_with(&config, None).unwrap();
        assert_eq!(resolved.chip.name, "CCGM1A2");
        assert_eq!(resolved.timing_dir, PathBuf::from("delay"));
        assert_eq!(resolved.corners.len(), KNOWN_CORNERS.len());
    }

    #[test]
    fn explicit_corners_kept() {
        let mut config = DatabaseConfig::for_device("CCGM1A1");
        config.corners = vec!["best_eco".to_string()];
        let resolved = resolve_database_with(&config, None).unwrap();
        assert_eq!(resolved.corners, ["best_eco"]);
    }

    #[test]
    fn override_replaces_timing_dir() {
        let mut config = DatabaseConfig::for_device("CCGM1A1");
        config.timing_dir = PathBuf::from("from_file");
        let resolved = resolve_database_with(&config, Some(Path::new("/env/dir"))).unwrap();
        assert_eq!(resolved.timing_dir, PathBuf::from("/env/dir"));
    }

    #[test]
    fn unknown_device_errors() {
        let config = DatabaseConfig::for_device("CCGM1A9");
        let err = resolve_database_with(&config, None).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownDevice(ref d) if d == "CCGM1A9"));
    }
}
