//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::GatemateConfig;
use gatemate_timing::is_known_corner;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

/// File name looked up in a project directory.
pub const CONFIG_FILE: &str = "gatemate.toml";

/// Loads and validates `gatemate.toml` from a project directory.
pub fn load_config(project_dir: &Path) -> Result<GatemateConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    debug!(path = %config_path.display(), "loading configuration");
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `gatemate.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<GatemateConfig, ConfigError> {
    let config: GatemateConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &GatemateConfig) -> Result<(), ConfigError> {
    let db = &config.database;
    if db.device.trim().is_empty() {
        return Err(ConfigError::MissingField("database.device".to_string()));
    }
    let mut seen = BTreeSet::new();
    for corner in &db.corners {
        if !is_known_corner(corner) {
            return Err(ConfigError::ValidationError(format!(
                "unknown corner '{corner}'"
            )));
        }
        if !seen.insert(corner.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "corner '{corner}' listed twice"
            )));
        }
    }
    Ok(())
}
