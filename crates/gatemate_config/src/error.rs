//! Error types for configuration loading and validation.

/// Errors that can occur when loading or validating a `gatemate.toml` configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// The configured device is not in the registry.
    #[error("unknown device '{0}'")]
    UnknownDevice(String),

    /// A required field is missing from the configuration.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unknown_device() {
        let err = ConfigError::UnknownDevice("CCGM9Z9".to_string());
        assert_eq!(format!("{err}"), "unknown device 'CCGM9Z9'");
    }

    #[test]
    fn display_missing_field() {
        let err = ConfigError::MissingField("database.device".to_string());
        assert_eq!(format!("{err}"), "missing required field: database.device");
    }

    #[test]
    fn display_parse_error() {
        let err = ConfigError::ParseError("expected '=' at line 2".to_string());
        assert_eq!(
            format!("{err}"),
            "failed to parse configuration: expected '=' at line 2"
        );
    }

    #[test]
    fn display_validation_error() {
        let err = ConfigError::ValidationError("unknown corner 'hot'".to_string());
        assert_eq!(format!("{err}"), "validation error: unknown corner 'hot'");
    }

    #[test]
    fn display_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = ConfigError::IoError(io_err);
        assert!(format!("{err}").starts_with("failed to read configuration:"));
    }
}
