//! Error types for registry lookups.

/// Errors returned by device, bank and package lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChipError {
    /// No device with this name exists.
    #[error("unknown device '{0}'")]
    UnknownDevice(String),

    /// No bank with this name exists.
    #[error("unknown bank '{0}'")]
    UnknownBank(String),

    /// The device has no package with this name.
    #[error("device '{device}' has no package '{package}'")]
    UnknownPackage {
        /// The device that was searched.
        device: String,
        /// The package name that was requested.
        package: String,
    },
}
