//! Error type of the database facade.

use gatemate_chip::ChipError;
use gatemate_config::ConfigError;
use gatemate_timing::TimingError;

/// Errors surfaced by [`Database`](crate::Database).
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Loading or decoding a timing corner failed.
    #[error(transparent)]
    Timing(#[from] TimingError),

    /// A registry lookup failed.
    #[error(transparent)]
    Chip(#[from] ChipError),

    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The corner name is not one of the known corners.
    #[error("unknown timing corner '{0}'")]
    UnknownCorner(String),
}
