//! Error types for loading and decoding timing files.

use std::path::PathBuf;

/// Errors that can occur while loading a timing corner.
///
/// Every variant is terminal for the corner being loaded. Decoding is
/// deterministic, so none of them are worth retrying.
#[derive(Debug, thiserror::Error)]
pub enum TimingError {
    /// The file could not be read.
    #[error("timing file I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not a valid compressed stream.
    #[error("malformed compressed stream: {reason}")]
    MalformedStream {
        /// Description of the decompression failure.
        reason: String,
    },

    /// Fewer bytes remain than the current field requires.
    #[error(
        "truncated timing data in section '{section}' at offset {offset}: \
         needed {needed} bytes, {available} available"
    )]
    TruncatedData {
        /// The section being decoded when the data ran out.
        section: &'static str,
        /// Byte offset of the field that could not be read.
        offset: usize,
        /// Bytes required by the field.
        needed: usize,
        /// Bytes remaining in the buffer.
        available: usize,
    },

    /// Bytes remain after the last section was decoded.
    #[error("{extra} unexpected bytes after the last timing section")]
    TrailingData {
        /// Number of bytes left over.
        extra: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_display_names_section() {
        let err = TimingError::TruncatedData {
            section: "edge delays",
            offset: 1024,
            needed: 24,
            available: 23,
        };
        let msg = err.to_string();
        assert!(msg.contains("edge delays"));
        assert!(msg.contains("offset 1024"));
        assert!(msg.contains("needed 24"));
    }

    #[test]
    fn malformed_display() {
        let err = TimingError::MalformedStream {
            reason: "invalid zlib header".to_string(),
        };
        assert!(err.to_string().contains("invalid zlib header"));
    }

    #[test]
    fn io_display() {
        let err = TimingError::Io {
            path: PathBuf::from("cc_worst_spd_dly.dly"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("cc_worst_spd_dly.dly"));
    }
}
