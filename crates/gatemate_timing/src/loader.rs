//! Reading compressed timing files from disk.

use crate::decode::{decode, RawTimingData};
use crate::error::TimingError;
use crate::resolve::{resolve, ResolvedTimings};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Process/voltage/temperature corners shipped with the vendor toolchain.
pub const KNOWN_CORNERS: [&str; 9] = [
    "best_lpr", "best_eco", "best_spd", "typ_lpr", "typ_eco", "typ_spd", "worst_lpr",
    "worst_eco", "worst_spd",
];

/// Returns `true` if `corner` is one of [`KNOWN_CORNERS`].
pub fn is_known_corner(corner: &str) -> bool {
    KNOWN_CORNERS.contains(&corner)
}

/// Returns the file name holding the given corner's delays.
pub fn timing_file_name(corner: &str) -> String {
    format!("cc_{corner}_dly.dly")
}

/// Inflates a zlib stream.
///
/// # Errors
///
/// Returns [`TimingError::MalformedStream`] if the input is not a valid
/// zlib stream.
pub fn decompress(compressed: &[u8]) -> Result<Vec<u8>, TimingError> {
    let mut out = Vec::new();
    ZlibDecoder::new(compressed)
        .read_to_end(&mut out)
        .map_err(|e| TimingError::MalformedStream {
            reason: e.to_string(),
        })?;
    Ok(out)
}

/// Deflates an image into a zlib stream.
pub fn compress(image: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(image)?;
    encoder.finish()
}

/// Reads, inflates and decodes a timing file.
pub fn load_raw(path: &Path) -> Result<RawTimingData, TimingError> {
    let compressed = std::fs::read(path).map_err(|source| TimingError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let image = decompress(&compressed)?;
    debug!(
        path = %path.display(),
        compressed = compressed.len(),
        decompressed = image.len(),
        "inflated timing file"
    );
    decode(&image)
}

/// Loads and resolves one corner from `dir`.
pub fn load_corner(dir: &Path, corner: &str) -> Result<ResolvedTimings, TimingError> {
    let path: PathBuf = dir.join(timing_file_name(corner));
    let raw = load_raw(&path)?;
    let resolved = resolve(&raw);
    info!(
        corner,
        arcs = resolved.len(),
        collisions = resolved.collisions.len(),
        "loaded timing corner"
    );
    Ok(resolved)
}
