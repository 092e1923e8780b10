//! The database facade: one device, its fabric and its timing corners.

use crate::annotate::{annotate, AnnotatedConnection};
use crate::error::DbError;
use gatemate_arch::{
    classify_global, tile_template, ChipLayout, ConnectionGraph, TileCoordinate, TileTemplate,
    TileType,
};
use gatemate_chip::Chip;
use gatemate_config::{load_config, resolve_database, GatemateConfig, ResolvedDatabase};
use gatemate_timing::{is_known_corner, load_corner, ResolvedTimings};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Architecture database of a single device.
///
/// Topology queries are computed from coordinates and never fail. Timing
/// corners are loaded from `timing_dir` either up front
/// ([`Database::from_config`]) or on first use
/// ([`Database::resolve_timings`]).
#[derive(Debug)]
pub struct Database {
    chip: &'static Chip,
    layout: ChipLayout,
    timing_dir: PathBuf,
    corners: BTreeMap<String, ResolvedTimings>,
    unavailable: BTreeMap<String, String>,
}

impl Database {
    /// Opens a database for a registry device without loading any timings.
    pub fn for_device(device: &str, timing_dir: impl Into<PathBuf>) -> Result<Self, DbError> {
        let chip = gatemate_chip::chip(device)?;
        Ok(Self::new(chip, timing_dir.into()))
    }

    /// Loads `gatemate.toml` from `project_dir` and opens its database.
    ///
    /// A relative `timing_dir` is taken relative to `project_dir`.
    pub fn open(project_dir: &Path) -> Result<Self, DbError> {
        let mut config = load_config(project_dir)?;
        let timing_dir = &mut config.database.timing_dir;
        if timing_dir.is_relative() {
            *timing_dir = project_dir.join(&*timing_dir);
        }
        Self::from_config(&config)
    }

    /// Resolves `config` and loads every configured corner.
    ///
    /// A corner that fails to load is logged and recorded as unavailable;
    /// the others are still loaded.
    pub fn from_config(config: &GatemateConfig) -> Result<Self, DbError> {
        let resolved = resolve_database(&config.database)?;
        Ok(Self::from_resolved(&resolved))
    }

    /// Opens a database from an already resolved configuration.
    pub fn from_resolved(resolved: &ResolvedDatabase) -> Self {
        let mut db = Self::new(resolved.chip, resolved.timing_dir.clone());
        for corner in &resolved.corners {
            // failures are recorded by load
            let _ = db.load(corner);
        }
        info!(
            device = db.chip.name,
            loaded = db.corners.len(),
            unavailable = db.unavailable.len(),
            "opened architecture database"
        );
        db
    }

    fn new(chip: &'static Chip, timing_dir: PathBuf) -> Self {
        debug!(device = chip.name, dir = %timing_dir.display(), "creating database");
        Self {
            chip,
            layout: ChipLayout::for_chip(chip),
            timing_dir,
            corners: BTreeMap::new(),
            unavailable: BTreeMap::new(),
        }
    }

    /// The registry device.
    pub fn chip(&self) -> &'static Chip {
        self.chip
    }

    /// Die arrangement of the device.
    pub fn layout(&self) -> ChipLayout {
        self.layout
    }

    /// Directory timing files are read from.
    pub fn timing_dir(&self) -> &Path {
        &self.timing_dir
    }

    /// Classifies a tile in global coordinates.
    pub fn classify(&self, coord: TileCoordinate) -> TileType {
        classify_global(&self.layout, coord)
    }

    /// Template of the tile at `coord`.
    pub fn tile_template(&self, coord: TileCoordinate) -> &'static TileTemplate {
        tile_template(self.classify(coord))
    }

    /// Builds the fixed connections of the whole device.
    pub fn connections(&self) -> ConnectionGraph {
        ConnectionGraph::build(&self.layout)
    }

    /// Returns the timings of `corner`, loading them on first use.
    ///
    /// A corner that failed before is retried.
    pub fn resolve_timings(&mut self, corner: &str) -> Result<&ResolvedTimings, DbError> {
        if !self.corners.contains_key(corner) {
            self.load(corner)?;
        }
        self.corners
            .get(corner)
            .ok_or_else(|| DbError::UnknownCorner(corner.to_string()))
    }

    /// Timings of an already loaded corner.
    pub fn timings(&self, corner: &str) -> Option<&ResolvedTimings> {
        self.corners.get(corner)
    }

    /// Names of the loaded corners.
    pub fn corners(&self) -> impl Iterator<Item = &str> {
        self.corners.keys().map(String::as_str)
    }

    /// Corners that failed to load, with the reason.
    pub fn unavailable_corners(&self) -> impl Iterator<Item = (&str, &str)> {
        self.unavailable
            .iter()
            .map(|(corner, reason)| (corner.as_str(), reason.as_str()))
    }

    /// Annotates `graph` with the delays of `corner`.
    pub fn annotate(
        &mut self,
        graph: &ConnectionGraph,
        corner: &str,
    ) -> Result<Vec<AnnotatedConnection>, DbError> {
        let timings = self.resolve_timings(corner)?;
        Ok(annotate(graph, timings))
    }

    fn load(&mut self, corner: &str) -> Result<(), DbError> {
        if !is_known_corner(corner) {
            return Err(DbError::UnknownCorner(corner.to_string()));
        }
        match load_corner(&self.timing_dir, corner) {
            Ok(timings) => {
                self.unavailable.remove(corner);
                self.corners.insert(corner.to_string(), timings);
                Ok(())
            }
            Err(e) => {
                warn!(corner, error = %e, "timing corner unavailable");
                self.unavailable.insert(corner.to_string(), e.to_string());
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_layouts() {
        let db = Database::for_device("CCGM1A2", "delay").unwrap();
        assert_eq!(db.layout(), ChipLayout::new(1, 2));
        assert_eq!(db.chip().name, "CCGM1A2");
        assert_eq!(db.timing_dir(), Path::new("delay"));
    }

    #[test]
    fn unknown_device() {
        let err = Database::for_device("CCGM2X1", "delay").unwrap_err();
        assert!(matches!(err, DbError::Chip(_)));
    }

    #[test]
    fn classify_folds_onto_dies() {
        let db = Database::for_device("CCGM1A2", "delay").unwrap();
        // local (1, 1) of the upper die
        assert_eq!(db.classify(TileCoordinate::new(1, 135)), TileType::CpeBig);
        assert_eq!(db.classify(TileCoordinate::new(1, 1)), TileType::CpeBig);
        assert_eq!(db.classify(TileCoordinate::new(1, 400)), TileType::None);
        assert!(db
            .tile_template(TileCoordinate::new(5, 5))
            .has_wire("CPE.IN1"));
    }

    #[test]
    fn unknown_corner_is_rejected() {
        let mut db = Database::for_device("CCGM1A1", "delay").unwrap();
        for name in ["lukewarm", "TYP_LPR", ""] {
            let err = db.resolve_timings(name).unwrap_err();
            assert!(matches!(err, DbError::UnknownCorner(_)));
        }
        assert_eq!(db.unavailable_corners().count(), 0);
        assert_eq!(db.corners().count(), 0);
    }
}
