//! Projection of raw tables onto a flat name → arc map.
//!
//! Every table is walked in image order. Positions are turned into names
//! with the helpers in [`names`](crate::names); unconnected arcs and unused
//! records are dropped on the way.

use crate::decode::{RawTimingData, TrailingValue};
use crate::delay::TimingArc;
use crate::layout::{RamFlavor, TRAILING_FIELDS};
use crate::names;
use crate::record::{RamKey, RawDelayRecord};
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// The resolved timing table of one corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedTimings {
    /// Arcs by name, sorted.
    pub arcs: BTreeMap<String, TimingArc>,
    /// Names written more than once, in the order the overwrite happened.
    pub collisions: Vec<String>,
    /// IO-select coefficients, passed through unchanged.
    pub io_coefficients: Table<f64, 2>,
}

impl ResolvedTimings {
    /// Looks up an arc by name.
    pub fn get(&self, name: &str) -> Option<&TimingArc> {
        self.arcs.get(name)
    }

    /// Returns `true` if an arc with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.arcs.contains_key(name)
    }

    /// Returns the number of named arcs.
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// Returns `true` if no arc survived filtering.
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Iterates over `(name, arc)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TimingArc)> {
        self.arcs.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[derive(Default)]
struct Collector {
    arcs: BTreeMap<String, TimingArc>,
    collisions: Vec<String>,
}

impl Collector {
    /// Inserts a connected arc; the last write to a name wins.
    fn arc(&mut self, name: String, arc: TimingArc) {
        if !arc.is_connected() {
            return;
        }
        if let Some(previous) = self.arcs.insert(name.clone(), arc) {
            warn!(name = %name, ?previous, replacement = ?arc, "timing arc name collision");
            self.collisions.push(name);
        }
    }

    fn record(&mut self, name: String, record: &RawDelayRecord) {
        if record.is_used() {
            self.arc(name, record.arc);
        }
    }
}

/// Resolves every table of `raw` into named arcs.
pub fn resolve(raw: &RawTimingData) -> ResolvedTimings {
    let mut c = Collector::default();

    for ([t, x, j, p, d, s], arc) in raw.sb_tile.indexed() {
        c.arc(names::sb_tile(t, x, j, p, d, s), *arc);
    }
    for ([t, x, y, p, s], arc) in raw.im_tile.indexed() {
        c.arc(names::im_tile(t, x, y, p, s), *arc);
    }
    for ([x, y, p, s], arc) in raw.om_tile.indexed() {
        c.arc(names::om_tile(x, y, p, s), *arc);
    }
    for ([_, i, o], record) in raw.cpe_tile.indexed() {
        if let Some(name) = names::cpe(&record.name, i, o) {
            c.record(name, record);
        }
    }
    for ([i, side, p, d, s], arc) in raw.sb_rim.indexed() {
        c.arc(names::sb_rim(i, side, p, d, s), *arc);
    }
    for ([i, side, a, b], arc) in raw.edge.indexed() {
        c.arc(names::edge(i, side, a, b), *arc);
    }
    for ([path, drive], arc) in raw.io_sel.indexed() {
        c.arc(names::io_sel(path, drive), *arc);
    }
    for ([src, j], arc) in raw.clk_in.indexed() {
        c.arc(names::clk_in(src, j), *arc);
    }
    for ([a, b], arc) in raw.glb_out.indexed() {
        c.arc(names::glb_out(a, b), *arc);
    }
    for ([a, b], arc) in raw.pll.indexed() {
        c.arc(names::pll(a, b), *arc);
    }

    for flavor in RamFlavor::ALL {
        resolve_ram(&mut c, raw, flavor);
    }

    for ((field, _), value) in TRAILING_FIELDS.iter().zip(&raw.trailing) {
        let used = match value {
            TrailingValue::Full(r) => r.is_used(),
            TrailingValue::Tri(r) => r.is_used(),
        };
        if used {
            c.arc((*field).to_string(), value.arc());
        }
    }
    for record in &raw.named {
        c.record(record.name.clone(), record);
    }

    derive_feedback(&mut c);

    debug!(
        arcs = c.arcs.len(),
        collisions = c.collisions.len(),
        "resolved timing tables"
    );
    ResolvedTimings {
        arcs: c.arcs,
        collisions: c.collisions,
        io_coefficients: raw.io_coefficients.clone(),
    }
}

fn resolve_ram(c: &mut Collector, raw: &RawTimingData, flavor: RamFlavor) {
    let tag = flavor.tag();
    for (n, entry) in raw.ram(flavor).entries.iter().enumerate() {
        let name = match entry.ram_key() {
            Some(RamKey::IoPath) => format!("ram_{tag}_IOPATH_{n}"),
            Some(RamKey::SetupHold) => {
                // positions are < 3001, so the cast cannot wrap
                let index = n as i64 - flavor.setuphold_offset();
                format!("ram_{tag}_SETUPHOLD_{index}")
            }
            Some(RamKey::Width) => format!("ram_{tag}_WIDTH_{n}"),
            None => continue,
        };
        c.arc(
            name,
            TimingArc {
                rise: entry.time1,
                fall: entry.time2,
            },
        );
    }
}

fn derive_feedback(c: &mut Collector) {
    let (Some(&fb), Some(&glb)) = (
        c.arcs.get(names::FEEDBACK_MINUEND),
        c.arcs.get(names::FEEDBACK_SUBTRAHEND),
    ) else {
        debug!("feedback delay not derived: global-output arcs missing");
        return;
    };
    match fb.sub(glb) {
        Some(derived) => c.arc(names::FEEDBACK_DELAY.to_string(), derived),
        None => warn!(
            minuend = ?fb,
            subtrahend = ?glb,
            "feedback delay not derived: difference overflows"
        ),
    }
}
