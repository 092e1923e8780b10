//! Decoding a decompressed timing image into raw tables.
//!
//! Sections are read strictly in image order. Large arc tables are sliced
//! off in one bounds check and converted in parallel chunks; every other
//! section is read field by field through the cursor.

use crate::delay::TimingArc;
use crate::error::TimingError;
use crate::layout::{
    self, FieldKind, RamFlavor, CLK_IN_DIMS, CPE_TILE_DIMS, EDGE_DIMS, GLB_OUT_DIMS,
    IM_TILE_DIMS, IO_COEF_DIMS, IO_SEL_DIMS, OM_TILE_DIMS, PLL_DIMS, SB_RIM_DIMS,
    SB_TILE_DIMS, TRAILING_FIELDS,
};
use crate::reader::ByteReader;
use crate::record::{
    self, arc_from_chunk, RamDelayEntry, RamPinPair, RawDelayRecord, RawDelayRecordTri,
    ARC_BYTES,
};
use crate::table::{element_count, Table};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// One RAM delay table with its auxiliary sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RamTable {
    /// Delay entries; the position is the entry number used in names.
    pub entries: Vec<RamDelayEntry>,
    /// Positional (input, output) pin pairs.
    pub pin_pairs: Vec<RamPinPair>,
    /// Port bus widths.
    pub bus_widths: Vec<i16>,
    /// Clock-group indices.
    pub clock_groups: Vec<i32>,
}

impl RamTable {
    /// A table with every entry unused.
    pub fn unused() -> Self {
        Self {
            entries: vec![RamDelayEntry::default(); layout::RAM_ENTRIES],
            pin_pairs: vec![RamPinPair::default(); layout::RAM_PIN_PAIRS],
            bus_widths: vec![0; layout::RAM_BUS_WIDTHS],
            clock_groups: vec![0; layout::RAM_CLOCK_GROUPS],
        }
    }
}

/// A trailing singleton field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrailingValue {
    /// A full record.
    Full(RawDelayRecord),
    /// A single-triple record.
    Tri(RawDelayRecordTri),
}

impl TrailingValue {
    /// An unused value of the given encoding.
    pub fn unused(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Full => Self::Full(RawDelayRecord::default()),
            FieldKind::Tri => Self::Tri(RawDelayRecordTri::default()),
        }
    }

    /// Returns the field's arc; tri records have equal rise and fall.
    pub fn arc(&self) -> TimingArc {
        match self {
            Self::Full(r) => r.arc,
            Self::Tri(r) => TimingArc::symmetric(r.delay),
        }
    }

    /// Returns the encoding of this value.
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Full(_) => FieldKind::Full,
            Self::Tri(_) => FieldKind::Tri,
        }
    }
}

/// Every table of a timing image, as stored (no names, no filtering).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTimingData {
    /// Switchbox-tile delays.
    pub sb_tile: Table<TimingArc, 6>,
    /// Input-mux-tile delays.
    pub im_tile: Table<TimingArc, 5>,
    /// Output-mux-tile delays.
    pub om_tile: Table<TimingArc, 4>,
    /// CPE-tile delay records.
    pub cpe_tile: Table<RawDelayRecord, 3>,
    /// Rim switchbox delays.
    pub sb_rim: Table<TimingArc, 5>,
    /// Edge delays.
    pub edge: Table<TimingArc, 4>,
    /// IO-select delays.
    pub io_sel: Table<TimingArc, 2>,
    /// Clock-input delays.
    pub clk_in: Table<TimingArc, 2>,
    /// Global-output delays.
    pub glb_out: Table<TimingArc, 2>,
    /// PLL delays.
    pub pll: Table<TimingArc, 2>,
    /// RAM tables in [`RamFlavor::ALL`] order.
    pub ram: [RamTable; 3],
    /// IO-select coefficients.
    pub io_coefficients: Table<f64, 2>,
    /// Trailing singleton fields, aligned with [`TRAILING_FIELDS`].
    pub trailing: Vec<TrailingValue>,
    /// Trailing named records.
    pub named: Vec<RawDelayRecord>,
}

impl RawTimingData {
    /// An image where every arc is unconnected and every record unused.
    pub fn unconnected() -> Self {
        let arc = TimingArc::UNCONNECTED;
        Self {
            sb_tile: Table::filled(SB_TILE_DIMS, arc),
            im_tile: Table::filled(IM_TILE_DIMS, arc),
            om_tile: Table::filled(OM_TILE_DIMS, arc),
            cpe_tile: Table::filled(CPE_TILE_DIMS, RawDelayRecord::default()),
            sb_rim: Table::filled(SB_RIM_DIMS, arc),
            edge: Table::filled(EDGE_DIMS, arc),
            io_sel: Table::filled(IO_SEL_DIMS, arc),
            clk_in: Table::filled(CLK_IN_DIMS, arc),
            glb_out: Table::filled(GLB_OUT_DIMS, arc),
            pll: Table::filled(PLL_DIMS, arc),
            ram: [RamTable::unused(), RamTable::unused(), RamTable::unused()],
            io_coefficients: Table::filled(IO_COEF_DIMS, 0.0),
            trailing: TRAILING_FIELDS
                .iter()
                .map(|(_, kind)| TrailingValue::unused(*kind))
                .collect(),
            named: vec![RawDelayRecord::default(); layout::NAMED_RECORDS],
        }
    }

    /// Returns the RAM table of the given flavor.
    pub fn ram(&self, flavor: RamFlavor) -> &RamTable {
        &self.ram[ram_slot(flavor)]
    }

    /// Returns a mutable reference to the RAM table of the given flavor.
    pub fn ram_mut(&mut self, flavor: RamFlavor) -> &mut RamTable {
        &mut self.ram[ram_slot(flavor)]
    }

    /// Returns the trailing field with the given name.
    pub fn trailing_field(&self, name: &str) -> Option<&TrailingValue> {
        TRAILING_FIELDS
            .iter()
            .position(|(n, _)| *n == name)
            .and_then(|i| self.trailing.get(i))
    }

    /// Returns a mutable reference to the trailing field with the given name.
    pub fn trailing_field_mut(&mut self, name: &str) -> Option<&mut TrailingValue> {
        TRAILING_FIELDS
            .iter()
            .position(|(n, _)| *n == name)
            .and_then(|i| self.trailing.get_mut(i))
    }
}

fn ram_slot(flavor: RamFlavor) -> usize {
    match flavor {
        RamFlavor::NoEcc => 0,
        RamFlavor::Ecc => 1,
        RamFlavor::Registered => 2,
    }
}

/// Decodes a complete decompressed image.
///
/// # Errors
///
/// Returns [`TimingError::TruncatedData`] naming the section that ran out of
/// bytes, or [`TimingError::TrailingData`] if bytes remain afterwards.
pub fn decode(data: &[u8]) -> Result<RawTimingData, TimingError> {
    let mut r = ByteReader::new(data);

    let sb_tile = read_arc_table(&mut r, layout::SB_TILE, SB_TILE_DIMS)?;
    let im_tile = read_arc_table(&mut r, layout::IM_TILE, IM_TILE_DIMS)?;
    let om_tile = read_arc_table(&mut r, layout::OM_TILE, OM_TILE_DIMS)?;
    let cpe_tile = read_table(&mut r, layout::CPE_TILE, CPE_TILE_DIMS, record::read_record)?;
    let sb_rim = read_arc_table(&mut r, layout::SB_RIM, SB_RIM_DIMS)?;
    let edge = read_arc_table(&mut r, layout::EDGE, EDGE_DIMS)?;
    let io_sel = read_arc_table(&mut r, layout::IO_SEL, IO_SEL_DIMS)?;
    let clk_in = read_arc_table(&mut r, layout::CLK_IN, CLK_IN_DIMS)?;
    let glb_out = read_arc_table(&mut r, layout::GLB_OUT, GLB_OUT_DIMS)?;
    let pll = read_arc_table(&mut r, layout::PLL, PLL_DIMS)?;
    let ram = [
        read_ram_table(&mut r, RamFlavor::NoEcc)?,
        read_ram_table(&mut r, RamFlavor::Ecc)?,
        read_ram_table(&mut r, RamFlavor::Registered)?,
    ];
    let io_coefficients = read_table(&mut r, layout::IO_COEF, IO_COEF_DIMS, |r| r.read_f64())?;

    r.enter(layout::TRAILING);
    let mut trailing = Vec::with_capacity(TRAILING_FIELDS.len());
    for (_, kind) in TRAILING_FIELDS {
        trailing.push(match kind {
            FieldKind::Full => TrailingValue::Full(record::read_record(&mut r)?),
            FieldKind::Tri => TrailingValue::Tri(record::read_tri_record(&mut r)?),
        });
    }
    let named = read_vec(&mut r, layout::NAMED, layout::NAMED_RECORDS, record::read_record)?;

    if r.remaining() > 0 {
        return Err(TimingError::TrailingData {
            extra: r.remaining(),
        });
    }

    Ok(RawTimingData {
        sb_tile,
        im_tile,
        om_tile,
        cpe_tile,
        sb_rim,
        edge,
        io_sel,
        clk_in,
        glb_out,
        pll,
        ram,
        io_coefficients,
        trailing,
        named,
    })
}

/// Reads an arc table in one slice and converts it in parallel.
fn read_arc_table<const N: usize>(
    r: &mut ByteReader<'_>,
    section: &'static str,
    dims: [usize; N],
) -> Result<Table<TimingArc, N>, TimingError> {
    r.enter(section);
    let bytes = r.take(element_count(&dims) * ARC_BYTES)?;
    let data: Vec<TimingArc> = bytes
        .par_chunks_exact(ARC_BYTES)
        .map(arc_from_chunk)
        .collect();
    Ok(Table::from_checked(dims, data))
}

fn read_table<T, const N: usize>(
    r: &mut ByteReader<'_>,
    section: &'static str,
    dims: [usize; N],
    read: impl FnMut(&mut ByteReader<'_>) -> Result<T, TimingError>,
) -> Result<Table<T, N>, TimingError> {
    let data = read_vec(r, section, element_count(&dims), read)?;
    Ok(Table::from_checked(dims, data))
}

fn read_vec<T>(
    r: &mut ByteReader<'_>,
    section: &'static str,
    count: usize,
    mut read: impl FnMut(&mut ByteReader<'_>) -> Result<T, TimingError>,
) -> Result<Vec<T>, TimingError> {
    r.enter(section);
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        out.push(read(r)?);
    }
    Ok(out)
}

fn read_ram_table(r: &mut ByteReader<'_>, flavor: RamFlavor) -> Result<RamTable, TimingError> {
    let [entries_name, pairs_name, widths_name, pad_name, groups_name] = flavor.section_names();
    let entries = read_vec(r, entries_name, layout::RAM_ENTRIES, record::read_ram_entry)?;
    let pin_pairs = read_vec(r, pairs_name, layout::RAM_PIN_PAIRS, record::read_pin_pair)?;
    let bus_widths = read_vec(r, widths_name, layout::RAM_BUS_WIDTHS, |r| r.read_i16())?;
    r.enter(pad_name);
    r.skip(layout::RAM_ALIGN_PAD)?;
    let clock_groups = read_vec(r, groups_name, layout::RAM_CLOCK_GROUPS, |r| r.read_i32())?;
    Ok(RamTable {
        entries,
        pin_pairs,
        bus_widths,
        clock_groups,
    })
}
