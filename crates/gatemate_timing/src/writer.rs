//! Encoding raw tables back into the image layout.
//!
//! The writer mirrors [`decode`](crate::decode) field for field. Tooling uses
//! it to produce patched timing files, and tests use it to build fixtures.
//!
//! Re-encoding is value-preserving but not byte-preserving. Bytes the
//! decoder skips are written as zeros: the three bytes after `con_type`,
//! the RAM entry pad byte, the RAM alignment pad and the tail of every name
//! slot past the stored length. A vendor image with non-zero filler there
//! decodes to the same tables but does not re-encode to the same bytes.

use crate::decode::{RamTable, RawTimingData, TrailingValue};
use crate::delay::{TimingArc, TimingDelay};
use crate::layout::image_len;
use crate::record::{
    RamDelayEntry, RamPinPair, RawDelayRecord, RawDelayRecordTri, MAX_NAME_LEN,
    NAME_SLOT_BYTES,
};

/// Little-endian byte sink.
#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    /// Creates a writer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Returns the bytes written so far.
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    /// Returns the number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Writes one byte.
    pub fn u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    /// Writes `n` zero bytes.
    pub fn zeros(&mut self, n: usize) {
        self.buf.resize(self.buf.len() + n, 0);
    }

    /// Writes a little-endian `i16`.
    pub fn i16(&mut self, v: i16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Writes a little-endian `i32`.
    pub fn i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Writes a little-endian `f64`.
    pub fn f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Writes a delay triple.
    pub fn delay(&mut self, d: &TimingDelay) {
        self.i32(d.min);
        self.i32(d.typ);
        self.i32(d.max);
    }

    /// Writes a rise/fall arc.
    pub fn arc(&mut self, a: &TimingArc) {
        self.delay(&a.rise);
        self.delay(&a.fall);
    }

    /// Writes a name slot. Names longer than the slot are cut.
    pub fn name(&mut self, name: &str) {
        let bytes = &name.as_bytes()[..name.len().min(MAX_NAME_LEN)];
        // `bytes.len()` is at most MAX_NAME_LEN, which fits a byte
        self.u8(bytes.len() as u8);
        self.buf.extend_from_slice(bytes);
        self.zeros(NAME_SLOT_BYTES - 1 - bytes.len());
    }

    /// Writes a full delay record.
    pub fn record(&mut self, r: &RawDelayRecord) {
        self.arc(&r.arc);
        self.i32(r.config_mux);
        self.name(&r.name);
        for v in [r.x, r.y, r.plane, r.dir, r.inv, r.cnt] {
            self.i32(v);
        }
        self.u8(r.con_type);
        self.zeros(3);
    }

    /// Writes a single-triple record.
    pub fn tri_record(&mut self, r: &RawDelayRecordTri) {
        self.delay(&r.delay);
        self.i32(r.config_mux);
        self.name(&r.name);
        self.i32(r.x);
        self.i32(r.y);
    }

    /// Writes a RAM delay entry.
    pub fn ram_entry(&mut self, e: &RamDelayEntry) {
        self.u8(e.key);
        self.u8(e.edge1);
        self.u8(e.edge2);
        self.zeros(1);
        self.delay(&e.time1);
        self.delay(&e.time2);
    }

    /// Writes a RAM pin pair.
    pub fn pin_pair(&mut self, p: &RamPinPair) {
        self.i16(p.input);
        self.i16(p.output);
    }

    fn ram_table(&mut self, t: &RamTable) {
        t.entries.iter().for_each(|e| self.ram_entry(e));
        t.pin_pairs.iter().for_each(|p| self.pin_pair(p));
        t.bus_widths.iter().for_each(|&w| self.i16(w));
        self.zeros(crate::layout::RAM_ALIGN_PAD);
        t.clock_groups.iter().for_each(|&g| self.i32(g));
    }
}

/// Encodes raw tables into a decompressed image.
///
/// The output has exactly [`image_len`] bytes as long as every table has its
/// schema dimensions, which holds for anything built by
/// [`decode`](crate::decode) or [`RawTimingData::unconnected`].
pub fn encode(data: &RawTimingData) -> Vec<u8> {
    let mut w = ByteWriter::with_capacity(image_len());
    for table in [
        data.sb_tile.as_slice(),
        data.im_tile.as_slice(),
        data.om_tile.as_slice(),
    ] {
        table.iter().for_each(|a| w.arc(a));
    }
    data.cpe_tile.as_slice().iter().for_each(|r| w.record(r));
    for table in [
        data.sb_rim.as_slice(),
        data.edge.as_slice(),
        data.io_sel.as_slice(),
        data.clk_in.as_slice(),
        data.glb_out.as_slice(),
        data.pll.as_slice(),
    ] {
        table.iter().for_each(|a| w.arc(a));
    }
    data.ram.iter().for_each(|t| w.ram_table(t));
    data.io_coefficients
        .as_slice()
        .iter()
        .for_each(|&c| w.f64(c));
    for value in &data.trailing {
        match value {
            TrailingValue::Full(r) => w.record(r),
            TrailingValue::Tri(r) => w.tri_record(r),
        }
    }
    data.named.iter().for_each(|r| w.record(r));
    w.into_inner()
}
