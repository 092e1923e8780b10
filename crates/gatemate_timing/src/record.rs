//! Fixed-layout records of the timing image.
//!
//! Byte layouts (all little-endian):
//!
//! ```text
//! TimingDelay        12  min i32, typ i32, max i32
//! TimingArc          24  rise TimingDelay, fall TimingDelay
//! name slot          24  length u8, 23 bytes of ASCII (tail ignored)
//! RawDelayRecord     80  arc, selector i32, name slot,
//!                        x, y, plane, dir, inv, cnt (i32 each),
//!                        con_type u8 + 3 unexamined bytes
//! RawDelayRecordTri  48  delay, selector i32, name slot, x i32, y i32
//! RamDelayEntry      28  key u8, edge1 u8, edge2 u8, 1 pad byte,
//!                        time1 TimingDelay, time2 TimingDelay
//! RamPinPair          4  input i16, output i16
//! ```

use crate::delay::{TimingArc, TimingDelay};
use crate::error::TimingError;
use crate::reader::ByteReader;
use serde::{Deserialize, Serialize};

/// Encoded size of a [`TimingDelay`].
pub const DELAY_BYTES: usize = 12;
/// Encoded size of a [`TimingArc`].
pub const ARC_BYTES: usize = 2 * DELAY_BYTES;
/// Encoded size of a record name slot.
pub const NAME_SLOT_BYTES: usize = 24;
/// Longest name a slot can hold.
pub const MAX_NAME_LEN: usize = NAME_SLOT_BYTES - 1;
/// Encoded size of a [`RawDelayRecord`].
pub const RECORD_BYTES: usize = ARC_BYTES + 4 + NAME_SLOT_BYTES + 6 * 4 + 4;
/// Encoded size of a [`RawDelayRecordTri`].
pub const TRI_RECORD_BYTES: usize = DELAY_BYTES + 4 + NAME_SLOT_BYTES + 2 * 4;
/// Encoded size of a [`RamDelayEntry`].
pub const RAM_ENTRY_BYTES: usize = 4 + 2 * DELAY_BYTES;
/// Encoded size of a [`RamPinPair`].
pub const PIN_PAIR_BYTES: usize = 4;

/// Bytes occupied by the connection-type field: one is read, the rest skipped.
const CON_TYPE_READ: usize = 1;
const CON_TYPE_SKIP: usize = 3;

/// A delay record with routing metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawDelayRecord {
    /// Rise/fall delays.
    pub arc: TimingArc,
    /// Configuration-multiplexer selector.
    pub config_mux: i32,
    /// Short ASCII name; empty marks an unused record.
    pub name: String,
    /// Tile column.
    pub x: i32,
    /// Tile row.
    pub y: i32,
    /// Signal plane.
    pub plane: i32,
    /// Direction.
    pub dir: i32,
    /// Inversion flag.
    pub inv: i32,
    /// Count.
    pub cnt: i32,
    /// Connection-type tag.
    pub con_type: u8,
}

impl RawDelayRecord {
    /// Returns `true` if the record is in use (has a name).
    pub fn is_used(&self) -> bool {
        !self.name.is_empty()
    }
}

/// A narrower delay record carrying a single triple.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawDelayRecordTri {
    /// The delay triple.
    pub delay: TimingDelay,
    /// Configuration-multiplexer selector.
    pub config_mux: i32,
    /// Short ASCII name; empty marks an unused record.
    pub name: String,
    /// Tile column.
    pub x: i32,
    /// Tile row.
    pub y: i32,
}

impl RawDelayRecordTri {
    /// Returns `true` if the record is in use (has a name).
    pub fn is_used(&self) -> bool {
        !self.name.is_empty()
    }
}

/// Which name template a RAM delay entry uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RamKey {
    /// Combinational input-to-output path.
    IoPath,
    /// Setup/hold check.
    SetupHold,
    /// Minimum pulse width check.
    Width,
}

impl RamKey {
    /// Maps the raw key byte to a template; other values mark unused entries.
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(Self::IoPath),
            2 => Some(Self::SetupHold),
            4 => Some(Self::Width),
            _ => None,
        }
    }

    /// Returns the raw key byte.
    pub fn as_raw(self) -> u8 {
        match self {
            Self::IoPath => 1,
            Self::SetupHold => 2,
            Self::Width => 4,
        }
    }
}

/// One entry of a RAM delay table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RamDelayEntry {
    /// Raw key byte; see [`RamKey::from_raw`].
    pub key: u8,
    /// First edge selector.
    pub edge1: u8,
    /// Second edge selector.
    pub edge2: u8,
    /// First time (delay or setup).
    pub time1: TimingDelay,
    /// Second time (delay or hold).
    pub time2: TimingDelay,
}

impl RamDelayEntry {
    /// Returns the name template selected by this entry's key.
    pub fn ram_key(&self) -> Option<RamKey> {
        RamKey::from_raw(self.key)
    }
}

/// A positional (input pin, output pin) pair of a RAM table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RamPinPair {
    /// Input pin index.
    pub input: i16,
    /// Output pin index.
    pub output: i16,
}

/// Reads a delay triple.
pub fn read_delay(r: &mut ByteReader<'_>) -> Result<TimingDelay, TimingError> {
    let [min, typ, max] = r.read_i32s::<3>()?;
    Ok(TimingDelay { min, typ, max })
}

/// Reads a rise/fall arc.
pub fn read_arc(r: &mut ByteReader<'_>) -> Result<TimingArc, TimingError> {
    let rise = read_delay(r)?;
    let fall = read_delay(r)?;
    Ok(TimingArc { rise, fall })
}

/// Decodes an arc from a slice of exactly [`ARC_BYTES`] bytes.
///
/// Used by the chunked table decoder, which guarantees the slice length.
pub fn arc_from_chunk(chunk: &[u8]) -> TimingArc {
    let word = |i: usize| {
        let mut b = [0u8; 4];
        b.copy_from_slice(&chunk[i * 4..i * 4 + 4]);
        i32::from_le_bytes(b)
    };
    TimingArc {
        rise: TimingDelay::new(word(0), word(1), word(2)),
        fall: TimingDelay::new(word(3), word(4), word(5)),
    }
}

/// Reads a length-prefixed name slot.
fn read_name(r: &mut ByteReader<'_>) -> Result<String, TimingError> {
    let slot = r.take(NAME_SLOT_BYTES)?;
    let len = usize::from(slot[0]).min(MAX_NAME_LEN);
    Ok(slot[1..1 + len]
        .iter()
        .map(|&b| if b.is_ascii() { char::from(b) } else { '?' })
        .collect())
}

/// Reads a full delay record.
pub fn read_record(r: &mut ByteReader<'_>) -> Result<RawDelayRecord, TimingError> {
    let arc = read_arc(r)?;
    let config_mux = r.read_i32()?;
    let name = read_name(r)?;
    let [x, y, plane, dir, inv, cnt] = r.read_i32s::<6>()?;
    let con_type = r.take(CON_TYPE_READ)?[0];
    r.skip(CON_TYPE_SKIP)?;
    Ok(RawDelayRecord {
        arc,
        config_mux,
        name,
        x,
        y,
        plane,
        dir,
        inv,
        cnt,
        con_type,
    })
}

/// Reads a single-triple delay record.
pub fn read_tri_record(r: &mut ByteReader<'_>) -> Result<RawDelayRecordTri, TimingError> {
    let delay = read_delay(r)?;
    let config_mux = r.read_i32()?;
    let name = read_name(r)?;
    let [x, y] = r.read_i32s::<2>()?;
    Ok(RawDelayRecordTri {
        delay,
        config_mux,
        name,
        x,
        y,
    })
}

/// Reads a RAM delay entry.
pub fn read_ram_entry(r: &mut ByteReader<'_>) -> Result<RamDelayEntry, TimingError> {
    let [key, edge1, edge2] = r.array::<3>()?;
    r.skip(1)?;
    let time1 = read_delay(r)?;
    let time2 = read_delay(r)?;
    Ok(RamDelayEntry {
        key,
        edge1,
        edge2,
        time1,
        time2,
    })
}

/// Reads a RAM pin pair.
pub fn read_pin_pair(r: &mut ByteReader<'_>) -> Result<RamPinPair, TimingError> {
    let input = r.read_i16()?;
    let output = r.read_i16()?;
    Ok(RamPinPair { input, output })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_i32s(buf: &mut Vec<u8>, values: &[i32]) {
        for v in values {
            buf.extend_from_slice(&v.to_le_bytes());
        }
    }

    fn name_slot(name: &str) -> Vec<u8> {
        let mut slot = vec![0u8; NAME_SLOT_BYTES];
        slot[0] = name.len() as u8;
        slot[1..1 + name.len()].copy_from_slice(name.as_bytes());
        slot
    }

    #[test]
    fn layout_sizes() {
        assert_eq!(ARC_BYTES, 24);
        assert_eq!(RECORD_BYTES, 80);
        assert_eq!(TRI_RECORD_BYTES, 48);
        assert_eq!(RAM_ENTRY_BYTES, 28);
    }

    #[test]
    fn decode_arc_fields_in_order() {
        let mut buf = Vec::new();
        push_i32s(&mut buf, &[1, 2, 3, -4, -5, -6]);
        let mut r = ByteReader::new(&buf);
        let arc = read_arc(&mut r).unwrap();
        assert_eq!(arc.rise, TimingDelay::new(1, 2, 3));
        assert_eq!(arc.fall, TimingDelay::new(-4, -5, -6));
        assert_eq!(arc_from_chunk(&buf), arc);
    }

    #[test]
    fn decode_record_consumes_eighty_bytes() {
        let mut buf = Vec::new();
        push_i32s(&mut buf, &[10, 20, 30, 40, 50, 60]);
        push_i32s(&mut buf, &[3]);
        buf.extend(name_slot("ADDF"));
        push_i32s(&mut buf, &[7, 8, 9, 1, 0, 2]);
        // con_type byte followed by three bytes that are never examined
        buf.extend_from_slice(&[5, 0xAA, 0xBB, 0xCC]);
        // a sentinel byte after the record
        buf.push(0x42);

        let mut r = ByteReader::new(&buf);
        let rec = read_record(&mut r).unwrap();
        assert_eq!(r.position(), RECORD_BYTES);
        assert_eq!(rec.arc.rise.max, 30);
        assert_eq!(rec.arc.fall.min, 40);
        assert_eq!(rec.config_mux, 3);
        assert_eq!(rec.name, "ADDF");
        assert_eq!((rec.x, rec.y, rec.plane), (7, 8, 9));
        assert_eq!((rec.dir, rec.inv, rec.cnt), (1, 0, 2));
        assert_eq!(rec.con_type, 5);
        assert_eq!(r.read_u8().unwrap(), 0x42);
    }

    #[test]
    fn decode_tri_record() {
        let mut buf = Vec::new();
        push_i32s(&mut buf, &[100, 200, 300, 4]);
        buf.extend(name_slot("del_cfg"));
        push_i32s(&mut buf, &[-1, 12]);
        let mut r = ByteReader::new(&buf);
        let rec = read_tri_record(&mut r).unwrap();
        assert_eq!(r.position(), TRI_RECORD_BYTES);
        assert_eq!(rec.delay, TimingDelay::new(100, 200, 300));
        assert_eq!(rec.config_mux, 4);
        assert_eq!(rec.name, "del_cfg");
        assert_eq!((rec.x, rec.y), (-1, 12));
    }

    #[test]
    fn name_length_is_clamped_and_tail_ignored() {
        let mut slot = vec![b'x'; NAME_SLOT_BYTES];
        slot[0] = 200;
        let mut r = ByteReader::new(&slot);
        assert_eq!(read_name(&mut r).unwrap().len(), MAX_NAME_LEN);

        let mut slot = name_slot("AB");
        slot[5] = b'Z';
        let mut r = ByteReader::new(&slot);
        assert_eq!(read_name(&mut r).unwrap(), "AB");
    }

    #[test]
    fn empty_name_marks_unused() {
        let rec = RawDelayRecord::default();
        assert!(!rec.is_used());
        let tri = RawDelayRecordTri {
            name: "x".to_string(),
            ..Default::default()
        };
        assert!(tri.is_used());
    }

    #[test]
    fn decode_ram_entry_skips_pad() {
        let mut buf = vec![2u8, 1, 0, 0xFF];
        push_i32s(&mut buf, &[1, 2, 3, 4, 5, 6]);
        let mut r = ByteReader::new(&buf);
        let e = read_ram_entry(&mut r).unwrap();
        assert_eq!(r.position(), RAM_ENTRY_BYTES);
        assert_eq!(e.ram_key(), Some(RamKey::SetupHold));
        assert_eq!((e.edge1, e.edge2), (1, 0));
        assert_eq!(e.time1, TimingDelay::new(1, 2, 3));
        assert_eq!(e.time2, TimingDelay::new(4, 5, 6));
    }

    #[test]
    fn ram_key_mapping() {
        assert_eq!(RamKey::from_raw(1), Some(RamKey::IoPath));
        assert_eq!(RamKey::from_raw(4), Some(RamKey::Width));
        assert_eq!(RamKey::from_raw(0), None);
        assert_eq!(RamKey::from_raw(3), None);
        for key in [RamKey::IoPath, RamKey::SetupHold, RamKey::Width] {
            assert_eq!(RamKey::from_raw(key.as_raw()), Some(key));
        }
    }

    #[test]
    fn truncated_record_fails() {
        let buf = vec![0u8; RECORD_BYTES - 1];
        let mut r = ByteReader::new(&buf);
        r.enter("CPE-tile delays");
        assert!(matches!(
            read_record(&mut r),
            Err(TimingError::TruncatedData {
                section: "CPE-tile delays",
                ..
            })
        ));
    }
}
