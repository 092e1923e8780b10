//! Little-endian byte cursor over a decompressed timing image.
//!
//! The image carries no tags or lengths, so the cursor is the only thing
//! keeping fields aligned. Every read is bounds-checked and reports the
//! section being decoded when it runs out of data.

use crate::error::TimingError;

/// A forward-only cursor over a byte buffer.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
    section: &'static str,
}

impl<'a> ByteReader<'a> {
    /// Creates a cursor positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            section: "header",
        }
    }

    /// Creates a cursor positioned at `offset`.
    pub fn at(data: &'a [u8], offset: usize) -> Self {
        Self {
            data,
            pos: offset,
            section: "header",
        }
    }

    /// Sets the section name reported in truncation errors.
    pub fn enter(&mut self, section: &'static str) {
        self.section = section;
    }

    /// Returns the current section name.
    pub fn section(&self) -> &'static str {
        self.section
    }

    /// Returns the current byte offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Consumes exactly `n` bytes and returns them.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], TimingError> {
        if self.remaining() < n {
            return Err(TimingError::TruncatedData {
                section: self.section,
                offset: self.pos,
                needed: n,
                available: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Consumes `n` bytes without examining them.
    pub fn skip(&mut self, n: usize) -> Result<(), TimingError> {
        self.take(n).map(|_| ())
    }

    /// Reads a fixed-size byte array.
    pub fn array<const N: usize>(&mut self) -> Result<[u8; N], TimingError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Reads one unsigned byte.
    pub fn read_u8(&mut self) -> Result<u8, TimingError> {
        Ok(self.array::<1>()?[0])
    }

    /// Reads a little-endian `i16`.
    pub fn read_i16(&mut self) -> Result<i16, TimingError> {
        Ok(i16::from_le_bytes(self.array()?))
    }

    /// Reads a little-endian `i32`.
    pub fn read_i32(&mut self) -> Result<i32, TimingError> {
        Ok(i32::from_le_bytes(self.array()?))
    }

    /// Reads a little-endian IEEE-754 `f64`.
    pub fn read_f64(&mut self) -> Result<f64, TimingError> {
        Ok(f64::from_le_bytes(self.array()?))
    }

    /// Reads `N` consecutive little-endian `i32` values.
    pub fn read_i32s<const N: usize>(&mut self) -> Result<[i32; N], TimingError> {
        let mut out = [0i32; N];
        for v in &mut out {
            *v = self.read_i32()?;
        }
        Ok(out)
    }
}
