//! The encoder and its primitive encode calls.

use crate::buffer::OutputBuffer;
use crate::error::{LengthEncoding, Result};
use crate::leb128::{self, Leb128, Signedness};
use crate::tagged;

/// A signed 128-bit integer, split into its halves.
///
/// The encoder writes the halves as given and does not check that they form
/// a sensible two's complement value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Int128 {
    pub low: i64,
    pub high: i64,
}

/// An unsigned 128-bit integer, split into its halves.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Uint128 {
    pub low: u64,
    pub high: u64,
}

#[allow(clippy::cast_possible_truncation)]
impl From<i128> for Int128 {
    fn from(value: i128) -> Self {
        Self {
            low: value as i64,
            high: (value >> 64) as i64,
        }
    }
}

#[allow(clippy::cast_sign_loss)]
impl From<Int128> for i128 {
    fn from(value: Int128) -> Self {
        (Self::from(value.high) << 64) | Self::from(value.low as u64)
    }
}

#[allow(clippy::cast_possible_truncation)]
impl From<u128> for Uint128 {
    fn from(value: u128) -> Self {
        Self {
            low: value as u64,
            high: (value >> 64) as u64,
        }
    }
}

impl From<Uint128> for u128 {
    fn from(value: Uint128) -> Self {
        (Self::from(value.high) << 64) | Self::from(value.low)
    }
}

/// Writes values into an owned [`OutputBuffer`].
///
/// Each encode call either appends the complete encoding of its value or,
/// if it fails, leaves the buffer exactly as it was before the call. Output
/// of earlier successful calls is never touched.
///
/// An encoder is a single encoding session. Use one per thread.
#[derive(Debug, Default)]
pub struct Encoder {
    output: OutputBuffer,
}

impl Encoder {
    /// Creates an encoder with an empty buffer.
    pub const fn new() -> Self {
        Self {
            output: OutputBuffer::new(),
        }
    }

    /// Creates an encoder whose buffer has room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        log::trace!("creating encoder with capacity for {capacity} bytes");
        Self {
            output: OutputBuffer::with_capacity(capacity),
        }
    }

    /// Gets the bytes written so far. The encoder can keep writing after.
    pub fn snapshot(&self) -> &[u8] {
        self.output.snapshot()
    }

    /// Gets the underlying buffer.
    pub fn buffer(&self) -> &OutputBuffer {
        &self.output
    }

    /// Finishes encoding and returns the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        log::trace!("extracting {} encoded bytes", self.output.len());
        self.output.into_vec()
    }

    /// Appends raw bytes without any framing.
    pub fn append(&mut self, bytes: &[u8]) {
        self.output.append(bytes);
    }

    /// Runs `f`, discarding everything it wrote if it fails.
    pub(crate) fn atomic<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let mark = self.output.len();
        let res = f(self);
        if let Err(why) = &res {
            let written = self.output.len() - mark;
            if written != 0 {
                log::debug!("discarding {written} bytes of a failed encode call: {why}");
                self.output.truncate(mark);
            }
        }

        res
    }

    /// Writes `0x01` for `true` and `0x00` for `false`.
    pub fn encode_bool(&mut self, v: bool) {
        self.output.push(v.into());
    }

    /// Writes the presence tag that precedes an optional value.
    pub fn encode_option_tag(&mut self, present: bool) {
        self.encode_bool(present);
    }

    pub fn encode_u8(&mut self, v: u8) {
        self.output.push(v);
    }

    pub fn encode_u16(&mut self, v: u16) {
        self.output.append(&v.to_le_bytes());
    }

    pub fn encode_u32(&mut self, v: u32) {
        self.output.append(&v.to_le_bytes());
    }

    pub fn encode_u64(&mut self, v: u64) {
        self.output.append(&v.to_le_bytes());
    }

    #[allow(clippy::cast_sign_loss)]
    pub fn encode_i8(&mut self, v: i8) {
        self.output.push(v as u8);
    }

    pub fn encode_i16(&mut self, v: i16) {
        self.output.append(&v.to_le_bytes());
    }

    pub fn encode_i32(&mut self, v: i32) {
        self.output.append(&v.to_le_bytes());
    }

    pub fn encode_i64(&mut self, v: i64) {
        self.output.append(&v.to_le_bytes());
    }

    pub fn encode_f32(&mut self, v: f32) {
        self.output.append(&v.to_le_bytes());
    }

    pub fn encode_f64(&mut self, v: f64) {
        self.output.append(&v.to_le_bytes());
    }

    /// Writes the code point of `v` as a 4-byte little-endian integer.
    pub fn encode_char(&mut self, v: char) {
        // code points stay below 2^21, so the signed and unsigned forms agree
        self.encode_u32(v.into());
    }

    /// Writes the low half, then the high half.
    pub fn encode_int128(&mut self, v: Int128) {
        self.encode_i64(v.low);
        self.encode_i64(v.high);
    }

    /// Writes the low half, then the high half.
    pub fn encode_uint128(&mut self, v: Uint128) {
        self.encode_u64(v.low);
        self.encode_u64(v.high);
    }

    /// Writes the 30-bit length of `v` followed by its bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `v` holds `2^30` bytes or more.
    ///
    /// [`Error::OutOfRange`]: crate::Error::OutOfRange
    pub fn encode_bytes(&mut self, v: &[u8]) -> Result<()> {
        let len = tagged::encode_uint30(v.len())?;
        self.output.append(&len);
        self.output.append(v);
        Ok(())
    }

    /// Writes the UTF-8 bytes of `v`, prefixed with their count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `v` is `2^30` bytes long or longer.
    ///
    /// [`Error::OutOfRange`]: crate::Error::OutOfRange
    pub fn encode_string(&mut self, v: &str) -> Result<()> {
        self.encode_bytes(v.as_bytes())
    }

    /// Writes `v` with the 1 to 2 byte tagged prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `v` is `2^15` or greater.
    ///
    /// [`Error::OutOfRange`]: crate::Error::OutOfRange
    pub fn encode_length_uint15(&mut self, v: usize) -> Result<()> {
        self.encode_length(LengthEncoding::Uint15, v)
    }

    /// Writes `v` with the 1 to 4 byte tagged prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `v` is `2^30` or greater.
    ///
    /// [`Error::OutOfRange`]: crate::Error::OutOfRange
    pub fn encode_length_uint30(&mut self, v: usize) -> Result<()> {
        self.encode_length(LengthEncoding::Uint30, v)
    }

    /// Writes `v` with the tagged prefix selected by `encoding`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `v` does not fit `encoding`.
    ///
    /// [`Error::OutOfRange`]: crate::Error::OutOfRange
    pub fn encode_length(&mut self, encoding: LengthEncoding, v: usize) -> Result<()> {
        let buf = tagged::encode(encoding, v)?;
        self.output.append(&buf);
        Ok(())
    }

    /// Writes `v` as LEB128, signed or unsigned as requested.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NegativeUnsigned`] if `v` is negative and
    /// `signedness` is [`Signedness::Unsigned`].
    ///
    /// [`Error::NegativeUnsigned`]: crate::Error::NegativeUnsigned
    pub fn encode_leb128(&mut self, v: isize, signedness: Signedness) -> Result<()> {
        let buf = leb128::encode_native(v, signedness)?;
        self.output.append(&buf);
        Ok(())
    }

    /// Writes any integer as LEB128, picking the variant by its signedness.
    pub fn encode_varint<T: Leb128>(&mut self, v: T) {
        self.output.append(&v.encode_leb128());
    }
}
