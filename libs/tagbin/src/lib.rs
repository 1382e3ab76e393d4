//! # Tagged Binary
//!
//! Compact, one-directional binary encoding. Values are appended to a single
//! growable buffer; there is no decoder in this crate.
//!
//! The encodings are as follows:
//!
//! - `bool`, option tag: one byte, `0x01` for true or present, else `0x00`
//! - `u8`, `i8`: one raw byte
//! - 16/32/64-bit integers: little-endian two's complement
//! - `f32`, `f64`: IEEE-754, little-endian
//! - `char`: its code point as a 4-byte little-endian integer
//! - 128-bit integers: the low 64-bit half, then the high half
//! - bytes and strings: `uint30` length, then the raw (UTF-8) bytes
//! - `uint15`: 1 or 2 byte tagged-prefix length, see [`tagged`]
//! - `uint30`: 1 to 4 byte tagged-prefix length, see [`tagged`]
//! - LEB128: signed or unsigned 7-bit groups, see [`leb128`]
//! - `nullable`: option tag, then the value if present
//! - `fixed list`: the elements, count known out-of-band
//! - `list`: `uint30` count, then the elements
//!
//! Note that the tagged-prefix lengths write their bytes most significant
//! first, unlike the fixed-width integers.
//!
//! Element encoders for the structural types are built by composition, see
//! [`combinator`]. The [`value`] module offers the same for values whose
//! shape is only known at runtime.
//!
//! ```
//! use tagbin::Encoder;
//!
//! let mut enc = Encoder::new();
//! enc.encode_length_uint30(16384)?;
//! enc.encode_string("hi")?;
//! enc.encode_u16(0x0102);
//! assert_eq!(enc.into_bytes(), [0x80, 0x40, 0x00, 2, b'h', b'i', 0x02, 0x01]);
//! # Ok::<(), tagbin::Error>(())
//! ```

// for benchmarks
#[cfg(test)]
use criterion as _;

pub mod buffer;
pub mod combinator;
mod encoder;
mod error;
pub mod leb128;
pub mod tagged;
pub mod value;

pub use buffer::OutputBuffer;
pub use encoder::{Encoder, Int128, Uint128};
pub use error::{Error, LengthEncoding, Result};
pub use leb128::Signedness;
