//! Generic LEB128 variable-length encoding.
//!
//! Unsigned integers are written as ULEB128, signed integers as SLEB128 with
//! two's complement sign extension. Both always produce the shortest
//! encoding for the value.
//!
//! See also: <https://en.wikipedia.org/wiki/LEB128>

use arrayvec::ArrayVec;

use crate::error::{Error, Result};

/// The longest possible encoding, that of a 128-bit integer.
pub const MAX_LEN: usize = (128 + 6) / 7;

/// Holds one LEB128-encoded integer.
pub type Leb128Buf = ArrayVec<u8, MAX_LEN>;

/// Selects how [`encode_native`] interprets its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signedness {
    /// SLEB128, sign-extended from the last group.
    Signed,
    /// ULEB128, only valid for non-negative values.
    Unsigned,
}

/// Declares a type as supporting being encoded in LEB128.
///
/// Implemented for all primitive integers. Unsigned types use ULEB128 and
/// signed types use SLEB128.
pub trait Leb128: Sized + Copy {
    /// Encodes `self` into its shortest LEB128 form.
    fn encode_leb128(self) -> Leb128Buf;
}

/// The low 7 bits of `x`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn group_of(x: i128) -> u8 {
    (x & 0x7F) as u8
}

#[allow(clippy::cast_possible_truncation)]
const fn low_byte(x: u128) -> u8 {
    x as u8
}

/// Writes `x` as ULEB128.
pub fn encode_unsigned(mut x: u128) -> Leb128Buf {
    let mut buf = Leb128Buf::new();
    while x >= 0x80 {
        buf.push(low_byte(x) | 0x80);
        x >>= 7;
    }

    buf.push(low_byte(x));
    buf
}

/// Writes `x` as SLEB128.
pub fn encode_signed(mut x: i128) -> Leb128Buf {
    let mut buf = Leb128Buf::new();
    loop {
        let group = group_of(x);
        // arithmetic shift, so negative values converge to -1
        x >>= 7;

        // done once the rest is just the sign extension of this group
        let sign_set = group & 0x40 != 0;
        if (x == 0 && !sign_set) || (x == -1 && sign_set) {
            buf.push(group);
            return buf;
        }

        buf.push(group | 0x80);
    }
}

/// Encodes a native integer with the requested signedness.
///
/// # Errors
///
/// Returns [`Error::NegativeUnsigned`] if `value` is negative and
/// `signedness` is [`Signedness::Unsigned`].
pub fn encode_native(value: isize, signedness: Signedness) -> Result<Leb128Buf> {
    match signedness {
        Signedness::Signed => Ok(value.encode_leb128()),
        Signedness::Unsigned => usize::try_from(value)
            .map(Leb128::encode_leb128)
            .map_err(|_| Error::NegativeUnsigned(value)),
    }
}

macro_rules! impl_uleb {
    ($($Ty:ty)*) => { $(
        impl Leb128 for $Ty {
            #[allow(clippy::cast_lossless)]
            fn encode_leb128(self) -> Leb128Buf {
                encode_unsigned(self as u128)
            }
        }
    )* };
}

macro_rules! impl_sleb {
    ($($Ty:ty)*) => { $(
        impl Leb128 for $Ty {
            #[allow(clippy::cast_lossless)]
            fn encode_leb128(self) -> Leb128Buf {
                encode_signed(self as i128)
            }
        }
    )* };
}

impl_uleb!(u8 u16 u32 u64 u128 usize);
impl_sleb!(i8 i16 i32 i64 i128 isize);
