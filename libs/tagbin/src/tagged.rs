//! Tagged-prefix length encodings.
//!
//! The top bits of the first byte tell how many bytes follow. Unlike the
//! fixed-width integers, the bytes of a multi-byte group are written most
//! significant first.
//!
//! | encoding | range             | bytes | first byte            |
//! |----------|-------------------|-------|-----------------------|
//! | 15-bit   | `[0, 2^7)`        | 1     | value                 |
//! | 15-bit   | `[2^7, 2^15)`     | 2     | `0x80 \| value >> 8`  |
//! | 30-bit   | `[0, 2^6)`        | 1     | value                 |
//! | 30-bit   | `[2^6, 2^14)`     | 2     | `0x40 \| value >> 8`  |
//! | 30-bit   | `[2^14, 2^22)`    | 3     | `0x80 \| value >> 16` |
//! | 30-bit   | `[2^22, 2^30)`    | 4     | `0xC0 \| value >> 24` |

use arrayvec::ArrayVec;

use crate::error::{Error, LengthEncoding, Result};

/// Holds one encoded length. Never more than 4 bytes.
pub type LengthBuf = ArrayVec<u8, 4>;

/// Byte `n` of `value`, counting from the least significant.
#[allow(clippy::cast_possible_truncation)]
const fn byte_at(value: usize, n: u32) -> u8 {
    (value >> (n * 8)) as u8
}

/// Encodes `value` with the 15-bit tagged prefix.
///
/// # Errors
///
/// Returns [`Error::OutOfRange`] if `value` is `2^15` or greater.
pub fn encode_uint15(value: usize) -> Result<LengthBuf> {
    let mut buf = LengthBuf::new();
    if value < 1 << 7 {
        buf.push(byte_at(value, 0));
    } else if value < 1 << 15 {
        buf.push(0x80 | byte_at(value, 1));
        buf.push(byte_at(value, 0));
    } else {
        return Err(out_of_range(LengthEncoding::Uint15, value));
    }

    Ok(buf)
}

/// Encodes `value` with the 30-bit tagged prefix.
///
/// # Errors
///
/// Returns [`Error::OutOfRange`] if `value` is `2^30` or greater.
pub fn encode_uint30(value: usize) -> Result<LengthBuf> {
    // (exclusive bound, tag) per encoded width, narrowest first
    const WIDTHS: [(usize, u8); 4] = [
        (1 << 6, 0x00),
        (1 << 14, 0x40),
        (1 << 22, 0x80),
        (1 << 30, 0xC0),
    ];

    let (width, tag) = WIDTHS
        .iter()
        .zip(0u32..)
        .find_map(|(&(bound, tag), n)| (value < bound).then_some((n, tag)))
        .ok_or_else(|| out_of_range(LengthEncoding::Uint30, value))?;

    let mut buf = LengthBuf::new();
    buf.push(tag | byte_at(value, width));
    for n in (0..width).rev() {
        buf.push(byte_at(value, n));
    }

    Ok(buf)
}

/// Encodes `value` with the given tagged-prefix encoding.
///
/// # Errors
///
/// Returns [`Error::OutOfRange`] if `value` does not fit `encoding`.
pub fn encode(encoding: LengthEncoding, value: usize) -> Result<LengthBuf> {
    match encoding {
        LengthEncoding::Uint15 => encode_uint15(value),
        LengthEncoding::Uint30 => encode_uint30(value),
    }
}

#[cold]
fn out_of_range(encoding: LengthEncoding, value: usize) -> Error {
    Error::OutOfRange { encoding, value }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uint15(value: usize) -> Vec<u8> {
        encode_uint15(value).expect("value must fit").to_vec()
    }

    fn uint30(value: usize) -> Vec<u8> {
        encode_uint30(value).expect("value must fit").to_vec()
    }

    #[test]
    fn uint15_known_values() {
        assert_eq!(uint15(0), [0], "zero");
        assert_eq!(uint15(127), [127], "largest single byte");
        assert_eq!(uint15(128), [128, 128], "smallest two bytes");
        assert_eq!(uint15(32767), [255, 255], "largest value");
    }

    #[test]
    fn uint15_width_by_range() {
        for v in 0..128 {
            let byte = u8::try_from(v).expect("below 128");
            assert_eq!(uint15(v), [byte], "{v} must be a single raw byte");
        }

        for v in 128..32768 {
            let buf = uint15(v);
            assert_eq!(buf.len(), 2, "{v} must take 2 bytes");
            assert_eq!(buf[0] & 0x80, 0x80, "{v} must set the top bit");
            let payload = (usize::from(buf[0] & 0x7F) << 8) | usize::from(buf[1]);
            assert_eq!(payload, v, "{v} payload");
        }
    }

    #[test]
    fn uint15_out_of_range() {
        for v in [32768, 65535, usize::MAX] {
            let err = encode_uint15(v).expect_err("must not fit");
            assert!(
                matches!(err, Error::OutOfRange { encoding: LengthEncoding::Uint15, value } if value == v),
                "unexpected error for {v}: {err:?}"
            );
        }
    }

    #[test]
    fn uint30_known_values() {
        assert_eq!(uint30(0), [0], "zero");
        assert_eq!(uint30(63), [63], "largest single byte");
        assert_eq!(uint30(64), [64, 64], "smallest two bytes");
        assert_eq!(uint30(16383), [127, 255], "largest two bytes");
        assert_eq!(uint30(16384), [128, 64, 0], "smallest three bytes");
        assert_eq!(uint30(4194303), [191, 255, 255], "largest three bytes");
        assert_eq!(uint30(4194304), [192, 64, 0, 0], "smallest four bytes");
        assert_eq!(uint30(1073741823), [255, 255, 255, 255], "largest value");
    }

    #[test]
    fn uint30_width_by_range() {
        fn check(range: impl Iterator<Item = usize>, len: usize, tag: u8) {
            for v in range {
                let buf = uint30(v);
                assert_eq!(buf.len(), len, "{v} must take {len} bytes");
                assert_eq!(buf[0] & 0xC0, tag, "{v} must carry tag {tag:#x}");

                let payload = buf[1..]
                    .iter()
                    .fold(usize::from(buf[0] & 0x3F), |acc, &b| (acc << 8) | usize::from(b));
                assert_eq!(payload, v, "{v} payload must be big-endian");
            }
        }

        check(0..64, 1, 0x00);
        check(64..16384, 2, 0x40);
        check((16384..4194304).step_by(4099), 3, 0x80);
        check((4194304..(1 << 30)).step_by(1_048_583).chain([(1 << 30) - 1]), 4, 0xC0);
    }

    #[test]
    fn uint30_out_of_range() {
        for v in [1 << 30, (1 << 30) + 1, usize::MAX] {
            let err = encode_uint30(v).expect_err("must not fit");
            assert!(err.is_range_violation(), "{v} must be a range violation");
        }
    }

    #[test]
    fn encode_dispatches() {
        assert_eq!(
            encode(LengthEncoding::Uint15, 200).expect("fits").as_slice(),
            &[0x80, 200],
            "15-bit"
        );
        assert_eq!(
            encode(LengthEncoding::Uint30, 200).expect("fits").as_slice(),
            &[0x40, 200],
            "30-bit"
        );
    }
}
