//! Error handling types.
//!
//! Every fallible operation in this crate returns [`Result`] with the shared
//! [`Error`] type.

use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// The tagged-prefix encodings available for lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthEncoding {
    /// 1 or 2 bytes, top bit of the first byte selects the width.
    Uint15,
    /// 1 to 4 bytes, top two bits of the first byte select the width.
    Uint30,
}

impl LengthEncoding {
    /// The exclusive upper bound of values this encoding accepts.
    pub const fn limit(self) -> usize {
        match self {
            Self::Uint15 => 1 << 15,
            Self::Uint30 => 1 << 30,
        }
    }
}

impl fmt::Display for LengthEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Uint15 => "15-bit length",
            Self::Uint30 => "30-bit length",
        })
    }
}

/// Potential errors to encounter when encoding values.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A length exceeded the capacity of its tagged-prefix encoding.
    #[error("{value} is out of range for a {encoding} (limit is {})", .encoding.limit())]
    OutOfRange {
        encoding: LengthEncoding,
        value: usize,
    },
    /// Unsigned LEB128 was requested for a negative value.
    #[error("negative value {0} cannot be encoded as unsigned LEB128")]
    NegativeUnsigned(isize),
    /// A dynamic integer value does not fit the native integer width.
    #[error("integer value does not fit into a native integer")]
    IntegerOverflow,
    /// An element encoder was handed a value of a shape it cannot encode.
    #[error("element encoder for `{expected}` received a `{found}` value")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

impl Error {
    /// Whether this error reports a value outside the capacity of its
    /// encoding, as opposed to a value of the wrong kind.
    pub fn is_range_violation(&self) -> bool {
        matches!(
            self,
            Self::OutOfRange { .. } | Self::NegativeUnsigned(_) | Self::IntegerOverflow
        )
    }
}
