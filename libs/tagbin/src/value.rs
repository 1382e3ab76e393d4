//! Dynamically typed values and element encoders.
//!
//! [`Shape`] describes an encoder tree at runtime, for callers that only
//! know the layout of their data while running. Since any [`Value`] can be
//! handed to any [`Shape`], a mismatch is reported as
//! [`Error::TypeMismatch`] instead of being written.

use crate::combinator::Encode;
use crate::encoder::{Encoder, Int128, Uint128};
use crate::error::{Error, LengthEncoding, Result};
use crate::leb128::Signedness;

/// A dynamically typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Char(char),
    Int128(Int128),
    Uint128(Uint128),
    Bytes(Vec<u8>),
    String(String),
    /// An optional value. `None` is the absent value.
    Option(Option<Box<Value>>),
    /// An ordered sequence of values.
    Seq(Vec<Value>),
}

impl Value {
    /// A short name for the kind of this value.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Char(_) => "char",
            Self::Int128(_) => "int128",
            Self::Uint128(_) => "uint128",
            Self::Bytes(_) => "bytes",
            Self::String(_) => "string",
            Self::Option(_) => "option",
            Self::Seq(_) => "seq",
        }
    }

    /// The value as an unsigned integer, if it is one.
    fn as_unsigned(&self) -> Option<u64> {
        match *self {
            Self::U8(v) => Some(v.into()),
            Self::U16(v) => Some(v.into()),
            Self::U32(v) => Some(v.into()),
            Self::U64(v) => Some(v),
            _ => None,
        }
    }

    /// The value as a signed integer, if it is an integer of either kind.
    fn as_signed(&self) -> Option<i128> {
        match *self {
            Self::I8(v) => Some(v.into()),
            Self::I16(v) => Some(v.into()),
            Self::I32(v) => Some(v.into()),
            Self::I64(v) => Some(v.into()),
            _ => self.as_unsigned().map(i128::from),
        }
    }
}

impl From<Option<Value>> for Value {
    fn from(value: Option<Self>) -> Self {
        Self::Option(value.map(Box::new))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Self>) -> Self {
        Self::Seq(value)
    }
}

macro_rules! impl_from_primitive {
    ($($Ty:ty => $Variant:ident),* $(,)?) => { $(
        impl From<$Ty> for Value {
            fn from(value: $Ty) -> Self {
                Self::$Variant(value)
            }
        }
    )* };
}

impl_from_primitive!(
    bool => Bool,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    char => Char,
    Int128 => Int128,
    Uint128 => Uint128,
    String => String,
);

/// A runtime description of an element encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Bool,
    OptionTag,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Char,
    Int128,
    Uint128,
    Bytes,
    String,
    /// Any unsigned integer value, as a 15-bit tagged length.
    LengthUint15,
    /// Any unsigned integer value, as a 30-bit tagged length.
    LengthUint30,
    /// Any integer value, as LEB128 over the native integer width.
    Leb128(Signedness),
    /// An [`Value::Option`] whose present value has the inner shape.
    Nullable(Box<Shape>),
    /// A [`Value::Seq`] without a length prefix.
    FixedList(Box<Shape>),
    /// A [`Value::Seq`] with a 30-bit length prefix.
    List(Box<Shape>),
}

impl Shape {
    pub fn nullable(inner: Self) -> Self {
        Self::Nullable(Box::new(inner))
    }

    pub fn fixed_list(inner: Self) -> Self {
        Self::FixedList(Box::new(inner))
    }

    pub fn list(inner: Self) -> Self {
        Self::List(Box::new(inner))
    }

    /// A short name for the kind of value this shape accepts.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::OptionTag => "option tag",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Char => "char",
            Self::Int128 => "int128",
            Self::Uint128 => "uint128",
            Self::Bytes => "bytes",
            Self::String => "string",
            Self::LengthUint15 => "15-bit length",
            Self::LengthUint30 => "30-bit length",
            Self::Leb128(Signedness::Signed) => "signed leb128",
            Self::Leb128(Signedness::Unsigned) => "unsigned leb128",
            Self::Nullable(_) => "nullable",
            Self::FixedList(_) => "fixed list",
            Self::List(_) => "list",
        }
    }

    fn mismatch(&self, value: &Value) -> Error {
        Error::TypeMismatch {
            expected: self.name(),
            found: value.kind(),
        }
    }

    fn length_of(&self, value: &Value) -> Result<usize> {
        let v = value.as_unsigned().ok_or_else(|| self.mismatch(value))?;
        usize::try_from(v).map_err(|_| Error::IntegerOverflow)
    }
}

impl Encode<Value> for Shape {
    fn encode(&self, enc: &mut Encoder, value: &Value) -> Result<()> {
        match (self, value) {
            (Self::Bool, Value::Bool(v)) => enc.encode_bool(*v),
            (Self::OptionTag, Value::Bool(v)) => enc.encode_option_tag(*v),
            (Self::U8, Value::U8(v)) => enc.encode_u8(*v),
            (Self::U16, Value::U16(v)) => enc.encode_u16(*v),
            (Self::U32, Value::U32(v)) => enc.encode_u32(*v),
            (Self::U64, Value::U64(v)) => enc.encode_u64(*v),
            (Self::I8, Value::I8(v)) => enc.encode_i8(*v),
            (Self::I16, Value::I16(v)) => enc.encode_i16(*v),
            (Self::I32, Value::I32(v)) => enc.encode_i32(*v),
            (Self::I64, Value::I64(v)) => enc.encode_i64(*v),
            (Self::F32, Value::F32(v)) => enc.encode_f32(*v),
            (Self::F64, Value::F64(v)) => enc.encode_f64(*v),
            (Self::Char, Value::Char(v)) => enc.encode_char(*v),
            (Self::Int128, Value::Int128(v)) => enc.encode_int128(*v),
            (Self::Uint128, Value::Uint128(v)) => enc.encode_uint128(*v),
            (Self::Bytes, Value::Bytes(v)) => enc.encode_bytes(v)?,
            (Self::String, Value::String(v)) => enc.encode_string(v)?,
            (Self::LengthUint15, v) => {
                enc.encode_length(LengthEncoding::Uint15, self.length_of(v)?)?;
            }
            (Self::LengthUint30, v) => {
                enc.encode_length(LengthEncoding::Uint30, self.length_of(v)?)?;
            }
            (Self::Leb128(signedness), v) => {
                let v = v.as_signed().ok_or_else(|| self.mismatch(v))?;
                let v = isize::try_from(v).map_err(|_| Error::IntegerOverflow)?;
                enc.encode_leb128(v, *signedness)?;
            }
            (Self::Nullable(inner), Value::Option(v)) => {
                enc.encode_option_tag(v.is_some());
                if let Some(v) = v {
                    <Self as Encode<Value>>::encode(inner, enc, v)?;
                }
            }
            (Self::FixedList(inner), Value::Seq(items)) => {
                for item in items {
                    <Self as Encode<Value>>::encode(inner, enc, item)?;
                }
            }
            (Self::List(inner), Value::Seq(items)) => {
                enc.encode_length_uint30(items.len())?;
                for item in items {
                    <Self as Encode<Value>>::encode(inner, enc, item)?;
                }
            }
            (_, v) => return Err(self.mismatch(v)),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(shape: &Shape, value: &Value) -> Result<Vec<u8>> {
        let mut enc = Encoder::new();
        enc.encode_with(shape, value)?;
        Ok(enc.into_bytes())
    }

    #[test]
    fn primitives_match_static_encoders() {
        assert_eq!(
            encode(&Shape::U32, &Value::U32(0x0102_0304)).expect("match"),
            [4, 3, 2, 1],
            "u32"
        );
        assert_eq!(
            encode(&Shape::String, &"hey".into()).expect("match"),
            [3, b'h', b'e', b'y'],
            "string"
        );
        assert_eq!(
            encode(&Shape::OptionTag, &true.into()).expect("match"),
            [1],
            "option tag"
        );
        assert_eq!(
            encode(&Shape::Int128, &Int128 { low: 1, high: 0 }.into()).expect("match"),
            [[1u8, 0, 0, 0, 0, 0, 0, 0], [0; 8]].concat(),
            "int128"
        );
    }

    #[test]
    fn nested_shapes() {
        let shape = Shape::list(Shape::nullable(Shape::String));
        let value = Value::Seq(vec![
            Some(Value::from("a")).into(),
            Value::Option(None),
        ]);
        assert_eq!(
            encode(&shape, &value).expect("match"),
            [2, 1, 1, b'a', 0],
            "list of optional strings"
        );

        let shape = Shape::fixed_list(Shape::U8);
        let value = Value::from(vec![Value::U8(1), Value::U8(2)]);
        assert_eq!(encode(&shape, &value).expect("match"), [1, 2], "fixed list");
    }

    #[test]
    fn lengths_and_leb128_accept_any_integer() {
        assert_eq!(
            encode(&Shape::LengthUint15, &Value::U16(128)).expect("fits"),
            [0x80, 0x80],
            "u16 as 15-bit length"
        );
        assert_eq!(
            encode(&Shape::LengthUint30, &Value::U8(64)).expect("fits"),
            [0x40, 0x40],
            "u8 as 30-bit length"
        );
        assert_eq!(
            encode(&Shape::Leb128(Signedness::Signed), &Value::I8(-65)).expect("fits"),
            [0xBF, 0x7F],
            "signed leb128"
        );
        assert_eq!(
            encode(&Shape::Leb128(Signedness::Unsigned), &Value::U32(300)).expect("fits"),
            [0xAC, 0x02],
            "unsigned leb128"
        );
    }

    #[test]
    fn mismatch_writes_nothing() {
        let err = encode(&Shape::String, &Value::Bool(true)).expect_err("wrong kind");
        assert!(
            matches!(
                err,
                Error::TypeMismatch {
                    expected: "string",
                    found: "bool"
                }
            ),
            "unexpected error: {err:?}"
        );
        assert!(!err.is_range_violation(), "mismatch is not a range error");

        let shape = Shape::list(Shape::U8);
        let value = Value::Seq(vec![Value::U8(1), Value::I8(2)]);
        let mut enc = Encoder::new();
        enc.encode_u8(9);
        let err = enc.encode_with(&shape, &value).expect_err("second item");
        assert!(
            matches!(err, Error::TypeMismatch { expected: "u8", found: "i8" }),
            "unexpected error: {err:?}"
        );
        assert_eq!(enc.snapshot(), &[9], "partial list must be discarded");
    }

    #[test]
    fn leb128_rejects_negative_unsigned() {
        let err = encode(&Shape::Leb128(Signedness::Unsigned), &Value::I64(-1))
            .expect_err("negative");
        assert!(matches!(err, Error::NegativeUnsigned(-1)), "unexpected error: {err:?}");

        let err = encode(&Shape::LengthUint15, &Value::I32(3)).expect_err("signed length");
        assert!(
            matches!(err, Error::TypeMismatch { .. }),
            "lengths only take unsigned values: {err:?}"
        );
    }

    #[test]
    fn nullable_rejects_bare_value() {
        let err = encode(&Shape::nullable(Shape::U8), &Value::U8(1)).expect_err("not an option");
        assert!(
            matches!(
                err,
                Error::TypeMismatch {
                    expected: "nullable",
                    found: "u8"
                }
            ),
            "unexpected error: {err:?}"
        );
    }
}
