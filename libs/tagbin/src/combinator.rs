//! Element encoders and the combinators that nest them.
//!
//! An element encoder is anything implementing [`Encode`]: the unit structs
//! in this module for the primitives, closures built with [`from_fn`], or
//! one of the combinators wrapping another element encoder. Since every
//! combinator is an element encoder too, they nest to arbitrary depth:
//!
//! ```
//! use tagbin::Encoder;
//! use tagbin::combinator::{Str, list, nullable};
//!
//! let names = vec![Some("ab".to_owned()), None];
//! let mut enc = Encoder::new();
//! enc.encode_with(&list(nullable(Str)), &names)?;
//! assert_eq!(enc.snapshot(), &[2, 1, 2, b'a', b'b', 0]);
//! # Ok::<(), tagbin::Error>(())
//! ```

use crate::encoder::{Encoder, Int128, Uint128};
use crate::error::Result;
use crate::leb128::Leb128;

/// Appends the encoded form of a `T` to an [`Encoder`].
pub trait Encode<T: ?Sized> {
    /// Encodes `value`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `value` cannot be represented by this encoder. The
    /// encoder may have written some bytes already; the entry points on
    /// [`Encoder`] discard those.
    fn encode(&self, enc: &mut Encoder, value: &T) -> Result<()>;
}

impl<T, F> Encode<T> for F
where
    T: ?Sized,
    F: Fn(&mut Encoder, &T) -> Result<()>,
{
    fn encode(&self, enc: &mut Encoder, value: &T) -> Result<()> {
        self(enc, value)
    }
}

/// Turns a closure into an element encoder.
///
/// This only exists to pin down the closure signature, so that it is
/// general over the lifetimes of its arguments.
pub fn from_fn<T, F>(f: F) -> F
where
    T: ?Sized,
    F: Fn(&mut Encoder, &T) -> Result<()>,
{
    f
}

macro_rules! infallible {
    ($($(#[$attr:meta])* $Name:ident($Ty:ty) => $method:ident;)*) => { $(
        $(#[$attr])*
        #[derive(Debug, Default, Clone, Copy)]
        pub struct $Name;

        impl Encode<$Ty> for $Name {
            fn encode(&self, enc: &mut Encoder, value: &$Ty) -> Result<()> {
                enc.$method(*value);
                Ok(())
            }
        }
    )* };
}

infallible! {
    /// Encodes a [`bool`] as a single byte.
    Bool(bool) => encode_bool;
    /// Encodes presence as a single byte.
    OptionTag(bool) => encode_option_tag;
    U8(u8) => encode_u8;
    U16(u16) => encode_u16;
    U32(u32) => encode_u32;
    U64(u64) => encode_u64;
    I8(i8) => encode_i8;
    I16(i16) => encode_i16;
    I32(i32) => encode_i32;
    I64(i64) => encode_i64;
    F32(f32) => encode_f32;
    F64(f64) => encode_f64;
    /// Encodes a [`char`] as its 4-byte code point.
    Char(char) => encode_char;
    /// Encodes an [`Int128`] or [`i128`] as two 64-bit halves.
    I128(Int128) => encode_int128;
    /// Encodes a [`Uint128`] or [`u128`] as two 64-bit halves.
    U128(Uint128) => encode_uint128;
}

impl Encode<i128> for I128 {
    fn encode(&self, enc: &mut Encoder, value: &i128) -> Result<()> {
        enc.encode_int128(Int128::from(*value));
        Ok(())
    }
}

impl Encode<u128> for U128 {
    fn encode(&self, enc: &mut Encoder, value: &u128) -> Result<()> {
        enc.encode_uint128(Uint128::from(*value));
        Ok(())
    }
}

/// Encodes a byte sequence with a 30-bit length prefix.
#[derive(Debug, Default, Clone, Copy)]
pub struct Bytes;

impl Encode<[u8]> for Bytes {
    fn encode(&self, enc: &mut Encoder, value: &[u8]) -> Result<()> {
        enc.encode_bytes(value)
    }
}

impl Encode<Vec<u8>> for Bytes {
    fn encode(&self, enc: &mut Encoder, value: &Vec<u8>) -> Result<()> {
        enc.encode_bytes(value)
    }
}

/// Encodes a string as its UTF-8 bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct Str;

impl Encode<str> for Str {
    fn encode(&self, enc: &mut Encoder, value: &str) -> Result<()> {
        enc.encode_string(value)
    }
}

impl Encode<&str> for Str {
    fn encode(&self, enc: &mut Encoder, value: &&str) -> Result<()> {
        enc.encode_string(value)
    }
}

impl Encode<String> for Str {
    fn encode(&self, enc: &mut Encoder, value: &String) -> Result<()> {
        enc.encode_string(value)
    }
}

/// Encodes a [`usize`] with the 15-bit tagged prefix.
#[derive(Debug, Default, Clone, Copy)]
pub struct LengthUint15;

impl Encode<usize> for LengthUint15 {
    fn encode(&self, enc: &mut Encoder, value: &usize) -> Result<()> {
        enc.encode_length_uint15(*value)
    }
}

/// Encodes a [`usize`] with the 30-bit tagged prefix.
#[derive(Debug, Default, Clone, Copy)]
pub struct LengthUint30;

impl Encode<usize> for LengthUint30 {
    fn encode(&self, enc: &mut Encoder, value: &usize) -> Result<()> {
        enc.encode_length_uint30(*value)
    }
}

/// Encodes any primitive integer as LEB128.
#[derive(Debug, Default, Clone, Copy)]
pub struct Varint;

impl<T: Leb128> Encode<T> for Varint {
    fn encode(&self, enc: &mut Encoder, value: &T) -> Result<()> {
        enc.encode_varint(*value);
        Ok(())
    }
}

/// Encodes an [`Option`] as a presence tag followed by the value, if any.
#[derive(Debug, Default, Clone, Copy)]
pub struct Nullable<E>(pub E);

/// Encodes a sequence element by element, without a length.
///
/// The reader needs to know the element count from elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedList<E>(pub E);

/// Encodes a sequence as its 30-bit length followed by its elements.
#[derive(Debug, Default, Clone, Copy)]
pub struct List<E>(pub E);

/// Wraps `element` into an encoder for optional values.
pub const fn nullable<E>(element: E) -> Nullable<E> {
    Nullable(element)
}

/// Wraps `element` into an encoder for sequences of known length.
pub const fn fixed_list<E>(element: E) -> FixedList<E> {
    FixedList(element)
}

/// Wraps `element` into an encoder for length-prefixed sequences.
pub const fn list<E>(element: E) -> List<E> {
    List(element)
}

fn write_nullable<T, E>(enc: &mut Encoder, element: &E, value: Option<&T>) -> Result<()>
where
    T: ?Sized,
    E: Encode<T> + ?Sized,
{
    enc.encode_option_tag(value.is_some());
    match value {
        Some(value) => element.encode(enc, value),
        None => Ok(()),
    }
}

fn write_items<'a, T, E, I>(enc: &mut Encoder, element: &E, items: I) -> Result<()>
where
    T: 'a + ?Sized,
    E: Encode<T> + ?Sized,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .try_for_each(|item| element.encode(enc, item))
}

fn write_list<'a, T, E, I>(enc: &mut Encoder, element: &E, items: I) -> Result<()>
where
    T: 'a + ?Sized,
    E: Encode<T> + ?Sized,
    I: IntoIterator<Item = &'a T>,
    I::IntoIter: ExactSizeIterator,
{
    let items = items.into_iter();
    enc.encode_length_uint30(items.len())?;
    write_items(enc, element, items)
}

impl<T, E: Encode<T>> Encode<Option<T>> for Nullable<E> {
    fn encode(&self, enc: &mut Encoder, value: &Option<T>) -> Result<()> {
        write_nullable(enc, &self.0, value.as_ref())
    }
}

impl<T, E: Encode<T>> Encode<[T]> for FixedList<E> {
    fn encode(&self, enc: &mut Encoder, value: &[T]) -> Result<()> {
        write_items(enc, &self.0, value)
    }
}

impl<T, E: Encode<T>> Encode<Vec<T>> for FixedList<E> {
    fn encode(&self, enc: &mut Encoder, value: &Vec<T>) -> Result<()> {
        write_items(enc, &self.0, value)
    }
}

impl<T, E: Encode<T>, const N: usize> Encode<[T; N]> for FixedList<E> {
    fn encode(&self, enc: &mut Encoder, value: &[T; N]) -> Result<()> {
        write_items(enc, &self.0, value)
    }
}

impl<E> FixedList<E> {
    /// Encodes every item yielded by `items`, in order.
    ///
    /// # Errors
    ///
    /// Returns `Err` if encoding any item fails.
    pub fn encode_iter<'a, T, I>(&self, enc: &mut Encoder, items: I) -> Result<()>
    where
        T: 'a + ?Sized,
        E: Encode<T>,
        I: IntoIterator<Item = &'a T>,
    {
        enc.atomic(|enc| write_items(enc, &self.0, items))
    }
}

impl<T, E: Encode<T>> Encode<[T]> for List<E> {
    fn encode(&self, enc: &mut Encoder, value: &[T]) -> Result<()> {
        write_list(enc, &self.0, value)
    }
}

impl<T, E: Encode<T>> Encode<Vec<T>> for List<E> {
    fn encode(&self, enc: &mut Encoder, value: &Vec<T>) -> Result<()> {
        write_list(enc, &self.0, value)
    }
}

impl<E> List<E> {
    /// Encodes the count of `items`, then every item in order.
    ///
    /// # Errors
    ///
    /// Returns `Err` if there are `2^30` items or more, or if encoding any
    /// item fails.
    pub fn encode_iter<'a, T, I>(&self, enc: &mut Encoder, items: I) -> Result<()>
    where
        T: 'a + ?Sized,
        E: Encode<T>,
        I: IntoIterator<Item = &'a T>,
        I::IntoIter: ExactSizeIterator,
    {
        enc.atomic(|enc| write_list(enc, &self.0, items))
    }
}

impl Encoder {
    /// Encodes `value` with the element encoder `element`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `element` fails. Nothing is written in that case.
    pub fn encode_with<T, E>(&mut self, element: &E, value: &T) -> Result<()>
    where
        T: ?Sized,
        E: Encode<T> + ?Sized,
    {
        self.atomic(|enc| element.encode(enc, value))
    }

    /// Writes the presence tag of `value` and, if present, the value itself.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `element` fails. Nothing is written in that case.
    pub fn encode_nullable<T, E>(&mut self, element: &E, value: Option<&T>) -> Result<()>
    where
        T: ?Sized,
        E: Encode<T> + ?Sized,
    {
        self.atomic(|enc| write_nullable(enc, element, value))
    }

    /// Writes every item of `items` without a length prefix.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `element` fails for any item. Nothing is written in
    /// that case.
    pub fn encode_fixed_list<T, E>(&mut self, element: &E, items: &[T]) -> Result<()>
    where
        E: Encode<T> + ?Sized,
    {
        self.atomic(|enc| write_items(enc, element, items))
    }

    /// Writes the 30-bit length of `items`, then every item.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `items` is too long or `element` fails for any item.
    /// Nothing is written in that case.
    pub fn encode_list<T, E>(&mut self, element: &E, items: &[T]) -> Result<()>
    where
        E: Encode<T> + ?Sized,
    {
        self.atomic(|enc| write_list(enc, element, items))
    }
}
