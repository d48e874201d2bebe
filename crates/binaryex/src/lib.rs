//! Shape-driven binary encoding for Rust values.
//!
//! The stream carries no type tags or field names: the reader must decode
//! into a destination of the same shape the writer encoded from. Integers are
//! variable-length (zigzag for signed), floats are widened to 8-byte
//! little-endian IEEE 754, text and self-serialized blobs are length-prefixed,
//! and aggregates are written member by member in declaration order.
//!
//! ```
//! use binaryex::Value;
//!
//! #[derive(Value, Default, Debug, PartialEq)]
//! struct Point {
//!     pub x: i32,
//!     pub y: i32,
//!     label: String,
//! }
//!
//! let p = Point { x: -1, y: 300, label: "not written".into() };
//! let bytes = binaryex::to_vec(&p).unwrap();
//! assert_eq!(bytes, [0x01, 0xd8, 0x04]);
//!
//! let back: Point = binaryex::from_slice(&bytes).unwrap();
//! assert_eq!(back, Point { x: -1, y: 300, label: String::new() });
//! ```

extern crate self as binaryex;

mod capability;
mod complex;
mod decoder;
mod encoder;
mod error;
mod options;
mod value;

use std::io;

use tracing::trace;

pub use capability::{MarshalBinary, UnmarshalBinary};
pub use complex::{Complex, Complex32, Complex64};
pub use decoder::Decoder;
pub use encoder::{Encoder, MAX_VARINT_LEN64};
pub use error::{Error, Result, Unexpected};
pub use options::DecoderOptions;
pub use value::{
    Aggregate, ComplexMut, Elements, ElementsMut, Entries, EntriesMut, FieldInfo, FloatMut,
    IntMut, Kind, PointerMut, SequenceMut, UintMut, Value, ValueMut, ValueRef, PLACEHOLDER,
};

/// Derives [`Value`] for structs.
///
/// `pub` fields are written and read in declaration order; other fields are
/// left alone. `#[binary(skip)]` excludes a `pub` field, and
/// `#[binary(custom)]` on the struct routes it through its own
/// [`MarshalBinary`] / [`UnmarshalBinary`] implementations.
pub use binaryex_derive::Value;

/// Encodes `value` into `writer`.
pub fn write<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: Value + ?Sized,
{
    trace!(kind = ?value.kind(), "write");
    Encoder::new(writer).write_any(&value)
}

/// Decodes from `reader` into `value`, overwriting what it holds.
pub fn read<R, T>(reader: R, value: &mut T) -> Result<()>
where
    R: io::Read,
    T: Value + ?Sized,
{
    read_with_options(reader, value, DecoderOptions::default())
}

/// Like [`read`], with explicit [`DecoderOptions`].
pub fn read_with_options<R, T>(reader: R, mut value: &mut T, options: DecoderOptions) -> Result<()>
where
    R: io::Read,
    T: Value + ?Sized,
{
    trace!(kind = ?value.kind(), ?options, "read");
    Decoder::with_options(reader, options).read_any(&mut value)
}

/// Encodes `value` into a fresh buffer.
pub fn to_vec<T: Value + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write(&mut out, value)?;
    Ok(out)
}

/// Decodes a `T` from the start of `bytes`. Trailing bytes are ignored.
pub fn from_slice<T: Value + Default>(bytes: &[u8]) -> Result<T> {
    let mut value = T::default();
    read(bytes, &mut value)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_functions_round_trip() {
        let bytes = to_vec(&(true, -2i64, "hé".to_string())).unwrap();
        let back: (bool, i64, String) = from_slice(&bytes).unwrap();
        assert_eq!(back, (true, -2, "hé".to_string()));
    }

    #[test]
    fn write_accepts_unsized_values() {
        let mut out = Vec::new();
        write(&mut out, "ab").unwrap();
        assert_eq!(out, [0x02, b'a', b'b']);
    }

    #[test]
    fn read_rejects_unsized_text() {
        let mut buf = String::from("xy");
        let err = read(&[0x01, b'z'][..], buf.as_mut_str()).unwrap_err();
        assert!(matches!(err, Error::UnaddressableValue));
        assert_eq!(buf, "xy");
    }

    #[test]
    fn read_forwards_through_mutable_reference() {
        let mut n = 0u16;
        read(&[0xac, 0x02][..], &mut n).unwrap();
        assert_eq!(n, 300);

        let mut words = vec!["old".to_string()];
        read_with_options(&[0x01, 0x01, b'x'][..], &mut words, DecoderOptions::new()).unwrap();
        assert_eq!(words, vec!["x".to_string()]);
    }

    #[test]
    fn read_with_options_applies_limit() {
        let mut seq = Vec::<u8>::new();
        let options = DecoderOptions::new().max_length(1);
        let err = read_with_options(&[0x02, 0x01, 0x02][..], &mut seq, options).unwrap_err();
        assert!(err.is_unexpected());
    }
}
