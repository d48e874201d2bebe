//! Shape-driven encoder.
//!
//! Encoding rules:
//! - boolean: 1 byte (0 or 1)
//! - signed integers: zigzag + varint, whatever the declared width
//! - unsigned integers: varint
//! - float: widened to f64, 8 bytes IEEE 754 little-endian
//! - complex: widened to two f64, real then imaginary, 16 bytes
//! - text, override blobs: varint(length) + raw bytes
//! - array: items, no prefix
//! - sequence/map: varint(count) + items
//! - aggregate: participating fields in declaration order
//! - absent pointer: varint(0)

use std::io::Write;

use crate::complex::Complex64;
use crate::value::{Aggregate, Elements, Entries, Value, ValueRef};
use crate::{Error, Result};

/// Maximum number of bytes in a varint-encoded 64-bit integer.
pub const MAX_VARINT_LEN64: usize = 10;

/// Writes values to a byte stream.
pub struct Encoder<W> {
    pub writer: W,
}

impl<W: Write> Encoder<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    // ---------------------------------------------------------------- dispatch

    /// Writes any [`Value`]: override capability first, then pointer
    /// resolution, then the structural rule for its kind.
    pub fn write_any(&mut self, value: &dyn Value) -> Result<()> {
        if let Some(marshaler) = value.marshaler() {
            let blob = marshaler.marshal_binary()?;
            return self.write_bytes(&blob);
        }

        match value.view() {
            ValueRef::Pointer(pointee) => self.write_pointer(pointee),
            ValueRef::Bool(b) => self.write_boolean(b),
            ValueRef::Text(s) => self.write_str(s),
            ValueRef::Array(items) => self.write_array(items),
            ValueRef::Sequence(items) => self.write_sequence(items),
            ValueRef::Map(entries) => self.write_map(entries),
            ValueRef::Aggregate(aggregate) => self.write_aggregate(aggregate),
            ValueRef::Int(n) => self.write_int(n),
            ValueRef::Uint(n) => self.write_uint(n),
            ValueRef::Float(f) => self.write_float(f),
            ValueRef::Complex(c) => self.write_complex(c),
            ValueRef::Unsupported(what) => Err(Error::UnsupportedValue(what)),
        }
    }

    // ---------------------------------------------------------------- varint

    /// Writes a variable-length unsigned integer.
    pub fn write_varint_u64(&mut self, mut n: u64) -> Result<()> {
        let mut buf = [0u8; MAX_VARINT_LEN64];
        let mut i = 0;
        while n >= 0x80 {
            buf[i] = (n as u8) | 0x80;
            n >>= 7;
            i += 1;
        }
        buf[i] = n as u8;
        self.writer.write_all(&buf[..=i])?;
        Ok(())
    }

    /// Writes a zigzag-encoded signed integer as a varint.
    pub fn write_int(&mut self, n: i64) -> Result<()> {
        self.write_varint_u64(((n << 1) ^ (n >> 63)) as u64)
    }

    pub fn write_uint(&mut self, n: u64) -> Result<()> {
        self.write_varint_u64(n)
    }

    /// Writes a length or element count prefix.
    pub fn write_length(&mut self, len: usize) -> Result<()> {
        self.write_varint_u64(len as u64)
    }

    // ---------------------------------------------------------------- primitives

    pub fn write_boolean(&mut self, b: bool) -> Result<()> {
        self.writer.write_all(&[b as u8])?;
        Ok(())
    }

    pub fn write_float(&mut self, f: f64) -> Result<()> {
        self.writer.write_all(&f.to_bits().to_le_bytes())?;
        Ok(())
    }

    pub fn write_complex(&mut self, c: Complex64) -> Result<()> {
        self.write_float(c.re)?;
        self.write_float(c.im)
    }

    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.write_length(data.len())?;
        self.writer.write_all(data)?;
        Ok(())
    }

    pub fn write_str(&mut self, s: &str) -> Result<()> {
        self.write_bytes(s.as_bytes())
    }

    // ---------------------------------------------------------------- containers

    /// Writes the items of a fixed-length array, without a count.
    pub fn write_array(&mut self, items: &dyn Elements) -> Result<()> {
        items.for_each_element(&mut |item| self.write_any(item))
    }

    pub fn write_sequence(&mut self, items: &dyn Elements) -> Result<()> {
        self.write_length(items.len())?;
        items.for_each_element(&mut |item| self.write_any(item))
    }

    /// Writes a map in the collection's own iteration order.
    pub fn write_map(&mut self, entries: &dyn Entries) -> Result<()> {
        self.write_length(entries.len())?;
        entries.for_each_entry(&mut |key, value| {
            self.write_any(key)?;
            self.write_any(value)
        })
    }

    pub fn write_aggregate(&mut self, aggregate: &dyn Aggregate) -> Result<()> {
        for (index, info) in aggregate.fields().iter().enumerate() {
            if !info.participates() {
                continue;
            }
            let field = aggregate
                .field(index)
                .ok_or(Error::UnsupportedValue("aggregate field without a value"))?;
            self.write_any(field)?;
        }
        Ok(())
    }

    // ---------------------------------------------------------------- pointers

    /// Follows the pointer chain down to a concrete value, which is written
    /// as if it had not been behind a pointer. An absent link writes a
    /// single varint zero.
    pub fn write_pointer(&mut self, pointee: Option<&dyn Value>) -> Result<()> {
        let mut current = pointee;
        loop {
            let Some(value) = current else {
                return self.write_varint_u64(0);
            };
            match value.view() {
                ValueRef::Pointer(next) if value.marshaler().is_none() => current = next,
                _ => return self.write_any(value),
            }
        }
    }
}
