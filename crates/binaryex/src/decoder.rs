//! Shape-driven decoder.
//!
//! The destination's static shape decides what is read next; the stream
//! itself carries no type information. Every rule mirrors the encoder.

use std::io::{self, Read};

use tracing::debug;

use crate::complex::Complex64;
use crate::encoder::MAX_VARINT_LEN64;
use crate::value::{Aggregate, ElementsMut, EntriesMut, PointerMut, SequenceMut, Value, ValueMut};
use crate::{DecoderOptions, Error, Result, Unexpected};

/// Reads values from a byte stream.
pub struct Decoder<R> {
    reader: R,
    options: DecoderOptions,
}

impl<R: Read> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, DecoderOptions::default())
    }

    pub fn with_options(reader: R, options: DecoderOptions) -> Self {
        Self { reader, options }
    }

    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    // ---------------------------------------------------------------- dispatch

    /// Reads into any [`Value`]: override capability first, then pointer
    /// allocation, then the structural rule for its kind.
    pub fn read_any(&mut self, value: &mut dyn Value) -> Result<()> {
        if let Some(unmarshaler) = value.unmarshaler() {
            let blob = self.read_bytes()?;
            return unmarshaler.unmarshal_binary(&blob);
        }

        match value.view_mut() {
            ValueMut::Unaddressable => Err(Error::UnaddressableValue),
            ValueMut::Pointer(pointer) => self.read_pointer(pointer),
            ValueMut::Bool(b) => {
                *b = self.read_boolean()?;
                Ok(())
            }
            ValueMut::Text(s) => {
                *s = self.read_string()?;
                Ok(())
            }
            ValueMut::Array(items) => self.read_array(items),
            ValueMut::Sequence(items) => self.read_sequence(items),
            ValueMut::Map(entries) => self.read_map(entries),
            ValueMut::Aggregate(aggregate) => self.read_aggregate(aggregate),
            ValueMut::Int(n) => {
                let v = self.read_int()?;
                Ok(n.set(v)?)
            }
            ValueMut::Uint(n) => {
                let v = self.read_uint()?;
                Ok(n.set(v)?)
            }
            ValueMut::Float(f) => {
                f.set(self.read_float()?);
                Ok(())
            }
            ValueMut::Complex(c) => {
                c.set(self.read_complex()?);
                Ok(())
            }
            ValueMut::Unsupported(what) => Err(Error::UnsupportedValue(what)),
        }
    }

    // ---------------------------------------------------------------- helpers

    fn read_byte(&mut self) -> Result<u8> {
        let mut b = [0u8; 1];
        self.reader.read_exact(&mut b)?;
        Ok(b[0])
    }

    fn read_array_raw<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.reader.read_exact(&mut buf)?;
        Ok(buf)
    }

    // ---------------------------------------------------------------- varint

    /// Reads a variable-length unsigned integer (max 10 bytes).
    ///
    /// An empty stream surfaces as the transport's end-of-file error; a
    /// stream that ends inside the sequence is malformed content.
    pub fn read_varint_u64(&mut self) -> Result<u64> {
        let mut result = 0u64;
        let mut shift = 0u32;
        for i in 0..MAX_VARINT_LEN64 {
            let b = match self.read_byte() {
                Ok(b) => b,
                Err(Error::Io(e)) if i > 0 && e.kind() == io::ErrorKind::UnexpectedEof => {
                    return Err(Unexpected::TruncatedVarint.into());
                }
                Err(e) => return Err(e),
            };
            if b < 0x80 {
                if i == MAX_VARINT_LEN64 - 1 && b > 1 {
                    return Err(Unexpected::VarintTooLong.into());
                }
                return Ok(result | (b as u64) << shift);
            }
            result |= ((b & 0x7f) as u64) << shift;
            shift += 7;
        }
        Err(Unexpected::VarintTooLong.into())
    }

    /// Reads a zigzag-decoded signed integer.
    pub fn read_int(&mut self) -> Result<i64> {
        let encoded = self.read_varint_u64()?;
        Ok(((encoded >> 1) as i64) ^ -((encoded & 1) as i64))
    }

    pub fn read_uint(&mut self) -> Result<u64> {
        self.read_varint_u64()
    }

    /// Reads a length or element count prefix and validates it.
    pub fn read_length(&mut self) -> Result<usize> {
        let n = self.read_varint_u64()?;
        if n > i64::MAX as u64 {
            debug!(prefix = n, "rejecting negative length prefix");
            return Err(Unexpected::NegativeLength(n as i64).into());
        }
        let len = usize::try_from(n).map_err(|_| Unexpected::LengthOverflow(n))?;
        if let Some(max) = self.options.max_length {
            if len > max {
                debug!(len, max, "rejecting length prefix over limit");
                return Err(Unexpected::LengthLimit { len: n, max }.into());
            }
        }
        Ok(len)
    }

    // ---------------------------------------------------------------- primitives

    /// Reads a strict boolean: only `0x00` and `0x01` are accepted.
    pub fn read_boolean(&mut self) -> Result<bool> {
        match self.read_byte()? {
            0 => Ok(false),
            1 => Ok(true),
            other => {
                debug!(byte = other, "rejecting boolean byte");
                Err(Unexpected::InvalidBool(other).into())
            }
        }
    }

    pub fn read_float(&mut self) -> Result<f64> {
        let bytes = self.read_array_raw::<8>()?;
        Ok(f64::from_le_bytes(bytes))
    }

    pub fn read_complex(&mut self) -> Result<Complex64> {
        let re = self.read_float()?;
        let im = self.read_float()?;
        Ok(Complex64::new(re, im))
    }

    /// Reads a length-prefixed byte blob.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>> {
        let len = self.read_length()?;
        // Grow with the data actually present instead of trusting the prefix.
        let mut buf = Vec::new();
        self.reader.by_ref().take(len as u64).read_to_end(&mut buf)?;
        if buf.len() != len {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
        }
        Ok(buf)
    }

    pub fn read_string(&mut self) -> Result<String> {
        let bytes = self.read_bytes()?;
        String::from_utf8(bytes).map_err(|_| Error::from(Unexpected::InvalidUtf8))
    }

    // ---------------------------------------------------------------- containers

    /// Fills a fixed-length array in place; no count is read.
    pub fn read_array(&mut self, items: &mut dyn ElementsMut) -> Result<()> {
        items.for_each_element_mut(&mut |item| self.read_any(item))
    }

    /// Reads a count, empties the sequence and appends elements as they are
    /// decoded. A count larger than the remaining input ends in an
    /// end-of-file error rather than a large allocation.
    pub fn read_sequence(&mut self, items: &mut dyn SequenceMut) -> Result<()> {
        let len = self.read_length()?;
        items.reset(len);
        for _ in 0..len {
            items.push_with(&mut |item| self.read_any(item))?;
        }
        Ok(())
    }

    /// Reads a count, replaces the map with an empty one and inserts pairs in
    /// stream order.
    pub fn read_map(&mut self, entries: &mut dyn EntriesMut) -> Result<()> {
        let len = self.read_length()?;
        entries.clear();
        for _ in 0..len {
            entries.insert_with(&mut |key, value| {
                self.read_any(key)?;
                self.read_any(value)
            })?;
        }
        Ok(())
    }

    pub fn read_aggregate(&mut self, aggregate: &mut dyn Aggregate) -> Result<()> {
        for (index, info) in aggregate.fields().iter().enumerate() {
            if !info.participates() {
                continue;
            }
            let field = aggregate
                .field_mut(index)
                .ok_or(Error::UnsupportedValue("aggregate field without a value"))?;
            self.read_any(field)?;
        }
        Ok(())
    }

    // ---------------------------------------------------------------- pointers

    /// Decodes into a freshly allocated zero value of the pointee and stores
    /// it in the pointer. No absent marker is read, so the result is always
    /// present.
    pub fn read_pointer(&mut self, pointer: &mut dyn PointerMut) -> Result<()> {
        pointer.replace_with(&mut |pointee| self.read_any(pointee))
    }
}
