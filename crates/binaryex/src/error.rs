//! Error types for encoding and decoding.

use std::fmt;
use std::io;

use thiserror::Error;

/// Errors returned by [`write`](crate::write), [`read`](crate::read) and the
/// [`Encoder`](crate::Encoder) / [`Decoder`](crate::Decoder) methods.
#[derive(Debug, Error)]
pub enum Error {
    /// The value's kind has no encoding rule (function, channel, raw pointer).
    #[error("unsupported value: {0}")]
    UnsupportedValue(&'static str),

    /// The decode destination cannot be mutated in place.
    #[error("unaddressable value")]
    UnaddressableValue,

    /// The stream carries bytes that do not form a valid value.
    #[error("unexpected value: {0}")]
    UnexpectedValue(#[from] Unexpected),

    /// Transport fault surfaced by the underlying stream.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Raised by a [`MarshalBinary`](crate::MarshalBinary) or
    /// [`UnmarshalBinary`](crate::UnmarshalBinary) implementation.
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates an error carrying a capability-defined message.
    pub fn custom(msg: impl fmt::Display) -> Self {
        Self::Custom(msg.to_string())
    }

    /// Returns `true` for [`Error::UnexpectedValue`].
    pub fn is_unexpected(&self) -> bool {
        matches!(self, Self::UnexpectedValue(_))
    }
}

/// Details of malformed stream content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unexpected {
    #[error("invalid boolean byte 0x{0:02x}")]
    InvalidBool(u8),
    #[error("negative length {0}")]
    NegativeLength(i64),
    #[error("length {len} exceeds limit {max}")]
    LengthLimit { len: u64, max: usize },
    #[error("length {0} is not addressable on this platform")]
    LengthOverflow(u64),
    #[error("variable-length integer ends before its last byte")]
    TruncatedVarint,
    #[error("variable-length integer is too long")]
    VarintTooLong,
    #[error("{value} does not fit in {target}")]
    OutOfRange { value: i128, target: &'static str },
    #[error("invalid char scalar value 0x{0:x}")]
    InvalidChar(u64),
    #[error("invalid UTF-8")]
    InvalidUtf8,
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unexpected_converts_into_error() {
        let err: Error = Unexpected::InvalidBool(2).into();
        assert!(err.is_unexpected());
        assert_eq!(err.to_string(), "unexpected value: invalid boolean byte 0x02");
    }

    #[test]
    fn io_errors_pass_through() {
        let err: Error = io::Error::new(io::ErrorKind::UnexpectedEof, "short read").into();
        assert!(matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::UnexpectedEof));
        assert_eq!(err.to_string(), "short read");
    }

    #[test]
    fn custom_keeps_message() {
        let err = Error::custom(format_args!("bad stamp {}", 7));
        assert_eq!(err.to_string(), "bad stamp 7");
    }
}
