//! Self-serialization capability.
//!
//! A type that implements [`MarshalBinary`] / [`UnmarshalBinary`] and exposes
//! them through [`Value::marshaler`](crate::Value::marshaler) and
//! [`Value::unmarshaler`](crate::Value::unmarshaler) replaces its structural
//! encoding with its own byte blob. The blob travels length-prefixed, exactly
//! like text.
//!
//! The engine does not guard against an implementation that calls back into
//! the engine on itself.

use crate::Result;

/// Produces the byte representation of a value.
pub trait MarshalBinary {
    fn marshal_binary(&self) -> Result<Vec<u8>>;
}

/// Restores a value from the bytes produced by [`MarshalBinary`].
pub trait UnmarshalBinary {
    fn unmarshal_binary(&mut self, data: &[u8]) -> Result<()>;
}
