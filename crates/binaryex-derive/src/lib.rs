//! # binaryex-derive
//!
//! `#[derive(Value)]` for the binaryex engine.
//!
//! The derive turns a struct into an aggregate: its fields are reported in
//! declaration order together with their name and visibility, and the engine
//! writes and reads the `pub` ones.
//!
//! ## Attributes
//!
//! - `#[binary(skip)]` on a field: never written or read, even when `pub`.
//! - `#[binary(custom)]` on the struct: the struct encodes through its own
//!   `MarshalBinary` / `UnmarshalBinary` implementations, which must exist.

mod generate;
mod parse;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derive `binaryex::Value` for a struct.
///
/// Named, tuple and unit structs are supported. On generic structs every
/// `pub`, non-skipped field type is bounded on `binaryex::Value`, so
/// `pub items: Vec<T>` implies `T: Value + Default`. Non-`pub` and skipped
/// fields do not need to implement `Value`.
#[proc_macro_derive(Value, attributes(binary))]
pub fn derive_value(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate::generate_value(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
