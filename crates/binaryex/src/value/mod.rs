//! Runtime shape of encodable values.
//!
//! [`Value`] is the introspection seam the engine traverses: it classifies a
//! value into a closed set of kinds and hands out a read-only view
//! ([`ValueRef`]) for encoding or a mutable view ([`ValueMut`]) for decoding.
//! Containers, aggregates and pointers expose their children through the
//! small traits in this module, so one exhaustive match in the encoder and
//! one in the decoder cover every shape.
//!
//! Implementations for std types live in `impls`; structs get theirs from
//! `#[derive(Value)]`.

mod impls;

use crate::capability::{MarshalBinary, UnmarshalBinary};
use crate::complex::{Complex32, Complex64};
use crate::error::{Result, Unexpected};

/// Field name that marks an aggregate member as ignored.
pub const PLACEHOLDER: &str = "_";

/// Classification of a value's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Int,
    Uint,
    Float,
    Complex,
    Text,
    Array,
    Sequence,
    Map,
    Aggregate,
    Pointer,
    Unsupported,
}

/// A value the engine can traverse.
pub trait Value {
    /// Read-only structural view used by the encoder.
    fn view(&self) -> ValueRef<'_>;

    /// Mutable structural view used by the decoder.
    fn view_mut(&mut self) -> ValueMut<'_>;

    fn kind(&self) -> Kind {
        self.view().kind()
    }

    /// Self-serialization capability; takes precedence over [`Value::view`].
    fn marshaler(&self) -> Option<&dyn MarshalBinary> {
        None
    }

    /// Self-deserialization capability; takes precedence over
    /// [`Value::view_mut`].
    fn unmarshaler(&mut self) -> Option<&mut dyn UnmarshalBinary> {
        None
    }
}

/// Read-only view of a value.
///
/// Numbers arrive already widened: the wire never depends on the declared
/// width.
#[derive(Clone, Copy)]
pub enum ValueRef<'a> {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Complex(Complex64),
    Text(&'a str),
    /// Fixed-length array; the length is part of the type.
    Array(&'a dyn Elements),
    Sequence(&'a dyn Elements),
    Map(&'a dyn Entries),
    Aggregate(&'a dyn Aggregate),
    /// `None` is an absent pointer.
    Pointer(Option<&'a dyn Value>),
    Unsupported(&'static str),
}

impl ValueRef<'_> {
    pub fn kind(&self) -> Kind {
        match self {
            ValueRef::Bool(_) => Kind::Bool,
            ValueRef::Int(_) => Kind::Int,
            ValueRef::Uint(_) => Kind::Uint,
            ValueRef::Float(_) => Kind::Float,
            ValueRef::Complex(_) => Kind::Complex,
            ValueRef::Text(_) => Kind::Text,
            ValueRef::Array(_) => Kind::Array,
            ValueRef::Sequence(_) => Kind::Sequence,
            ValueRef::Map(_) => Kind::Map,
            ValueRef::Aggregate(_) => Kind::Aggregate,
            ValueRef::Pointer(_) => Kind::Pointer,
            ValueRef::Unsupported(_) => Kind::Unsupported,
        }
    }
}

/// Mutable view of a decode destination.
pub enum ValueMut<'a> {
    Bool(&'a mut bool),
    Int(IntMut<'a>),
    Uint(UintMut<'a>),
    Float(FloatMut<'a>),
    Complex(ComplexMut<'a>),
    Text(&'a mut String),
    Array(&'a mut dyn ElementsMut),
    Sequence(&'a mut dyn SequenceMut),
    Map(&'a mut dyn EntriesMut),
    Aggregate(&'a mut dyn Aggregate),
    Pointer(&'a mut dyn PointerMut),
    /// The location can be read but not written (shared references, `str`).
    Unaddressable,
    Unsupported(&'static str),
}

/// Signed integer destination of a specific width.
pub enum IntMut<'a> {
    I8(&'a mut i8),
    I16(&'a mut i16),
    I32(&'a mut i32),
    I64(&'a mut i64),
    Isize(&'a mut isize),
}

impl IntMut<'_> {
    /// Stores `v`, failing when it does not fit the destination width.
    pub fn set(self, v: i64) -> Result<(), Unexpected> {
        match self {
            IntMut::I8(p) => *p = narrow(v, "i8")?,
            IntMut::I16(p) => *p = narrow(v, "i16")?,
            IntMut::I32(p) => *p = narrow(v, "i32")?,
            IntMut::I64(p) => *p = v,
            IntMut::Isize(p) => *p = narrow(v, "isize")?,
        }
        Ok(())
    }
}

/// Unsigned integer destination of a specific width.
pub enum UintMut<'a> {
    U8(&'a mut u8),
    U16(&'a mut u16),
    U32(&'a mut u32),
    U64(&'a mut u64),
    Usize(&'a mut usize),
    Char(&'a mut char),
}

impl UintMut<'_> {
    /// Stores `v`, failing when it does not fit the destination.
    pub fn set(self, v: u64) -> Result<(), Unexpected> {
        match self {
            UintMut::U8(p) => *p = narrow(v, "u8")?,
            UintMut::U16(p) => *p = narrow(v, "u16")?,
            UintMut::U32(p) => *p = narrow(v, "u32")?,
            UintMut::U64(p) => *p = v,
            UintMut::Usize(p) => *p = narrow(v, "usize")?,
            UintMut::Char(p) => {
                *p = u32::try_from(v)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or(Unexpected::InvalidChar(v))?;
            }
        }
        Ok(())
    }
}

fn narrow<S, T>(v: T, target: &'static str) -> Result<S, Unexpected>
where
    S: TryFrom<T>,
    T: Into<i128> + Copy,
{
    S::try_from(v).map_err(|_| Unexpected::OutOfRange {
        value: v.into(),
        target,
    })
}

/// Floating-point destination. Narrowing to `f32` rounds.
pub enum FloatMut<'a> {
    F32(&'a mut f32),
    F64(&'a mut f64),
}

impl FloatMut<'_> {
    pub fn set(self, v: f64) {
        match self {
            FloatMut::F32(p) => *p = v as f32,
            FloatMut::F64(p) => *p = v,
        }
    }
}

/// Complex destination. Narrowing to [`Complex32`] rounds both parts.
pub enum ComplexMut<'a> {
    C32(&'a mut Complex32),
    C64(&'a mut Complex64),
}

impl ComplexMut<'_> {
    pub fn set(self, v: Complex64) {
        match self {
            ComplexMut::C32(p) => *p = Complex32::new(v.re as f32, v.im as f32),
            ComplexMut::C64(p) => *p = v,
        }
    }
}

/// Ordered elements of an array or sequence.
pub trait Elements {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visits every element in order, stopping at the first error.
    fn for_each_element(&self, f: &mut dyn FnMut(&dyn Value) -> Result<()>) -> Result<()>;
}

/// Mutable access to the elements of an array or sequence.
pub trait ElementsMut {
    /// Visits every element in order, stopping at the first error.
    fn for_each_element_mut(
        &mut self,
        f: &mut dyn FnMut(&mut dyn Value) -> Result<()>,
    ) -> Result<()>;
}

/// A sequence whose length is chosen by the decoder.
pub trait SequenceMut: ElementsMut {
    /// Discards the current contents. `len` is the announced element count;
    /// it is only a capacity hint, since the stream may end before that many
    /// elements arrive.
    fn reset(&mut self, len: usize);

    /// Creates a zero element, lets `fill` decode into it, then appends it.
    fn push_with(&mut self, fill: &mut dyn FnMut(&mut dyn Value) -> Result<()>) -> Result<()>;
}

/// Key/value pairs of a map, in the collection's own iteration order.
pub trait Entries {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn for_each_entry(&self, f: &mut dyn FnMut(&dyn Value, &dyn Value) -> Result<()>) -> Result<()>;
}

/// Map destination.
pub trait EntriesMut {
    /// Replaces the map with a fresh empty one.
    fn clear(&mut self);

    /// Creates a zero key and value, lets `fill` decode into them, then
    /// inserts the pair.
    fn insert_with(
        &mut self,
        fill: &mut dyn FnMut(&mut dyn Value, &mut dyn Value) -> Result<()>,
    ) -> Result<()>;
}

/// Pointer destination.
pub trait PointerMut {
    /// Allocates a zero-valued pointee, lets `fill` decode into it, then
    /// stores it in the pointer.
    fn replace_with(&mut self, fill: &mut dyn FnMut(&mut dyn Value) -> Result<()>) -> Result<()>;
}

/// Name and visibility of an aggregate member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: &'static str,
    pub exported: bool,
}

impl FieldInfo {
    pub const fn new(name: &'static str, exported: bool) -> Self {
        Self { name, exported }
    }

    /// Whether the member is written and read at all. Encoder and decoder
    /// both filter through this.
    pub fn participates(&self) -> bool {
        self.exported && self.name != PLACEHOLDER
    }
}

/// Struct-like value with a fixed set of members in declaration order.
pub trait Aggregate {
    fn fields(&self) -> &'static [FieldInfo];

    fn field(&self, index: usize) -> Option<&dyn Value>;

    fn field_mut(&mut self, index: usize) -> Option<&mut dyn Value>;
}
