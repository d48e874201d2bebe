//! [`Value`] implementations for std types.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::{BuildHasher, Hash};
use std::rc::Rc;
use std::sync::mpsc::{Receiver, Sender, SyncSender};
use std::sync::Arc;

use super::{
    Aggregate, ComplexMut, Elements, ElementsMut, Entries, EntriesMut, FieldInfo, FloatMut,
    IntMut, PointerMut, SequenceMut, UintMut, Value, ValueMut, ValueRef,
};
use crate::complex::{Complex32, Complex64};
use crate::Result;

// ---------------------------------------------------------------- primitives

impl Value for bool {
    fn view(&self) -> ValueRef<'_> {
        ValueRef::Bool(*self)
    }

    fn view_mut(&mut self) -> ValueMut<'_> {
        ValueMut::Bool(self)
    }
}

macro_rules! impl_int {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl Value for $ty {
            fn view(&self) -> ValueRef<'_> {
                ValueRef::Int(*self as i64)
            }

            fn view_mut(&mut self) -> ValueMut<'_> {
                ValueMut::Int(IntMut::$variant(self))
            }
        }
    )*};
}

impl_int!(i8 => I8, i16 => I16, i32 => I32, i64 => I64, isize => Isize);

macro_rules! impl_uint {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl Value for $ty {
            fn view(&self) -> ValueRef<'_> {
                ValueRef::Uint(*self as u64)
            }

            fn view_mut(&mut self) -> ValueMut<'_> {
                ValueMut::Uint(UintMut::$variant(self))
            }
        }
    )*};
}

impl_uint!(u8 => U8, u16 => U16, u32 => U32, u64 => U64, usize => Usize, char => Char);

impl Value for f32 {
    fn view(&self) -> ValueRef<'_> {
        ValueRef::Float(*self as f64)
    }

    fn view_mut(&mut self) -> ValueMut<'_> {
        ValueMut::Float(FloatMut::F32(self))
    }
}

impl Value for f64 {
    fn view(&self) -> ValueRef<'_> {
        ValueRef::Float(*self)
    }

    fn view_mut(&mut self) -> ValueMut<'_> {
        ValueMut::Float(FloatMut::F64(self))
    }
}

impl Value for Complex32 {
    fn view(&self) -> ValueRef<'_> {
        ValueRef::Complex((*self).into())
    }

    fn view_mut(&mut self) -> ValueMut<'_> {
        ValueMut::Complex(ComplexMut::C32(self))
    }
}

impl Value for Complex64 {
    fn view(&self) -> ValueRef<'_> {
        ValueRef::Complex(*self)
    }

    fn view_mut(&mut self) -> ValueMut<'_> {
        ValueMut::Complex(ComplexMut::C64(self))
    }
}

// ---------------------------------------------------------------- text

impl Value for String {
    fn view(&self) -> ValueRef<'_> {
        ValueRef::Text(self)
    }

    fn view_mut(&mut self) -> ValueMut<'_> {
        ValueMut::Text(self)
    }
}

impl Value for str {
    fn view(&self) -> ValueRef<'_> {
        ValueRef::Text(self)
    }

    fn view_mut(&mut self) -> ValueMut<'_> {
        ValueMut::Unaddressable
    }
}

// ---------------------------------------------------------------- arrays and sequences

impl<T: Value, const N: usize> Elements for [T; N] {
    fn len(&self) -> usize {
        N
    }

    fn for_each_element(&self, f: &mut dyn FnMut(&dyn Value) -> Result<()>) -> Result<()> {
        self.iter().try_for_each(|v| f(v as &dyn Value))
    }
}

impl<T: Value, const N: usize> ElementsMut for [T; N] {
    fn for_each_element_mut(
        &mut self,
        f: &mut dyn FnMut(&mut dyn Value) -> Result<()>,
    ) -> Result<()> {
        self.iter_mut().try_for_each(|v| f(v as &mut dyn Value))
    }
}

impl<T: Value, const N: usize> Value for [T; N] {
    fn view(&self) -> ValueRef<'_> {
        ValueRef::Array(self)
    }

    fn view_mut(&mut self) -> ValueMut<'_> {
        ValueMut::Array(self)
    }
}

/// Upper bound on capacity reserved from an announced element count.
const PREALLOC_LIMIT: usize = 1024;

macro_rules! impl_sequence {
    ($($seq:ident => $push:ident),*) => {$(
        impl<T: Value> Elements for $seq<T> {
            fn len(&self) -> usize {
                $seq::len(self)
            }

            fn for_each_element(&self, f: &mut dyn FnMut(&dyn Value) -> Result<()>) -> Result<()> {
                self.iter().try_for_each(|v| f(v as &dyn Value))
            }
        }

        impl<T: Value> ElementsMut for $seq<T> {
            fn for_each_element_mut(
                &mut self,
                f: &mut dyn FnMut(&mut dyn Value) -> Result<()>,
            ) -> Result<()> {
                self.iter_mut().try_for_each(|v| f(v as &mut dyn Value))
            }
        }

        impl<T: Value + Default> SequenceMut for $seq<T> {
            fn reset(&mut self, len: usize) {
                *self = $seq::with_capacity(len.min(PREALLOC_LIMIT));
            }

            fn push_with(&mut self, fill: &mut dyn FnMut(&mut dyn Value) -> Result<()>) -> Result<()> {
                let mut item = T::default();
                fill(&mut item as &mut dyn Value)?;
                self.$push(item);
                Ok(())
            }
        }

        impl<T: Value + Default> Value for $seq<T> {
            fn view(&self) -> ValueRef<'_> {
                ValueRef::Sequence(self)
            }

            fn view_mut(&mut self) -> ValueMut<'_> {
                ValueMut::Sequence(self)
            }
        }
    )*};
}

impl_sequence!(Vec => push, VecDeque => push_back);

// ---------------------------------------------------------------- maps

impl<K, V, S> Entries for HashMap<K, V, S>
where
    K: Value,
    V: Value,
{
    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn for_each_entry(&self, f: &mut dyn FnMut(&dyn Value, &dyn Value) -> Result<()>) -> Result<()> {
        self.iter()
            .try_for_each(|(k, v)| f(k as &dyn Value, v as &dyn Value))
    }
}

impl<K, V, S> EntriesMut for HashMap<K, V, S>
where
    K: Value + Default + Eq + Hash,
    V: Value + Default,
    S: BuildHasher + Default,
{
    fn clear(&mut self) {
        *self = HashMap::default();
    }

    fn insert_with(
        &mut self,
        fill: &mut dyn FnMut(&mut dyn Value, &mut dyn Value) -> Result<()>,
    ) -> Result<()> {
        let mut key = K::default();
        let mut value = V::default();
        fill(&mut key as &mut dyn Value, &mut value as &mut dyn Value)?;
        self.insert(key, value);
        Ok(())
    }
}

impl<K, V, S> Value for HashMap<K, V, S>
where
    K: Value + Default + Eq + Hash,
    V: Value + Default,
    S: BuildHasher + Default,
{
    fn view(&self) -> ValueRef<'_> {
        ValueRef::Map(self)
    }

    fn view_mut(&mut self) -> ValueMut<'_> {
        ValueMut::Map(self)
    }
}

impl<K: Value, V: Value> Entries for BTreeMap<K, V> {
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn for_each_entry(&self, f: &mut dyn FnMut(&dyn Value, &dyn Value) -> Result<()>) -> Result<()> {
        self.iter()
            .try_for_each(|(k, v)| f(k as &dyn Value, v as &dyn Value))
    }
}

impl<K, V> EntriesMut for BTreeMap<K, V>
where
    K: Value + Default + Ord,
    V: Value + Default,
{
    fn clear(&mut self) {
        *self = BTreeMap::new();
    }

    fn insert_with(
        &mut self,
        fill: &mut dyn FnMut(&mut dyn Value, &mut dyn Value) -> Result<()>,
    ) -> Result<()> {
        let mut key = K::default();
        let mut value = V::default();
        fill(&mut key as &mut dyn Value, &mut value as &mut dyn Value)?;
        self.insert(key, value);
        Ok(())
    }
}

impl<K, V> Value for BTreeMap<K, V>
where
    K: Value + Default + Ord,
    V: Value + Default,
{
    fn view(&self) -> ValueRef<'_> {
        ValueRef::Map(self)
    }

    fn view_mut(&mut self) -> ValueMut<'_> {
        ValueMut::Map(self)
    }
}

// ---------------------------------------------------------------- aggregates

impl Aggregate for () {
    fn fields(&self) -> &'static [FieldInfo] {
        &[]
    }

    fn field(&self, _index: usize) -> Option<&dyn Value> {
        None
    }

    fn field_mut(&mut self, _index: usize) -> Option<&mut dyn Value> {
        None
    }
}

impl Value for () {
    fn view(&self) -> ValueRef<'_> {
        ValueRef::Aggregate(self)
    }

    fn view_mut(&mut self) -> ValueMut<'_> {
        ValueMut::Aggregate(self)
    }
}

static TUPLE_FIELDS: [FieldInfo; 6] = [
    FieldInfo::new("0", true),
    FieldInfo::new("1", true),
    FieldInfo::new("2", true),
    FieldInfo::new("3", true),
    FieldInfo::new("4", true),
    FieldInfo::new("5", true),
];

macro_rules! impl_tuple {
    ($len:expr => $($idx:tt $T:ident),+) => {
        impl<$($T: Value),+> Aggregate for ($($T,)+) {
            fn fields(&self) -> &'static [FieldInfo] {
                &TUPLE_FIELDS[..$len]
            }

            fn field(&self, index: usize) -> Option<&dyn Value> {
                match index {
                    $($idx => Some(&self.$idx as &dyn Value),)+
                    _ => None,
                }
            }

            fn field_mut(&mut self, index: usize) -> Option<&mut dyn Value> {
                match index {
                    $($idx => Some(&mut self.$idx as &mut dyn Value),)+
                    _ => None,
                }
            }
        }

        impl<$($T: Value),+> Value for ($($T,)+) {
            fn view(&self) -> ValueRef<'_> {
                ValueRef::Aggregate(self)
            }

            fn view_mut(&mut self) -> ValueMut<'_> {
                ValueMut::Aggregate(self)
            }
        }
    };
}

impl_tuple!(1 => 0 A);
impl_tuple!(2 => 0 A, 1 B);
impl_tuple!(3 => 0 A, 1 B, 2 C);
impl_tuple!(4 => 0 A, 1 B, 2 C, 3 D);
impl_tuple!(5 => 0 A, 1 B, 2 C, 3 D, 4 E);
impl_tuple!(6 => 0 A, 1 B, 2 C, 3 D, 4 E, 5 F);

// ---------------------------------------------------------------- pointers

impl<T: Value + Default> PointerMut for Option<T> {
    fn replace_with(&mut self, fill: &mut dyn FnMut(&mut dyn Value) -> Result<()>) -> Result<()> {
        let mut pointee = T::default();
        fill(&mut pointee as &mut dyn Value)?;
        *self = Some(pointee);
        Ok(())
    }
}

impl<T: Value + Default> Value for Option<T> {
    fn view(&self) -> ValueRef<'_> {
        ValueRef::Pointer(self.as_ref().map(|v| v as &dyn Value))
    }

    fn view_mut(&mut self) -> ValueMut<'_> {
        ValueMut::Pointer(self)
    }
}

macro_rules! impl_pointer {
    ($($ptr:ident),*) => {$(
        impl<T: Value + Default> PointerMut for $ptr<T> {
            fn replace_with(&mut self, fill: &mut dyn FnMut(&mut dyn Value) -> Result<()>) -> Result<()> {
                let mut pointee = T::default();
                fill(&mut pointee as &mut dyn Value)?;
                *self = $ptr::new(pointee);
                Ok(())
            }
        }

        impl<T: Value + Default> Value for $ptr<T> {
            fn view(&self) -> ValueRef<'_> {
                ValueRef::Pointer(Some(&**self as &dyn Value))
            }

            fn view_mut(&mut self) -> ValueMut<'_> {
                ValueMut::Pointer(self)
            }
        }
    )*};
}

impl_pointer!(Box, Rc, Arc);

impl<T: Value + ?Sized> Value for &T {
    fn view(&self) -> ValueRef<'_> {
        (**self).view()
    }

    fn view_mut(&mut self) -> ValueMut<'_> {
        ValueMut::Unaddressable
    }

    fn marshaler(&self) -> Option<&dyn crate::MarshalBinary> {
        (**self).marshaler()
    }
}

impl<T: Value + ?Sized> Value for &mut T {
    fn view(&self) -> ValueRef<'_> {
        (**self).view()
    }

    fn view_mut(&mut self) -> ValueMut<'_> {
        (**self).view_mut()
    }

    fn marshaler(&self) -> Option<&dyn crate::MarshalBinary> {
        (**self).marshaler()
    }

    fn unmarshaler(&mut self) -> Option<&mut dyn crate::UnmarshalBinary> {
        (**self).unmarshaler()
    }
}

// ---------------------------------------------------------------- unsupported

macro_rules! impl_unsupported {
    ($what:literal => $($ty:ty),*) => {$(
        impl<T> Value for $ty {
            fn view(&self) -> ValueRef<'_> {
                ValueRef::Unsupported($what)
            }

            fn view_mut(&mut self) -> ValueMut<'_> {
                ValueMut::Unsupported($what)
            }
        }
    )*};
}

impl_unsupported!("raw pointer" => *const T, *mut T);
impl_unsupported!("channel" => Sender<T>, SyncSender<T>, Receiver<T>);
impl_unsupported!("function" => fn() -> T, fn(T));
