use core::fmt;

use crate::Reflect;
use crate::ops::{LeafRef, ReflectRef};

/// Structural `Debug` for any reflected value.
///
/// Shared handles print their identity only, so cyclic graphs terminate.
pub(crate) fn reflect_debug(value: &dyn Reflect, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value.reflect_ref() {
        ReflectRef::Struct(s) => {
            let mut out = f.debug_struct(value.reflect_type_name());
            for index in 0..s.field_len() {
                if let (Some(name), Some(field)) = (s.name_at(index), s.field_at(index)) {
                    out.field(name, &field);
                }
            }
            if let Some(items) = s.items() {
                out.field("..", &items);
            }
            out.finish()
        }
        ReflectRef::Tuple(t) => {
            let mut out = f.debug_tuple("");
            for index in 0..t.field_len() {
                if let Some(field) = t.field(index) {
                    out.field(&field);
                }
            }
            out.finish()
        }
        ReflectRef::List(list) => f
            .debug_list()
            .entries((0..list.len()).filter_map(|index| list.get(index)))
            .finish(),
        ReflectRef::Array(array) => f
            .debug_list()
            .entries((0..array.len()).filter_map(|index| array.get(index)))
            .finish(),
        ReflectRef::Map(map) => f.debug_map().entries(map.iter()).finish(),
        ReflectRef::Pair(pair) => f
            .debug_tuple("KeyValue")
            .field(&pair.key())
            .field(&pair.value())
            .finish(),
        ReflectRef::Option(option) => match option.get() {
            Some(inner) => f.debug_tuple("Some").field(&inner).finish(),
            None => f.write_str("None"),
        },
        ReflectRef::Shared(shared) => write!(f, "Shared(@{:#x})", shared.identity()),
        ReflectRef::Dynamic(inner) => reflect_debug(inner, f),
        ReflectRef::Leaf(leaf) => leaf_debug(leaf, f),
    }
}

fn leaf_debug(leaf: LeafRef<'_>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match leaf {
        LeafRef::Bool(v) => fmt::Debug::fmt(&v, f),
        LeafRef::Char(v) => fmt::Debug::fmt(&v, f),
        LeafRef::I8(v) => fmt::Debug::fmt(&v, f),
        LeafRef::I16(v) => fmt::Debug::fmt(&v, f),
        LeafRef::I32(v) => fmt::Debug::fmt(&v, f),
        LeafRef::I64(v) => fmt::Debug::fmt(&v, f),
        LeafRef::I128(v) => fmt::Debug::fmt(&v, f),
        LeafRef::Isize(v) => fmt::Debug::fmt(&v, f),
        LeafRef::U8(v) => fmt::Debug::fmt(&v, f),
        LeafRef::U16(v) => fmt::Debug::fmt(&v, f),
        LeafRef::U32(v) => fmt::Debug::fmt(&v, f),
        LeafRef::U64(v) => fmt::Debug::fmt(&v, f),
        LeafRef::U128(v) => fmt::Debug::fmt(&v, f),
        LeafRef::Usize(v) => fmt::Debug::fmt(&v, f),
        LeafRef::F32(v) => fmt::Debug::fmt(&v, f),
        LeafRef::F64(v) => fmt::Debug::fmt(&v, f),
        LeafRef::String(v) => fmt::Debug::fmt(v, f),
        LeafRef::Duration(v) => fmt::Debug::fmt(&v, f),
        #[cfg(feature = "chrono")]
        LeafRef::DateTime(v) => fmt::Debug::fmt(&v, f),
        #[cfg(feature = "uuid")]
        LeafRef::Uuid(v) => fmt::Debug::fmt(&v, f),
    }
}
