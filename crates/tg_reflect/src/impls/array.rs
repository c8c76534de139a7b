use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::impls::{GenericTypeInfoCell, GenericTypePathCell};
use crate::info::{ArrayInfo, TypeInfo, TypePath, Typed};
use crate::ops::Array;
use crate::registry::{GetTypeMeta, TypeMeta, TypeRegistry};
use crate::{FromReflect, Reflect};

impl<T: TypePath, const N: usize> TypePath for [T; N] {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| alloc::format!("[{}; {N}]", T::type_path()))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| alloc::format!("[{}; {N}]", T::type_name()))
    }

    fn type_ident() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| alloc::format!("[{}; {N}]", T::type_ident()))
    }
}

impl<T: FromReflect + Typed, const N: usize> Typed for [T; N] {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Array(ArrayInfo::new::<Self, T>(N, from_items::<T, N>)))
    }
}

fn from_items<T: FromReflect + Typed, const N: usize>(
    items: Vec<Box<dyn Reflect>>,
) -> Option<Box<dyn Reflect>> {
    if items.len() != N {
        return None;
    }
    let mut values = Vec::with_capacity(N);
    for item in items {
        values.push(T::from_reflect(item).ok()?);
    }
    let array: [T; N] = values.try_into().ok()?;
    Some(Box::new(array))
}

impl<T: FromReflect + Typed, const N: usize> Reflect for [T; N] {
    crate::reflection::impl_reflect_cast_fn!(Array);
}

impl<T: FromReflect + Typed, const N: usize> Array for [T; N] {
    #[inline]
    fn len(&self) -> usize {
        N
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        <[T]>::get(self, index).map(Reflect::as_reflect)
    }
}

impl<T: FromReflect + Typed, const N: usize> FromReflect for [T; N] {}

// Arrays have no general `Default`; the decoder builds them from their items.
impl<T: FromReflect + Typed + GetTypeMeta, const N: usize> GetTypeMeta for [T; N] {
    fn get_type_meta() -> TypeMeta {
        TypeMeta::of::<Self>()
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}
