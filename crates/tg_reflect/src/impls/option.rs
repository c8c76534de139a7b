use alloc::boxed::Box;

use crate::derive::impl_type_path;
use crate::impls::GenericTypeInfoCell;
use crate::info::{OptionInfo, TypeInfo, Typed};
use crate::ops::Nullable;
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitDefault};
use crate::{FromReflect, Reflect};

impl_type_path!(::core::option::Option<T>);

impl<T: FromReflect + Typed> Typed for Option<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Option(OptionInfo::new::<Self, T>(|| {
                Box::new(None::<T>) as Box<dyn Reflect>
            }))
        })
    }
}

impl<T: FromReflect + Typed> Reflect for Option<T> {
    crate::reflection::impl_reflect_cast_fn!(Option);
}

impl<T: FromReflect + Typed> Nullable for Option<T> {
    #[inline]
    fn get(&self) -> Option<&dyn Reflect> {
        self.as_ref().map(Reflect::as_reflect)
    }

    #[inline]
    fn get_mut(&mut self) -> Option<&mut dyn Reflect> {
        self.as_mut().map(Reflect::as_reflect_mut)
    }

    #[inline]
    fn set_none(&mut self) {
        *self = None;
    }
}

impl<T: FromReflect + Typed> FromReflect for Option<T> {
    /// Takes an `Option<T>`, or wraps anything `T` accepts in `Some`.
    fn from_reflect(reflect: Box<dyn Reflect>) -> Result<Self, Box<dyn Reflect>> {
        match reflect.take::<Self>() {
            Ok(value) => Ok(value),
            Err(reflect) => T::from_reflect(reflect).map(Some),
        }
    }
}

impl<T: FromReflect + Typed + GetTypeMeta> GetTypeMeta for Option<T> {
    fn get_type_meta() -> TypeMeta {
        let mut type_meta = TypeMeta::of::<Self>();
        type_meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
        type_meta
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}
