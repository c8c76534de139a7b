use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use core::hash::Hash;

use crate::derive::impl_type_path;
use crate::impls::GenericTypeInfoCell;
use crate::info::{MapInfo, TypeInfo, Typed};
use crate::ops::Map;
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry};
use crate::registry::{TypeTraitDefault, TypeTraitShared};
use crate::{FromReflect, Reflect};

/// Implements the reflection traits for a map type.
///
/// `$key_bound` is what the map needs from its keys, e.g. `Eq + Hash`.
macro_rules! impl_reflect_map {
    ($ty:ty, $($key_bound:tt)+) => {
        impl<K, V> Typed for $ty
        where
            K: FromReflect + Typed + $($key_bound)+,
            V: FromReflect + Typed,
        {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| TypeInfo::Map(MapInfo::new::<Self, K, V>()))
            }
        }

        impl<K, V> Reflect for $ty
        where
            K: FromReflect + Typed + $($key_bound)+,
            V: FromReflect + Typed,
        {
            crate::reflection::impl_reflect_cast_fn!(Map);
        }

        impl<K, V> Map for $ty
        where
            K: FromReflect + Typed + $($key_bound)+,
            V: FromReflect + Typed,
        {
            #[inline]
            fn len(&self) -> usize {
                <$ty>::len(self)
            }

            fn get_at(&self, index: usize) -> Option<(&dyn Reflect, &dyn Reflect)> {
                <$ty>::iter(self)
                    .nth(index)
                    .map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect))
            }

            fn get(&self, key: &dyn Reflect) -> Option<&dyn Reflect> {
                let key = key.downcast_ref::<K>()?;
                <$ty>::get(self, key).map(Reflect::as_reflect)
            }

            fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_> {
                Box::new(<$ty>::iter(self).map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect)))
            }

            fn insert_boxed(
                &mut self,
                key: Box<dyn Reflect>,
                value: Box<dyn Reflect>,
            ) -> Result<(), (Box<dyn Reflect>, Box<dyn Reflect>)> {
                let key = match K::from_reflect(key) {
                    Ok(key) => key,
                    Err(key) => return Err((key, value)),
                };
                let value = match V::from_reflect(value) {
                    Ok(value) => value,
                    Err(value) => return Err((Box::new(key), value)),
                };
                <$ty>::insert(self, key, value);
                Ok(())
            }
        }

        impl<K, V> FromReflect for $ty
        where
            K: FromReflect + Typed + $($key_bound)+,
            V: FromReflect + Typed,
        {
        }

        impl<K, V> GetTypeMeta for $ty
        where
            K: FromReflect + Typed + GetTypeMeta + $($key_bound)+,
            V: FromReflect + Typed + GetTypeMeta,
        {
            fn get_type_meta() -> TypeMeta {
                let mut type_meta = TypeMeta::of::<Self>();
                type_meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
                type_meta.insert_trait::<TypeTraitShared>(FromType::<Self>::from_type());
                type_meta
            }

            fn register_dependencies(registry: &mut TypeRegistry) {
                registry.register::<K>();
                registry.register::<V>();
            }
        }
    };
}

impl_type_path!(::alloc::collections::BTreeMap<K, V>);
impl_type_path!(::std::collections::HashMap<K, V>);
impl_type_path!(::tg_utils::hash::HashMap<K, V>);

impl_reflect_map!(BTreeMap<K, V>, Ord);
impl_reflect_map!(std::collections::HashMap<K, V>, Eq + Hash);
impl_reflect_map!(tg_utils::hash::HashMap<K, V>, Eq + Hash);

// -----------------------------------------------------------------------------
// Tests
