use alloc::boxed::Box;

use crate::derive::impl_type_path;
use crate::impls::GenericTypeInfoCell;
use crate::info::{PairInfo, TypeInfo, Typed};
use crate::ops::Pair;
use crate::registry::{GetTypeMeta, TypeMeta, TypeRegistry};
use crate::{FromReflect, Reflect};

/// A standalone key-value pair.
///
/// Encoded as a dedicated two-slot pair rather than as a struct with
/// `key` and `value` properties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyValue<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> KeyValue<K, V> {
    #[inline]
    pub const fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

impl<K, V> From<(K, V)> for KeyValue<K, V> {
    #[inline]
    fn from((key, value): (K, V)) -> Self {
        Self { key, value }
    }
}

impl_type_path!(::tg_reflect::KeyValue<K, V>);

impl<K: FromReflect + Typed, V: FromReflect + Typed> Typed for KeyValue<K, V> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Pair(PairInfo::new::<Self, K, V>(|key, value| {
                let pair = KeyValue {
                    key: K::from_reflect(key).ok()?,
                    value: V::from_reflect(value).ok()?,
                };
                Some(Box::new(pair) as Box<dyn Reflect>)
            }))
        })
    }
}

impl<K: FromReflect + Typed, V: FromReflect + Typed> Reflect for KeyValue<K, V> {
    crate::reflection::impl_reflect_cast_fn!(Pair);
}

impl<K: FromReflect + Typed, V: FromReflect + Typed> Pair for KeyValue<K, V> {
    #[inline]
    fn key(&self) -> &dyn Reflect {
        &self.key
    }

    #[inline]
    fn value(&self) -> &dyn Reflect {
        &self.value
    }
}

impl<K: FromReflect + Typed, V: FromReflect + Typed> FromReflect for KeyValue<K, V> {}

impl<K, V> GetTypeMeta for KeyValue<K, V>
where
    K: FromReflect + Typed + GetTypeMeta,
    V: FromReflect + Typed + GetTypeMeta,
{
    #[inline]
    fn get_type_meta() -> TypeMeta {
        TypeMeta::of::<Self>()
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<K>();
        registry.register::<V>();
    }
}
