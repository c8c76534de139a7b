use alloc::boxed::Box;
use alloc::string::String;
use core::time::Duration;

use crate::impls::NonGenericTypeInfoCell;
use crate::info::{LeafInfo, LeafKind, ReflectKind, TypeInfo, TypePath, Typed};
use crate::ops::{LeafRef, ReflectMut, ReflectRef};
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeTraitDefault, TypeTraitShared};
use crate::{FromReflect, Reflect};

/// Implements the reflection traits for a scalar with a [`LeafKind`].
///
/// `$this => $view` turns `&self` into its [`LeafRef`].
macro_rules! impl_reflect_leaf {
    (
        $ty:ty, $kind:ident,
        path = $path:expr, name = $name:expr, ident = $ident:expr, module = $module:expr,
        |$this:ident| $view:expr
    ) => {
        impl TypePath for $ty {
            #[inline]
            fn type_path() -> &'static str {
                $path
            }

            #[inline]
            fn type_name() -> &'static str {
                $name
            }

            #[inline]
            fn type_ident() -> &'static str {
                $ident
            }

            #[inline]
            fn module_path() -> Option<&'static str> {
                $module
            }
        }

        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| TypeInfo::Leaf(LeafInfo::new::<Self>(LeafKind::$kind)))
            }
        }

        impl Reflect for $ty {
            fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
                *self = value.take::<Self>()?;
                Ok(())
            }

            #[inline]
            fn reflect_kind(&self) -> ReflectKind {
                ReflectKind::Leaf
            }

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                let $this = self;
                ReflectRef::Leaf($view)
            }

            #[inline]
            fn reflect_mut(&mut self) -> ReflectMut<'_> {
                ReflectMut::Leaf(self)
            }
        }

        impl FromReflect for $ty {}

        impl GetTypeMeta for $ty {
            fn get_type_meta() -> TypeMeta {
                let mut type_meta = TypeMeta::of::<Self>();
                type_meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
                type_meta.insert_trait::<TypeTraitShared>(FromType::<Self>::from_type());
                type_meta
            }
        }
    };
}

macro_rules! impl_reflect_primitive {
    ($($ty:ident => $kind:ident),* $(,)?) => {
        $(
            impl_reflect_leaf!(
                $ty, $kind,
                path = stringify!($ty), name = stringify!($ty), ident = stringify!($ty), module = None,
                |this| LeafRef::$kind(*this)
            );
        )*
    };
}

impl_reflect_primitive!(
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    usize => Usize,
    f32 => F32,
    f64 => F64,
);

impl_reflect_leaf!(
    String, String,
    path = "alloc::string::String", name = "String", ident = "String", module = Some("alloc::string"),
    |this| LeafRef::String(this.as_str())
);

impl_reflect_leaf!(
    Duration, Duration,
    path = "core::time::Duration", name = "Duration", ident = "Duration", module = Some("core::time"),
    |this| LeafRef::Duration(*this)
);

#[cfg(feature = "chrono")]
impl_reflect_leaf!(
    chrono::DateTime<chrono::Utc>, DateTime,
    path = "chrono::DateTime<chrono::Utc>", name = "DateTime<Utc>", ident = "DateTime", module = Some("chrono"),
    |this| LeafRef::DateTime(*this)
);

#[cfg(feature = "uuid")]
impl_reflect_leaf!(
    uuid::Uuid, Uuid,
    path = "uuid::Uuid", name = "Uuid", ident = "Uuid", module = Some("uuid"),
    |this| LeafRef::Uuid(*this)
);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use core::time::Duration;

    use crate::Reflect;
    use crate::info::{LeafKind, TypePath, Typed};
    use crate::ops::{LeafRef, ReflectRef};

    #[test]
    fn leaf_info() {
        let info = i64::type_info().as_leaf().unwrap();
        assert_eq!(info.kind(), LeafKind::I64);
        assert_eq!(info.type_path(), "i64");
        assert_eq!(String::type_path(), "alloc::string::String");
        assert_eq!(Duration::type_name(), "Duration");
    }

    #[test]
    fn leaf_view_and_set() {
        let mut name = String::from("Daniel");
        match name.reflect_ref() {
            ReflectRef::Leaf(LeafRef::String(s)) => assert_eq!(s, "Daniel"),
            _ => panic!("expected a string leaf"),
        }

        name.set(String::from("Redondo").into_boxed_reflect()).unwrap();
        assert_eq!(name, "Redondo");

        let rejected = name.set(3_u8.into_boxed_reflect()).unwrap_err();
        assert!(rejected.is::<u8>());
        assert_eq!(name, "Redondo");
    }
}
