//! Tuples with up to 12 fields.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use tg_utils::range_invoke;

use crate::impls::{GenericTypeInfoCell, GenericTypePathCell};
use crate::info::{TupleInfo, TypeInfo, TypePath, Typed, UnnamedField};
use crate::ops::Tuple;
use crate::registry::{GetTypeMeta, TypeMeta, TypeRegistry};
use crate::{FromReflect, Reflect};

/// `"(A, B)"`, or `"(A,)"` for a single field.
#[inline(never)]
fn tuple_path(parts: &[&str]) -> String {
    let mut path = String::from("(");
    for (index, part) in parts.iter().enumerate() {
        if index > 0 {
            path.push_str(", ");
        }
        path.push_str(part);
    }
    if parts.len() == 1 {
        path.push(',');
    }
    path.push(')');
    path
}

macro_rules! impl_reflect_tuple {
    ($n:literal: [$($idx:tt: $ty:ident),*]) => {
        impl<$($ty: TypePath),*> TypePath for ($($ty,)*) {
            fn type_path() -> &'static str {
                static CELL: GenericTypePathCell = GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| tuple_path(&[$($ty::type_path()),*]))
            }

            fn type_name() -> &'static str {
                static CELL: GenericTypePathCell = GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| tuple_path(&[$($ty::type_name()),*]))
            }

            fn type_ident() -> &'static str {
                static CELL: GenericTypePathCell = GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| tuple_path(&[$($ty::type_ident()),*]))
            }
        }

        impl<$($ty: FromReflect + Typed),*> Typed for ($($ty,)*) {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::Tuple(TupleInfo::new::<Self>(
                        &[$(UnnamedField::new::<$ty>($idx)),*],
                        |parts: Vec<Box<dyn Reflect>>| {
                            if parts.len() != $n {
                                return None;
                            }
                            #[allow(unused_mut, unused_variables)]
                            let mut parts = parts.into_iter();
                            let tuple: Self = ($($ty::from_reflect(parts.next()?).ok()?,)*);
                            Some(Box::new(tuple) as Box<dyn Reflect>)
                        },
                    ))
                })
            }
        }

        impl<$($ty: FromReflect + Typed),*> Tuple for ($($ty,)*) {
            #[inline]
            fn field(&self, index: usize) -> Option<&dyn Reflect> {
                match index {
                    $($idx => Some(&self.$idx),)*
                    _ => None,
                }
            }

            #[inline]
            fn field_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
                match index {
                    $($idx => Some(&mut self.$idx),)*
                    _ => None,
                }
            }

            #[inline]
            fn field_len(&self) -> usize {
                $n
            }
        }

        impl<$($ty: FromReflect + Typed),*> Reflect for ($($ty,)*) {
            crate::reflection::impl_reflect_cast_fn!(Tuple);
        }

        impl<$($ty: FromReflect + Typed),*> FromReflect for ($($ty,)*) {}

        impl<$($ty: FromReflect + Typed + GetTypeMeta),*> GetTypeMeta for ($($ty,)*) {
            #[inline]
            fn get_type_meta() -> TypeMeta {
                TypeMeta::of::<Self>()
            }

            #[allow(unused_variables)]
            fn register_dependencies(registry: &mut TypeRegistry) {
                $(registry.register::<$ty>();)*
            }
        }
    };
}

range_invoke!(impl_reflect_tuple);
