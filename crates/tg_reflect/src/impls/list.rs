use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::derive::impl_type_path;
use crate::impls::GenericTypeInfoCell;
use crate::info::{ListInfo, TypeInfo, Typed};
use crate::ops::List;
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry};
use crate::registry::{TypeTraitDefault, TypeTraitShared};
use crate::{FromReflect, Reflect};

macro_rules! impl_reflect_list {
    ($ty:ident) => {
        impl<T: FromReflect + Typed> Typed for $ty<T> {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| TypeInfo::List(ListInfo::new::<Self, T>()))
            }
        }

        impl<T: FromReflect + Typed> Reflect for $ty<T> {
            crate::reflection::impl_reflect_cast_fn!(List);
        }

        impl<T: FromReflect + Typed> List for $ty<T> {
            #[inline]
            fn len(&self) -> usize {
                $ty::len(self)
            }

            #[inline]
            fn get(&self, index: usize) -> Option<&dyn Reflect> {
                self.item_at(index).map(Reflect::as_reflect)
            }

            fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
                let item = T::from_reflect(value)?;
                self.push_back_item(item);
                Ok(())
            }

            #[inline]
            fn reserve(&mut self, additional: usize) {
                $ty::reserve(self, additional);
            }
        }

        impl<T: FromReflect + Typed> FromReflect for $ty<T> {}

        impl<T: FromReflect + Typed + GetTypeMeta> GetTypeMeta for $ty<T> {
            fn get_type_meta() -> TypeMeta {
                let mut type_meta = TypeMeta::of::<Self>();
                type_meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
                type_meta.insert_trait::<TypeTraitShared>(FromType::<Self>::from_type());
                type_meta
            }

            fn register_dependencies(registry: &mut TypeRegistry) {
                registry.register::<T>();
            }
        }
    };
}

/// Item access shared by `Vec` and `VecDeque`.
///
/// Calls through `$ty::get` would resolve to `List::get` for `Vec`, which
/// has no inherent `get`.
trait ListItems<T> {
    fn item_at(&self, index: usize) -> Option<&T>;
    fn push_back_item(&mut self, item: T);
}

impl<T> ListItems<T> for Vec<T> {
    #[inline]
    fn item_at(&self, index: usize) -> Option<&T> {
        <[T]>::get(self, index)
    }

    #[inline]
    fn push_back_item(&mut self, item: T) {
        Vec::push(self, item);
    }
}

impl<T> ListItems<T> for VecDeque<T> {
    #[inline]
    fn item_at(&self, index: usize) -> Option<&T> {
        VecDeque::get(self, index)
    }

    #[inline]
    fn push_back_item(&mut self, item: T) {
        VecDeque::push_back(self, item);
    }
}

impl_type_path!(::alloc::vec::Vec<T>);
impl_type_path!(::alloc::collections::VecDeque<T>);

impl_reflect_list!(Vec);
impl_reflect_list!(VecDeque);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::VecDeque;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::Reflect;
    use crate::info::{TypePath, Typed};
    use crate::ops::{List, ReflectRef};

    #[test]
    fn list_info() {
        let info = <Vec<i32>>::type_info().as_list().unwrap();
        assert!(info.item().is::<i32>());
        assert_eq!(<Vec<String>>::type_path(), "alloc::vec::Vec<alloc::string::String>");
        assert_eq!(<VecDeque<u8>>::type_name(), "VecDeque<u8>");
    }

    #[test]
    fn push_converts_items() {
        let mut list: Vec<Option<u8>> = vec![None];
        List::push(&mut list, 4_u8.into_boxed_reflect()).unwrap();
        List::push(&mut list, Some(5_u8).into_boxed_reflect()).unwrap();
        assert!(List::push(&mut list, 1_i32.into_boxed_reflect()).is_err());
        assert_eq!(list, [None, Some(4), Some(5)]);

        let ReflectRef::List(view) = list.reflect_ref() else {
            panic!("expected a list");
        };
        assert_eq!(view.len(), 3);
        assert_eq!(view.get(1).and_then(|v| v.downcast_ref::<Option<u8>>()), Some(&Some(4)));
    }

    #[test]
    fn get_reads_items_by_index() {
        let list: Vec<String> = vec!["a".into(), "b".into()];
        let view: &dyn List = &list;
        assert_eq!(view.get(1).and_then(|v| v.downcast_ref::<String>()).map(String::as_str), Some("b"));
        assert!(view.get(2).is_none());

        let deque: VecDeque<u16> = VecDeque::from([7, 8, 9]);
        let view: &dyn List = &deque;
        assert_eq!(view.get(0).and_then(|v| v.downcast_ref::<u16>()), Some(&7));
        assert!(view.get(3).is_none());
    }
}
