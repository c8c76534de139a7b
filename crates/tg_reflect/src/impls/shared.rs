use alloc::boxed::Box;
use alloc::sync::Arc;
use std::sync::{PoisonError, RwLock};

use crate::impls::{GenericTypeInfoCell, GenericTypePathCell};
use crate::info::{SharedInfo, TypeInfo, TypePath, Typed};
use crate::ops::SharedRef;
use crate::registry::{GetTypeMeta, TypeMeta, TypeRegistry};
use crate::{FromReflect, Reflect};

/// A handle to a value that several places of a graph refer to.
///
/// Plain owned values always form a tree and are encoded inline. A value
/// behind `Shared` keeps its identity: every handle to the same allocation
/// is encoded once, later occurrences become back-references, and cycles
/// through handles round-trip.
///
/// ```
/// use std::sync::{Arc, RwLock};
/// use tg_reflect::Shared;
///
/// let a: Shared<u32> = Arc::new(RwLock::new(1));
/// let b = Arc::clone(&a);
/// *b.write().unwrap() = 2;
/// assert_eq!(*a.read().unwrap(), 2);
/// ```
pub type Shared<T> = Arc<RwLock<T>>;

impl<T: TypePath> TypePath for Shared<T> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| {
            alloc::format!("alloc::sync::Arc<std::sync::RwLock<{}>>", T::type_path())
        })
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| alloc::format!("Arc<RwLock<{}>>", T::type_name()))
    }

    #[inline]
    fn type_ident() -> &'static str {
        "Arc"
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("alloc::sync")
    }
}

impl<T: FromReflect + Typed> Typed for Shared<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Shared(SharedInfo::new::<Self, T>(|inner| {
                T::from_reflect(inner).map(|value| {
                    let handle: Shared<T> = Arc::new(RwLock::new(value));
                    Box::new(handle) as Box<dyn Reflect>
                })
            }))
        })
    }
}

impl<T: FromReflect + Typed> Reflect for Shared<T> {
    crate::reflection::impl_reflect_cast_fn!(Shared);
}

impl<T: FromReflect + Typed> SharedRef for Shared<T> {
    #[inline]
    fn identity(&self) -> usize {
        Arc::as_ptr(self).addr()
    }

    fn with_inner(&self, f: &mut dyn FnMut(&dyn Reflect)) {
        let guard = self.read().unwrap_or_else(PoisonError::into_inner);
        f(&*guard);
    }

    fn with_inner_mut(&self, f: &mut dyn FnMut(&mut dyn Reflect)) {
        let mut guard = self.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut *guard);
    }

    #[inline]
    fn clone_handle(&self) -> Box<dyn Reflect> {
        Box::new(Arc::clone(self))
    }
}

impl<T: FromReflect + Typed> FromReflect for Shared<T> {}

// A handle has no meaningful default; the decoder wraps a placeholder of
// the inner type instead.
impl<T: FromReflect + Typed + GetTypeMeta> GetTypeMeta for Shared<T> {
    #[inline]
    fn get_type_meta() -> TypeMeta {
        TypeMeta::of::<Self>()
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use std::sync::RwLock;

    use super::Shared;
    use crate::Reflect;
    use crate::ops::{ReflectRef, SharedRef};

    #[test]
    fn identity_follows_allocation() {
        let a: Shared<i32> = Arc::new(RwLock::new(1));
        let b = Arc::clone(&a);
        let c: Shared<i32> = Arc::new(RwLock::new(1));
        assert_eq!(a.identity(), b.identity());
        assert_ne!(a.identity(), c.identity());

        let handle = a.clone_handle();
        let handle = handle.downcast_ref::<Shared<i32>>().unwrap();
        assert!(Arc::ptr_eq(&a, handle));
    }

    #[test]
    fn inner_access() {
        let a: Shared<i32> = Arc::new(RwLock::new(1));
        let ReflectRef::Shared(view) = a.reflect_ref() else {
            panic!("expected a shared handle");
        };

        view.with_inner_mut(&mut |inner| {
            inner.set(5_i32.into_boxed_reflect()).unwrap();
        });
        let mut seen = 0;
        view.with_inner(&mut |inner| seen = *inner.downcast_ref::<i32>().unwrap());
        assert_eq!(seen, 5);

        let info = <Shared<i32> as crate::info::Typed>::type_info().as_shared().unwrap();
        let wrapped = info.wrap(9_i32.into_boxed_reflect()).unwrap();
        let wrapped = wrapped.take::<Shared<i32>>().unwrap();
        assert_eq!(*wrapped.read().unwrap(), 9);
    }
}
