use core::any::{Any, TypeId};
use core::fmt;

use crate::info::{TypeInfo, Typed};

/// A lazily resolved reference to another type's [`TypeInfo`].
///
/// Used for field, element and wrapped types. The `TypeInfo` of a
/// self-referential type is still being built while its fields are listed,
/// so only a function pointer is stored and resolved on access.
#[derive(Clone, Copy)]
pub struct TypeRef {
    id: TypeId,
    info: fn() -> &'static TypeInfo,
}

impl TypeRef {
    #[inline]
    pub const fn of<T: Typed>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            info: T::type_info,
        }
    }

    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    #[inline]
    pub fn info(&self) -> &'static TypeInfo {
        (self.info)()
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.id, f)
    }
}
