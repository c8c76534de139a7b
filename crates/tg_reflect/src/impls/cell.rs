//! Static storage for type information.
//!
//! `Typed::type_info` and `TypePath::type_path` return `'static` references,
//! so the values are built once and kept in a `static` inside the function.
//!
//! - [`NonGenericTypeInfoCell`]: one value, a `OnceLock`.
//! - [`GenericTypeInfoCell`] and [`GenericTypePathCell`]: a `static` inside a
//!   generic function is shared by every instantiation, so these map
//!   `TypeId` to a leaked value.
//!
//! ```
//! use tg_reflect::impls::GenericTypePathCell;
//! use tg_reflect::info::TypePath;
//!
//! struct Wrapper<T>(T);
//!
//! impl<T: TypePath> TypePath for Wrapper<T> {
//!     fn type_path() -> &'static str {
//!         static CELL: GenericTypePathCell = GenericTypePathCell::new();
//!         CELL.get_or_insert::<Self>(|| format!("my_crate::Wrapper<{}>", T::type_path()))
//!     }
//!     fn type_name() -> &'static str {
//!         static CELL: GenericTypePathCell = GenericTypePathCell::new();
//!         CELL.get_or_insert::<Self>(|| format!("Wrapper<{}>", T::type_name()))
//!     }
//!     fn type_ident() -> &'static str {
//!         "Wrapper"
//!     }
//! }
//!
//! assert_eq!(Wrapper::<u8>::type_path(), "my_crate::Wrapper<u8>");
//! ```

use alloc::boxed::Box;
use alloc::string::String;
use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use tg_utils::TypeIdMap;

use crate::info::TypeInfo;

mod sealed {
    use super::TypeInfo;
    use alloc::string::String;

    pub trait TypedProperty: Send + Sync + 'static {}

    impl TypedProperty for String {}
    impl TypedProperty for TypeInfo {}
}

use sealed::TypedProperty;

// -----------------------------------------------------------------------------
// NonGenericTypeCell

/// Storage for a non-generic type's property.
pub struct NonGenericTypeCell<T: TypedProperty>(OnceLock<T>);

/// Storage for a non-generic type's [`TypeInfo`].
pub type NonGenericTypeInfoCell = NonGenericTypeCell<TypeInfo>;

impl<T: TypedProperty> NonGenericTypeCell<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> T) -> &T {
        self.0.get_or_init(f)
    }
}

// -----------------------------------------------------------------------------
// GenericTypeCell

/// Storage for a generic type's property, one per instantiation.
pub struct GenericTypeCell<T: TypedProperty>(RwLock<TypeIdMap<&'static T>>);

/// Storage for a generic type's [`TypeInfo`].
pub type GenericTypeInfoCell = GenericTypeCell<TypeInfo>;

/// Storage for a generic type's path strings.
pub type GenericTypePathCell = GenericTypeCell<String>;

impl<T: TypedProperty> GenericTypeCell<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the value for `G`, building it with `f` on first access.
    ///
    /// `f` runs without holding the lock, since building one type's info
    /// may need the info of another instantiation.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> T) -> &T {
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    #[inline(never)]
    fn get_or_insert_by_type_id(&self, type_id: TypeId, f: impl FnOnce() -> T) -> &T {
        match self.get_by_type_id(type_id) {
            Some(value) => value,
            None => self.insert_by_type_id(type_id, f()),
        }
    }

    #[inline(never)]
    fn get_by_type_id(&self, type_id: TypeId) -> Option<&T> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    // A racing thread may have inserted first; its value wins.
    #[inline(never)]
    fn insert_by_type_id(&self, type_id: TypeId, value: T) -> &T {
        *self
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert(type_id, || Box::leak(Box::new(value)))
    }
}
