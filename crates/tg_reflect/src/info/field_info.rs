use core::any::TypeId;

use crate::info::{TypeInfo, TypeRef, Typed};

// -----------------------------------------------------------------------------
// NamedField

/// A struct field: its name and type.
#[derive(Clone, Debug)]
pub struct NamedField {
    name: &'static str,
    ty: TypeRef,
}

impl NamedField {
    #[inline]
    pub const fn new<T: Typed>(name: &'static str) -> Self {
        Self {
            name,
            ty: TypeRef::of::<T>(),
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn ty(&self) -> TypeRef {
        self.ty
    }

    #[inline]
    pub const fn ty_id(&self) -> TypeId {
        self.ty.id()
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        self.ty.info()
    }
}

// -----------------------------------------------------------------------------
// UnnamedField

/// A positional field of a tuple.
#[derive(Clone, Debug)]
pub struct UnnamedField {
    index: usize,
    ty: TypeRef,
}

impl UnnamedField {
    #[inline]
    pub const fn new<T: Typed>(index: usize) -> Self {
        Self {
            index,
            ty: TypeRef::of::<T>(),
        }
    }

    #[inline]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub const fn ty(&self) -> TypeRef {
        self.ty
    }

    #[inline]
    pub const fn ty_id(&self) -> TypeId {
        self.ty.id()
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        self.ty.info()
    }
}
