use alloc::boxed::Box;

use crate::Reflect;
use crate::info::{Type, TypePath, TypeRef, Typed, impl_type_fn};
use crate::ops::{Nullable, SharedRef};

// -----------------------------------------------------------------------------
// OptionInfo

/// `Option<T>`: a value that may be absent.
#[derive(Clone, Debug)]
pub struct OptionInfo {
    ty: Type,
    inner: TypeRef,
    none: fn() -> Box<dyn Reflect>,
}

impl OptionInfo {
    impl_type_fn!(ty);

    #[inline]
    pub const fn new<TOption: Nullable + TypePath, TInner: Reflect + Typed>(
        none: fn() -> Box<dyn Reflect>,
    ) -> Self {
        Self {
            ty: Type::of::<TOption>(),
            inner: TypeRef::of::<TInner>(),
            none,
        }
    }

    #[inline]
    pub const fn inner(&self) -> TypeRef {
        self.inner
    }

    /// Returns a boxed `None` of this option type.
    #[inline]
    pub fn none(&self) -> Box<dyn Reflect> {
        (self.none)()
    }
}

// -----------------------------------------------------------------------------
// SharedInfo

/// [`Shared<T>`](crate::Shared): a handle whose identity is preserved.
#[derive(Clone, Debug)]
pub struct SharedInfo {
    ty: Type,
    inner: TypeRef,
    wrap: fn(Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>>,
}

impl SharedInfo {
    impl_type_fn!(ty);

    #[inline]
    pub const fn new<TShared: SharedRef + TypePath, TInner: Reflect + Typed>(
        wrap: fn(Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>>,
    ) -> Self {
        Self {
            ty: Type::of::<TShared>(),
            inner: TypeRef::of::<TInner>(),
            wrap,
        }
    }

    #[inline]
    pub const fn inner(&self) -> TypeRef {
        self.inner
    }

    /// Moves an inner value into a new handle.
    ///
    /// Returns the value unchanged if it cannot be converted to the inner type.
    #[inline]
    pub fn wrap(&self, inner: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
        (self.wrap)(inner)
    }
}

// -----------------------------------------------------------------------------
// DynamicInfo

/// `Box<dyn Reflect>`: the concrete type is only known per value.
#[derive(Clone, Debug)]
pub struct DynamicInfo {
    ty: Type,
}

impl DynamicInfo {
    impl_type_fn!(ty);

    #[inline]
    pub const fn new<T: TypePath + ?Sized>() -> Self {
        Self { ty: Type::of::<T>() }
    }
}
