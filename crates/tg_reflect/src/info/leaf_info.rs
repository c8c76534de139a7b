use core::fmt;

use crate::info::{Type, TypePath, impl_type_fn};

// -----------------------------------------------------------------------------
// LeafKind

/// The scalar kinds with a dedicated wire encoding.
///
/// Optional kinds depend on crate features, so matches outside this crate
/// need a fallback arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum LeafKind {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    F32,
    F64,
    String,
    Duration,
    #[cfg(feature = "chrono")]
    DateTime,
    #[cfg(feature = "uuid")]
    Uuid,
}

impl fmt::Display for LeafKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// -----------------------------------------------------------------------------
// LeafInfo

/// A scalar type, see [`LeafKind`].
#[derive(Clone, Debug)]
pub struct LeafInfo {
    ty: Type,
    kind: LeafKind,
}

impl LeafInfo {
    impl_type_fn!(ty);

    #[inline]
    pub const fn new<T: TypePath>(kind: LeafKind) -> Self {
        Self {
            ty: Type::of::<T>(),
            kind,
        }
    }

    #[inline]
    pub const fn kind(&self) -> LeafKind {
        self.kind
    }
}
