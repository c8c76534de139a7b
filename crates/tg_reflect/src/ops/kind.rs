use crate::Reflect;
use crate::info::ReflectKind;
use crate::ops::{Array, List, Map, Nullable, Pair, SharedRef, Struct, Tuple};
use crate::ops::LeafRef;

// -----------------------------------------------------------------------------
// ReflectRef

/// An immutable view of a value, by kind.
pub enum ReflectRef<'a> {
    Struct(&'a dyn Struct),
    Tuple(&'a dyn Tuple),
    List(&'a dyn List),
    Array(&'a dyn Array),
    Map(&'a dyn Map),
    Pair(&'a dyn Pair),
    Option(&'a dyn Nullable),
    Shared(&'a dyn SharedRef),
    /// The value inside a `Box<dyn Reflect>`.
    Dynamic(&'a dyn Reflect),
    Leaf(LeafRef<'a>),
}

impl<'a> ReflectRef<'a> {
    pub fn kind(&self) -> ReflectKind {
        match self {
            Self::Struct(_) => ReflectKind::Struct,
            Self::Tuple(_) => ReflectKind::Tuple,
            Self::List(_) => ReflectKind::List,
            Self::Array(_) => ReflectKind::Array,
            Self::Map(_) => ReflectKind::Map,
            Self::Pair(_) => ReflectKind::Pair,
            Self::Option(_) => ReflectKind::Option,
            Self::Shared(_) => ReflectKind::Shared,
            Self::Dynamic(_) => ReflectKind::Dynamic,
            Self::Leaf(_) => ReflectKind::Leaf,
        }
    }
}

// -----------------------------------------------------------------------------
// ReflectMut

/// A mutable view of a value, by kind.
pub enum ReflectMut<'a> {
    Struct(&'a mut dyn Struct),
    Tuple(&'a mut dyn Tuple),
    List(&'a mut dyn List),
    Array(&'a mut dyn Array),
    Map(&'a mut dyn Map),
    Pair(&'a mut dyn Pair),
    Option(&'a mut dyn Nullable),
    Shared(&'a mut dyn SharedRef),
    /// The value inside a `Box<dyn Reflect>`.
    Dynamic(&'a mut dyn Reflect),
    /// Leaves are replaced whole through [`Reflect::set`].
    Leaf(&'a mut dyn Reflect),
}

impl<'a> ReflectMut<'a> {
    pub fn kind(&self) -> ReflectKind {
        match self {
            Self::Struct(_) => ReflectKind::Struct,
            Self::Tuple(_) => ReflectKind::Tuple,
            Self::List(_) => ReflectKind::List,
            Self::Array(_) => ReflectKind::Array,
            Self::Map(_) => ReflectKind::Map,
            Self::Pair(_) => ReflectKind::Pair,
            Self::Option(_) => ReflectKind::Option,
            Self::Shared(_) => ReflectKind::Shared,
            Self::Dynamic(_) => ReflectKind::Dynamic,
            Self::Leaf(_) => ReflectKind::Leaf,
        }
    }

    /// Turns the view back into the value it was taken from.
    ///
    /// For [`ReflectMut::Dynamic`] this is the boxed value, not the box.
    pub fn into_reflect(self) -> &'a mut dyn Reflect {
        match self {
            Self::Struct(v) => v,
            Self::Tuple(v) => v,
            Self::List(v) => v,
            Self::Array(v) => v,
            Self::Map(v) => v,
            Self::Pair(v) => v,
            Self::Option(v) => v,
            Self::Shared(v) => v,
            Self::Dynamic(v) => v,
            Self::Leaf(v) => v,
        }
    }
}
