use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::Reflect;
use crate::info::{Type, TypePath, TypeRef, Typed, impl_type_fn};
use crate::ops::{Array, List, Map, Pair};

// -----------------------------------------------------------------------------
// ListInfo

/// A growable sequence such as `Vec<T>` or `VecDeque<T>`.
#[derive(Clone, Debug)]
pub struct ListInfo {
    ty: Type,
    item: TypeRef,
}

impl ListInfo {
    impl_type_fn!(ty);

    #[inline]
    pub const fn new<TList: List + TypePath, TItem: Reflect + Typed>() -> Self {
        Self {
            ty: Type::of::<TList>(),
            item: TypeRef::of::<TItem>(),
        }
    }

    #[inline]
    pub const fn item(&self) -> TypeRef {
        self.item
    }
}

// -----------------------------------------------------------------------------
// ArrayInfo

/// A fixed-size array `[T; N]`.
///
/// Arrays have no empty state to fill in place, so they are built in one
/// step from all their items.
#[derive(Clone, Debug)]
pub struct ArrayInfo {
    ty: Type,
    item: TypeRef,
    len: usize,
    from_items: fn(Vec<Box<dyn Reflect>>) -> Option<Box<dyn Reflect>>,
}

impl ArrayInfo {
    impl_type_fn!(ty);

    #[inline]
    pub const fn new<TArray: Array + TypePath, TItem: Reflect + Typed>(
        len: usize,
        from_items: fn(Vec<Box<dyn Reflect>>) -> Option<Box<dyn Reflect>>,
    ) -> Self {
        Self {
            ty: Type::of::<TArray>(),
            item: TypeRef::of::<TItem>(),
            len,
            from_items,
        }
    }

    #[inline]
    pub const fn item(&self) -> TypeRef {
        self.item
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Builds the array from exactly [`len`](Self::len) items.
    #[inline]
    pub fn from_items(&self, items: Vec<Box<dyn Reflect>>) -> Option<Box<dyn Reflect>> {
        (self.from_items)(items)
    }
}

// -----------------------------------------------------------------------------
// MapInfo

/// A key-value container such as `HashMap<K, V>` or `BTreeMap<K, V>`.
#[derive(Clone, Debug)]
pub struct MapInfo {
    ty: Type,
    key: TypeRef,
    value: TypeRef,
}

impl MapInfo {
    impl_type_fn!(ty);

    #[inline]
    pub const fn new<TMap: Map + TypePath, TKey: Reflect + Typed, TValue: Reflect + Typed>()
    -> Self {
        Self {
            ty: Type::of::<TMap>(),
            key: TypeRef::of::<TKey>(),
            value: TypeRef::of::<TValue>(),
        }
    }

    #[inline]
    pub const fn key(&self) -> TypeRef {
        self.key
    }

    #[inline]
    pub const fn value(&self) -> TypeRef {
        self.value
    }
}

// -----------------------------------------------------------------------------
// PairInfo

/// A standalone key-value pair, see [`KeyValue`](crate::KeyValue).
#[derive(Clone, Debug)]
pub struct PairInfo {
    ty: Type,
    key: TypeRef,
    value: TypeRef,
    from_parts: fn(Box<dyn Reflect>, Box<dyn Reflect>) -> Option<Box<dyn Reflect>>,
}

impl PairInfo {
    impl_type_fn!(ty);

    #[inline]
    pub const fn new<TPair: Pair + TypePath, TKey: Reflect + Typed, TValue: Reflect + Typed>(
        from_parts: fn(Box<dyn Reflect>, Box<dyn Reflect>) -> Option<Box<dyn Reflect>>,
    ) -> Self {
        Self {
            ty: Type::of::<TPair>(),
            key: TypeRef::of::<TKey>(),
            value: TypeRef::of::<TValue>(),
            from_parts,
        }
    }

    #[inline]
    pub const fn key(&self) -> TypeRef {
        self.key
    }

    #[inline]
    pub const fn value(&self) -> TypeRef {
        self.value
    }

    #[inline]
    pub fn from_parts(
        &self,
        key: Box<dyn Reflect>,
        value: Box<dyn Reflect>,
    ) -> Option<Box<dyn Reflect>> {
        (self.from_parts)(key, value)
    }
}
