use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::Reflect;
use crate::info::{Type, TypePath, UnnamedField, impl_type_fn};
use crate::ops::Tuple;

/// Static layout of a tuple, and a constructor from its parts.
#[derive(Clone, Debug)]
pub struct TupleInfo {
    ty: Type,
    fields: Box<[UnnamedField]>,
    from_parts: fn(Vec<Box<dyn Reflect>>) -> Option<Box<dyn Reflect>>,
}

impl TupleInfo {
    impl_type_fn!(ty);

    #[inline]
    pub fn new<T: Tuple + TypePath>(
        fields: &[UnnamedField],
        from_parts: fn(Vec<Box<dyn Reflect>>) -> Option<Box<dyn Reflect>>,
    ) -> Self {
        Self {
            ty: Type::of::<T>(),
            fields: fields.into(),
            from_parts,
        }
    }

    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&UnnamedField> {
        self.fields.get(index)
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &UnnamedField> {
        self.fields.iter()
    }

    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }

    /// Builds the tuple from exactly [`field_len`](Self::field_len) values.
    ///
    /// Returns `None` if the count or any part's type does not match.
    #[inline]
    pub fn from_parts(&self, parts: Vec<Box<dyn Reflect>>) -> Option<Box<dyn Reflect>> {
        (self.from_parts)(parts)
    }
}
