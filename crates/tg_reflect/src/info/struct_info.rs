use alloc::boxed::Box;

use tg_utils::hash::HashMap;

use crate::info::{NamedField, Type, TypePath, impl_type_fn};
use crate::ops::Struct;

/// Static layout of a struct: its reflected fields in declaration order.
///
/// Tuple structs use the field names `"0"`, `"1"`, ... and unit structs
/// have no fields.
///
/// A struct may also carry an *items* field, marked `#[reflect(items)]`.
/// It is not a property: its elements make the struct list-like or
/// map-like and are written after the properties.
#[derive(Clone, Debug)]
pub struct StructInfo {
    ty: Type,
    fields: Box<[NamedField]>,
    indices: HashMap<&'static str, usize>,
    items: Option<NamedField>,
}

impl StructInfo {
    impl_type_fn!(ty);

    pub fn new<T: Struct + TypePath>(fields: &[NamedField]) -> Self {
        let indices = fields
            .iter()
            .enumerate()
            .map(|(index, field)| (field.name(), index))
            .collect();

        Self {
            ty: Type::of::<T>(),
            fields: fields.into(),
            indices,
            items: None,
        }
    }

    /// Sets the items field.
    #[inline]
    pub fn with_items(mut self, items: NamedField) -> Self {
        self.items = Some(items);
        self
    }

    #[inline]
    pub fn field(&self, name: &str) -> Option<&NamedField> {
        self.fields.get(*self.indices.get(name)?)
    }

    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&NamedField> {
        self.fields.get(index)
    }

    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &NamedField> {
        self.fields.iter()
    }

    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn items(&self) -> Option<&NamedField> {
        self.items.as_ref()
    }
}
