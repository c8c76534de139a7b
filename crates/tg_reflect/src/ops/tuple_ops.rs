use crate::Reflect;

/// Access to the positional fields of a tuple.
pub trait Tuple: Reflect {
    fn field(&self, index: usize) -> Option<&dyn Reflect>;

    fn field_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    fn field_len(&self) -> usize;
}
