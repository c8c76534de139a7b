use crate::Reflect;

/// A fixed-size sequence.
pub trait Array: Reflect {
    fn len(&self) -> usize;

    fn get(&self, index: usize) -> Option<&dyn Reflect>;
}
