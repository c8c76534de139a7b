use alloc::boxed::Box;

use crate::Reflect;

/// A growable sequence.
pub trait List: Reflect {
    fn len(&self) -> usize;

    fn get(&self, index: usize) -> Option<&dyn Reflect>;

    /// Appends a value, converting it to the item type.
    ///
    /// Returns the value if it cannot be converted.
    fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

    /// Reserves room for `additional` more items.
    #[inline]
    fn reserve(&mut self, _additional: usize) {}
}
