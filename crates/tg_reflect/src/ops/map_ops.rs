use alloc::boxed::Box;

use crate::Reflect;

/// A key-value container.
///
/// Entry order is the container's iteration order, which is stable as long
/// as the map is not modified.
pub trait Map: Reflect {
    fn len(&self) -> usize;

    /// Returns the entry at position `index` in iteration order.
    ///
    /// Linear in `index` for hash and tree maps; prefer [`Map::iter`] for
    /// sequential access.
    fn get_at(&self, index: usize) -> Option<(&dyn Reflect, &dyn Reflect)>;

    /// Looks up the value stored under `key`.
    ///
    /// Returns `None` if `key` is not of the map's key type.
    fn get(&self, key: &dyn Reflect) -> Option<&dyn Reflect>;

    fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_>;

    /// Inserts an entry, converting key and value to the map's types.
    ///
    /// On failure the entry is returned unchanged. Replacing an existing key
    /// is not an error.
    fn insert_boxed(
        &mut self,
        key: Box<dyn Reflect>,
        value: Box<dyn Reflect>,
    ) -> Result<(), (Box<dyn Reflect>, Box<dyn Reflect>)>;

    #[inline]
    fn reserve(&mut self, _additional: usize) {}
}
