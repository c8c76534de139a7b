use alloc::boxed::Box;

use crate::Reflect;

/// A handle to a value that other handles may point to as well.
///
/// Unlike plain owned values, which always form a tree, handles can alias
/// each other and build cycles. [`identity`](SharedRef::identity) tells
/// handles to the same value apart from handles to equal values.
///
/// The inner value sits behind a lock, so it is only reachable through a
/// callback.
pub trait SharedRef: Reflect {
    /// The address of the shared allocation.
    ///
    /// Stable for as long as any handle to it is alive.
    fn identity(&self) -> usize;

    fn with_inner(&self, f: &mut dyn FnMut(&dyn Reflect));

    fn with_inner_mut(&self, f: &mut dyn FnMut(&mut dyn Reflect));

    /// Returns a new handle to the same value.
    fn clone_handle(&self) -> Box<dyn Reflect>;
}
