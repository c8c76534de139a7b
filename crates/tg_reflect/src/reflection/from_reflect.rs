use alloc::boxed::Box;

use crate::Reflect;

/// Builds a concrete value from a boxed reflected one.
///
/// The default takes the box if it holds exactly `Self`. Wrapper types
/// also accept their inner type:
///
/// - `Option<T>` accepts a `T` and wraps it in `Some`.
/// - `Box<dyn Reflect>` accepts anything.
///
/// ```
/// use tg_reflect::{FromReflect, Reflect};
///
/// let boxed = 3_u8.into_boxed_reflect();
/// assert_eq!(<Option<u8>>::from_reflect(boxed).unwrap(), Some(3));
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `FromReflect` so cannot be created through reflection",
    note = "consider annotating `{Self}` with `#[derive(Reflect)]`"
)]
pub trait FromReflect: Reflect + Sized {
    /// Converts `reflect` into `Self`, or returns it unchanged.
    #[inline]
    fn from_reflect(reflect: Box<dyn Reflect>) -> Result<Self, Box<dyn Reflect>> {
        reflect.take::<Self>()
    }
}
