use alloc::boxed::Box;
use alloc::sync::Arc;
use std::sync::RwLock;

use crate::info::Typed;
use crate::registry::FromType;
use crate::{FromReflect, Reflect, Shared};

/// Moves a value of a registered type into a new [`Shared`] handle.
///
/// The decoder only learns the concrete type of a shared value from the
/// wire, so the wrapping goes through the registry.
///
/// ```
/// use tg_reflect::registry::{TypeRegistry, TypeTraitShared};
/// use tg_reflect::{Reflect, Shared};
///
/// let registry = TypeRegistry::new();
/// let shared = registry
///     .get_with_type_path("i32").unwrap()
///     .get_trait::<TypeTraitShared>().unwrap()
///     .wrap(5_i32.into_boxed_reflect())
///     .unwrap();
///
/// let handle = shared.take::<Shared<i32>>().unwrap();
/// assert_eq!(*handle.read().unwrap(), 5);
/// ```
#[derive(Clone)]
pub struct TypeTraitShared {
    func: fn(Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>>,
}

impl TypeTraitShared {
    /// Returns the value unchanged if it is not of the registered type.
    #[inline(always)]
    pub fn wrap(&self, value: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
        (self.func)(value)
    }
}

impl<T: FromReflect + Typed> FromType<T> for TypeTraitShared {
    fn from_type() -> Self {
        Self {
            func: |value| {
                T::from_reflect(value).map(|inner| {
                    let handle: Shared<T> = Arc::new(RwLock::new(inner));
                    Box::new(handle) as Box<dyn Reflect>
                })
            },
        }
    }
}
