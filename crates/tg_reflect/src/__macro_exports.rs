//! Items used by the code that `tg_reflect_derive` generates.

/// Paths that stay valid in `no_std` caller crates.
pub mod macro_utils {
    pub use alloc::boxed::Box;
    pub use alloc::format;
    pub use alloc::string::String;
    pub use alloc::vec::Vec;
}

#[cfg(feature = "auto_register")]
pub mod auto_register {
    use crate::registry::{GetTypeMeta, TypeRegistry};

    pub use inventory;

    /// A registration function submitted by `#[reflect(auto_register)]`.
    pub struct __AutoRegisterFunc(pub fn(&mut TypeRegistry));

    inventory::collect!(__AutoRegisterFunc);

    pub trait __RegisterType {
        fn __register(registry: &mut TypeRegistry);
    }

    impl<T: GetTypeMeta> __RegisterType for T {
        #[inline]
        fn __register(registry: &mut TypeRegistry) {
            registry.register::<T>();
        }
    }

    /// Registered through `inventory` like any user type, so its presence
    /// tells whether the platform runs the submissions.
    #[derive(crate::derive::Reflect, Default)]
    #[reflect(auto_register)]
    pub struct __AvailFlag;

    pub fn __register_types(registry: &mut TypeRegistry) {
        for func in inventory::iter::<__AutoRegisterFunc> {
            (func.0)(registry);
        }
    }
}
