//! Type registration, for looking types up by name at run time.
//!
//! - [`TypeTrait`]: a capability of a type, stored type-erased.
//! - [`FromType`]: builds a `TypeTrait` for a concrete type.
//! - [`TypeMeta`]: a [`TypeInfo`] and a table of type traits.
//! - [`GetTypeMeta`]: builds the `TypeMeta` of a type and registers its dependencies.
//! - [`TypeRegistry`]: all registered `TypeMeta`s, by `TypeId`, type path and type name.
//! - Type traits:
//!     - [`TypeTraitDefault`]: builds a default value, used for decode placeholders.
//!     - [`TypeTraitShared`]: moves a value into a new [`Shared`](crate::Shared) handle.
//!
//! ## auto_register
//!
//! Types marked `#[reflect(auto_register)]` submit their registration through
//! the [`inventory`] crate, see [`TypeRegistry::auto_register`].
//!
//! [`TypeInfo`]: crate::info::TypeInfo
//! [`inventory`]: https://docs.rs/inventory

// -----------------------------------------------------------------------------
// Modules

mod from_type;
mod traits;
mod type_meta;
mod type_registry;
mod type_trait;

// -----------------------------------------------------------------------------
// Exports

pub use from_type::FromType;
pub use traits::{TypeTraitDefault, TypeTraitShared};
pub use type_meta::{GetTypeMeta, TypeMeta};
pub use type_registry::TypeRegistry;
pub use type_trait::TypeTrait;
