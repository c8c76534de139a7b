//! Static type information.
//!
//! - [`TypePath`]: stable type names, see also [`DynamicTypePath`].
//! - [`Type`]: a `TypeId` plus its [`TypePathTable`].
//! - [`TypeInfo`]: one variant per [`ReflectKind`], each carrying the kind's layout:
//!     - [`StructInfo`]: named fields in declaration order, and an optional items field.
//!     - [`TupleInfo`]: positional fields and a constructor from parts.
//!     - [`ListInfo`], [`ArrayInfo`], [`MapInfo`]: element types.
//!     - [`PairInfo`]: key and value types of a [`KeyValue`](crate::KeyValue).
//!     - [`OptionInfo`], [`SharedInfo`], [`DynamicInfo`]: wrappers around another type.
//!     - [`LeafInfo`]: a scalar with a dedicated [`LeafKind`].
//! - [`TypeRef`]: a lazily resolved reference to another type's info.
//! - [`Typed`]: static access to the `TypeInfo`, see also [`DynamicTyped`].

// -----------------------------------------------------------------------------
// Modules

mod container_info;
mod field_info;
mod leaf_info;
mod struct_info;
mod tuple_info;
mod type_info;
mod type_path;
mod type_ref;
mod typed;
mod wrapper_info;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use type_path::impl_type_fn;

// -----------------------------------------------------------------------------
// Exports

pub use container_info::{ArrayInfo, ListInfo, MapInfo, PairInfo};
pub use field_info::{NamedField, UnnamedField};
pub use leaf_info::{LeafInfo, LeafKind};
pub use struct_info::StructInfo;
pub use tuple_info::TupleInfo;
pub use type_info::{ReflectKind, ReflectKindError, TypeInfo};
pub use type_path::{DynamicTypePath, Type, TypePath, TypePathTable};
pub use type_ref::TypeRef;
pub use typed::{DynamicTyped, Typed};
pub use wrapper_info::{DynamicInfo, OptionInfo, SharedInfo};
