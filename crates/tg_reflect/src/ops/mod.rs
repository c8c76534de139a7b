//! Kind-specific access to reflected values.
//!
//! Each kind of [`ReflectKind`](crate::info::ReflectKind) has a subtrait of
//! [`Reflect`](crate::Reflect), reached through [`ReflectRef`] and [`ReflectMut`]:
//!
//! - [`Struct`]: named fields, e.g. `A { .. }`, `A(..)` and `A`.
//! - [`Tuple`]: positional fields, e.g. `(i32, f32)`.
//! - [`List`]: growable sequences, e.g. `Vec<T>`.
//! - [`Array`]: fixed sequences, e.g. `[T; 4]`.
//! - [`Map`]: key-value containers, e.g. `HashMap<K, V>`.
//! - [`Pair`]: a single key-value pair, e.g. [`KeyValue`](crate::KeyValue).
//! - [`Nullable`]: `Option<T>`.
//! - [`SharedRef`]: identity-bearing handles, e.g. [`Shared<T>`](crate::Shared).
//!
//! Leaf values are read through [`LeafRef`] and produced as [`LeafValue`].

// -----------------------------------------------------------------------------
// Modules

mod array_ops;
mod kind;
mod leaf;
mod list_ops;
mod map_ops;
mod nullable_ops;
mod pair_ops;
mod shared_ops;
mod struct_ops;
mod tuple_ops;

// -----------------------------------------------------------------------------
// Exports

pub use array_ops::Array;
pub use kind::{ReflectMut, ReflectRef};
pub use leaf::{LeafRef, LeafValue};
pub use list_ops::List;
pub use map_ops::Map;
pub use nullable_ops::Nullable;
pub use pair_ops::Pair;
pub use shared_ops::SharedRef;
pub use struct_ops::Struct;
pub use tuple_ops::Tuple;
