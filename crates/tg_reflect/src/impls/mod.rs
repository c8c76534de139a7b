//! Reflection for built-in and third-party types.
//!
//! - [`NonGenericTypeInfoCell`]: storage for `Typed` of non-generic types.
//! - [`GenericTypePathCell`], [`GenericTypeInfoCell`]: the same for generic types.
//!
//! ## Implemented Menu
//!
//! - leaves:
//!     - `bool` `char`, `i8`-`i128` `isize`, `u8`-`u128` `usize`, `f32` `f64`
//!     - `String`, `core::time::Duration`
//!     - `chrono::DateTime<Utc>` ("chrono" feature), `uuid::Uuid` ("uuid" feature)
//! - lists: `Vec<T>`, `VecDeque<T>`
//! - arrays: `[T; N]`
//! - maps: `std::collections::HashMap<K, V>`, `BTreeMap<K, V>`, `tg_utils::hash::HashMap<K, V>`
//! - tuples: `()`, `(P0,)`, `(P0, P1, ...)`, up to 12 fields
//! - pairs: [`KeyValue<K, V>`]
//! - wrappers: `Option<T>`, [`Shared<T>`], `Box<dyn Reflect>`

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod debug;

mod array;
mod dynamic;
mod key_value;
mod leaf;
mod list;
mod map;
mod option;
mod shared;
mod tuple;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeInfoCell, GenericTypePathCell, NonGenericTypeInfoCell};
pub use key_value::KeyValue;
pub use shared::Shared;

pub(crate) use debug::reflect_debug;
