#![doc = include_str!("../README.md")]
#![no_std]

// -----------------------------------------------------------------------------
// Extern Self

// Generated code names this crate `tg_reflect`, which must also resolve
// inside the crate itself.
extern crate self as tg_reflect;

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod reflection;

pub mod impls;
pub mod info;
pub mod ops;
pub mod registry;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use impls::{KeyValue, Shared};
pub use reflection::{FromReflect, Reflect};
pub use tg_reflect_derive as derive;
