//! Small building blocks shared by the `tg_*` crates.
//!
//! - [`hash`]: fixed-seed hash containers built on *hashbrown* and *foldhash*.
//! - [`TypeIdMap`]: a map keyed by [`TypeId`](core::any::TypeId).
//! - [`pool`]: bounded free lists handing out recycled objects behind an RAII guard.
//! - [`range_invoke!`]: expands a macro once per tuple arity.
#![no_std]

// -----------------------------------------------------------------------------
// No STD Support

extern crate alloc;
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod range_invoke;
mod typeid_map;

pub mod hash;
pub mod pool;

// -----------------------------------------------------------------------------
// Top-level exports

pub use typeid_map::TypeIdMap;
