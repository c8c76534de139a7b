#![doc = include_str!("../README.md")]
#![no_std]

// -----------------------------------------------------------------------------
// Re-export crates

pub use tg_codec as codec;
pub use tg_reflect as reflect;
pub use tg_utils as utils;

// -----------------------------------------------------------------------------
// Prelude

/// The items most callers need to encode and decode a value.
pub mod prelude {
    pub use tg_codec::{Codec, CodecConfig, CodecError};
    pub use tg_reflect::derive::Reflect;
    pub use tg_reflect::{FromReflect, KeyValue, Reflect, Shared};
}
