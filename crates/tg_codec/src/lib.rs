#![doc = include_str!("../README.md")]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod cache;
mod codec;
mod compress;
mod config;
mod de;
mod error;
mod known;
mod leaf;
mod report;
mod ser;
mod source;

pub mod plan;
pub mod wire;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use codec::Codec;
pub use config::{CacheWidth, CodecConfig, Compression, UnknownPropertyPolicy};
pub use error::{CacheKind, CodecError, FormatError, SchemaMismatch, TypeResolutionError};
pub use known::{FINGERPRINT_LEN, fingerprint};
pub use plan::{Plan, PlanCache};
pub use report::DecodeReport;
