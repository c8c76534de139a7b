// -----------------------------------------------------------------------------
// Modules

mod default;
mod shared;

// -----------------------------------------------------------------------------
// Exports

pub use default::TypeTraitDefault;
pub use shared::TypeTraitShared;
