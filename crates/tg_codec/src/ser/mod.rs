//! The serializer stack machine.
//!
//! A call runs an explicit stack of scopes instead of recursing, so graph
//! depth is bounded by memory, not by the thread stack. Each scope is bound
//! to its value by a path from an anchor (see [`scope`]), which keeps the
//! machine free of borrows between iterations.
//!
//! `Shared` handles are where identity lives: the first encounter of a
//! handle registers it and writes `SHARED` before the inner value, every
//! later encounter writes an object back-reference. Cycles through handles
//! therefore end at the first back-reference.

// -----------------------------------------------------------------------------
// Modules

mod scope;
mod session;

// -----------------------------------------------------------------------------
// Exports

pub(crate) use session::{SerEnv, SerSession};

// -----------------------------------------------------------------------------
// Tests
