use alloc::vec::Vec;

use crate::error::SchemaMismatch;

/// Non-fatal findings of one decode call.
///
/// Returned by [`Codec::deserialize_with_report`](crate::Codec::deserialize_with_report).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DecodeReport {
    dropped: Vec<SchemaMismatch>,
}

impl DecodeReport {
    #[inline]
    pub(crate) fn new(dropped: Vec<SchemaMismatch>) -> Self {
        Self { dropped }
    }

    /// Properties on the wire that the local types do not have, once per
    /// type header.
    #[inline]
    pub fn dropped(&self) -> &[SchemaMismatch] {
        &self.dropped
    }

    /// Returns `true` if the stream matched the local types exactly.
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty()
    }
}
