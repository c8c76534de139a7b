//! Codec profiles.
//!
//! The reader always follows what the stream declares (mode byte, compressed
//! marker); a profile only restricts what the writer produces.

use crate::wire;

// -----------------------------------------------------------------------------
// CacheWidth

/// Width of the back-reference indices, announced by the mode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheWidth {
    /// 1-byte indices, 256 entries per cache.
    #[default]
    Narrow,
    /// 2-byte little-endian indices, 65 536 entries per cache.
    Wide,
}

impl CacheWidth {
    /// Maximum number of entries per cache.
    #[inline]
    pub const fn capacity(self) -> usize {
        match self {
            Self::Narrow => 1 << 8,
            Self::Wide => 1 << 16,
        }
    }

    #[inline]
    pub const fn mode_byte(self) -> u8 {
        match self {
            Self::Narrow => wire::MODE_NARROW,
            Self::Wide => wire::MODE_WIDE,
        }
    }

    #[inline]
    pub const fn from_mode_byte(byte: u8) -> Option<Self> {
        match byte {
            wire::MODE_NARROW => Some(Self::Narrow),
            wire::MODE_WIDE => Some(Self::Wide),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// Compression

/// LZ4 block compression of the whole payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compression {
    /// Payloads up to this many bytes are written uncompressed.
    pub threshold: usize,
}

impl Default for Compression {
    #[inline]
    fn default() -> Self {
        Self {
            threshold: 64 * 1024,
        }
    }
}

// -----------------------------------------------------------------------------
// UnknownPropertyPolicy

/// What the decoder does with a wire property the local type does not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownPropertyPolicy {
    /// Decode and discard the value, log a warning and record it in the
    /// [`DecodeReport`](crate::DecodeReport).
    #[default]
    Drop,
    /// Fail with [`CodecError::SchemaMismatch`](crate::CodecError::SchemaMismatch).
    Reject,
}

// -----------------------------------------------------------------------------
// CodecConfig

/// Settings of a [`Codec`](crate::Codec).
///
/// # Examples
///
/// ```
/// use tg_codec::{CacheWidth, CodecConfig};
///
/// let config = CodecConfig::portable()
///     .with_cache_width(CacheWidth::Wide)
///     .with_pool_capacity(2);
///
/// assert!(!config.tuples);
/// assert_eq!(config.cache_width, CacheWidth::Wide);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    pub cache_width: CacheWidth,
    pub compression: Option<Compression>,
    /// Write registered known types as 20-byte fingerprints.
    pub known_types: bool,
    /// Allow tuple and pair values.
    pub tuples: bool,
    pub unknown_properties: UnknownPropertyPolicy,
    /// Idle sessions and buffers kept per pool.
    pub pool_capacity: usize,
}

impl CodecConfig {
    /// Every feature: compression above 64 KiB, known types, tuples and
    /// pairs, wide indices.
    pub const fn full() -> Self {
        Self {
            cache_width: CacheWidth::Wide,
            compression: Some(Compression {
                threshold: 64 * 1024,
            }),
            known_types: true,
            tuples: true,
            unknown_properties: UnknownPropertyPolicy::Drop,
            pool_capacity: 8,
        }
    }

    /// Plain payloads with narrow indices, no known types, no tuples.
    pub const fn portable() -> Self {
        Self {
            cache_width: CacheWidth::Narrow,
            compression: None,
            known_types: false,
            tuples: false,
            unknown_properties: UnknownPropertyPolicy::Drop,
            pool_capacity: 8,
        }
    }

    #[inline]
    pub const fn with_cache_width(mut self, cache_width: CacheWidth) -> Self {
        self.cache_width = cache_width;
        self
    }

    #[inline]
    pub const fn with_compression(mut self, compression: Option<Compression>) -> Self {
        self.compression = compression;
        self
    }

    #[inline]
    pub const fn with_known_types(mut self, known_types: bool) -> Self {
        self.known_types = known_types;
        self
    }

    #[inline]
    pub const fn with_tuples(mut self, tuples: bool) -> Self {
        self.tuples = tuples;
        self
    }

    #[inline]
    pub const fn with_unknown_properties(mut self, policy: UnknownPropertyPolicy) -> Self {
        self.unknown_properties = policy;
        self
    }

    #[inline]
    pub const fn with_pool_capacity(mut self, pool_capacity: usize) -> Self {
        self.pool_capacity = pool_capacity;
        self
    }
}

impl Default for CodecConfig {
    /// Same as [`CodecConfig::full`].
    #[inline]
    fn default() -> Self {
        Self::full()
    }
}
