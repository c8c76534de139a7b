use alloc::string::String;
use core::fmt;
use std::io;

use thiserror::Error;

use crate::config::CacheWidth;

// -----------------------------------------------------------------------------
// CacheKind

/// The three per-call caches whose indices appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    Object,
    Shape,
    String,
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Object => "object",
            Self::Shape => "shape",
            Self::String => "string",
        })
    }
}

// -----------------------------------------------------------------------------
// CodecError

/// Any failure of an encode or decode call.
///
/// The session of a failed call is reset and returned to its pool, the codec
/// stays usable.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodecError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    TypeResolution(#[from] TypeResolutionError),

    #[error(transparent)]
    SchemaMismatch(#[from] SchemaMismatch),

    #[error("unsupported by this codec configuration: {what}")]
    Unsupported { what: &'static str },
}

impl From<io::Error> for CodecError {
    #[inline]
    fn from(err: io::Error) -> Self {
        Self::Format(FormatError::Stream(err))
    }
}

// -----------------------------------------------------------------------------
// FormatError

/// The byte stream is malformed, or a value can not be written.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FormatError {
    #[error("expected {context} {expected:#04x}, found {actual:#04x}")]
    Header {
        context: &'static str,
        expected: u8,
        actual: u8,
    },

    #[error("unexpected opcode {opcode:#04x}, expected {context}")]
    UnknownOpcode { opcode: u8, context: &'static str },

    #[error("varint does not fit the target integer")]
    VarintOverflow,

    #[error("string is not valid UTF-8")]
    InvalidUtf8,

    #[error("{0:#x} is not a unicode scalar value")]
    InvalidChar(u32),

    #[error("invalid {kind} payload: {reason}")]
    InvalidLeaf { kind: &'static str, reason: &'static str },

    #[error("{cache} cache is full at index {index} with {width:?} indices")]
    CacheOverflow {
        cache: CacheKind,
        index: usize,
        width: CacheWidth,
    },

    #[error("{cache} back-reference {index} points to no entry")]
    BadReference { cache: CacheKind, index: usize },

    #[error("a value of type `{found}` can not be assigned to `{expected}`")]
    Unassignable {
        expected: &'static str,
        found: &'static str,
    },

    #[error("null found where `{expected}` was expected")]
    UnexpectedNull { expected: &'static str },

    #[error("stream ended early")]
    Truncated,

    #[error("stream failure: {0}")]
    Stream(#[from] io::Error),

    #[error("compressed block: {0}")]
    Compression(String),

    #[error("value changed while being written: {0}")]
    Traversal(&'static str),
}

// -----------------------------------------------------------------------------
// TypeResolutionError

/// A type named by the stream can not be turned into a local type.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TypeResolutionError {
    #[error("type `{0}` is not registered")]
    UnknownTypePath(String),

    #[error("no known type has fingerprint {0:02x?}")]
    UnknownFingerprint([u8; 20]),

    #[error("type `{0}` has no registered default constructor")]
    MissingConstructor(&'static str),

    #[error("tuple or pair without a declared type")]
    UndeclaredTuple,

    #[error("expected `{expected}`, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },
}

// -----------------------------------------------------------------------------
// SchemaMismatch

/// A property on the wire that the local type does not have.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("property `{property}` does not exist on `{type_path}`")]
pub struct SchemaMismatch {
    pub type_path: &'static str,
    pub property: String,
}

#[cfg(test)]
mod tests {
    use super::{CacheKind, CodecError, FormatError, TypeResolutionError};
    use alloc::string::ToString;

    #[test]
    fn header_names_both_bytes() {
        let err = FormatError::Header {
            context: "format marker",
            expected: 0xC5,
            actual: 0x7B,
        };
        assert_eq!(err.to_string(), "expected format marker 0xc5, found 0x7b");
    }

    #[test]
    fn wrapped_errors_are_transparent() {
        let err = CodecError::from(TypeResolutionError::UndeclaredTuple);
        assert_eq!(err.to_string(), "tuple or pair without a declared type");

        let err = CodecError::from(FormatError::BadReference {
            cache: CacheKind::Object,
            index: 3,
        });
        assert!(matches!(err, CodecError::Format(FormatError::BadReference { .. })));
    }

    #[test]
    fn invalid_leaf_names_the_kind() {
        let err = FormatError::InvalidLeaf {
            kind: "duration",
            reason: "nanoseconds past one second",
        };
        assert_eq!(err.to_string(), "invalid duration payload: nanoseconds past one second");
    }
}
