use alloc::boxed::Box;
use alloc::string::String;
use core::time::Duration;

use crate::Reflect;
use crate::info::LeafKind;

// -----------------------------------------------------------------------------
// LeafRef

/// A borrowed scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum LeafRef<'a> {
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    Usize(usize),
    F32(f32),
    F64(f64),
    String(&'a str),
    Duration(Duration),
    #[cfg(feature = "chrono")]
    DateTime(chrono::DateTime<chrono::Utc>),
    #[cfg(feature = "uuid")]
    Uuid(uuid::Uuid),
}

// -----------------------------------------------------------------------------
// LeafValue

/// An owned scalar.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum LeafValue {
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    Usize(usize),
    F32(f32),
    F64(f64),
    String(String),
    Duration(Duration),
    #[cfg(feature = "chrono")]
    DateTime(chrono::DateTime<chrono::Utc>),
    #[cfg(feature = "uuid")]
    Uuid(uuid::Uuid),
}

/// Expands `$body` once per leaf variant, binding the payload to `$v`.
macro_rules! for_each_leaf {
    ($value:expr, $v:ident => $body:expr, String($s:ident) => $string:expr) => {
        match $value {
            LeafValue::Bool($v) => $body,
            LeafValue::Char($v) => $body,
            LeafValue::I8($v) => $body,
            LeafValue::I16($v) => $body,
            LeafValue::I32($v) => $body,
            LeafValue::I64($v) => $body,
            LeafValue::I128($v) => $body,
            LeafValue::Isize($v) => $body,
            LeafValue::U8($v) => $body,
            LeafValue::U16($v) => $body,
            LeafValue::U32($v) => $body,
            LeafValue::U64($v) => $body,
            LeafValue::U128($v) => $body,
            LeafValue::Usize($v) => $body,
            LeafValue::F32($v) => $body,
            LeafValue::F64($v) => $body,
            LeafValue::String($s) => $string,
            LeafValue::Duration($v) => $body,
            #[cfg(feature = "chrono")]
            LeafValue::DateTime($v) => $body,
            #[cfg(feature = "uuid")]
            LeafValue::Uuid($v) => $body,
        }
    };
}

impl LeafValue {
    pub fn kind(&self) -> LeafKind {
        match self {
            Self::Bool(_) => LeafKind::Bool,
            Self::Char(_) => LeafKind::Char,
            Self::I8(_) => LeafKind::I8,
            Self::I16(_) => LeafKind::I16,
            Self::I32(_) => LeafKind::I32,
            Self::I64(_) => LeafKind::I64,
            Self::I128(_) => LeafKind::I128,
            Self::Isize(_) => LeafKind::Isize,
            Self::U8(_) => LeafKind::U8,
            Self::U16(_) => LeafKind::U16,
            Self::U32(_) => LeafKind::U32,
            Self::U64(_) => LeafKind::U64,
            Self::U128(_) => LeafKind::U128,
            Self::Usize(_) => LeafKind::Usize,
            Self::F32(_) => LeafKind::F32,
            Self::F64(_) => LeafKind::F64,
            Self::String(_) => LeafKind::String,
            Self::Duration(_) => LeafKind::Duration,
            #[cfg(feature = "chrono")]
            Self::DateTime(_) => LeafKind::DateTime,
            #[cfg(feature = "uuid")]
            Self::Uuid(_) => LeafKind::Uuid,
        }
    }

    /// Boxes the scalar as its Rust type, e.g. `I32(5)` becomes `5_i32`.
    pub fn into_reflect(self) -> Box<dyn Reflect> {
        for_each_leaf!(self, v => Box::new(v), String(s) => Box::new(s))
    }

    pub fn as_leaf_ref(&self) -> LeafRef<'_> {
        match self {
            Self::Bool(v) => LeafRef::Bool(*v),
            Self::Char(v) => LeafRef::Char(*v),
            Self::I8(v) => LeafRef::I8(*v),
            Self::I16(v) => LeafRef::I16(*v),
            Self::I32(v) => LeafRef::I32(*v),
            Self::I64(v) => LeafRef::I64(*v),
            Self::I128(v) => LeafRef::I128(*v),
            Self::Isize(v) => LeafRef::Isize(*v),
            Self::U8(v) => LeafRef::U8(*v),
            Self::U16(v) => LeafRef::U16(*v),
            Self::U32(v) => LeafRef::U32(*v),
            Self::U64(v) => LeafRef::U64(*v),
            Self::U128(v) => LeafRef::U128(*v),
            Self::Usize(v) => LeafRef::Usize(*v),
            Self::F32(v) => LeafRef::F32(*v),
            Self::F64(v) => LeafRef::F64(*v),
            Self::String(v) => LeafRef::String(v),
            Self::Duration(v) => LeafRef::Duration(*v),
            #[cfg(feature = "chrono")]
            Self::DateTime(v) => LeafRef::DateTime(*v),
            #[cfg(feature = "uuid")]
            Self::Uuid(v) => LeafRef::Uuid(*v),
        }
    }
}

impl LeafRef<'_> {
    /// Copies the scalar out of its container.
    pub fn to_value(&self) -> LeafValue {
        match *self {
            Self::Bool(v) => LeafValue::Bool(v),
            Self::Char(v) => LeafValue::Char(v),
            Self::I8(v) => LeafValue::I8(v),
            Self::I16(v) => LeafValue::I16(v),
            Self::I32(v) => LeafValue::I32(v),
            Self::I64(v) => LeafValue::I64(v),
            Self::I128(v) => LeafValue::I128(v),
            Self::Isize(v) => LeafValue::Isize(v),
            Self::U8(v) => LeafValue::U8(v),
            Self::U16(v) => LeafValue::U16(v),
            Self::U32(v) => LeafValue::U32(v),
            Self::U64(v) => LeafValue::U64(v),
            Self::U128(v) => LeafValue::U128(v),
            Self::Usize(v) => LeafValue::Usize(v),
            Self::F32(v) => LeafValue::F32(v),
            Self::F64(v) => LeafValue::F64(v),
            Self::String(v) => LeafValue::String(String::from(v)),
            Self::Duration(v) => LeafValue::Duration(v),
            #[cfg(feature = "chrono")]
            Self::DateTime(v) => LeafValue::DateTime(v),
            #[cfg(feature = "uuid")]
            Self::Uuid(v) => LeafValue::Uuid(v),
        }
    }

    pub fn kind(&self) -> LeafKind {
        match self {
            Self::Bool(_) => LeafKind::Bool,
            Self::Char(_) => LeafKind::Char,
            Self::I8(_) => LeafKind::I8,
            Self::I16(_) => LeafKind::I16,
            Self::I32(_) => LeafKind::I32,
            Self::I64(_) => LeafKind::I64,
            Self::I128(_) => LeafKind::I128,
            Self::Isize(_) => LeafKind::Isize,
            Self::U8(_) => LeafKind::U8,
            Self::U16(_) => LeafKind::U16,
            Self::U32(_) => LeafKind::U32,
            Self::U64(_) => LeafKind::U64,
            Self::U128(_) => LeafKind::U128,
            Self::Usize(_) => LeafKind::Usize,
            Self::F32(_) => LeafKind::F32,
            Self::F64(_) => LeafKind::F64,
            Self::String(_) => LeafKind::String,
            Self::Duration(_) => LeafKind::Duration,
            #[cfg(feature = "chrono")]
            Self::DateTime(_) => LeafKind::DateTime,
            #[cfg(feature = "uuid")]
            Self::Uuid(_) => LeafKind::Uuid,
        }
    }
}
