//! The leaf codec table: one opcode and payload layout per [`LeafKind`].
//!
//! | kind | payload |
//! |------|---------|
//! | `bool` | none, `FALSE` / `TRUE` |
//! | `i8` `u8` `i16` `u16` `i128` `u128` `f32` `f64` | fixed width, little-endian |
//! | `i32` `i64` `isize` | zig-zag varint, or a small-int opcode for `0..=15` |
//! | `u32` `u64` `usize` | varint, or a small-int opcode for `0..=15` |
//! | `char` | varint scalar value |
//! | `String` | varint length + UTF-8, or a string back-reference |
//! | `Duration` | varint seconds + varint nanoseconds |
//! | `DateTime<Utc>` | zig-zag seconds + varint nanoseconds |
//! | `Uuid` | 16 bytes |

use alloc::string::String;
use alloc::vec::Vec;
use core::time::Duration;

use tg_reflect::info::LeafKind;
use tg_reflect::ops::{LeafRef, LeafValue};

use crate::cache::{self, StringList, StringTable};
use crate::config::CacheWidth;
use crate::error::{CodecError, FormatError};
use crate::source::{Source, read_len, read_varint, read_varint_u32, unzigzag, write_varint, zigzag};
use crate::wire;

// -----------------------------------------------------------------------------
// Encode

#[inline]
fn write_small_or(out: &mut Vec<u8>, small: u8, opcode: u8, value: u64, varint: u64) {
    if value < u64::from(wire::SMALL_INTS) {
        out.push(small + value as u8);
    } else {
        out.push(opcode);
        write_varint(out, varint);
    }
}

#[inline]
fn write_signed(out: &mut Vec<u8>, small: u8, opcode: u8, value: i64) {
    match u64::try_from(value) {
        Ok(small_value) if small_value < u64::from(wire::SMALL_INTS) => {
            out.push(small + small_value as u8);
        }
        _ => {
            out.push(opcode);
            write_varint(out, zigzag(value));
        }
    }
}

/// Appends the opcode and payload of a scalar.
pub(crate) fn write_leaf(
    out: &mut Vec<u8>,
    strings: &mut StringTable,
    width: CacheWidth,
    leaf: LeafRef<'_>,
) -> Result<(), CodecError> {
    match leaf {
        LeafRef::Bool(v) => out.push(if v { wire::TRUE } else { wire::FALSE }),
        LeafRef::Char(v) => {
            out.push(wire::CHAR);
            write_varint(out, u64::from(u32::from(v)));
        }
        LeafRef::I8(v) => {
            out.push(wire::I8);
            out.extend_from_slice(&v.to_le_bytes());
        }
        LeafRef::I16(v) => {
            out.push(wire::I16);
            out.extend_from_slice(&v.to_le_bytes());
        }
        LeafRef::I32(v) => write_signed(out, wire::SMALL_I32, wire::I32, i64::from(v)),
        LeafRef::I64(v) => write_signed(out, wire::SMALL_I64, wire::I64, v),
        LeafRef::I128(v) => {
            out.push(wire::I128);
            out.extend_from_slice(&v.to_le_bytes());
        }
        LeafRef::Isize(v) => {
            out.push(wire::ISIZE);
            write_varint(out, zigzag(v as i64));
        }
        LeafRef::U8(v) => {
            out.push(wire::U8);
            out.push(v);
        }
        LeafRef::U16(v) => {
            out.push(wire::U16);
            out.extend_from_slice(&v.to_le_bytes());
        }
        LeafRef::U32(v) => write_small_or(out, wire::SMALL_U32, wire::U32, u64::from(v), u64::from(v)),
        LeafRef::U64(v) => write_small_or(out, wire::SMALL_U64, wire::U64, v, v),
        LeafRef::U128(v) => {
            out.push(wire::U128);
            out.extend_from_slice(&v.to_le_bytes());
        }
        LeafRef::Usize(v) => {
            out.push(wire::USIZE);
            write_varint(out, v as u64);
        }
        LeafRef::F32(v) => {
            out.push(wire::F32);
            out.extend_from_slice(&v.to_le_bytes());
        }
        LeafRef::F64(v) => {
            out.push(wire::F64);
            out.extend_from_slice(&v.to_le_bytes());
        }
        LeafRef::String(v) => cache::write_str(out, strings, width, v),
        LeafRef::Duration(v) => {
            out.push(wire::DURATION);
            write_varint(out, v.as_secs());
            write_varint(out, u64::from(v.subsec_nanos()));
        }
        #[cfg(feature = "chrono")]
        LeafRef::DateTime(v) => {
            out.push(wire::DATE_TIME);
            write_varint(out, zigzag(v.timestamp()));
            write_varint(out, u64::from(v.timestamp_subsec_nanos()));
        }
        #[cfg(feature = "uuid")]
        LeafRef::Uuid(v) => {
            out.push(wire::UUID);
            out.extend_from_slice(v.as_bytes());
        }
        #[allow(unreachable_patterns, reason = "depends on the features of `tg_reflect`")]
        other => {
            log::warn!("no wire encoding for leaf kind `{}`", other.kind());
            return Err(CodecError::Unsupported {
                what: "leaf kind not enabled in tg_codec",
            });
        }
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Decode

/// Reads the scalar that `opcode` starts.
///
/// Returns `None` if `opcode` is not a leaf opcode.
pub(crate) fn read_leaf(
    opcode: u8,
    src: &mut impl Source,
    strings: &mut StringList,
    width: CacheWidth,
    scratch: &mut Vec<u8>,
) -> Result<Option<LeafValue>, FormatError> {
    if let Some(v) = wire::small_value(opcode, wire::SMALL_I32) {
        return Ok(Some(LeafValue::I32(i32::from(v))));
    }
    if let Some(v) = wire::small_value(opcode, wire::SMALL_I64) {
        return Ok(Some(LeafValue::I64(i64::from(v))));
    }
    if let Some(v) = wire::small_value(opcode, wire::SMALL_U32) {
        return Ok(Some(LeafValue::U32(u32::from(v))));
    }
    if let Some(v) = wire::small_value(opcode, wire::SMALL_U64) {
        return Ok(Some(LeafValue::U64(u64::from(v))));
    }
    if let Some(v) = cache::read_str(opcode, src, strings, width, scratch)? {
        return Ok(Some(LeafValue::String(v)));
    }

    let value = match opcode {
        wire::FALSE => LeafValue::Bool(false),
        wire::TRUE => LeafValue::Bool(true),
        wire::CHAR => {
            let scalar = read_varint_u32(src)?;
            LeafValue::Char(char::from_u32(scalar).ok_or(FormatError::InvalidChar(scalar))?)
        }
        wire::I8 => LeafValue::I8(i8::from_le_bytes(src.read_array()?)),
        wire::I16 => LeafValue::I16(i16::from_le_bytes(src.read_array()?)),
        wire::I32 => LeafValue::I32(crate::source::read_varint_i32(src)?),
        wire::I64 => LeafValue::I64(unzigzag(read_varint(src)?)),
        wire::I128 => LeafValue::I128(i128::from_le_bytes(src.read_array()?)),
        wire::ISIZE => LeafValue::Isize(
            isize::try_from(unzigzag(read_varint(src)?)).map_err(|_| FormatError::VarintOverflow)?,
        ),
        wire::U8 => LeafValue::U8(src.read_u8()?),
        wire::U16 => LeafValue::U16(u16::from_le_bytes(src.read_array()?)),
        wire::U32 => LeafValue::U32(read_varint_u32(src)?),
        wire::U64 => LeafValue::U64(read_varint(src)?),
        wire::U128 => LeafValue::U128(u128::from_le_bytes(src.read_array()?)),
        wire::USIZE => LeafValue::Usize(read_len(src)?),
        wire::F32 => LeafValue::F32(f32::from_le_bytes(src.read_array()?)),
        wire::F64 => LeafValue::F64(f64::from_le_bytes(src.read_array()?)),
        wire::DURATION => {
            let secs = read_varint(src)?;
            let nanos = read_varint_u32(src)?;
            if nanos >= 1_000_000_000 {
                return Err(FormatError::InvalidLeaf {
                    kind: "duration",
                    reason: "nanoseconds past one second",
                });
            }
            LeafValue::Duration(Duration::new(secs, nanos))
        }
        #[cfg(feature = "chrono")]
        wire::DATE_TIME => {
            let secs = unzigzag(read_varint(src)?);
            let nanos = read_varint_u32(src)?;
            let value = chrono::DateTime::from_timestamp(secs, nanos).ok_or(FormatError::InvalidLeaf {
                kind: "date-time",
                reason: "timestamp out of range",
            })?;
            LeafValue::DateTime(value)
        }
        #[cfg(feature = "uuid")]
        wire::UUID => LeafValue::Uuid(uuid::Uuid::from_bytes(src.read_array()?)),
        _ => return Ok(None),
    };
    Ok(Some(value))
}

// -----------------------------------------------------------------------------
// Defaults

/// Whether a scalar equals the zero value of its kind.
///
/// Floats compare by bits, so `-0.0` is not elided.
pub(crate) fn is_default(leaf: LeafRef<'_>) -> bool {
    match leaf {
        LeafRef::Bool(v) => !v,
        LeafRef::Char(v) => v == '\0',
        LeafRef::I8(v) => v == 0,
        LeafRef::I16(v) => v == 0,
        LeafRef::I32(v) => v == 0,
        LeafRef::I64(v) => v == 0,
        LeafRef::I128(v) => v == 0,
        LeafRef::Isize(v) => v == 0,
        LeafRef::U8(v) => v == 0,
        LeafRef::U16(v) => v == 0,
        LeafRef::U32(v) => v == 0,
        LeafRef::U64(v) => v == 0,
        LeafRef::U128(v) => v == 0,
        LeafRef::Usize(v) => v == 0,
        LeafRef::F32(v) => v.to_bits() == 0,
        LeafRef::F64(v) => v.to_bits() == 0,
        LeafRef::String(v) => v.is_empty(),
        LeafRef::Duration(v) => v.is_zero(),
        #[cfg(feature = "chrono")]
        LeafRef::DateTime(v) => v.timestamp() == 0 && v.timestamp_subsec_nanos() == 0,
        #[cfg(feature = "uuid")]
        LeafRef::Uuid(v) => v.is_nil(),
        #[allow(unreachable_patterns, reason = "depends on the features of `tg_reflect`")]
        _ => false,
    }
}

/// The value a null leaf property decodes to.
pub(crate) fn zero_value(kind: LeafKind) -> Option<LeafValue> {
    Some(match kind {
        LeafKind::Bool => LeafValue::Bool(false),
        LeafKind::Char => LeafValue::Char('\0'),
        LeafKind::I8 => LeafValue::I8(0),
        LeafKind::I16 => LeafValue::I16(0),
        LeafKind::I32 => LeafValue::I32(0),
        LeafKind::I64 => LeafValue::I64(0),
        LeafKind::I128 => LeafValue::I128(0),
        LeafKind::Isize => LeafValue::Isize(0),
        LeafKind::U8 => LeafValue::U8(0),
        LeafKind::U16 => LeafValue::U16(0),
        LeafKind::U32 => LeafValue::U32(0),
        LeafKind::U64 => LeafValue::U64(0),
        LeafKind::U128 => LeafValue::U128(0),
        LeafKind::Usize => LeafValue::Usize(0),
        LeafKind::F32 => LeafValue::F32(0.0),
        LeafKind::F64 => LeafValue::F64(0.0),
        LeafKind::String => LeafValue::String(String::new()),
        LeafKind::Duration => LeafValue::Duration(Duration::ZERO),
        #[cfg(feature = "chrono")]
        LeafKind::DateTime => LeafValue::DateTime(chrono::DateTime::<chrono::Utc>::default()),
        #[cfg(feature = "uuid")]
        LeafKind::Uuid => LeafValue::Uuid(uuid::Uuid::nil()),
        #[allow(unreachable_patterns, reason = "depends on the features of `tg_reflect`")]
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SliceSource;
    use alloc::vec;

    fn encode(leaf: LeafRef<'_>) -> Vec<u8> {
        let mut out = Vec::new();
        write_leaf(&mut out, &mut StringTable::default(), CacheWidth::Narrow, leaf).unwrap();
        out
    }

    fn decode(bytes: &[u8]) -> LeafValue {
        let mut src = SliceSource::new(&bytes[1..]);
        let value = read_leaf(bytes[0], &mut src, &mut StringList::default(), CacheWidth::Narrow, &mut Vec::new())
            .unwrap()
            .unwrap();
        assert!(src.remaining().is_empty(), "payload not fully consumed");
        value
    }

    #[test]
    fn small_int_opcodes() {
        assert_eq!(encode(LeafRef::I32(0)), [wire::SMALL_I32]);
        assert_eq!(encode(LeafRef::I32(15)), [wire::SMALL_I32 + 15]);
        assert_eq!(encode(LeafRef::I64(7)), [wire::SMALL_I64 + 7]);
        assert_eq!(encode(LeafRef::U32(15)), [wire::SMALL_U32 + 15]);
        assert_eq!(encode(LeafRef::U64(3)), [wire::SMALL_U64 + 3]);

        assert_eq!(encode(LeafRef::I32(16)), [wire::I32, 32]);
        assert_eq!(encode(LeafRef::I32(-1)), [wire::I32, 1]);
        assert_eq!(encode(LeafRef::U32(16)), [wire::U32, 16]);

        assert_eq!(decode(&[wire::SMALL_U64 + 3]), LeafValue::U64(3));
        assert_eq!(decode(&[wire::SMALL_I32 + 15]), LeafValue::I32(15));
    }

    #[test]
    fn scenario_age() {
        // 33 is zig-zag encoded as 66, a single varint byte.
        assert_eq!(encode(LeafRef::I32(33)), [wire::I32, 66]);
    }

    #[test]
    fn extremes() {
        let values = [
            LeafValue::I32(i32::MIN),
            LeafValue::I64(i64::MAX),
            LeafValue::Isize(isize::MIN),
            LeafValue::U64(u64::MAX),
            LeafValue::Usize(usize::MAX),
            LeafValue::I128(i128::MIN),
            LeafValue::U128(u128::MAX),
            LeafValue::F64(-0.0),
            LeafValue::F32(f32::INFINITY),
            LeafValue::Char('\u{10FFFF}'),
            LeafValue::Duration(Duration::new(u64::MAX, 999_999_999)),
            LeafValue::String(String::from("日本")),
        ];
        for value in values {
            let bytes = encode(value.as_leaf_ref());
            assert_eq!(decode(&bytes), value);
        }
    }

    #[test]
    fn invalid_payloads() {
        let mut strings = StringList::default();

        // Surrogate code point.
        let mut bytes = Vec::new();
        write_varint(&mut bytes, 0xD800);
        let mut src = SliceSource::new(&bytes);
        let err = read_leaf(wire::CHAR, &mut src, &mut strings, CacheWidth::Narrow, &mut Vec::new());
        assert!(matches!(err, Err(FormatError::InvalidChar(0xD800))));

        let bytes = vec![2, 0xC3, 0x28];
        let mut src = SliceSource::new(&bytes);
        let err = read_leaf(wire::STRING, &mut src, &mut strings, CacheWidth::Narrow, &mut Vec::new());
        assert!(matches!(err, Err(FormatError::InvalidUtf8)));

        let bytes = vec![1];
        let mut src = SliceSource::new(&bytes);
        let err = read_leaf(wire::I16, &mut src, &mut strings, CacheWidth::Narrow, &mut Vec::new());
        assert!(matches!(err, Err(FormatError::Truncated)));

        // One second of nanoseconds belongs in the seconds field.
        let mut bytes = vec![0];
        write_varint(&mut bytes, 1_000_000_000);
        let mut src = SliceSource::new(&bytes);
        let err = read_leaf(wire::DURATION, &mut src, &mut strings, CacheWidth::Narrow, &mut Vec::new());
        assert!(matches!(err, Err(FormatError::InvalidLeaf { kind: "duration", .. })));
    }

    #[test]
    fn not_a_leaf() {
        let mut src = SliceSource::new(&[]);
        let read = read_leaf(wire::TYPE_START, &mut src, &mut StringList::default(), CacheWidth::Narrow, &mut Vec::new());
        assert!(matches!(read, Ok(None)));
    }

    #[test]
    fn defaults() {
        assert!(is_default(LeafRef::I32(0)));
        assert!(is_default(LeafRef::String("")));
        assert!(!is_default(LeafRef::F64(-0.0)));
        assert!(!is_default(LeafRef::Bool(true)));
        assert_eq!(zero_value(LeafKind::U16), Some(LeafValue::U16(0)));
    }

    #[cfg(feature = "chrono")]
    #[test]
    fn date_time() {
        let value = chrono::DateTime::from_timestamp(-86_400, 5).unwrap();
        let bytes = encode(LeafRef::DateTime(value));
        assert_eq!(decode(&bytes), LeafValue::DateTime(value));
    }

    #[cfg(feature = "uuid")]
    #[test]
    fn uuid_bytes() {
        let value = uuid::Uuid::from_u128(0x0123_4567_89AB_CDEF_0123_4567_89AB_CDEF);
        let bytes = encode(LeafRef::Uuid(value));
        assert_eq!(bytes.len(), 17);
        assert_eq!(decode(&bytes), LeafValue::Uuid(value));
    }
}
