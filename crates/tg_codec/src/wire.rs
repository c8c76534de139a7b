//! Byte values of the format.
//!
//! A stream is a format marker, then (for compressed streams) a `u32` LE
//! block length and an LZ4 block, then the mode byte and the opcodes of
//! exactly one root value.

// -----------------------------------------------------------------------------
// Header

pub const FORMAT_PLAIN: u8 = 0xC5;
pub const FORMAT_COMPRESSED: u8 = 0xC6;

pub const MODE_NARROW: u8 = 0x01;
pub const MODE_WIDE: u8 = 0x02;

// -----------------------------------------------------------------------------
// Values

pub const NULL: u8 = 0x00;

pub const FALSE: u8 = 0x01;
pub const TRUE: u8 = 0x02;
pub const CHAR: u8 = 0x03;
pub const I8: u8 = 0x04;
pub const I16: u8 = 0x05;
pub const I32: u8 = 0x06;
pub const I64: u8 = 0x07;
pub const I128: u8 = 0x08;
pub const ISIZE: u8 = 0x09;
pub const U8: u8 = 0x0A;
pub const U16: u8 = 0x0B;
pub const U32: u8 = 0x0C;
pub const U64: u8 = 0x0D;
pub const U128: u8 = 0x0E;
pub const USIZE: u8 = 0x0F;
pub const F32: u8 = 0x10;
pub const F64: u8 = 0x11;
pub const STRING: u8 = 0x12;
pub const DURATION: u8 = 0x13;
pub const DATE_TIME: u8 = 0x14;
pub const UUID: u8 = 0x15;

// -----------------------------------------------------------------------------
// Structure

pub const TYPE_START: u8 = 0x20;
pub const TYPE_START_KNOWN: u8 = 0x21;
pub const SHAPE_REF: u8 = 0x22;
pub const TYPE_END: u8 = 0x23;
pub const LIST_START: u8 = 0x24;
pub const LIST_END: u8 = 0x25;
pub const MAP_START: u8 = 0x26;
pub const MAP_END: u8 = 0x27;
pub const TUPLE_START: u8 = 0x28;
pub const TUPLE_END: u8 = 0x29;
pub const PAIR_START: u8 = 0x2A;
pub const PAIR_END: u8 = 0x2B;
pub const SHARED: u8 = 0x2C;
pub const OBJECT_REF: u8 = 0x2D;
pub const STRING_REF: u8 = 0x2E;

// -----------------------------------------------------------------------------
// Dense forms

/// Back-references below this index have a single-byte form.
pub const DENSE_REFS: usize = 20;

pub const OBJECT_REF_0: u8 = 0x30;
pub const SHAPE_REF_0: u8 = 0x50;
pub const STRING_REF_0: u8 = 0x70;

/// Integers in `0..SMALL_INTS` have a single-byte form.
pub const SMALL_INTS: u8 = 16;

pub const SMALL_I32: u8 = 0x90;
pub const SMALL_I64: u8 = 0xA0;
pub const SMALL_U32: u8 = 0xB0;
pub const SMALL_U64: u8 = 0xC0;

/// Returns `index` if `opcode` is the dense form `base + index`.
#[inline]
pub const fn dense_index(opcode: u8, base: u8) -> Option<usize> {
    if opcode >= base && ((opcode - base) as usize) < DENSE_REFS {
        Some((opcode - base) as usize)
    } else {
        None
    }
}

/// Returns the value if `opcode` is the small integer form `base + value`.
#[inline]
pub const fn small_value(opcode: u8, base: u8) -> Option<u8> {
    if opcode >= base && opcode - base < SMALL_INTS {
        Some(opcode - base)
    } else {
        None
    }
}
