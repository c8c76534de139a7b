//! Per-call back-reference caches.
//!
//! Both ends assign indices in first-encounter order and apply the same
//! capacity rule, so an index written by the encoder names the same entry
//! in the decoder. Nothing here outlives a call.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::TypeId;

use tg_utils::TypeIdMap;
use tg_utils::hash::HashMap;

use crate::config::CacheWidth;
use crate::error::{CacheKind, FormatError};
use crate::source::Source;
use crate::wire;

// -----------------------------------------------------------------------------
// References

/// Writes `index` as `dense_base + index` or as `opcode` + 1/2-byte index.
pub(crate) fn write_ref(out: &mut Vec<u8>, dense_base: u8, opcode: u8, index: u32, width: CacheWidth) {
    if (index as usize) < wire::DENSE_REFS {
        out.push(dense_base + index as u8);
        return;
    }
    out.push(opcode);
    match width {
        CacheWidth::Narrow => out.push(index as u8),
        CacheWidth::Wide => out.extend_from_slice(&(index as u16).to_le_bytes()),
    }
}

/// Reads the index following a non-dense reference opcode.
pub(crate) fn read_ref_index(src: &mut impl Source, width: CacheWidth) -> Result<usize, FormatError> {
    Ok(match width {
        CacheWidth::Narrow => src.read_u8()? as usize,
        CacheWidth::Wide => u16::from_le_bytes(src.read_array()?) as usize,
    })
}

/// Resolves a reference opcode of one cache to its index.
///
/// Returns `None` if `opcode` is not a reference of that cache.
pub(crate) fn ref_index(
    opcode: u8,
    dense_base: u8,
    ref_opcode: u8,
    src: &mut impl Source,
    width: CacheWidth,
) -> Result<Option<usize>, FormatError> {
    if let Some(index) = wire::dense_index(opcode, dense_base) {
        return Ok(Some(index));
    }
    if opcode == ref_opcode {
        return read_ref_index(src, width).map(Some);
    }
    Ok(None)
}

// -----------------------------------------------------------------------------
// StringTable

/// Encoder side of the string cache.
#[derive(Default)]
pub(crate) struct StringTable {
    index: HashMap<Box<str>, u32>,
}

impl StringTable {
    #[inline]
    pub fn get(&self, value: &str) -> Option<u32> {
        self.index.get(value).copied()
    }

    /// Registers a string unless it is empty or the cache is full.
    #[inline]
    pub fn register(&mut self, value: &str, width: CacheWidth) {
        let len = self.index.len();
        if !value.is_empty() && len < width.capacity() {
            self.index.insert(Box::from(value), len as u32);
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.index.clear();
    }
}

/// Decoder side of the string cache.
#[derive(Default)]
pub(crate) struct StringList {
    entries: Vec<Box<str>>,
}

impl StringList {
    #[inline]
    pub fn get(&self, index: usize) -> Result<&str, FormatError> {
        self.entries
            .get(index)
            .map(|entry| &**entry)
            .ok_or(FormatError::BadReference {
                cache: CacheKind::String,
                index,
            })
    }

    /// Mirrors [`StringTable::register`].
    #[inline]
    pub fn register(&mut self, value: &str, width: CacheWidth) {
        if !value.is_empty() && self.entries.len() < width.capacity() {
            self.entries.push(Box::from(value));
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// -----------------------------------------------------------------------------
// Strings

/// Writes a string literal or a back-reference to an earlier one.
pub(crate) fn write_str(out: &mut Vec<u8>, strings: &mut StringTable, width: CacheWidth, value: &str) {
    if let Some(index) = strings.get(value) {
        write_ref(out, wire::STRING_REF_0, wire::STRING_REF, index, width);
        return;
    }
    out.push(wire::STRING);
    crate::source::write_varint(out, value.len() as u64);
    out.extend_from_slice(value.as_bytes());
    strings.register(value, width);
}

/// Reads the string that `opcode` starts.
///
/// Returns `None` if `opcode` is not a string form.
pub(crate) fn read_str(
    opcode: u8,
    src: &mut impl Source,
    strings: &mut StringList,
    width: CacheWidth,
    scratch: &mut Vec<u8>,
) -> Result<Option<String>, FormatError> {
    if opcode == wire::STRING {
        let len = crate::source::read_len(src)?;
        scratch.clear();
        src.read_into(len, scratch)?;
        let value = core::str::from_utf8(scratch).map_err(|_| FormatError::InvalidUtf8)?;
        strings.register(value, width);
        return Ok(Some(String::from(value)));
    }
    match ref_index(opcode, wire::STRING_REF_0, wire::STRING_REF, src, width)? {
        Some(index) => strings.get(index).map(|value| Some(String::from(value))),
        None => Ok(None),
    }
}

/// Like [`read_str`], failing on any other opcode.
pub(crate) fn expect_str(
    src: &mut impl Source,
    strings: &mut StringList,
    width: CacheWidth,
    scratch: &mut Vec<u8>,
) -> Result<String, FormatError> {
    let opcode = src.read_u8()?;
    read_str(opcode, src, strings, width, scratch)?.ok_or(FormatError::UnknownOpcode {
        opcode,
        context: "a string",
    })
}

// -----------------------------------------------------------------------------
// ShapeTable

/// Encoder side of the shape cache: one shape per type.
#[derive(Default)]
pub(crate) struct ShapeTable {
    index: TypeIdMap<u32>,
}

impl ShapeTable {
    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<u32> {
        self.index.get(&type_id).copied()
    }

    #[inline]
    pub fn register(&mut self, type_id: TypeId, width: CacheWidth) {
        let len = self.index.len();
        if len < width.capacity() {
            self.index.insert(type_id, len as u32);
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SliceSource;

    fn round_trip(values: &[&str], width: CacheWidth) -> Vec<u8> {
        let mut out = Vec::new();
        let mut table = StringTable::default();
        for value in values {
            write_str(&mut out, &mut table, width, value);
        }

        let mut src = SliceSource::new(&out);
        let mut list = StringList::default();
        let mut scratch = Vec::new();
        for value in values {
            let read = expect_str(&mut src, &mut list, width, &mut scratch).unwrap();
            assert_eq!(read, *value);
        }
        assert!(src.remaining().is_empty());
        out
    }

    #[test]
    fn strings_reuse() {
        let out = round_trip(&["name", "name", "", ""], CacheWidth::Narrow);
        // literal, dense ref 0, two empty literals.
        assert_eq!(out, [wire::STRING, 4, b'n', b'a', b'm', b'e', wire::STRING_REF_0, wire::STRING, 0, wire::STRING, 0]);
    }

    #[test]
    fn strings_beyond_dense() {
        let names: Vec<String> = (0..25).map(|i| alloc::format!("s{i}")).collect();
        let mut values: Vec<&str> = names.iter().map(String::as_str).collect();
        values.push("s22");

        for width in [CacheWidth::Narrow, CacheWidth::Wide] {
            let out = round_trip(&values, width);
            let tail: &[u8] = match width {
                CacheWidth::Narrow => &[wire::STRING_REF, 22],
                CacheWidth::Wide => &[wire::STRING_REF, 22, 0],
            };
            assert!(out.ends_with(tail));
        }
    }

    #[test]
    fn full_cache_writes_literals() {
        let names: Vec<String> = (0..300).map(|i| alloc::format!("v{i}")).collect();
        let mut values: Vec<&str> = names.iter().map(String::as_str).collect();
        // Index 299 was never registered under narrow indices.
        values.push("v299");
        let out = round_trip(&values, CacheWidth::Narrow);
        assert!(out.ends_with(&[wire::STRING, 4, b'v', b'2', b'9', b'9']));
    }

    #[test]
    fn dangling_reference() {
        let mut src = SliceSource::new(&[]);
        let mut list = StringList::default();
        let err = read_str(wire::STRING_REF_0 + 3, &mut src, &mut list, CacheWidth::Narrow, &mut Vec::new());
        assert!(matches!(err, Err(FormatError::BadReference { cache: CacheKind::String, index: 3 })));
    }
}
