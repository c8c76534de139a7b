//! Byte input and LEB128 varints.

use alloc::vec::Vec;
use std::io::{self, Read};

use crate::error::FormatError;

// -----------------------------------------------------------------------------
// Source

/// Where the decoder reads bytes from.
///
/// Reads are exact: a source never consumes more than the decoder asks for,
/// so a stream can be followed by unrelated data.
pub trait Source {
    fn read_u8(&mut self) -> Result<u8, FormatError>;

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), FormatError>;

    /// Appends exactly `len` bytes to `out`.
    fn read_into(&mut self, len: usize, out: &mut Vec<u8>) -> Result<(), FormatError>;

    #[inline]
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], FormatError>
    where
        Self: Sized,
    {
        let mut buf = [0_u8; N];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }
}

/// A byte slice, consumed from the front.
pub struct SliceSource<'a> {
    bytes: &'a [u8],
}

impl<'a> SliceSource<'a> {
    #[inline]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// The bytes not read yet.
    #[inline]
    pub const fn remaining(&self) -> &'a [u8] {
        self.bytes
    }
}

impl Source for SliceSource<'_> {
    #[inline]
    fn read_u8(&mut self) -> Result<u8, FormatError> {
        let (&byte, rest) = self.bytes.split_first().ok_or(FormatError::Truncated)?;
        self.bytes = rest;
        Ok(byte)
    }

    #[inline]
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), FormatError> {
        let (head, rest) = self
            .bytes
            .split_at_checked(buf.len())
            .ok_or(FormatError::Truncated)?;
        buf.copy_from_slice(head);
        self.bytes = rest;
        Ok(())
    }

    #[inline]
    fn read_into(&mut self, len: usize, out: &mut Vec<u8>) -> Result<(), FormatError> {
        let (head, rest) = self
            .bytes
            .split_at_checked(len)
            .ok_or(FormatError::Truncated)?;
        out.extend_from_slice(head);
        self.bytes = rest;
        Ok(())
    }
}

/// Any [`Read`], one request per value.
///
/// Nothing is buffered here. Wrap slow readers in a `BufReader` when reading
/// past the end of the stream does not matter.
pub struct ReadSource<R> {
    reader: R,
}

impl<R: Read> ReadSource<R> {
    #[inline]
    pub const fn new(reader: R) -> Self {
        Self { reader }
    }
}

#[inline]
fn map_io(err: io::Error) -> FormatError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        FormatError::Truncated
    } else {
        FormatError::Stream(err)
    }
}

impl<R: Read> Source for ReadSource<R> {
    #[inline]
    fn read_u8(&mut self) -> Result<u8, FormatError> {
        let mut byte = [0_u8];
        self.reader.read_exact(&mut byte).map_err(map_io)?;
        Ok(byte[0])
    }

    #[inline]
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), FormatError> {
        self.reader.read_exact(buf).map_err(map_io)
    }

    fn read_into(&mut self, len: usize, out: &mut Vec<u8>) -> Result<(), FormatError> {
        // `take` keeps a corrupt length from reserving memory up front.
        let read = (&mut self.reader)
            .take(len as u64)
            .read_to_end(out)
            .map_err(map_io)?;
        if read == len {
            Ok(())
        } else {
            Err(FormatError::Truncated)
        }
    }
}

// -----------------------------------------------------------------------------
// Varint

/// Longest LEB128 encoding of a `u64`.
pub const MAX_VARINT_LEN: usize = 10;

#[inline]
pub fn write_varint(out: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        out.push((value as u8) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

pub fn read_varint(src: &mut impl Source) -> Result<u64, FormatError> {
    let mut value = 0_u64;
    for index in 0..MAX_VARINT_LEN {
        let byte = src.read_u8()?;
        let bits = u64::from(byte & 0x7F);
        // The 10th byte only has room for the top bit.
        if index == MAX_VARINT_LEN - 1 && byte > 1 {
            return Err(FormatError::VarintOverflow);
        }
        value |= bits << (7 * index);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(FormatError::VarintOverflow)
}

#[inline]
pub const fn zigzag(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

#[inline]
pub const fn unzigzag(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

#[inline]
pub fn read_varint_u32(src: &mut impl Source) -> Result<u32, FormatError> {
    u32::try_from(read_varint(src)?).map_err(|_| FormatError::VarintOverflow)
}

#[inline]
pub fn read_varint_i32(src: &mut impl Source) -> Result<i32, FormatError> {
    i32::try_from(unzigzag(read_varint(src)?)).map_err(|_| FormatError::VarintOverflow)
}

#[inline]
pub fn read_len(src: &mut impl Source) -> Result<usize, FormatError> {
    usize::try_from(read_varint(src)?).map_err(|_| FormatError::VarintOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn encoded(value: u64) -> Vec<u8> {
        let mut out = Vec::new();
        write_varint(&mut out, value);
        out
    }

    #[test]
    fn varint_bounds() {
        assert_eq!(encoded(0), [0x00]);
        assert_eq!(encoded(127), [0x7F]);
        assert_eq!(encoded(128), [0x80, 0x01]);
        assert_eq!(encoded(u64::MAX).len(), MAX_VARINT_LEN);

        for value in [0, 1, 127, 128, 300, u64::from(u32::MAX), u64::MAX] {
            let bytes = encoded(value);
            let mut src = SliceSource::new(&bytes);
            assert_eq!(read_varint(&mut src).unwrap(), value);
            assert!(src.remaining().is_empty());
        }
    }

    #[test]
    fn varint_overflow() {
        // 11 continuation bytes.
        let bytes = vec![0xFF; 11];
        let mut src = SliceSource::new(&bytes);
        assert!(matches!(read_varint(&mut src), Err(FormatError::VarintOverflow)));

        // 10th byte carries more than the top bit.
        let mut bytes = vec![0xFF; 9];
        bytes.push(0x02);
        let mut src = SliceSource::new(&bytes);
        assert!(matches!(read_varint(&mut src), Err(FormatError::VarintOverflow)));

        let bytes = encoded(u64::from(u32::MAX) + 1);
        let mut src = SliceSource::new(&bytes);
        assert!(matches!(read_varint_u32(&mut src), Err(FormatError::VarintOverflow)));
    }

    #[test]
    fn varint_truncated() {
        let mut src = SliceSource::new(&[0x80, 0x80]);
        assert!(matches!(read_varint(&mut src), Err(FormatError::Truncated)));
    }

    #[test]
    fn zigzag_pairs() {
        for (value, expected) in [(0, 0), (-1, 1), (1, 2), (-2, 3), (i64::MAX, u64::MAX - 1), (i64::MIN, u64::MAX)] {
            assert_eq!(zigzag(value), expected);
            assert_eq!(unzigzag(expected), value);
        }
    }

    #[test]
    fn reader_is_exact() {
        let bytes = [1_u8, 2, 3, 4];
        let mut reader = &bytes[..];
        let mut src = ReadSource::new(&mut reader);
        assert_eq!(src.read_u8().unwrap(), 1);
        let mut out = Vec::new();
        src.read_into(2, &mut out).unwrap();
        assert_eq!(out, [2, 3]);
        assert_eq!(reader, [4]);
    }

    #[test]
    fn reader_truncated() {
        let bytes = [1_u8, 2];
        let mut src = ReadSource::new(&bytes[..]);
        let mut out = Vec::new();
        assert!(matches!(src.read_into(3, &mut out), Err(FormatError::Truncated)));
        assert!(matches!(src.read_u8(), Err(FormatError::Truncated)));
    }
}
