//! LZ4 blocks around a whole payload.
//!
//! A compressed stream is `FORMAT_COMPRESSED`, the block length as a `u32`
//! LE, then the block: the raw payload length as a `u32` LE followed by the
//! LZ4 block bytes.

use alloc::format;
use alloc::string::ToString;
use alloc::vec::Vec;

use lz4_flex::block::{compress_into, decompress_into, get_maximum_output_size};

use crate::error::FormatError;
use crate::source::Source;

/// LZ4 never expands a byte into more than this many.
const MAX_RATIO: usize = 255;

const LEN_PREFIX: usize = size_of::<u32>();

#[inline]
fn len_u32(len: usize, what: &str) -> Result<u32, FormatError> {
    u32::try_from(len).map_err(|_| FormatError::Compression(format!("{what} of {len} bytes exceeds 4 GiB")))
}

/// Replaces `block` with the compressed form of `payload`.
pub(crate) fn compress_block(payload: &[u8], block: &mut Vec<u8>) -> Result<(), FormatError> {
    let raw_len = len_u32(payload.len(), "payload")?;

    block.clear();
    block.extend_from_slice(&raw_len.to_le_bytes());
    block.resize(LEN_PREFIX + get_maximum_output_size(payload.len()), 0);

    let written = compress_into(payload, &mut block[LEN_PREFIX..])
        .map_err(|err| FormatError::Compression(err.to_string()))?;
    block.truncate(LEN_PREFIX + written);
    len_u32(block.len(), "block")?;

    log::debug!("compressed a {} byte payload into {} bytes", payload.len(), block.len());
    Ok(())
}

/// Reads the block that follows `FORMAT_COMPRESSED` and decompresses it.
///
/// `block` receives the compressed bytes, `raw` the payload.
pub(crate) fn read_block(src: &mut impl Source, block: &mut Vec<u8>, raw: &mut Vec<u8>) -> Result<(), FormatError> {
    let block_len = u32::from_le_bytes(src.read_array()?) as usize;
    if block_len < LEN_PREFIX {
        return Err(FormatError::Compression(format!("block of {block_len} bytes has no length prefix")));
    }

    block.clear();
    src.read_into(block_len, block)?;

    let (prefix, body) = block.split_at(LEN_PREFIX);
    let mut len = [0_u8; LEN_PREFIX];
    len.copy_from_slice(prefix);
    let raw_len = u32::from_le_bytes(len) as usize;
    if raw_len > body.len().saturating_mul(MAX_RATIO) {
        return Err(FormatError::Compression(format!(
            "{raw_len} bytes can not come out of a {} byte block",
            body.len()
        )));
    }

    raw.clear();
    raw.resize(raw_len, 0);
    let written = decompress_into(body, raw).map_err(|err| FormatError::Compression(err.to_string()))?;
    if written != raw_len {
        return Err(FormatError::Compression(format!(
            "block holds {written} bytes, its prefix says {raw_len}"
        )));
    }

    log::debug!("decompressed a {block_len} byte block into {raw_len} bytes");
    Ok(())
}
