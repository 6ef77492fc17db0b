//! Variable-byte integer encoding.
//!
//! Each byte carries 7 payload bits, least significant group first. The high
//! bit is set on every byte except the last one of a value.

use crate::error::{Error, Result};

/// Longest encoding of a `u64`: ceil(64 / 7).
pub const MAX_ENCODED_LEN: usize = 10;

/// Append the encoding of `value` to `buf`, returning the number of bytes written.
pub fn encode_u64(value: u64, buf: &mut Vec<u8>) -> usize {
    let start = buf.len();
    let mut val = value;

    loop {
        let mut byte = (val & 0x7F) as u8;
        val >>= 7;

        if val != 0 {
            byte |= 0x80; // Set continuation bit
        }

        buf.push(byte);

        if val == 0 {
            break;
        }
    }

    buf.len() - start
}

pub fn encoded_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}

/// Decode one value from the front of `bytes`, returning it with the number of
/// bytes consumed.
pub fn decode_u64(bytes: &[u8]) -> Result<(u64, usize)> {
    let mut result = 0u64;
    let mut shift = 0u32;

    for (i, &byte) in bytes.iter().enumerate() {
        if i == MAX_ENCODED_LEN {
            return Err(Error::CorruptPostings("varint longer than 10 bytes"));
        }

        let payload = (byte & 0x7F) as u64;
        // The tenth byte may only contribute the single remaining bit.
        if shift == 63 && payload > 1 {
            return Err(Error::CorruptPostings("varint overflows 64 bits"));
        }
        result |= payload << shift;

        if (byte & 0x80) == 0 {
            return Ok((result, i + 1));
        }

        shift += 7;
    }

    Err(Error::CorruptPostings("truncated varint"))
}

/// Decode a value that must fit in 32 bits.
pub fn decode_u32(bytes: &[u8]) -> Result<(u32, usize)> {
    let (value, consumed) = decode_u64(bytes)?;
    let value = u32::try_from(value).map_err(|_| Error::CorruptPostings("varint overflows 32 bits"))?;
    Ok((value, consumed))
}
