//! Record codec: length-prefixed `(key, value)` byte pairs.
//!
//! Frame layout: `u32_be key_len ‖ key_bytes ‖ u32_be value_len ‖ value_bytes`.
//! Shared by the write-ahead log, the segment writer, and the segment
//! reader — there is exactly one on-disk encoding for a record anywhere in
//! the crate.

use crate::error::StorageError;
use std::io::{self, Write};

/// A single `(key, value)` pair as it travels between the memtable, the WAL,
/// and segment files.
pub type Record = (Vec<u8>, Vec<u8>);

/// Writes one record frame to `out`.
pub fn encode<W: Write>(out: &mut W, key: &[u8], value: &[u8]) -> io::Result<()> {
    out.write_all(&(key.len() as u32).to_be_bytes())?;
    out.write_all(key)?;
    out.write_all(&(value.len() as u32).to_be_bytes())?;
    out.write_all(value)?;
    Ok(())
}

/// Decodes one record frame from the start of `buf`, returning the pair and
/// the number of bytes consumed. Fails with [`StorageError::Corrupt`] if
/// `buf` ends before a complete frame has been read.
pub fn decode(buf: &[u8]) -> Result<(Record, usize), StorageError> {
    let mut offset = 0;

    let key_len = read_u32(buf, offset)? as usize;
    offset += 4;
    let key = read_bytes(buf, offset, key_len)?.to_vec();
    offset += key_len;

    let value_len = read_u32(buf, offset)? as usize;
    offset += 4;
    let value = read_bytes(buf, offset, value_len)?.to_vec();
    offset += value_len;

    Ok(((key, value), offset))
}

fn read_u32(buf: &[u8], offset: usize) -> Result<u32, StorageError> {
    let slice = read_bytes(buf, offset, 4)?;
    Ok(u32::from_be_bytes(slice.try_into().expect("length checked by read_bytes")))
}

fn read_bytes(buf: &[u8], offset: usize, len: usize) -> Result<&[u8], StorageError> {
    buf.get(offset..offset + len).ok_or_else(|| StorageError::Corrupt {
        detail: format!(
            "truncated frame: need {len} bytes at offset {offset}, have {}",
            buf.len().saturating_sub(offset)
        ),
    })
}

/// Display wrapper that renders a byte key (or value) as a short hex prefix
/// plus length, so trace logs never print raw key/value bytes.
pub struct HexKey<'a>(pub &'a [u8]);

impl std::fmt::Display for HexKey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const MAX_SHOWN: usize = 8;
        let shown = &self.0[..self.0.len().min(MAX_SHOWN)];
        write!(f, "0x")?;
        for b in shown {
            write!(f, "{b:02x}")?;
        }
        if self.0.len() > MAX_SHOWN {
            write!(f, "..")?;
        }
        write!(f, " ({}B)", self.0.len())
    }
}
