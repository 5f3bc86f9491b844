//! Write-ahead log: an append-only, crash-durable record of every `put`
//! acknowledged by the engine.
//!
//! The on-disk format is the record codec ([`crate::codec`]) with no header,
//! no footer, and no per-record checksum — a concatenation of length-prefixed
//! frames in append order. Durability comes from flushing the buffered
//! writer and `fsync`-ing the underlying file, not from a checksum; the WAL
//! is trusted infrastructure written by a single process, not a wire format
//! guarding against adversarial corruption.

#[cfg(test)]
mod tests;

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::codec::{self, HexKey, Record};
use crate::error::StorageError;

/// Append-only durable log of `(key, value)` records.
///
/// The engine owns exactly one `Wal` at a time; it is rolled (truncated to
/// empty) immediately after a successful flush and reopened.
pub struct Wal {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl Wal {
    /// Opens `path` for appending, creating it if absent. Pre-existing
    /// contents (e.g. from a crash before the last roll) are preserved;
    /// this crate does not replay them (see crate docs on WAL recovery).
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        debug!(path = %path.display(), "wal opened");
        Ok(Self { path, writer: BufWriter::new(file) })
    }

    /// Appends one record. When `durable` is true, the record is flushed
    /// out of the buffered writer and `fsync`-ed before this call returns,
    /// so a subsequent crash cannot lose it. When false, the record may
    /// still sit in the OS page cache when this call returns.
    pub fn append(&mut self, key: &[u8], value: &[u8], durable: bool) -> Result<(), StorageError> {
        trace!(key = %HexKey(key), value = %HexKey(value), durable, "wal append");
        codec::encode(&mut self.writer, key, value)?;
        // Always flush out of the buffered writer so the record reaches the
        // OS page cache, even when `durable` is false — otherwise a
        // non-durable append wouldn't even survive a process crash, only a
        // clean drop.
        self.writer.flush()?;
        if durable {
            self.writer.get_ref().sync_all()?;
        }
        Ok(())
    }

    /// Truncates the log file to zero length in place, used by the engine
    /// immediately after a flush has durably produced a segment. The
    /// existing file handle keeps working after a roll.
    pub fn roll(&mut self) -> Result<(), StorageError> {
        self.writer.flush()?;
        let file = self.writer.get_ref();
        file.set_len(0)?;
        file.sync_all()?;
        debug!(path = %self.path.display(), "wal rolled");
        Ok(())
    }

    /// Releases the file handle. Does not itself force a disk sync; callers
    /// that need the final bytes durable should rely on the sync already
    /// performed by the last durable `append` or by `roll`.
    pub fn close(self) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Reads every record currently stored in the WAL file at `path`, in append
/// order. Used by tests to assert on-disk WAL contents; the engine itself
/// never replays the WAL (see crate docs).
pub fn read_all(path: impl AsRef<Path>) -> Result<Vec<Record>, StorageError> {
    let bytes = std::fs::read(path.as_ref())?;
    let mut records = Vec::new();
    let mut offset = 0;
    while offset < bytes.len() {
        let (record, consumed) = codec::decode(&bytes[offset..])?;
        records.push(record);
        offset += consumed;
    }
    Ok(records)
}
