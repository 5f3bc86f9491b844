//! Segment (SSTable) format: an immutable, memory-mapped file holding a
//! concatenation of [`crate::codec`] record frames in strictly ascending key
//! order with no intra-segment duplicates.
//!
//! A [`Segment`] memory-maps the whole file on open and keeps the mapping
//! for its entire lifetime; `search` and ordered iteration both read
//! directly out of the mapping with no extra copy of the file into RAM.
//! [`builder::write`] is the only way a segment file is produced, whether
//! from a memtable flush or from [`crate::compaction::merge`].

pub mod builder;
pub mod iterator;

#[cfg(test)]
mod tests;

use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use tracing::{debug, trace};

use crate::codec::{self, HexKey};
use crate::error::StorageError;

pub use iterator::Iter;

/// A read-only handle onto one immutable segment file.
///
/// The constructor opens the file and memory-maps its full extent; the
/// mapping is released when the `Segment` is dropped. Safe to share across
/// multiple concurrent readers (the mapping is never mutated).
pub struct Segment {
    path: PathBuf,
    mmap: Mmap,
}

impl Segment {
    /// Opens `path` read-only and memory-maps it in full.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        // Safe because the mapping is read-only and outlives no writer: the
        // segment file is immutable from the moment `builder::write` renames
        // it into place.
        let mmap = unsafe { Mmap::map(&file)? };
        debug!(path = %path.display(), bytes = mmap.len(), "segment opened");
        Ok(Self { path, mmap })
    }

    /// The path this segment was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Scans the segment from offset 0, decoding frames in key order. Stops
    /// and returns `Ok(None)` as soon as a key strictly greater than `key`
    /// is seen (segments are sorted, so `key` cannot appear later), or when
    /// the file is exhausted.
    pub fn search(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        trace!(key = %HexKey(key), path = %self.path.display(), "segment search");
        let mut offset = 0;
        while offset < self.mmap.len() {
            let ((record_key, record_value), consumed) = codec::decode(&self.mmap[offset..])?;
            match record_key.as_slice().cmp(key) {
                std::cmp::Ordering::Equal => return Ok(Some(record_value)),
                std::cmp::Ordering::Greater => return Ok(None),
                std::cmp::Ordering::Less => offset += consumed,
            }
        }
        Ok(None)
    }

    /// Returns all records in stored (ascending-key) order. Used by the
    /// compactor to build its k-way merge.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(&self.mmap)
    }

    /// Number of bytes in the backing file.
    pub fn len_bytes(&self) -> usize {
        self.mmap.len()
    }

    /// True if the segment holds no records.
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }
}
