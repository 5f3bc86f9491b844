//! Segment writer — serializes a sorted, deduplicated key stream into an
//! immutable on-disk segment.
//!
//! The file has no header, no footer, and no padding: just a concatenation
//! of record frames in stream order ([`crate::codec`]). The write targets a
//! sibling `.tmp` file and is renamed into place only once every byte has
//! been flushed and synced, so a crash mid-write never leaves a partially
//! written file at the final path.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{debug, trace};

use crate::codec::{self, HexKey};
use crate::error::StorageError;

/// Writes `records` (already sorted by key, already deduplicated) to a new
/// segment file at `path`.
///
/// On any I/O failure the temp file is removed before the error is
/// propagated, so a failed write never leaves debris behind.
pub fn write<'a, I>(records: I, path: &Path) -> Result<(), StorageError>
where
    I: IntoIterator<Item = (&'a [u8], &'a [u8])>,
{
    let tmp_path = tmp_path_for(path);
    match write_inner(records, &tmp_path) {
        Ok(()) => {
            fs::rename(&tmp_path, path)?;
            debug!(path = %path.display(), "segment committed");
            Ok(())
        }
        Err(err) => {
            let _ = fs::remove_file(&tmp_path);
            Err(err)
        }
    }
}

fn write_inner<'a, I>(records: I, tmp_path: &Path) -> Result<(), StorageError>
where
    I: IntoIterator<Item = (&'a [u8], &'a [u8])>,
{
    let file = File::create(tmp_path)?;
    let mut writer = BufWriter::new(file);
    let mut count = 0usize;

    for (key, value) in records {
        trace!(key = %HexKey(key), value = %HexKey(value), "segment record");
        codec::encode(&mut writer, key, value)?;
        count += 1;
    }

    writer.flush()?;
    writer.get_ref().sync_all()?;
    debug!(records = count, path = %tmp_path.display(), "segment written");
    Ok(())
}

fn tmp_path_for(path: &Path) -> std::path::PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".tmp");
    std::path::PathBuf::from(os)
}
