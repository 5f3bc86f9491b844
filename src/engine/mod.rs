//! Engine coordinator: owns the memtable, the write-ahead log, and the
//! ordered segment registry. Routes `put`/`get`, triggers a flush once the
//! memtable's entry count reaches [`EngineConfig::memtable_threshold`], and
//! manages the lifecycle of every file handle and memory mapping it holds.
//!
//! State machine: `Open → (put | get | flush)* → Closed`. `close` consumes
//! the `Engine`, so no operation is reachable afterwards — the type system
//! enforces the terminal state.

#[cfg(test)]
mod tests;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::codec::HexKey;
use crate::error::StorageError;
use crate::skiplist::SkipList;
use crate::sstable::{builder, Segment};
use crate::wal::Wal;

const WAL_FILE_NAME: &str = "recovery.wal";

/// Tunable knobs for an [`Engine`] instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Memtable entry count at which an automatic flush is triggered. Must
    /// be positive.
    pub memtable_threshold: usize,
    /// Skip-list promotion probability.
    pub p: f64,
    /// Skip-list maximum height.
    pub max_level: usize,
    /// When false, WAL appends are not forced to disk before `put` returns.
    pub durable_writes: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { memtable_threshold: 1000, p: 0.5, max_level: 16, durable_writes: true }
    }
}

/// Single-node, single-threaded, embedded LSM key-value engine.
///
/// Not safe for concurrent invocation from multiple threads on the same
/// instance (see crate docs on the concurrency model); external
/// synchronization is required if an `Engine` is shared.
pub struct Engine {
    dir: PathBuf,
    config: EngineConfig,
    memtable: SkipList,
    memtable_len: usize,
    wal: Wal,
    /// Open segment readers, oldest first. Position is age rank; reads
    /// consult this newest-first (reverse order).
    segments: Vec<Segment>,
    next_segment_id: u64,
}

impl Engine {
    /// Opens (or creates) an engine rooted at `dir`.
    ///
    /// Ensures the directory exists, opens or creates the WAL file, and
    /// starts with an empty memtable and an empty segment registry.
    /// Pre-existing `*.sst` files in `dir` are not discovered or registered
    /// (segment discovery on open is not implemented — see crate docs), but
    /// the next segment id is still seeded past the highest one found on
    /// disk, so a flush after a close→open cycle never reuses a filename
    /// and clobbers a segment from a previous session.
    pub fn open(dir: impl AsRef<Path>, config: EngineConfig) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        if dir.as_os_str().is_empty() {
            return Err(StorageError::InvalidArgument { detail: "dir_path must not be empty".into() });
        }
        if config.memtable_threshold == 0 {
            return Err(StorageError::InvalidArgument {
                detail: "memtable_threshold must be positive".into(),
            });
        }

        fs::create_dir_all(&dir)?;
        let wal = Wal::open(dir.join(WAL_FILE_NAME))?;
        let memtable = SkipList::with_params(config.p, config.max_level);
        let next_segment_id = next_segment_id_after_existing(&dir)?;

        info!(dir = %dir.display(), threshold = config.memtable_threshold, "engine opened");
        Ok(Self { dir, config, memtable, memtable_len: 0, wal, segments: Vec::new(), next_segment_id })
    }

    /// Writes `key`/`value`, durably recording it in the WAL before
    /// inserting it into the memtable, then flushing automatically if the
    /// memtable has reached its threshold.
    ///
    /// If the WAL append fails, the memtable is left untouched — a failed
    /// `put` has no observable side effect.
    pub fn put(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<(), StorageError> {
        if let Err(err) = self.wal.append(&key, &value, self.config.durable_writes) {
            tracing::error!(key = %HexKey(&key), %err, "wal append failed, put aborted");
            return Err(err);
        }

        if self.memtable.insert(key.clone(), value) {
            self.memtable_len += 1;
        }
        debug!(key = %HexKey(&key), memtable_len = self.memtable_len, "put applied");

        if self.memtable_len >= self.config.memtable_threshold {
            self.flush()?;
        }
        Ok(())
    }

    /// Looks up `key`: memtable first, then segments newest-to-oldest.
    /// Returns the first hit, or `Ok(None)` once every segment has been
    /// consulted with no match.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        if let Some(value) = self.memtable.search(key) {
            debug!(key = %HexKey(key), "get hit in memtable");
            return Ok(Some(value.to_vec()));
        }

        for segment in self.segments.iter().rev() {
            if let Some(value) = segment.search(key)? {
                debug!(key = %HexKey(key), path = %segment.path().display(), "get hit in segment");
                return Ok(Some(value));
            }
        }

        debug!(key = %HexKey(key), "get miss");
        Ok(None)
    }

    /// Turns the current memtable into a new immutable segment and rolls
    /// the WAL. A no-op if the memtable is empty.
    ///
    /// On failure, any partially written segment file is removed by the
    /// segment writer before the error reaches this call's caller; the
    /// memtable and WAL remain authoritative.
    pub fn flush(&mut self) -> Result<(), StorageError> {
        if self.memtable_len == 0 {
            return Ok(());
        }

        let path = self.dir.join(segment_file_name(self.next_segment_id));
        let records: Vec<(Vec<u8>, Vec<u8>)> =
            self.memtable.iter().map(|(k, v)| (k.to_vec(), v.to_vec())).collect();

        if let Err(err) = builder::write(records.iter().map(|(k, v)| (k.as_slice(), v.as_slice())), &path) {
            warn!(path = %path.display(), %err, "flush failed, partial segment cleaned up");
            return Err(err);
        }

        // A segment-reader open failure here is fatal: the data is on disk
        // but would otherwise be invisible to reads.
        let segment = Segment::open(&path)?;
        self.segments.push(segment);
        self.next_segment_id += 1;

        self.memtable = SkipList::with_params(self.config.p, self.config.max_level);
        self.memtable_len = 0;
        self.wal.roll()?;

        info!(path = %path.display(), records = records.len(), "flush produced new segment");
        Ok(())
    }

    /// Releases the WAL handle and every segment reader. Does not flush the
    /// memtable — data living only there is, in principle, recoverable from
    /// the WAL, though this crate does not implement that replay (see crate
    /// docs on WAL recovery).
    pub fn close(self) -> Result<(), StorageError> {
        self.wal.close()?;
        info!(dir = %self.dir.display(), segments = self.segments.len(), "engine closed");
        Ok(())
    }

    /// The directory this engine is rooted at.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of open segments in the registry. Exposed for tests that
    /// assert on flush/compaction behavior.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

fn segment_file_name(id: u64) -> String {
    format!("{id:010}.sst")
}

/// Scans `dir` for `*.sst` files named by [`segment_file_name`] and returns
/// one past the highest id found, or `0` if none exist.
///
/// This does not register the segments as readers (segment discovery on
/// open is not implemented — see crate docs); it only keeps a fresh flush
/// from picking an id already used by a segment from a previous session.
fn next_segment_id_after_existing(dir: &Path) -> Result<u64, StorageError> {
    let mut max_id = None;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("sst") {
            continue;
        }
        if let Some(id) = path.file_stem().and_then(|s| s.to_str()).and_then(|s| s.parse::<u64>().ok()) {
            max_id = Some(max_id.map_or(id, |m: u64| m.max(id)));
        }
    }
    Ok(max_id.map_or(0, |id| id + 1))
}
