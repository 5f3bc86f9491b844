//! Error taxonomy shared by every component: the codec, the WAL, segment
//! I/O, compaction, and the engine coordinator all return [`StorageError`].

use thiserror::Error;

/// Errors surfaced by the storage engine and its components.
///
/// *Not found* is deliberately absent from this enum: a `get` miss is a
/// normal result (`Ok(None)`), not a failure.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Any file-system failure during WAL append, segment write, mmap, or
    /// close.
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// A truncated or malformed record encountered during a segment scan or
    /// WAL replay. The affected segment is unusable.
    #[error("corrupt frame: {detail}")]
    Corrupt { detail: String },

    /// A non-positive `memtable_threshold`, an empty directory path, or
    /// similar caller error.
    #[error("invalid argument: {detail}")]
    InvalidArgument { detail: String },
}
