//! Compactor: merges several segments into one, keeping only the newest
//! value per key.
//!
//! `inputs` is ordered oldest-to-newest, mirroring the engine's segment
//! registry. The merge is a stable k-way merge keyed by `(key, rank)`
//! ascending by key then ascending by rank — rank being an input's position
//! in `inputs` — so that when the merged stream is scanned and consecutive
//! equal keys are collapsed to the last one seen, the surviving value is
//! always the one from the newest input that held the key.

#[cfg(test)]
mod tests;

use std::path::Path;

use tracing::info;

use crate::codec::Record;
use crate::error::StorageError;
use crate::sstable::{builder, Segment};

/// Merges `inputs` (oldest first) into a single new segment at `output_path`.
///
/// Opens a reader for each input, produces one record per unique key
/// (newest input wins ties), and writes the result via
/// [`crate::sstable::builder::write`]. Does not delete the input files —
/// the caller is responsible for swapping the new segment into its registry
/// and unlinking the inputs once no reader references them.
///
/// On failure, any partially written output is removed and the inputs are
/// left untouched.
pub fn merge(inputs: &[impl AsRef<Path>], output_path: &Path) -> Result<(), StorageError> {
    let segments: Vec<Segment> =
        inputs.iter().map(|p| Segment::open(p)).collect::<Result<_, _>>()?;

    let merged = merge_segments(&segments)?;
    builder::write(merged.iter().map(|(k, v)| (k.as_slice(), v.as_slice())), output_path)?;

    info!(
        inputs = segments.len(),
        output_records = merged.len(),
        path = %output_path.display(),
        "compaction produced new segment"
    );
    Ok(())
}

/// Runs the k-way merge over already-open segment readers and returns the
/// deduplicated, newest-wins result in ascending key order.
///
/// Split out from [`merge`] so tests can exercise the merge logic without
/// touching the filesystem for the output file.
pub fn merge_segments(segments: &[Segment]) -> Result<Vec<Record>, StorageError> {
    // (key, rank, value) tuples, sorted by (key asc, rank asc) via a stable
    // merge of each segment's already-sorted stream.
    let mut tagged: Vec<(usize, Record)> = Vec::new();
    for (rank, segment) in segments.iter().enumerate() {
        for result in segment.iter() {
            tagged.push((rank, result?));
        }
    }
    tagged.sort_by(|(rank_a, (key_a, _)), (rank_b, (key_b, _))| {
        key_a.cmp(key_b).then(rank_a.cmp(rank_b))
    });

    // Collapse consecutive equal keys, keeping the last (highest-rank) entry.
    let mut merged: Vec<Record> = Vec::with_capacity(tagged.len());
    for (_, record) in tagged {
        match merged.last_mut() {
            Some((last_key, last_value)) if *last_key == record.0 => {
                *last_value = record.1;
            }
            _ => merged.push(record),
        }
    }
    Ok(merged)
}
