//! Ordered, in-order iteration over a segment's records — the scan
//! primitive the compactor's k-way merge is built on.

use crate::codec::{self, Record};
use crate::error::StorageError;

/// Iterates a segment's mmap'd bytes, decoding one record frame per step in
/// stored (ascending-key) order.
///
/// Yields `Result` because a corrupt or truncated frame can only be
/// detected while decoding; once an error is yielded the iterator stops
/// (the remainder of the file cannot be trusted).
pub struct Iter<'a> {
    bytes: &'a [u8],
    offset: usize,
    done: bool,
}

impl<'a> Iter<'a> {
    pub(super) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0, done: false }
    }
}

impl Iterator for Iter<'_> {
    type Item = Result<Record, StorageError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.offset >= self.bytes.len() {
            return None;
        }
        match codec::decode(&self.bytes[self.offset..]) {
            Ok((record, consumed)) => {
                self.offset += consumed;
                Some(Ok(record))
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
