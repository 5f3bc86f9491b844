use super::helpers::init_tracing;
use crate::wal::{self, Wal};
use tempfile::tempdir;

#[test]
fn append_durable_then_read_back() {
    init_tracing();
    let dir = tempdir().unwrap();
    let path = dir.path().join("recovery.wal");

    let mut wal = Wal::open(&path).unwrap();
    wal.append(b"user:101", b"Alice", true).unwrap();

    let records = wal::read_all(&path).unwrap();
    assert_eq!(records, vec![(b"user:101".to_vec(), b"Alice".to_vec())]);
}

#[test]
fn appends_accumulate_in_order() {
    init_tracing();
    let dir = tempdir().unwrap();
    let path = dir.path().join("recovery.wal");

    let mut wal = Wal::open(&path).unwrap();
    wal.append(b"k1", b"v1", true).unwrap();
    wal.append(b"k2", b"v2", true).unwrap();
    wal.append(b"k1", b"v1-overwrite", true).unwrap();

    let records = wal::read_all(&path).unwrap();
    assert_eq!(
        records,
        vec![
            (b"k1".to_vec(), b"v1".to_vec()),
            (b"k2".to_vec(), b"v2".to_vec()),
            (b"k1".to_vec(), b"v1-overwrite".to_vec()),
        ]
    );
}

#[test]
fn non_durable_append_still_reaches_the_file_handle() {
    init_tracing();
    let dir = tempdir().unwrap();
    let path = dir.path().join("recovery.wal");

    let mut wal = Wal::open(&path).unwrap();
    wal.append(b"k", b"v", false).unwrap();
    drop(wal);

    let records = wal::read_all(&path).unwrap();
    assert_eq!(records, vec![(b"k".to_vec(), b"v".to_vec())]);
}

#[test]
fn non_durable_append_is_visible_to_a_second_handle_without_a_drop() {
    // A non-durable append still has to flush out of the `BufWriter`'s
    // user-space buffer so the bytes reach the OS page cache — otherwise
    // a process crash before `Wal` is dropped would lose the record, not
    // just a power loss. Read through an independent handle on the same
    // path, never dropping or closing `wal`, to prove the bytes left the
    // writer.
    init_tracing();
    let dir = tempdir().unwrap();
    let path = dir.path().join("recovery.wal");

    let mut wal = Wal::open(&path).unwrap();
    wal.append(b"k", b"v", false).unwrap();

    let records = wal::read_all(&path).unwrap();
    assert_eq!(records, vec![(b"k".to_vec(), b"v".to_vec())]);
}

#[test]
fn open_creates_file_if_absent() {
    init_tracing();
    let dir = tempdir().unwrap();
    let path = dir.path().join("recovery.wal");
    assert!(!path.exists());

    let _wal = Wal::open(&path).unwrap();
    assert!(path.exists());
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
}

#[test]
fn reopen_preserves_existing_contents() {
    init_tracing();
    let dir = tempdir().unwrap();
    let path = dir.path().join("recovery.wal");

    let mut wal = Wal::open(&path).unwrap();
    wal.append(b"k", b"v", true).unwrap();
    wal.close().unwrap();

    let mut wal = Wal::open(&path).unwrap();
    wal.append(b"k2", b"v2", true).unwrap();
    wal.close().unwrap();

    let records = wal::read_all(&path).unwrap();
    assert_eq!(
        records,
        vec![(b"k".to_vec(), b"v".to_vec()), (b"k2".to_vec(), b"v2".to_vec())]
    );
}
