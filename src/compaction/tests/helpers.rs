use crate::sstable::builder;
use tempfile::TempDir;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Writes `records` to a fresh segment file named `name` inside `dir` and
/// returns its path.
pub fn write_segment(dir: &TempDir, name: &str, records: &[(&[u8], &[u8])]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    builder::write(records.iter().copied(), &path).unwrap();
    path
}
