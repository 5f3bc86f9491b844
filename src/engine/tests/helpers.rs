use crate::engine::EngineConfig;
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A config with a small threshold, handy for tests that want to observe
/// flushes without inserting thousands of keys.
pub fn config_with_threshold(memtable_threshold: usize) -> EngineConfig {
    EngineConfig { memtable_threshold, ..EngineConfig::default() }
}
