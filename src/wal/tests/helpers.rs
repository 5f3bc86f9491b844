use tracing_subscriber::EnvFilter;

/// Installs a tracing subscriber controlled by `RUST_LOG`. Safe to call
/// repeatedly — only the first call takes effect.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
