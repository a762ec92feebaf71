use std::io;

use tracing::Level;

/// Initialize a compact tracing subscriber writing to stderr at INFO level.
/// Safe to call multiple times; subsequent calls are no-ops for the global
/// subscriber.
///
/// The library itself never installs a subscriber; this is for binaries and
/// tests that want the crate's debug events visible.
pub fn init_default() {
    init_with_level(Level::INFO);
}

pub fn init_with_level(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_names(false)
        .try_init();
}
