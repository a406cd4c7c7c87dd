//! Console and file logging.
//!
//! Commands and the engine talk to a [`Log`]; in production that is a
//! [`Logger`], which emits `tracing` events picked up by the subscriber from
//! [`init_subscriber`] and keeps the per-target results for the summary.

mod logger;
mod subscriber;
mod types;
mod utils;

pub use logger::Logger;
pub use subscriber::init_subscriber;
pub use types::{Log, TargetEntry, TargetStatus};

/// A [`Logger`] writing to `<tmp>/test.log` through a subscriber installed
/// for the current thread only.
///
/// Keep the returned guard alive for the whole test; dropping it restores
/// the previous thread-local dispatcher.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn isolated_logger() -> (Logger, tempfile::TempDir, tracing::dispatcher::DefaultGuard) {
    use tracing_subscriber::{Layer as _, filter::LevelFilter, layer::SubscriberExt as _};

    let tmp = tempfile::tempdir().expect("temp dir");
    let path = tmp.path().join("test.log");
    let file_layer = subscriber::FileLayer::open(&path, "test").expect("log file");
    let subscriber =
        tracing_subscriber::registry().with(file_layer.with_filter(LevelFilter::DEBUG));
    let guard = tracing::dispatcher::set_default(&tracing::Dispatch::new(subscriber));
    (Logger::with_log_file(Some(path)), tmp, guard)
}
