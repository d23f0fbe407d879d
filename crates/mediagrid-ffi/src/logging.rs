//! Process-wide logging setup.

use std::path::Path;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: OnceLock<Option<WorkerGuard>> = OnceLock::new();

/// Install a daily rolling file subscriber under `logs_dir`.
///
/// Only the first call has an effect. `RUST_LOG` overrides the default `info`
/// level. If another subscriber is already installed it is left in place.
pub fn init(logs_dir: &Path) {
    LOG_GUARD.get_or_init(|| {
        if let Err(e) = std::fs::create_dir_all(logs_dir) {
            eprintln!("mediagrid: cannot create log directory {:?}: {}", logs_dir, e);
            return None;
        }

        let file_appender = tracing_appender::rolling::daily(logs_dir, "mediagrid.log");
        let (writer, guard) = tracing_appender::non_blocking(file_appender);

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let installed = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(writer)
            .try_init()
            .is_ok();

        installed.then_some(guard)
    });
}
