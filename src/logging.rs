use std::fs;
use std::io;
use std::path::Path;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "ak_birthdays.log";

/// Initializes the logging system with both console and file output.
///
/// The returned guard flushes the file writer when dropped, so keep it alive
/// until the run ends.
pub fn init_logging() -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ak_birthdays=info"));
    let (subscriber, guard, dir_error) = build_subscriber(filter, Path::new(LOG_DIR));
    subscriber.init();

    if let Some(e) = dir_error {
        tracing::warn!("Could not create {}/: {}; logging to console only", LOG_DIR, e);
    }

    guard
}

/// Console layer plus a daily JSON file under `log_dir`. File logging is
/// best-effort; a read-only working dir still gets console logs.
fn build_subscriber(
    filter: EnvFilter,
    log_dir: &Path,
) -> (impl Subscriber + Send + Sync + 'static, Option<WorkerGuard>, Option<io::Error>) {
    let console_layer = fmt::layer().with_writer(io::stdout);

    let (file_layer, guard, dir_error) = match fs::create_dir_all(log_dir) {
        Ok(()) => {
            let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE);
            let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer().json().with_writer(non_blocking_writer);
            (Some(layer), Some(guard), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer);
    (subscriber, guard, dir_error)
}
