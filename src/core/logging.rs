use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use super::paths::AppPaths;

/// Wire up stdout plus a daily-rolling file under the data dir's `logs/`.
///
/// Returns the appender guard; dropping it stops the background writer and
/// loses buffered lines, so the caller holds it for the process lifetime.
pub fn init(paths: &AppPaths) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(&paths.log_dir, "neusearch.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    // sqlx logs every statement at info; keep the default noise down.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_target(false),
        )
        .init();

    guard
}
