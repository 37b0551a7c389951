pub mod file;
pub mod metrics;
pub mod tracing;

pub use file::{file_writer, LogFileConfig};
pub use metrics::{
    gather_metrics, gatewayctl_metrics, init_metrics, metrics_enabled, GatewayCtlMetrics,
    Outcome, REGISTRY,
};
pub use tracing::{init_tracing, shutdown_tracing, TracingConfig};
pub use tracing_appender::non_blocking::WorkerGuard;

use gatewayctl_common::Result;

/// Basic initialization for minimal overhead
///
/// The returned guard flushes the log file on drop; keep it for the
/// lifetime of the process.
pub fn init_basic_observability(
    config: TracingConfig,
    enable_tracing: bool,
    enable_metrics: bool,
) -> Result<Option<WorkerGuard>> {
    if enable_metrics {
        init_metrics();
    }

    if enable_tracing {
        init_tracing(config)
    } else {
        init_minimal_logging(&config)
    }
}

/// Minimal logging setup without metrics or OpenTelemetry infrastructure
///
/// `RUST_LOG` takes precedence over `config.default_filter`.
pub fn init_minimal_logging(config: &TracingConfig) -> Result<Option<WorkerGuard>> {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let json = config.json;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));
    let (file_writer, guard) = file::open(config.log_file.as_ref())?;

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_target(false)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_target(false)))
        .with(file_writer.clone().filter(|_| json).map(|w| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(false)
                .with_writer(w)
        }))
        .with(file_writer.filter(|_| !json).map(|w| {
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(w)
        }))
        .try_init();
    Ok(guard)
}
