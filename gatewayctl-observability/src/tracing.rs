use crate::file::{self, LogFileConfig};
use gatewayctl_common::{GatewayCtlError, Result};
use opentelemetry::global;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Initialization options for tracing
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub service_name: String,
    pub otlp_endpoint: Option<String>,
    /// Filter used when `RUST_LOG` is not set
    pub default_filter: String,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
    /// Also write logs to a rotated file
    pub log_file: Option<LogFileConfig>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            service_name: "gatewayctl".to_string(),
            otlp_endpoint: None,
            default_filter: "info".to_string(),
            json: false,
            log_file: None,
        }
    }
}

// Store the tracer provider for shutdown
static TRACER_PROVIDER: std::sync::OnceLock<SdkTracerProvider> = std::sync::OnceLock::new();

/// Initialize the tracing system with optional OTLP span export
///
/// Returns the file writer guard when file output is configured.
pub fn init_tracing(config: TracingConfig) -> Result<Option<WorkerGuard>> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // 1. Logging layer (Stdout/EnvFilter)
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let text_layer = (!config.json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_thread_ids(true)
            .with_target(true)
    });
    let json_layer = config.json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_thread_ids(true)
            .with_target(true)
    });

    let (file_writer, guard) = file::open(config.log_file.as_ref())?;
    let file_text_layer = file_writer.clone().filter(|_| !config.json).map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
            .with_target(true)
    });
    let file_json_layer = file_writer
        .filter(|_| config.json)
        .map(|w| tracing_subscriber::fmt::layer().json().with_writer(w));

    // 2. OpenTelemetry layer (if endpoint provided)
    let otel_layer = match config.otlp_endpoint {
        Some(endpoint) => {
            let exporter = SpanExporter::builder()
                .with_tonic()
                .with_endpoint(endpoint)
                .build()
                .map_err(|e| GatewayCtlError::Observability(e.to_string()))?;

            let resource = Resource::builder()
                .with_service_name(config.service_name)
                .build();

            let tracer_provider = SdkTracerProvider::builder()
                .with_resource(resource)
                .with_batch_exporter(exporter)
                .build();

            let tracer = tracer_provider.tracer("gatewayctl");

            // Store the provider for shutdown
            let _ = TRACER_PROVIDER.set(tracer_provider.clone());

            // Set as global provider
            global::set_tracer_provider(tracer_provider);

            Some(tracing_opentelemetry::layer().with_tracer(tracer))
        }
        None => None,
    };

    Registry::default()
        .with(env_filter)
        .with(text_layer)
        .with(json_layer)
        .with(file_text_layer)
        .with(file_json_layer)
        .with(otel_layer)
        .try_init()
        .map_err(|e| GatewayCtlError::Observability(e.to_string()))?;

    tracing::info!("Tracing infrastructure initialized");
    Ok(guard)
}

/// Shutdown the tracing system and flush spans
pub fn shutdown_tracing() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            tracing::error!("Failed to shutdown tracer provider: {}", e);
        }
    }
}
