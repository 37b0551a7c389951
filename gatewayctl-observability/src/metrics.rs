//! Prometheus metrics for the registration workflow.
//!
//! Recording is a no-op until [`init_metrics`] has been called, so library
//! code can record unconditionally.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::{LazyLock, OnceLock};
use std::time::Duration;

/// Process-wide metrics registry
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static METRICS: OnceLock<GatewayCtlMetrics> = OnceLock::new();

/// Result label attached to workflow counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    GatewayError,
    CatalogError,
    BadRequest,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::GatewayError => "gateway_error",
            Outcome::CatalogError => "catalog_error",
            Outcome::BadRequest => "bad_request",
        }
    }
}

/// Metric handles for plugin registration
pub struct GatewayCtlMetrics {
    registrations: IntCounterVec,
    unregistrations: IntCounterVec,
    gateway_request_duration: HistogramVec,
}

impl GatewayCtlMetrics {
    fn new(registry: &Registry) -> Self {
        let registrations = IntCounterVec::new(
            Opts::new(
                "gatewayctl_registrations_total",
                "Plugin registrations by outcome",
            ),
            &["outcome"],
        )
        .unwrap();
        let unregistrations = IntCounterVec::new(
            Opts::new(
                "gatewayctl_unregistrations_total",
                "Plugin unregistrations by outcome",
            ),
            &["outcome"],
        )
        .unwrap();
        let gateway_request_duration = HistogramVec::new(
            HistogramOpts::new(
                "gatewayctl_gateway_request_duration_seconds",
                "Latency of gateway admin API calls",
            ),
            &["method"],
        )
        .unwrap();

        registry.register(Box::new(registrations.clone())).unwrap();
        registry.register(Box::new(unregistrations.clone())).unwrap();
        registry
            .register(Box::new(gateway_request_duration.clone()))
            .unwrap();

        Self {
            registrations,
            unregistrations,
            gateway_request_duration,
        }
    }

    pub fn record_registration(&self, outcome: Outcome) {
        self.registrations
            .with_label_values(&[outcome.as_str()])
            .inc();
    }

    pub fn record_unregistration(&self, outcome: Outcome) {
        self.unregistrations
            .with_label_values(&[outcome.as_str()])
            .inc();
    }

    pub fn observe_gateway_request(&self, method: &str, elapsed: Duration) {
        self.gateway_request_duration
            .with_label_values(&[method])
            .observe(elapsed.as_secs_f64());
    }
}

/// Register the metric families. Safe to call more than once.
pub fn init_metrics() -> &'static GatewayCtlMetrics {
    METRICS.get_or_init(|| GatewayCtlMetrics::new(&REGISTRY))
}

pub fn metrics_enabled() -> bool {
    METRICS.get().is_some()
}

/// Metric handles, if [`init_metrics`] has run.
pub fn gatewayctl_metrics() -> Option<&'static GatewayCtlMetrics> {
    METRICS.get()
}

/// Render all registered metrics in the Prometheus text format.
pub fn gather_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let families = REGISTRY.gather();
    if let Err(e) = encoder.encode(&families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
