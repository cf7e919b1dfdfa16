//! Metrics for the scrape run
//!
//! Each phase (roster, enrichment, export) owns a submodule that defines its
//! metric names and recording helpers. Names follow `ak_{phase}_{name}`.

pub mod enrichment;
pub mod export;
pub mod registry;
pub mod roster;

pub use enrichment::EnrichmentMetrics;
pub use export::ExportMetrics;
pub use roster::RosterMetrics;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::{Once, OnceLock};
use tracing::{debug, info, warn};

static INIT: Once = Once::new();
static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the global metrics recorder
///
/// Idempotent. With `PROMETHEUS_ADDR` set, a Prometheus HTTP listener is
/// started for the lifetime of the run. Otherwise an in-process recorder is
/// installed and its snapshot can be logged with [`log_snapshot`].
///
/// Must be called from within a tokio runtime.
pub fn init_metrics() {
    INIT.call_once(|| {
        let builder = PrometheusBuilder::new();

        match std::env::var("PROMETHEUS_ADDR").ok().map(|s| s.parse::<std::net::SocketAddr>()) {
            Some(Ok(addr)) => match builder.with_http_listener(addr).install() {
                Ok(()) => info!("Prometheus HTTP exporter started at http://{}/metrics", addr),
                Err(e) => warn!("Failed to start Prometheus exporter: {}", e),
            },
            Some(Err(e)) => {
                warn!("Invalid PROMETHEUS_ADDR ({}), keeping metrics in-process", e);
                install_in_process(builder);
            }
            None => install_in_process(builder),
        }

        registry::register_all_metrics();
    });
}

fn install_in_process(builder: PrometheusBuilder) {
    match builder.install_recorder() {
        Ok(handle) => {
            if HANDLE.set(handle).is_err() {
                warn!("Metrics handle was already set");
            }
        }
        Err(e) => warn!("Failed to install Prometheus recorder: {}", e),
    }
}

/// Dump the in-process metrics snapshot at debug level
pub fn log_snapshot() {
    if let Some(handle) = HANDLE.get() {
        debug!("Metrics snapshot:\n{}", handle.render());
    }
}

/// Trait for phase-specific metrics collections
pub trait PhaseMetrics {
    /// Register all metrics for this phase so they show up before first use
    fn register_metrics();

    fn phase_name() -> &'static str;

    fn metrics_documentation() -> Vec<MetricDoc>;
}

/// Documentation for a single metric
#[derive(Debug, Clone)]
pub struct MetricDoc {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub help: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Histogram,
    Gauge,
}

/// Builds a metric name following the `ak_{phase}_{metric_name}` convention;
/// counters get a `_total` suffix.
macro_rules! phase_metric {
    (counter, $phase:literal, $name:literal) => {
        concat!("ak_", $phase, "_", $name, "_total")
    };
    (histogram, $phase:literal, $name:literal) => {
        concat!("ak_", $phase, "_", $name)
    };
    (gauge, $phase:literal, $name:literal) => {
        concat!("ak_", $phase, "_", $name)
    };
}

pub(crate) use phase_metric;
