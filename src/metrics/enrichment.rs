//! Enrichment phase metrics
//!
//! Per-profile outcomes and timings, plus the number of sessions open at any
//! moment.

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct EnrichmentMetrics;

impl EnrichmentMetrics {
    pub fn record_success(duration_secs: f64) {
        ::metrics::counter!(phase_metric!(counter, "enrichment", "profiles_success")).increment(1);
        ::metrics::histogram!(phase_metric!(histogram, "enrichment", "profile_duration_seconds"))
            .record(duration_secs);
    }

    pub fn record_failure(duration_secs: f64) {
        ::metrics::counter!(phase_metric!(counter, "enrichment", "profiles_error")).increment(1);
        ::metrics::histogram!(phase_metric!(histogram, "enrichment", "profile_duration_seconds"))
            .record(duration_secs);
    }

    pub fn session_opened() {
        ::metrics::gauge!(phase_metric!(gauge, "enrichment", "open_sessions")).increment(1.0);
    }

    pub fn session_released() {
        ::metrics::gauge!(phase_metric!(gauge, "enrichment", "open_sessions")).decrement(1.0);
    }
}

impl PhaseMetrics for EnrichmentMetrics {
    fn register_metrics() {
        let _ = ::metrics::counter!(phase_metric!(counter, "enrichment", "profiles_success"));
        let _ = ::metrics::counter!(phase_metric!(counter, "enrichment", "profiles_error"));
        let _ = ::metrics::histogram!(phase_metric!(histogram, "enrichment", "profile_duration_seconds"));
        let _ = ::metrics::gauge!(phase_metric!(gauge, "enrichment", "open_sessions"));
    }

    fn phase_name() -> &'static str {
        "enrichment"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "enrichment", "profiles_success"),
                metric_type: MetricType::Counter,
                help: "Profiles where a birthday was found",
            },
            MetricDoc {
                name: phase_metric!(counter, "enrichment", "profiles_error"),
                metric_type: MetricType::Counter,
                help: "Profiles that failed to load or had no birthday",
            },
            MetricDoc {
                name: phase_metric!(histogram, "enrichment", "profile_duration_seconds"),
                metric_type: MetricType::Histogram,
                help: "Time per profile, navigation through release",
            },
            MetricDoc {
                name: phase_metric!(gauge, "enrichment", "open_sessions"),
                metric_type: MetricType::Gauge,
                help: "Profile pages currently open",
            },
        ]
    }
}
