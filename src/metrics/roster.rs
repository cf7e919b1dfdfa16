//! Roster phase metrics: the single listing-page load and the records it yields.

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct RosterMetrics;

impl RosterMetrics {
    pub fn record_success(operators: usize, duration_secs: f64) {
        ::metrics::counter!(phase_metric!(counter, "roster", "runs_success")).increment(1);
        ::metrics::gauge!(phase_metric!(gauge, "roster", "operators")).set(operators as f64);
        ::metrics::histogram!(phase_metric!(histogram, "roster", "duration_seconds")).record(duration_secs);
    }

    pub fn record_failure() {
        ::metrics::counter!(phase_metric!(counter, "roster", "runs_error")).increment(1);
    }
}

impl PhaseMetrics for RosterMetrics {
    fn register_metrics() {
        let _ = ::metrics::counter!(phase_metric!(counter, "roster", "runs_success"));
        let _ = ::metrics::counter!(phase_metric!(counter, "roster", "runs_error"));
        let _ = ::metrics::gauge!(phase_metric!(gauge, "roster", "operators"));
        let _ = ::metrics::histogram!(phase_metric!(histogram, "roster", "duration_seconds"));
    }

    fn phase_name() -> &'static str {
        "roster"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "roster", "runs_success"),
                metric_type: MetricType::Counter,
                help: "Listing pages collected without error",
            },
            MetricDoc {
                name: phase_metric!(counter, "roster", "runs_error"),
                metric_type: MetricType::Counter,
                help: "Listing collections aborted",
            },
            MetricDoc {
                name: phase_metric!(gauge, "roster", "operators"),
                metric_type: MetricType::Gauge,
                help: "Operators found on the listing page",
            },
            MetricDoc {
                name: phase_metric!(histogram, "roster", "duration_seconds"),
                metric_type: MetricType::Histogram,
                help: "Time spent loading and extracting the listing",
            },
        ]
    }
}
