use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct ExportMetrics;

impl ExportMetrics {
    pub fn record_written(rows: usize, bytes: usize) {
        ::metrics::counter!(phase_metric!(counter, "export", "rows")).increment(rows as u64);
        ::metrics::histogram!(phase_metric!(histogram, "export", "file_bytes")).record(bytes as f64);
    }

    pub fn record_error() {
        ::metrics::counter!(phase_metric!(counter, "export", "write_errors")).increment(1);
    }
}

impl PhaseMetrics for ExportMetrics {
    fn register_metrics() {
        let _ = ::metrics::counter!(phase_metric!(counter, "export", "rows"));
        let _ = ::metrics::counter!(phase_metric!(counter, "export", "write_errors"));
        let _ = ::metrics::histogram!(phase_metric!(histogram, "export", "file_bytes"));
    }

    fn phase_name() -> &'static str {
        "export"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "export", "rows"),
                metric_type: MetricType::Counter,
                help: "Operator rows written (header excluded)",
            },
            MetricDoc {
                name: phase_metric!(counter, "export", "write_errors"),
                metric_type: MetricType::Counter,
                help: "Failed export writes",
            },
            MetricDoc {
                name: phase_metric!(histogram, "export", "file_bytes"),
                metric_type: MetricType::Histogram,
                help: "Size of the written file",
            },
        ]
    }
}
