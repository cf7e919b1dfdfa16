//! Registers every phase's metrics at startup and flags name collisions.

use crate::metrics::{EnrichmentMetrics, ExportMetrics, MetricDoc, PhaseMetrics, RosterMetrics};
use std::collections::HashMap;
use tracing::{debug, warn};

pub fn register_all_metrics() {
    let mut all_metrics = HashMap::new();

    register_phase_metrics::<RosterMetrics>(&mut all_metrics);
    register_phase_metrics::<EnrichmentMetrics>(&mut all_metrics);
    register_phase_metrics::<ExportMetrics>(&mut all_metrics);

    debug!("Registered {} metrics across all phases", all_metrics.len());
}

fn register_phase_metrics<T: PhaseMetrics>(all_metrics: &mut HashMap<&'static str, MetricDoc>) {
    T::register_metrics();
    let phase_name = T::phase_name();

    for doc in T::metrics_documentation() {
        if extract_phase_from_metric_name(doc.name) != phase_name {
            warn!("Metric '{}' is documented under phase '{}'", doc.name, phase_name);
        }
        if all_metrics.contains_key(doc.name) {
            warn!("Metric name conflict: '{}' registered twice (phase '{}')", doc.name, phase_name);
        } else {
            all_metrics.insert(doc.name, doc);
        }
    }
}

/// "ak_roster_runs_success_total" -> "roster"
fn extract_phase_from_metric_name(metric_name: &str) -> &str {
    metric_name
        .strip_prefix("ak_")
        .and_then(|rest| rest.split('_').next())
        .unwrap_or("unknown")
}
