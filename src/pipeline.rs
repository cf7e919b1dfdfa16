use crate::app::ports::PageFetcher;
use crate::config::Config;
use crate::enrich::{EnrichmentReport, EnrichmentScheduler};
use crate::error::Result;
use crate::export::CsvExporter;
use crate::metrics::RosterMetrics;
use crate::roster::RosterCollector;
use crate::types::Operator;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// Result of a complete pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineResult {
    pub total_operators: usize,
    pub birthdays_found: usize,
    pub failed_operators: Vec<String>,
    pub output_file: String,
}

/// Runs roster collection, enrichment and export in order. Each phase
/// finishes completely before the next one starts.
pub struct Pipeline {
    config: Config,
    fetcher: Arc<dyn PageFetcher>,
}

impl Pipeline {
    pub fn new(config: Config, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { config, fetcher }
    }

    #[instrument(skip(self), fields(listing = %self.config.site.listing_url))]
    pub async fn run(&self) -> Result<PipelineResult> {
        // Validate up front so a bad worker count fails before any page loads
        self.config.validate()?;
        let scheduler = EnrichmentScheduler::from_config(
            self.fetcher.clone(),
            &self.config.enrichment,
            &self.config.site,
        )?;

        // Step 1: roster
        info!("📡 Step 1: collecting operator roster");
        let mut operators = self.collect_roster().await?;

        // Step 2: birthdays
        info!("🔧 Step 2: fetching birthdays");
        let report = scheduler.run(&mut operators).await;
        for op in &operators {
            debug!("Operator: {}, Birthday: {}, Icon Path: {}", op.name, op.birthday, op.icon_url);
        }
        if !report.failed.is_empty() {
            warn!(
                "{} operators have no birthday: {}",
                report.failed.len(),
                report.failed.join(", ")
            );
        }

        // Step 3: export
        info!("💾 Step 3: exporting");
        let path = &self.config.output.path;
        CsvExporter::new().export(path, &operators)?;

        Ok(Self::summarize(&operators, report, path.display().to_string()))
    }

    async fn collect_roster(&self) -> Result<Vec<Operator>> {
        let started = Instant::now();
        let collector = RosterCollector::new(self.fetcher.clone(), self.config.site.clone());

        match collector.collect().await {
            Ok(operators) => {
                RosterMetrics::record_success(operators.len(), started.elapsed().as_secs_f64());
                info!("✅ Collected {} operators", operators.len());
                Ok(operators)
            }
            Err(e) => {
                RosterMetrics::record_failure();
                error!("Roster collection failed: {}", e);
                Err(e)
            }
        }
    }

    fn summarize(operators: &[Operator], report: EnrichmentReport, output_file: String) -> PipelineResult {
        PipelineResult {
            total_operators: operators.len(),
            birthdays_found: report.succeeded,
            failed_operators: report.failed,
            output_file,
        }
    }
}
