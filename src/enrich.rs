use crate::app::ports::PageFetcher;
use crate::config::{EnrichmentConfig, SiteConfig};
use crate::error::{Result, ScraperError};
use crate::metrics::EnrichmentMetrics;
use crate::types::{Birthday, Operator};
use futures::future::join_all;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

/// Outcome counts for one enrichment pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentReport {
    pub attempted: usize,
    pub succeeded: usize,
    /// Names of operators whose birthday could not be fetched, in roster order
    pub failed: Vec<String>,
}

/// Visits every operator's profile page with a fixed pool of workers and
/// fills in `birthday`.
///
/// Workers claim indices from a shared cursor, so each record is attempted
/// exactly once and at most `workers` pages are open at a time. A failure
/// marks that one record as `Birthday::Failed` and the worker moves on.
pub struct EnrichmentScheduler {
    fetcher: Arc<dyn PageFetcher>,
    workers: NonZeroUsize,
    item_timeout: Duration,
    label_selector: String,
    label: String,
}

impl EnrichmentScheduler {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        workers: NonZeroUsize,
        item_timeout: Duration,
        label_selector: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            workers,
            item_timeout,
            label_selector: label_selector.into(),
            label: label.into(),
        }
    }

    pub fn from_config(
        fetcher: Arc<dyn PageFetcher>,
        enrichment: &EnrichmentConfig,
        site: &SiteConfig,
    ) -> Result<Self> {
        Ok(Self::new(
            fetcher,
            enrichment.workers()?,
            enrichment.item_timeout(),
            site.birthday_label_selector.as_str(),
            site.birthday_label.as_str(),
        ))
    }

    #[instrument(skip(self, operators), fields(count = operators.len(), workers = self.workers.get()))]
    pub async fn run(&self, operators: &mut [Operator]) -> EnrichmentReport {
        let total = operators.len();
        let cursor = AtomicUsize::new(0);
        let slots: Vec<OnceLock<Birthday>> = (0..total).map(|_| OnceLock::new()).collect();

        {
            let roster: &[Operator] = operators;
            let pool = self.workers.get().min(total);
            info!("Fetching birthdays for {} operators with {} workers", total, pool);

            join_all((0..pool).map(|worker| self.worker(worker, roster, &cursor, &slots))).await;
        }

        let mut report = EnrichmentReport {
            attempted: total,
            ..Default::default()
        };

        for (operator, slot) in operators.iter_mut().zip(slots) {
            // Every index below `total` is claimed by exactly one worker, so an
            // empty slot can only mean the worker was torn down mid-item.
            operator.birthday = slot.into_inner().unwrap_or(Birthday::Failed);
            match operator.birthday {
                Birthday::Known(_) => report.succeeded += 1,
                _ => report.failed.push(operator.name.clone()),
            }
        }

        info!(
            "Birthday lookup finished: {} found, {} failed",
            report.succeeded,
            report.failed.len()
        );
        report
    }

    async fn worker(&self, worker: usize, roster: &[Operator], cursor: &AtomicUsize, slots: &[OnceLock<Birthday>]) {
        let total = roster.len();
        loop {
            let index = cursor.fetch_add(1, Ordering::Relaxed);
            let Some(operator) = roster.get(index) else {
                break;
            };

            info!(
                "Fetching birthday info for {} [{} of {}]...",
                operator.name,
                index + 1,
                total
            );

            let started = Instant::now();
            let outcome = match self.fetch_birthday(&operator.profile_url).await {
                Ok(value) => {
                    EnrichmentMetrics::record_success(started.elapsed().as_secs_f64());
                    debug!(worker, "Birthday for {}: {}", operator.name, value);
                    Birthday::Known(value)
                }
                Err(e) => {
                    EnrichmentMetrics::record_failure(started.elapsed().as_secs_f64());
                    warn!(worker, error = %e, "Birthday for {} not obtained", operator.name);
                    Birthday::Failed
                }
            };

            if slots[index].set(outcome).is_err() {
                warn!(worker, "Birthday for index {} was already set", index);
            }
        }
        debug!(worker, "Worker drained the queue");
    }

    /// Opens the profile, reads the cell next to the label and releases the
    /// page on every path.
    async fn fetch_birthday(&self, url: &str) -> Result<String> {
        let session = timeout(self.item_timeout, self.fetcher.navigate(url))
            .await
            .map_err(|_| self.timed_out(url))??;
        EnrichmentMetrics::session_opened();

        let extracted = timeout(
            self.item_timeout,
            session.extract_sibling_text(&self.label_selector, &self.label),
        )
        .await;

        session.release().await;
        EnrichmentMetrics::session_released();

        extracted.map_err(|_| self.timed_out(url))?
    }

    fn timed_out(&self, url: &str) -> ScraperError {
        ScraperError::Timeout {
            url: url.to_string(),
            seconds: self.item_timeout.as_secs(),
        }
    }
}
