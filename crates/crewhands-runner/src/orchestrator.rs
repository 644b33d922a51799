//! Run orchestration: scrape, ingest, filter, apply, ledger, report.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crewhands_autofill::{BatchApplicationProcessor, FormAutoFiller};
use crewhands_browser::SessionGuard;
use crewhands_config::FilterConfig;
use crewhands_protocols::{
    ApplicationResult, CanonicalJob, IngestCounts, IngestOutcome, JobSink, NullSink, RunReport,
    SessionFactory, SessionOptions, Source,
};
use crewhands_scrapers::{scrape_site, ScrapeError, ScrapeOptions, SiteAdapter};

use crate::filter::filter_jobs;
use crate::ledger::AppliedLedger;
use crate::report::{build_report, write_report, RunTotals};

const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Everything the apply phase needs.
pub struct ApplyPlan {
    pub filler: FormAutoFiller,
    /// Opens the session applications are submitted from.
    pub factory: Arc<dyn SessionFactory>,
    pub max_applications: usize,
    /// Minimum delay between two applications.
    pub delay: Duration,
    pub custom_message: Option<String>,
}

/// What one run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// All scraped jobs, in adapter order.
    pub jobs: Vec<CanonicalJob>,
    /// Jobs that passed the filters and the ledger.
    pub filtered: Vec<CanonicalJob>,
    pub applications: Vec<ApplicationResult>,
    pub report: RunReport,
    /// Where the report was written, if writing succeeded.
    pub report_path: Option<PathBuf>,
}

/// Coordinates one full run over a set of site adapters.
///
/// Every phase isolates its own failures: a failing adapter yields no jobs
/// for its source, sink errors are counted, and ledger or report write
/// errors are logged. [`Orchestrator::run`] always returns an outcome.
pub struct Orchestrator {
    adapters: Vec<Box<dyn SiteAdapter>>,
    options: ScrapeOptions,
    run_timeout: Duration,
    sink: Arc<dyn JobSink>,
    filters: FilterConfig,
    ledger: AppliedLedger,
    report_dir: PathBuf,
    apply: Option<ApplyPlan>,
}

impl Orchestrator {
    /// Ledger and reports live in `data_dir`.
    pub fn new(adapters: Vec<Box<dyn SiteAdapter>>, data_dir: &Path) -> Self {
        Self {
            adapters,
            options: ScrapeOptions::default(),
            run_timeout: DEFAULT_RUN_TIMEOUT,
            sink: Arc::new(NullSink),
            filters: FilterConfig::default(),
            ledger: AppliedLedger::in_dir(data_dir),
            report_dir: data_dir.to_path_buf(),
            apply: None,
        }
    }

    pub fn with_options(mut self, options: ScrapeOptions) -> Self {
        self.options = options;
        self
    }

    /// Upper bound for the whole scrape phase.
    pub fn with_run_timeout(mut self, timeout: Duration) -> Self {
        self.run_timeout = timeout;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn JobSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_filters(mut self, filters: FilterConfig) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_apply(mut self, plan: ApplyPlan) -> Self {
        self.apply = Some(plan);
        self
    }

    pub fn sources(&self) -> Vec<Source> {
        self.adapters.iter().map(|a| a.source()).collect()
    }

    pub fn ledger(&self) -> &AppliedLedger {
        &self.ledger
    }

    pub async fn run(self) -> RunOutcome {
        info!("=== CrewHands run starting ===");
        let Orchestrator {
            adapters,
            options,
            run_timeout,
            sink,
            filters,
            ledger,
            report_dir,
            apply,
        } = self;

        let (jobs, failed_sources) = scrape_all(adapters, &options, run_timeout).await;
        info!("Total jobs scraped: {}", jobs.len());

        let ingest = ingest_all(sink.as_ref(), &jobs).await;

        let applied = match ledger.try_load().await {
            Ok(ids) => Some(ids),
            Err(e) => {
                error!("Applied jobs ledger unavailable: {}", e);
                None
            }
        };
        let unknown = BTreeSet::new();
        let filtered = filter_jobs(&jobs, &filters, applied.as_ref().unwrap_or(&unknown));

        let applications = match (apply, &applied) {
            (Some(plan), Some(_)) => apply_to(plan, &filtered).await,
            (Some(_), None) => {
                warn!("Skipping applications until the ledger is repaired");
                Vec::new()
            }
            (None, _) => Vec::new(),
        };

        let successful: Vec<String> = applications
            .iter()
            .filter(|r| r.is_success())
            .map(|r| r.job_id.clone())
            .collect();
        if !successful.is_empty() {
            if let Err(e) = ledger.merge(successful).await {
                error!("Failed to save applied jobs: {}", e);
            }
        }

        let totals = RunTotals {
            filtered_jobs: filtered.len(),
            ingest,
            failed_sources,
        };
        let report = build_report(&jobs, &applications, &totals, Utc::now());
        let report_path = match write_report(&report_dir, &report).await {
            Ok(path) => Some(path),
            Err(e) => {
                error!("Failed to write report: {}", e);
                None
            }
        };

        info!("=== CrewHands run complete ===");
        RunOutcome {
            jobs,
            filtered,
            applications,
            report,
            report_path,
        }
    }
}

/// One task per adapter, all bounded by `run_timeout`. Sources that fail or
/// do not finish in time contribute no jobs.
async fn scrape_all(
    adapters: Vec<Box<dyn SiteAdapter>>,
    options: &ScrapeOptions,
    run_timeout: Duration,
) -> (Vec<CanonicalJob>, Vec<Source>) {
    let sources: Vec<Source> = adapters.iter().map(|a| a.source()).collect();
    info!("Starting job scraping for {} sources", sources.len());

    let mut tasks = JoinSet::new();
    for (index, mut adapter) in adapters.into_iter().enumerate() {
        let options = options.clone();
        tasks.spawn(async move {
            let result = scrape_site(adapter.as_mut(), &options).await;
            (index, result)
        });
    }

    let mut results: Vec<Option<Result<Vec<CanonicalJob>, ScrapeError>>> =
        sources.iter().map(|_| None).collect();
    let collect = async {
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = Some(result),
                Err(e) => error!("Scrape task ended abnormally: {}", e),
            }
        }
    };
    if tokio::time::timeout(run_timeout, collect).await.is_err() {
        warn!("Scrape phase timed out after {:?}; aborting unfinished sources", run_timeout);
        tasks.abort_all();
        while tasks.join_next().await.is_some() {}
    }

    let mut jobs = Vec::new();
    let mut failed = Vec::new();
    for (source, result) in sources.into_iter().zip(results) {
        match result {
            Some(Ok(site_jobs)) => {
                info!("{}: {} jobs scraped", source, site_jobs.len());
                jobs.extend(site_jobs);
            }
            Some(Err(e)) => {
                error!("{} scraping failed: {}", source, e);
                failed.push(source);
            }
            None => {
                error!("{} scraping did not finish", source);
                failed.push(source);
            }
        }
    }
    (jobs, failed)
}

async fn ingest_all(sink: &dyn JobSink, jobs: &[CanonicalJob]) -> IngestCounts {
    let mut counts = IngestCounts::default();
    for job in jobs {
        match sink.ingest(job).await {
            IngestOutcome::Created => counts.created += 1,
            IngestOutcome::Duplicate => counts.duplicate += 1,
            IngestOutcome::Error(_) => counts.failed += 1,
        }
    }
    info!(
        sink = sink.name(),
        created = counts.created,
        duplicate = counts.duplicate,
        failed = counts.failed,
        "Ingest finished"
    );
    counts
}

async fn apply_to(plan: ApplyPlan, jobs: &[CanonicalJob]) -> Vec<ApplicationResult> {
    let head = &jobs[..jobs.len().min(plan.max_applications)];
    if head.is_empty() {
        info!("No jobs to apply for");
        return Vec::new();
    }
    info!("Applying to {} jobs", head.len());

    let page = match plan.factory.open(SessionOptions::default()).await {
        Ok(page) => page,
        Err(e) => {
            error!("Could not open a session for applications: {}", e);
            return Vec::new();
        }
    };
    let mut session = SessionGuard::new(page, "apply");
    let mut batch = BatchApplicationProcessor::new(plan.filler, plan.delay)
        .with_custom_message(plan.custom_message);
    batch.process(session.page(), head).await;
    session.close().await;

    let summary = batch.summary();
    info!(
        "Applications complete: {} successful, {} failed",
        summary.successful, summary.failed
    );
    summary.results
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
