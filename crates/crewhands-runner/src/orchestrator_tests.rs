use super::*;

use async_trait::async_trait;
use std::sync::Mutex;

use crewhands_autofill::FormAutoFiller;
use crewhands_protocols::page::fake::{FakePage, FakeSessionFactory};
use crewhands_protocols::{RawRecord, SubmitOutcome};
use crewhands_scrapers::{BoardAdapter, SearchFilters, SessionState, SiteDefinition};
use crewhands_throttle::{RateLimiter, RateLimiterConfig};

use crate::testing::profile;

const JOB_FORM: &str = r#"<html><body><form>
    <input name="first_name"><input name="last_name">
    <input type="email" name="email"><input name="phone">
    <textarea name="message"></textarea>
    <button type="submit">Apply</button>
</form></body></html>"#;

fn board_pages() -> FakePage {
    FakePage::new()
        .route(
            "https://www.yotspot.com/jobs",
            r#"<div class="job-card">
                 <h2 class="job-title">Chef for 60m motor yacht</h2>
                 <a href="/job/1">View</a>
               </div>
               <div class="job-card">
                 <h2 class="job-title">Deckhand</h2>
                 <a href="/job/2">View</a>
               </div>
               <div class="job-card">
                 <h2 class="job-title">Sous Chef</h2>
                 <a href="/job/3">View</a>
               </div>"#,
        )
        .route("https://www.yotspot.com/job/", JOB_FORM)
}

fn limiter() -> Arc<RateLimiter> {
    Arc::new(
        RateLimiter::new(RateLimiterConfig {
            requests_per_minute: 6000,
            burst_size: 50,
        })
        .unwrap(),
    )
}

fn yotspot(factory: &FakeSessionFactory) -> Box<dyn SiteAdapter> {
    Box::new(
        BoardAdapter::new(SiteDefinition::yotspot(), Arc::new(factory.clone()), limiter())
            .with_settle(Duration::ZERO),
    )
}

fn yacrew_unreachable() -> Box<dyn SiteAdapter> {
    Box::new(
        BoardAdapter::new(
            SiteDefinition::yacrew(),
            Arc::new(FakeSessionFactory::failing()),
            limiter(),
        )
        .with_settle(Duration::ZERO),
    )
}

fn options() -> ScrapeOptions {
    ScrapeOptions {
        page_delay: Duration::ZERO,
        ..Default::default()
    }
}

fn apply_plan(factory: Arc<dyn SessionFactory>, max_applications: usize) -> ApplyPlan {
    ApplyPlan {
        filler: FormAutoFiller::new(Arc::new(profile())).with_submit_wait(Duration::ZERO),
        factory,
        max_applications,
        delay: Duration::ZERO,
        custom_message: None,
    }
}

/// Adapter that never finishes collecting.
struct HangingAdapter;

#[async_trait]
impl SiteAdapter for HangingAdapter {
    fn source(&self) -> Source {
        Source::YaCrew
    }

    fn state(&self) -> SessionState {
        SessionState::Idle
    }

    fn max_iterations(&self) -> u32 {
        1
    }

    async fn initialize(&mut self) -> Result<(), ScrapeError> {
        Ok(())
    }

    async fn login(&mut self) -> bool {
        false
    }

    async fn search(&mut self, _filters: &SearchFilters) -> Result<(), ScrapeError> {
        std::future::pending().await
    }

    async fn collect_page(&mut self) -> Result<Vec<RawRecord>, ScrapeError> {
        Ok(Vec::new())
    }

    async fn advance(&mut self) -> Result<bool, ScrapeError> {
        Ok(false)
    }

    async fn fetch_details(&mut self, _url: &str) -> Result<RawRecord, ScrapeError> {
        Ok(RawRecord::default())
    }

    fn mark_saved(&mut self) -> Result<(), ScrapeError> {
        Ok(())
    }

    fn mark_failed(&mut self) {}

    async fn close(&mut self) {}
}

/// Records every job it is handed. The second is reported as known and
/// the third as rejected.
#[derive(Default)]
struct RecordingSink {
    seen: Mutex<Vec<String>>,
}

#[async_trait]
impl JobSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    async fn ingest(&self, job: &CanonicalJob) -> IngestOutcome {
        let mut seen = self.seen.lock().unwrap();
        seen.push(job.id.clone());
        match seen.len() {
            2 => IngestOutcome::Duplicate,
            3 => IngestOutcome::Error("rejected".to_string()),
            _ => IngestOutcome::Created,
        }
    }
}

#[tokio::test]
async fn test_failed_source_does_not_stop_run() {
    let dir = tempfile::tempdir().unwrap();
    let factory = FakeSessionFactory::new(board_pages());

    let outcome = Orchestrator::new(vec![yotspot(&factory), yacrew_unreachable()], dir.path())
        .with_options(options())
        .run()
        .await;

    assert_eq!(outcome.jobs.len(), 3);
    assert!(outcome.jobs.iter().all(|j| j.source == Source::Yotspot));
    assert_eq!(outcome.report.failed_sources, vec!["yacrew".to_string()]);
    assert_eq!(outcome.report.total_jobs, 3);
    assert_eq!(outcome.report.by_source.get("yotspot"), Some(&3));
    assert_eq!(outcome.report.by_source.get("yacrew"), Some(&0));
    assert!(outcome.applications.is_empty());

    let path = outcome.report_path.unwrap();
    assert!(path.starts_with(dir.path()));
    let written: RunReport =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(written.total_jobs, 3);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_keeps_finished_sources() {
    let dir = tempfile::tempdir().unwrap();
    let factory = FakeSessionFactory::new(board_pages());

    let outcome = Orchestrator::new(vec![yotspot(&factory), Box::new(HangingAdapter)], dir.path())
        .with_options(options())
        .with_run_timeout(Duration::from_secs(60))
        .run()
        .await;

    assert_eq!(outcome.jobs.len(), 3);
    assert_eq!(outcome.report.failed_sources, vec!["yacrew".to_string()]);
}

#[tokio::test]
async fn test_sink_outcomes_are_counted() {
    let dir = tempfile::tempdir().unwrap();
    let factory = FakeSessionFactory::new(board_pages());
    let sink = Arc::new(RecordingSink::default());

    let outcome = Orchestrator::new(vec![yotspot(&factory)], dir.path())
        .with_options(options())
        .with_sink(sink.clone())
        .run()
        .await;

    assert_eq!(sink.seen.lock().unwrap().len(), 3);
    assert_eq!(outcome.report.ingest.created, 1);
    assert_eq!(outcome.report.ingest.duplicate, 1);
    assert_eq!(outcome.report.ingest.failed, 1);
}

#[tokio::test]
async fn test_filters_and_application_cap() {
    let dir = tempfile::tempdir().unwrap();
    let factory = FakeSessionFactory::new(board_pages());
    let filters = FilterConfig {
        roles: vec!["chef".to_string()],
        ..Default::default()
    };

    let outcome = Orchestrator::new(vec![yotspot(&factory)], dir.path())
        .with_options(options())
        .with_filters(filters)
        .with_apply(apply_plan(Arc::new(factory.clone()), 1))
        .run()
        .await;

    let filtered: Vec<&str> = outcome.filtered.iter().map(|j| j.title.as_str()).collect();
    assert_eq!(filtered, vec!["Chef for 60m motor yacht", "Sous Chef"]);
    assert_eq!(outcome.report.filtered_jobs, 2);

    assert_eq!(outcome.applications.len(), 1);
    assert_eq!(outcome.applications[0].job_title, "Chef for 60m motor yacht");
    assert_eq!(outcome.applications[0].outcome, SubmitOutcome::LikelySubmitted);
    assert_eq!(outcome.report.applications.successful, 1);
}

#[tokio::test]
async fn test_ledger_excludes_applied_jobs_next_run() {
    let dir = tempfile::tempdir().unwrap();
    let factory = FakeSessionFactory::new(board_pages());

    let first = Orchestrator::new(vec![yotspot(&factory)], dir.path())
        .with_options(options())
        .with_apply(apply_plan(Arc::new(factory.clone()), 2))
        .run()
        .await;
    assert_eq!(first.applications.len(), 2);

    let applied = AppliedLedger::in_dir(dir.path()).load().await;
    assert_eq!(applied.len(), 2);
    assert!(applied.contains(&first.jobs[0].id));
    assert!(applied.contains(&first.jobs[1].id));

    let second = Orchestrator::new(vec![yotspot(&factory)], dir.path())
        .with_options(options())
        .with_apply(apply_plan(Arc::new(factory.clone()), 2))
        .run()
        .await;
    assert_eq!(second.filtered.len(), 1);
    assert_eq!(second.filtered[0].id, first.jobs[2].id);
    assert_eq!(second.applications.len(), 1);
    assert_eq!(AppliedLedger::in_dir(dir.path()).load().await.len(), 3);
}

#[tokio::test]
async fn test_unavailable_apply_session_yields_no_applications() {
    let dir = tempfile::tempdir().unwrap();
    let factory = FakeSessionFactory::new(board_pages());

    let outcome = Orchestrator::new(vec![yotspot(&factory)], dir.path())
        .with_options(options())
        .with_apply(apply_plan(Arc::new(FakeSessionFactory::failing()), 5))
        .run()
        .await;

    assert_eq!(outcome.jobs.len(), 3);
    assert!(outcome.applications.is_empty());
    assert!(AppliedLedger::in_dir(dir.path()).load().await.is_empty());
    assert!(outcome.report_path.is_some());
}

#[tokio::test]
async fn test_unreadable_ledger_blocks_applications() {
    let dir = tempfile::tempdir().unwrap();
    let factory = FakeSessionFactory::new(board_pages());
    let ledger = AppliedLedger::in_dir(dir.path());
    let truncated = r#"["job-a","job-b""#;
    std::fs::write(ledger.path(), truncated).unwrap();

    let outcome = Orchestrator::new(vec![yotspot(&factory)], dir.path())
        .with_options(options())
        .with_apply(apply_plan(Arc::new(factory.clone()), 5))
        .run()
        .await;

    assert_eq!(outcome.jobs.len(), 3);
    assert_eq!(outcome.filtered.len(), 3);
    assert!(outcome.applications.is_empty());
    assert_eq!(std::fs::read_to_string(ledger.path()).unwrap(), truncated);
    assert!(outcome.report_path.is_some());
}
