use super::*;

use std::sync::Arc;

use crewhands_protocols::page::fake::{FakePage, FakeSessionFactory};
use crewhands_protocols::{PageError, Role, Source};
use crewhands_throttle::{RateLimiter, RateLimiterConfig};

use crate::adapter::BoardAdapter;
use crate::site::SiteDefinition;
use crate::state::SessionState;

fn board(site: SiteDefinition, factory: &FakeSessionFactory) -> BoardAdapter {
    let limiter = RateLimiter::new(RateLimiterConfig {
        requests_per_minute: 6000,
        burst_size: 50,
    })
    .unwrap();
    BoardAdapter::new(site, Arc::new(factory.clone()), Arc::new(limiter))
        .with_settle(Duration::ZERO)
}

fn options() -> ScrapeOptions {
    ScrapeOptions {
        page_delay: Duration::ZERO,
        ..Default::default()
    }
}

fn yotspot_pages() -> FakePage {
    FakePage::new()
        .route(
            "https://www.yotspot.com/jobs",
            r#"<div class="job-card">
                 <h2 class="job-title">Captain needed for 50m yacht</h2>
                 <span class="location">Antibes, France</span>
                 <a href="/job/1">View</a>
               </div>
               <div class="job-card">
                 <h2 class="job-title">Chef position available</h2>
                 <a href="/job/2">View</a>
               </div>
               <div class="pagination"><a class="next" href="/jobs?page=2">Next</a></div>"#,
        )
        .route(
            "https://www.yotspot.com/jobs?page=2",
            r#"<div class="job-card">
                 <h2 class="job-title">Deckhand</h2>
                 <a href="/job/3">View</a>
               </div>
               <div class="job-card">
                 <h2 class="job-title">Chef position available</h2>
                 <a href="/job/2">View</a>
               </div>
               <div class="pagination"><a class="next disabled">Next</a></div>"#,
        )
}

#[tokio::test]
async fn test_scrape_next_control_site() {
    let dir = tempfile::tempdir().unwrap();
    let factory = FakeSessionFactory::new(yotspot_pages());
    let mut adapter = board(SiteDefinition::yotspot(), &factory);
    let options = ScrapeOptions {
        output_dir: Some(dir.path().to_path_buf()),
        ..options()
    };

    let jobs = scrape_site(&mut adapter, &options).await.unwrap();

    // The repeated listing on page two is dropped.
    let titles: Vec<&str> = jobs.iter().map(|j| j.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Captain needed for 50m yacht", "Chef position available", "Deckhand"]
    );
    assert_eq!(jobs[0].role, Role::Captain);
    assert_eq!(jobs[1].role, Role::Chef);
    assert!(jobs.iter().all(|j| j.source == Source::Yotspot));

    let dumped = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(dumped, 1);

    let page = &factory.opened()[0].1;
    assert!(page.is_closed());
    assert_eq!(adapter.state(), SessionState::Closed);
}

#[tokio::test]
async fn test_scrape_scroll_site() {
    let card = |n: usize| {
        format!(r#"<div class="listing-item"><h2>Stewardess {n}</h2><a href="/jobs/{n}">View</a></div>"#)
    };
    let step = |cards: usize| {
        let body: String = (1..=cards).map(card).collect();
        format!("<html><body>{}</body></html>", body)
    };
    let page = FakePage::new().route_steps("https://www.yacrew.com/jobs", vec![step(2), step(4), step(5)]);
    let factory = FakeSessionFactory::new(page);
    let mut adapter = board(SiteDefinition::yacrew(), &factory);

    let jobs = scrape_site(&mut adapter, &options()).await.unwrap();
    assert_eq!(jobs.len(), 5);
    assert!(jobs.iter().all(|j| j.role == Role::StewardStewardess));
}

#[tokio::test]
async fn test_scroll_stops_at_iteration_limit() {
    let steps: Vec<String> = (1..=20)
        .map(|n| {
            let body: String = (1..=n)
                .map(|i| format!(r#"<div class="job-item"><h2>Bosun {i}</h2><a href="/jobs/{i}">x</a></div>"#))
                .collect();
            format!("<html><body>{}</body></html>", body)
        })
        .collect();
    let page = FakePage::new().route_steps("https://www.yacrew.com/jobs", steps);
    let factory = FakeSessionFactory::new(page);
    let mut site = SiteDefinition::yacrew();
    site.max_iterations = 3;
    let mut adapter = board(site, &factory);

    let jobs = scrape_site(&mut adapter, &options()).await.unwrap();
    // Infinite growth is cut off after three extractions.
    assert_eq!(jobs.len(), 3);
}

#[tokio::test]
async fn test_initialize_failure_closes_adapter() {
    let factory = FakeSessionFactory::failing();
    let mut adapter = board(SiteDefinition::yacrew(), &factory);

    let err = scrape_site(&mut adapter, &options()).await.unwrap_err();
    assert!(matches!(err, ScrapeError::SessionUnavailable(_)));
    assert_eq!(adapter.state(), SessionState::Closed);
}

#[tokio::test(start_paused = true)]
async fn test_search_retried_then_fails() {
    let page = FakePage::new().fail_route("https://www.yotspot.com/jobs");
    let factory = FakeSessionFactory::new(page);
    let mut adapter = board(SiteDefinition::yotspot(), &factory);

    let err = scrape_site(&mut adapter, &options()).await.unwrap_err();
    assert!(matches!(err, ScrapeError::Page(PageError::Navigation(_))));

    let page = &factory.opened()[0].1;
    assert_eq!(page.visited().len(), 3);
    assert!(page.is_closed());
}

#[tokio::test]
async fn test_fetch_details_enriches_records() {
    let page = FakePage::new()
        .route(
            "https://www.yotspot.com/jobs",
            r#"<div class="job-card"><h2>Chef</h2><a href="/job/1">View</a></div>
               <div class="job-card"><h2>Deckhand</h2><a href="/job/2">View</a></div>"#,
        )
        .route(
            "https://www.yotspot.com/job/1",
            r#"<div class="job-description">Busy charter chef role.</div>
               <ul class="requirements"><li>Culinary diploma</li><li>STCW</li></ul>
               <span class="company-name">Blue Water Crew</span>"#,
        );
    let factory = FakeSessionFactory::new(page);
    let mut adapter = board(SiteDefinition::yotspot(), &factory);
    let options = ScrapeOptions {
        fetch_details: true,
        ..options()
    };

    let jobs = scrape_site(&mut adapter, &options).await.unwrap();
    assert_eq!(jobs.len(), 2);

    let chef = &jobs[0];
    assert_eq!(chef.description, "Busy charter chef role.");
    assert_eq!(chef.requirements, vec!["Culinary diploma", "STCW"]);
    assert_eq!(chef.company.as_deref(), Some("Blue Water Crew"));

    // The second detail page fails to load; the listing is kept as is.
    assert!(jobs[1].requirements.is_empty());
}

#[tokio::test]
async fn test_dump_failure_does_not_fail_scrape() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let factory = FakeSessionFactory::new(yotspot_pages());
    let mut adapter = board(SiteDefinition::yotspot(), &factory);
    let options = ScrapeOptions {
        // A file where a directory is expected.
        output_dir: Some(file.path().to_path_buf()),
        ..options()
    };

    let jobs = scrape_site(&mut adapter, &options).await.unwrap();
    assert_eq!(jobs.len(), 3);
}
