use super::*;
use crate::site::{YACREW_DETAILS, YACREW_SELECTORS, YOTSPOT_DETAILS, YOTSPOT_SELECTORS};

const YOTSPOT_PAGE: &str = r#"
<html><body>
  <div class="job-card">
    <h2 class="job-title">Chief Stewardess on M/Y Aurora</h2>
    <span class="position">Chief Stewardess</span>
    <span class="location">Antibes, France</span>
    <span class="salary">€6,500 - €7,500 per month</span>
    <p class="description">Rotational   role
       on a busy charter yacht</p>
    <span class="posted-date">2 days ago</span>
    <a href="/job/98765">View</a>
  </div>
  <div class="job-card">
    <h3>Deckhand</h3>
  </div>
</body></html>
"#;

#[test]
fn test_extract_yotspot_cards() {
    let records = extract_cards(YOTSPOT_PAGE, "https://www.yotspot.com/jobs?page=1", &YOTSPOT_SELECTORS);
    assert_eq!(records.len(), 2);

    let first = &records[0];
    assert_eq!(first.title.as_deref(), Some("Chief Stewardess on M/Y Aurora"));
    assert_eq!(first.position.as_deref(), Some("Chief Stewardess"));
    assert_eq!(first.location.as_deref(), Some("Antibes, France"));
    assert_eq!(first.salary.as_deref(), Some("€6,500 - €7,500 per month"));
    assert_eq!(first.description.as_deref(), Some("Rotational role on a busy charter yacht"));
    assert_eq!(first.posted_date.as_deref(), Some("2 days ago"));
    assert_eq!(first.url.as_deref(), Some("https://www.yotspot.com/job/98765"));
    assert!(first.vessel_name.is_none());
    assert!(first.vessel_length.is_none());

    // Missing fields are absent, not a failure.
    let second = &records[1];
    assert_eq!(second.title.as_deref(), Some("Deckhand"));
    assert!(second.salary.is_none());
    assert!(second.url.is_none());
}

#[test]
fn test_extract_yacrew_card_extras() {
    let html = r#"
    <div class="job-item">
      <h2 class="listing-title">Chef</h2>
      <span class="yacht-type">Motor Yacht</span>
      <span class="contract-type">Seasonal</span>
      <span class="vessel">Lady M, 65 m</span>
      <a href="https://www.yacrew.com/jobs/42">Apply</a>
    </div>
    <div class="job-item">
      <h2>Engineer</h2>
      <p class="job-desc">6 months rotation</p>
    </div>"#;

    let records = extract_cards(html, "https://www.yacrew.com/jobs", &YACREW_SELECTORS);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].vessel_type.as_deref(), Some("Motor Yacht"));
    assert_eq!(records[0].employment_type.as_deref(), Some("Seasonal"));
    assert_eq!(records[0].vessel_length.as_deref(), Some("65m"));
    assert_eq!(records[0].url.as_deref(), Some("https://www.yacrew.com/jobs/42"));

    // "6 months" is not a length.
    assert!(records[1].vessel_length.is_none());
}

#[test]
fn test_card_that_is_a_link() {
    let html = r#"<a data-job-id="7" href="/job/7"><h3>Bosun</h3></a>"#;
    let records = extract_cards(html, "https://www.yotspot.com/jobs", &YOTSPOT_SELECTORS);
    assert_eq!(records[0].url.as_deref(), Some("https://www.yotspot.com/job/7"));
}

#[test]
fn test_count_cards() {
    assert_eq!(count_cards(YOTSPOT_PAGE, &YOTSPOT_SELECTORS), 2);
    assert_eq!(count_cards("<html></html>", &YOTSPOT_SELECTORS), 0);
}

#[test]
fn test_extract_details() {
    let html = r#"
    <div class="job-details">Full description of the role.</div>
    <ul class="requirements"><li>STCW</li><li>ENG1</li></ul>
    <ul class="perks"><li>Own cabin</li></ul>
    <span class="yacht-name">M/Y Aurora</span>
    <span class="start-date">Start: 1st May 2025</span>
    <a href="mailto:crew@aurora.example?subject=Chef">Email us</a>
    "#;

    let details = extract_details(html, &YACREW_DETAILS);
    assert_eq!(details.description.as_deref(), Some("Full description of the role."));
    assert_eq!(details.requirements, vec!["STCW", "ENG1"]);
    assert_eq!(details.benefits, vec!["Own cabin"]);
    assert_eq!(details.company_name.as_deref(), Some("M/Y Aurora"));
    assert_eq!(details.start_date.as_deref(), Some("Start: 1st May 2025"));
    assert_eq!(details.contact_email.as_deref(), Some("crew@aurora.example"));
}

#[test]
fn test_extract_details_empty_page() {
    let details = extract_details("<html><body></body></html>", &YOTSPOT_DETAILS);
    assert_eq!(details, RawRecord::default());
}
