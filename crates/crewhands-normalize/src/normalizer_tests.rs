use super::*;

use chrono::TimeZone;
use crewhands_protocols::{
    ContractKind, Currency, LengthUnit, PayPeriod, Region, Role, VesselType,
};

use crate::deduplicate_jobs;

fn scraped_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
}

fn yotspot_record() -> RawRecord {
    RawRecord {
        title: Some("  Chief Stewardess on M/Y Aurora ".to_string()),
        position: Some("Chief Stewardess".to_string()),
        vessel_type: Some("Motor Yacht".to_string()),
        vessel_length: Some("62m".to_string()),
        location: Some("Antibes,  France".to_string()),
        salary: Some("€6,500 - €7,500 per month".to_string()),
        description: Some("Rotational role,\n 4 months on".to_string()),
        posted_date: Some("2 days ago".to_string()),
        employment_type: Some("Permanent".to_string()),
        url: Some("https://www.yotspot.com/job/98765".to_string()),
        requirements: vec!["STCW, ENG1; Silver service • 5+ years".to_string()],
        benefits: vec!["Flights, Own cabin".to_string()],
        ..Default::default()
    }
}

#[test]
fn test_normalize_full_record() {
    let job = normalize(&yotspot_record(), Source::Yotspot, scraped_at()).unwrap();

    assert_eq!(job.title, "Chief Stewardess on M/Y Aurora");
    assert_eq!(job.role, Role::StewardStewardess);
    assert_eq!(job.description, "Rotational role, 4 months on");
    assert_eq!(job.url.as_deref(), Some("https://www.yotspot.com/job/98765"));

    let vessel = job.vessel.as_ref().unwrap();
    assert_eq!(vessel.name.as_deref(), Some("M/Y Aurora"));
    assert_eq!(vessel.vessel_type, Some(VesselType::MotorYacht));
    let length = vessel.length.unwrap();
    assert_eq!((length.value, length.unit), (62.0, LengthUnit::M));

    let location = job.location.as_ref().unwrap();
    assert_eq!(location.raw, "Antibes, France");
    assert_eq!(location.region, Region::Mediterranean);
    assert_eq!(location.country.as_deref(), Some("France"));

    let salary = job.salary.as_ref().unwrap();
    assert_eq!((salary.min, salary.max), (6500.0, 7500.0));
    assert_eq!(salary.currency, Currency::Eur);
    assert_eq!(salary.period, PayPeriod::Month);

    assert_eq!(job.requirements, vec!["STCW", "ENG1", "Silver service", "5+ years"]);
    assert_eq!(job.benefits, vec!["Flights", "Own cabin"]);
    assert_eq!(job.posted_at, Some(Utc.with_ymd_and_hms(2025, 5, 30, 9, 0, 0).unwrap()));
    assert_eq!(job.contract.kind, ContractKind::Permanent);
    assert_eq!(job.contract.duration.map(|d| d.value), Some(4));
    assert_eq!(job.scraped_at, scraped_at());
}

#[test]
fn test_role_from_title_examples() {
    let captain = normalize(&RawRecord::titled("Captain needed for 50m yacht"), Source::Yotspot, scraped_at()).unwrap();
    assert_eq!(captain.role, Role::Captain);

    let chef = normalize(&RawRecord::titled("Chef position available"), Source::YaCrew, scraped_at()).unwrap();
    assert_eq!(chef.role, Role::Chef);
}

#[test]
fn test_position_takes_precedence_over_title() {
    let mut raw = RawRecord::titled("Crew wanted for charter season");
    raw.position = Some("Bosun".to_string());
    let job = normalize(&raw, Source::Yotspot, scraped_at()).unwrap();
    assert_eq!(job.role, Role::Bosun);
}

#[test]
fn test_normalize_is_deterministic() {
    let raw = yotspot_record();
    let first = normalize(&raw, Source::Yotspot, scraped_at()).unwrap();
    let second = normalize(&raw, Source::Yotspot, scraped_at()).unwrap();
    assert_eq!(first, second);

    // Without a URL the id still only depends on the record and scraped_at.
    let raw = RawRecord::titled("Deckhand");
    assert_eq!(
        normalize(&raw, Source::YaCrew, scraped_at()),
        normalize(&raw, Source::YaCrew, scraped_at())
    );
}

#[test]
fn test_rejects_missing_or_blank_title() {
    assert!(normalize(&RawRecord::default(), Source::Yotspot, scraped_at()).is_none());
    assert!(normalize(&RawRecord::titled(" \n "), Source::Yotspot, scraped_at()).is_none());
}

#[test]
fn test_sparse_record() {
    let job = normalize(&RawRecord::titled("Yacht Manager"), Source::YaCrew, scraped_at()).unwrap();
    assert_eq!(job.role, Role::Other("Yacht Manager".to_string()));
    assert!(job.vessel.is_none());
    assert!(job.location.is_none());
    assert!(job.salary.is_none());
    assert!(job.requirements.is_empty());
    assert!(job.posted_at.is_none());
    assert_eq!(job.description, "");
    assert_eq!(job.contract, Default::default());
}

#[test]
fn test_unknown_location_region() {
    let mut raw = RawRecord::titled("Deckhand");
    raw.location = Some("Auckland, New Zealand".to_string());
    let job = normalize(&raw, Source::YaCrew, scraped_at()).unwrap();
    assert_eq!(job.region(), Region::Unknown);
    assert!(job.location.unwrap().country.is_none());
}

#[test]
fn test_unparseable_salary_and_date_absent() {
    let mut raw = RawRecord::titled("Chef");
    raw.salary = Some("DOE".to_string());
    raw.posted_date = Some("a while back".to_string());
    let job = normalize(&raw, Source::Yotspot, scraped_at()).unwrap();
    assert!(job.salary.is_none());
    assert!(job.posted_at.is_none());
}

#[test]
fn test_batch_drops_rejects_then_dedup() {
    let raws = vec![
        RawRecord::titled("Chef").with_url("https://www.yacrew.com/jobs/1"),
        RawRecord::default(),
        RawRecord::titled("Deckhand").with_url("https://www.yacrew.com/jobs/2"),
        RawRecord::titled("Chef").with_url("https://www.yacrew.com/jobs/1"),
    ];
    let jobs = normalize_batch(&raws, Source::YaCrew, scraped_at());
    assert_eq!(jobs.len(), 3);

    let unique = deduplicate_jobs(jobs);
    let titles: Vec<&str> = unique.iter().map(|j| j.title.as_str()).collect();
    assert_eq!(titles, vec!["Chef", "Deckhand"]);
}
