//! Shared fixtures for the crate's tests.

use chrono::{TimeZone, Utc};

use crewhands_protocols::{ApplicantProfile, CanonicalJob, Role, Source, Vessel};

pub fn job(id: &str, title: &str, url: Option<&str>) -> CanonicalJob {
    CanonicalJob {
        id: id.to_string(),
        source: Source::Yotspot,
        title: title.to_string(),
        description: String::new(),
        role: Role::Unknown,
        vessel: None,
        location: None,
        salary: None,
        requirements: Vec::new(),
        benefits: Vec::new(),
        posted_at: None,
        expires_at: None,
        scraped_at: Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
        url: url.map(str::to_string),
        company: None,
        contact_email: None,
        contract: Default::default(),
    }
}

pub fn job_on_vessel(title: &str, vessel: &str) -> CanonicalJob {
    let mut job = job("j-vessel", title, None);
    job.vessel = Some(Vessel {
        name: Some(vessel.to_string()),
        ..Default::default()
    });
    job
}

pub fn profile() -> ApplicantProfile {
    ApplicantProfile {
        first_name: "Ana".to_string(),
        last_name: "Silva".to_string(),
        email: "ana@example.com".to_string(),
        phone: "+33 6 12 34 56 78".to_string(),
        nationality: "Portuguese".to_string(),
        current_position: "Second Stewardess".to_string(),
        years_experience: Some(5),
        certifications: vec!["STCW".to_string(), "ENG1".to_string()],
        languages: vec!["English".to_string(), "French".to_string()],
        cv_path: Some("/profiles/ana/cv.pdf".into()),
        certificates: vec!["/profiles/ana/stcw.pdf".into()],
        available_from: Some("1 May 2025".to_string()),
        ..Default::default()
    }
}
