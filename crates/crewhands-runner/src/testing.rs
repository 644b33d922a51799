//! Shared fixtures for the crate's tests.

use chrono::{TimeZone, Utc};

use crewhands_protocols::{
    ApplicantProfile, CanonicalJob, Currency, Location, PayPeriod, Region, Role, Salary, Source, Vessel, VesselType,
};

pub fn job(id: &str, title: &str) -> CanonicalJob {
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
        url: Some(format!("https://www.yotspot.com/job/{}", id)),
        company: None,
        contact_email: None,
        contract: Default::default(),
    }
}

pub fn with_role(mut job: CanonicalJob, role: Role) -> CanonicalJob {
    job.role = role;
    job
}

pub fn with_location(mut job: CanonicalJob, raw: &str, region: Region) -> CanonicalJob {
    job.location = Some(Location {
        raw: raw.to_string(),
        region,
        country: None,
    });
    job
}

pub fn with_salary(mut job: CanonicalJob, min: f64, max: f64) -> CanonicalJob {
    job.salary = Some(Salary {
        min,
        max,
        currency: Currency::Eur,
        period: PayPeriod::Month,
        raw: format!("€{} - €{}", min, max),
    });
    job
}

pub fn with_vessel_type(mut job: CanonicalJob, vessel_type: VesselType) -> CanonicalJob {
    job.vessel = Some(Vessel {
        vessel_type: Some(vessel_type),
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
        current_position: "Second Stewardess".to_string(),
        years_experience: Some(5),
        ..Default::default()
    }
}
