//! RawRecord to CanonicalJob.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crewhands_protocols::{CanonicalJob, Location, RawRecord, Source, Vessel};

use crate::classify::{classify_region, classify_role, extract_country};
use crate::dates::{parse_contract, parse_date};
use crate::fingerprint::fingerprint;
use crate::salary::parse_salary;
use crate::text::{clean_optional, clean_text, split_list};
use crate::vessel::{classify_vessel_type, parse_vessel_length, vessel_name_from_title};

/// Requirements of this many characters or fewer are dropped.
const MIN_REQUIREMENT_LEN: usize = 3;

/// Normalize one record. Pure: the same record and `scraped_at` always give
/// the same job.
///
/// Returns `None` (logged at warn) when the record has no usable title.
pub fn normalize(raw: &RawRecord, source: Source, scraped_at: DateTime<Utc>) -> Option<CanonicalJob> {
    let Some(title) = clean_optional(raw.title.as_deref()) else {
        warn!("Job validation failed for {}, missing: title", source);
        return None;
    };

    let url = clean_optional(raw.url.as_deref());
    let role_text = clean_optional(raw.position.as_deref()).unwrap_or_else(|| title.clone());

    let job = CanonicalJob {
        id: fingerprint(source, &title, url.as_deref(), scraped_at),
        source,
        description: clean_text(raw.description.as_deref().unwrap_or_default()),
        role: classify_role(&role_text),
        vessel: parse_vessel(raw, &title),
        location: parse_location(raw.location.as_deref()),
        salary: raw.salary.as_deref().and_then(parse_salary),
        requirements: split_list(&raw.requirements, MIN_REQUIREMENT_LEN),
        benefits: split_list(&raw.benefits, 0),
        posted_at: raw.posted_date.as_deref().and_then(|d| parse_date(d, scraped_at)),
        expires_at: raw.expires_at.as_deref().and_then(|d| parse_date(d, scraped_at)),
        scraped_at,
        url,
        company: clean_optional(raw.company_name.as_deref()),
        contact_email: clean_optional(raw.contact_email.as_deref()),
        contract: parse_contract(raw, scraped_at),
        title,
    };

    debug!(id = %job.id, role = %job.role, "Normalized job");
    Some(job)
}

/// Normalize a batch, dropping rejected records.
pub fn normalize_batch(
    raws: &[RawRecord],
    source: Source,
    scraped_at: DateTime<Utc>,
) -> Vec<CanonicalJob> {
    raws.iter()
        .filter_map(|raw| normalize(raw, source, scraped_at))
        .collect()
}

fn parse_vessel(raw: &RawRecord, title: &str) -> Option<Vessel> {
    let vessel = Vessel {
        name: clean_optional(raw.vessel_name.as_deref())
            .or_else(|| vessel_name_from_title(title)),
        vessel_type: raw.vessel_type.as_deref().and_then(classify_vessel_type),
        length: raw.vessel_length.as_deref().and_then(parse_vessel_length),
        flag: clean_optional(raw.vessel_flag.as_deref()),
    };
    (!vessel.is_empty()).then_some(vessel)
}

fn parse_location(text: Option<&str>) -> Option<Location> {
    let raw = clean_optional(text)?;
    Some(Location {
        region: classify_region(&raw),
        country: extract_country(&raw),
        raw,
    })
}

#[cfg(test)]
#[path = "normalizer_tests.rs"]
mod tests;
