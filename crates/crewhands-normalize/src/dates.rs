//! Date and contract parsing.

use chrono::{DateTime, Days, Duration, Months, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crewhands_protocols::{
    Contract, ContractDuration, ContractKind, DurationUnit, RawRecord,
};

use crate::classify::compile;
use crate::text::clean_text;

static RELATIVE: Lazy<Regex> =
    Lazy::new(|| compile(r"(\d+)\s*(hour|day|week|month)s?\s*ago"));

static ORDINAL: Lazy<Regex> = Lazy::new(|| compile(r"\b(\d{1,2})(?:st|nd|rd|th)\b"));

static LABEL: Lazy<Regex> =
    Lazy::new(|| compile(r"^(?:posted|expires|closing date|start date|start)\s*(?:on)?\s*:?\s*"));

static PERMANENT: Lazy<Regex> = Lazy::new(|| compile(r"permanent|full[-\s]?time"));
static TEMPORARY: Lazy<Regex> = Lazy::new(|| compile(r"temporary|contract|seasonal"));
static DURATION: Lazy<Regex> = Lazy::new(|| compile(r"(\d+)\s*(month|year|week)s?\b"));
static IMMEDIATE: Lazy<Regex> = Lazy::new(|| compile(r"^(?:asap|immediate(?:ly)?|now)$"));

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
];

/// Resolve a posted/expiry phrase against `now`.
///
/// Handles "N hours/days/weeks/months ago", "today", "yesterday" and
/// common absolute formats. Unparseable text yields `None`.
pub fn parse_date(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let cleaned = clean_text(text);
    let cleaned = LABEL.replace(&cleaned, "");
    if cleaned.is_empty() {
        return None;
    }

    if let Some(caps) = RELATIVE.captures(&cleaned) {
        let n: u32 = caps[1].parse().ok()?;
        return match caps[2].to_ascii_lowercase().as_str() {
            "hour" => now.checked_sub_signed(Duration::hours(i64::from(n))),
            "day" => now.checked_sub_days(Days::new(u64::from(n))),
            "week" => now.checked_sub_days(Days::new(u64::from(n) * 7)),
            _ => now.checked_sub_months(Months::new(n)),
        };
    }

    match cleaned.to_ascii_lowercase().as_str() {
        "today" | "just now" => return Some(now),
        "yesterday" => return now.checked_sub_days(Days::new(1)),
        _ => {}
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&cleaned) {
        return Some(parsed.with_timezone(&Utc));
    }

    let without_ordinals = ORDINAL.replace_all(&cleaned, "$1");
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(&without_ordinals, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Contract terms: kind from the employment type, duration from the
/// description, start date from the start field.
pub fn parse_contract(raw: &RawRecord, now: DateTime<Utc>) -> Contract {
    let employment = raw.employment_type.as_deref().unwrap_or_default();
    let kind = if PERMANENT.is_match(employment) {
        ContractKind::Permanent
    } else if TEMPORARY.is_match(employment) {
        ContractKind::Temporary
    } else {
        ContractKind::Unknown
    };

    let duration = raw
        .description
        .as_deref()
        .and_then(|text| DURATION.captures(text))
        .and_then(|caps| {
            let value = caps[1].parse().ok()?;
            let unit = match caps[2].to_ascii_lowercase().as_str() {
                "week" => DurationUnit::Week,
                "year" => DurationUnit::Year,
                _ => DurationUnit::Month,
            };
            Some(ContractDuration { value, unit })
        });

    let start_date = raw.start_date.as_deref().and_then(|text| {
        if IMMEDIATE.is_match(text.trim()) {
            Some(now.date_naive())
        } else {
            parse_date(text, now).map(|d| d.date_naive())
        }
    });

    Contract {
        kind,
        duration,
        start_date,
    }
}
