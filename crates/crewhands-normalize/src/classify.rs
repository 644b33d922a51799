//! Ordered classification rules.
//!
//! Each list is evaluated top to bottom and the first matching rule wins.
//! Rules are only ever appended: a new rule must not change the result for
//! text an earlier rule already matches. Bump [`RULESET_VERSION`] whenever a
//! list changes.
//!
//! Patterns are case-insensitive and anchored at word starts, so `med` does
//! not fire on "immediate" and `cat` does not fire on "location".

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crewhands_protocols::{Region, Role};

use crate::text::clean_text;

pub const RULESET_VERSION: u32 = 1;

/// Role rules, in priority order.
pub const ROLE_RULES: &[(&str, Role)] = &[
    (r"\b(?:captain|master|skipper)", Role::Captain),
    (r"\b(?:chef|cook|culinary|galley)", Role::Chef),
    (r"\b(?:stewardess|steward|interior)", Role::StewardStewardess),
    (r"\b(?:engineer|eto\b)", Role::Engineer),
    (r"\b(?:deckhand|deck)", Role::Deckhand),
    (r"\b(?:first officer|1st officer)", Role::FirstOfficer),
    (r"\bbosun", Role::Bosun),
    (r"\bmate\b", Role::Mate),
];

/// Region rules, in priority order.
pub const REGION_RULES: &[(&str, Region)] = &[
    (
        r"\b(?:med|mediterranean|france|italy|spain|greece|monaco)",
        Region::Mediterranean,
    ),
    (
        r"\b(?:caribbean|bahamas|bvi|antigua|st\.?\s*martin)",
        Region::Caribbean,
    ),
    (r"\b(?:usa|united states|florida|california)", Region::Usa),
    (r"\b(?:dubai|uae|qatar|oman)\b", Region::MiddleEast),
    (r"\b(?:asia|thailand|singapore|hong kong)", Region::Asia),
];

/// Countries recognised in location text; the first one present wins.
pub const COUNTRIES: &[&str] = &[
    "USA",
    "UK",
    "France",
    "Italy",
    "Spain",
    "Greece",
    "Monaco",
    "Turkey",
    "Croatia",
    "Montenegro",
    "Dubai",
    "UAE",
    "Qatar",
    "Bahamas",
    "BVI",
    "Antigua",
    "St. Martin",
];

pub(crate) fn compile(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .unwrap()
}

static ROLE_MATCHERS: Lazy<Vec<(Regex, &'static Role)>> = Lazy::new(|| {
    ROLE_RULES
        .iter()
        .map(|(pattern, role)| (compile(pattern), role))
        .collect()
});

static REGION_MATCHERS: Lazy<Vec<(Regex, Region)>> = Lazy::new(|| {
    REGION_RULES
        .iter()
        .map(|(pattern, region)| (compile(pattern), *region))
        .collect()
});

static COUNTRY_MATCHERS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    COUNTRIES
        .iter()
        .map(|country| (compile(&format!(r"\b{}\b", regex::escape(country))), *country))
        .collect()
});

/// Role for a position or title.
///
/// Unmatched text yields `Other` with its first three words; empty text
/// yields `Unknown`.
pub fn classify_role(text: &str) -> Role {
    let cleaned = clean_text(text);
    if cleaned.is_empty() {
        return Role::Unknown;
    }

    ROLE_MATCHERS
        .iter()
        .find(|(pattern, _)| pattern.is_match(&cleaned))
        .map(|(_, role)| (*role).clone())
        .unwrap_or_else(|| {
            Role::Other(cleaned.split(' ').take(3).collect::<Vec<_>>().join(" "))
        })
}

pub fn classify_region(location: &str) -> Region {
    REGION_MATCHERS
        .iter()
        .find(|(pattern, _)| pattern.is_match(location))
        .map(|(_, region)| *region)
        .unwrap_or(Region::Unknown)
}

pub fn extract_country(location: &str) -> Option<String> {
    COUNTRY_MATCHERS
        .iter()
        .find(|(pattern, _)| pattern.is_match(location))
        .map(|(_, country)| country.to_string())
}
