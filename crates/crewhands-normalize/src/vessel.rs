//! Vessel field parsing.

use once_cell::sync::Lazy;
use regex::Regex;

use crewhands_protocols::{VesselLength, VesselType};

use crate::classify::compile;
use crate::text::clean_text;

/// Vessel type rules, in priority order. Appended only; see
/// [`RULESET_VERSION`](crate::RULESET_VERSION).
pub const VESSEL_TYPE_RULES: &[(&str, VesselType)] = &[
    (r"\bmotor yacht|\bm/y\b", VesselType::MotorYacht),
    (r"\bsailing yacht|\bs/y\b|\bsail", VesselType::SailingYacht),
    (r"\bsuper ?yacht", VesselType::Superyacht),
    (r"\bmega ?yacht", VesselType::Megayacht),
    (r"\bcatamaran|\bcat\b", VesselType::Catamaran),
];

static VESSEL_TYPE_MATCHERS: Lazy<Vec<(Regex, &'static VesselType)>> = Lazy::new(|| {
    VESSEL_TYPE_RULES
        .iter()
        .map(|(pattern, vessel_type)| (compile(pattern), vessel_type))
        .collect()
});

static LENGTH_WITH_UNIT: Lazy<Regex> =
    Lazy::new(|| compile(r"(\d+(?:\.\d+)?)\s*(m|meters?|metres?|ft|feet)\b"));

static LEADING_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(\d+(?:\.\d+)?)").unwrap());

static ON_VESSEL: Lazy<Regex> = Lazy::new(|| compile(r"\bon\s+([^,]+)"));

/// Classified vessel type; unrecognized text is kept as `Other`.
pub fn classify_vessel_type(text: &str) -> Option<VesselType> {
    let cleaned = clean_text(text);
    if cleaned.is_empty() {
        return None;
    }

    let vessel_type = VESSEL_TYPE_MATCHERS
        .iter()
        .find(|(pattern, _)| pattern.is_match(&cleaned))
        .map(|(_, vessel_type)| (*vessel_type).clone())
        .unwrap_or(VesselType::Other(cleaned));
    Some(vessel_type)
}

/// Length with unit. A bare leading number is taken as meters.
pub fn parse_vessel_length(text: &str) -> Option<VesselLength> {
    if let Some(caps) = LENGTH_WITH_UNIT.captures(text) {
        let value: f64 = caps[1].parse().ok()?;
        let unit = caps[2].to_ascii_lowercase();
        return Some(if unit.starts_with('m') {
            VesselLength::meters(value)
        } else {
            VesselLength::feet(value)
        });
    }

    let caps = LEADING_NUMBER.captures(text)?;
    caps[1].parse().ok().map(VesselLength::meters)
}

/// Vessel name from an "... on <name>" title, e.g. "Chef on M/Y Aurora".
pub fn vessel_name_from_title(title: &str) -> Option<String> {
    let caps = ON_VESSEL.captures(title)?;
    let name = clean_text(&caps[1]);
    (!name.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewhands_protocols::LengthUnit;

    #[test]
    fn test_vessel_types() {
        let cases = [
            ("Motor Yacht", VesselType::MotorYacht),
            ("M/Y", VesselType::MotorYacht),
            ("S/Y Spirit", VesselType::SailingYacht),
            ("Sail", VesselType::SailingYacht),
            ("Super Yacht", VesselType::Superyacht),
            ("superyacht", VesselType::Superyacht),
            ("Mega Yacht", VesselType::Megayacht),
            ("Power Catamaran", VesselType::Catamaran),
        ];
        for (text, expected) in cases {
            assert_eq!(classify_vessel_type(text), Some(expected), "{}", text);
        }
    }

    #[test]
    fn test_vessel_type_unmatched_kept() {
        assert_eq!(
            classify_vessel_type("  Expedition  Vessel "),
            Some(VesselType::Other("Expedition Vessel".to_string()))
        );
        assert_eq!(
            classify_vessel_type("Explorer"),
            Some(VesselType::Other("Explorer".to_string()))
        );
        assert_eq!(classify_vessel_type(""), None);
    }

    #[test]
    fn test_vessel_type_word_starts() {
        // "cat" inside a word must not classify as a catamaran.
        assert_eq!(
            classify_vessel_type("Dedicated charter"),
            Some(VesselType::Other("Dedicated charter".to_string()))
        );
    }

    #[test]
    fn test_lengths() {
        assert_eq!(parse_vessel_length("100m"), Some(VesselLength::meters(100.0)));
        assert_eq!(parse_vessel_length("200ft"), Some(VesselLength::feet(200.0)));
        assert_eq!(parse_vessel_length("45.5 metres"), Some(VesselLength::meters(45.5)));
        assert_eq!(parse_vessel_length("120 Feet"), Some(VesselLength::feet(120.0)));
    }

    #[test]
    fn test_length_without_unit() {
        let length = parse_vessel_length("62").unwrap();
        assert_eq!(length.unit, LengthUnit::M);
        assert_eq!(length.value, 62.0);
        assert_eq!(parse_vessel_length("large"), None);
    }

    #[test]
    fn test_vessel_name_from_title() {
        assert_eq!(
            vessel_name_from_title("Chief Stewardess on M/Y Aurora, Antibes").as_deref(),
            Some("M/Y Aurora")
        );
        assert_eq!(vessel_name_from_title("Deckhand wanted"), None);
        // "on" must start a word.
        assert_eq!(vessel_name_from_title("Second Engineer position"), None);
    }
}
