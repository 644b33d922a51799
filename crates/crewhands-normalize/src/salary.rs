//! Salary parsing.

use once_cell::sync::Lazy;
use regex::Regex;

use crewhands_protocols::{Currency, PayPeriod, Salary};

use crate::classify::compile;
use crate::text::clean_text;

/// Currency markers, first present wins.
const CURRENCY_MARKERS: &[(&str, Currency)] = &[
    ("$", Currency::Usd),
    ("€", Currency::Eur),
    ("£", Currency::Gbp),
    ("USD", Currency::Usd),
    ("EUR", Currency::Eur),
    ("GBP", Currency::Gbp),
];

/// Pay period rules, in priority order.
const PERIOD_RULES: &[(&str, PayPeriod)] = &[
    (r"\b(?:month|pcm|p/m)", PayPeriod::Month),
    (r"\b(?:year|annum|annual|pa\b|p\.a\.)", PayPeriod::Year),
    (r"\bweek", PayPeriod::Week),
    (r"\b(?:day|daily)", PayPeriod::Day),
];

const AMOUNT: &str = r"(\d[\d,]*(?:\.\d+)?)";

static RANGE: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"{AMOUNT}\s*(?:-|–|to)\s*(?:[$€£]|usd|eur|gbp)?\s*{AMOUNT}"
    ))
});

static SINGLE: Lazy<Regex> = Lazy::new(|| Regex::new(AMOUNT).unwrap());

static PERIODS: Lazy<Vec<(Regex, PayPeriod)>> = Lazy::new(|| {
    PERIOD_RULES
        .iter()
        .map(|(pattern, period)| (compile(pattern), *period))
        .collect()
});

fn amount(text: &str) -> Option<f64> {
    text.replace(',', "").parse().ok()
}

/// Parse free salary text. `None` when no amount is present.
pub fn parse_salary(text: &str) -> Option<Salary> {
    let cleaned = clean_text(text);
    if cleaned.is_empty() {
        return None;
    }

    let (min, max) = match RANGE.captures(&cleaned) {
        Some(caps) => (amount(&caps[1])?, amount(&caps[2])?),
        None => {
            let single = amount(&SINGLE.captures(&cleaned)?[1])?;
            (single, single)
        }
    };

    let currency = CURRENCY_MARKERS
        .iter()
        .find(|(marker, _)| cleaned.contains(marker))
        .map(|(_, currency)| *currency)
        .unwrap_or_default();

    let period = PERIODS
        .iter()
        .find(|(pattern, _)| pattern.is_match(&cleaned))
        .map(|(_, period)| *period)
        .unwrap_or_default();

    Some(Salary {
        min,
        max,
        currency,
        period,
        raw: cleaned,
    })
}
