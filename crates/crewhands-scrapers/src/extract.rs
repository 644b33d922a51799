//! Card and detail-page extraction.
//!
//! Works on serialized page HTML so the same rules run against any page
//! backend. Parsed documents never leave these functions.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{trace, warn};
use url::Url;

use crewhands_protocols::RawRecord;

use crate::site::{DetailSelectors, SelectorTable};

static CARD_LENGTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d+)\s*m\b").expect("valid length pattern"));

fn selector(raw: &str) -> Option<Selector> {
    match Selector::parse(raw) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!("Skipping invalid selector '{}': {}", raw, e);
            None
        }
    }
}

fn element_text(el: ElementRef<'_>) -> Option<String> {
    let text = el.text().collect::<Vec<_>>().join(" ");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!text.is_empty()).then_some(text)
}

/// Text of the first match of `raw` under `scope`.
fn first_text(scope: ElementRef<'_>, raw: &str) -> Option<String> {
    let selector = selector(raw)?;
    scope.select(&selector).find_map(element_text)
}

fn all_text(scope: ElementRef<'_>, raw: &str) -> Vec<String> {
    let Some(selector) = selector(raw) else {
        return Vec::new();
    };
    scope.select(&selector).filter_map(element_text).collect()
}

fn resolve(base: Option<&Url>, href: &str) -> Option<String> {
    match base {
        Some(base) => base.join(href).ok().map(String::from),
        None => Url::parse(href).ok().map(String::from),
    }
}

/// Number of listing cards in `html`.
pub fn count_cards(html: &str, table: &SelectorTable) -> usize {
    let Some(card) = selector(table.card) else {
        return 0;
    };
    Html::parse_document(html).select(&card).count()
}

/// One record per listing card, in document order.
///
/// Missing fields stay `None`. Relative links are resolved against
/// `page_url`.
pub fn extract_cards(html: &str, page_url: &str, table: &SelectorTable) -> Vec<RawRecord> {
    let Some(card) = selector(table.card) else {
        return Vec::new();
    };
    let base = Url::parse(page_url).ok();
    let link = selector(table.link);
    let doc = Html::parse_document(html);

    doc.select(&card)
        .map(|card| {
            let mut record = RawRecord {
                title: first_text(card, table.title),
                position: first_text(card, table.position),
                vessel_name: first_text(card, table.vessel),
                location: first_text(card, table.location),
                salary: first_text(card, table.salary),
                description: first_text(card, table.description),
                posted_date: first_text(card, table.posted_date),
                vessel_type: table.vessel_type.and_then(|s| first_text(card, s)),
                employment_type: table.employment_type.and_then(|s| first_text(card, s)),
                ..Default::default()
            };

            // The card itself may be the link.
            let href = card.value().attr("href").or_else(|| {
                link.as_ref()
                    .and_then(|link| card.select(link).next())
                    .and_then(|a| a.value().attr("href"))
            });
            record.url = href.and_then(|href| resolve(base.as_ref(), href));

            if table.length_from_text {
                let text = card.text().collect::<Vec<_>>().join(" ");
                record.vessel_length = CARD_LENGTH
                    .captures(&text)
                    .map(|caps| format!("{}m", &caps[1]));
            }

            trace!(title = ?record.title, url = ?record.url, "Extracted card");
            record
        })
        .collect()
}

/// Enrichment fields from a job detail page.
pub fn extract_details(html: &str, details: &DetailSelectors) -> RawRecord {
    let doc = Html::parse_document(html);
    let root = doc.root_element();

    let contact_email = selector(details.contact).and_then(|s| {
        root.select(&s)
            .filter_map(|a| a.value().attr("href"))
            .find_map(|href| href.strip_prefix("mailto:"))
            .map(|email| email.split('?').next().unwrap_or(email).trim().to_string())
            .filter(|email| !email.is_empty())
    });

    RawRecord {
        description: first_text(root, details.description),
        requirements: all_text(root, details.requirements),
        benefits: all_text(root, details.benefits),
        company_name: first_text(root, details.company),
        start_date: details.start_date.and_then(|s| first_text(root, s)),
        contact_email,
        ..Default::default()
    }
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
