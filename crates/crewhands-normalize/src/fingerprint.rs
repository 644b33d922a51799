//! Job identity fingerprint.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crewhands_protocols::Source;

const FINGERPRINT_LEN: usize = 16;

/// First 16 hex chars of SHA-256 over `"{source}-{title}-{url}"`.
///
/// Without a URL the first-seen timestamp stands in, so two URL-less listings
/// with the same title are only distinct if scraped at different instants.
pub fn fingerprint(
    source: Source,
    title: &str,
    url: Option<&str>,
    scraped_at: DateTime<Utc>,
) -> String {
    let salt = match url {
        Some(url) => url.to_string(),
        None => scraped_at.timestamp_millis().to_string(),
    };
    let digest = Sha256::digest(format!("{}-{}-{}", source, title, salt).as_bytes());
    digest
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<String>()
        .chars()
        .take(FINGERPRINT_LEN)
        .collect()
}
