//! # CrewHands Normalize
//!
//! Turns raw page records into [`CanonicalJob`]s and removes in-batch
//! duplicates. Everything here is pure: the same record and `scraped_at`
//! always produce the same job.
//!
//! [`CanonicalJob`]: crewhands_protocols::CanonicalJob

pub mod classify;
mod dates;
mod dedup;
mod fingerprint;
mod normalizer;
mod salary;
mod text;
mod vessel;

pub use classify::{classify_region, classify_role, extract_country, RULESET_VERSION};
pub use dates::{parse_contract, parse_date};
pub use dedup::deduplicate_jobs;
pub use fingerprint::fingerprint;
pub use normalizer::{normalize, normalize_batch};
pub use salary::parse_salary;
pub use text::{clean_optional, clean_text, split_list};
pub use vessel::{
    classify_vessel_type, parse_vessel_length, vessel_name_from_title, VESSEL_TYPE_RULES,
};
