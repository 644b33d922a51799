//! # CrewHands Autofill
//!
//! Fills and submits job application forms through the [`Page`] seam.
//!
//! [`FormAutoFiller`] detects the form [`Dialect`], fills fields from an
//! [`ApplicantProfile`], ticks certification and language checkboxes,
//! attaches documents, submits and classifies the outcome.
//! [`BatchApplicationProcessor`] runs it sequentially over a job list.
//!
//! Unknown forms are matched with [`FieldMatcher`] strategies, strictest
//! first: associated label, placeholder, then name attribute.
//!
//! [`Page`]: crewhands_protocols::Page
//! [`ApplicantProfile`]: crewhands_protocols::ApplicantProfile

mod batch;
mod cover_letter;
mod dialect;
mod error;
mod filler;
mod mapping;
mod matcher;
mod snapshot;
mod submit;

#[cfg(test)]
mod testing;

pub use batch::{BatchApplicationProcessor, BatchSummary};
pub use cover_letter::{
    default_letter, experience_summary, generation_prompt, render_template, CoverLetterWriter,
};
pub use dialect::{detect_dialect, Dialect, DialectTable, FORM_SELECTOR_VERSION};
pub use error::ApplyError;
pub use filler::FormAutoFiller;
pub use mapping::{FieldMapping, FieldValues, ProfileField, GENERIC_MAPPINGS};
pub use matcher::{default_matchers, FieldMatcher, LabelMatcher, NameMatcher, PlaceholderMatcher};
pub use snapshot::SnapshotStore;
pub use submit::{
    classify_submission, LIKELY_SUBMITTED_MESSAGE, NO_SUBMIT_MESSAGE, SUBMITTED_MESSAGE,
};
