//! Data model shared across the pipeline.

mod application;
mod job;
mod profile;
mod raw;
mod report;
mod source;

pub use application::*;
pub use job::*;
pub use profile::*;
pub use raw::*;
pub use report::*;
pub use source::*;

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
