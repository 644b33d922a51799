//! # CrewHands Protocols
//!
//! Shared data model and interface traits for the CrewHands pipeline.
//! Contains only types and seams - no browser, network or storage code.
//!
//! ## Core Traits
//!
//! - [`Page`] - Page automation seam used by site adapters and the form filler
//! - [`SessionFactory`] - Opens one exclusive browser session per task
//! - [`JobSink`] - External ingest interface for canonical jobs
//! - [`TextGenerator`] - External text generation used for cover letters

pub mod error;
pub mod page;
pub mod sink;
pub mod text;
pub mod types;

pub use error::{GenerateError, PageError, SinkError};
pub use page::{ElementHandle, Page, SessionFactory, SessionOptions, Viewport};
pub use sink::{IngestOutcome, JobSink, NullSink};
pub use text::TextGenerator;
pub use types::*;
