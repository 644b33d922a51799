//! Application errors.

use thiserror::Error;

use crewhands_protocols::PageError;

/// Failure of one application attempt.
///
/// Never escapes [`FormAutoFiller::apply`](crate::FormAutoFiller::apply);
/// it is folded into a failed
/// [`ApplicationResult`](crewhands_protocols::ApplicationResult).
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("Job {0} has no application URL")]
    MissingUrl(String),

    #[error(transparent)]
    Page(#[from] PageError),
}
