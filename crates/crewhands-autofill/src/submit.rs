//! Post-submit outcome classification.

use tracing::debug;

use crewhands_protocols::{Page, PageError, SubmitOutcome};

const SUCCESS_SELECTORS: &str = r#".success-message, .alert-success, [data-success="true"]"#;
/// Whole confirmation sentences; job copy routinely says "successful".
const SUCCESS_PHRASES: &[&str] = &[
    "application submitted",
    "application has been submitted",
    "application has been received",
    "application received",
    "thank you for applying",
    "thank you for your application",
];

const ERROR_SELECTORS: &str = ".error-message, .alert-error, .field-error";
/// Validation wording that only appears once a field was rejected.
const ERROR_PHRASES: &[&str] = &[
    "there was an error",
    "there was a problem",
    "please correct",
    "is required",
    "is invalid",
];

pub const SUBMITTED_MESSAGE: &str = "Application submitted";
pub const LIKELY_SUBMITTED_MESSAGE: &str = "Form likely submitted";
pub const NO_SUBMIT_MESSAGE: &str = "Submit button not found";

/// Inspect the page after a submit click.
///
/// Indicator elements are checked before any body wording: a success
/// element, then an error element. Only then are confirmation and
/// validation phrases looked for. When nothing matches the submission is
/// optimistically counted as sent.
pub async fn classify_submission(page: &dyn Page) -> Result<(SubmitOutcome, String), PageError> {
    if page.query(SUCCESS_SELECTORS).await?.is_some() {
        return Ok((SubmitOutcome::Submitted, SUBMITTED_MESSAGE.to_string()));
    }

    for element in page.query_all(ERROR_SELECTORS).await? {
        let text = collapse(&page.text(element).await?);
        if !text.is_empty() {
            debug!(error = %text, "Form reported an error");
            return Ok((SubmitOutcome::Failed, text));
        }
    }

    let body = body_text(page).await?;
    let lowered = collapse(&body).to_lowercase();
    if SUCCESS_PHRASES.iter().any(|p| lowered.contains(p)) {
        return Ok((SubmitOutcome::Submitted, SUBMITTED_MESSAGE.to_string()));
    }
    if ERROR_PHRASES.iter().any(|p| lowered.contains(p)) {
        return Ok((SubmitOutcome::Failed, error_line(&body)));
    }

    Ok((SubmitOutcome::LikelySubmitted, LIKELY_SUBMITTED_MESSAGE.to_string()))
}

async fn body_text(page: &dyn Page) -> Result<String, PageError> {
    match page.query("body").await? {
        Some(body) => page.text(body).await,
        None => Ok(String::new()),
    }
}

/// The first line of `body` mentioning an error phrase.
fn error_line(body: &str) -> String {
    body.lines()
        .map(collapse)
        .find(|line| {
            let lowered = line.to_lowercase();
            ERROR_PHRASES.iter().any(|p| lowered.contains(p))
        })
        .unwrap_or_else(|| "Form reported an error".to_string())
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
