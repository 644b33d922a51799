//! Application form auto-filler.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use crewhands_protocols::{
    ApplicantProfile, ApplicationResult, CanonicalJob, ElementHandle, Page, PageError,
    SubmitOutcome,
};
use crewhands_throttle::RateLimiter;

use crate::cover_letter::{experience_summary, CoverLetterWriter};
use crate::dialect::{detect_dialect, Dialect, DialectTable};
use crate::error::ApplyError;
use crate::mapping::{FieldMapping, FieldValues, GENERIC_MAPPINGS};
use crate::matcher::{default_matchers, FieldMatcher};
use crate::snapshot::SnapshotStore;
use crate::submit::{classify_submission, NO_SUBMIT_MESSAGE};

const DEFAULT_SUBMIT_WAIT: Duration = Duration::from_secs(3);

const CHECKBOXES: &str = r#"input[type="checkbox"]"#;

/// Fills and submits one application form per call.
pub struct FormAutoFiller {
    profile: Arc<ApplicantProfile>,
    letters: CoverLetterWriter,
    matchers: Vec<Box<dyn FieldMatcher>>,
    limiter: Option<Arc<RateLimiter>>,
    snapshots: SnapshotStore,
    submit_wait: Duration,
}

impl FormAutoFiller {
    pub fn new(profile: Arc<ApplicantProfile>) -> Self {
        Self {
            profile,
            letters: CoverLetterWriter::new(),
            matchers: default_matchers(),
            limiter: None,
            snapshots: SnapshotStore::disabled(),
            submit_wait: DEFAULT_SUBMIT_WAIT,
        }
    }

    pub fn with_cover_letters(mut self, letters: CoverLetterWriter) -> Self {
        self.letters = letters;
        self
    }

    pub fn with_matchers(mut self, matchers: Vec<Box<dyn FieldMatcher>>) -> Self {
        self.matchers = matchers;
        self
    }

    /// Pace navigation to application pages through `limiter`.
    pub fn with_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    pub fn with_snapshots(mut self, snapshots: SnapshotStore) -> Self {
        self.snapshots = snapshots;
        self
    }

    /// Time to let the page react after the submit click.
    pub fn with_submit_wait(mut self, wait: Duration) -> Self {
        self.submit_wait = wait;
        self
    }

    pub fn profile(&self) -> &ApplicantProfile {
        &self.profile
    }

    /// Apply to `job` on `page`. Never fails; every problem ends up in the
    /// returned result.
    pub async fn apply(
        &self,
        page: &dyn Page,
        job: &CanonicalJob,
        custom_message: Option<&str>,
    ) -> ApplicationResult {
        info!(job_id = %job.id, title = %job.title, "Applying to job");

        let (outcome, message) = match self.attempt(page, job, custom_message).await {
            Ok(classified) => classified,
            Err(e) => {
                warn!(job_id = %job.id, error = %e, "Application attempt failed");
                self.snapshots.capture(page, "error", &job.id).await;
                (SubmitOutcome::Failed, e.to_string())
            }
        };

        info!(job_id = %job.id, outcome = ?outcome, message = %message, "Application finished");
        ApplicationResult {
            job_id: job.id.clone(),
            job_title: job.title.clone(),
            url: job.url.clone(),
            outcome,
            message,
            timestamp: Utc::now(),
        }
    }

    async fn attempt(
        &self,
        page: &dyn Page,
        job: &CanonicalJob,
        custom_message: Option<&str>,
    ) -> Result<(SubmitOutcome, String), ApplyError> {
        let url = job
            .url
            .as_deref()
            .ok_or_else(|| ApplyError::MissingUrl(job.id.clone()))?;
        self.navigate(page, url).await?;

        let dialect = detect_dialect(page).await?;
        let table = dialect.table();

        let letter = match custom_message.map(str::trim).filter(|m| !m.is_empty()) {
            Some(message) => message.to_string(),
            None => self.letters.write(job, &self.profile).await,
        };
        let values = FieldValues::new(&self.profile, letter, experience_summary(&self.profile));

        let filled = match dialect {
            Dialect::Generic => self.fill_generic(page, &values).await,
            _ => self.fill_table(page, table, &values).await,
        };
        debug!(%dialect, filled, "Filled form fields");

        if table.checkboxes {
            let groups = [
                ("certification", &self.profile.certifications),
                ("language", &self.profile.languages),
            ];
            for (category, items) in groups {
                if let Err(e) = self.check_items(page, category, items).await {
                    warn!(category, error = %e, "Skipping checkboxes");
                }
            }
        }
        self.attach_documents(page, table).await;

        let Some(submit) = page.query(table.submit).await? else {
            warn!(job_id = %job.id, %dialect, "No submit control on form");
            return Ok((SubmitOutcome::Failed, NO_SUBMIT_MESSAGE.to_string()));
        };

        self.snapshots.capture(page, "before-submit", &job.id).await;
        page.click(submit).await?;
        tokio::time::sleep(self.submit_wait).await;

        Ok(classify_submission(page).await?)
    }

    async fn navigate(&self, page: &dyn Page, url: &str) -> Result<(), PageError> {
        match &self.limiter {
            Some(limiter) => limiter.execute(|| page.goto(url)).await,
            None => page.goto(url).await,
        }
    }

    /// Fill fixed-selector fields; returns how many were filled.
    async fn fill_table(
        &self,
        page: &dyn Page,
        table: &DialectTable,
        values: &FieldValues<'_>,
    ) -> usize {
        let mut filled = 0;
        for (selector, field) in table.fields {
            let Some(value) = values.get(*field) else {
                continue;
            };
            match page.query(selector).await {
                Ok(Some(element)) => {
                    if fill_field(page, element, &value, selector).await {
                        filled += 1;
                    }
                }
                Ok(None) => debug!(field = ?field, "Field not present"),
                Err(e) => warn!(field = ?field, error = %e, "Field lookup failed"),
            }
        }
        filled
    }

    /// Walk the generic mappings; each element is filled at most once.
    async fn fill_generic(&self, page: &dyn Page, values: &FieldValues<'_>) -> usize {
        let mut used = HashSet::new();
        for mapping in GENERIC_MAPPINGS {
            let Some(value) = values.get(mapping.field) else {
                continue;
            };
            if let Some(element) = self.locate(page, mapping, &used).await {
                let name = format!("{:?}", mapping.field);
                if fill_field(page, element, &value, &name).await {
                    used.insert(element);
                }
            }
        }
        used.len()
    }

    /// Strategies in order, each over every pattern; first unused hit wins.
    async fn locate(
        &self,
        page: &dyn Page,
        mapping: &FieldMapping,
        used: &HashSet<ElementHandle>,
    ) -> Option<ElementHandle> {
        for matcher in &self.matchers {
            for pattern in mapping.patterns {
                match matcher.try_match(page, pattern).await {
                    Ok(Some(element)) if !used.contains(&element) => {
                        debug!(field = ?mapping.field, strategy = matcher.name(), pattern, "Located field");
                        return Some(element);
                    }
                    Ok(_) => {}
                    Err(e) => debug!(strategy = matcher.name(), pattern, error = %e, "Matcher failed"),
                }
            }
        }
        None
    }

    /// Tick boxes for `items`; boxes already ticked are left alone.
    async fn check_items(
        &self,
        page: &dyn Page,
        category: &str,
        items: &[String],
    ) -> Result<usize, PageError> {
        if items.is_empty() {
            return Ok(0);
        }
        let boxes = page.query_all(CHECKBOXES).await?;
        if boxes.is_empty() {
            return Ok(0);
        }

        let mut ticked = 0;
        for item in items {
            let Some(checkbox) = find_checkbox(page, &boxes, category, &item.to_lowercase()).await?
            else {
                debug!(category, item = %item, "No checkbox for item");
                continue;
            };
            if page.is_checked(checkbox).await? {
                continue;
            }
            match page.click(checkbox).await {
                Ok(()) => ticked += 1,
                Err(e) => warn!(category, item = %item, error = %e, "Failed to tick checkbox"),
            }
        }
        Ok(ticked)
    }

    async fn attach_documents(&self, page: &dyn Page, table: &DialectTable) {
        let mut cv_input = None;
        if let Some(cv) = &self.profile.cv_path {
            for selector in table.cv_upload {
                match page.query(selector).await {
                    Ok(Some(input)) => {
                        cv_input = Some(input);
                        match page.upload(input, cv).await {
                            Ok(()) => debug!(path = %cv.display(), "Uploaded CV"),
                            Err(e) => warn!(path = %cv.display(), error = %e, "CV upload failed"),
                        }
                        break;
                    }
                    Ok(None) => {}
                    Err(e) => warn!(error = %e, "CV input lookup failed"),
                }
            }
        }

        let Some(certificate) = self.profile.certificates.first() else {
            return;
        };
        match page.query(table.certificate_upload).await {
            Ok(Some(input)) if Some(input) != cv_input => {
                if let Err(e) = page.upload(input, certificate).await {
                    warn!(path = %certificate.display(), error = %e, "Certificate upload failed");
                }
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Certificate input lookup failed"),
        }
    }
}

impl std::fmt::Debug for FormAutoFiller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormAutoFiller")
            .field("letters", &self.letters)
            .field("matchers", &self.matchers.len())
            .field("snapshots", &self.snapshots)
            .field("submit_wait", &self.submit_wait)
            .finish()
    }
}

async fn fill_field(page: &dyn Page, element: ElementHandle, value: &str, field: &str) -> bool {
    match page.fill(element, value).await {
        Ok(()) => true,
        Err(e) => {
            warn!(field, error = %e, "Failed to fill field");
            false
        }
    }
}

/// Checkbox for `item` by exact value, by category name plus value
/// substring, then by label text.
async fn find_checkbox(
    page: &dyn Page,
    boxes: &[ElementHandle],
    category: &str,
    item: &str,
) -> Result<Option<ElementHandle>, PageError> {
    let mut partial = None;
    for &checkbox in boxes {
        let value = page
            .attribute(checkbox, "value")
            .await?
            .unwrap_or_default()
            .to_lowercase();
        if value == item {
            return Ok(Some(checkbox));
        }
        let name = page
            .attribute(checkbox, "name")
            .await?
            .unwrap_or_default()
            .to_lowercase();
        if partial.is_none() && name.contains(category) && !value.is_empty() && value.contains(item) {
            partial = Some(checkbox);
        }
    }
    if partial.is_some() {
        return Ok(partial);
    }

    for label in page.query_all("label[for]").await? {
        if !page.text(label).await?.to_lowercase().contains(item) {
            continue;
        }
        let Some(id) = page.attribute(label, "for").await? else {
            continue;
        };
        if id.contains('"') {
            continue;
        }
        if let Some(target) = page.query(&format!(r#"[id="{}"]"#, id)).await? {
            if boxes.contains(&target) {
                return Ok(Some(target));
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
#[path = "filler_tests.rs"]
mod tests;
