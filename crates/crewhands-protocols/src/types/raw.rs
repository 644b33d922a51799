//! Raw page records.

use serde::{Deserialize, Serialize};

/// Fields lifted straight off a listing card or detail page.
///
/// Every field is optional; partial records are expected and are sorted out
/// by the normalizer's validation step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    pub title: Option<String>,
    pub position: Option<String>,
    pub vessel_name: Option<String>,
    pub vessel_type: Option<String>,
    pub vessel_length: Option<String>,
    pub vessel_flag: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub description: Option<String>,
    pub posted_date: Option<String>,
    pub expires_at: Option<String>,
    pub employment_type: Option<String>,
    pub start_date: Option<String>,
    pub company_name: Option<String>,
    pub contact_email: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
}

impl RawRecord {
    /// Create a record carrying only a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Fill absent fields from `details` and replace the description and
    /// list fields when the detail page has richer content.
    pub fn merge_details(&mut self, details: RawRecord) {
        if details.description.as_deref().is_some_and(|d| !d.trim().is_empty()) {
            self.description = details.description;
        }
        if !details.requirements.is_empty() {
            self.requirements = details.requirements;
        }
        if !details.benefits.is_empty() {
            self.benefits = details.benefits;
        }
        self.company_name = self.company_name.take().or(details.company_name);
        self.contact_email = self.contact_email.take().or(details.contact_email);
        self.start_date = self.start_date.take().or(details.start_date);
        self.expires_at = self.expires_at.take().or(details.expires_at);
    }
}
