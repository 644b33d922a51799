//! Form dialects and their selector tables.

use std::fmt;

use tracing::debug;

use crewhands_protocols::{Page, PageError};

use crate::mapping::ProfileField;

/// Bumped whenever a selector table below changes.
pub const FORM_SELECTOR_VERSION: u32 = 1;

/// Which family of application form is on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Yotspot,
    YaCrew,
    Generic,
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Yotspot => "yotspot",
            Dialect::YaCrew => "yacrew",
            Dialect::Generic => "generic",
        }
    }

    /// Fixed field table; empty for [`Dialect::Generic`], which matches by
    /// label patterns instead.
    pub fn table(&self) -> &'static DialectTable {
        match self {
            Dialect::Yotspot => &YOTSPOT_FORM,
            Dialect::YaCrew => &YACREW_FORM,
            Dialect::Generic => &GENERIC_FORM,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable selector data for one dialect.
#[derive(Debug)]
pub struct DialectTable {
    /// Selector to profile field, filled in order.
    pub fields: &'static [(&'static str, ProfileField)],
    /// Tick certification and language checkboxes.
    pub checkboxes: bool,
    /// CV file input selectors, tried in order.
    pub cv_upload: &'static [&'static str],
    pub certificate_upload: &'static str,
    pub submit: &'static str,
}

const CERTIFICATE_UPLOAD: &str = r#"input[type="file"][name*="certificate"]"#;

static YOTSPOT_FORM: DialectTable = DialectTable {
    fields: &[
        (
            r#"input[name="first_name"], input[id="firstName"], input[placeholder*="First"]"#,
            ProfileField::FirstName,
        ),
        (
            r#"input[name="last_name"], input[id="lastName"], input[placeholder*="Last"]"#,
            ProfileField::LastName,
        ),
        (
            r#"input[name="email"], input[type="email"], input[id="email"]"#,
            ProfileField::Email,
        ),
        (
            r#"input[name="phone"], input[type="tel"], input[id="phone"]"#,
            ProfileField::Phone,
        ),
        (
            r#"input[name="nationality"], select[name="nationality"]"#,
            ProfileField::Nationality,
        ),
        (
            r#"textarea[name="message"], textarea[name="cover_letter"], textarea[id="message"]"#,
            ProfileField::CoverLetter,
        ),
        (
            r#"textarea[name="experience"], textarea[id="experience"]"#,
            ProfileField::ExperienceSummary,
        ),
    ],
    checkboxes: false,
    cv_upload: &[r#"input[type="file"][name*="cv"], input[type="file"][name*="resume"]"#],
    certificate_upload: CERTIFICATE_UPLOAD,
    submit: r#"button[type="submit"], .apply-btn, input[type="submit"]"#,
};

static YACREW_FORM: DialectTable = DialectTable {
    fields: &[
        (
            r#"input[name="firstName"], input[id="first-name"]"#,
            ProfileField::FirstName,
        ),
        (
            r#"input[name="lastName"], input[id="last-name"]"#,
            ProfileField::LastName,
        ),
        (r#"input[name="email"], input[type="email"]"#, ProfileField::Email),
        (r#"input[name="phone"], input[type="tel"]"#, ProfileField::Phone),
        (
            r#"input[name="currentPosition"], input[id="position"]"#,
            ProfileField::CurrentPosition,
        ),
        (
            r#"select[name="yearsExperience"], input[name="experience"]"#,
            ProfileField::YearsExperience,
        ),
        (
            r#"textarea[name="coverLetter"], textarea[name="message"]"#,
            ProfileField::CoverLetter,
        ),
        (
            r#"textarea[name="availability"], input[name="availableFrom"]"#,
            ProfileField::AvailableFrom,
        ),
    ],
    checkboxes: true,
    cv_upload: &[r#"input[type="file"][accept*=".pdf"], input[type="file"][name*="cv"]"#],
    certificate_upload: CERTIFICATE_UPLOAD,
    submit: r#"button[type="submit"], .submit-application, .btn-apply"#,
};

static GENERIC_FORM: DialectTable = DialectTable {
    fields: &[],
    checkboxes: true,
    cv_upload: &[
        r#"input[type="file"][name*="cv"], input[type="file"][name*="resume"]"#,
        r#"input[type="file"]"#,
    ],
    certificate_upload: CERTIFICATE_UPLOAD,
    submit: r#"button[type="submit"], input[type="submit"], .apply, .submit"#,
};

const YOTSPOT_MARKERS: &str = r#".yotspot-form, [data-platform="yotspot"]"#;
const YACREW_MARKERS: &str = r#".yacrew-form, [data-platform="yacrew"]"#;

/// Detect the dialect from the URL, then from marker elements.
pub async fn detect_dialect(page: &dyn Page) -> Result<Dialect, PageError> {
    let url = page.current_url().await?.to_lowercase();
    let dialect = if url.contains("yotspot.com") {
        Dialect::Yotspot
    } else if url.contains("yacrew.com") {
        Dialect::YaCrew
    } else if page.query(YOTSPOT_MARKERS).await?.is_some() {
        Dialect::Yotspot
    } else if page.query(YACREW_MARKERS).await?.is_some() {
        Dialect::YaCrew
    } else {
        Dialect::Generic
    };
    debug!(%dialect, url = %url, "Detected form dialect");
    Ok(dialect)
}
