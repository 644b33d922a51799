//! Per-site structural rules.
//!
//! Everything a [`BoardAdapter`](crate::BoardAdapter) knows about a job board
//! lives here as immutable data. Selector tables are versioned with
//! [`SELECTOR_VERSION`]; bump it whenever a table changes so dumps can be
//! traced back to the rules that produced them.

use crewhands_config::SiteConfig;
use crewhands_protocols::Source;

pub const SELECTOR_VERSION: u32 = 1;

/// One locator per listing-card field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorTable {
    pub card: &'static str,
    pub title: &'static str,
    pub position: &'static str,
    pub vessel: &'static str,
    pub location: &'static str,
    pub salary: &'static str,
    pub description: &'static str,
    pub posted_date: &'static str,
    pub link: &'static str,
    pub vessel_type: Option<&'static str>,
    pub employment_type: Option<&'static str>,
    /// Read a "<n> m" vessel length out of the card's text.
    pub length_from_text: bool,
}

/// Locators on a job detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailSelectors {
    pub description: &'static str,
    pub requirements: &'static str,
    pub benefits: &'static str,
    pub company: &'static str,
    pub contact: &'static str,
    pub start_date: Option<&'static str>,
}

/// Login form locators and the rule for recognising a successful login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginRules {
    pub email: &'static str,
    pub password: &'static str,
    pub submit: &'static str,
    /// Any URL that no longer contains "login" counts as logged in.
    pub left_login_page_is_success: bool,
}

impl LoginRules {
    pub fn is_success(&self, url: &str) -> bool {
        let url = url.to_lowercase();
        url.contains("dashboard")
            || url.contains("profile")
            || (self.left_login_page_is_success && !url.contains("login"))
    }
}

/// How a board exposes more results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// A "next page" control that navigates.
    NextControl { selector: &'static str },
    /// A "load more" control when visible, otherwise scroll-to-extend.
    Scroll { load_more: &'static str },
}

pub const NEXT_CONTROL: &str = r#".pagination .next, .next-page, [rel="next"]"#;
pub const LOAD_MORE: &str = ".load-more, .show-more";

pub const YOTSPOT_SELECTORS: SelectorTable = SelectorTable {
    card: ".job-card, .job-listing, [data-job-id]",
    title: ".job-title, h2, h3",
    position: ".position, .job-position",
    vessel: ".vessel-name, .yacht-name",
    location: ".location, .job-location",
    salary: ".salary, .job-salary",
    description: ".description, .job-description",
    posted_date: ".posted-date, .date-posted",
    link: "a[href]",
    vessel_type: None,
    employment_type: None,
    length_from_text: false,
};

pub const YACREW_SELECTORS: SelectorTable = SelectorTable {
    card: ".job-item, .listing-item, [data-listing]",
    title: ".job-title, .listing-title, h2",
    position: ".position-title, .role",
    vessel: ".vessel, .yacht-name, .boat-name",
    location: ".job-location, .location",
    salary: ".salary, .pay-range",
    description: ".job-desc, .description",
    posted_date: ".posted, .date",
    link: "a[href]",
    vessel_type: Some(".vessel-type, .yacht-type"),
    employment_type: Some(".employment-type, .contract-type"),
    length_from_text: true,
};

pub const YOTSPOT_DETAILS: DetailSelectors = DetailSelectors {
    description: ".job-description, .description, [data-description]",
    requirements: ".requirements li, .qualifications li",
    benefits: ".benefits li",
    company: ".company-name, .employer-name",
    contact: r#"a[href^="mailto:"]"#,
    start_date: None,
};

pub const YACREW_DETAILS: DetailSelectors = DetailSelectors {
    description: ".job-description, .description, .job-details",
    requirements: ".requirements li, .qualifications li, .skills li",
    benefits: ".benefits li, .perks li",
    company: ".company-name, .employer-name, .yacht-name",
    contact: r#"a[href^="mailto:"]"#,
    start_date: Some(".start-date, .commencement"),
};

pub const YOTSPOT_LOGIN: LoginRules = LoginRules {
    email: r#"input[type="email"], input[name="email"], #email"#,
    password: r#"input[type="password"], input[name="password"], #password"#,
    submit: r#"button[type="submit"], input[type="submit"], .login-btn"#,
    left_login_page_is_success: false,
};

pub const YACREW_LOGIN: LoginRules = LoginRules {
    email: r#"input[type="email"], input[name="email"], #email, input[placeholder*="email"], input[placeholder*="Email"]"#,
    password: r#"input[type="password"], input[name="password"], #password"#,
    submit: r#"button[type="submit"], input[type="submit"], .login-btn"#,
    left_login_page_is_success: true,
};

/// A job board: addresses, structural rules and limits.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteDefinition {
    pub source: Source,
    pub base_url: String,
    pub login_url: String,
    pub jobs_url: String,
    /// Query parameter carrying the vessel type filter.
    pub vessel_param: &'static str,
    pub pagination: Pagination,
    /// Page limit (next control) or scroll limit (scroll).
    pub max_iterations: u32,
    pub selectors: SelectorTable,
    pub details: DetailSelectors,
    pub login: LoginRules,
}

impl SiteDefinition {
    pub fn yotspot() -> Self {
        Self {
            source: Source::Yotspot,
            base_url: "https://www.yotspot.com".to_string(),
            login_url: "https://www.yotspot.com/login".to_string(),
            jobs_url: "https://www.yotspot.com/jobs".to_string(),
            vessel_param: "vessel_type",
            pagination: Pagination::NextControl {
                selector: NEXT_CONTROL,
            },
            max_iterations: 5,
            selectors: YOTSPOT_SELECTORS,
            details: YOTSPOT_DETAILS,
            login: YOTSPOT_LOGIN,
        }
    }

    pub fn yacrew() -> Self {
        Self {
            source: Source::YaCrew,
            base_url: "https://www.yacrew.com".to_string(),
            login_url: "https://www.yacrew.com/login".to_string(),
            jobs_url: "https://www.yacrew.com/jobs".to_string(),
            vessel_param: "vessel",
            pagination: Pagination::Scroll {
                load_more: LOAD_MORE,
            },
            max_iterations: 10,
            selectors: YACREW_SELECTORS,
            details: YACREW_DETAILS,
            login: YACREW_LOGIN,
        }
    }

    pub fn for_source(source: Source) -> Self {
        match source {
            Source::Yotspot => Self::yotspot(),
            Source::YaCrew => Self::yacrew(),
        }
    }

    /// Apply URL overrides and the limit matching this site's pagination.
    pub fn configure(mut self, config: &SiteConfig) -> Self {
        if let Some(url) = &config.base_url {
            self.base_url = url.clone();
        }
        if let Some(url) = &config.login_url {
            self.login_url = url.clone();
        }
        if let Some(url) = &config.jobs_url {
            self.jobs_url = url.clone();
        }
        self.max_iterations = match self.pagination {
            Pagination::NextControl { .. } => config.max_pages,
            Pagination::Scroll { .. } => config.max_scrolls,
        };
        self
    }
}
