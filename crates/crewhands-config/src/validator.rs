//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::{Config, EndpointConfig, KNOWN_SITES};

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn a result with errors into [`ConfigError::Invalid`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        if self.is_valid() {
            Ok(self.warnings)
        } else {
            Err(ConfigError::Invalid(self.errors.len()))
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_sites(config, &mut result);
        Self::validate_scraping(config, &mut result);
        Self::validate_rate_limit(config, &mut result);
        Self::validate_proxy(config, &mut result);
        Self::validate_apply(config, &mut result);
        Self::validate_filters(config, &mut result);
        Self::validate_endpoint("sink", &config.sink, &mut result);
        Self::validate_endpoint("text_generator", &config.text_generator, &mut result);

        result
    }

    fn validate_sites(config: &Config, result: &mut ValidationResult) {
        if config.sites.enabled.is_empty() {
            result.add_warning(ValidationWarning::new(
                "sites.enabled",
                "No sites are enabled, the scrape phase will collect nothing",
            ));
        }

        for site in &config.sites.enabled {
            if site.trim().is_empty() {
                result.add_error(ValidationError::new(
                    "sites.enabled",
                    "Site names cannot be empty",
                ));
            } else if !KNOWN_SITES.contains(&site.to_lowercase().as_str()) {
                result.add_error(ValidationError::new(
                    "sites.enabled",
                    format!("Unknown site '{}', valid values: {:?}", site, KNOWN_SITES),
                ));
            }
        }

        for name in KNOWN_SITES {
            let Some(site) = config.sites.site(name) else {
                continue;
            };
            if config.sites.is_enabled(name) && site.credentials().is_none() {
                result.add_warning(ValidationWarning::new(
                    format!("sites.{}.email", name),
                    "Credentials not set, the site will be scraped unauthenticated",
                ));
            }
            for (field, value) in [
                ("base_url", &site.base_url),
                ("login_url", &site.login_url),
                ("jobs_url", &site.jobs_url),
            ] {
                if let Some(url) = value {
                    if !url.starts_with("http://") && !url.starts_with("https://") {
                        result.add_error(ValidationError::new(
                            format!("sites.{}.{}", name, field),
                            "URL must start with http:// or https://",
                        ));
                    }
                }
            }
        }
    }

    fn validate_scraping(config: &Config, result: &mut ValidationResult) {
        let scraping = &config.scraping;
        if scraping.timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "scraping.timeout_ms",
                "timeout_ms must be greater than 0",
            ));
        }

        if scraping.run_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "scraping.run_timeout_secs",
                "run_timeout_secs must be greater than 0",
            ));
        }

        if scraping.retries == 0 {
            result.add_error(ValidationError::new(
                "scraping.retries",
                "retries must be at least 1",
            ));
        }

        if scraping.base_debug_port == 0 {
            result.add_error(ValidationError::new(
                "scraping.base_debug_port",
                "Port cannot be 0",
            ));
        }

        if scraping.page_delay_ms < 500 {
            result.add_warning(ValidationWarning::new(
                "scraping.page_delay_ms",
                "page_delay_ms is very low (<500), sites may block the session",
            ));
        }

        if let Some(path) = &scraping.chrome_path {
            if !path.exists() {
                result.add_warning(ValidationWarning::new(
                    "scraping.chrome_path",
                    format!("Chrome binary does not exist: {:?}", path),
                ));
            }
        }
    }

    fn validate_rate_limit(config: &Config, result: &mut ValidationResult) {
        if config.rate_limit.requests_per_minute == 0 {
            result.add_error(ValidationError::new(
                "rate_limit.requests_per_minute",
                "requests_per_minute must be greater than 0",
            ));
        }

        if config.rate_limit.burst_size == 0 {
            result.add_error(ValidationError::new(
                "rate_limit.burst_size",
                "burst_size must be greater than 0",
            ));
        }

        if config.rate_limit.requests_per_minute > 120 {
            result.add_warning(ValidationWarning::new(
                "rate_limit.requests_per_minute",
                "requests_per_minute is very high (>120), sites may block the session",
            ));
        }
    }

    fn validate_proxy(config: &Config, result: &mut ValidationResult) {
        if config.proxy.enabled && config.proxy.routes.is_empty() {
            result.add_warning(ValidationWarning::new(
                "proxy.routes",
                "Proxy rotation is enabled but no routes are configured",
            ));
        }

        for route in &config.proxy.routes {
            let scheme_ok = ["http://", "https://", "socks5://"]
                .iter()
                .any(|scheme| route.starts_with(scheme));
            if !scheme_ok {
                result.add_error(ValidationError::new(
                    "proxy.routes",
                    format!("Proxy route '{}' must start with http://, https:// or socks5://", route),
                ));
            }
        }

        if config.proxy.probe_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "proxy.probe_timeout_secs",
                "probe_timeout_secs must be greater than 0",
            ));
        }
    }

    fn validate_apply(config: &Config, result: &mut ValidationResult) {
        let apply = &config.apply;
        if !apply.enabled {
            return;
        }

        match &apply.profile_path {
            None => result.add_error(ValidationError::new(
                "apply.profile_path",
                "Auto-apply is enabled but no applicant profile is set",
            )),
            Some(path) if !path.exists() => result.add_warning(ValidationWarning::new(
                "apply.profile_path",
                format!("Profile file does not exist: {:?}", path),
            )),
            Some(_) => {}
        }

        if apply.max_applications == 0 {
            result.add_warning(ValidationWarning::new(
                "apply.max_applications",
                "max_applications is 0, no applications will be submitted",
            ));
        }
    }

    fn validate_filters(config: &Config, result: &mut ValidationResult) {
        if let Some(min) = config.filters.min_salary {
            if min < 0.0 || !min.is_finite() {
                result.add_error(ValidationError::new(
                    "filters.min_salary",
                    "min_salary must be a non-negative number",
                ));
            }
        }
    }

    fn validate_endpoint(section: &str, endpoint: &EndpointConfig, result: &mut ValidationResult) {
        if let Some(url) = &endpoint.endpoint {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                result.add_error(ValidationError::new(
                    format!("{}.endpoint", section),
                    "endpoint must start with http:// or https://",
                ));
            }
            if endpoint.token.is_none() {
                result.add_warning(ValidationWarning::new(
                    format!("{}.token", section),
                    "Token is not set, requests will be unauthenticated",
                ));
            }
        }

        if endpoint.timeout_secs == 0 {
            result.add_error(ValidationError::new(
                format!("{}.timeout_secs", section),
                "timeout_secs must be greater than 0",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
