    use super::*;
    use crate::schema::SiteConfig;

    fn with_credentials(mut config: Config) -> Config {
        let site = SiteConfig {
            email: Some("crew@example.com".to_string()),
            password: Some("secret".to_string()),
            ..Default::default()
        };
        config.sites.yotspot = site.clone();
        config.sites.yacrew = site;
        config
    }

    #[test]
    fn test_validate_default_config() {
        let config = Config::default();
        let result = ConfigValidator::validate(&config);
        assert!(result.is_valid());
    }

    #[test]
    fn test_missing_credentials_warns() {
        let result = ConfigValidator::validate(&Config::default());
        assert!(result.warnings.iter().any(|w| w.path == "sites.yotspot.email"));
        assert!(result.warnings.iter().any(|w| w.path == "sites.yacrew.email"));

        let result = ConfigValidator::validate(&with_credentials(Config::default()));
        assert!(!result.warnings.iter().any(|w| w.path.ends_with(".email")));
    }

    #[test]
    fn test_validate_zero_rate() {
        let mut config = Config::default();
        config.rate_limit.requests_per_minute = 0;
        config.rate_limit.burst_size = 0;

        let result = ConfigValidator::validate(&config);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.path == "rate_limit.requests_per_minute"));
        assert!(result.errors.iter().any(|e| e.path == "rate_limit.burst_size"));
    }

    #[test]
    fn test_validate_high_rate_warning() {
        let mut config = Config::default();
        config.rate_limit.requests_per_minute = 500;

        let result = ConfigValidator::validate(&config);
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.path == "rate_limit.requests_per_minute"));
    }

    #[test]
    fn test_validate_unknown_site() {
        let mut config = Config::default();
        config.sites.enabled.push("crewseekers".to_string());

        let result = ConfigValidator::validate(&config);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("crewseekers")));
    }

    #[test]
    fn test_validate_empty_site_entry() {
        let mut config = Config::default();
        config.sites.enabled.push("  ".to_string());

        let result = ConfigValidator::validate(&config);
        assert!(!result.is_valid());
    }

    #[test]
    fn test_validate_no_sites_warns() {
        let mut config = Config::default();
        config.sites.enabled.clear();

        let result = ConfigValidator::validate(&config);
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.path == "sites.enabled"));
    }

    #[test]
    fn test_validate_site_url() {
        let mut config = Config::default();
        config.sites.yacrew.jobs_url = Some("www.yacrew.com/jobs".to_string());

        let result = ConfigValidator::validate(&config);
        assert!(result.errors.iter().any(|e| e.path == "sites.yacrew.jobs_url"));
    }

    #[test]
    fn test_validate_zero_timeouts() {
        let mut config = Config::default();
        config.scraping.timeout_ms = 0;
        config.scraping.run_timeout_secs = 0;

        let result = ConfigValidator::validate(&config);
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_validate_proxy_routes() {
        let mut config = Config::default();
        config.proxy.enabled = true;

        let result = ConfigValidator::validate(&config);
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.path == "proxy.routes"));

        config.proxy.routes = vec![
            "http://10.0.0.1:8080".to_string(),
            "10.0.0.2:8080".to_string(),
        ];
        let result = ConfigValidator::validate(&config);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].message.contains("10.0.0.2"));
    }

    #[test]
    fn test_validate_apply_requires_profile() {
        let mut config = Config::default();
        config.apply.enabled = true;

        let result = ConfigValidator::validate(&config);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.path == "apply.profile_path"));
    }

    #[test]
    fn test_validate_apply_missing_profile_file_warns() {
        let mut config = Config::default();
        config.apply.enabled = true;
        config.apply.profile_path = Some("/nonexistent/profile.json".into());

        let result = ConfigValidator::validate(&config);
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.path == "apply.profile_path"));
    }

    #[test]
    fn test_validate_apply_existing_profile() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.apply.enabled = true;
        config.apply.profile_path = Some(file.path().to_path_buf());

        let result = ConfigValidator::validate(&config);
        assert!(result.is_valid());
        assert!(!result.warnings.iter().any(|w| w.path == "apply.profile_path"));
    }

    #[test]
    fn test_validate_negative_min_salary() {
        let mut config = Config::default();
        config.filters.min_salary = Some(-1.0);

        let result = ConfigValidator::validate(&config);
        assert!(result.errors.iter().any(|e| e.path == "filters.min_salary"));
    }

    #[test]
    fn test_validate_sink_endpoint() {
        let mut config = Config::default();
        config.sink.endpoint = Some("localhost:5000".to_string());

        let result = ConfigValidator::validate(&config);
        assert!(result.errors.iter().any(|e| e.path == "sink.endpoint"));
        assert!(result.warnings.iter().any(|w| w.path == "sink.token"));
    }

    #[test]
    fn test_into_result() {
        let ok = ConfigValidator::validate(&Config::default()).into_result();
        assert!(ok.is_ok());

        let mut config = Config::default();
        config.rate_limit.burst_size = 0;
        let err = ConfigValidator::validate(&config).into_result().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(1)));
    }
