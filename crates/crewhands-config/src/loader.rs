//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ConfigError;
use crate::schema::Config;

static ENV_VAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a file, or defaults when the file is absent.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::NotFound(_)) => {
                let mut config = Config::default();
                Self::expand_paths(&mut config);
                Ok(config)
            }
            other => other,
        }
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let mut config: Config = toml::from_str(&expanded)?;
        Self::expand_paths(&mut config);
        Ok(config)
    }

    /// Expand environment variables in the format `${VAR}`.
    ///
    /// Comment lines are left alone so documented placeholders do not need
    /// to be set.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut lines = Vec::new();
        for line in content.lines() {
            if line.trim_start().starts_with('#') {
                lines.push(line.to_string());
                continue;
            }
            let mut expanded = line.to_string();
            for cap in ENV_VAR.captures_iter(line) {
                let var_name = &cap[1];
                let var_value = std::env::var(var_name)
                    .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
                expanded = expanded.replace(&cap[0], &var_value);
            }
            lines.push(expanded);
        }
        Ok(lines.join("\n"))
    }

    /// Expand shell-style paths (e.g., `~/crew`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }

    fn expand_path_buf(path: &Path) -> PathBuf {
        PathBuf::from(Self::expand_path(&path.to_string_lossy()))
    }

    fn expand_paths(config: &mut Config) {
        config.scraping.output_dir = Self::expand_path_buf(&config.scraping.output_dir);
        config.storage.data_dir = Self::expand_path_buf(&config.storage.data_dir);
        config.apply.snapshot_dir = Self::expand_path_buf(&config.apply.snapshot_dir);
        if let Some(path) = config.apply.profile_path.as_deref() {
            config.apply.profile_path = Some(Self::expand_path_buf(path));
        }
        if let Some(path) = config.scraping.chrome_path.as_deref() {
            config.scraping.chrome_path = Some(Self::expand_path_buf(path));
        }
    }
}
