use crate::detector::DetectorConfig;
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_REGISTRY_URL: &str = "https://registry.devfile.io";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_DETECT_DEPTH: usize = 5;
const DEFAULT_MAX_DETECT_FILES: usize = 5000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

#[derive(Debug, Clone)]
pub struct DevscoutConfig {
    pub registry_url: String,
    pub request_timeout_secs: u64,
    pub log_level: String,
    pub max_detect_depth: usize,
    pub max_detect_files: usize,
    pub git_token: Option<String>,
}

impl Default for DevscoutConfig {
    fn default() -> Self {
        let registry_url = env::var("DEVSCOUT_REGISTRY_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REGISTRY_URL.to_string());

        let request_timeout_secs = env::var("DEVSCOUT_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let log_level = env::var("DEVSCOUT_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        let max_detect_depth = env::var("DEVSCOUT_MAX_DETECT_DEPTH")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_DETECT_DEPTH);

        let max_detect_files = env::var("DEVSCOUT_MAX_DETECT_FILES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_DETECT_FILES);

        let git_token = env::var("DEVSCOUT_GIT_TOKEN")
            .ok()
            .filter(|v| !v.is_empty());

        Self {
            registry_url,
            request_timeout_secs,
            log_level,
            max_detect_depth,
            max_detect_files,
            git_token,
        }
    }
}

impl DevscoutConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.registry_url.starts_with("http://") && !self.registry_url.starts_with("https://") {
            return Err(ConfigError::ValidationFailed(format!(
                "Registry URL must be an http(s) URL: {}",
                self.registry_url
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if self.request_timeout_secs > 3600 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout cannot exceed 1 hour".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        if self.max_detect_depth == 0 || self.max_detect_depth > 32 {
            return Err(ConfigError::ValidationFailed(
                "Max detection depth must be between 1 and 32".to_string(),
            ));
        }

        if self.max_detect_files < 10 {
            return Err(ConfigError::ValidationFailed(
                "Max detection files must be at least 10".to_string(),
            ));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Settings as strings for structured output; the token is never shown
    pub fn to_display_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert("registry_url".to_string(), self.registry_url.clone());
        map.insert(
            "request_timeout_secs".to_string(),
            self.request_timeout_secs.to_string(),
        );
        map.insert("log_level".to_string(), self.log_level.clone());
        map.insert(
            "max_detect_depth".to_string(),
            self.max_detect_depth.to_string(),
        );
        map.insert(
            "max_detect_files".to_string(),
            self.max_detect_files.to_string(),
        );
        map.insert(
            "git_token".to_string(),
            if self.git_token.is_some() { "set" } else { "not set" }.to_string(),
        );
        map
    }

    pub fn detector_config(&self) -> DetectorConfig {
        DetectorConfig {
            max_depth: self.max_detect_depth,
            max_files: self.max_detect_files,
            ..Default::default()
        }
    }
}

impl fmt::Display for DevscoutConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Devscout Configuration:")?;
        writeln!(f, "  Registry URL: {}", self.registry_url)?;
        writeln!(f, "  Request Timeout: {}s", self.request_timeout_secs)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        writeln!(f, "  Max Detection Depth: {}", self.max_detect_depth)?;
        writeln!(f, "  Max Detection Files: {}", self.max_detect_files)?;
        writeln!(
            f,
            "  Git Token: {}",
            if self.git_token.is_some() { "set" } else { "not set" }
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards = [
            EnvGuard::unset("DEVSCOUT_REGISTRY_URL"),
            EnvGuard::unset("DEVSCOUT_REQUEST_TIMEOUT"),
            EnvGuard::unset("DEVSCOUT_LOG_LEVEL"),
            EnvGuard::unset("DEVSCOUT_MAX_DETECT_DEPTH"),
            EnvGuard::unset("DEVSCOUT_MAX_DETECT_FILES"),
            EnvGuard::unset("DEVSCOUT_GIT_TOKEN"),
        ];

        let config = DevscoutConfig::default();

        assert_eq!(config.registry_url, DEFAULT_REGISTRY_URL);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.max_detect_depth, DEFAULT_MAX_DETECT_DEPTH);
        assert_eq!(config.max_detect_files, DEFAULT_MAX_DETECT_FILES);
        assert!(config.git_token.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _guards = [
            EnvGuard::set("DEVSCOUT_REGISTRY_URL", "https://registry.example.com"),
            EnvGuard::set("DEVSCOUT_REQUEST_TIMEOUT", "60"),
            EnvGuard::set("DEVSCOUT_LOG_LEVEL", "DEBUG"),
            EnvGuard::set("DEVSCOUT_MAX_DETECT_DEPTH", "3"),
            EnvGuard::set("DEVSCOUT_MAX_DETECT_FILES", "100"),
            EnvGuard::set("DEVSCOUT_GIT_TOKEN", "ghp_secret"),
        ];

        let config = DevscoutConfig::default();

        assert_eq!(config.registry_url, "https://registry.example.com");
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.detector_config().max_depth, 3);
        assert_eq!(config.detector_config().max_files, 100);
        assert_eq!(config.git_token.as_deref(), Some("ghp_secret"));
    }

    #[test]
    #[serial]
    fn test_unparseable_values_fall_back_to_defaults() {
        let _guards = [
            EnvGuard::set("DEVSCOUT_REQUEST_TIMEOUT", "soon"),
            EnvGuard::set("DEVSCOUT_MAX_DETECT_DEPTH", "-1"),
        ];

        let config = DevscoutConfig::default();
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(config.max_detect_depth, DEFAULT_MAX_DETECT_DEPTH);
    }

    #[test]
    fn test_configuration_validation() {
        let valid = DevscoutConfig {
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            request_timeout_secs: 30,
            log_level: "info".to_string(),
            max_detect_depth: 5,
            max_detect_files: 5000,
            git_token: None,
        };
        assert!(valid.validate().is_ok());

        let cases = [
            DevscoutConfig {
                request_timeout_secs: 0,
                ..valid.clone()
            },
            DevscoutConfig {
                request_timeout_secs: 7200,
                ..valid.clone()
            },
            DevscoutConfig {
                log_level: "verbose".to_string(),
                ..valid.clone()
            },
            DevscoutConfig {
                max_detect_depth: 0,
                ..valid.clone()
            },
            DevscoutConfig {
                max_detect_files: 5,
                ..valid.clone()
            },
            DevscoutConfig {
                registry_url: "registry.devfile.io".to_string(),
                ..valid.clone()
            },
        ];

        for config in cases {
            assert!(matches!(config.validate(), Err(ConfigError::ValidationFailed(_))));
        }
    }

    #[test]
    #[serial]
    fn test_display_hides_token() {
        let config = DevscoutConfig {
            git_token: Some("ghp_secret".to_string()),
            ..DevscoutConfig::default()
        };
        let output = config.to_string();
        assert!(output.contains("Registry URL"));
        assert!(output.contains("Git Token: set"));
        assert!(!output.contains("ghp_secret"));

        let map = config.to_display_map();
        assert_eq!(map["git_token"], "set");
        assert!(!map.values().any(|v| v.contains("ghp_secret")));
    }
}
