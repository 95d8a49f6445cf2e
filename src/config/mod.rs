#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::app::toaster::ToasterOptions;
use crate::core::api::DEFAULT_BASE_URL;
use crate::query::QueryOptions;
use crate::utils::error::Result;
use crate::utils::validation::{validate_positive_number, validate_url, Validate};
use std::time::Duration;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, OutputFormat};
pub use toml_config::TomlConfig;

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn stale_time(&self) -> Duration;
    fn retry(&self) -> u32;
    fn request_timeout(&self) -> Option<Duration>;

    fn toaster_options(&self) -> ToasterOptions {
        ToasterOptions::default()
    }

    fn query_options(&self) -> QueryOptions {
        QueryOptions::default()
            .with_stale_time(self.stale_time())
            .with_retry(self.retry())
    }
}

/// Fully resolved settings: command line over config file over defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub stale_time: Duration,
    pub retry: u32,
    pub request_timeout: Option<Duration>,
    pub toaster: ToasterOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            stale_time: Duration::ZERO,
            retry: 0,
            request_timeout: None,
            toaster: ToasterOptions::default(),
        }
    }
}

impl Settings {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overlay the values present in a TOML file.
    pub fn merge_toml(mut self, file: &TomlConfig) -> Self {
        if let Some(api) = &file.api {
            if let Some(base_url) = &api.base_url {
                self.base_url = base_url.clone();
            }
            if let Some(secs) = api.timeout_seconds {
                self.request_timeout = crate::core::api::timeout_from_secs(Some(secs));
            }
        }
        if let Some(query) = &file.query {
            if let Some(secs) = query.stale_time_seconds {
                self.stale_time = Duration::from_secs(secs);
            }
            if let Some(retry) = query.retry {
                self.retry = retry;
            }
        }
        if let Some(toaster) = &file.toaster {
            self.toaster = toaster.clone();
        }
        self
    }
}

impl ConfigProvider for Settings {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn stale_time(&self) -> Duration {
        self.stale_time
    }

    fn retry(&self) -> u32 {
        self.retry
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    fn toaster_options(&self) -> ToasterOptions {
        self.toaster.clone()
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("base_url", &self.base_url)?;
        validate_positive_number("toaster.visible_toasts", self.toaster.visible_toasts, 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert_eq!(settings.base_url(), "http://localhost:3001");
        assert!(settings.validate().is_ok());
        assert_eq!(settings.query_options(), QueryOptions::default());
    }

    #[test]
    fn test_merge_toml_overrides_present_values_only() {
        let file = TomlConfig::from_toml_str(
            r#"
[api]
base_url = "https://plans.example.com"

[query]
retry = 2
"#,
        )
        .unwrap();

        let settings = Settings::default().merge_toml(&file);
        assert_eq!(settings.base_url, "https://plans.example.com");
        assert_eq!(settings.retry, 2);
        assert_eq!(settings.stale_time, Duration::ZERO);
        assert_eq!(settings.request_timeout, None);
        assert_eq!(settings.toaster, ToasterOptions::default());
    }

    #[test]
    fn test_invalid_visible_toasts_rejected() {
        let mut settings = Settings::default();
        settings.toaster.visible_toasts = 0;
        assert!(settings.validate().is_err());
    }
}
