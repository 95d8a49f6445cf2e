use crate::app::toaster::ToasterOptions;
use crate::utils::error::{ClientError, Result};
use crate::utils::validation::{validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub api: Option<ApiSection>,
    pub query: Option<QuerySection>,
    pub toaster: Option<ToasterOptions>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiSection {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuerySection {
    pub stale_time_seconds: Option<u64>,
    pub retry: Option<u32>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex is valid"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ClientError::Io)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| ClientError::ConfigParse {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PLANS_API_BASE_URL})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn base_url(&self) -> Option<&str> {
        self.api.as_ref().and_then(|a| a.base_url.as_deref())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(base_url) = self.base_url() {
            validate_url("api.base_url", base_url)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::toaster::ToasterPosition;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let config = TomlConfig::from_toml_str(
            r#"
[api]
base_url = "https://api.example.com"
timeout_seconds = 5

[query]
stale_time_seconds = 60
retry = 3

[toaster]
position = "bottom-right"
rich_colors = false
visible_toasts = 5
"#,
        )
        .unwrap();

        assert_eq!(config.base_url(), Some("https://api.example.com"));
        assert_eq!(config.api.as_ref().unwrap().timeout_seconds, Some(5));
        let query = config.query.as_ref().unwrap();
        assert_eq!(query.stale_time_seconds, Some(60));
        assert_eq!(query.retry, Some(3));
        let toaster = config.toaster.as_ref().unwrap();
        assert_eq!(toaster.position, ToasterPosition::BottomRight);
        assert!(!toaster.rich_colors);
        assert_eq!(toaster.visible_toasts, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.api.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PLANS_TEST_BASE_URL", "https://env.example.com");

        let config = TomlConfig::from_toml_str(
            r#"
[api]
base_url = "${PLANS_TEST_BASE_URL}"
"#,
        )
        .unwrap();
        assert_eq!(config.base_url(), Some("https://env.example.com"));

        std::env::remove_var("PLANS_TEST_BASE_URL");
    }

    #[test]
    fn test_unset_env_var_left_in_place() {
        let config = TomlConfig::from_toml_str(
            r#"
[api]
base_url = "${PLANS_TEST_DEFINITELY_UNSET}"
"#,
        )
        .unwrap();
        assert_eq!(config.base_url(), Some("${PLANS_TEST_DEFINITELY_UNSET}"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = TomlConfig::from_toml_str("[api\nbase_url = ").unwrap_err();
        assert!(matches!(err, ClientError::ConfigParse { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[query]\nretry = 1\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.query.unwrap().retry, Some(1));
    }
}
