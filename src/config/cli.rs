use super::{Settings, TomlConfig};
use crate::utils::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "plans-client")]
#[command(about = "Fetch and validate pricing plans from the plans API")]
pub struct CliConfig {
    #[arg(long, env = "PLANS_API_BASE_URL", help = "API origin, e.g. http://localhost:3001")]
    pub base_url: Option<String>,

    #[arg(long, short = 'c', help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Seconds fetched plans stay fresh in the query cache")]
    pub stale_time_secs: Option<u64>,

    #[arg(long, help = "Retries after a failed fetch")]
    pub retry: Option<u32>,

    #[arg(long, help = "HTTP request timeout in seconds")]
    pub timeout_secs: Option<u64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    #[arg(long, help = "Emit JSON log lines")]
    pub json_logs: bool,

    #[arg(long, short = 'v', help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Resolve flags, the optional config file and defaults into one
    /// [`Settings`]. Flags win over the file.
    pub fn resolve(&self) -> Result<Settings> {
        let mut settings = Settings::default();

        if let Some(path) = &self.config {
            tracing::debug!("Loading config file: {}", path.display());
            let file = TomlConfig::from_file(path)?;
            settings = settings.merge_toml(&file);
        }

        if let Some(base_url) = &self.base_url {
            settings.base_url = base_url.clone();
        }
        if let Some(secs) = self.stale_time_secs {
            settings.stale_time = Duration::from_secs(secs);
        }
        if let Some(retry) = self.retry {
            settings.retry = retry;
        }
        if self.timeout_secs.is_some() {
            settings.request_timeout = crate::core::api::timeout_from_secs(self.timeout_secs);
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_without_flags() {
        let cli = CliConfig::parse_from(["plans-client"]);
        assert_eq!(cli.format, OutputFormat::Table);
        let settings = cli.resolve().unwrap();
        // PLANS_API_BASE_URL may be set in the environment running the tests
        if std::env::var("PLANS_API_BASE_URL").is_err() {
            assert_eq!(settings, Settings::default());
        }
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"
[api]
base_url = "https://from-file.example.com"
timeout_seconds = 10

[query]
stale_time_seconds = 30
retry = 1
"#,
        )
        .unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let cli = CliConfig::parse_from([
            "plans-client",
            "--config",
            &path,
            "--base-url",
            "https://from-flag.example.com",
            "--retry",
            "4",
            "--format",
            "csv",
        ]);
        let settings = cli.resolve().unwrap();

        assert_eq!(settings.base_url, "https://from-flag.example.com");
        assert_eq!(settings.retry, 4);
        assert_eq!(settings.stale_time, Duration::from_secs(30));
        assert_eq!(settings.request_timeout, Some(Duration::from_secs(10)));
        assert_eq!(cli.format, OutputFormat::Csv);
    }

    #[test]
    fn test_missing_config_file_is_io_error() {
        let cli = CliConfig::parse_from(["plans-client", "--config", "/nonexistent/plans.toml"]);
        assert!(matches!(
            cli.resolve(),
            Err(crate::utils::error::ClientError::Io(_))
        ));
    }
}
