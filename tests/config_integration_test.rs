use anyhow::Result;
use httpmock::prelude::*;
use plans_client::app::ToasterPosition;
use plans_client::config::TomlConfig;
use plans_client::utils::validation::Validate;
use plans_client::{use_plans, ConfigProvider, RootLayout, Settings};
use std::time::Duration;
use tempfile::TempDir;

#[tokio::test]
async fn test_layout_from_toml_file() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/plans");
        then.status(200).json_body(serde_json::json!([]));
    });

    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("plans.toml");
    let config_content = format!(
        r#"
[api]
base_url = "{}/api"
timeout_seconds = 5

[query]
stale_time_seconds = 120
retry = 0

[toaster]
position = "bottom-center"
visible_toasts = 1
"#,
        server.base_url()
    );
    tokio::fs::write(&config_path, config_content).await?;

    let file = TomlConfig::from_file(&config_path)?;
    file.validate()?;
    let settings = Settings::default().merge_toml(&file);
    settings.validate()?;

    assert_eq!(settings.stale_time(), Duration::from_secs(120));
    assert_eq!(settings.request_timeout(), Some(Duration::from_secs(5)));
    assert_eq!(settings.toaster_options().position, ToasterPosition::BottomCenter);

    let layout = RootLayout::new(&settings)?;
    let result = use_plans(layout.context()).await;

    api_mock.assert();
    assert!(result.is_success());
    assert!(result.data.unwrap().is_empty());
    assert_eq!(layout.context().toaster().options().visible_toasts, 1);
    Ok(())
}

#[test]
fn test_invalid_base_url_in_file_fails_validation() -> Result<()> {
    let file = TomlConfig::from_toml_str("[api]\nbase_url = \"ftp://plans.example.com\"\n")?;
    assert!(file.validate().is_err());

    let settings = Settings::default().merge_toml(&file);
    assert!(settings.validate().is_err());
    Ok(())
}
