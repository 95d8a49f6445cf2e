use clap::Parser;
use plans_client::app::render::render_plans;
use plans_client::query::SharedError;
use plans_client::utils::error::{ClientError, ErrorSeverity};
use plans_client::utils::{logger, validation::Validate};
use plans_client::{use_plans, AppContext, CliConfig, OutputFormat, RootLayout};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let settings = match cli.resolve().and_then(|s| s.validate().map(|_| s)) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(exit_code(&e));
        }
    };

    let layout = RootLayout::new(&settings)?;
    let format = cli.format;
    let rendered = layout.render(|ctx| plans_page(ctx, format)).await;

    let rich = layout.context().toaster().options().rich_colors;
    for toast in &rendered.toasts {
        eprintln!("{}", toast.render(rich));
    }

    match rendered.output {
        Ok(text) => {
            print!("{}", text);
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "❌ Fetching plans failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(exit_code(&e));
        }
    }
}

/// The single page of this client: load plans and render them.
async fn plans_page(ctx: &AppContext, format: OutputFormat) -> Result<String, SharedError> {
    let result = use_plans(ctx).await;

    if let Some(error) = result.error {
        ctx.toaster().error(error.user_friendly_message());
        return Err(error);
    }

    let plans = result.data.unwrap_or_default();
    ctx.toaster().success(format!("Loaded {} plan(s)", plans.len()));
    render_plans(&plans, format).map_err(SharedError::new)
}

fn exit_code(e: &ClientError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2, // 可重試
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
