pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod features;
pub mod hooks;
pub mod query;
pub mod schema;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, OutputFormat};

pub use app::{AppContext, RootLayout};
pub use config::{ConfigProvider, Settings};
pub use core::api::ApiClient;
pub use domain::model::Plan;
pub use features::plans::fetch_plans;
pub use hooks::use_plans;
pub use query::{QueryClient, QueryKey, QueryOptions, QueryResult, QueryStatus};
pub use utils::error::{ClientError, Result};
