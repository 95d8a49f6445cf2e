use crate::app::toaster::{Toast, Toaster};
use crate::config::ConfigProvider;
use crate::core::api::ApiClient;
use crate::domain::ports::PlanSource;
use crate::query::{QueryClient, QueryOptions};
use crate::utils::error::Result;
use std::future::Future;
use std::sync::Arc;

/// Everything a page may use: the query cache, the toaster and the plans
/// data source. Cheap to clone; clones share the same cache and toasts.
#[derive(Clone)]
pub struct AppContext {
    query_client: Arc<QueryClient>,
    toaster: Arc<Toaster>,
    plans: Arc<dyn PlanSource>,
    query_options: QueryOptions,
}

impl AppContext {
    pub fn new(
        query_client: Arc<QueryClient>,
        toaster: Arc<Toaster>,
        plans: Arc<dyn PlanSource>,
    ) -> Self {
        let query_options = query_client.default_options().clone();
        Self {
            query_client,
            toaster,
            plans,
            query_options,
        }
    }

    pub fn query_client(&self) -> &QueryClient {
        &self.query_client
    }

    pub fn toaster(&self) -> &Toaster {
        &self.toaster
    }

    pub fn plan_source(&self) -> &dyn PlanSource {
        self.plans.as_ref()
    }

    pub fn query_options(&self) -> &QueryOptions {
        &self.query_options
    }
}

/// Output of one page render plus the toasts raised while it ran.
#[derive(Debug)]
pub struct Rendered<T> {
    pub output: T,
    pub toasts: Vec<Toast>,
}

/// Composition root: owns the query cache and the toaster for the lifetime
/// of the application and wraps every page render.
pub struct RootLayout {
    ctx: AppContext,
}

impl RootLayout {
    pub fn new<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let api = ApiClient::from_config(config)?;
        tracing::debug!("Root layout bound to {}", api.base_url());
        Ok(Self::with_source(config, Arc::new(api)))
    }

    /// Same as [`new`](Self::new) but with a caller-supplied plans source.
    pub fn with_source<C: ConfigProvider + ?Sized>(config: &C, plans: Arc<dyn PlanSource>) -> Self {
        let query_client = Arc::new(QueryClient::new(config.query_options()));
        let toaster = Arc::new(Toaster::new(config.toaster_options()));
        Self {
            ctx: AppContext::new(query_client, toaster, plans),
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    /// Run `page` inside the layout and collect the toasts it raised.
    pub async fn render<'a, F, Fut, T>(&'a self, page: F) -> Rendered<T>
    where
        F: FnOnce(&'a AppContext) -> Fut,
        Fut: Future<Output = T>,
    {
        let output = page(&self.ctx).await;
        let toasts = self.ctx.toaster.drain();
        Rendered { output, toasts }
    }
}
