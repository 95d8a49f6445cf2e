//! Query hooks: fetch functions bound to stable cache keys.

use crate::app::layout::AppContext;
use crate::domain::model::Plan;
use crate::domain::ports::PlanSource;
use crate::query::{QueryClient, QueryKey, QueryOptions, QueryResult};

pub const PLANS_QUERY_KEY: &str = "plans";

pub fn plans_query_key() -> QueryKey {
    QueryKey::new([PLANS_QUERY_KEY])
}

/// Plans for the current page, shared with every other caller of the hook
/// on the same [`AppContext`].
pub async fn use_plans(ctx: &AppContext) -> QueryResult<Vec<Plan>> {
    use_plans_with(ctx.query_client(), ctx.plan_source(), ctx.query_options()).await
}

pub async fn use_plans_with(
    client: &QueryClient,
    source: &dyn PlanSource,
    options: &QueryOptions,
) -> QueryResult<Vec<Plan>> {
    client
        .use_query(&plans_query_key(), options, move || source.fetch_plans())
        .await
}
