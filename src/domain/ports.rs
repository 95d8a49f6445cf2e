use crate::domain::model::Plan;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Anything that can produce a validated list of plans.
#[async_trait]
pub trait PlanSource: Send + Sync {
    async fn fetch_plans(&self) -> Result<Vec<Plan>>;
}
