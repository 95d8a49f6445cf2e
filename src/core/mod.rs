pub mod api;

pub use crate::domain::model::Plan;
pub use crate::domain::ports::PlanSource;
pub use crate::utils::error::Result;
pub use api::ApiClient;
