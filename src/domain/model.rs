use serde::{Deserialize, Serialize};
use validator::Validate;

/// A pricing plan as served by `GET /plans`.
///
/// Only `schema::plan` constructs these from untyped JSON, so every value in
/// the system has a non-empty `name` and a non-negative `price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Plan {
    pub id: String,
    #[validate(length(min = 1, message = "Plan name is required"))]
    pub name: String,
    #[validate(range(min = 0.0, message = "Price must be at least 0"))]
    pub price: f64,
    pub interval: String,
    pub description: String,
    pub features: Vec<String>,
}

/// Field order used when reporting validation issues.
pub const PLAN_FIELDS: [&str; 6] = ["id", "name", "price", "interval", "description", "features"];
