use crate::core::api::ApiClient;
use crate::domain::model::Plan;
use crate::domain::ports::PlanSource;
use crate::schema::parse_plans;
use crate::utils::error::Result;
use async_trait::async_trait;

pub const PLANS_ENDPOINT: &str = "/plans";

/// `GET /plans`, validated. HTTP failures return before any validation.
pub async fn fetch_plans(api: &ApiClient) -> Result<Vec<Plan>> {
    let data = api.get_json(PLANS_ENDPOINT).await?;
    let plans = parse_plans(&data)?;
    tracing::debug!("Fetched {} plan(s)", plans.len());
    Ok(plans)
}

#[async_trait]
impl PlanSource for ApiClient {
    async fn fetch_plans(&self) -> Result<Vec<Plan>> {
        fetch_plans(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ClientError;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_fetch_plans_preserves_fields() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/plans");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!([
                    {"id": "1", "name": "Basic", "price": 0, "interval": "month",
                     "description": "", "features": []},
                    {"id": "2", "name": "Pro", "price": 12.5, "interval": "month",
                     "description": "More", "features": ["API", "Support"]}
                ]));
        });

        let api = ApiClient::new(&server.base_url()).unwrap();
        let plans = fetch_plans(&api).await.unwrap();

        api_mock.assert();
        assert_eq!(plans.len(), 2);
        assert_eq!(
            plans[1],
            Plan {
                id: "2".to_string(),
                name: "Pro".to_string(),
                price: 12.5,
                interval: "month".to_string(),
                description: "More".to_string(),
                features: vec!["API".to_string(), "Support".to_string()],
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_plans_http_error_skips_validation() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/plans");
            // 若有驗證會因 body 不是陣列而失敗
            then.status(500).json_body(serde_json::json!({"error": "boom"}));
        });

        let api = ApiClient::new(&server.base_url()).unwrap();
        let err = fetch_plans(&api).await.unwrap_err();

        api_mock.assert();
        assert!(matches!(err, ClientError::Http { status: 500 }));
    }

    #[tokio::test]
    async fn test_fetch_plans_validation_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/plans");
            then.status(200).json_body(serde_json::json!([
                {"id": "1", "name": "Basic", "price": -1, "interval": "month",
                 "description": "", "features": []}
            ]));
        });

        let api = ApiClient::new(&server.base_url()).unwrap();
        match fetch_plans(&api).await {
            Err(ClientError::Validation(e)) => {
                assert_eq!(e.issues()[0].message, "Price must be at least 0");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_plan_source_impl_uses_same_endpoint() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/plans");
            then.status(200).json_body(serde_json::json!([]));
        });

        let api = ApiClient::new(&server.base_url()).unwrap();
        let source: &dyn PlanSource = &api;
        assert!(source.fetch_plans().await.unwrap().is_empty());
        api_mock.assert();
    }
}
