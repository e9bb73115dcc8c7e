use reqwest::RequestBuilder;
use serde_json::Value;

use crate::errors::{AppError, Result};

/// Thin client for the FoodData Central API. One best-effort attempt per
/// lookup; failures surface to the caller instead of being retried.
pub struct NutritionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl NutritionClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub async fn search_foods(&self, query: &str) -> Result<Value> {
        let request = self
            .http
            .get(format!("{}/foods/search", self.base_url))
            .query(&[("query", query), ("api_key", self.api_key.as_str())]);

        self.fetch(request).await
    }

    pub async fn food_details(&self, fdc_id: i64) -> Result<Value> {
        let request = self
            .http
            .get(format!("{}/food/{}", self.base_url, fdc_id))
            .query(&[("api_key", self.api_key.as_str())]);

        self.fetch(request).await
    }

    async fn fetch(&self, request: RequestBuilder) -> Result<Value> {
        let response = request.send().await.map_err(|e| AppError::Upstream {
            status: None,
            message: format!("Upstream request failed: {}", e),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream {
                status: Some(status.as_u16()),
                message: format!("Upstream returned status {}", status),
            });
        }

        response.json().await.map_err(|e| AppError::Upstream {
            status: None,
            message: format!("Invalid upstream response body: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_search_relays_upstream_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/foods/search"))
            .and(query_param("query", "cheddar"))
            .and(query_param("api_key", "test-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"totalHits": 1})),
            )
            .mount(&server)
            .await;

        let client = NutritionClient::new(&server.uri(), "test-key");
        let body = client.search_foods("cheddar").await.unwrap();

        assert_eq!(body, serde_json::json!({"totalHits": 1}));
    }

    #[tokio::test]
    async fn test_upstream_error_status_is_propagated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/food/99"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = NutritionClient::new(&server.uri(), "test-key");
        let err = client.food_details(99).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Upstream {
                status: Some(404),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_an_upstream_error() {
        // Nothing listens here once the server is dropped. Use a non-pooled
        // server: pooled ones from MockServer::start() keep listening after drop.
        let server = MockServer::builder().start().await;
        let uri = server.uri();
        drop(server);

        let client = NutritionClient::new(&uri, "test-key");
        let err = client.search_foods("apple").await.unwrap_err();
        assert!(matches!(err, AppError::Upstream { status: None, .. }));
    }
}
