use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use pidash_types::{ConfigRules, ConfigUpdate, DashboardData, DnsQuery, QuerySize, ReportWindow, Series};

use crate::ApiError;

/// Client for the filtering server's HTTP endpoints.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    endpoint: String,
}

impl ApiClient {
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Base URL requests are sent to, without a trailing slash.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `GET /dashboard/{days}`
    pub async fn fetch_dashboard(&self, days: ReportWindow) -> Result<DashboardData, ApiError> {
        self.get_json(&format!("/dashboard/{days}")).await
    }

    /// `GET /queries/{size}`, newest first.
    pub async fn fetch_queries(&self, size: QuerySize) -> Result<Vec<DnsQuery>, ApiError> {
        self.get_json(&format!("/queries/{size}")).await
    }

    /// `GET /health/{days}`
    pub async fn fetch_health(&self, days: ReportWindow) -> Result<Vec<Series>, ApiError> {
        self.get_json(&format!("/health/{days}")).await
    }

    /// `GET /config`
    pub async fn fetch_config(&self) -> Result<ConfigRules, ApiError> {
        self.get_json("/config").await
    }

    /// `POST /config` as a form. Only a 200 counts as success.
    pub async fn update_config(&self, update: &ConfigUpdate) -> Result<(), ApiError> {
        let url = self.url("/config");
        debug!(%url, "POST");

        let fields = update.form_fields();
        let response = self.client.post(&url).form(&fields[..]).send().await?;

        if response.status() != StatusCode::OK {
            return Err(ApiError::Status(response.status().as_u16()));
        }
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(%url, "GET");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status().as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }
}

/// Builder for [`ApiClient`].
#[derive(Debug, Default)]
pub struct ApiClientBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl ApiClientBuilder {
    /// Set the server base URL (e.g., "http://192.168.1.2:8080").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<ApiClient, ApiError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Http(e.to_string()))?;

        let endpoint = self
            .endpoint
            .unwrap_or_else(|| "http://127.0.0.1:8080".to_string());

        Ok(ApiClient {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::stub::{Route, StubServer};

    fn client_for(server: &StubServer) -> ApiClient {
        ApiClient::builder()
            .endpoint(format!("{}/", server.base))
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_defaults() {
        let client = ApiClient::builder().build().unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:8080");
    }

    #[tokio::test]
    async fn test_fetch_dashboard_decodes_body() {
        let server = StubServer::start(vec![Route::get(
            "/dashboard/7",
            200,
            r#"{"total_count":12,"reject_count":3,"dns_data":[],"latency_data":[],
                "queries":{"A":10,"AAAA":2},"top_approved":{},"top_rejected":{"ads.example":3}}"#,
        )])
        .await;

        let data = client_for(&server)
            .fetch_dashboard(ReportWindow::SevenDays)
            .await
            .unwrap();
        assert_eq!(data.total_count, 12);
        assert_eq!(data.top_rejected.get("ads.example"), Some(&3));
    }

    #[tokio::test]
    async fn test_fetch_queries_and_health() {
        let server = StubServer::start(vec![
            Route::get(
                "/queries/200",
                200,
                r#"[{"id":2,"req_time":1000,"req_type":"A","name":"a.example","responded":true,
                     "reply":"1.2.3.4","filtered":null,"reason":null,"resp_time":3}]"#,
            ),
            Route::get(
                "/health/1",
                200,
                r#"[{"name":"CPU Average (Per Minute)","data":[[1,0.2]]},
                    {"name":"Memory Usage","data":[]},
                    {"name":"CPU Temperature (C)","data":[[1,40.5]]}]"#,
            ),
        ])
        .await;
        let client = client_for(&server);

        let queries = client
            .fetch_queries(QuerySize::try_from(200).unwrap())
            .await
            .unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].reply.as_deref(), Some("1.2.3.4"));

        let health = client.fetch_health(ReportWindow::OneDay).await.unwrap();
        assert_eq!(health.len(), 3);
        assert_eq!(health[2].data, vec![(1, 40.5)]);
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let server = StubServer::start(vec![Route::get("/config", 503, "")]).await;
        let err = client_for(&server).fetch_config().await.unwrap_err();
        assert!(matches!(err, ApiError::Status(503)));
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = StubServer::start(vec![Route::get("/queries/100", 200, "not json")]).await;
        let err = client_for(&server)
            .fetch_queries(QuerySize::DEFAULT)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[tokio::test]
    async fn test_update_config_posts_form() {
        let server = StubServer::start(vec![Route::post("/config", 200, "")]).await;
        let update = ConfigUpdate {
            approve_rules: vec!["good.example".into()],
            reject_rules: vec!["* .*ads.*".into(), "# bad.example".into()],
            updated_block_list: vec![],
        };

        client_for(&server).update_config(&update).await.unwrap();

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].starts_with("POST /config "));
        assert!(requests[0].contains("approveRules=good.example"));
        assert!(requests[0].contains("rejectRules=*+.*ads.*%0A%23+bad.example"));
        assert!(requests[0].contains("updatedBlockList="));
    }
}
