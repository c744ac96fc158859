//! Backend contract and its HTTP implementation.
//!
//! Responses come back as raw `serde_json::Value`; shape checks happen in
//! `aqt-core` so that malformed fields degrade to defaults instead of
//! failing the call.

use crate::error::FetchError;
use aqt_core::{Metric, TimeRange};
use log::debug;
use reqwest::Client;
use serde_json::Value;

pub const DEFAULT_API_BASE: &str = "http://localhost:8080";

/// Where the backend lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Self {
        let trimmed = base_url.trim().trim_end_matches('/');
        let base_url = if trimmed.is_empty() {
            DEFAULT_API_BASE
        } else {
            trimmed
        };
        Self {
            base_url: base_url.to_string(),
        }
    }

    /// Base URL baked in at build time through `AQT_API_BASE`, for the WASM
    /// app which has no process environment.
    pub fn from_build_env() -> Self {
        Self::new(option_env!("AQT_API_BASE").unwrap_or(DEFAULT_API_BASE))
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Status and best-effort JSON body of a call whose failure body matters.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    /// `Value::Null` when the body was not JSON.
    pub body: Value,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The endpoints the tracking page consumes.
///
/// Implementations are single-threaded; the returned futures need not be
/// `Send`.
#[allow(async_fn_in_trait)]
pub trait TrackingApi {
    /// `GET /places?province=`
    async fn places(&self, province: Option<&str>) -> Result<Value, FetchError>;

    /// `GET /api/chartdata?range=&metric=&province=`
    async fn chart_data(
        &self,
        range: TimeRange,
        metric: Metric,
        province: Option<&str>,
    ) -> Result<Value, FetchError>;

    /// `GET /api/chartdata/heatmap_one_year?province=&metric=`
    async fn heatmap_one_year(&self, province: &str, metric: Metric) -> Result<Value, FetchError>;

    /// `GET /api/airquality/latest?province=`
    async fn latest(&self, province: Option<&str>) -> Result<Value, FetchError>;

    /// `GET /pipeline/refresh`. Non-2xx is not an error here; the caller
    /// reads the body's `error` field.
    async fn pipeline_refresh(&self) -> Result<RawResponse, FetchError>;
}

/// `reqwest`-backed [`TrackingApi`]. Works natively and on `wasm32`.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    config: ApiConfig,
}

impl HttpApi {
    pub fn new(config: ApiConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: ApiConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, FetchError> {
        let url = self.config.endpoint(path);
        debug!("GET {} {:?}", url, query);
        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// Query pairs with `province` only when it is non-empty.
fn with_province<'a>(
    mut pairs: Vec<(&'a str, &'a str)>,
    province: Option<&'a str>,
) -> Vec<(&'a str, &'a str)> {
    if let Some(p) = province.map(str::trim).filter(|p| !p.is_empty()) {
        pairs.push(("province", p));
    }
    pairs
}

impl TrackingApi for HttpApi {
    async fn places(&self, province: Option<&str>) -> Result<Value, FetchError> {
        self.get_json("/places", &with_province(Vec::new(), province))
            .await
    }

    async fn chart_data(
        &self,
        range: TimeRange,
        metric: Metric,
        province: Option<&str>,
    ) -> Result<Value, FetchError> {
        let query = with_province(
            vec![("range", range.as_str()), ("metric", metric.as_str())],
            province,
        );
        self.get_json("/api/chartdata", &query).await
    }

    async fn heatmap_one_year(&self, province: &str, metric: Metric) -> Result<Value, FetchError> {
        let query = [("province", province), ("metric", metric.as_str())];
        self.get_json("/api/chartdata/heatmap_one_year", &query)
            .await
    }

    async fn latest(&self, province: Option<&str>) -> Result<Value, FetchError> {
        self.get_json("/api/airquality/latest", &with_province(Vec::new(), province))
            .await
    }

    async fn pipeline_refresh(&self) -> Result<RawResponse, FetchError> {
        let url = self.config.endpoint("/pipeline/refresh");
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        let status = response.status().as_u16();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let config = ApiConfig::new("https://aq.example.org/");
        assert_eq!(
            config.endpoint("/api/chartdata"),
            "https://aq.example.org/api/chartdata"
        );
        assert_eq!(config.endpoint("places"), "https://aq.example.org/places");
    }

    #[test]
    fn blank_base_falls_back_to_default() {
        assert_eq!(ApiConfig::new("  ").base_url, DEFAULT_API_BASE);
        assert_eq!(ApiConfig::default().base_url, DEFAULT_API_BASE);
    }

    #[test]
    fn province_only_when_present() {
        assert!(with_province(Vec::new(), None).is_empty());
        assert!(with_province(Vec::new(), Some(" ")).is_empty());
        assert_eq!(
            with_province(vec![("range", "1 Week")], Some("Chiang Mai")),
            vec![("range", "1 Week"), ("province", "Chiang Mai")]
        );
    }

    #[test]
    fn success_range() {
        let ok = RawResponse { status: 204, body: Value::Null };
        let bad = RawResponse { status: 502, body: Value::Null };
        assert!(ok.is_success());
        assert!(!bad.is_success());
    }
}
