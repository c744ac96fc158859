//! In-memory backend for fetcher tests. Records every call and can delay or
//! fail responses per key.

use crate::api::{RawResponse, TrackingApi};
use crate::error::FetchError;
use aqt_core::{Metric, TimeRange};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Default)]
pub struct MockApi {
    calls: RefCell<Vec<String>>,
    responses: RefCell<HashMap<String, Result<Value, FetchError>>>,
    delays: RefCell<HashMap<String, Duration>>,
    pipeline: RefCell<Option<Result<RawResponse, FetchError>>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, key: &str, body: Value) {
        self.responses.borrow_mut().insert(key.to_string(), Ok(body));
    }

    pub fn fail(&self, key: &str, error: FetchError) {
        self.responses.borrow_mut().insert(key.to_string(), Err(error));
    }

    pub fn delay(&self, key: &str, by: Duration) {
        self.delays.borrow_mut().insert(key.to_string(), by);
    }

    pub fn respond_pipeline(&self, response: Result<RawResponse, FetchError>) {
        self.pipeline.replace(Some(response));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    async fn answer(&self, key: String) -> Result<Value, FetchError> {
        self.calls.borrow_mut().push(key.clone());
        let delay = self.delays.borrow().get(&key).copied();
        if let Some(by) = delay {
            tokio::time::sleep(by).await;
        }
        self.responses
            .borrow()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::Status(404)))
    }
}

/// Chart payload with one dataset.
pub fn chart(label: &str, labels: &[&str], data: &[f64]) -> Value {
    json!({
        "labels": labels,
        "datasets": [{ "label": label, "data": data }]
    })
}

impl TrackingApi for MockApi {
    async fn places(&self, province: Option<&str>) -> Result<Value, FetchError> {
        self.answer(format!("places|{}", province.unwrap_or_default()))
            .await
    }

    async fn chart_data(
        &self,
        range: TimeRange,
        metric: Metric,
        province: Option<&str>,
    ) -> Result<Value, FetchError> {
        self.answer(format!(
            "chart|{}|{}|{}",
            range,
            metric,
            province.unwrap_or_default()
        ))
        .await
    }

    async fn heatmap_one_year(&self, province: &str, metric: Metric) -> Result<Value, FetchError> {
        self.answer(format!("heat|{province}|{metric}")).await
    }

    async fn latest(&self, province: Option<&str>) -> Result<Value, FetchError> {
        self.answer(format!("latest|{}", province.unwrap_or_default()))
            .await
    }

    async fn pipeline_refresh(&self) -> Result<RawResponse, FetchError> {
        self.calls.borrow_mut().push("pipeline".to_string());
        self.pipeline
            .borrow()
            .clone()
            .unwrap_or(Err(FetchError::Transport("no response configured".into())))
    }
}
