//! Compare-Range Resolver and the single latest-reading tracker.

use crate::api::TrackingApi;
use crate::error::FetchError;
use crate::guard::LatestOnly;
use aqt_core::freshness::{FreshnessSpan, LatestReading};
use futures::future::join_all;
use log::{debug, warn};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// How often the page re-polls the latest reading.
pub const LATEST_POLL_INTERVAL_MS: u64 = 60_000;

/// Oldest..newest latest-reading time across the compared places.
pub struct CompareRangeResolver<A> {
    api: Rc<A>,
    guard: LatestOnly,
    span: Cell<Option<FreshnessSpan>>,
}

impl<A: TrackingApi> CompareRangeResolver<A> {
    pub fn new(api: Rc<A>) -> Self {
        Self {
            api,
            guard: LatestOnly::new(),
            span: Cell::new(None),
        }
    }

    pub fn span(&self) -> Option<FreshnessSpan> {
        self.span.get()
    }

    pub fn cancel(&self) {
        self.guard.cancel();
    }

    /// Fetch every place's latest timestamp concurrently. Individual
    /// failures are skipped; `None` means no place answered.
    pub async fn resolve(&self, places: &[String]) -> Result<Option<FreshnessSpan>, FetchError> {
        if places.is_empty() {
            self.guard.cancel();
            self.span.set(None);
            return Ok(None);
        }

        let result = self
            .guard
            .run(async {
                let replies =
                    join_all(places.iter().map(|p| self.api.latest(Some(p.as_str())))).await;
                let timestamps = replies.into_iter().filter_map(|reply| match reply {
                    Ok(body) => LatestReading::from_json(&body).timestamp,
                    Err(e) => {
                        debug!("latest reading skipped: {}", e);
                        None
                    }
                });
                Ok(FreshnessSpan::from_timestamps(timestamps))
            })
            .await;

        if let Ok(span) = &result {
            self.span.set(*span);
        }
        result
    }
}

/// The most recent reading for the current filter.
pub struct LatestTracker<A> {
    api: Rc<A>,
    guard: LatestOnly,
    reading: Cell<Option<LatestReading>>,
    error: RefCell<Option<String>>,
}

impl<A: TrackingApi> LatestTracker<A> {
    pub fn new(api: Rc<A>) -> Self {
        Self {
            api,
            guard: LatestOnly::new(),
            reading: Cell::new(None),
            error: RefCell::new(None),
        }
    }

    pub fn reading(&self) -> Option<LatestReading> {
        self.reading.get()
    }

    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub fn cancel(&self) {
        self.guard.cancel();
    }

    pub async fn refresh(&self, filter: &str) -> Result<LatestReading, FetchError> {
        let filter = filter.trim();
        let result = self
            .guard
            .run(async {
                let body = self
                    .api
                    .latest((!filter.is_empty()).then_some(filter))
                    .await?;
                Ok(LatestReading::from_json(&body))
            })
            .await;

        match &result {
            Ok(reading) => {
                self.reading.set(Some(*reading));
                self.error.replace(None);
            }
            Err(FetchError::Cancelled) => {}
            Err(e) => {
                warn!("latest reading failed: {}", e);
                self.error
                    .replace(Some(format!("Failed to fetch last update: {e}")));
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockApi;
    use serde_json::json;
    use std::time::Duration;

    fn places(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn span_over_successful_places() {
        let api = Rc::new(MockApi::new());
        api.respond("latest|A", json!({ "aqi": 40, "timestamp": 3_000 }));
        api.respond("latest|B", json!({ "aqi": 55, "timestamp": 1_000 }));
        api.fail("latest|C", FetchError::Status(500));
        api.respond("latest|D", json!({ "aqi": 10, "timestamp": "soon" }));
        let resolver = CompareRangeResolver::new(api);

        let span = resolver.resolve(&places(&["A", "B", "C", "D"])).await.unwrap();
        assert_eq!(span, Some(FreshnessSpan { min: 1_000, max: 3_000 }));
        assert_eq!(resolver.span(), span);
    }

    #[tokio::test]
    async fn nothing_when_all_fail_or_empty() {
        let api = Rc::new(MockApi::new());
        api.fail("latest|A", FetchError::Transport("down".into()));
        let resolver = CompareRangeResolver::new(api.clone());

        assert_eq!(resolver.resolve(&places(&["A"])).await, Ok(None));
        assert_eq!(resolver.resolve(&[]).await, Ok(None));
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_resolution_does_not_clobber() {
        let api = Rc::new(MockApi::new());
        api.respond("latest|old", json!({ "timestamp": 1 }));
        api.respond("latest|new", json!({ "timestamp": 2 }));
        api.delay("latest|old", Duration::from_millis(100));
        let resolver = CompareRangeResolver::new(api);

        let old = places(&["old"]);
        let new = places(&["new"]);
        let (a, b) = futures::join!(resolver.resolve(&old), resolver.resolve(&new));

        assert_eq!(a, Err(FetchError::Cancelled));
        assert_eq!(b, Ok(Some(FreshnessSpan { min: 2, max: 2 })));
        assert_eq!(resolver.span(), Some(FreshnessSpan { min: 2, max: 2 }));
    }

    #[tokio::test]
    async fn tracker_records_error_text() {
        let api = Rc::new(MockApi::new());
        api.respond("latest|", json!({ "aqi": 87, "timestamp": 5 }));
        api.fail("latest|Nan", FetchError::Status(502));
        let tracker = LatestTracker::new(api);

        let reading = tracker.refresh("").await.unwrap();
        assert_eq!(reading.aqi, Some(87.0));

        assert!(tracker.refresh("Nan").await.is_err());
        assert_eq!(
            tracker.error().as_deref(),
            Some("Failed to fetch last update: server responded with status 502")
        );
        assert_eq!(tracker.reading().and_then(|r| r.timestamp), Some(5));
    }
}
