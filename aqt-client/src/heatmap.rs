//! Heatmap Series Builder: one year of daily values for the calendar.

use crate::api::TrackingApi;
use crate::clock::{Clock, SystemClock};
use crate::error::FetchError;
use crate::guard::LatestOnly;
use aqt_core::cache::{heatmap_key, TtlCache};
use aqt_core::heatmap::{daily_series_from_json, DailyValue, HeatmapWindow};
use aqt_core::refresh::allows_cache;
use aqt_core::Metric;
use log::{debug, warn};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Heatmap entries do not depend on the chart range, so they share one TTL.
pub const HEATMAP_TTL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HeatmapSnapshot {
    pub series: Vec<DailyValue>,
    pub loading: bool,
    pub failed: bool,
}

pub struct HeatmapFetcher<A> {
    api: Rc<A>,
    clock: Rc<dyn Clock>,
    window: HeatmapWindow,
    cache: RefCell<TtlCache<Vec<DailyValue>>>,
    guard: LatestOnly,
    snapshot: RefCell<HeatmapSnapshot>,
}

impl<A: TrackingApi> HeatmapFetcher<A> {
    pub fn new(api: Rc<A>) -> Self {
        Self::with_clock(api, Rc::new(SystemClock))
    }

    /// The window is fixed here, once, and kept for the fetcher's lifetime.
    pub fn with_clock(api: Rc<A>, clock: Rc<dyn Clock>) -> Self {
        let window = HeatmapWindow::one_year_ending(clock.today());
        Self {
            api,
            clock,
            window,
            cache: RefCell::new(TtlCache::default()),
            guard: LatestOnly::new(),
            snapshot: RefCell::new(HeatmapSnapshot::default()),
        }
    }

    pub fn window(&self) -> HeatmapWindow {
        self.window
    }

    pub fn snapshot(&self) -> HeatmapSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn invalidate_cache(&self) {
        self.cache.borrow_mut().clear();
    }

    pub fn cancel(&self) {
        self.guard.cancel();
    }

    /// Load the daily series for `filter`. An empty filter yields an empty
    /// series at once and supersedes any load in flight.
    pub async fn load(
        &self,
        filter: &str,
        metric: Metric,
        tick: u64,
    ) -> Result<HeatmapSnapshot, FetchError> {
        let filter = filter.trim();
        if filter.is_empty() {
            self.guard.cancel();
            let empty = HeatmapSnapshot::default();
            self.snapshot.replace(empty.clone());
            return Ok(empty);
        }

        self.snapshot.borrow_mut().loading = true;
        match self.guard.run(self.fetch(filter, metric, tick)).await {
            Ok(series) => {
                let snapshot = HeatmapSnapshot {
                    series,
                    loading: false,
                    failed: false,
                };
                self.snapshot.replace(snapshot.clone());
                Ok(snapshot)
            }
            Err(FetchError::Cancelled) => Err(FetchError::Cancelled),
            Err(e) => {
                warn!("heatmap load for {} failed: {}", filter, e);
                self.snapshot.replace(HeatmapSnapshot {
                    failed: true,
                    ..HeatmapSnapshot::default()
                });
                Err(e)
            }
        }
    }

    async fn fetch(
        &self,
        filter: &str,
        metric: Metric,
        tick: u64,
    ) -> Result<Vec<DailyValue>, FetchError> {
        let key = heatmap_key(filter, metric);
        if allows_cache(tick) {
            let cached = self
                .cache
                .borrow()
                .get_fresh(&key, self.clock.now(), HEATMAP_TTL)
                .cloned();
            if let Some(series) = cached {
                debug!("heatmap cache hit for {}", key);
                return Ok(series);
            }
        }

        debug!("fetching heatmap {}", key);
        let payload = self.api.heatmap_one_year(filter, metric).await?;
        let series = daily_series_from_json(&payload);
        self.cache
            .borrow_mut()
            .insert(key, self.clock.now(), series.clone());
        Ok(series)
    }
}
