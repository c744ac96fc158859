//! Series Cache & Fetcher: the trend chart's data source.
//!
//! Single-filter mode fetches one series for the effective filter (empty
//! means every place). Comparison mode fetches one series per selected place
//! concurrently and merges them onto a shared label axis. Each per-filter
//! fetch goes through a TTL cache keyed by `(range, filter, metric)`, which
//! is only read while the refresh tick is 0.

use crate::api::TrackingApi;
use crate::clock::{Clock, SystemClock};
use crate::error::FetchError;
use crate::guard::LatestOnly;
use aqt_core::cache::{series_key, TtlCache};
use aqt_core::chart::{merge_comparison, ChartData, ChartTable, DEFAULT_MAX_SERIES};
use aqt_core::filters::FilterState;
use aqt_core::refresh::allows_cache;
use aqt_core::{Metric, TimeRange};
use futures::future::try_join_all;
use log::{debug, warn};
use std::cell::RefCell;
use std::rc::Rc;

/// Inputs of one chart load.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeriesQuery {
    pub range: TimeRange,
    pub metric: Metric,
    /// Effective filter; ignored in comparison mode.
    pub filter: String,
    pub selected_places: Vec<String>,
    pub tick: u64,
}

impl SeriesQuery {
    pub fn from_filters(filters: &FilterState, tick: u64) -> Self {
        Self {
            range: filters.range,
            metric: filters.metric,
            filter: filters.effective_filter(),
            selected_places: filters.selected_places.clone(),
            tick,
        }
    }

    pub fn is_comparing(&self) -> bool {
        !self.selected_places.is_empty()
    }

    /// Series cap: the compared place count, otherwise the default.
    pub fn max_series(&self) -> usize {
        if self.is_comparing() {
            self.selected_places.len()
        } else {
            DEFAULT_MAX_SERIES
        }
    }
}

/// What the chart shows after a load.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeriesSnapshot {
    pub raw: ChartData,
    pub table: ChartTable,
    pub loading: bool,
    /// Set when the last load failed for a reason other than cancellation.
    pub failed: bool,
}

pub struct SeriesFetcher<A> {
    api: Rc<A>,
    clock: Rc<dyn Clock>,
    cache: RefCell<TtlCache<ChartData>>,
    guard: LatestOnly,
    snapshot: RefCell<SeriesSnapshot>,
}

impl<A: TrackingApi> SeriesFetcher<A> {
    pub fn new(api: Rc<A>) -> Self {
        Self::with_clock(api, Rc::new(SystemClock))
    }

    pub fn with_clock(api: Rc<A>, clock: Rc<dyn Clock>) -> Self {
        Self {
            api,
            clock,
            cache: RefCell::new(TtlCache::default()),
            guard: LatestOnly::new(),
            snapshot: RefCell::new(SeriesSnapshot::default()),
        }
    }

    /// Latest committed state.
    pub fn snapshot(&self) -> SeriesSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.snapshot.borrow().loading
    }

    /// Drop every cached series.
    pub fn invalidate_cache(&self) {
        self.cache.borrow_mut().clear();
    }

    pub fn cancel(&self) {
        self.guard.cancel();
    }

    /// Load the chart for `query`, superseding any load still in flight.
    ///
    /// A superseded load returns [`FetchError::Cancelled`] and commits
    /// nothing. Any other failure commits an empty, failed snapshot and is
    /// returned so the caller can log or surface it.
    pub async fn load(&self, query: &SeriesQuery) -> Result<SeriesSnapshot, FetchError> {
        self.snapshot.borrow_mut().loading = true;
        match self.guard.run(self.fetch(query)).await {
            Ok(raw) => {
                let table = ChartTable::from_chart(&raw, query.max_series());
                let snapshot = SeriesSnapshot {
                    raw,
                    table,
                    loading: false,
                    failed: false,
                };
                self.snapshot.replace(snapshot.clone());
                Ok(snapshot)
            }
            Err(FetchError::Cancelled) => {
                debug!("series load for {:?} superseded", query.filter);
                Err(FetchError::Cancelled)
            }
            Err(e) => {
                warn!("series load failed: {}", e);
                self.snapshot.replace(SeriesSnapshot {
                    failed: true,
                    ..SeriesSnapshot::default()
                });
                Err(e)
            }
        }
    }

    async fn fetch(&self, query: &SeriesQuery) -> Result<ChartData, FetchError> {
        if !query.is_comparing() {
            return self
                .fetch_one(query.range, &query.filter, query.metric, query.tick)
                .await;
        }
        let fetches = query
            .selected_places
            .iter()
            .map(|place| self.fetch_one(query.range, place, query.metric, query.tick));
        let fetched = try_join_all(fetches).await?;
        Ok(merge_comparison(&query.selected_places, &fetched))
    }

    async fn fetch_one(
        &self,
        range: TimeRange,
        filter: &str,
        metric: Metric,
        tick: u64,
    ) -> Result<ChartData, FetchError> {
        let key = series_key(range, filter, metric);
        if allows_cache(tick) {
            let cached = self
                .cache
                .borrow()
                .get_fresh(&key, self.clock.now(), range.cache_ttl())
                .cloned();
            if let Some(chart) = cached {
                debug!("series cache hit for {}", key);
                return Ok(chart);
            }
        }

        debug!("fetching series {}", key);
        let province = (!filter.is_empty()).then_some(filter);
        let payload = self.api.chart_data(range, metric, province).await?;
        let chart = ChartData::from_json(&payload);

        let evicted = self
            .cache
            .borrow_mut()
            .insert(key, self.clock.now(), chart.clone());
        if evicted > 0 {
            debug!("series cache evicted {} entries", evicted);
        }
        Ok(chart)
    }
}
