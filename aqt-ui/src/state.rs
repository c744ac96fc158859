//! Application state managed via Dioxus context.
//!
//! `TrackingState` bundles the page's reactive signals and is provided with
//! `use_context_provider`. `Services` holds the fetchers, which keep their
//! own caches and latest-wins guards across renders.

use crate::browser::{self, LocalStore};
use crate::geolocation::BrowserGeolocator;
use aqt_client::api::{ApiConfig, HttpApi};
use aqt_client::freshness::{CompareRangeResolver, LatestTracker};
use aqt_client::heatmap::{HeatmapFetcher, HeatmapSnapshot};
use aqt_client::nearby::ProximityResolver;
use aqt_client::places::PlaceDirectory;
use aqt_client::series::{SeriesFetcher, SeriesSnapshot};
use aqt_core::filters::FilterState;
use aqt_core::freshness::{FreshnessSpan, LatestReading};
use aqt_core::geo::NearbyPlace;
use aqt_core::heatmap::HeatmapWindow;
use aqt_core::place::Place;
use aqt_core::refresh::AutoRefresh;
use chrono::{DateTime, Utc};
use dioxus::prelude::*;
use std::rc::Rc;

/// Reactive state of the tracking page.
#[derive(Clone, Copy)]
pub struct TrackingState {
    /// Range, metric and location selections. Mirrored to the URL.
    pub filters: Signal<FilterState>,
    pub refresh: Signal<AutoRefresh>,
    pub places: Signal<Vec<Place>>,
    pub places_loading: Signal<bool>,
    pub series: Signal<SeriesSnapshot>,
    pub heatmap: Signal<HeatmapSnapshot>,
    pub heatmap_window: Signal<HeatmapWindow>,
    /// Latest-reading span across compared places.
    pub compare_span: Signal<Option<FreshnessSpan>>,
    pub latest: Signal<Option<LatestReading>>,
    pub latest_loading: Signal<bool>,
    pub nearby: Signal<Vec<NearbyPlace>>,
    pub locating: Signal<bool>,
    pub geo_error: Signal<Option<String>>,
    pub syncing: Signal<bool>,
    /// Transient sync status line.
    pub sync_message: Signal<Option<String>>,
    pub last_sync: Signal<Option<DateTime<Utc>>>,
    /// Wall clock in epoch ms, bumped by the page so "ago" labels age.
    pub now_ms: Signal<i64>,
}

impl TrackingState {
    /// Initial filters come from the URL, then from localStorage.
    pub fn new(window: HeatmapWindow) -> Self {
        let filters = FilterState::from_query(&browser::location_search(), &LocalStore);
        Self {
            filters: Signal::new(filters),
            refresh: Signal::new(AutoRefresh::default()),
            places: Signal::new(Vec::new()),
            places_loading: Signal::new(false),
            series: Signal::new(SeriesSnapshot::default()),
            heatmap: Signal::new(HeatmapSnapshot::default()),
            heatmap_window: Signal::new(window),
            compare_span: Signal::new(None),
            latest: Signal::new(None),
            latest_loading: Signal::new(false),
            nearby: Signal::new(Vec::new()),
            locating: Signal::new(false),
            geo_error: Signal::new(None),
            syncing: Signal::new(false),
            sync_message: Signal::new(None),
            last_sync: Signal::new(None),
            now_ms: Signal::new(browser::now_ms()),
        }
    }
}

/// Fetchers shared by the page's hooks.
#[derive(Clone)]
pub struct Services {
    pub api: Rc<HttpApi>,
    pub series: Rc<SeriesFetcher<HttpApi>>,
    pub heatmap: Rc<HeatmapFetcher<HttpApi>>,
    pub places: Rc<PlaceDirectory<HttpApi>>,
    pub compare: Rc<CompareRangeResolver<HttpApi>>,
    pub latest: Rc<LatestTracker<HttpApi>>,
    pub nearby: Rc<ProximityResolver<BrowserGeolocator>>,
}

impl Services {
    pub fn new(config: ApiConfig) -> Self {
        let api = Rc::new(HttpApi::new(config));
        Self {
            series: Rc::new(SeriesFetcher::new(api.clone())),
            heatmap: Rc::new(HeatmapFetcher::new(api.clone())),
            places: Rc::new(PlaceDirectory::new(api.clone())),
            compare: Rc::new(CompareRangeResolver::new(api.clone())),
            latest: Rc::new(LatestTracker::new(api.clone())),
            nearby: Rc::new(ProximityResolver::new(BrowserGeolocator)),
            api,
        }
    }

    /// Drop every in-flight request, e.g. when the page unmounts.
    pub fn cancel_all(&self) {
        self.series.cancel();
        self.heatmap.cancel();
        self.places.cancel();
        self.compare.cancel();
        self.latest.cancel();
    }
}
