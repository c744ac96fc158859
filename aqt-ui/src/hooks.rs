//! Hooks binding the fetchers in [`Services`] to the signals in
//! [`TrackingState`].
//!
//! Each data hook derives its inputs through a memo, so it re-fetches only
//! when those inputs actually change. Results are committed from spawned
//! tasks; a superseded load reports `Cancelled` and is dropped silently.
//! Unmount cancels whatever the hook still has in flight.

use crate::browser::{self, LocalStore};
use crate::state::{Services, TrackingState};
use aqt_client::freshness::LATEST_POLL_INTERVAL_MS;
use aqt_client::series::SeriesQuery;
use aqt_client::sync::run_pipeline_refresh;
use aqt_core::chart::csv_file_name;
use aqt_core::sync::SYNC_MESSAGE_TTL;
use dioxus::prelude::*;
use gloo_timers::callback::Interval;
use gloo_timers::future::sleep;
use log::{debug, info, warn};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Mirror filter changes into the URL (replaceState) and localStorage.
pub fn use_filter_sync(state: TrackingState) {
    use_effect(move || {
        let filters = state.filters.read();
        browser::replace_query(&filters.to_query_string());
        filters.persist(&LocalStore);
    });
}

/// Drive the refresh tick from a timer. The timer is dropped and replaced
/// whenever the interval changes, so two timers never overlap.
pub fn use_auto_refresh(state: TrackingState) {
    let mut refresh = state.refresh;
    let timer: Rc<RefCell<Option<Interval>>> = use_hook(|| Rc::new(RefCell::new(None)));
    let interval_ms = use_memo(move || refresh.read().interval_ms);

    let installed = timer.clone();
    use_effect(move || {
        let ms = interval_ms();
        // Dropping the handle clears the old timer.
        installed.borrow_mut().take();
        if ms == 0 {
            debug!("auto refresh off");
            return;
        }
        let millis = u32::try_from(ms).unwrap_or(u32::MAX);
        debug!("auto refresh every {} ms", millis);
        *installed.borrow_mut() = Some(Interval::new(millis, move || {
            refresh.write().on_timer();
        }));
    });

    use_drop(move || {
        timer.borrow_mut().take();
    });
}

/// Keep `now_ms` ticking so relative ages stay current.
pub fn use_wall_clock(state: TrackingState, every: Duration) {
    let mut now_ms = state.now_ms;
    use_future(move || async move {
        loop {
            sleep(every).await;
            now_ms.set(browser::now_ms());
        }
    });
}

/// Re-list places whenever the province changes.
pub fn use_places(services: Services, state: TrackingState) {
    let province = use_memo(move || state.filters.read().province.clone());
    let directory = services.places.clone();
    use_effect(move || {
        let province = province();
        let directory = directory.clone();
        let mut places = state.places;
        let mut loading = state.places_loading;
        loading.set(true);
        spawn(async move {
            if let Some(list) = directory.list(&province).await {
                places.set(list);
                loading.set(false);
            }
        });
    });
    let directory = services.places.clone();
    use_drop(move || directory.cancel());
}

/// Load the trend chart for the current filters and refresh tick.
pub fn use_chart_series(services: Services, state: TrackingState) {
    let query = use_memo(move || {
        SeriesQuery::from_filters(&state.filters.read(), state.refresh.read().tick)
    });
    let fetcher = services.series.clone();
    use_effect(move || {
        let query = query();
        let fetcher = fetcher.clone();
        let mut series = state.series;
        series.write().loading = true;
        spawn(async move {
            match fetcher.load(&query).await {
                Ok(snapshot) => series.set(snapshot),
                Err(e) if e.is_cancelled() => {}
                Err(_) => series.set(fetcher.snapshot()),
            }
        });
    });
    let fetcher = services.series.clone();
    use_drop(move || fetcher.cancel());
}

/// Load the one-year heatmap series for the heatmap filter.
pub fn use_heatmap_series(services: Services, state: TrackingState) {
    let inputs = use_memo(move || {
        let filters = state.filters.read();
        (
            filters.heatmap_filter(),
            filters.metric,
            state.refresh.read().tick,
        )
    });
    let fetcher = services.heatmap.clone();
    use_effect(move || {
        let (filter, metric, tick) = inputs();
        let fetcher = fetcher.clone();
        let mut heatmap = state.heatmap;
        if !filter.is_empty() {
            heatmap.write().loading = true;
        }
        spawn(async move {
            match fetcher.load(&filter, metric, tick).await {
                Ok(snapshot) => heatmap.set(snapshot),
                Err(e) if e.is_cancelled() => {}
                Err(_) => heatmap.set(fetcher.snapshot()),
            }
        });
    });
    let fetcher = services.heatmap.clone();
    use_drop(move || fetcher.cancel());
}

/// Resolve the last-updated span across compared places.
pub fn use_compare_range(services: Services, state: TrackingState) {
    let inputs = use_memo(move || {
        (
            state.filters.read().selected_places.clone(),
            state.refresh.read().tick,
        )
    });
    let resolver = services.compare.clone();
    use_effect(move || {
        let (places, _tick) = inputs();
        let resolver = resolver.clone();
        let mut span = state.compare_span;
        spawn(async move {
            if let Ok(resolved) = resolver.resolve(&places).await {
                span.set(resolved);
            }
        });
    });
    let resolver = services.compare.clone();
    use_drop(move || resolver.cancel());
}

/// Poll the latest reading for the current location every minute.
pub fn use_latest_reading(services: Services, state: TrackingState) {
    let mut poll = use_signal(|| 0u64);
    use_future(move || async move {
        loop {
            sleep(Duration::from_millis(LATEST_POLL_INTERVAL_MS)).await;
            poll.with_mut(|n| *n += 1);
        }
    });

    let filter = use_memo(move || state.filters.read().latest_filter());
    let tracker = services.latest.clone();
    use_effect(move || {
        let filter = filter();
        let _ = poll();
        let tracker = tracker.clone();
        let mut latest = state.latest;
        let mut loading = state.latest_loading;
        loading.set(true);
        spawn(async move {
            match tracker.refresh(&filter).await {
                Ok(reading) => {
                    latest.set(Some(reading));
                    loading.set(false);
                }
                Err(e) if e.is_cancelled() => {}
                Err(_) => loading.set(false),
            }
        });
    });
    let tracker = services.latest.clone();
    use_drop(move || tracker.cancel());
}

/// Run the pipeline sync, then bust both caches and force a refresh.
/// The status message clears itself after a few seconds.
pub fn start_sync(services: Services, state: TrackingState) {
    let TrackingState {
        mut syncing,
        mut sync_message,
        mut last_sync,
        mut refresh,
        ..
    } = state;
    if *syncing.peek() {
        return;
    }
    spawn(async move {
        syncing.set(true);
        sync_message.set(None);

        let report = run_pipeline_refresh(services.api.as_ref()).await;
        sync_message.set(Some(report.outcome.to_string()));
        if let Some(at) = report.synced_at {
            last_sync.set(Some(at));
        }

        services.series.invalidate_cache();
        services.heatmap.invalidate_cache();
        refresh.write().trigger();
        syncing.set(false);

        sleep(SYNC_MESSAGE_TTL).await;
        sync_message.set(None);
    });
}

/// Ask for a location fix and rank the loaded places around it.
pub fn start_locate(services: Services, state: TrackingState) {
    let TrackingState {
        places,
        mut nearby,
        mut locating,
        mut geo_error,
        ..
    } = state;
    spawn(async move {
        locating.set(true);
        geo_error.set(None);
        let candidates = places.peek().clone();
        match services.nearby.locate(&candidates).await {
            Ok(ranked) => nearby.set(ranked),
            Err(e) => geo_error.set(Some(e.to_string())),
        }
        locating.set(false);
    });
}

/// Download the current chart rows as CSV.
pub fn export_csv(state: TrackingState) {
    let (range, metric) = {
        let filters = state.filters.peek();
        (filters.range, filters.metric)
    };
    let csv = match state.series.peek().table.to_csv() {
        Ok(csv) => csv,
        Err(e) => {
            warn!("CSV export failed: {}", e);
            return;
        }
    };
    let file_name = csv_file_name(range.as_str(), metric.as_str(), browser::now_ms());
    info!("exporting {}", file_name);
    browser::download_text(&file_name, "text/csv;charset=utf-8;", &csv);
}
