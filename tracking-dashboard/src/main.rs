//! Air-Quality Tracking Dashboard
//!
//! One page that follows PM2.5, PM10 or AQI over time:
//! - a trend chart for a province, a place, or up to three compared places
//! - a one-year daily calendar for the selected (or first compared) place
//! - "last updated" freshness, a nearest-places finder and a pipeline sync
//!
//! Data flow:
//! 1. Filters are read from the URL query, then from localStorage.
//! 2. Hooks derive each fetch's inputs from the filters and refresh tick and
//!    re-fetch when those change; only the newest request may commit.
//! 3. Filter changes are mirrored back to the URL and localStorage.
//!
//! The backend base URL is baked in at build time via `AQT_API_BASE`.

use aqt_client::api::ApiConfig;
use aqt_ui::components::{
    CalendarHeatmap, ChartHeader, CompareChips, ErrorDisplay, NearbyPanel, PlaceSearch,
    StatusBar, TrackingControls, TrendChart,
};
use aqt_ui::hooks;
use aqt_ui::state::{Services, TrackingState};
use dioxus::prelude::*;
use std::time::Duration;

/// How often relative ages ("5m ago") are recomputed.
const WALL_CLOCK_TICK: Duration = Duration::from_secs(15);

const SECTION_STYLE: &str =
    "margin-bottom: 16px; padding: 12px; border: 1px solid #E2E8F0; border-radius: 8px; background: white;";

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("tracking-root"))
        .launch(App);
}

#[component]
fn App() -> Element {
    let services = use_context_provider(|| Services::new(ApiConfig::from_build_env()));
    let window = services.heatmap.window();
    let state = use_context_provider(move || TrackingState::new(window));

    hooks::use_filter_sync(state);
    hooks::use_auto_refresh(state);
    hooks::use_wall_clock(state, WALL_CLOCK_TICK);
    hooks::use_places(services.clone(), state);
    hooks::use_chart_series(services.clone(), state);
    hooks::use_heatmap_series(services.clone(), state);
    hooks::use_compare_range(services.clone(), state);
    hooks::use_latest_reading(services.clone(), state);

    let on_unmount = services.clone();
    use_drop(move || {
        log::info!("tracking page unmounted, cancelling requests");
        on_unmount.cancel_all();
    });

    let (metric, title) = {
        let filters = state.filters.read();
        let scope = if filters.is_comparing() {
            filters.selected_places.join(" vs ")
        } else {
            let effective = filters.effective_filter();
            if effective.is_empty() {
                "All locations".to_string()
            } else {
                effective
            }
        };
        (
            filters.metric,
            format!("{} · {} · {}", filters.metric.label(), filters.range.as_str(), scope),
        )
    };
    let series = state.series.read();

    rsx! {
        div {
            style: "padding: 16px; max-width: 1100px; margin: 0 auto; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #F8FAFC;",

            ChartHeader {
                title,
                unit_description: format!("{} ({})", metric.label(), metric.unit()),
            }

            div { style: SECTION_STYLE,
                TrackingControls {}
                div { style: "display: flex; flex-wrap: wrap; gap: 12px; margin-top: 10px;",
                    PlaceSearch {}
                    CompareChips {}
                }
                div { style: "margin-top: 8px;", StatusBar {} }
            }

            div { style: SECTION_STYLE,
                if series.failed {
                    ErrorDisplay { message: "Could not load chart data.".to_string() }
                }
                TrendChart {
                    table: series.table.clone(),
                    metric,
                    loading: series.loading,
                }
            }

            div { style: SECTION_STYLE, CalendarHeatmap {} }

            div { style: SECTION_STYLE,
                h3 { style: "margin: 0 0 8px 0; font-size: 15px;", "Nearby" }
                NearbyPanel {}
            }
        }
    }
}
