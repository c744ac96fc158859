use crate::hooks::{export_csv, start_sync};
use crate::state::{Services, TrackingState};
use aqt_core::place::{place_options, province_options};
use aqt_core::refresh::REFRESH_CHOICES;
use aqt_core::{Metric, TimeRange};
use dioxus::prelude::*;

const SELECT_STYLE: &str =
    "padding: 6px 8px; border: 1px solid #CBD5E1; border-radius: 6px; background: white;";
const BUTTON_STYLE: &str =
    "padding: 6px 12px; border: 1px solid #CBD5E1; border-radius: 6px; background: #F8FAFC; cursor: pointer;";

/// Range, metric, location and refresh selectors plus the page actions.
#[component]
pub fn TrackingControls() -> Element {
    let state = use_context::<TrackingState>();
    let services = use_context::<Services>();
    let mut filters = state.filters;
    let mut refresh = state.refresh;

    let current = filters.cloned();
    let interval_ms = refresh.read().interval_ms;
    let syncing = *state.syncing.read();
    let can_export = !state.series.read().table.is_empty();

    let chart_labels = state.series.read().raw.dataset_labels();
    let places = state.places.read();
    let provinces = province_options(&chart_labels, &places);
    let place_choices = place_options(&places, &chart_labels);

    rsx! {
        div {
            style: "display: flex; flex-wrap: wrap; gap: 8px; align-items: center;",
            select {
                style: SELECT_STYLE,
                value: "{current.range.as_str()}",
                onchange: move |evt: Event<FormData>| {
                    if let Ok(range) = evt.value().parse::<TimeRange>() {
                        filters.write().range = range;
                    }
                },
                for range in TimeRange::ALL {
                    option { value: "{range.as_str()}", selected: range == current.range, "{range.as_str()}" }
                }
            }
            select {
                style: SELECT_STYLE,
                value: "{current.metric.as_str()}",
                onchange: move |evt: Event<FormData>| {
                    if let Ok(metric) = evt.value().parse::<Metric>() {
                        filters.write().metric = metric;
                    }
                },
                for metric in Metric::ALL {
                    option { value: "{metric.as_str()}", selected: metric == current.metric, "{metric.label()}" }
                }
            }
            select {
                style: SELECT_STYLE,
                onchange: move |evt: Event<FormData>| filters.write().select_province(&evt.value()),
                option { value: "", selected: current.province.is_empty(), "All provinces" }
                for province in provinces {
                    option {
                        value: "{province}",
                        selected: province == current.province,
                        "{province}"
                    }
                }
            }
            select {
                style: SELECT_STYLE,
                onchange: move |evt: Event<FormData>| filters.write().select_place(&evt.value()),
                option { value: "", selected: current.place.is_empty(), "All places" }
                for place in place_choices {
                    option {
                        value: "{place}",
                        selected: place == current.place,
                        "{place}"
                    }
                }
            }
            label {
                style: "font-size: 13px; color: #475569;",
                "Auto refresh "
                select {
                    style: SELECT_STYLE,
                    onchange: move |evt: Event<FormData>| {
                        if let Ok(ms) = evt.value().parse::<u64>() {
                            refresh.write().set_interval(ms);
                        }
                    },
                    for (ms, label) in REFRESH_CHOICES {
                        option { value: "{ms}", selected: ms == interval_ms, "{label}" }
                    }
                }
            }
            button {
                style: BUTTON_STYLE,
                disabled: !current.has_filters(),
                onclick: move |_| filters.write().clear_filters(),
                "Clear filters"
            }
            button {
                style: BUTTON_STYLE,
                disabled: syncing,
                onclick: move |_| start_sync(services.clone(), state),
                if syncing { "Syncing…" } else { "Sync & refresh" }
            }
            button {
                style: BUTTON_STYLE,
                disabled: !can_export,
                onclick: move |_| export_csv(state),
                "Export CSV"
            }
        }
    }
}
