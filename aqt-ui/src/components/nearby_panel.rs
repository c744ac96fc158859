use crate::components::ErrorDisplay;
use crate::hooks::start_locate;
use crate::state::{Services, TrackingState};
use dioxus::prelude::*;

/// "Near me" button and the places ranked by distance from the fix.
#[component]
pub fn NearbyPanel() -> Element {
    let state = use_context::<TrackingState>();
    let services = use_context::<Services>();
    let mut filters = state.filters;

    let locating = *state.locating.read();
    let no_places = state.places.read().is_empty();
    let error = state.geo_error.cloned();
    let ranked = state.nearby.cloned();

    rsx! {
        div {
            style: "display: flex; flex-direction: column; gap: 6px;",
            button {
                style: "align-self: flex-start; padding: 6px 12px; border: 1px solid #CBD5E1; border-radius: 6px; background: #F8FAFC; cursor: pointer;",
                disabled: locating || no_places,
                onclick: move |_| start_locate(services.clone(), state),
                if locating { "Locating…" } else { "Find places near me" }
            }
            if let Some(message) = error {
                ErrorDisplay { message }
            }
            if !ranked.is_empty() {
                ul {
                    style: "list-style: none; margin: 0; padding: 0; font-size: 13px;",
                    for entry in ranked {
                        li {
                            key: "{entry.place.label}",
                            style: "display: flex; gap: 8px; align-items: center; padding: 2px 0;",
                            span {
                                style: "cursor: pointer; color: #1D4ED8;",
                                onclick: {
                                    let label = entry.place.label.clone();
                                    move |_| filters.write().select_place(&label)
                                },
                                "{entry.place.label}"
                            }
                            span { style: "color: #64748B;", "{entry.distance_km:.1} km" }
                            button {
                                style: "border: none; background: none; color: #2563EB; cursor: pointer; font-size: 12px;",
                                onclick: {
                                    let label = entry.place.label.clone();
                                    move |_| filters.write().quick_add_place(&label)
                                },
                                "+ compare"
                            }
                        }
                    }
                }
            }
        }
    }
}
