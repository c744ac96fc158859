use crate::state::TrackingState;
use aqt_core::filters::MAX_COMPARE_PLACES;
use dioxus::prelude::*;

/// Compared places as removable chips. Clicking a chip points the calendar
/// at that place.
#[component]
pub fn CompareChips() -> Element {
    let state = use_context::<TrackingState>();
    let mut filters = state.filters;

    let (selected, target) = {
        let f = filters.read();
        (f.selected_places.clone(), f.heatmap_target.clone())
    };
    if selected.is_empty() {
        return rsx! {};
    }

    rsx! {
        div {
            style: "display: flex; flex-wrap: wrap; gap: 6px; align-items: center;",
            span {
                style: "font-size: 12px; color: #64748B;",
                "Comparing {selected.len()}/{MAX_COMPARE_PLACES}:"
            }
            for place in selected {
                span {
                    key: "{place}",
                    style: if place == target {
                        "display: inline-flex; gap: 4px; padding: 2px 8px; border-radius: 999px; background: #DBEAFE; border: 1px solid #2563EB; font-size: 12px;"
                    } else {
                        "display: inline-flex; gap: 4px; padding: 2px 8px; border-radius: 999px; background: #F1F5F9; border: 1px solid #CBD5E1; font-size: 12px;"
                    },
                    span {
                        style: "cursor: pointer;",
                        onclick: {
                            let place = place.clone();
                            move |_| filters.write().heatmap_target = place.clone()
                        },
                        "{place}"
                    }
                    button {
                        style: "border: none; background: none; cursor: pointer; padding: 0;",
                        title: "Remove",
                        onclick: {
                            let place = place.clone();
                            move |_| filters.write().remove_compared(&place)
                        },
                        "×"
                    }
                }
            }
            button {
                style: "border: none; background: none; color: #2563EB; cursor: pointer; font-size: 12px;",
                onclick: move |_| filters.write().clear_compared(),
                "Clear"
            }
        }
    }
}
