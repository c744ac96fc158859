use crate::state::TrackingState;
use aqt_core::place::place_options;
use dioxus::prelude::*;

const DATALIST_ID: &str = "tracking-place-options";

/// Free-text place box with suggestions. Enter or "Add" quick-selects.
#[component]
pub fn PlaceSearch() -> Element {
    let state = use_context::<TrackingState>();
    let mut filters = state.filters;
    let mut query = use_signal(String::new);

    let suggestions = {
        let chart_labels = state.series.read().raw.dataset_labels();
        place_options(&state.places.read(), &chart_labels)
    };

    let mut submit = move || {
        let value = query.peek().trim().to_string();
        if value.is_empty() {
            return;
        }
        filters.write().quick_add_place(&value);
        query.set(String::new());
    };

    rsx! {
        div {
            style: "display: flex; gap: 6px; align-items: center;",
            input {
                style: "padding: 6px 8px; border: 1px solid #CBD5E1; border-radius: 6px; min-width: 220px;",
                r#type: "search",
                placeholder: "Search a place to compare",
                list: DATALIST_ID,
                value: "{query}",
                oninput: move |evt: Event<FormData>| query.set(evt.value()),
                onkeydown: move |evt: Event<KeyboardData>| {
                    if evt.key() == Key::Enter {
                        submit();
                    }
                },
            }
            datalist {
                id: DATALIST_ID,
                for place in suggestions {
                    option { value: "{place}" }
                }
            }
            button {
                style: "padding: 6px 12px; border: 1px solid #CBD5E1; border-radius: 6px; background: #F8FAFC; cursor: pointer;",
                onclick: move |_| submit(),
                "Add"
            }
        }
    }
}
