use crate::state::TrackingState;
use aqt_core::freshness::{describe_span, format_age};
use chrono::{DateTime, Local, Utc};
use dioxus::prelude::*;

/// Local wall-clock time of the last successful sync.
fn last_sync_label(at: Option<DateTime<Utc>>) -> Option<String> {
    at.map(|at| at.with_timezone(&Local).format("%H:%M:%S").to_string())
}

/// Freshness, current AQI and sync status in one line.
#[component]
pub fn StatusBar() -> Element {
    let state = use_context::<TrackingState>();
    let now = *state.now_ms.read();
    let comparing = state.filters.read().is_comparing();

    let freshness = if comparing {
        describe_span(*state.compare_span.read(), now)
    } else if *state.latest_loading.read() && state.latest.read().is_none() {
        "Last updated: loading…".to_string()
    } else {
        let ts = state.latest.read().and_then(|r| r.timestamp);
        format!("Last updated: {}", format_age(now, ts))
    };
    let aqi = state
        .latest
        .read()
        .and_then(|r| r.aqi)
        .filter(|_| !comparing)
        .map(|v| format!("AQI {v:.0}"));
    let message = state.sync_message.cloned();
    let last_sync = last_sync_label(*state.last_sync.read());

    rsx! {
        div {
            style: "display: flex; flex-wrap: wrap; gap: 16px; font-size: 12px; color: #475569;",
            span { "{freshness}" }
            if let Some(aqi) = aqi {
                span { style: "font-weight: 600;", "{aqi}" }
            }
            if let Some(message) = message {
                span { style: "color: #0F766E;", "{message}" }
            }
            if let Some(at) = last_sync {
                span { "Last sync {at}" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_sync_is_shown_as_local_time() {
        assert_eq!(last_sync_label(None), None);
        let at = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        let label = last_sync_label(Some(at)).unwrap();
        assert_eq!(label.len(), 8);
        assert_eq!(label.matches(':').count(), 2);
        assert!(label.ends_with(":20"));
    }
}
