//! Loading placeholder.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct LoadingSpinnerProps {
    #[props(default = "Loading...".to_string())]
    pub label: String,
    #[props(default = 240)]
    pub min_height: u32,
}

/// Placeholder shown instead of stale content while a fetch is in flight.
#[component]
pub fn LoadingSpinner(props: LoadingSpinnerProps) -> Element {
    let style = format!(
        "display: flex; justify-content: center; align-items: center; min-height: {}px; color: #64748B;",
        props.min_height
    );
    rsx! {
        div { style: "{style}", "{props.label}" }
    }
}
