use crate::components::LoadingSpinner;
use crate::state::TrackingState;
use aqt_core::heatmap::{CalendarLayout, ColorScale, NO_DATA_COLOR, WEEKDAY_LABELS};
use dioxus::prelude::*;

const CELL: usize = 12;
const GAP: usize = 2;
const LEFT_GUTTER: usize = 28;
const TOP_GUTTER: usize = 16;

fn cell_origin(column: usize, row: usize) -> (usize, usize) {
    (
        LEFT_GUTTER + column * (CELL + GAP),
        TOP_GUTTER + row * (CELL + GAP),
    )
}

/// One-year calendar of daily values for the heatmap target.
#[component]
pub fn CalendarHeatmap() -> Element {
    let state = use_context::<TrackingState>();
    let mut hovered = use_signal(|| None::<usize>);

    let snapshot = state.heatmap.read();
    let filter = state.filters.read().heatmap_filter();
    let metric = state.filters.read().metric;

    if filter.is_empty() {
        return rsx! {
            div {
                style: "padding: 16px; color: #64748B;",
                "Select a place or province to see its one-year calendar."
            }
        };
    }
    if snapshot.loading {
        return rsx! { LoadingSpinner { label: "Loading calendar...".to_string(), min_height: 140 } };
    }

    let layout = CalendarLayout::build(*state.heatmap_window.read(), &snapshot.series);
    let scale = ColorScale::for_metric(metric, layout.values());
    let width = LEFT_GUTTER + layout.total_weeks * (CELL + GAP);
    let height = TOP_GUTTER + 7 * (CELL + GAP);

    let cells: Vec<(usize, usize, usize, &'static str)> = layout
        .cells
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let (x, y) = cell_origin(cell.column, cell.row);
            (idx, x, y, scale.color(cell.value))
        })
        .collect();
    let months: Vec<(usize, &'static str)> = layout
        .month_labels
        .iter()
        .enumerate()
        .filter(|(_, label)| !label.is_empty())
        .map(|(week, label)| (cell_origin(week, 0).0, *label))
        .collect();
    let weekdays: Vec<(usize, &'static str)> = [1, 3, 5]
        .into_iter()
        .map(|row| (cell_origin(0, row).1 + CELL - 2, WEEKDAY_LABELS[row]))
        .collect();
    let tooltip = hovered()
        .and_then(|idx| layout.cells.get(idx))
        .map(|cell| format!("{}: {}", cell.tooltip_title(), cell.tooltip_value(metric)));
    let legend = scale.legend();

    rsx! {
        div {
            style: "overflow-x: auto;",
            h3 { style: "margin: 0 0 8px 0; font-size: 15px;", "{filter} · last 12 months" }
            svg {
                width: "{width}",
                height: "{height}",
                for (x, label) in months {
                    text { x: "{x}", y: "10", font_size: "10", fill: "#64748B", "{label}" }
                }
                for (y, label) in weekdays {
                    text { x: "0", y: "{y}", font_size: "10", fill: "#64748B", "{label}" }
                }
                for (idx, x, y, color) in cells {
                    rect {
                        key: "{idx}",
                        x: "{x}", y: "{y}",
                        width: "{CELL}", height: "{CELL}",
                        rx: "2",
                        fill: "{color}",
                        onmouseenter: move |_| hovered.set(Some(idx)),
                        onmouseleave: move |_| hovered.set(None),
                    }
                }
            }
            div {
                style: "min-height: 18px; font-size: 12px; color: #334155;",
                if let Some(text) = tooltip {
                    "{text}"
                }
            }
            div {
                style: "display: flex; gap: 10px; align-items: center; font-size: 11px; color: #475569; margin-top: 4px;",
                span {
                    style: "display: inline-flex; align-items: center; gap: 4px;",
                    span { style: "width: 10px; height: 10px; background: {NO_DATA_COLOR};" }
                    "No data"
                }
                for (label, color) in legend {
                    span {
                        style: "display: inline-flex; align-items: center; gap: 4px;",
                        span { style: "width: 10px; height: 10px; background: {color};" }
                        "{label}"
                    }
                }
            }
            if snapshot.failed {
                p { style: "color: #B91C1C; font-size: 12px;", "Could not load the calendar." }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_step_by_size_plus_gap() {
        assert_eq!(cell_origin(0, 0), (LEFT_GUTTER, TOP_GUTTER));
        assert_eq!(cell_origin(2, 3), (LEFT_GUTTER + 28, TOP_GUTTER + 42));
    }
}
