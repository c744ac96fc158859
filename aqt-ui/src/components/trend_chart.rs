//! Multi-series line chart of the pivoted chart rows, drawn as inline SVG.

use crate::components::LoadingSpinner;
use aqt_core::chart::ChartTable;
use aqt_core::heatmap::PM25_BREAKPOINTS;
use aqt_core::Metric;
use dioxus::prelude::*;

const WIDTH: f64 = 820.0;
const HEIGHT: f64 = 300.0;
const MARGIN_LEFT: f64 = 44.0;
const MARGIN_RIGHT: f64 = 12.0;
const MARGIN_TOP: f64 = 12.0;
const MARGIN_BOTTOM: f64 = 28.0;
const MAX_X_TICKS: usize = 6;

pub const SERIES_COLORS: [&str; 6] = [
    "#2563EB", "#16A34A", "#DC2626", "#9333EA", "#EA580C", "#0891B2",
];

/// Pixel geometry for one table, independent of rendering.
#[derive(Debug, Clone, PartialEq)]
struct Geometry {
    y_max: f64,
    count: usize,
}

impl Geometry {
    fn new(table: &ChartTable) -> Self {
        Self {
            y_max: table.max_value().filter(|m| *m > 0.0).unwrap_or(1.0),
            count: table.rows.len(),
        }
    }

    fn plot_width(&self) -> f64 {
        WIDTH - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn plot_height(&self) -> f64 {
        HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
    }

    fn x(&self, idx: usize) -> f64 {
        if self.count <= 1 {
            return MARGIN_LEFT + self.plot_width() / 2.0;
        }
        MARGIN_LEFT + self.plot_width() * idx as f64 / (self.count - 1) as f64
    }

    fn y(&self, value: f64) -> f64 {
        let clamped = value.clamp(0.0, self.y_max);
        MARGIN_TOP + self.plot_height() * (1.0 - clamped / self.y_max)
    }

    /// SVG `points` for series column `col`.
    fn polyline(&self, table: &ChartTable, col: usize) -> String {
        table
            .rows
            .iter()
            .enumerate()
            .filter_map(|(idx, row)| row.values.get(col).map(|v| (idx, *v)))
            .map(|(idx, v)| format!("{:.1},{:.1}", self.x(idx), self.y(v)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Row indexes that get an x-axis label.
    fn x_ticks(&self) -> Vec<usize> {
        if self.count == 0 {
            return Vec::new();
        }
        let step = self.count.div_ceil(MAX_X_TICKS).max(1);
        (0..self.count).step_by(step).collect()
    }
}

/// Reference lines worth drawing for `metric` inside `0..=y_max`.
fn reference_lines(metric: Metric, y_max: f64) -> Vec<f64> {
    match metric {
        Metric::Pm25 => PM25_BREAKPOINTS
            .iter()
            .copied()
            .filter(|b| *b <= y_max)
            .collect(),
        Metric::Pm10 | Metric::Aqi => Vec::new(),
    }
}

/// Shorten ISO timestamps to what fits under the axis.
fn short_label(label: &str) -> &str {
    match label.split_once('T') {
        Some((_, time)) if time.len() >= 5 => time.get(..5).unwrap_or(time),
        Some((day, _)) => day,
        None => label,
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct TrendChartProps {
    pub table: ChartTable,
    pub metric: Metric,
    #[props(default = false)]
    pub loading: bool,
}

#[component]
pub fn TrendChart(props: TrendChartProps) -> Element {
    if props.loading {
        return rsx! { LoadingSpinner { label: "Loading chart...".to_string(), min_height: 300 } };
    }
    if props.table.is_empty() {
        return rsx! {
            div {
                style: "display: flex; justify-content: center; align-items: center; min-height: 300px; color: #64748B;",
                "No data"
            }
        };
    }

    let table = &props.table;
    let geometry = Geometry::new(table);
    let view_box = format!("0 0 {WIDTH} {HEIGHT}");
    let baseline = geometry.y(0.0);
    let plot_right = WIDTH - MARGIN_RIGHT;

    let lines: Vec<(String, &str, String)> = table
        .series
        .iter()
        .enumerate()
        .map(|(col, name)| {
            (
                name.clone(),
                SERIES_COLORS[col % SERIES_COLORS.len()],
                geometry.polyline(table, col),
            )
        })
        .collect();
    let y_ticks: Vec<(f64, String)> = [0.0, geometry.y_max / 2.0, geometry.y_max]
        .into_iter()
        .map(|v| (geometry.y(v), format!("{v:.0}")))
        .collect();
    let x_ticks: Vec<(f64, String)> = geometry
        .x_ticks()
        .into_iter()
        .map(|idx| (geometry.x(idx), short_label(&table.rows[idx].label).to_string()))
        .collect();
    let references: Vec<(f64, String)> = reference_lines(props.metric, geometry.y_max)
        .into_iter()
        .map(|v| (geometry.y(v), format!("{v}")))
        .collect();

    rsx! {
        div {
            style: "width: 100%;",
            svg {
                view_box: "{view_box}",
                width: "100%",
                style: "max-height: 340px;",
                line {
                    x1: "{MARGIN_LEFT}", y1: "{baseline}",
                    x2: "{plot_right}", y2: "{baseline}",
                    stroke: "#CBD5E1",
                }
                for (y, label) in y_ticks {
                    text {
                        x: "{MARGIN_LEFT - 6.0}", y: "{y + 4.0}",
                        text_anchor: "end", font_size: "11", fill: "#64748B",
                        "{label}"
                    }
                }
                for (x, label) in x_ticks {
                    text {
                        x: "{x}", y: "{HEIGHT - 8.0}",
                        text_anchor: "middle", font_size: "11", fill: "#64748B",
                        "{label}"
                    }
                }
                for (y, label) in references {
                    line {
                        x1: "{MARGIN_LEFT}", y1: "{y}",
                        x2: "{plot_right}", y2: "{y}",
                        stroke: "#F59E0B", stroke_dasharray: "4 4", stroke_width: "1",
                    }
                    text {
                        x: "{plot_right}", y: "{y - 3.0}",
                        text_anchor: "end", font_size: "10", fill: "#B45309",
                        "{label}"
                    }
                }
                for (name, color, points) in lines.iter() {
                    polyline {
                        key: "{name}",
                        points: "{points}",
                        fill: "none",
                        stroke: "{color}",
                        stroke_width: "2",
                    }
                }
            }
            div {
                style: "display: flex; flex-wrap: wrap; gap: 12px; font-size: 12px; margin-top: 4px;",
                for (name, color, _) in lines.iter() {
                    span {
                        key: "{name}",
                        style: "display: inline-flex; align-items: center; gap: 4px;",
                        span { style: "width: 10px; height: 10px; border-radius: 2px; background: {color};" }
                        "{name}"
                    }
                }
            }
        }
    }
}
