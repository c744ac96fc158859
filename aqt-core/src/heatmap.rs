//! One-year daily heatmap: series parsing, calendar layout and color scales.
//!
//! The calendar is a grid of week columns by weekday rows (0 = Sunday). Day
//! `i` of the window sits in column `(offset + i) / 7`, where `offset` is the
//! weekday of the first day, and in the row of its own weekday.
//!
//! Two color strategies are kept apart on purpose:
//! - [`ColorScale::FixedPm25`] uses the PM2.5 breakpoint table, so a color
//!   always means the same concentration.
//! - [`ColorScale::Linear`] splits the observed min..max of the loaded series
//!   into five equal spans, so colors are relative to the current data.

use crate::date_range::DayRange;
use crate::metric::Metric;
use chrono::{Datelike, Months, NaiveDate, TimeDelta};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Low-to-high color ramp shared by both scales.
pub const HEAT_COLORS: [&str; 5] = ["#86efac", "#a3e635", "#facc15", "#f97316", "#ef4444"];

/// Cell color for a day without a reading. Distinct from the lowest bucket.
pub const NO_DATA_COLOR: &str = "#e5e7eb";

/// Upper bounds (inclusive) of the first four PM2.5 buckets, in µg/m³.
pub const PM25_BREAKPOINTS: [f64; 4] = [12.0, 35.0, 55.0, 150.0];

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One day of the one-year series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyValue {
    /// Epoch milliseconds at the start of the day (UTC).
    pub timestamp: i64,
    pub date: NaiveDate,
    /// `None` means no reading that day.
    pub value: Option<f64>,
    pub count: u32,
}

/// Parse a day label such as `2024-03-01` or `2024-03-01T00:00:00Z`.
pub fn parse_day(label: &str) -> Option<NaiveDate> {
    let label = label.trim();
    let day = label.get(..10).unwrap_or(label);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Convert a `/api/chartdata/heatmap_one_year` payload into daily values.
///
/// Labels pair index-wise with the first dataset's samples. Non-numeric
/// samples become `None`; labels that are not dates are skipped.
pub fn daily_series_from_json(payload: &Value) -> Vec<DailyValue> {
    let labels = payload
        .get("labels")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let samples = payload
        .get("datasets")
        .and_then(|d| d.get(0))
        .and_then(|d| d.get("data"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    labels
        .iter()
        .enumerate()
        .filter_map(|(idx, label)| {
            let date = parse_day(label.as_str()?)?;
            let timestamp = date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis();
            Some(DailyValue {
                timestamp,
                date,
                value: samples.get(idx).and_then(Value::as_f64),
                count: 1,
            })
        })
        .collect()
}

/// The fixed one-year span shown by the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeatmapWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl HeatmapWindow {
    /// Exactly one year ending on `today`. Feb 29 maps to Mar 1 of the
    /// previous year.
    pub fn one_year_ending(today: NaiveDate) -> Self {
        let start = today
            .with_year(today.year() - 1)
            .or_else(|| NaiveDate::from_ymd_opt(today.year() - 1, 3, 1))
            .or_else(|| today.checked_sub_months(Months::new(12)))
            .unwrap_or(today);
        Self { start, end: today }
    }

    pub fn days(&self) -> DayRange {
        DayRange::new(self.start, self.end)
    }
}

/// A positioned day in the calendar grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// Week column.
    pub column: usize,
    /// Weekday row, 0 = Sunday.
    pub row: usize,
    pub value: Option<f64>,
}

impl CalendarCell {
    /// Tooltip heading, e.g. `Mon Jan 01 2024`.
    pub fn tooltip_title(&self) -> String {
        self.date.format("%a %b %d %Y").to_string()
    }

    /// Tooltip body, e.g. `PM25 12.3`, or `No data`.
    pub fn tooltip_value(&self, metric: Metric) -> String {
        match self.value {
            Some(v) if !v.is_nan() => format!("{} {:.1}", metric.as_str().to_uppercase(), v),
            _ => "No data".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarLayout {
    pub cells: Vec<CalendarCell>,
    /// Weekday of the window's first day.
    pub offset: usize,
    pub total_weeks: usize,
    /// One entry per column; empty where no month label is shown.
    pub month_labels: Vec<&'static str>,
}

impl CalendarLayout {
    /// Lay out every day of `window`, attaching values from `series`.
    /// When a day appears more than once in the series, the first wins.
    pub fn build(window: HeatmapWindow, series: &[DailyValue]) -> Self {
        let mut by_day: HashMap<NaiveDate, Option<f64>> = HashMap::with_capacity(series.len());
        for item in series {
            by_day.entry(item.date).or_insert(item.value);
        }

        let offset = window.start.weekday().num_days_from_sunday() as usize;
        let cells: Vec<CalendarCell> = window
            .days()
            .enumerate()
            .map(|(idx, date)| CalendarCell {
                date,
                column: (offset + idx) / 7,
                row: date.weekday().num_days_from_sunday() as usize,
                value: by_day.get(&date).copied().flatten(),
            })
            .collect();

        let total_weeks = (offset + cells.len()).div_ceil(7);
        let month_labels = month_labels(window.start, offset, total_weeks);

        Self {
            cells,
            offset,
            total_weeks,
            month_labels,
        }
    }

    /// Numeric values inside the window, for the dynamic scale.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.cells.iter().filter_map(|c| c.value).filter(|v| !v.is_nan())
    }
}

/// Label a column with its month when the column's first shown date starts a
/// new month within its first week. Prevents repeated labels in one span.
fn month_labels(start: NaiveDate, offset: usize, total_weeks: usize) -> Vec<&'static str> {
    let mut last_month = None;
    (0..total_weeks)
        .map(|col| {
            let shift = (col * 7) as i64 - offset as i64;
            let Some(date) = start.checked_add_signed(TimeDelta::days(shift)) else {
                return "";
            };
            let month = date.month0() as usize;
            if last_month != Some(month) && date.day() <= 7 {
                last_month = Some(month);
                MONTH_LABELS[month]
            } else {
                ""
            }
        })
        .collect()
}

/// Value-to-color mapping for heatmap cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorScale {
    /// PM2.5 breakpoint table: ≤12, ≤35, ≤55, ≤150, >150.
    FixedPm25,
    /// Five equal spans of the observed range; each entry is an inclusive
    /// upper bound.
    Linear { thresholds: [f64; 5] },
}

impl ColorScale {
    /// PM2.5 always uses the fixed table; other metrics scale to `values`.
    pub fn for_metric(metric: Metric, values: impl IntoIterator<Item = f64>) -> Self {
        match metric {
            Metric::Pm25 => ColorScale::FixedPm25,
            Metric::Pm10 | Metric::Aqi => ColorScale::linear(values),
        }
    }

    /// Thresholds at min + {0.2, 0.4, 0.6, 0.8, 1.0} of the span, where the
    /// span is at least 1. An empty input scales over 0..1.
    pub fn linear(values: impl IntoIterator<Item = f64>) -> Self {
        let (min, max) = values
            .into_iter()
            .filter(|v| !v.is_nan())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                None => Some((v, v)),
            })
            .unwrap_or((0.0, 1.0));
        let span = (max - min).max(1.0);
        let thresholds = [0.2, 0.4, 0.6, 0.8, 1.0].map(|r| min + r * span);
        ColorScale::Linear { thresholds }
    }

    /// Bucket index into [`HEAT_COLORS`], or `None` for a missing value.
    pub fn bucket(&self, value: Option<f64>) -> Option<usize> {
        let v = value.filter(|v| !v.is_nan())?;
        let bucket = match self {
            ColorScale::FixedPm25 => PM25_BREAKPOINTS
                .iter()
                .position(|bound| v <= *bound)
                .unwrap_or(PM25_BREAKPOINTS.len()),
            ColorScale::Linear { thresholds } => thresholds
                .iter()
                .position(|bound| v <= *bound)
                .unwrap_or(thresholds.len() - 1),
        };
        Some(bucket)
    }

    pub fn color(&self, value: Option<f64>) -> &'static str {
        self.bucket(value)
            .map(|b| HEAT_COLORS[b])
            .unwrap_or(NO_DATA_COLOR)
    }

    /// Legend entries, one per bucket, lowest first.
    pub fn legend(&self) -> Vec<(String, &'static str)> {
        let labels: Vec<String> = match self {
            ColorScale::FixedPm25 => PM25_BREAKPOINTS
                .iter()
                .map(|b| format!("≤{b}"))
                .chain(std::iter::once(format!(">{}", PM25_BREAKPOINTS[3])))
                .collect(),
            ColorScale::Linear { thresholds } => {
                thresholds.iter().map(|t| format!("≤{t:.0}")).collect()
            }
        };
        labels.into_iter().zip(HEAT_COLORS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn pm25_fixed_buckets() {
        let scale = ColorScale::for_metric(Metric::Pm25, []);
        let buckets: Vec<Option<usize>> = [10.0, 20.0, 40.0, 100.0, 200.0]
            .into_iter()
            .map(|v| scale.bucket(Some(v)))
            .collect();
        assert_eq!(buckets, vec![Some(0), Some(1), Some(2), Some(3), Some(4)]);
        assert_eq!(scale.color(None), NO_DATA_COLOR);
        assert_eq!(scale.color(Some(f64::NAN)), NO_DATA_COLOR);
        assert_eq!(scale.color(Some(12.0)), HEAT_COLORS[0], "bounds are inclusive");
        assert_ne!(NO_DATA_COLOR, HEAT_COLORS[0]);
    }

    #[test]
    fn linear_scale_spans_observed_range() {
        let scale = ColorScale::for_metric(Metric::Aqi, [0.0, 100.0, 50.0]);
        assert_eq!(
            scale,
            ColorScale::Linear {
                thresholds: [20.0, 40.0, 60.0, 80.0, 100.0]
            }
        );
        assert_eq!(scale.bucket(Some(0.0)), Some(0));
        assert_eq!(scale.bucket(Some(41.0)), Some(2));
        assert_eq!(scale.bucket(Some(100.0)), Some(4));
        assert_eq!(scale.bucket(Some(500.0)), Some(4));
    }

    #[test]
    fn legend_labels() {
        let fixed: Vec<String> = ColorScale::FixedPm25
            .legend()
            .into_iter()
            .map(|(label, _)| label)
            .collect();
        assert_eq!(fixed, vec!["≤12", "≤35", "≤55", "≤150", ">150"]);

        let linear = ColorScale::linear([0.0, 100.0]).legend();
        assert_eq!(linear[0], ("≤20".to_string(), HEAT_COLORS[0]));
        assert_eq!(linear[4].0, "≤100");
    }

    #[test]
    fn linear_scale_minimum_span_is_one() {
        let scale = ColorScale::linear([30.0, 30.0]);
        assert_eq!(
            scale,
            ColorScale::Linear {
                thresholds: [30.2, 30.4, 30.6, 30.8, 31.0]
            }
        );
        assert_eq!(
            ColorScale::linear([]),
            ColorScale::Linear {
                thresholds: [0.2, 0.4, 0.6, 0.8, 1.0]
            }
        );
    }

    #[test]
    fn parses_heatmap_payload() {
        let payload = json!({
            "labels": ["2024-01-01", "2024-01-02T00:00:00Z", "garbage", 5],
            "datasets": [{ "label": "Chiang Mai", "data": [12.5, null, 3, 4] }]
        });
        let series = daily_series_from_json(&payload);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, ymd(2024, 1, 1));
        assert_eq!(series[0].timestamp, 1_704_067_200_000);
        assert_eq!(series[0].value, Some(12.5));
        assert_eq!(series[0].count, 1);
        assert_eq!(series[1].value, None);
    }

    #[test]
    fn missing_datasets_leave_values_undefined() {
        let series = daily_series_from_json(&json!({ "labels": ["2024-05-05"] }));
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].value, None);
        assert!(daily_series_from_json(&json!("nope")).is_empty());
    }

    #[test]
    fn window_is_one_year() {
        let w = HeatmapWindow::one_year_ending(ymd(2025, 6, 15));
        assert_eq!(w.start, ymd(2024, 6, 15));
        let leap = HeatmapWindow::one_year_ending(ymd(2024, 2, 29));
        assert_eq!(leap.start, ymd(2023, 3, 1));
    }

    #[test]
    fn layout_columns_follow_weekday_offset() {
        // 2024-01-03 is a Wednesday.
        let window = HeatmapWindow {
            start: ymd(2024, 1, 3),
            end: ymd(2024, 1, 10),
        };
        let series = vec![
            DailyValue {
                timestamp: 0,
                date: ymd(2024, 1, 6),
                value: Some(7.0),
                count: 1,
            },
            DailyValue {
                timestamp: 0,
                date: ymd(2024, 1, 6),
                value: Some(99.0),
                count: 1,
            },
        ];
        let layout = CalendarLayout::build(window, &series);
        assert_eq!(layout.offset, 3);
        assert_eq!(layout.cells.len(), 8);
        assert_eq!((layout.cells[0].column, layout.cells[0].row), (0, 3));
        // Saturday stays in the first column, Sunday starts the second.
        assert_eq!((layout.cells[3].column, layout.cells[3].row), (0, 6));
        assert_eq!((layout.cells[4].column, layout.cells[4].row), (1, 0));
        assert_eq!(layout.cells[3].value, Some(7.0), "first occurrence wins");
        assert_eq!(layout.cells[0].value, None);
        assert_eq!(layout.total_weeks, 2);
    }

    #[test]
    fn month_labels_appear_once_per_month() {
        let window = HeatmapWindow::one_year_ending(ymd(2024, 12, 31));
        let layout = CalendarLayout::build(window, &[]);
        assert_eq!(layout.month_labels.len(), layout.total_weeks);
        let shown: Vec<&str> = layout
            .month_labels
            .iter()
            .copied()
            .filter(|l| !l.is_empty())
            .collect();
        assert_eq!(shown.len(), 12);
        assert_eq!(shown[0], "Jan");
        assert_eq!(shown[11], "Dec");
        // 2023-12-31 through 2024-12-31 inclusive, across a leap year.
        assert_eq!(layout.cells.len(), 367);
    }

    #[test]
    fn tooltip_text() {
        let cell = CalendarCell {
            date: ymd(2024, 1, 1),
            column: 0,
            row: 1,
            value: Some(12.345),
        };
        assert_eq!(cell.tooltip_title(), "Mon Jan 01 2024");
        assert_eq!(cell.tooltip_value(Metric::Pm25), "PM25 12.3");
        let empty = CalendarCell { value: None, ..cell };
        assert_eq!(empty.tooltip_value(Metric::Aqi), "No data");
    }
}
