//! "Last updated" badges: the latest single reading and the compare span.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Rendered when no timestamp is known.
pub const MISSING_AGE: &str = "—";

/// Payload of `/api/airquality/latest`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatestReading {
    pub aqi: Option<f64>,
    /// Epoch milliseconds.
    pub timestamp: Option<i64>,
}

impl LatestReading {
    /// Lenient parse: anything that is not a number is treated as absent.
    pub fn from_json(value: &Value) -> LatestReading {
        LatestReading {
            aqi: value.get("aqi").and_then(Value::as_f64),
            timestamp: value.get("timestamp").and_then(epoch_ms),
        }
    }
}

/// A JSON number read as epoch milliseconds. Fractions are truncated.
/// Values outside chrono's representable range are treated as absent.
pub fn epoch_ms(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|v| v.is_finite()).map(|v| v as i64))
        .filter(|ms| DateTime::<Utc>::from_timestamp_millis(*ms).is_some())
}

/// Oldest and newest latest-reading timestamps across compared places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FreshnessSpan {
    pub min: i64,
    pub max: i64,
}

impl FreshnessSpan {
    /// `None` when there are no timestamps, never a zero span.
    pub fn from_timestamps(timestamps: impl IntoIterator<Item = i64>) -> Option<Self> {
        timestamps.into_iter().fold(None, |acc, ts| {
            Some(match acc {
                Some(FreshnessSpan { min, max }) => FreshnessSpan {
                    min: min.min(ts),
                    max: max.max(ts),
                },
                None => FreshnessSpan { min: ts, max: ts },
            })
        })
    }

    /// `Last updated: 3h–5m ago`. The oldest reading comes first.
    pub fn describe(&self, now_ms: i64) -> String {
        format!(
            "Last updated: {}–{} ago",
            compact_age(now_ms, self.min),
            compact_age(now_ms, self.max)
        )
    }
}

/// Badge text for an optional span.
pub fn describe_span(span: Option<FreshnessSpan>, now_ms: i64) -> String {
    match span {
        Some(span) => span.describe(now_ms),
        None => format!("Last updated: {MISSING_AGE}"),
    }
}

/// `42s`, `5m`, `3h` or `2d`. Future timestamps count as zero.
pub fn compact_age(now_ms: i64, ts_ms: i64) -> String {
    let secs = now_ms.saturating_sub(ts_ms).max(0) / 1000;
    if secs < 60 {
        return format!("{secs}s");
    }
    let mins = secs / 60;
    if mins < 60 {
        return format!("{mins}m");
    }
    let hours = mins / 60;
    if hours < 24 {
        return format!("{hours}h");
    }
    format!("{}d", hours / 24)
}

/// `42s ago` style age of a single reading. A timestamp in the future is
/// shown as a date instead.
pub fn format_age(now_ms: i64, ts_ms: Option<i64>) -> String {
    let Some(ts) = ts_ms.filter(|ts| *ts != 0) else {
        return MISSING_AGE.to_string();
    };
    if now_ms < ts {
        return DateTime::<Utc>::from_timestamp_millis(ts)
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| MISSING_AGE.to_string());
    }
    format!("{} ago", compact_age(now_ms, ts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn span_over_timestamps() {
        assert_eq!(FreshnessSpan::from_timestamps([]), None);
        assert_eq!(
            FreshnessSpan::from_timestamps([30, 10, 20]),
            Some(FreshnessSpan { min: 10, max: 30 })
        );
    }

    #[test]
    fn age_units() {
        assert_eq!(format_age(NOW, Some(NOW - 42_000)), "42s ago");
        assert_eq!(format_age(NOW, Some(NOW - 5 * 60_000)), "5m ago");
        assert_eq!(format_age(NOW, Some(NOW - 3 * 3_600_000)), "3h ago");
        assert_eq!(format_age(NOW, Some(NOW - 49 * 3_600_000)), "2d ago");
        assert_eq!(format_age(NOW, None), "—");
        assert_eq!(format_age(NOW, Some(NOW + 1_000)), "2023-11-14 22:13:21");
    }

    #[test]
    fn span_text() {
        let span = FreshnessSpan {
            min: NOW - 3 * 3_600_000,
            max: NOW - 5 * 60_000,
        };
        assert_eq!(span.describe(NOW), "Last updated: 3h–5m ago");
        assert_eq!(describe_span(None, NOW), "Last updated: —");
    }

    #[test]
    fn latest_reading_is_lenient() {
        let reading = LatestReading::from_json(&json!({ "aqi": 87, "timestamp": 1_700_000_000_000i64 }));
        assert_eq!(reading.aqi, Some(87.0));
        assert_eq!(reading.timestamp, Some(NOW));

        let junk = LatestReading::from_json(&json!({ "aqi": "high", "timestamp": "today" }));
        assert_eq!(junk, LatestReading { aqi: None, timestamp: None });
    }

    #[test]
    fn extreme_timestamps_degrade_instead_of_overflowing() {
        let reading = LatestReading::from_json(&json!({ "timestamp": -1e300 }));
        assert_eq!(reading.timestamp, None);
        assert_eq!(format_age(NOW, reading.timestamp), "—");
        assert!(compact_age(i64::MAX, i64::MIN).ends_with('d'));
        let span = FreshnessSpan { min: i64::MIN, max: NOW };
        assert!(span.describe(NOW).starts_with("Last updated: "));
        assert_eq!(compact_age(i64::MIN, i64::MAX), "0s");
    }
}
