//! Chart payloads from `/api/chartdata`.
//!
//! The endpoint returns `{ labels: string[], datasets: [{ label, data }] }`.
//! This module validates that payload, merges per-place payloads onto one
//! label axis for comparison mode, and pivots datasets into tabular rows for
//! the trend chart and CSV export.

use indexmap::IndexSet;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;

/// Series cap when not comparing places.
pub const DEFAULT_MAX_SERIES: usize = 5;

/// One named series of samples, index-aligned with [`ChartData::labels`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
}

impl Dataset {
    /// Accept a dataset only when the label is a string and every sample is a
    /// number. A partially valid dataset is dropped entirely.
    pub fn from_json(value: &Value) -> Option<Dataset> {
        let label = value.get("label")?.as_str()?.to_string();
        let data = value
            .get("data")?
            .as_array()?
            .iter()
            .map(Value::as_f64)
            .collect::<Option<Vec<f64>>>()?;
        Some(Dataset { label, data })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    /// Validate a raw chart payload. Anything malformed degrades to empty.
    pub fn from_json(value: &Value) -> ChartData {
        let labels = value
            .get("labels")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(label_text).collect())
            .unwrap_or_default();

        let datasets = match value.get("datasets").and_then(Value::as_array) {
            Some(items) => {
                let valid: Vec<Dataset> = items.iter().filter_map(Dataset::from_json).collect();
                if valid.len() < items.len() {
                    log::debug!(
                        "dropped {} malformed dataset(s) of {}",
                        items.len() - valid.len(),
                        items.len()
                    );
                }
                valid
            }
            None => Vec::new(),
        };

        ChartData { labels, datasets }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.datasets.is_empty()
    }

    /// Names of every dataset, in payload order.
    pub fn dataset_labels(&self) -> Vec<String> {
        self.datasets.iter().map(|d| d.label.clone()).collect()
    }
}

fn label_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

/// Merge one payload per compared place onto a shared label axis.
///
/// The longest label sequence is the canonical base; labels only seen in
/// other payloads are appended in first-seen order. Each place contributes
/// its first dataset, re-mapped onto the union and zero-padded where it has
/// no sample. The output datasets are labeled with the place names.
pub fn merge_comparison(places: &[String], fetched: &[ChartData]) -> ChartData {
    let Some(first) = fetched.first() else {
        return ChartData::default();
    };
    let canonical = fetched.iter().fold(first, |longest, candidate| {
        if candidate.labels.len() > longest.labels.len() {
            candidate
        } else {
            longest
        }
    });

    let mut union: IndexSet<&str> = canonical.labels.iter().map(String::as_str).collect();
    for chart in fetched {
        union.extend(chart.labels.iter().map(String::as_str));
    }

    let datasets = fetched
        .iter()
        .zip(places)
        .map(|(chart, place)| {
            let mut by_label: HashMap<&str, f64> = HashMap::new();
            if let Some(series) = chart.datasets.first() {
                for (label, value) in chart.labels.iter().zip(&series.data) {
                    by_label.insert(label.as_str(), *value);
                }
            }
            Dataset {
                label: place.clone(),
                data: union
                    .iter()
                    .map(|label| by_label.get(label).copied().unwrap_or(0.0))
                    .collect(),
            }
        })
        .collect();

    ChartData {
        labels: union.iter().map(|s| s.to_string()).collect(),
        datasets,
    }
}

/// One row of the trend table: a label and one value per series.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRow {
    pub label: String,
    pub values: Vec<f64>,
}

/// Chart datasets pivoted into rows, one per label.
///
/// Serializes as `[{ "label": "...", "<series>": number, ... }]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartTable {
    pub series: Vec<String>,
    pub rows: Vec<ChartRow>,
}

impl ChartTable {
    /// Pivot at most `max_series` datasets. Missing samples become 0.
    pub fn from_chart(chart: &ChartData, max_series: usize) -> ChartTable {
        let active: Vec<&Dataset> = chart.datasets.iter().take(max_series).collect();
        let rows = chart
            .labels
            .iter()
            .enumerate()
            .map(|(idx, label)| ChartRow {
                label: label.clone(),
                values: active
                    .iter()
                    .map(|ds| ds.data.get(idx).copied().unwrap_or(0.0))
                    .collect(),
            })
            .collect();
        ChartTable {
            series: active.iter().map(|ds| ds.label.clone()).collect(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of `series` in row `row`, if both exist.
    pub fn value(&self, row: usize, series: &str) -> Option<f64> {
        let col = self.series.iter().position(|s| s == series)?;
        self.rows.get(row)?.values.get(col).copied()
    }

    /// Largest value across all rows and series.
    pub fn max_value(&self) -> Option<f64> {
        self.rows
            .iter()
            .flat_map(|r| r.values.iter().copied())
            .reduce(f64::max)
    }

    /// CSV with a `label` column followed by one column per series, in
    /// series order.
    pub fn to_csv(&self) -> anyhow::Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        let mut header = Vec::with_capacity(self.series.len() + 1);
        header.push("label");
        header.extend(self.series.iter().map(String::as_str));
        writer.write_record(&header)?;

        for row in &self.rows {
            let mut record = Vec::with_capacity(row.values.len() + 1);
            record.push(row.label.clone());
            record.extend(row.values.iter().map(|v| v.to_string()));
            writer.write_record(&record)?;
        }
        let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!("{}", e))?;
        Ok(String::from_utf8(bytes)?)
    }
}

impl Serialize for ChartTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&RowRecord {
                series: &self.series,
                row,
            })?;
        }
        seq.end()
    }
}

struct RowRecord<'a> {
    series: &'a [String],
    row: &'a ChartRow,
}

impl Serialize for RowRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.series.len() + 1))?;
        map.serialize_entry("label", &self.row.label)?;
        for (name, value) in self.series.iter().zip(&self.row.values) {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Download name for a CSV export of the current chart.
pub fn csv_file_name(range: &str, metric: &str, now_ms: i64) -> String {
    format!("tracking_{range}_{metric}_{now_ms}.csv")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chart(labels: &[&str], data: &[f64]) -> ChartData {
        ChartData {
            labels: labels.iter().map(|s| s.to_string()).collect(),
            datasets: vec![Dataset {
                label: "series".into(),
                data: data.to_vec(),
            }],
        }
    }

    #[test]
    fn comparison_union_zero_pads() {
        let places = vec!["place1".to_string(), "place2".to_string()];
        let merged = merge_comparison(
            &places,
            &[chart(&["a", "b"], &[1.0, 2.0]), chart(&["b", "c"], &[3.0, 4.0])],
        );
        assert_eq!(merged.labels, vec!["a", "b", "c"]);
        assert_eq!(merged.datasets[0].label, "place1");
        assert_eq!(merged.datasets[0].data, vec![1.0, 2.0, 0.0]);
        assert_eq!(merged.datasets[1].label, "place2");
        assert_eq!(merged.datasets[1].data, vec![0.0, 3.0, 4.0]);
    }

    #[test]
    fn comparison_uses_longest_label_set_as_base() {
        let places = vec!["short".to_string(), "long".to_string()];
        let merged = merge_comparison(
            &places,
            &[chart(&["z"], &[9.0]), chart(&["a", "b", "z"], &[1.0, 2.0, 3.0])],
        );
        assert_eq!(merged.labels, vec!["a", "b", "z"]);
        assert_eq!(merged.datasets[0].data, vec![0.0, 0.0, 9.0]);
    }

    #[test]
    fn comparison_place_without_datasets_is_all_zero() {
        let places = vec!["empty".to_string(), "full".to_string()];
        let empty = ChartData {
            labels: vec!["a".into()],
            datasets: vec![],
        };
        let merged = merge_comparison(&places, &[empty, chart(&["a", "b"], &[5.0, 6.0])]);
        assert_eq!(merged.datasets[0].data, vec![0.0, 0.0]);
        assert_eq!(merged.datasets[1].data, vec![5.0, 6.0]);
    }

    #[test]
    fn drops_malformed_datasets_only() {
        let payload = json!({
            "labels": ["00:00", "01:00"],
            "datasets": [
                { "label": "ok", "data": [1, 2.5] },
                { "label": 7, "data": [1, 2] },
                { "label": "not array", "data": "1,2" },
                { "label": "has null", "data": [1, null] },
                null
            ]
        });
        let chart = ChartData::from_json(&payload);
        assert_eq!(chart.labels, vec!["00:00", "01:00"]);
        assert_eq!(chart.dataset_labels(), vec!["ok"]);
        assert_eq!(chart.datasets[0].data, vec![1.0, 2.5]);
    }

    #[test]
    fn malformed_payload_is_empty() {
        assert!(ChartData::from_json(&json!(null)).is_empty());
        assert!(ChartData::from_json(&json!({ "labels": "x", "datasets": {} })).is_empty());
    }

    #[test]
    fn pivots_rows_and_caps_series() {
        let data = ChartData {
            labels: vec!["Mon".into(), "Tue".into()],
            datasets: (0..7)
                .map(|i| Dataset {
                    label: format!("s{i}"),
                    data: vec![i as f64],
                })
                .collect(),
        };
        let table = ChartTable::from_chart(&data, DEFAULT_MAX_SERIES);
        assert_eq!(table.series.len(), 5);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.value(0, "s3"), Some(3.0));
        assert_eq!(table.value(1, "s3"), Some(0.0), "short data pads with zero");
        assert_eq!(table.value(0, "s6"), None);
        assert_eq!(table.max_value(), Some(4.0));
    }

    #[test]
    fn table_serializes_as_flat_rows() {
        let table = ChartTable::from_chart(&chart(&["a"], &[1.5]), 5);
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json, json!([{ "label": "a", "series": 1.5 }]));
    }

    #[test]
    fn csv_export_uses_series_order() {
        let places = vec!["Mae Hia".to_string(), "Suthep, CM".to_string()];
        let merged = merge_comparison(
            &places,
            &[chart(&["a", "b"], &[1.0, 2.5]), chart(&["b"], &[3.0])],
        );
        let csv = ChartTable::from_chart(&merged, places.len()).to_csv().unwrap();
        assert_eq!(csv, "label,Mae Hia,\"Suthep, CM\"\na,1,0\nb,2.5,3\n");
    }

    #[test]
    fn csv_file_name_format() {
        assert_eq!(
            csv_file_name("1 Week", "pm25", 1700000000000),
            "tracking_1 Week_pm25_1700000000000.csv"
        );
    }
}
