//! Monitoring place records.
//!
//! The `/places` endpoint has returned several field spellings over time, so
//! every record goes through one alias table before anything else sees it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Field aliases, tried in order. The first alias with a non-empty value wins.
pub const LABEL_FIELDS: &[&str] = &["label", "place", "address"];
pub const ADDRESS_FIELDS: &[&str] = &["address"];
pub const LATITUDE_FIELDS: &[&str] = &["latitude", "lat", "Latitude"];
pub const LONGITUDE_FIELDS: &[&str] = &["longitude", "lon", "Longitude"];

/// Thai address prefix preceding the province name ("จ." = changwat).
const PROVINCE_PREFIX: &str = "จ.";

/// A named monitoring location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub label: String,
    pub address: String,
    pub lat: f64,
    pub lon: f64,
}

/// Look up the first alias holding a usable value.
fn lookup<'a>(record: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().filter_map(|key| record.get(*key)).find(|v| match v {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    })
}

fn text_field(record: &Value, aliases: &[&str]) -> String {
    match lookup(record, aliases) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Coerce to a finite coordinate, substituting 0.
fn coordinate_field(record: &Value, aliases: &[&str]) -> f64 {
    let parsed = match lookup(record, aliases) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

impl Place {
    /// Normalize one raw backend record. Returns `None` when no label resolves.
    pub fn from_record(record: &Value) -> Option<Place> {
        let label = text_field(record, LABEL_FIELDS);
        if label.is_empty() {
            return None;
        }
        Some(Place {
            label,
            address: text_field(record, ADDRESS_FIELDS),
            lat: coordinate_field(record, LATITUDE_FIELDS),
            lon: coordinate_field(record, LONGITUDE_FIELDS),
        })
    }

    pub fn has_coordinates(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

/// Normalize a `/places` payload. Non-array payloads yield nothing.
///
/// Records are deduplicated by `(label, address)`; the first occurrence wins
/// and insertion order is kept.
pub fn normalize_places(payload: &Value) -> Vec<Place> {
    let Some(items) = payload.as_array() else {
        log::warn!("places payload is not an array");
        return Vec::new();
    };

    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut places = Vec::with_capacity(items.len());
    for place in items.iter().filter_map(Place::from_record) {
        if seen.insert((place.label.clone(), place.address.clone())) {
            places.push(place);
        }
    }
    places
}

/// Places whose address or label mentions `province` (case-insensitive).
/// A blank province returns every place.
pub fn places_in_province<'a>(places: &'a [Place], province: &str) -> Vec<&'a Place> {
    let needle = province.trim().to_lowercase();
    if needle.is_empty() {
        return places.iter().collect();
    }
    places
        .iter()
        .filter(|p| {
            p.address.to_lowercase().contains(&needle) || p.label.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Province choices: distinct chart dataset labels when the chart has any,
/// otherwise a best-effort guess from place addresses.
pub fn province_options(chart_labels: &[String], places: &[Place]) -> Vec<String> {
    let from_chart = distinct(chart_labels.iter().map(String::as_str));
    if !from_chart.is_empty() {
        return from_chart;
    }
    distinct(places.iter().filter_map(|p| province_from_address(&p.address)))
}

/// Place choices: distinct place labels, falling back to chart dataset labels.
pub fn place_options(places: &[Place], chart_labels: &[String]) -> Vec<String> {
    let labels = distinct(places.iter().map(|p| p.label.as_str()));
    if !labels.is_empty() {
        return labels;
    }
    distinct(chart_labels.iter().map(String::as_str))
}

fn province_from_address(address: &str) -> Option<&str> {
    let candidate = match address.split_once(PROVINCE_PREFIX) {
        Some((_, rest)) => rest.trim(),
        None => address.split_whitespace().last().unwrap_or(""),
    };
    (!candidate.is_empty()).then_some(candidate)
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| !v.is_empty() && seen.insert(*v))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_field_name_variants() {
        let payload = json!([
            { "label": "A", "address": "addr A", "latitude": 18.79, "longitude": 98.98 },
            { "place": "B", "lat": "18.5", "lon": "98.1" },
            { "address": "C street", "Latitude": 13.7, "Longitude": 100.5 },
        ]);
        let places = normalize_places(&payload);
        assert_eq!(places.len(), 3);
        assert_eq!(places[0].label, "A");
        assert_eq!(places[1].label, "B");
        assert_eq!(places[1].lat, 18.5);
        assert_eq!(places[2].label, "C street");
        assert_eq!(places[2].address, "C street");
        assert_eq!(places[2].lon, 100.5);
    }

    #[test]
    fn empty_label_falls_through_to_next_alias() {
        let place = Place::from_record(&json!({ "label": "", "place": "  Mae Rim ", "address": "x" }))
            .unwrap();
        assert_eq!(place.label, "Mae Rim");
    }

    #[test]
    fn bad_coordinates_become_zero_but_record_is_kept() {
        let payload = json!([{ "label": "X", "latitude": "north", "longitude": null }]);
        let places = normalize_places(&payload);
        assert_eq!(places.len(), 1);
        assert_eq!((places[0].lat, places[0].lon), (0.0, 0.0));
    }

    #[test]
    fn skips_records_without_label() {
        let payload = json!([{ "latitude": 1.0 }, { "label": "   " }, "junk", { "label": "ok" }]);
        let places = normalize_places(&payload);
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].label, "ok");
    }

    #[test]
    fn dedupes_by_label_and_address_first_wins() {
        let payload = json!([
            { "label": "A", "address": "1", "lat": 1.0 },
            { "label": "A", "address": "2", "lat": 2.0 },
            { "label": "A", "address": "1", "lat": 3.0 },
        ]);
        let places = normalize_places(&payload);
        assert_eq!(places.len(), 2);
        assert_eq!(places[0].lat, 1.0);
        assert_eq!(places[1].address, "2");
    }

    #[test]
    fn non_array_payload_is_empty() {
        assert!(normalize_places(&json!({ "error": "boom" })).is_empty());
    }

    #[test]
    fn province_filter_matches_address_or_label() {
        let places = normalize_places(&json!([
            { "label": "Nimman", "address": "Suthep, Mueang, Chiang Mai" },
            { "label": "Lampang Station", "address": "" },
            { "label": "Other", "address": "Bangkok" },
        ]));
        let cm = places_in_province(&places, "chiang mai");
        assert_eq!(cm.len(), 1);
        assert_eq!(places_in_province(&places, "lampang").len(), 1);
        assert_eq!(places_in_province(&places, " ").len(), 3);
    }

    #[test]
    fn province_options_prefer_chart_labels() {
        let places = normalize_places(&json!([
            { "label": "a", "address": "ต.สุเทพ อ.เมือง จ.เชียงใหม่" },
            { "label": "b", "address": "Mueang Lampang" },
            { "label": "c", "address": "Hang Chat Lampang" },
        ]));
        assert_eq!(province_options(&[], &places), vec!["เชียงใหม่", "Lampang"]);
        let chart = vec!["Chiang Mai".to_string(), "Chiang Mai".to_string()];
        assert_eq!(province_options(&chart, &places), vec!["Chiang Mai"]);
    }

    #[test]
    fn place_options_fall_back_to_chart_labels() {
        let chart = vec!["Lamphun".to_string()];
        assert_eq!(place_options(&[], &chart), vec!["Lamphun"]);
    }
}
