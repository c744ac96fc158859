//! Tracking filter state.
//!
//! `FilterState` holds the user's selections on the tracking page and derives
//! the two values the fetchers actually consume: the effective chart filter
//! and the heatmap filter. It round-trips through the page query string and
//! mirrors `range`, `place` and `province` into a [`KeyValueStore`].
//!
//! Query parameters: `range`, `metric`, `province`, `place`,
//! `places` (comma-joined, at most 3) and `heatmap`.

use crate::metric::Metric;
use crate::range::TimeRange;
use crate::store::KeyValueStore;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Maximum number of places in comparison mode.
pub const MAX_COMPARE_PLACES: usize = 3;

pub const STORAGE_RANGE_KEY: &str = "tracking:range";
pub const STORAGE_PLACE_KEY: &str = "tracking:place";
pub const STORAGE_PROVINCE_KEY: &str = "tracking:province";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterState {
    pub range: TimeRange,
    pub metric: Metric,
    pub place: String,
    pub province: String,
    /// Places being compared, in selection order. Non-empty means comparison mode.
    pub selected_places: Vec<String>,
    /// Explicit override for which series feeds the heatmap.
    pub heatmap_target: String,
}

impl FilterState {
    /// Build the initial state from the page query string, falling back to
    /// persisted values for anything the URL does not carry.
    ///
    /// Invalid enumerated values are ignored and the default is kept.
    /// `places` is truncated to [`MAX_COMPARE_PLACES`] but not deduplicated.
    pub fn from_query(query: &str, store: &dyn KeyValueStore) -> Self {
        let mut state = FilterState::default();
        let query = query.trim_start_matches('?');

        let mut url_range = None;
        let mut url_metric = None;
        let mut url_province = String::new();
        let mut url_place = String::new();
        let mut url_places = Vec::new();
        let mut url_heatmap = String::new();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "range" => url_range = value.parse::<TimeRange>().ok(),
                "metric" => url_metric = value.parse::<Metric>().ok(),
                "province" => url_province = value.into_owned(),
                "place" => url_place = value.into_owned(),
                "places" => url_places = split_places(&value),
                "heatmap" => url_heatmap = value.into_owned(),
                _ => {}
            }
        }

        state.range = url_range
            .or_else(|| {
                store
                    .get(STORAGE_RANGE_KEY)
                    .and_then(|saved| saved.parse::<TimeRange>().ok())
            })
            .unwrap_or_default();
        state.metric = url_metric.unwrap_or_default();

        state.province = if url_province.is_empty() {
            store.get(STORAGE_PROVINCE_KEY).unwrap_or_default()
        } else {
            url_province
        };
        state.place = if url_place.is_empty() {
            store.get(STORAGE_PLACE_KEY).unwrap_or_default()
        } else {
            url_place
        };

        state.selected_places = url_places;
        state.heatmap_target = url_heatmap;
        state
    }

    /// Serialize to the page query string (without the leading `?`).
    pub fn to_query_string(&self) -> String {
        let mut ser = form_urlencoded::Serializer::new(String::new());
        ser.append_pair("range", self.range.as_str());
        ser.append_pair("metric", self.metric.as_str());
        if !self.province.is_empty() {
            ser.append_pair("province", &self.province);
        }
        if !self.place.is_empty() {
            ser.append_pair("place", &self.place);
        }
        if !self.selected_places.is_empty() {
            ser.append_pair("places", &self.selected_places.join(","));
        }
        if !self.heatmap_target.is_empty() {
            ser.append_pair("heatmap", &self.heatmap_target);
        }
        ser.finish()
    }

    /// Mirror the persisted subset into `store`. Empty place/province remove
    /// their entries instead of storing an empty string.
    pub fn persist(&self, store: &dyn KeyValueStore) {
        store.set(STORAGE_RANGE_KEY, self.range.as_str());
        persist_optional(store, STORAGE_PLACE_KEY, &self.place);
        persist_optional(store, STORAGE_PROVINCE_KEY, &self.province);
    }

    pub fn is_comparing(&self) -> bool {
        !self.selected_places.is_empty()
    }

    /// The single place/province string driving a non-comparison chart query.
    pub fn effective_filter(&self) -> String {
        if self.is_comparing() {
            return String::new();
        }
        let place = self.place.trim();
        if !place.is_empty() {
            return place.to_string();
        }
        self.province.trim().to_string()
    }

    /// Which series feeds the calendar heatmap.
    pub fn heatmap_filter(&self) -> String {
        let target = self.heatmap_target.trim();
        if !target.is_empty() {
            return target.to_string();
        }
        if let Some(first) = self.selected_places.first() {
            return first.clone();
        }
        let place = self.place.trim();
        if !place.is_empty() {
            return place.to_string();
        }
        self.province.trim().to_string()
    }

    /// Location whose most recent reading backs the "last updated" badge.
    pub fn latest_filter(&self) -> String {
        let effective = self.effective_filter();
        if !effective.is_empty() {
            return effective;
        }
        if let Some(first) = self.selected_places.first() {
            return first.clone();
        }
        let province = self.province.trim();
        if !province.is_empty() {
            return province.to_string();
        }
        self.place.trim().to_string()
    }

    pub fn has_filters(&self) -> bool {
        !self.province.is_empty() || !self.place.is_empty() || self.is_comparing()
    }

    /// Reset every location selection. Range and metric are kept.
    pub fn clear_filters(&mut self) {
        self.province.clear();
        self.place.clear();
        self.selected_places.clear();
        self.heatmap_target.clear();
    }

    /// Pick a province. Leaves comparison mode.
    pub fn select_province(&mut self, province: &str) {
        self.province = province.trim().to_string();
        self.selected_places.clear();
    }

    /// Pick a single place. Leaves comparison mode.
    pub fn select_place(&mut self, place: &str) {
        self.place = place.trim().to_string();
        self.selected_places.clear();
    }

    /// Quick-select from the place search box: add to the comparison while
    /// there is room, otherwise fall back to a single-place filter.
    pub fn quick_add_place(&mut self, value: &str) {
        let value = value.trim();
        if value.is_empty() || self.selected_places.iter().any(|p| p == value) {
            return;
        }
        if self.selected_places.len() < MAX_COMPARE_PLACES {
            self.selected_places.push(value.to_string());
        } else {
            self.place = value.to_string();
        }
    }

    pub fn remove_compared(&mut self, place: &str) {
        self.selected_places.retain(|p| p != place);
    }

    pub fn clear_compared(&mut self) {
        self.selected_places.clear();
    }
}

fn split_places(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(MAX_COMPARE_PLACES)
        .map(str::to_string)
        .collect()
}

fn persist_optional(store: &dyn KeyValueStore, key: &str, value: &str) {
    if value.is_empty() {
        store.remove(key);
    } else {
        store.set(key, value);
    }
}
