//! Core types and data shaping for the air-quality tracking dashboard.
//!
//! Everything in this crate is pure and compiles for both native targets and
//! `wasm32-unknown-unknown`. Network access and UI live in `aqt-client` and
//! `aqt-ui`; this crate only decides what the data means:
//!
//! - `range` / `metric`: the enumerated query axes
//! - `filters`: tracking filter state, URL query round-trip and persistence
//! - `place` / `geo`: place normalization and nearest-place ranking
//! - `chart`: chart payload validation, comparison merging, row pivoting, CSV
//! - `cache`: bounded insertion-ordered TTL cache
//! - `heatmap`: one-year daily series, calendar layout and color scales
//! - `freshness`: latest-reading parsing and "last updated" spans
//! - `refresh` / `sync`: auto-refresh tick state and pipeline sync outcomes

pub mod cache;
pub mod chart;
pub mod date_range;
pub mod filters;
pub mod freshness;
pub mod geo;
pub mod heatmap;
pub mod metric;
pub mod place;
pub mod range;
pub mod refresh;
pub mod store;
pub mod sync;

pub use metric::Metric;
pub use range::TimeRange;
