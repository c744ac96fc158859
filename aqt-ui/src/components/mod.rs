//! Reusable Dioxus RSX components for the tracking page.

mod calendar_heatmap;
mod chart_header;
mod compare_chips;
mod error_display;
mod loading_spinner;
mod nearby_panel;
mod place_search;
mod status_bar;
mod tracking_controls;
mod trend_chart;

pub use calendar_heatmap::CalendarHeatmap;
pub use chart_header::ChartHeader;
pub use compare_chips::CompareChips;
pub use error_display::ErrorDisplay;
pub use loading_spinner::LoadingSpinner;
pub use nearby_panel::NearbyPanel;
pub use place_search::PlaceSearch;
pub use status_bar::StatusBar;
pub use tracking_controls::TrackingControls;
pub use trend_chart::TrendChart;
