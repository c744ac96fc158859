//! Shared Dioxus state, hooks and components for the tracking dashboard.
//!
//! This crate provides:
//! - `browser`: URL, history, localStorage and download wrappers
//! - `geolocation`: `navigator.geolocation` as a `Geolocator`
//! - `state`: reactive `TrackingState` signals and the shared `Services`
//! - `hooks`: effects binding the fetchers to the signals
//! - `components`: reusable RSX components (controls, charts, chips)

pub mod browser;
pub mod components;
pub mod geolocation;
pub mod hooks;
pub mod state;
