//! Backend client and stateful fetchers for the air-quality tracking page.
//!
//! Every fetcher in this crate is single-threaded: state lives in `Cell` and
//! `RefCell`, futures are not `Send`, and the same code runs on the browser
//! executor (via `aqt-ui`) and on a current-thread tokio runtime (via
//! `aqt-cmd`).
//!
//! # Architecture
//!
//! - [`api::TrackingApi`] is the backend contract. [`api::HttpApi`] implements
//!   it with `reqwest`; tests use an in-memory mock.
//! - [`guard::LatestOnly`] gives each fetcher latest-wins semantics: starting
//!   a call aborts the previous one, and a result only commits if no newer
//!   call started in the meantime.
//! - Fetchers own their caches ([`aqt_core::cache::TtlCache`]) so tests can
//!   build fresh ones per case. No cache borrow is held across an `.await`.
//!
//! # Usage
//!
//! ```rust,no_run
//! use aqt_client::api::{ApiConfig, HttpApi};
//! use aqt_client::series::{SeriesFetcher, SeriesQuery};
//! use aqt_core::filters::FilterState;
//! use std::rc::Rc;
//!
//! # async fn demo() -> Result<(), aqt_client::FetchError> {
//! let api = Rc::new(HttpApi::new(ApiConfig::default()));
//! let fetcher = SeriesFetcher::new(api);
//! let filters = FilterState { province: "Chiang Mai".into(), ..Default::default() };
//! let snapshot = fetcher.load(&SeriesQuery::from_filters(&filters, 0)).await?;
//! println!("{} rows", snapshot.table.rows.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod clock;
pub mod error;
pub mod freshness;
pub mod guard;
pub mod heatmap;
pub mod nearby;
pub mod places;
pub mod series;
pub mod sync;

#[cfg(test)]
mod mock;

pub use error::{FetchError, GeoError};
