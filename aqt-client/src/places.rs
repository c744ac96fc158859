//! Place Directory: the selectable monitoring locations.
//!
//! Fail-soft by contract. Any fetch or shape failure yields an empty list;
//! the only non-result is a superseded call, reported as `None`.

use crate::api::TrackingApi;
use crate::error::FetchError;
use crate::guard::LatestOnly;
use aqt_core::place::{normalize_places, Place};
use log::{debug, warn};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub struct PlaceDirectory<A> {
    api: Rc<A>,
    guard: LatestOnly,
    places: RefCell<Vec<Place>>,
    loading: Cell<bool>,
}

impl<A: TrackingApi> PlaceDirectory<A> {
    pub fn new(api: Rc<A>) -> Self {
        Self {
            api,
            guard: LatestOnly::new(),
            places: RefCell::new(Vec::new()),
            loading: Cell::new(false),
        }
    }

    pub fn places(&self) -> Vec<Place> {
        self.places.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub fn cancel(&self) {
        self.guard.cancel();
    }

    /// List places, optionally narrowed to `province`. Returns `None` when a
    /// newer call superseded this one.
    pub async fn list(&self, province: &str) -> Option<Vec<Place>> {
        let province = province.trim();
        self.loading.set(true);
        let result = self
            .guard
            .run(async {
                let payload = self
                    .api
                    .places((!province.is_empty()).then_some(province))
                    .await?;
                Ok(normalize_places(&payload))
            })
            .await;

        let places = match result {
            Ok(places) => places,
            Err(FetchError::Cancelled) => {
                debug!("place listing for {:?} superseded", province);
                return None;
            }
            Err(e) => {
                warn!("failed to list places: {}", e);
                Vec::new()
            }
        };
        self.loading.set(false);
        self.places.replace(places.clone());
        Some(places)
    }
}
