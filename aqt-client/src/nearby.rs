//! Proximity Resolver: rank places by distance from the user's position.

use crate::error::GeoError;
use aqt_core::geo::{rank_nearby, GeoPoint, NearbyPlace, NEARBY_LIMIT};
use aqt_core::place::Place;
use log::{info, warn};
use std::cell::{Cell, RefCell};
use std::time::Duration;

pub const GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocateOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
}

impl Default for LocateOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: GEOLOCATION_TIMEOUT,
        }
    }
}

/// Source of a one-shot position fix.
#[allow(async_fn_in_trait)]
pub trait Geolocator {
    async fn locate(&self, options: LocateOptions) -> Result<GeoPoint, GeoError>;
}

/// A fixed position, for the command line and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLocation(pub GeoPoint);

impl Geolocator for FixedLocation {
    async fn locate(&self, _options: LocateOptions) -> Result<GeoPoint, GeoError> {
        Ok(self.0)
    }
}

pub struct ProximityResolver<G> {
    geolocator: G,
    busy: Cell<bool>,
    error: RefCell<Option<String>>,
    ranked: RefCell<Vec<NearbyPlace>>,
}

impl<G: Geolocator> ProximityResolver<G> {
    pub fn new(geolocator: G) -> Self {
        Self {
            geolocator,
            busy: Cell::new(false),
            error: RefCell::new(None),
            ranked: RefCell::new(Vec::new()),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub fn ranked(&self) -> Vec<NearbyPlace> {
        self.ranked.borrow().clone()
    }

    /// Request a fix and rank `places` around it. On failure the previous
    /// ranking is left untouched and the error text is kept for display.
    pub async fn locate(&self, places: &[Place]) -> Result<Vec<NearbyPlace>, GeoError> {
        self.busy.set(true);
        self.error.replace(None);
        let fix = self.geolocator.locate(LocateOptions::default()).await;
        self.busy.set(false);

        match fix {
            Ok(origin) => {
                let ranked = rank_nearby(places, origin, NEARBY_LIMIT);
                info!(
                    "ranked {} place(s) around {:.4},{:.4}",
                    ranked.len(),
                    origin.lat,
                    origin.lon
                );
                self.ranked.replace(ranked.clone());
                Ok(ranked)
            }
            Err(e) => {
                warn!("geolocation failed: {}", e);
                self.error.replace(Some(e.to_string()));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Plays back a queue of fixes.
    struct Scripted(RefCell<Vec<Result<GeoPoint, GeoError>>>);

    impl Geolocator for Scripted {
        async fn locate(&self, options: LocateOptions) -> Result<GeoPoint, GeoError> {
            assert!(options.high_accuracy);
            assert_eq!(options.timeout, GEOLOCATION_TIMEOUT);
            self.0.borrow_mut().remove(0)
        }
    }

    fn place(label: &str, lat: f64, lon: f64) -> Place {
        Place {
            label: label.into(),
            address: String::new(),
            lat,
            lon,
        }
    }

    #[tokio::test]
    async fn error_keeps_previous_ranking() {
        let places = vec![place("far", 20.0, 100.0), place("near", 18.8, 99.0)];
        let resolver = ProximityResolver::new(Scripted(RefCell::new(vec![
            Ok(GeoPoint::new(18.79, 98.98)),
            Err(GeoError::PermissionDenied),
        ])));

        let ranked = resolver.locate(&places).await.unwrap();
        assert_eq!(ranked[0].place.label, "near");

        let err = resolver.locate(&places).await.unwrap_err();
        assert_eq!(err, GeoError::PermissionDenied);
        assert_eq!(resolver.error().as_deref(), Some("Location permission denied"));
        assert_eq!(resolver.ranked().len(), 2);
        assert!(!resolver.is_busy());
    }

    #[tokio::test]
    async fn fixed_location_ranks_immediately() {
        let resolver = ProximityResolver::new(FixedLocation(GeoPoint::new(0.0, 0.0)));
        let ranked = resolver.locate(&[place("origin", 0.0, 0.0)]).await.unwrap();
        assert_eq!(ranked[0].distance_km, 0.0);
        assert_eq!(resolver.error(), None);
    }
}
