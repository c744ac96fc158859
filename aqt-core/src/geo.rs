//! Great-circle distance and nearest-place ranking.

use crate::place::Place;
use serde::Serialize;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// How many places the proximity ranking keeps.
pub const NEARBY_LIMIT: usize = 8;

/// A coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A place annotated with its distance from the user's fix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyPlace {
    pub place: Place,
    pub distance_km: f64,
}

/// Haversine distance in kilometers.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Rank places by distance from `origin`, nearest first, keeping `limit`.
///
/// Places without finite coordinates are skipped. Ties keep input order.
pub fn rank_nearby(places: &[Place], origin: GeoPoint, limit: usize) -> Vec<NearbyPlace> {
    let mut ranked: Vec<NearbyPlace> = places
        .iter()
        .filter(|p| p.has_coordinates())
        .map(|p| NearbyPlace {
            place: p.clone(),
            distance_km: haversine_km(origin, GeoPoint::new(p.lat, p.lon)),
        })
        .collect();
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(label: &str, lat: f64, lon: f64) -> Place {
        Place {
            label: label.to_string(),
            address: String::new(),
            lat,
            lon,
        }
    }

    #[test]
    fn one_degree_of_longitude_at_equator() {
        let d = haversine_km(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0));
        assert!((d - 111.19).abs() < 0.5, "got {d}");
    }

    #[test]
    fn identical_points_are_zero_apart() {
        let p = GeoPoint::new(18.7883, 98.9853);
        assert_eq!(haversine_km(p, p), 0.0);
    }

    #[test]
    fn ranks_nearest_first_and_truncates() {
        let origin = GeoPoint::new(18.79, 98.98);
        let places: Vec<Place> = (0..12)
            .rev()
            .map(|i| place(&format!("p{i}"), 18.79 + i as f64 * 0.1, 98.98))
            .collect();
        let ranked = rank_nearby(&places, origin, NEARBY_LIMIT);
        assert_eq!(ranked.len(), NEARBY_LIMIT);
        assert_eq!(ranked[0].place.label, "p0");
        assert_eq!(ranked[7].place.label, "p7");
        assert!(ranked.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
    }

    #[test]
    fn skips_non_finite_coordinates() {
        let places = vec![place("bad", f64::NAN, 0.0), place("good", 1.0, 1.0)];
        let ranked = rank_nearby(&places, GeoPoint::new(0.0, 0.0), NEARBY_LIMIT);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].place.label, "good");
    }
}
