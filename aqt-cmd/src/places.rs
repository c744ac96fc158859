//! `places` and `nearby`.

use aqt_client::api::{ApiConfig, HttpApi};
use aqt_client::nearby::{FixedLocation, ProximityResolver};
use aqt_client::places::PlaceDirectory;
use aqt_core::geo::GeoPoint;
use aqt_core::place::Place;
use log::info;
use std::rc::Rc;

async fn load_places(config: ApiConfig, province: &str) -> anyhow::Result<Vec<Place>> {
    let directory = PlaceDirectory::new(Rc::new(HttpApi::new(config)));
    directory
        .list(province)
        .await
        .ok_or_else(|| anyhow::anyhow!("place listing was superseded"))
}

pub async fn run_places(config: ApiConfig, province: &str) -> anyhow::Result<()> {
    let places = load_places(config, province).await?;
    info!("{} places", places.len());
    for place in &places {
        if place.has_coordinates() {
            println!("{}\t{}\t{:.4},{:.4}", place.label, place.address, place.lat, place.lon);
        } else {
            println!("{}\t{}\t-", place.label, place.address);
        }
    }
    Ok(())
}

pub async fn run_nearby(
    config: ApiConfig,
    lat: f64,
    lon: f64,
    province: &str,
) -> anyhow::Result<()> {
    let places = load_places(config, province).await?;
    let resolver = ProximityResolver::new(FixedLocation(GeoPoint::new(lat, lon)));
    let ranked = resolver.locate(&places).await?;
    if ranked.is_empty() {
        println!("No places with coordinates.");
    }
    for (rank, entry) in ranked.iter().enumerate() {
        println!("{:>2}. {:<32} {:>8.1} km", rank + 1, entry.place.label, entry.distance_km);
    }
    Ok(())
}
