//! Runs the map view over the in-memory engine.
//!
//! ```sh
//! MEDIAMAP_ACCESS_TOKEN=pk.xxx MEDIAMAP_MEDIA_URL=http://localhost:4000/media \
//!     cargo run --example headless -- "Azadi Tower"
//! ```
//!
//! The media markers are loaded from the configured url. If a search query is given, it is
//! resolved with the Mapbox geocoding API and the map is moved to the first found place.

use std::sync::Arc;
use std::time::Duration;

use mediamap::engine::{ContainerHandle, HeadlessEngine};
use mediamap::geocoding::{HeadlessGeocoder, HttpGeocoder};
use mediamap::marker::MarkerSyncState;
use mediamap::{MapEvent, MapViewBuilder, MapViewConfig};

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = MapViewConfig::from_env()
        .unwrap()
        .with_fetch_timeout(Duration::from_secs(10));
    let engine = HeadlessEngine::new();
    let geocoder = HttpGeocoder::from_config(&config).unwrap();

    let mut controller = MapViewBuilder::new(config)
        .with_engine(engine.clone())
        .with_geocoder(Arc::new(HeadlessGeocoder::new()))
        .build()
        .unwrap();

    controller
        .mount(ContainerHandle::new("map"), ContainerHandle::new("geocoder"))
        .unwrap();
    controller.handle_event(MapEvent::Loaded).unwrap();

    while let Some(MarkerSyncState::Loading) = controller.marker_sync_state() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    println!("Markers: {:?}", controller.marker_sync_state());
    for marker in engine.markers() {
        println!("  {:?} at {:?}", marker.handle, marker.position);
    }

    if let Some(handle) = controller.marker_handles().first() {
        controller.click_marker(*handle);
        println!("Overlay: {:?}", controller.overlay_state());
        controller.close_overlay();
    }

    if let Some(query) = std::env::args().nth(1) {
        match geocoder.forward(&query).await {
            Ok(results) => match results.first() {
                Some(result) => {
                    controller.select_search_result(result).unwrap();
                    println!("Moved to '{}'", result.place_name());
                }
                None => println!("Nothing found for '{query}'"),
            },
            Err(err) => println!("Search failed: {err}"),
        }
    }

    for (_, text) in engine.controls() {
        println!("{text}");
    }

    controller.unmount();
}
