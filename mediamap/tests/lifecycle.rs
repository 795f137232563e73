use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use approx::assert_relative_eq;
use assert_matches::assert_matches;
use async_trait::async_trait;
use mediamap::engine::{ContainerHandle, HeadlessEngine};
use mediamap::geocoding::HeadlessGeocoder;
use mediamap::marker::{MarkerSyncState, MediaBatch, RawMediaRecord};
use mediamap::mediamap_types::lonlat;
use mediamap::overlay::OverlayState;
use mediamap::source::{MediaSource, StaticMediaSource};
use mediamap::{FetchError, MapEvent, MapViewBuilder, MapViewConfig, MapViewController};
use mediamap::{MapViewError, Messenger};
use serde_json::json;
use tokio::sync::Notify;

#[derive(Clone, Default)]
struct RedrawCounter(Arc<AtomicUsize>);

impl RedrawCounter {
    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl Messenger for RedrawCounter {
    fn request_redraw(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

struct FailingSource(u16);

#[async_trait]
impl MediaSource for FailingSource {
    async fn fetch(&self) -> Result<MediaBatch, FetchError> {
        Err(FetchError::Status(self.0))
    }
}

/// Source that does not answer until the gate is opened.
struct GatedSource {
    gate: Arc<Notify>,
    answered: Arc<AtomicUsize>,
    records: Vec<RawMediaRecord>,
}

#[async_trait]
impl MediaSource for GatedSource {
    async fn fetch(&self) -> Result<MediaBatch, FetchError> {
        self.gate.notified().await;
        self.answered.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.clone().into())
    }
}

struct TestView {
    controller: MapViewController,
    engine: HeadlessEngine,
    geocoder: HeadlessGeocoder,
    redraws: RedrawCounter,
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn records(value: serde_json::Value) -> Vec<RawMediaRecord> {
    serde_json::from_value(value).expect("valid fixture")
}

fn sample_records() -> Vec<RawMediaRecord> {
    records(json!([
        {"lat": 35.7, "lng": 51.4, "title": "Azadi", "description": "Tower", "url": "https://v/1"},
        {"lat": "35.8", "lng": "51.5", "title": "Milad", "description": "TV tower", "url": "https://v/2"},
        {"lat": -33.86, "lng": "151.21", "title": "Opera", "description": "House", "url": "https://v/3"}
    ]))
}

fn view(source: Arc<dyn MediaSource>) -> TestView {
    init_logger();

    let engine = HeadlessEngine::new();
    let geocoder = HeadlessGeocoder::new();
    let redraws = RedrawCounter::default();
    let mut controller = MapViewBuilder::new(MapViewConfig::new("pk.test-token"))
        .with_engine(engine.clone())
        .with_geocoder(Arc::new(geocoder.clone()))
        .with_media_source(source)
        .with_messenger(redraws.clone())
        .build()
        .expect("controller created");

    controller
        .mount(ContainerHandle::new("map"), ContainerHandle::new("geocoder"))
        .expect("map created");

    TestView {
        controller,
        engine,
        geocoder,
        redraws,
    }
}

/// Waits until the background marker load of the current session is finished.
async fn settle(controller: &MapViewController) -> MarkerSyncState {
    for _ in 0..1000 {
        match controller.marker_sync_state() {
            Some(MarkerSyncState::Loading) => tokio::task::yield_now().await,
            Some(state) => return state,
            None => panic!("map is not mounted"),
        }
    }

    panic!("marker load did not finish");
}

async fn yield_many(times: usize) {
    for _ in 0..times {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn renders_one_marker_per_record() {
    let mut view = view(Arc::new(StaticMediaSource::new(sample_records())));
    view.controller.on_load().expect("loaded");

    let state = settle(&view.controller).await;
    assert_eq!(
        state,
        MarkerSyncState::Attached {
            rendered: 3,
            skipped: 0
        }
    );

    let markers = view.engine.markers();
    assert_eq!(markers.len(), 3);
    assert_relative_eq!(markers[0].position, lonlat!(51.4, 35.7));
    assert_relative_eq!(markers[1].position, lonlat!(51.5, 35.8));
    assert_relative_eq!(markers[2].position, lonlat!(151.21, -33.86));
    assert!(markers.iter().all(|m| m.style.class_name == "custom-marker"));
    assert!(view.redraws.count() > 0);
}

#[tokio::test]
async fn malformed_record_is_skipped() {
    let mut batch = sample_records();
    batch.extend(records(json!([
        {"lat": "north", "lng": 10.0, "title": "Broken"}
    ])));
    let mut view = view(Arc::new(StaticMediaSource::new(batch)));
    view.controller.on_load().expect("loaded");

    let state = settle(&view.controller).await;
    assert_eq!(
        state,
        MarkerSyncState::Attached {
            rendered: 3,
            skipped: 1
        }
    );
    assert_eq!(view.engine.markers().len(), 3);
}

#[tokio::test]
async fn duplicate_records_are_rendered_independently() {
    let batch = records(json!([
        {"lat": 1.0, "lng": 2.0},
        {"lat": 1.0, "lng": 2.0}
    ]));
    let mut view = view(Arc::new(StaticMediaSource::new(batch)));
    view.controller.on_load().expect("loaded");
    settle(&view.controller).await;

    let handles = view.controller.marker_handles();
    assert_eq!(handles.len(), 2);
    assert_ne!(handles[0], handles[1]);
}

#[tokio::test]
async fn markers_are_loaded_once_per_session() {
    let mut view = view(Arc::new(StaticMediaSource::new(sample_records())));
    view.controller.on_load().expect("loaded");
    view.controller
        .handle_event(MapEvent::Loaded)
        .expect("loaded again");
    settle(&view.controller).await;

    assert!(!view.controller.load_markers());
    view.controller
        .handle_event(MapEvent::Loaded)
        .expect("loaded again");
    yield_many(10).await;

    assert_eq!(view.engine.markers().len(), 3);
    assert_eq!(view.controller.marker_count(), 3);
}

#[tokio::test]
async fn markers_wait_for_load_signal() {
    let view = view(Arc::new(StaticMediaSource::new(sample_records())));

    assert!(!view.controller.load_markers());
    yield_many(10).await;

    assert!(view.engine.markers().is_empty());
    assert_eq!(
        view.controller.marker_sync_state(),
        Some(MarkerSyncState::Unattached)
    );
}

#[tokio::test]
async fn refresh_replaces_markers() {
    let mut view = view(Arc::new(StaticMediaSource::new(sample_records())));
    view.controller.on_load().expect("loaded");
    settle(&view.controller).await;
    let before = view.controller.marker_handles();

    assert!(view.controller.refresh_markers());
    settle(&view.controller).await;

    let after = view.controller.marker_handles();
    assert_eq!(after.len(), 3);
    assert!(after.iter().all(|handle| !before.contains(handle)));
    assert_eq!(view.engine.markers().len(), 3);
}

#[tokio::test]
async fn search_result_moves_map_to_search_zoom() {
    let mut view = view(Arc::new(StaticMediaSource::default()));
    view.controller.on_load().expect("loaded");

    view.controller
        .handle_event(MapEvent::SearchResult(json!({
            "place_name": "Somewhere",
            "geometry": {"type": "Point", "coordinates": [51.5, 35.7]}
        })))
        .expect("valid result");

    let camera = view.engine.camera().expect("map exists");
    assert_relative_eq!(camera.center(), lonlat!(51.5, 35.7));
    assert_relative_eq!(camera.zoom(), 14.0);
}

#[tokio::test]
async fn search_result_without_coordinates_is_ignored() {
    let mut view = view(Arc::new(StaticMediaSource::default()));
    view.controller.on_load().expect("loaded");
    let initial = view.controller.camera().expect("map exists");

    for event in [
        json!({"place_name": "Nowhere"}),
        json!({"geometry": {}}),
        json!({"geometry": {"coordinates": [51.5]}}),
        json!(null),
    ] {
        let result = view.controller.apply_search_result(&event);
        assert_matches!(result, Err(MapViewError::MalformedGeocodeResult(_)));
    }

    let camera = view.controller.camera().expect("map exists");
    assert_eq!(camera, initial);
    assert_relative_eq!(camera.zoom(), 12.0);
}

#[tokio::test]
async fn search_and_position_controls_are_attached_once() {
    let mut view = view(Arc::new(StaticMediaSource::default()));
    view.controller.on_load().expect("loaded");
    view.controller.on_load().expect("loaded again");

    assert_eq!(view.geocoder.mount_count(), 1);
    let options = view.geocoder.last_options().expect("mounted");
    assert_eq!(options.container, ContainerHandle::new("geocoder"));
    assert_eq!(options.placeholder, "Search for places");
    assert_eq!(options.access_token, "pk.test-token");

    let controls = view.engine.controls();
    assert_eq!(controls.len(), 1);
    assert_eq!(controls[0].1, "Lng: 51.3514 | Lat: 35.7015 | Zoom: 12.00");
}

#[tokio::test]
async fn position_control_follows_the_map() {
    let mut view = view(Arc::new(StaticMediaSource::default()));
    view.controller.on_load().expect("loaded");

    view.engine
        .simulate_move(mediamap::mediamap_types::Camera::new(lonlat!(-0.1276, 51.5072), 9.5));

    assert_eq!(
        view.controller.position_readout().text(),
        "Lng: -0.1276 | Lat: 51.5072 | Zoom: 9.50"
    );
}

#[tokio::test]
async fn marker_click_opens_overlay() {
    let mut view = view(Arc::new(StaticMediaSource::new(sample_records())));
    view.controller.on_load().expect("loaded");
    settle(&view.controller).await;
    let handles = view.controller.marker_handles();

    view.controller
        .handle_event(MapEvent::MarkerClicked(handles[1]))
        .expect("handled");
    assert_eq!(
        view.controller.overlay_state(),
        OverlayState {
            is_open: true,
            title: "Milad".into(),
            description: "TV tower".into(),
            content_url: "https://v/2".into(),
        }
    );

    view.controller
        .handle_event(MapEvent::OverlayDismissed)
        .expect("handled");
    assert_eq!(
        view.controller.overlay_state(),
        OverlayState {
            is_open: false,
            title: "Milad".into(),
            description: "TV tower".into(),
            content_url: "https://v/2".into(),
        }
    );

    assert!(view.controller.click_marker(handles[0]));
    let state = view.controller.overlay_state();
    assert!(state.is_open);
    assert_eq!(state.title, "Azadi");
}

#[tokio::test]
async fn fetch_failure_keeps_map_functional() {
    let mut view = view(Arc::new(FailingSource(500)));
    view.controller.on_load().expect("loaded");

    let state = settle(&view.controller).await;
    assert_eq!(state, MarkerSyncState::Failed(FetchError::Status(500)));
    assert!(view.engine.markers().is_empty());

    assert!(view.controller.search_attached());
    view.controller
        .apply_search_result(&json!({"geometry": {"coordinates": [51.5, 35.7]}}))
        .expect("search works");
    assert_relative_eq!(
        view.controller.camera().expect("map exists").center(),
        lonlat!(51.5, 35.7)
    );

    assert!(
        !view.controller.load_markers(),
        "failed load is not retried automatically"
    );
}

#[tokio::test]
async fn unmount_while_fetch_is_pending() {
    let gate = Arc::new(Notify::new());
    let answered = Arc::new(AtomicUsize::new(0));
    let mut view = view(Arc::new(GatedSource {
        gate: gate.clone(),
        answered: answered.clone(),
        records: sample_records(),
    }));
    view.controller.on_load().expect("loaded");
    yield_many(10).await;

    assert!(view.controller.unmount());
    gate.notify_one();
    for _ in 0..1000 {
        if answered.load(Ordering::SeqCst) > 0 {
            break;
        }
        tokio::task::yield_now().await;
    }
    yield_many(10).await;

    assert_eq!(answered.load(Ordering::SeqCst), 1);
    assert!(view.engine.markers().is_empty());
    assert_eq!(view.engine.live_sessions(), 0);
    assert_eq!(view.controller.marker_count(), 0);
    assert_eq!(view.redraws.count(), 0);
}

#[tokio::test]
async fn stale_fetch_does_not_render_into_new_session() {
    let gate = Arc::new(Notify::new());
    let answered = Arc::new(AtomicUsize::new(0));
    let mut view = view(Arc::new(GatedSource {
        gate: gate.clone(),
        answered: answered.clone(),
        records: sample_records(),
    }));
    view.controller.on_load().expect("loaded");
    yield_many(10).await;
    view.controller.unmount();

    view.controller
        .mount(ContainerHandle::new("map"), ContainerHandle::new("geocoder"))
        .expect("map created again");
    view.controller.on_load().expect("loaded");
    yield_many(10).await;

    gate.notify_waiters();
    let state = settle(&view.controller).await;
    yield_many(10).await;

    assert_eq!(answered.load(Ordering::SeqCst), 2);
    assert_eq!(
        state,
        MarkerSyncState::Attached {
            rendered: 3,
            skipped: 0
        }
    );
    assert_eq!(view.engine.markers().len(), 3);
    assert_eq!(view.geocoder.mounted(), 1);
}

#[tokio::test]
async fn unmount_is_idempotent() {
    let mut view = view(Arc::new(StaticMediaSource::new(sample_records())));
    view.controller.on_load().expect("loaded");
    settle(&view.controller).await;

    assert!(view.controller.unmount());
    assert!(!view.controller.unmount());

    assert_eq!(view.geocoder.mounted(), 0);
    assert!(view.engine.controls().is_empty());
    assert!(view.engine.markers().is_empty());
    assert!(!view.controller.is_ready());
    assert!(!view.controller.overlay().is_open());
}
