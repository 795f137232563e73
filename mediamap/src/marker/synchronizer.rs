use std::sync::Arc;

use crate::engine::{MapSession, SessionRef};
use crate::error::{FetchError, MapViewError};
use crate::marker::{MarkerStyle, MediaBatch, MediaRecord};
use crate::messenger::{DummyMessenger, Messenger};
use crate::source::MediaSource;

/// State of marker loading for a map session.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MarkerSyncState {
    /// Markers were never requested for the session.
    #[default]
    Unattached,
    /// Media records are being loaded.
    Loading,
    /// Markers are on the map.
    Attached {
        /// Number of rendered markers.
        rendered: usize,
        /// Number of records skipped because they were malformed.
        skipped: usize,
    },
    /// Loading failed. No markers were rendered.
    Failed(FetchError),
}

/// Loads media records and renders them as markers on a map session.
///
/// Loading is done at most once per session: the first request switches the session into
/// [`MarkerSyncState::Loading`], and all following requests for the same session are ignored
/// until the markers are explicitly refreshed.
pub struct MarkerSynchronizer {
    source: Arc<dyn MediaSource>,
    style: MarkerStyle,
    messenger: Arc<dyn Messenger>,
}

impl MarkerSynchronizer {
    /// Creates a new synchronizer loading records from the given source.
    pub fn new(source: Arc<dyn MediaSource>) -> Self {
        Self {
            source,
            style: MarkerStyle::default(),
            messenger: Arc::new(DummyMessenger),
        }
    }

    /// Sets the style of created markers.
    pub fn with_style(mut self, style: MarkerStyle) -> Self {
        self.style = style;
        self
    }

    /// Style of created markers.
    pub fn style(&self) -> &MarkerStyle {
        &self.style
    }

    pub(crate) fn set_messenger(&mut self, messenger: Arc<dyn Messenger>) {
        self.messenger = messenger;
    }

    /// Starts loading markers for the session unless it was already done.
    ///
    /// Returns the load task that must be run to completion, or `None` if the session is gone,
    /// not loaded yet, or already has (or is getting) its markers.
    pub(crate) fn begin(&self, session: &SessionRef) -> Option<MarkerLoad> {
        let started = session.with_live(|session| {
            if !session.is_ready() {
                log::warn!("Markers requested before map {} was loaded", session.id());
                return false;
            }

            match session.marker_sync() {
                MarkerSyncState::Unattached => {
                    session.set_marker_sync(MarkerSyncState::Loading);
                    true
                }
                state => {
                    log::debug!(
                        "Markers of map {} are not reloaded, current state: {state:?}",
                        session.id()
                    );
                    false
                }
            }
        })?;

        started.then(|| self.load(session))
    }

    /// Removes the markers of the session and loads them again.
    ///
    /// Returns `None` if the session is gone, not loaded yet, or a load is already in progress.
    pub(crate) fn begin_refresh(&self, session: &SessionRef) -> Option<MarkerLoad> {
        let started = session.with_live(|session| {
            if !session.is_ready() || *session.marker_sync() == MarkerSyncState::Loading {
                return false;
            }

            let removed = session.clear_markers();
            log::debug!("Removed {removed} markers from map {} for refresh", session.id());
            session.set_marker_sync(MarkerSyncState::Loading);
            true
        })?;

        started.then(|| self.load(session))
    }

    fn load(&self, session: &SessionRef) -> MarkerLoad {
        MarkerLoad {
            source: self.source.clone(),
            style: self.style.clone(),
            messenger: self.messenger.clone(),
            session: session.clone(),
        }
    }
}

/// Pending marker load for one map session.
pub(crate) struct MarkerLoad {
    source: Arc<dyn MediaSource>,
    style: MarkerStyle,
    messenger: Arc<dyn Messenger>,
    session: SessionRef,
}

impl MarkerLoad {
    /// Fetches the records and renders them.
    ///
    /// If the session was torn down while the records were loading, the result is discarded and
    /// `None` is returned.
    pub(crate) async fn run(self) -> Option<MarkerSyncState> {
        let session_id = self.session.id();
        let fetched = self.source.fetch().await;

        let style = &self.style;
        let state = self.session.with_live(|session| {
            let state = match fetched {
                Ok(batch) => render(session, batch, style),
                Err(err) => {
                    let state = MarkerSyncState::Failed(err.clone());
                    log::error!("Map {session_id}: {}", MapViewError::Fetch(err));
                    state
                }
            };

            session.set_marker_sync(state.clone());
            state
        });

        match &state {
            Some(MarkerSyncState::Attached { rendered, skipped }) => {
                log::info!("Rendered {rendered} markers on map {session_id}, skipped {skipped}");
                self.messenger.request_redraw();
            }
            Some(_) => {}
            None => {
                log::info!("Map {session_id} was removed while loading media, result discarded")
            }
        }

        state
    }
}

fn render(session: &mut MapSession, batch: MediaBatch, style: &MarkerStyle) -> MarkerSyncState {
    let mut rendered = 0;
    let mut skipped = batch.dropped();
    for (index, raw) in batch.records().iter().enumerate() {
        match MediaRecord::from_raw(index, raw) {
            Ok(record) => {
                session.add_marker(Arc::new(record), style);
                rendered += 1;
            }
            Err(err) => {
                log::warn!("Skipping media item: {err}");
                skipped += 1;
            }
        }
    }

    MarkerSyncState::Attached { rendered, skipped }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;
    use mediamap_types::{lonlat, Camera};

    use super::*;
    use crate::engine::{ContainerHandle, HeadlessEngine, MapEngineAdapter, SessionOptions};
    use crate::marker::{decode_media_batch, RawMediaRecord};
    use crate::source::StaticMediaSource;

    struct JsonSource(&'static [u8]);

    #[async_trait::async_trait]
    impl MediaSource for JsonSource {
        async fn fetch(&self) -> Result<MediaBatch, FetchError> {
            decode_media_batch(self.0)
        }
    }

    fn loaded_adapter(engine: &HeadlessEngine) -> MapEngineAdapter {
        let mut adapter = MapEngineAdapter::new(engine.clone());
        adapter
            .initialize(&SessionOptions {
                container: ContainerHandle::new("map"),
                access_token: "token".into(),
                style: "style".into(),
                camera: Camera::new(lonlat!(0.0, 0.0), 1.0),
            })
            .expect("session created");
        adapter.with_session_mut(|s| s.signal_loaded());
        adapter
    }

    fn raw(lat: &str, lng: &str) -> RawMediaRecord {
        RawMediaRecord {
            lat: Some(lat.into()),
            lng: Some(lng.into()),
            ..Default::default()
        }
    }

    #[test]
    fn renders_records_in_source_order() {
        let engine = HeadlessEngine::new();
        let adapter = loaded_adapter(&engine);
        let source = StaticMediaSource::new(vec![raw("1", "2"), raw("3", "4"), raw("3", "4")]);
        let synchronizer = MarkerSynchronizer::new(Arc::new(source));

        let session = adapter.session_ref().expect("session exists");
        let load = synchronizer.begin(&session).expect("load started");
        let state = tokio_test::block_on(load.run());

        assert_eq!(
            state,
            Some(MarkerSyncState::Attached {
                rendered: 3,
                skipped: 0
            })
        );
        let markers = engine.markers();
        assert_eq!(markers.len(), 3);
        assert_relative_eq!(markers[0].position, lonlat!(2.0, 1.0));
        assert_relative_eq!(markers[1].position, lonlat!(4.0, 3.0));
        assert_relative_eq!(markers[2].position, lonlat!(4.0, 3.0));
    }

    #[test]
    fn second_begin_is_ignored() {
        let engine = HeadlessEngine::new();
        let adapter = loaded_adapter(&engine);
        let synchronizer =
            MarkerSynchronizer::new(Arc::new(StaticMediaSource::new(vec![raw("1", "2")])));
        let session = adapter.session_ref().expect("session exists");

        let load = synchronizer.begin(&session).expect("load started");
        assert!(synchronizer.begin(&session).is_none());

        tokio_test::block_on(load.run());
        assert!(synchronizer.begin(&session).is_none());
        assert_eq!(engine.markers().len(), 1);
    }

    #[test]
    fn begin_requires_loaded_map() {
        let engine = HeadlessEngine::new();
        let mut adapter = MapEngineAdapter::new(engine);
        adapter
            .initialize(&SessionOptions {
                container: ContainerHandle::new("map"),
                access_token: "token".into(),
                style: "style".into(),
                camera: Camera::new(lonlat!(0.0, 0.0), 1.0),
            })
            .expect("session created");

        let synchronizer = MarkerSynchronizer::new(Arc::new(StaticMediaSource::default()));
        let session = adapter.session_ref().expect("session exists");
        assert!(synchronizer.begin(&session).is_none());
        assert_matches!(
            adapter.with_session(|s| s.marker_sync().clone()),
            Some(MarkerSyncState::Unattached)
        );
    }

    #[test]
    fn refresh_replaces_markers() {
        let engine = HeadlessEngine::new();
        let adapter = loaded_adapter(&engine);
        let synchronizer = MarkerSynchronizer::new(Arc::new(StaticMediaSource::new(vec![
            raw("1", "2"),
            raw("5", "6"),
        ])));
        let session = adapter.session_ref().expect("session exists");

        let load = synchronizer.begin(&session).expect("load started");
        tokio_test::block_on(load.run());
        let first_handles: Vec<_> = engine.markers().iter().map(|m| m.handle).collect();

        let refresh = synchronizer.begin_refresh(&session).expect("refresh started");
        assert!(engine.markers().is_empty());
        assert!(synchronizer.begin_refresh(&session).is_none());
        tokio_test::block_on(refresh.run());

        let markers = engine.markers();
        assert_eq!(markers.len(), 2);
        assert!(markers.iter().all(|m| !first_handles.contains(&m.handle)));
    }

    #[test]
    fn undecodable_items_are_counted_as_skipped() {
        let engine = HeadlessEngine::new();
        let adapter = loaded_adapter(&engine);
        let body = br#"[
            {"lat": 35.7, "lng": 51.4},
            {"lat": 1e400, "lng": 2},
            {"lat": 10, "lng": 20, "title": 42},
            {"lat": "x", "lng": 2},
            {"lat": 10, "lng": 20}
        ]"#;
        let synchronizer = MarkerSynchronizer::new(Arc::new(JsonSource(body)));
        let session = adapter.session_ref().expect("session exists");

        let load = synchronizer.begin(&session).expect("load started");
        let state = tokio_test::block_on(load.run());

        assert_eq!(
            state,
            Some(MarkerSyncState::Attached {
                rendered: 2,
                skipped: 3
            })
        );
        assert_eq!(engine.markers().len(), 2);
    }
}
