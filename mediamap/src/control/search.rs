use std::sync::Arc;

use mediamap_types::Camera;

use crate::control::Attachment;
use crate::engine::{MapSession, SessionId};
use crate::error::MapViewError;
use crate::geocoding::{GeocodeResult, GeocoderBackend, GeocoderOptions, SearchWidget};

const NAME: &str = "search control";

/// Geocoding search box bound to a map session.
///
/// When the user picks a search result, the map jumps to it at the configured search zoom.
pub struct SearchControl {
    backend: Arc<dyn GeocoderBackend>,
    search_zoom: f64,
    state: Attachment<(SessionId, Box<dyn SearchWidget>)>,
}

impl SearchControl {
    /// Creates a detached search control.
    pub fn new(backend: Arc<dyn GeocoderBackend>, search_zoom: f64) -> Self {
        Self {
            backend,
            search_zoom,
            state: Attachment::Unattached,
        }
    }

    /// Mounts the search widget for the session. Returns `false` if the widget is already
    /// mounted for this session.
    pub fn attach(
        &mut self,
        options: &GeocoderOptions,
        session: &MapSession,
    ) -> Result<bool, MapViewError> {
        if !session.is_ready() {
            return Err(MapViewError::NotReady);
        }

        if let Some((session_id, _)) = self.state.get() {
            if *session_id == session.id() {
                log::debug!("Search control is already attached to map {session_id}");
                return Ok(false);
            }

            log::warn!("Search control of removed map {session_id} is replaced");
            self.detach();
        }

        let widget = self.backend.mount(options)?;
        self.state = Attachment::Attached((session.id(), widget));
        log::debug!(
            "Search control attached to map {} in container '{}'",
            session.id(),
            options.container.id()
        );

        Ok(true)
    }

    /// Unmounts the widget. Returns `false` if it was not mounted.
    pub fn detach(&mut self) -> bool {
        match self.state.take() {
            Some((session_id, mut widget)) => {
                widget.unmount();
                log::debug!("Search control detached from map {session_id}");
                true
            }
            None => false,
        }
    }

    /// Returns `true` if the widget is mounted.
    pub fn is_attached(&self) -> bool {
        self.state.is_attached()
    }

    /// Handles a `result` event of the search widget.
    ///
    /// The map is not changed if the event does not contain a valid coordinate.
    pub fn handle_result(
        &self,
        event: &serde_json::Value,
        session: &mut MapSession,
    ) -> Result<GeocodeResult, MapViewError> {
        self.ensure_attached(session)?;
        let result = GeocodeResult::from_event(event)?;
        self.jump(&result, session);

        Ok(result)
    }

    /// Moves the map to an already parsed search result.
    pub fn select(
        &self,
        result: &GeocodeResult,
        session: &mut MapSession,
    ) -> Result<(), MapViewError> {
        self.ensure_attached(session)?;
        self.jump(result, session);

        Ok(())
    }

    fn ensure_attached(&self, session: &MapSession) -> Result<(), MapViewError> {
        match self.state.get() {
            Some((session_id, _)) if *session_id == session.id() => Ok(()),
            _ => Err(MapViewError::NotAttached(NAME)),
        }
    }

    fn jump(&self, result: &GeocodeResult, session: &mut MapSession) {
        log::debug!(
            "Moving map {} to '{}' at {:?}",
            session.id(),
            result.place_name(),
            result.position()
        );
        session.jump_to(Camera::new(result.position(), self.search_zoom));
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;
    use mediamap_types::lonlat;
    use serde_json::json;

    use super::*;
    use crate::engine::{ContainerHandle, HeadlessEngine, MapEngineAdapter, SessionOptions};
    use crate::geocoding::HeadlessGeocoder;

    fn geocoder_options() -> GeocoderOptions {
        GeocoderOptions {
            access_token: "token".into(),
            container: ContainerHandle::new("search"),
            placeholder: "Search for places".into(),
        }
    }

    fn adapter(engine: &HeadlessEngine, loaded: bool) -> MapEngineAdapter {
        let mut adapter = MapEngineAdapter::new(engine.clone());
        adapter
            .initialize(&SessionOptions {
                container: ContainerHandle::new("map"),
                access_token: "token".into(),
                style: "style".into(),
                camera: Camera::new(lonlat!(51.35, 35.70), 12.0),
            })
            .expect("session created");
        if loaded {
            adapter.with_session_mut(|s| s.signal_loaded());
        }
        adapter
    }

    #[test]
    fn attach_requires_loaded_map() {
        let geocoder = HeadlessGeocoder::new();
        let adapter = adapter(&HeadlessEngine::new(), false);
        let mut control = SearchControl::new(Arc::new(geocoder.clone()), 14.0);

        let result = adapter.with_session(|s| control.attach(&geocoder_options(), s));
        assert_matches!(result, Some(Err(MapViewError::NotReady)));
        assert_eq!(geocoder.mount_count(), 0);
    }

    #[test]
    fn attach_once_per_session() {
        let geocoder = HeadlessGeocoder::new();
        let adapter = adapter(&HeadlessEngine::new(), true);
        let mut control = SearchControl::new(Arc::new(geocoder.clone()), 14.0);

        let first = adapter.with_session(|s| control.attach(&geocoder_options(), s));
        let second = adapter.with_session(|s| control.attach(&geocoder_options(), s));

        assert_matches!(first, Some(Ok(true)));
        assert_matches!(second, Some(Ok(false)));
        assert_eq!(geocoder.mount_count(), 1);

        assert!(control.detach());
        assert!(!control.detach());
        assert_eq!(geocoder.mounted(), 0);
    }

    #[test]
    fn result_moves_map_to_search_zoom() {
        let engine = HeadlessEngine::new();
        let adapter = adapter(&engine, true);
        let mut control = SearchControl::new(Arc::new(HeadlessGeocoder::new()), 14.0);
        adapter.with_session(|s| control.attach(&geocoder_options(), s));

        let event = json!({"place_name": "Somewhere", "geometry": {"coordinates": [51.5, 35.7]}});
        let result = adapter
            .with_session_mut(|s| control.handle_result(&event, s))
            .expect("session exists")
            .expect("valid result");

        assert_eq!(result.place_name(), "Somewhere");
        let camera = engine.camera().expect("live session");
        assert_relative_eq!(camera.center(), lonlat!(51.5, 35.7));
        assert_eq!(camera.zoom(), 14.0);
    }

    #[test]
    fn malformed_result_does_not_move_map() {
        let engine = HeadlessEngine::new();
        let adapter = adapter(&engine, true);
        let mut control = SearchControl::new(Arc::new(HeadlessGeocoder::new()), 14.0);
        adapter.with_session(|s| control.attach(&geocoder_options(), s));
        let before = engine.camera();

        for event in [
            json!({"place_name": "Nowhere"}),
            json!({"geometry": {}}),
            json!({"geometry": {"coordinates": [51.5]}}),
            json!({"geometry": {"coordinates": ["a", "b"]}}),
        ] {
            let result = adapter.with_session_mut(|s| control.handle_result(&event, s));
            assert_matches!(result, Some(Err(MapViewError::MalformedGeocodeResult(_))));
        }

        assert_eq!(engine.camera(), before);
    }

    #[test]
    fn detached_control_ignores_results() {
        let engine = HeadlessEngine::new();
        let adapter = adapter(&engine, true);
        let control = SearchControl::new(Arc::new(HeadlessGeocoder::new()), 14.0);

        let event = json!({"geometry": {"coordinates": [51.5, 35.7]}});
        let result = adapter.with_session_mut(|s| control.handle_result(&event, s));

        assert_matches!(result, Some(Err(MapViewError::NotAttached(_))));
        assert_eq!(engine.camera().map(|c| c.zoom()), Some(12.0));
    }
}
