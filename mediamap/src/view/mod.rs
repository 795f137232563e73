//! The [`MapViewController`] owning the full lifecycle of a mounted map view.

use std::sync::Arc;

use mediamap_types::Camera;

use crate::async_runtime;
use crate::config::MapViewConfig;
use crate::control::{PositionReadout, PositionRegistration, SearchControl};
use crate::engine::{ContainerHandle, MapEngineAdapter, SessionId, SessionOptions};
use crate::error::MapViewError;
use crate::event::MapEvent;
use crate::geocoding::{GeocodeResult, GeocoderOptions};
use crate::marker::{MarkerHandle, MarkerSyncState, MarkerSynchronizer};
use crate::messenger::Messenger;
use crate::overlay::{DetailOverlay, OverlayContent, OverlayState};

mod builder;

pub use builder::MapViewBuilder;

/// Controller of an interactive map view with media markers.
///
/// The controller is created once per view with a [`MapViewBuilder`] and then goes through any
/// number of mount cycles:
///
/// 1. [`mount`](Self::mount) creates the map session in the given container.
/// 2. When the engine finishes loading, the host calls [`on_load`](Self::on_load) (or delivers
///    [`MapEvent::Loaded`]). The search control and the position control are attached and the
///    media markers start loading in the background.
/// 3. User interaction is delivered through [`handle_event`](Self::handle_event) or the
///    dedicated methods.
/// 4. [`unmount`](Self::unmount) detaches the controls, removes the markers and destroys the
///    session. Markers still loading at that point are never rendered.
///
/// Dropping the controller unmounts it.
pub struct MapViewController {
    config: MapViewConfig,
    adapter: MapEngineAdapter,
    search: Option<SearchControl>,
    search_container: Option<ContainerHandle>,
    position: PositionRegistration,
    markers: MarkerSynchronizer,
    overlay: DetailOverlay,
    messenger: Arc<dyn Messenger>,
}

impl MapViewController {
    /// Creates a builder for a controller with the given configuration.
    pub fn builder(config: MapViewConfig) -> MapViewBuilder {
        MapViewBuilder::new(config)
    }

    /// Configuration of the view.
    pub fn config(&self) -> &MapViewConfig {
        &self.config
    }

    /// Creates the map in `map_container`. The search box is rendered into `search_container`
    /// once the map is loaded.
    ///
    /// Mounting an already mounted view does nothing and returns the id of the existing session.
    pub fn mount(
        &mut self,
        map_container: ContainerHandle,
        search_container: ContainerHandle,
    ) -> Result<SessionId, MapViewError> {
        if let Some(id) = self.adapter.session_id() {
            log::debug!("Map view is already mounted as {id}");
            return Ok(id);
        }

        self.config.validate()?;
        let options = SessionOptions {
            container: map_container,
            access_token: self.config.access_token().to_owned(),
            style: self.config.style().to_owned(),
            camera: self.config.initial_camera(),
        };

        let id = self.adapter.initialize(&options)?;
        self.search_container = Some(search_container);

        Ok(id)
    }

    /// Handles the load signal of the engine.
    ///
    /// Attaches the controls and starts loading media markers. Every step is done once per
    /// session, so repeated signals change nothing. A control that cannot be attached is logged
    /// and skipped; it does not prevent the other steps.
    pub fn on_load(&mut self) -> Result<(), MapViewError> {
        let (id, first) = self
            .adapter
            .with_session_mut(|session| (session.id(), session.signal_loaded()))
            .ok_or(MapViewError::NoSession)?;

        if first {
            log::info!("Map {id} is loaded");
        } else {
            log::debug!("Repeated load signal for map {id}");
        }

        self.attach_search();
        self.register_position();
        self.load_markers();

        Ok(())
    }

    /// Starts loading media markers for the current session in the background.
    ///
    /// Returns `false` if no load was started: the map is not mounted or loaded yet, or the
    /// markers are already loaded (or being loaded). Use
    /// [`refresh_markers`](Self::refresh_markers) to reload them.
    pub fn load_markers(&self) -> bool {
        let Some(session) = self.adapter.session_ref() else {
            log::warn!("Markers requested for an unmounted map");
            return false;
        };

        match self.markers.begin(&session) {
            Some(load) => {
                async_runtime::spawn(async move {
                    load.run().await;
                });
                true
            }
            None => false,
        }
    }

    /// Removes all markers of the current session and loads them again.
    ///
    /// Returns `false` if the map is not loaded or a load is already in progress.
    pub fn refresh_markers(&self) -> bool {
        let Some(session) = self.adapter.session_ref() else {
            return false;
        };

        match self.markers.begin_refresh(&session) {
            Some(load) => {
                self.messenger.request_redraw();
                async_runtime::spawn(async move {
                    load.run().await;
                });
                true
            }
            None => false,
        }
    }

    /// Handles a `result` event of the search widget.
    ///
    /// Moves the map to the found place at the search zoom. If the event has no usable
    /// coordinate, the error is logged and the map is not changed.
    pub fn apply_search_result(
        &mut self,
        event: &serde_json::Value,
    ) -> Result<GeocodeResult, MapViewError> {
        let result = match &self.search {
            Some(search) => self
                .adapter
                .with_session_mut(|session| search.handle_result(event, session))
                .unwrap_or(Err(MapViewError::NoSession)),
            None => Err(MapViewError::NotAttached("search control")),
        };

        match &result {
            Ok(found) => {
                log::debug!("Moved to search result '{}'", found.place_name());
                self.messenger.request_redraw();
            }
            Err(err @ MapViewError::MalformedGeocodeResult(_)) => {
                log::error!("No coordinates found in the search result: {err}");
            }
            Err(err) => log::warn!("Search result ignored: {err}"),
        }

        result
    }

    /// Moves the map to a search result obtained by other means, e.g. from an
    /// [`HttpGeocoder`](crate::geocoding::HttpGeocoder) query.
    pub fn select_search_result(&mut self, result: &GeocodeResult) -> Result<(), MapViewError> {
        let search = self
            .search
            .as_ref()
            .ok_or(MapViewError::NotAttached("search control"))?;
        self.adapter
            .with_session_mut(|session| search.select(result, session))
            .ok_or(MapViewError::NoSession)??;
        self.messenger.request_redraw();

        Ok(())
    }

    /// Handles a click on a marker: opens the detail overlay with the record of the marker.
    ///
    /// Returns `false` if the marker does not belong to the current session.
    pub fn click_marker(&mut self, handle: MarkerHandle) -> bool {
        let content = self.adapter.with_session(|session| {
            session
                .markers()
                .get(handle)
                .map(|marker| OverlayContent::from(marker.record()))
        });

        match content.flatten() {
            Some(content) => {
                self.overlay.open(content);
                self.messenger.request_redraw();
                true
            }
            None => {
                log::warn!("Click on unknown marker {handle:?} ignored");
                false
            }
        }
    }

    /// Closes the detail overlay. Returns `false` if it was not open.
    pub fn close_overlay(&mut self) -> bool {
        let closed = self.overlay.close();
        if closed {
            self.messenger.request_redraw();
        }

        closed
    }

    /// Dispatches an event delivered by the host.
    ///
    /// Errors the view recovers from (a malformed search result, an event for an unmounted map)
    /// are logged by the handlers and not returned. Only fatal errors are.
    pub fn handle_event(&mut self, event: MapEvent) -> Result<(), MapViewError> {
        let result = match event {
            MapEvent::Loaded => self.on_load(),
            MapEvent::SearchResult(value) => self.apply_search_result(&value).map(|_| ()),
            MapEvent::MarkerClicked(handle) => {
                self.click_marker(handle);
                Ok(())
            }
            MapEvent::OverlayDismissed => {
                self.close_overlay();
                Ok(())
            }
        };

        match result {
            Err(err) if !err.is_fatal() => {
                log::debug!("Event handled with a recoverable error: {err}");
                Ok(())
            }
            other => other,
        }
    }

    /// Destroys the map session.
    ///
    /// The search control is detached first, then the position control is removed, then the
    /// markers, and finally the engine session. Returns `false` if the view was not mounted.
    /// Safe to call any number of times, including after a failed [`mount`](Self::mount).
    pub fn unmount(&mut self) -> bool {
        if let Some(search) = &mut self.search {
            search.detach();
        }

        let position = &mut self.position;
        if self
            .adapter
            .with_session_mut(|session| position.unregister(Some(session)))
            .is_none()
        {
            position.unregister(None);
        }

        self.overlay.close();
        self.search_container = None;
        self.adapter.teardown()
    }

    /// Id of the current map session.
    pub fn session_id(&self) -> Option<SessionId> {
        self.adapter.session_id()
    }

    /// Returns `true` if the map is mounted and loaded.
    pub fn is_ready(&self) -> bool {
        self.adapter
            .with_session(|session| session.is_ready())
            .unwrap_or(false)
    }

    /// Current view of the map.
    pub fn camera(&self) -> Option<Camera> {
        self.adapter.with_session(|session| session.camera())
    }

    /// Number of markers on the map.
    pub fn marker_count(&self) -> usize {
        self.adapter
            .with_session(|session| session.markers().len())
            .unwrap_or(0)
    }

    /// Handles of the markers on the map in the order of the media records.
    pub fn marker_handles(&self) -> Vec<MarkerHandle> {
        self.adapter
            .with_session(|session| session.markers().iter().map(|m| m.handle()).collect())
            .unwrap_or_default()
    }

    /// State of marker loading of the current session.
    pub fn marker_sync_state(&self) -> Option<MarkerSyncState> {
        self.adapter
            .with_session(|session| session.marker_sync().clone())
    }

    /// Detail overlay.
    pub fn overlay(&self) -> &DetailOverlay {
        &self.overlay
    }

    /// Snapshot of the detail overlay for the presentation layer.
    pub fn overlay_state(&self) -> OverlayState {
        self.overlay.state()
    }

    /// Readout of the position control.
    pub fn position_readout(&self) -> &PositionReadout {
        self.position.readout()
    }

    /// Returns `true` if the position control is on the map.
    pub fn position_registered(&self) -> bool {
        self.position.is_registered()
    }

    /// Returns `true` if the search control is mounted.
    pub fn search_attached(&self) -> bool {
        self.search.as_ref().is_some_and(|s| s.is_attached())
    }

    fn attach_search(&mut self) {
        let Some(search) = &mut self.search else {
            return;
        };
        let Some(container) = &self.search_container else {
            return;
        };

        let options = GeocoderOptions {
            access_token: self.config.access_token().to_owned(),
            container: container.clone(),
            placeholder: self.config.search_placeholder().to_owned(),
        };

        match self
            .adapter
            .with_session(|session| search.attach(&options, session))
        {
            Some(Ok(true)) => log::info!("Search control attached"),
            Some(Ok(false)) => {}
            Some(Err(err)) => log::warn!("Failed to attach search control: {err}"),
            None => log::warn!("Search control cannot be attached to an unmounted map"),
        }
    }

    fn register_position(&mut self) {
        let position = &mut self.position;
        match self
            .adapter
            .with_session_mut(|session| position.register(session))
        {
            Some(Ok(true)) => log::info!("Position control added"),
            Some(Ok(false)) => {}
            Some(Err(err)) => log::warn!("Failed to add position control: {err}"),
            None => log::warn!("Position control cannot be added to an unmounted map"),
        }
    }
}

impl Drop for MapViewController {
    fn drop(&mut self) {
        self.unmount();
    }
}
