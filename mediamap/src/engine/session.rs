use std::fmt::{Display, Formatter};
use std::sync::Arc;

use mediamap_types::Camera;

use crate::engine::{EngineSession, ReadinessGate};
use crate::marker::{MarkerHandle, MarkerStore, MarkerStyle, MarkerSyncState, MediaRecord};

/// Identifier of a map session. Every mount of a view creates a session with a new id.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

/// Live map of a mounted view.
///
/// Owns the engine session together with everything that lives exactly as long as it: the
/// readiness state and the markers rendered on it. Dropping the markers together with the session
/// makes it impossible to render a marker on a map that no longer exists.
pub struct MapSession {
    id: SessionId,
    engine: Box<dyn EngineSession>,
    readiness: ReadinessGate,
    markers: MarkerStore,
    marker_sync: MarkerSyncState,
}

impl MapSession {
    pub(crate) fn new(id: SessionId, engine: Box<dyn EngineSession>) -> Self {
        Self {
            id,
            engine,
            readiness: ReadinessGate::default(),
            markers: MarkerStore::default(),
            marker_sync: MarkerSyncState::default(),
        }
    }

    /// Id of the session.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Returns `true` if the engine has finished loading.
    pub fn is_ready(&self) -> bool {
        self.readiness.is_ready()
    }

    /// Current view of the map.
    pub fn camera(&self) -> Camera {
        self.engine.camera()
    }

    /// Moves the map to the given view.
    pub fn jump_to(&mut self, camera: Camera) {
        self.engine.jump_to(camera);
    }

    /// Markers rendered on the map.
    pub fn markers(&self) -> &MarkerStore {
        &self.markers
    }

    /// State of the marker loading for this session.
    pub fn marker_sync(&self) -> &MarkerSyncState {
        &self.marker_sync
    }

    pub(crate) fn signal_loaded(&mut self) -> bool {
        self.readiness.signal_loaded()
    }

    pub(crate) fn engine_mut(&mut self) -> &mut dyn EngineSession {
        self.engine.as_mut()
    }

    pub(crate) fn set_marker_sync(&mut self, state: MarkerSyncState) {
        self.marker_sync = state;
    }

    pub(crate) fn add_marker(
        &mut self,
        record: Arc<MediaRecord>,
        style: &MarkerStyle,
    ) -> MarkerHandle {
        let handle = self.engine.add_marker(record.position(), style);
        self.markers.insert(handle, record);
        handle
    }

    /// Removes all markers from the engine. Returns the number of removed markers.
    pub(crate) fn clear_markers(&mut self) -> usize {
        let handles = self.markers.clear();
        for handle in &handles {
            self.engine.remove_marker(*handle);
        }

        handles.len()
    }

    pub(crate) fn destroy(mut self) {
        let removed = self.clear_markers();
        self.engine.remove();
        log::info!("Map {} destroyed, {removed} markers removed", self.id);
    }
}
