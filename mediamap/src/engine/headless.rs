use std::sync::Arc;

use mediamap_types::geo::GeoPoint2d;
use mediamap_types::Camera;
use parking_lot::RwLock;

use crate::control::{ControlId, ControlPlacement, MapControl};
use crate::engine::{EngineSession, MapEngine, SessionOptions};
use crate::error::MapViewError;
use crate::marker::{MarkerHandle, MarkerStyle};

/// Map engine that keeps the map state in memory and renders nothing.
///
/// Useful for tests, servers and command line tools. The engine is cheap to clone, all clones
/// share the same state, so a clone can be kept to inspect the map after the original was given
/// to a [`MapEngineAdapter`](super::MapEngineAdapter).
#[derive(Clone, Default)]
pub struct HeadlessEngine {
    state: Arc<RwLock<HeadlessState>>,
    failure: Option<String>,
}

/// Marker placed on a headless map.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessMarker {
    /// Handle of the marker.
    pub handle: MarkerHandle,
    /// Position of the marker.
    pub position: GeoPoint2d,
    /// Style the marker was created with.
    pub style: MarkerStyle,
}

struct HeadlessControl {
    id: ControlId,
    placement: ControlPlacement,
    control: Box<dyn MapControl>,
}

#[derive(Default)]
struct HeadlessState {
    sessions_created: usize,
    live_sessions: usize,
    camera: Option<Camera>,
    markers: Vec<HeadlessMarker>,
    controls: Vec<HeadlessControl>,
    next_id: u64,
}

impl HeadlessState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl HeadlessEngine {
    /// Creates a new engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine that refuses to create sessions with the given reason.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            state: Default::default(),
            failure: Some(reason.into()),
        }
    }

    /// Number of sessions created by the engine over its lifetime.
    pub fn sessions_created(&self) -> usize {
        self.state.read().sessions_created
    }

    /// Number of sessions that were created and not removed yet.
    pub fn live_sessions(&self) -> usize {
        self.state.read().live_sessions
    }

    /// Current view of the live session.
    pub fn camera(&self) -> Option<Camera> {
        self.state.read().camera
    }

    /// Markers of the live session in the order they were added.
    pub fn markers(&self) -> Vec<HeadlessMarker> {
        self.state.read().markers.clone()
    }

    /// Placement and text of every control of the live session.
    pub fn controls(&self) -> Vec<(ControlPlacement, String)> {
        self.state
            .read()
            .controls
            .iter()
            .map(|c| (c.placement, c.control.text()))
            .collect()
    }

    /// Simulates the user moving the map, e.g. by dragging it.
    pub fn simulate_move(&self, camera: Camera) {
        let mut state = self.state.write();
        if state.camera.is_none() {
            return;
        }

        state.camera = Some(camera);
        for entry in &mut state.controls {
            entry.control.on_view_changed(&camera);
        }
    }
}

impl MapEngine for HeadlessEngine {
    fn create_session(
        &self,
        options: &SessionOptions,
    ) -> Result<Box<dyn EngineSession>, MapViewError> {
        if let Some(reason) = &self.failure {
            return Err(MapViewError::Initialization(reason.clone()));
        }
        if options.access_token.trim().is_empty() {
            return Err(MapViewError::Initialization(
                "access token is required".into(),
            ));
        }

        let mut state = self.state.write();
        state.sessions_created += 1;
        state.live_sessions += 1;
        state.camera = Some(options.camera);
        state.markers.clear();
        state.controls.clear();

        Ok(Box::new(HeadlessSession {
            state: self.state.clone(),
            camera: options.camera,
            removed: false,
        }))
    }
}

struct HeadlessSession {
    state: Arc<RwLock<HeadlessState>>,
    camera: Camera,
    removed: bool,
}

impl EngineSession for HeadlessSession {
    fn camera(&self) -> Camera {
        if self.removed {
            return self.camera;
        }

        self.state.read().camera.unwrap_or(self.camera)
    }

    fn jump_to(&mut self, camera: Camera) {
        if self.removed {
            return;
        }

        self.camera = camera;
        let mut state = self.state.write();
        state.camera = Some(camera);
        for entry in &mut state.controls {
            entry.control.on_view_changed(&camera);
        }
    }

    fn add_control(
        &mut self,
        mut control: Box<dyn MapControl>,
        placement: ControlPlacement,
    ) -> ControlId {
        let mut state = self.state.write();
        let id = ControlId::new(state.next_id());
        if self.removed {
            return id;
        }

        control.on_add(&state.camera.unwrap_or(self.camera));
        state.controls.push(HeadlessControl {
            id,
            placement,
            control,
        });

        id
    }

    fn remove_control(&mut self, id: ControlId) {
        let mut state = self.state.write();
        if let Some(index) = state.controls.iter().position(|c| c.id == id) {
            let mut entry = state.controls.remove(index);
            entry.control.on_remove();
        }
    }

    fn add_marker(&mut self, position: GeoPoint2d, style: &MarkerStyle) -> MarkerHandle {
        let mut state = self.state.write();
        let handle = MarkerHandle::new(state.next_id());
        if !self.removed {
            state.markers.push(HeadlessMarker {
                handle,
                position,
                style: style.clone(),
            });
        }

        handle
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        self.state.write().markers.retain(|m| m.handle != handle);
    }

    fn remove(&mut self) {
        if self.removed {
            return;
        }

        self.removed = true;
        let mut state = self.state.write();
        for mut entry in state.controls.drain(..) {
            entry.control.on_remove();
        }
        state.markers.clear();
        state.camera = None;
        state.live_sessions = state.live_sessions.saturating_sub(1);
    }
}
