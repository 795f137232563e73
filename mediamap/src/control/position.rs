use std::sync::Arc;

use mediamap_types::geo::GeoPoint;
use mediamap_types::Camera;
use parking_lot::RwLock;

use crate::control::{Attachment, ControlId, ControlPlacement, MapControl};
use crate::engine::{MapSession, SessionId};
use crate::error::MapViewError;

/// Current map position as shown by a [`PositionControl`].
///
/// Cheap to clone; all clones observe the same control.
#[derive(Debug, Clone, Default)]
pub struct PositionReadout {
    camera: Arc<RwLock<Option<Camera>>>,
}

impl PositionReadout {
    /// Last view reported to the control, or `None` if the control is not on the map.
    pub fn camera(&self) -> Option<Camera> {
        *self.camera.read()
    }

    /// Text displayed by the control.
    pub fn text(&self) -> String {
        match self.camera() {
            Some(camera) => format!(
                "Lng: {:.4} | Lat: {:.4} | Zoom: {:.2}",
                camera.center().lon(),
                camera.center().lat(),
                camera.zoom()
            ),
            None => String::new(),
        }
    }

    fn set(&self, camera: Option<Camera>) {
        *self.camera.write() = camera;
    }
}

/// Map control displaying the coordinates of the map center and the zoom level.
pub struct PositionControl {
    readout: PositionReadout,
}

impl PositionControl {
    /// Creates a control publishing its state to the given readout.
    pub fn new(readout: PositionReadout) -> Self {
        Self { readout }
    }
}

impl MapControl for PositionControl {
    fn on_add(&mut self, camera: &Camera) {
        self.readout.set(Some(*camera));
    }

    fn on_view_changed(&mut self, camera: &Camera) {
        self.readout.set(Some(*camera));
    }

    fn on_remove(&mut self) {
        self.readout.set(None);
    }

    fn text(&self) -> String {
        self.readout.text()
    }
}

/// Registration of the [`PositionControl`] with a map session.
pub struct PositionRegistration {
    placement: ControlPlacement,
    readout: PositionReadout,
    state: Attachment<(SessionId, ControlId)>,
}

impl PositionRegistration {
    /// Creates an unregistered control for the given corner of the map.
    pub fn new(placement: ControlPlacement) -> Self {
        Self {
            placement,
            readout: PositionReadout::default(),
            state: Attachment::Unattached,
        }
    }

    /// Adds the control to the session. Returns `false` if it is already there.
    pub fn register(&mut self, session: &mut MapSession) -> Result<bool, MapViewError> {
        if !session.is_ready() {
            return Err(MapViewError::NotReady);
        }

        if let Some((session_id, _)) = self.state.get() {
            if *session_id == session.id() {
                log::debug!("Position control is already added to map {session_id}");
                return Ok(false);
            }

            log::warn!("Position control of removed map {session_id} is replaced");
        }

        let control = PositionControl::new(self.readout.clone());
        let id = session
            .engine_mut()
            .add_control(Box::new(control), self.placement);
        self.state = Attachment::Attached((session.id(), id));
        log::debug!("Position control added to map {}", session.id());

        Ok(true)
    }

    /// Removes the control from the session it was added to.
    pub fn unregister(&mut self, session: Option<&mut MapSession>) {
        let Some((session_id, control_id)) = self.state.take() else {
            return;
        };

        match session {
            Some(session) if session.id() == session_id => {
                session.engine_mut().remove_control(control_id);
            }
            _ => self.readout.set(None),
        }
    }

    /// Returns `true` if the control is on a map.
    pub fn is_registered(&self) -> bool {
        self.state.is_attached()
    }

    /// Readout of the control.
    pub fn readout(&self) -> &PositionReadout {
        &self.readout
    }
}
