//! Facade over the map rendering engine.
//!
//! The rendering itself is done by an external engine (a browser map library, a GPU renderer or
//! the in-memory [`HeadlessEngine`]). This module defines the narrow interface the view
//! controller needs from it ([`MapEngine`] and [`EngineSession`]), and the
//! [`MapEngineAdapter`] that owns the single live [`MapSession`] of a mounted view.
//!
//! Engine sessions are created synchronously, but the engine finishes its own initialization
//! asynchronously and then emits a one-shot load signal. Until that signal is delivered to the
//! session's readiness gate, no control or marker may be added to the session.

use maybe_sync::{MaybeSend, MaybeSync};
use mediamap_types::geo::GeoPoint2d;
use mediamap_types::Camera;

use crate::control::{ControlId, ControlPlacement, MapControl};
use crate::error::MapViewError;
use crate::marker::{MarkerHandle, MarkerStyle};

mod adapter;
mod headless;
mod readiness;
mod session;

pub use adapter::MapEngineAdapter;
pub(crate) use adapter::SessionRef;
pub use headless::{HeadlessEngine, HeadlessMarker};
pub(crate) use readiness::ReadinessGate;
pub use session::{MapSession, SessionId};

/// Opaque reference to a host UI element the engine or a control renders into.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerHandle(String);

impl ContainerHandle {
    /// Creates a handle from the host element identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Host element identifier.
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Parameters of a new engine session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    /// Element the map is rendered into.
    pub container: ContainerHandle,
    /// Map provider access token.
    pub access_token: String,
    /// Reference to the map style.
    pub style: String,
    /// Initial view.
    pub camera: Camera,
}

impl SessionOptions {
    /// Checks that the access token and the style reference are not blank.
    pub fn validate(&self) -> Result<(), MapViewError> {
        if self.access_token.trim().is_empty() {
            return Err(MapViewError::Initialization("map access token is empty".into()));
        }
        if self.style.trim().is_empty() {
            return Err(MapViewError::Initialization("map style reference is empty".into()));
        }

        Ok(())
    }
}

/// Map rendering engine.
pub trait MapEngine: MaybeSend + MaybeSync {
    /// Creates a new engine session.
    ///
    /// The returned session accepts calls right away, but the engine is not considered loaded
    /// until it emits its load signal.
    fn create_session(
        &self,
        options: &SessionOptions,
    ) -> Result<Box<dyn EngineSession>, MapViewError>;
}

/// Live instance of a map in the rendering engine.
pub trait EngineSession: MaybeSend + MaybeSync {
    /// Current view of the map.
    fn camera(&self) -> Camera;
    /// Moves the map to the given view without animation.
    fn jump_to(&mut self, camera: Camera);
    /// Adds a control to the control area of the map.
    fn add_control(
        &mut self,
        control: Box<dyn MapControl>,
        placement: ControlPlacement,
    ) -> ControlId;
    /// Removes a previously added control. Unknown ids are ignored.
    fn remove_control(&mut self, id: ControlId);
    /// Places a marker at the given position.
    fn add_marker(&mut self, position: GeoPoint2d, style: &MarkerStyle) -> MarkerHandle;
    /// Removes a marker. Unknown handles are ignored.
    fn remove_marker(&mut self, handle: MarkerHandle);
    /// Releases all engine resources held by the session. Must be safe to call more than once.
    fn remove(&mut self);
}
