//! Controls are UI elements that are attached to a live map session after it is loaded.
//!
//! There are two of them:
//! * [`SearchControl`] - geocoding search box that moves the map to the selected place;
//! * [`PositionControl`] - read-only readout of the current map center and zoom.
//!
//! A map engine may report its load completion more than once (for example, when the host
//! re-runs its setup code). Every control keeps an explicit [`Attachment`] state, so repeated
//! attach calls for the same session never create a second instance.

use maybe_sync::{MaybeSend, MaybeSync};
use mediamap_types::Camera;
use serde::{Deserialize, Serialize};

mod position;
mod search;

pub use position::{PositionControl, PositionReadout, PositionRegistration};
pub use search::SearchControl;

/// Corner of the map where a control is placed.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlPlacement {
    /// Top left corner.
    TopLeft,
    /// Top right corner.
    #[default]
    TopRight,
    /// Bottom left corner.
    BottomLeft,
    /// Bottom right corner.
    BottomRight,
}

/// Identifier of a control added to an engine session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ControlId(u64);

impl ControlId {
    /// Creates a new id. Ids are assigned by the map engine.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Numeric value of the id.
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// UI element that a map engine displays in its control area.
///
/// The engine owns the control after it is added. Controls can observe the map view but never
/// change it.
pub trait MapControl: MaybeSend + MaybeSync {
    /// Called once when the control is added to the map.
    fn on_add(&mut self, camera: &Camera);
    /// Called every time the map view changes.
    fn on_view_changed(&mut self, camera: &Camera);
    /// Called once when the control is removed from the map.
    fn on_remove(&mut self);
    /// Text content of the control.
    fn text(&self) -> String;
}

/// Attachment state of a subsystem that must be set up at most once per map session.
#[derive(Debug)]
pub enum Attachment<T> {
    /// The subsystem is not attached.
    Unattached,
    /// The subsystem is attached and holds the given value.
    Attached(T),
}

impl<T> Default for Attachment<T> {
    fn default() -> Self {
        Self::Unattached
    }
}

impl<T> Attachment<T> {
    /// Returns `true` if attached.
    pub fn is_attached(&self) -> bool {
        matches!(self, Self::Attached(_))
    }

    /// Returns a reference to the attached value.
    pub fn get(&self) -> Option<&T> {
        match self {
            Self::Attached(value) => Some(value),
            Self::Unattached => None,
        }
    }

    /// Resets the state to [`Attachment::Unattached`], returning the previously attached value.
    pub fn take(&mut self) -> Option<T> {
        match std::mem::take(self) {
            Self::Attached(value) => Some(value),
            Self::Unattached => None,
        }
    }
}
