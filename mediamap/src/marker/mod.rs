//! Point-of-interest markers built from remote media records.
//!
//! [`MarkerSynchronizer`] loads [`RawMediaRecord`]s from a
//! [`MediaSource`](crate::source::MediaSource), normalizes them into [`MediaRecord`]s and puts
//! one marker per record on the map. Every marker is stored together with its record in the
//! session's [`MarkerStore`], so a click on a marker is resolved to the record it was created for.

use serde::{Deserialize, Serialize};

mod record;
mod store;
mod synchronizer;

pub use record::{decode_media_batch, MediaBatch, MediaRecord, RawMediaRecord};
pub use store::{MarkerStore, MarkerVisual};
pub use synchronizer::{MarkerSyncState, MarkerSynchronizer};

/// Handle of a marker in the map engine.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerHandle(u64);

impl MarkerHandle {
    /// Creates a new handle. Handles are assigned by the map engine.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Numeric value of the handle.
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Visual element of a marker.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MarkerStyle {
    /// Class name the host can use to style the element.
    pub class_name: String,
    /// Text content of the element.
    pub glyph: String,
    /// Font size of the glyph in pixels.
    pub font_size: f32,
    /// CSS color of the glyph.
    pub color: String,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            class_name: "custom-marker".into(),
            glyph: "◦".into(),
            font_size: 50.0,
            color: "red".into(),
        }
    }
}
