use std::sync::Arc;

use ahash::AHashMap;

use crate::marker::{MarkerHandle, MediaRecord};

/// Marker on the map, linked to the record it was created for.
#[derive(Debug, Clone)]
pub struct MarkerVisual {
    handle: MarkerHandle,
    record: Arc<MediaRecord>,
}

impl MarkerVisual {
    /// Engine handle of the marker.
    pub fn handle(&self) -> MarkerHandle {
        self.handle
    }

    /// Record displayed by the marker.
    pub fn record(&self) -> &MediaRecord {
        &self.record
    }
}

/// Markers of one map session in the order they were rendered.
#[derive(Debug, Default)]
pub struct MarkerStore {
    markers: Vec<MarkerVisual>,
    by_handle: AHashMap<MarkerHandle, usize>,
}

impl MarkerStore {
    pub(crate) fn insert(&mut self, handle: MarkerHandle, record: Arc<MediaRecord>) {
        self.by_handle.insert(handle, self.markers.len());
        self.markers.push(MarkerVisual { handle, record });
    }

    /// Returns the marker with the given handle.
    pub fn get(&self, handle: MarkerHandle) -> Option<&MarkerVisual> {
        self.by_handle
            .get(&handle)
            .and_then(|index| self.markers.get(*index))
    }

    /// Number of markers.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Returns `true` if there are no markers.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Iterates over markers in the render order.
    pub fn iter(&self) -> impl Iterator<Item = &MarkerVisual> + '_ {
        self.markers.iter()
    }

    /// Removes all markers, returning their handles.
    pub(crate) fn clear(&mut self) -> Vec<MarkerHandle> {
        self.by_handle.clear();
        self.markers.drain(..).map(|m| m.handle).collect()
    }
}
