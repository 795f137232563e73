//! Events delivered to the [`MapViewController`](crate::MapViewController) by the host.
//!
//! The host translates the callbacks of the rendering engine, the search widget and the overlay
//! presentation into [`MapEvent`]s and passes them to
//! [`MapViewController::handle_event`](crate::MapViewController::handle_event).

use crate::marker::MarkerHandle;

/// Event of the map view.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// The engine finished loading the map. May be delivered more than once.
    Loaded,
    /// The search widget produced a result. The value is the raw geocoding feature, e.g.
    /// `{"place_name": "...", "geometry": {"coordinates": [lng, lat]}}`.
    SearchResult(serde_json::Value),
    /// The user clicked a media marker.
    MarkerClicked(MarkerHandle),
    /// The user closed the detail overlay.
    OverlayDismissed,
}
