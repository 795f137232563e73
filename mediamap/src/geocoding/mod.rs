//! Geocoding: translation of free-text place queries into coordinates.
//!
//! The search box itself is provided by the host through a [`GeocoderBackend`]. The box emits
//! `result` events with GeoJSON features, which are parsed into [`GeocodeResult`]s.
//! [`HttpGeocoder`] can be used to run forward geocoding queries directly.

use std::sync::Arc;

use maybe_sync::{MaybeSend, MaybeSync};
use mediamap_types::geo::GeoPoint2d;
use parking_lot::RwLock;
use serde::Deserialize;

use crate::engine::ContainerHandle;
use crate::error::MapViewError;

#[cfg(not(target_arch = "wasm32"))]
mod http;
#[cfg(not(target_arch = "wasm32"))]
pub use http::HttpGeocoder;

/// Place found by a geocoding search.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    place_name: String,
    position: GeoPoint2d,
}

#[derive(Deserialize)]
struct RawGeocodeFeature {
    #[serde(default)]
    place_name: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    geometry: Option<RawGeometry>,
}

#[derive(Deserialize)]
struct RawGeometry {
    #[serde(default)]
    coordinates: Option<Vec<f64>>,
}

impl GeocodeResult {
    /// Creates a new result.
    pub fn new(place_name: impl Into<String>, position: GeoPoint2d) -> Self {
        Self {
            place_name: place_name.into(),
            position,
        }
    }

    /// Parses a GeoJSON feature of a search result: `{"geometry": {"coordinates": [lng, lat]}}`.
    pub fn from_event(event: &serde_json::Value) -> Result<Self, MapViewError> {
        let feature = RawGeocodeFeature::deserialize(event)
            .map_err(|err| MapViewError::MalformedGeocodeResult(err.to_string()))?;
        let coordinates = feature
            .geometry
            .and_then(|geometry| geometry.coordinates)
            .ok_or_else(|| {
                MapViewError::MalformedGeocodeResult("no coordinates found in the result".into())
            })?;

        let &[lon, lat, ..] = coordinates.as_slice() else {
            return Err(MapViewError::MalformedGeocodeResult(format!(
                "expected [lng, lat], got {coordinates:?}"
            )));
        };

        let position = GeoPoint2d::try_lonlat(lon, lat)
            .map_err(|err| MapViewError::MalformedGeocodeResult(err.to_string()))?;
        let place_name = feature.place_name.or(feature.text).unwrap_or_default();

        Ok(Self {
            place_name,
            position,
        })
    }

    /// Human readable name of the place.
    pub fn place_name(&self) -> &str {
        &self.place_name
    }

    /// Position of the place.
    pub fn position(&self) -> GeoPoint2d {
        self.position
    }
}

/// Parameters of a search widget.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocoderOptions {
    /// Access token of the geocoding service.
    pub access_token: String,
    /// Element the widget is rendered into.
    pub container: ContainerHandle,
    /// Placeholder text of the search input.
    pub placeholder: String,
}

/// Provider of search widgets.
pub trait GeocoderBackend: MaybeSend + MaybeSync {
    /// Renders a new search widget.
    fn mount(&self, options: &GeocoderOptions) -> Result<Box<dyn SearchWidget>, MapViewError>;
}

/// Search widget rendered by a [`GeocoderBackend`].
pub trait SearchWidget: MaybeSend + MaybeSync {
    /// Removes the widget and all its event listeners.
    fn unmount(&mut self);
}

/// Geocoder backend without any UI. Keeps count of the mounted widgets.
#[derive(Debug, Clone, Default)]
pub struct HeadlessGeocoder {
    state: Arc<RwLock<HeadlessGeocoderState>>,
}

#[derive(Debug, Default)]
struct HeadlessGeocoderState {
    mount_count: usize,
    mounted: usize,
    last_options: Option<GeocoderOptions>,
}

impl HeadlessGeocoder {
    /// Creates a new backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of widgets mounted over the backend lifetime.
    pub fn mount_count(&self) -> usize {
        self.state.read().mount_count
    }

    /// Number of currently mounted widgets.
    pub fn mounted(&self) -> usize {
        self.state.read().mounted
    }

    /// Options of the last mounted widget.
    pub fn last_options(&self) -> Option<GeocoderOptions> {
        self.state.read().last_options.clone()
    }
}

impl GeocoderBackend for HeadlessGeocoder {
    fn mount(&self, options: &GeocoderOptions) -> Result<Box<dyn SearchWidget>, MapViewError> {
        let mut state = self.state.write();
        state.mount_count += 1;
        state.mounted += 1;
        state.last_options = Some(options.clone());

        Ok(Box::new(HeadlessSearchWidget {
            state: self.state.clone(),
            mounted: true,
        }))
    }
}

struct HeadlessSearchWidget {
    state: Arc<RwLock<HeadlessGeocoderState>>,
    mounted: bool,
}

impl SearchWidget for HeadlessSearchWidget {
    fn unmount(&mut self) {
        if std::mem::take(&mut self.mounted) {
            let mut state = self.state.write();
            state.mounted = state.mounted.saturating_sub(1);
        }
    }
}
