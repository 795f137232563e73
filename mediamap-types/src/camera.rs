//! Position of the map view.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint2d;

/// Center and zoom level of a map view.
///
/// Zoom uses the usual web map convention: `0` shows the whole world, every next level doubles
/// the scale.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Camera {
    center: GeoPoint2d,
    zoom: f64,
}

impl Camera {
    /// Creates a new camera.
    pub fn new(center: GeoPoint2d, zoom: f64) -> Self {
        Self { center, zoom }
    }

    /// Center of the view.
    pub fn center(&self) -> GeoPoint2d {
        self.center
    }

    /// Zoom level of the view.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }
}
