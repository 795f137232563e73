//! Points in geographic coordinates (latitude and longitude in degrees).

mod coordinate;
mod point;

pub use coordinate::CoordinateValue;
pub use point::{GeoPoint, GeoPoint2d, NewGeoPoint};
