//! Geographic primitives shared by the `mediamap` crates.
//!
//! * [`geo::GeoPoint`] and [`geo::GeoPoint2d`] describe a position on the Earth surface in degrees.
//! * [`geo::CoordinateValue`] is a coordinate as it arrives from external data sources (either a
//!   number or a numeric string) and knows how to normalize itself into degrees.
//! * [`Camera`] is a pair of map center and zoom level.

pub mod camera;
pub mod error;
pub mod geo;

pub use camera::Camera;
pub use error::MediaMapTypesError;
