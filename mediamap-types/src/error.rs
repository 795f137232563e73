//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MediaMapTypesError {
    /// Coordinate value cannot be interpreted as a finite number of degrees.
    #[error("invalid coordinate value: {0}")]
    InvalidCoordinate(String),
    /// Latitude is outside of `[-90, 90]` range.
    #[error("latitude {0} is out of range")]
    LatitudeOutOfRange(f64),
}
