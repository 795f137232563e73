use approx::{AbsDiffEq, RelativeEq};
use num_traits::Float;
use serde::{Deserialize, Serialize};

use crate::error::MediaMapTypesError;

/// Point on the Earth surface, defined by latitude and longitude in degrees.
pub trait GeoPoint {
    /// Numeric type used to represent coordinates.
    type Num: Float;

    /// Latitude in degrees.
    fn lat(&self) -> Self::Num;
    /// Longitude in degrees.
    fn lon(&self) -> Self::Num;
}

/// Geo point that can be constructed from its coordinates.
pub trait NewGeoPoint<N = f64>: GeoPoint<Num = N> + Sized {
    /// Creates a point from latitude and longitude.
    fn latlon(lat: N, lon: N) -> Self;
    /// Creates a point from longitude and latitude. Most web map APIs and GeoJSON use this
    /// order.
    fn lonlat(lon: N, lat: N) -> Self {
        Self::latlon(lat, lon)
    }
}

/// 2d point on the Earth surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct GeoPoint2d {
    lat: f64,
    lon: f64,
}

impl GeoPoint for GeoPoint2d {
    type Num = f64;

    fn lat(&self) -> f64 {
        self.lat
    }

    fn lon(&self) -> f64 {
        self.lon
    }
}

impl NewGeoPoint<f64> for GeoPoint2d {
    fn latlon(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl GeoPoint2d {
    /// Creates a point from longitude and latitude, checking that both values are finite and the
    /// latitude is within `[-90, 90]`.
    ///
    /// Longitude is not limited, as map engines wrap it around the antimeridian.
    ///
    /// ```
    /// use mediamap_types::geo::{GeoPoint, GeoPoint2d};
    ///
    /// let point = GeoPoint2d::try_lonlat(51.5, 35.7).unwrap();
    /// assert_eq!(point.lon(), 51.5);
    ///
    /// assert!(GeoPoint2d::try_lonlat(0.0, 91.0).is_err());
    /// assert!(GeoPoint2d::try_lonlat(f64::NAN, 0.0).is_err());
    /// ```
    pub fn try_lonlat(lon: f64, lat: f64) -> Result<Self, MediaMapTypesError> {
        if !lon.is_finite() {
            return Err(MediaMapTypesError::InvalidCoordinate(lon.to_string()));
        }
        if !lat.is_finite() {
            return Err(MediaMapTypesError::InvalidCoordinate(lat.to_string()));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(MediaMapTypesError::LatitudeOutOfRange(lat));
        }

        Ok(Self { lat, lon })
    }
}

impl AbsDiffEq for GeoPoint2d {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.lat.abs_diff_eq(&other.lat, epsilon) && self.lon.abs_diff_eq(&other.lon, epsilon)
    }
}

impl RelativeEq for GeoPoint2d {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.lat.relative_eq(&other.lat, epsilon, max_relative)
            && self.lon.relative_eq(&other.lon, epsilon, max_relative)
    }
}

/// Creates a new [`GeoPoint2d`] from latitude and longitude values (in degrees).
///
/// ```
/// use mediamap_types::geo::GeoPoint;
/// use mediamap_types::latlon;
///
/// let point = latlon!(38.0, 52.0);
/// assert_eq!(point.lat(), 38.0);
/// ```
#[macro_export]
macro_rules! latlon {
    ($lat:expr, $lon:expr) => {
        <$crate::geo::GeoPoint2d as $crate::geo::NewGeoPoint<f64>>::latlon($lat, $lon)
    };
}

/// Creates a new [`GeoPoint2d`] from longitude and latitude values (in degrees).
///
/// ```
/// use mediamap_types::geo::GeoPoint;
/// use mediamap_types::lonlat;
///
/// let point = lonlat!(51.5, 35.7);
/// assert_eq!(point.lat(), 35.7);
/// ```
#[macro_export]
macro_rules! lonlat {
    ($lon:expr, $lat:expr) => {
        <$crate::geo::GeoPoint2d as $crate::geo::NewGeoPoint<f64>>::lonlat($lon, $lat)
    };
}
