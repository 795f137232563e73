use mediamap_types::geo::{CoordinateValue, GeoPoint2d};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::error::{FetchError, MapViewError};

/// Media record as it is served by the remote media source.
///
/// Coordinates are kept as they came: numbers or numeric strings. Use
/// [`MediaRecord::from_raw`] to validate and normalize the record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawMediaRecord {
    /// Latitude.
    #[serde(default)]
    pub lat: Option<CoordinateValue>,
    /// Longitude.
    #[serde(default)]
    pub lng: Option<CoordinateValue>,
    /// Title.
    #[serde(default)]
    pub title: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Link to the media content.
    #[serde(default)]
    pub url: Option<String>,
}

/// Validated media record with a normalized position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaRecord {
    position: GeoPoint2d,
    title: String,
    description: String,
    content_url: String,
}

impl MediaRecord {
    /// Creates a new record.
    pub fn new(
        position: GeoPoint2d,
        title: impl Into<String>,
        description: impl Into<String>,
        content_url: impl Into<String>,
    ) -> Self {
        Self {
            position,
            title: title.into(),
            description: description.into(),
            content_url: content_url.into(),
        }
    }

    /// Validates and normalizes a raw record. `index` is the position of the record in its batch
    /// and is only used for error reporting.
    ///
    /// Fails with [`MapViewError::MalformedRecord`] if a coordinate is missing, cannot be parsed
    /// into a finite number, or the latitude is out of range.
    pub fn from_raw(index: usize, raw: &RawMediaRecord) -> Result<Self, MapViewError> {
        let lat = Self::degrees(index, "latitude", raw.lat.as_ref())?;
        let lon = Self::degrees(index, "longitude", raw.lng.as_ref())?;
        let position = GeoPoint2d::try_lonlat(lon, lat)
            .map_err(|err| MapViewError::malformed_record(index, err))?;

        Ok(Self {
            position,
            title: raw.title.clone().unwrap_or_default(),
            description: raw.description.clone().unwrap_or_default(),
            content_url: raw.url.clone().unwrap_or_default(),
        })
    }

    fn degrees(
        index: usize,
        name: &str,
        value: Option<&CoordinateValue>,
    ) -> Result<f64, MapViewError> {
        let value =
            value.ok_or_else(|| MapViewError::malformed_record(index, format!("{name} is missing")))?;
        value
            .to_degrees()
            .map_err(|err| MapViewError::malformed_record(index, format!("{name}: {err}")))
    }

    /// Position of the record.
    pub fn position(&self) -> GeoPoint2d {
        self.position
    }

    /// Title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Link to the media content.
    pub fn content_url(&self) -> &str {
        &self.content_url
    }
}

/// Media records returned by a [`MediaSource`](crate::source::MediaSource).
///
/// Items of a source response that cannot be read as records at all are not kept but counted,
/// so they are reported as skipped together with the records that fail validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaBatch {
    records: Vec<RawMediaRecord>,
    dropped: usize,
}

impl MediaBatch {
    /// Creates a batch with no dropped items.
    pub fn new(records: Vec<RawMediaRecord>) -> Self {
        Self {
            records,
            dropped: 0,
        }
    }

    /// Records in the source order.
    pub fn records(&self) -> &[RawMediaRecord] {
        &self.records
    }

    /// Number of response items that were not records.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

impl From<Vec<RawMediaRecord>> for MediaBatch {
    fn from(records: Vec<RawMediaRecord>) -> Self {
        Self::new(records)
    }
}

/// Decodes the body of a media source response.
///
/// The body must be a JSON array. Every item is decoded on its own: an item that is not a media
/// record (a title that is not a string, a number out of the `f64` range) is logged and counted
/// as dropped, the rest of the batch is returned in the source order.
pub fn decode_media_batch(body: &[u8]) -> Result<MediaBatch, FetchError> {
    let items: Vec<Box<RawValue>> = serde_json::from_slice(body)?;
    let mut records = Vec::with_capacity(items.len());
    let mut dropped = 0;
    for (index, item) in items.iter().enumerate() {
        match serde_json::from_str::<RawMediaRecord>(item.get()) {
            Ok(record) => records.push(record),
            Err(err) => {
                log::warn!("{}", MapViewError::malformed_record(index, err));
                dropped += 1;
            }
        }
    }

    Ok(MediaBatch { records, dropped })
}
