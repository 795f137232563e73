//! Error types used by the crate.

use thiserror::Error;

/// Mediamap error type.
///
/// Only [`MapViewError::Initialization`] and [`MapViewError::Config`] are fatal for the map view.
/// All other variants describe conditions that are logged and skipped by the
/// [`MapViewController`](crate::MapViewController), leaving the rest of the view functional.
#[derive(Debug, Error)]
pub enum MapViewError {
    /// Map engine could not create a session (bad access token, style or container).
    #[error("map initialization failed: {0}")]
    Initialization(String),
    /// Configuration is incomplete.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Media records could not be loaded.
    #[error("failed to fetch media records: {0}")]
    Fetch(#[from] FetchError),
    /// A single media record cannot be displayed.
    #[error("media record #{index} is malformed: {reason}")]
    MalformedRecord {
        /// Position of the record in the source list.
        index: usize,
        /// Details.
        reason: String,
    },
    /// Geocoding result does not contain a usable coordinate.
    #[error("malformed geocode result: {0}")]
    MalformedGeocodeResult(String),
    /// Operation requires a mounted map, but there is none.
    #[error("map is not mounted")]
    NoSession,
    /// Operation requires the map to be loaded.
    #[error("map is not loaded yet")]
    NotReady,
    /// The named control is not attached to the map.
    #[error("{0} is not attached")]
    NotAttached(&'static str),
}

/// Reason of a failed media fetch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// Could not reach the remote server.
    #[error("transport error: {0}")]
    Transport(String),
    /// Request was not answered in time.
    #[error("request timed out")]
    Timeout,
    /// Server responded with a non-success status code.
    #[error("server responded with status {0}")]
    Status(u16),
    /// Response body is not a list of media records.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl MapViewError {
    /// Returns `true` if the view cannot work after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Initialization(_) | Self::Config(_))
    }

    pub(crate) fn malformed_record(index: usize, reason: impl ToString) -> Self {
        Self::MalformedRecord {
            index,
            reason: reason.to_string(),
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<reqwest::Error> for FetchError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            Self::Timeout
        } else if let Some(status) = value.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Transport(value.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_setup_errors_are_fatal() {
        assert!(MapViewError::Initialization("bad token".into()).is_fatal());
        assert!(MapViewError::Config("no engine".into()).is_fatal());
        assert!(!MapViewError::Fetch(FetchError::Timeout).is_fatal());
        assert!(!MapViewError::malformed_record(2, "latitude is missing").is_fatal());
        assert!(!MapViewError::NoSession.is_fatal());
    }

    #[test]
    fn fetch_error_message() {
        assert_eq!(
            MapViewError::from(FetchError::Status(500)).to_string(),
            "failed to fetch media records: server responded with status 500"
        );
    }
}
