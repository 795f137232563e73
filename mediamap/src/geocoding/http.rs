use reqwest::Url;
use serde::Deserialize;

use crate::config::MapViewConfig;
use crate::error::{FetchError, MapViewError};
use crate::geocoding::GeocodeResult;

const DEFAULT_LIMIT: u8 = 5;

/// Forward geocoder using the Mapbox Geocoding API (or a compatible service).
#[derive(Debug, Clone)]
pub struct HttpGeocoder {
    http_client: reqwest::Client,
    base_url: String,
    access_token: String,
    limit: u8,
}

#[derive(Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<serde_json::Value>,
}

impl HttpGeocoder {
    /// Creates a geocoder for the service at `base_url`.
    pub fn new(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self, MapViewError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("mediamap/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| MapViewError::Initialization(format!("http client: {err}")))?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
            access_token: access_token.into(),
            limit: DEFAULT_LIMIT,
        })
    }

    /// Creates a geocoder with the service url and access token from the configuration.
    pub fn from_config(config: &MapViewConfig) -> Result<Self, MapViewError> {
        Self::new(config.geocoding_url(), config.access_token())
    }

    /// Sets the maximum number of results of a query.
    pub fn with_limit(mut self, limit: u8) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// Searches for places matching the query. Results are ordered by relevance.
    pub async fn forward(&self, query: &str) -> Result<Vec<GeocodeResult>, FetchError> {
        let url = self.query_url(query)?;
        let response = self.http_client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            log::info!("Geocoding of '{query}' failed with {status}");
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        parse_features(&body)
    }

    fn query_url(&self, query: &str) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|err| FetchError::Transport(format!("{}: {err}", self.base_url)))?;
        let file_name = format!("{}.json", query.trim());
        url.path_segments_mut()
            .map_err(|_| FetchError::Transport(format!("{} is not a base url", self.base_url)))?
            .pop_if_empty()
            .extend(["geocoding", "v5", "mapbox.places", file_name.as_str()]);
        url.query_pairs_mut()
            .append_pair("access_token", &self.access_token)
            .append_pair("limit", &self.limit.to_string());

        Ok(url)
    }
}

fn parse_features(body: &[u8]) -> Result<Vec<GeocodeResult>, FetchError> {
    let collection: FeatureCollection = serde_json::from_slice(body)?;
    let results = collection
        .features
        .iter()
        .filter_map(|feature| match GeocodeResult::from_event(feature) {
            Ok(result) => Some(result),
            Err(err) => {
                log::warn!("Skipping geocoding feature: {err}");
                None
            }
        })
        .collect();

    Ok(results)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use mediamap_types::lonlat;

    use super::*;

    #[test]
    fn builds_query_url() {
        let geocoder = HttpGeocoder::new("https://api.mapbox.com", "pk.token")
            .expect("client created")
            .with_limit(3);
        let url = geocoder.query_url(" Azadi Tower ").expect("valid url");

        assert_eq!(
            url.as_str(),
            "https://api.mapbox.com/geocoding/v5/mapbox.places/Azadi%20Tower.json?access_token=pk.token&limit=3"
        );
    }

    #[test]
    fn query_is_a_single_path_segment() {
        let geocoder = HttpGeocoder::new("http://localhost:8080/", "t").expect("client created");
        let url = geocoder.query_url("a/b").expect("valid url");

        assert_eq!(url.path(), "/geocoding/v5/mapbox.places/a%2Fb.json");
    }

    #[test]
    fn parses_feature_collection() {
        let body = br#"{
            "type": "FeatureCollection",
            "features": [
                {"place_name": "First", "geometry": {"coordinates": [51.4, 35.7]}},
                {"place_name": "Broken", "geometry": {}},
                {"place_name": "Second", "geometry": {"coordinates": [-0.12, 51.5]}}
            ]
        }"#;

        let results = parse_features(body).expect("valid body");
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].place_name(), "Second");
        assert_relative_eq!(results[1].position(), lonlat!(-0.12, 51.5));
    }

    #[test]
    fn empty_collection() {
        assert!(parse_features(br#"{"type": "FeatureCollection"}"#)
            .expect("valid body")
            .is_empty());
    }
}
