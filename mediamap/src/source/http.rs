use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::config::MapViewConfig;
use crate::error::{FetchError, MapViewError};
use crate::marker::{decode_media_batch, MediaBatch};
use crate::source::MediaSource;

/// Loads media records with a `GET` request to a JSON endpoint.
///
/// The endpoint must respond with a JSON array of `{lat, lng, title, description, url}` objects.
#[derive(Debug, Clone)]
pub struct HttpMediaSource {
    http_client: reqwest::Client,
    url: String,
    timeout: Option<Duration>,
}

impl HttpMediaSource {
    /// Creates a source for the given endpoint url.
    pub fn new(url: impl Into<String>) -> Result<Self, MapViewError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("mediamap/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| MapViewError::Initialization(format!("http client: {err}")))?;

        Ok(Self {
            http_client,
            url: url.into(),
            timeout: None,
        })
    }

    /// Creates a source for the endpoint and timeout set in the configuration.
    pub fn from_config(config: &MapViewConfig) -> Result<Self, MapViewError> {
        let mut source = Self::new(config.media_url())?;
        source.timeout = config.fetch_timeout();
        Ok(source)
    }

    /// Sets the request timeout. By default, requests wait as long as the transport allows.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Endpoint url.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl MediaSource for HttpMediaSource {
    async fn fetch(&self) -> Result<MediaBatch, FetchError> {
        let mut request = self.http_client.get(&self.url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        log::debug!("Loading media records from {}", self.url);
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        decode_response(status, &body)
    }
}

fn decode_response(status: StatusCode, body: &[u8]) -> Result<MediaBatch, FetchError> {
    if !status.is_success() {
        log::info!(
            "Media source responded with {status}: {}",
            String::from_utf8_lossy(body)
        );
        return Err(FetchError::Status(status.as_u16()));
    }

    let batch = decode_media_batch(body)?;
    log::debug!(
        "Loaded {} media records, {} items dropped",
        batch.records().len(),
        batch.dropped()
    );

    Ok(batch)
}
