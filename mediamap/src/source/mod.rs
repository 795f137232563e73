//! Remote sources of media records.

use async_trait::async_trait;
use maybe_sync::{MaybeSend, MaybeSync};

use crate::error::FetchError;
use crate::marker::{MediaBatch, RawMediaRecord};

#[cfg(not(target_arch = "wasm32"))]
mod http;
#[cfg(not(target_arch = "wasm32"))]
pub use http::HttpMediaSource;

/// Source of the media records displayed on the map.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait MediaSource: MaybeSend + MaybeSync {
    /// Loads the full list of records in the order they should be displayed.
    async fn fetch(&self) -> Result<MediaBatch, FetchError>;
}

/// Media source with a fixed set of records.
#[derive(Debug, Clone, Default)]
pub struct StaticMediaSource {
    records: Vec<RawMediaRecord>,
}

impl StaticMediaSource {
    /// Creates a source returning the given records.
    pub fn new(records: Vec<RawMediaRecord>) -> Self {
        Self { records }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl MediaSource for StaticMediaSource {
    async fn fetch(&self) -> Result<MediaBatch, FetchError> {
        Ok(MediaBatch::new(self.records.clone()))
    }
}
