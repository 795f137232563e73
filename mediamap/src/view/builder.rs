use std::sync::Arc;

use crate::config::MapViewConfig;
use crate::control::{PositionRegistration, SearchControl};
use crate::engine::{MapEngine, MapEngineAdapter};
use crate::error::MapViewError;
use crate::geocoding::GeocoderBackend;
use crate::marker::{MarkerStyle, MarkerSynchronizer};
use crate::messenger::{DummyMessenger, Messenger};
use crate::overlay::DetailOverlay;
use crate::source::MediaSource;

use super::MapViewController;

/// Convenience type to set up a [`MapViewController`].
///
/// ```
/// use std::sync::Arc;
/// use mediamap::engine::HeadlessEngine;
/// use mediamap::geocoding::HeadlessGeocoder;
/// use mediamap::source::StaticMediaSource;
/// use mediamap::{MapViewBuilder, MapViewConfig};
///
/// let controller = MapViewBuilder::new(MapViewConfig::new("pk.token"))
///     .with_engine(HeadlessEngine::new())
///     .with_geocoder(Arc::new(HeadlessGeocoder::new()))
///     .with_media_source(Arc::new(StaticMediaSource::default()))
///     .build()
///     .expect("all parts are set");
///
/// assert!(controller.session_id().is_none());
/// ```
pub struct MapViewBuilder {
    config: MapViewConfig,
    engine: Option<Box<dyn MapEngine>>,
    geocoder: Option<Arc<dyn GeocoderBackend>>,
    media_source: Option<Arc<dyn MediaSource>>,
    messenger: Option<Arc<dyn Messenger>>,
    marker_style: MarkerStyle,
}

impl MapViewBuilder {
    /// Starts building a controller with the given configuration.
    pub fn new(config: MapViewConfig) -> Self {
        Self {
            config,
            engine: None,
            geocoder: None,
            media_source: None,
            messenger: None,
            marker_style: MarkerStyle::default(),
        }
    }

    /// Sets the rendering engine. Required.
    pub fn with_engine(mut self, engine: impl MapEngine + 'static) -> Self {
        self.engine = Some(Box::new(engine));
        self
    }

    /// Sets the geocoding backend of the search control.
    ///
    /// Without a geocoder the view has no search control.
    pub fn with_geocoder(mut self, geocoder: Arc<dyn GeocoderBackend>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    /// Sets the source of media records.
    ///
    /// On native targets defaults to an [`HttpMediaSource`](crate::source::HttpMediaSource) for
    /// the configured media url.
    pub fn with_media_source(mut self, source: Arc<dyn MediaSource>) -> Self {
        self.media_source = Some(source);
        self
    }

    /// Sets the messenger notified when the view must be redrawn.
    pub fn with_messenger(mut self, messenger: impl Messenger + 'static) -> Self {
        self.messenger = Some(Arc::new(messenger));
        self
    }

    /// Sets the style of media markers.
    pub fn with_marker_style(mut self, style: MarkerStyle) -> Self {
        self.marker_style = style;
        self
    }

    /// Consumes the builder and creates the controller. The map is not created until
    /// [`MapViewController::mount`] is called.
    pub fn build(self) -> Result<MapViewController, MapViewError> {
        let Some(engine) = self.engine else {
            return Err(MapViewError::Config("map engine is not set".into()));
        };

        let media_source = match self.media_source {
            Some(source) => source,
            None => Self::default_media_source(&self.config)?,
        };

        let messenger: Arc<dyn Messenger> = match self.messenger {
            Some(messenger) => messenger,
            None => Arc::new(DummyMessenger),
        };
        let mut markers = MarkerSynchronizer::new(media_source).with_style(self.marker_style);
        markers.set_messenger(messenger.clone());

        let search = match self.geocoder {
            Some(geocoder) => Some(SearchControl::new(geocoder, self.config.search_zoom())),
            None => {
                log::info!("No geocoder is set, map view is created without search control");
                None
            }
        };

        Ok(MapViewController {
            adapter: MapEngineAdapter::from_boxed(engine),
            position: PositionRegistration::new(self.config.position_placement()),
            config: self.config,
            search,
            search_container: None,
            markers,
            overlay: DetailOverlay::new(),
            messenger,
        })
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn default_media_source(config: &MapViewConfig) -> Result<Arc<dyn MediaSource>, MapViewError> {
        Ok(Arc::new(crate::source::HttpMediaSource::from_config(
            config,
        )?))
    }

    #[cfg(target_arch = "wasm32")]
    fn default_media_source(_config: &MapViewConfig) -> Result<Arc<dyn MediaSource>, MapViewError> {
        Err(MapViewError::Config("media source is not set".into()))
    }
}
