//! Configuration of a map view.

use std::time::Duration;

use mediamap_types::{lonlat, Camera};

use crate::control::ControlPlacement;
use crate::error::MapViewError;

/// Environment variable with the map provider access token.
pub const ACCESS_TOKEN_VAR: &str = "MEDIAMAP_ACCESS_TOKEN";
/// Environment variable with the map style reference.
pub const STYLE_VAR: &str = "MEDIAMAP_STYLE";
/// Environment variable with the media endpoint url.
pub const MEDIA_URL_VAR: &str = "MEDIAMAP_MEDIA_URL";

const DEFAULT_STYLE: &str = "mapbox://styles/areyeslo/clwzf7thv01c101ppegim3y6g";
const DEFAULT_MEDIA_URL: &str = "http://localhost:4000/media";
const DEFAULT_GEOCODING_URL: &str = "https://api.mapbox.com";
const DEFAULT_CENTER_LON: f64 = 51.35140956290013;
const DEFAULT_CENTER_LAT: f64 = 35.70152639644212;
const DEFAULT_ZOOM: f64 = 12.0;
const DEFAULT_SEARCH_ZOOM: f64 = 14.0;
const DEFAULT_SEARCH_PLACEHOLDER: &str = "Search for places";

/// Configuration of a [`MapViewController`](crate::MapViewController).
#[derive(Debug, Clone, PartialEq)]
pub struct MapViewConfig {
    access_token: String,
    style: String,
    media_url: String,
    geocoding_url: String,
    initial_camera: Camera,
    search_zoom: f64,
    search_placeholder: String,
    position_placement: ControlPlacement,
    fetch_timeout: Option<Duration>,
}

impl MapViewConfig {
    /// Creates a configuration with the given access token and default values for everything
    /// else.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            style: DEFAULT_STYLE.into(),
            media_url: DEFAULT_MEDIA_URL.into(),
            geocoding_url: DEFAULT_GEOCODING_URL.into(),
            initial_camera: Camera::new(
                lonlat!(DEFAULT_CENTER_LON, DEFAULT_CENTER_LAT),
                DEFAULT_ZOOM,
            ),
            search_zoom: DEFAULT_SEARCH_ZOOM,
            search_placeholder: DEFAULT_SEARCH_PLACEHOLDER.into(),
            position_placement: ControlPlacement::TopRight,
            fetch_timeout: None,
        }
    }

    /// Reads the configuration from the process environment.
    ///
    /// [`ACCESS_TOKEN_VAR`] is required. [`STYLE_VAR`] and [`MEDIA_URL_VAR`] override the
    /// defaults if set.
    pub fn from_env() -> Result<Self, MapViewError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, MapViewError> {
        let token = lookup(ACCESS_TOKEN_VAR)
            .ok_or_else(|| MapViewError::Config(format!("{ACCESS_TOKEN_VAR} is not set")))?;

        let mut config = Self::new(token);
        if let Some(style) = lookup(STYLE_VAR) {
            config.set_style(style);
        }
        if let Some(url) = lookup(MEDIA_URL_VAR) {
            config.set_media_url(url);
        }

        Ok(config)
    }

    /// Checks that a map can be created with this configuration.
    pub fn validate(&self) -> Result<(), MapViewError> {
        if self.access_token.trim().is_empty() {
            return Err(MapViewError::Initialization("map access token is empty".into()));
        }
        if self.style.trim().is_empty() {
            return Err(MapViewError::Initialization("map style reference is empty".into()));
        }
        if !self.search_zoom.is_finite() || self.search_zoom < 0.0 {
            return Err(MapViewError::Config(format!(
                "invalid search zoom: {}",
                self.search_zoom
            )));
        }

        Ok(())
    }

    /// Map provider access token.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Reference to the map style.
    pub fn style(&self) -> &str {
        &self.style
    }

    /// Sets the map style reference.
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.set_style(style);
        self
    }

    /// Sets the map style reference.
    pub fn set_style(&mut self, style: impl Into<String>) {
        self.style = style.into();
    }

    /// Url of the media records endpoint.
    pub fn media_url(&self) -> &str {
        &self.media_url
    }

    /// Sets the url of the media records endpoint.
    pub fn with_media_url(mut self, url: impl Into<String>) -> Self {
        self.set_media_url(url);
        self
    }

    /// Sets the url of the media records endpoint.
    pub fn set_media_url(&mut self, url: impl Into<String>) {
        self.media_url = url.into();
    }

    /// Base url of the geocoding service.
    pub fn geocoding_url(&self) -> &str {
        &self.geocoding_url
    }

    /// Sets the base url of the geocoding service.
    pub fn with_geocoding_url(mut self, url: impl Into<String>) -> Self {
        self.geocoding_url = url.into();
        self
    }

    /// View of the map right after it is created.
    pub fn initial_camera(&self) -> Camera {
        self.initial_camera
    }

    /// Sets the view of the map right after it is created.
    pub fn with_initial_camera(mut self, camera: Camera) -> Self {
        self.initial_camera = camera;
        self
    }

    /// Zoom level the map is set to when a search result is selected.
    ///
    /// Search results are always shown close-in, regardless of the current zoom.
    pub fn search_zoom(&self) -> f64 {
        self.search_zoom
    }

    /// Sets the zoom level the map is set to when a search result is selected.
    pub fn with_search_zoom(mut self, zoom: f64) -> Self {
        self.search_zoom = zoom;
        self
    }

    /// Placeholder text of the search input.
    pub fn search_placeholder(&self) -> &str {
        &self.search_placeholder
    }

    /// Sets the placeholder text of the search input.
    pub fn with_search_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.search_placeholder = placeholder.into();
        self
    }

    /// Corner of the map with the position readout.
    pub fn position_placement(&self) -> ControlPlacement {
        self.position_placement
    }

    /// Sets the corner of the map with the position readout.
    pub fn with_position_placement(mut self, placement: ControlPlacement) -> Self {
        self.position_placement = placement;
        self
    }

    /// Timeout of the media request. `None` means no timeout.
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout
    }

    /// Sets the timeout of the media request.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }
}
