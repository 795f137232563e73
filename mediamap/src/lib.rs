//! Mediamap is a lifecycle controller for an interactive map view that shows media items as
//! markers.
//!
//! The rendering is done by an external map engine (see [`engine::MapEngine`]). Mediamap decides
//! *when* and *what* is put on the map:
//!
//! * the map session is created once per mounted view and destroyed on unmount,
//! * a geocoding search box and a position readout are attached once the engine has loaded,
//! * media records are loaded from a remote source and rendered as markers, once per session,
//! * clicking a marker shows the item in a [detail overlay](overlay::DetailOverlay).
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use mediamap::engine::{ContainerHandle, HeadlessEngine};
//! use mediamap::geocoding::HeadlessGeocoder;
//! use mediamap::{MapEvent, MapViewBuilder, MapViewConfig};
//!
//! # tokio_test::block_on(async {
//! let config = MapViewConfig::from_env().expect("MEDIAMAP_ACCESS_TOKEN is set");
//! let mut controller = MapViewBuilder::new(config)
//!     .with_engine(HeadlessEngine::new())
//!     .with_geocoder(Arc::new(HeadlessGeocoder::new()))
//!     .build()
//!     .expect("controller created");
//!
//! controller
//!     .mount(ContainerHandle::new("map"), ContainerHandle::new("geocoder"))
//!     .expect("map created");
//! controller.handle_event(MapEvent::Loaded).expect("map is mounted");
//! # });
//! ```
//!
//! All operations that can fail for reasons outside of the caller's control (a failed fetch, a
//! malformed record, a search result without coordinates) are logged with the [`log`] crate and
//! skipped, leaving the rest of the view functional. Only a failure to create the map is
//! reported to the caller as fatal.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub(crate) mod async_runtime;
pub mod config;
pub mod control;
pub mod engine;
pub mod error;
mod event;
pub mod geocoding;
pub mod marker;
mod messenger;
pub mod overlay;
pub mod source;
mod view;

pub use config::MapViewConfig;
pub use error::{FetchError, MapViewError};
pub use event::MapEvent;
pub use messenger::{DummyMessenger, Messenger};
pub use view::{MapViewBuilder, MapViewController};

// Reexport mediamap_types
pub use mediamap_types;
