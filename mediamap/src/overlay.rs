//! Detail overlay showing the media item behind a clicked marker.

use serde::{Deserialize, Serialize};

use crate::marker::MediaRecord;

/// Content displayed by the [`DetailOverlay`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayContent {
    /// Title of the media item.
    pub title: String,
    /// Description of the media item.
    pub description: String,
    /// Location of the media content, e.g. an embeddable video url.
    pub content_url: String,
}

impl From<&MediaRecord> for OverlayContent {
    fn from(record: &MediaRecord) -> Self {
        Self {
            title: record.title().to_owned(),
            description: record.description().to_owned(),
            content_url: record.content_url().to_owned(),
        }
    }
}

/// Snapshot of the overlay as consumed by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayState {
    /// Whether the overlay is visible.
    pub is_open: bool,
    /// Title of the last shown item.
    pub title: String,
    /// Description of the last shown item.
    pub description: String,
    /// Content url of the last shown item.
    pub content_url: String,
}

/// Visibility of the overlay.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum OverlayPhase {
    /// Nothing is shown.
    #[default]
    Closed,
    /// Content of a media item is shown.
    Open,
}

/// Overlay displaying the details of one media item at a time.
///
/// Opening the overlay replaces all of its content, so values of a previously shown item never
/// leak into the next one. Closing only hides the overlay: the content is kept until the next
/// [`open`](Self::open).
#[derive(Debug, Clone, Default)]
pub struct DetailOverlay {
    phase: OverlayPhase,
    content: OverlayContent,
}

impl DetailOverlay {
    /// Creates a closed overlay with no content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows the given content. Works both for a closed and an already open overlay.
    pub fn open(&mut self, content: OverlayContent) {
        log::debug!("Opening detail overlay for '{}'", content.title);
        self.content = content;
        self.phase = OverlayPhase::Open;
    }

    /// Hides the overlay. Returns `false` if it was already closed.
    pub fn close(&mut self) -> bool {
        let was_open = self.is_open();
        self.phase = OverlayPhase::Closed;
        was_open
    }

    /// Current visibility.
    pub fn phase(&self) -> OverlayPhase {
        self.phase
    }

    /// Returns `true` if the overlay is visible.
    pub fn is_open(&self) -> bool {
        self.phase == OverlayPhase::Open
    }

    /// Content of the last shown item.
    pub fn content(&self) -> &OverlayContent {
        &self.content
    }

    /// Snapshot of the overlay.
    pub fn state(&self) -> OverlayState {
        OverlayState {
            is_open: self.is_open(),
            title: self.content.title.clone(),
            description: self.content.description.clone(),
            content_url: self.content.content_url.clone(),
        }
    }
}
