use maybe_sync::{MaybeSend, MaybeSync};

/// Channel from the map view controller back to the host application.
///
/// The controller changes the map state in response to events that the host does not see
/// directly (a fetch completing in the background, a search result moving the camera). After
/// every such change it asks the host to redraw the view.
pub trait Messenger: MaybeSend + MaybeSync {
    /// Requests the host to redraw the map view.
    fn request_redraw(&self);
}

/// Messenger that ignores all requests. Used when the host does not provide one.
#[derive(Debug, Default, Copy, Clone)]
pub struct DummyMessenger;

impl Messenger for DummyMessenger {
    fn request_redraw(&self) {}
}
