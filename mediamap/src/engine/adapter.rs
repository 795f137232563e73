use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::engine::{MapEngine, MapSession, SessionId, SessionOptions};
use crate::error::MapViewError;

type SessionSlot = RwLock<Option<MapSession>>;

/// Owner of the live [`MapSession`] of a view.
///
/// The adapter creates at most one session at a time: repeated [`initialize`](Self::initialize)
/// calls return the id of the existing session. After [`teardown`](Self::teardown) the slot is
/// empty again and the next `initialize` creates a fresh session with a new id.
///
/// The slot is shared with background tasks through [`SessionRef`]s, which only give access to
/// the session they were created for.
pub struct MapEngineAdapter {
    engine: Box<dyn MapEngine>,
    slot: Arc<SessionSlot>,
    next_session_id: u64,
}

impl MapEngineAdapter {
    /// Creates a new adapter for the given engine. No session is created until
    /// [`initialize`](Self::initialize) is called.
    pub fn new(engine: impl MapEngine + 'static) -> Self {
        Self::from_boxed(Box::new(engine))
    }

    /// Creates a new adapter for an already boxed engine.
    pub fn from_boxed(engine: Box<dyn MapEngine>) -> Self {
        Self {
            engine,
            slot: Arc::new(RwLock::new(None)),
            next_session_id: 1,
        }
    }

    /// Creates the engine session unless it already exists.
    ///
    /// Blank access token or style reference is rejected before the engine is called. On failure
    /// the adapter stays uninitialized, so the call can be retried.
    pub fn initialize(&mut self, options: &SessionOptions) -> Result<SessionId, MapViewError> {
        options.validate()?;

        let mut slot = self.slot.write();
        if let Some(session) = &*slot {
            log::debug!("Map is already initialized as {}", session.id());
            return Ok(session.id());
        }

        let engine_session = self.engine.create_session(options).map_err(|err| match err {
            MapViewError::Initialization(_) => err,
            other => MapViewError::Initialization(other.to_string()),
        })?;

        let id = SessionId::new(self.next_session_id);
        self.next_session_id += 1;

        *slot = Some(MapSession::new(id, engine_session));
        log::info!("Map {id} created in container '{}'", options.container.id());

        Ok(id)
    }

    /// Returns `true` if a session exists.
    pub fn is_initialized(&self) -> bool {
        self.slot.read().is_some()
    }

    /// Id of the current session.
    pub fn session_id(&self) -> Option<SessionId> {
        self.slot.read().as_ref().map(|session| session.id())
    }

    /// Runs `f` with the current session, if any.
    pub fn with_session<R>(&self, f: impl FnOnce(&MapSession) -> R) -> Option<R> {
        self.slot.read().as_ref().map(f)
    }

    /// Runs `f` with the current session, if any.
    pub fn with_session_mut<R>(&self, f: impl FnOnce(&mut MapSession) -> R) -> Option<R> {
        self.slot.write().as_mut().map(f)
    }

    pub(crate) fn session_ref(&self) -> Option<SessionRef> {
        let id = self.session_id()?;
        Some(SessionRef {
            slot: Arc::downgrade(&self.slot),
            id,
        })
    }

    /// Destroys the current session, releasing all engine resources and markers.
    ///
    /// Returns `false` if there was no session. Safe to call any number of times.
    pub fn teardown(&mut self) -> bool {
        let session = self.slot.write().take();
        match session {
            Some(session) => {
                session.destroy();
                true
            }
            None => false,
        }
    }
}

/// Weak reference to one specific map session.
///
/// Used by background tasks that outlive the call that started them. Once the session is torn
/// down (or replaced by a session of a later mount), the reference resolves to nothing.
#[derive(Clone)]
pub(crate) struct SessionRef {
    slot: Weak<SessionSlot>,
    id: SessionId,
}

impl SessionRef {
    pub(crate) fn id(&self) -> SessionId {
        self.id
    }

    /// Runs `f` with the session if it is still alive.
    pub(crate) fn with_live<R>(&self, f: impl FnOnce(&mut MapSession) -> R) -> Option<R> {
        let slot = self.slot.upgrade()?;
        let mut guard = slot.write();
        match guard.as_mut() {
            Some(session) if session.id() == self.id => Some(f(session)),
            _ => None,
        }
    }
}
