//! SessionRegistry: one engine per mapped session.
//!
//! A session begins when a device or app window starts being mapped and ends
//! when mapping stops. Every session owns its own context and ticker; the
//! touch sink and the pointer allocator are shared, so pointer ids stay
//! unique across all sessions feeding the same touch pipeline. That includes
//! each session's left-fire id, which is reserved from the shared allocator
//! when the session opens and returned once it is closed.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use touchmap_core::PointerManager;
use tracing::info;
use uuid::Uuid;

use super::emitter::TouchSink;
use super::engine::{EngineSettings, InputToTouchEngine};
use super::observation_task::TickDriver;
use super::provider::MappingProvider;

/// Identifies one mapped session.
pub type SessionId = Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session {0} not found")]
    NotFound(SessionId),
}

/// In-memory registry of live sessions.
pub struct SessionRegistry {
    sink: Arc<dyn TouchSink>,
    pointers: Arc<PointerManager>,
    driver: TickDriver,
    sessions: Mutex<HashMap<SessionId, Arc<InputToTouchEngine>>>,
}

impl SessionRegistry {
    pub fn new(sink: Arc<dyn TouchSink>, driver: TickDriver) -> Self {
        Self {
            sink,
            pointers: Arc::new(PointerManager::new()),
            driver,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Starts mapping a new session and returns its id.
    pub fn open(&self, provider: Arc<dyn MappingProvider>, settings: EngineSettings) -> SessionId {
        let id = Uuid::new_v4();
        let device_type = settings.device_type;
        let engine = InputToTouchEngine::new(
            provider,
            Arc::clone(&self.sink),
            Arc::clone(&self.pointers),
            self.driver.clone(),
            settings,
        );
        self.sessions.lock().insert(id, Arc::new(engine));
        info!(%id, ?device_type, "session opened");
        id
    }

    pub fn get(&self, id: SessionId) -> Option<Arc<InputToTouchEngine>> {
        self.sessions.lock().get(&id).cloned()
    }

    /// Ends a session, lifting every finger it still holds.
    ///
    /// Returns the number of Up entities emitted by the final reset.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] for an unknown id.
    pub fn close(&self, id: SessionId, action_time: i64) -> Result<usize, SessionError> {
        let engine = self
            .sessions
            .lock()
            .remove(&id)
            .ok_or(SessionError::NotFound(id))?;
        let lifted = engine.reset(action_time);
        info!(%id, lifted, "session closed");
        Ok(lifted)
    }

    pub fn ids(&self) -> Vec<SessionId> {
        self.sessions.lock().keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }
}
