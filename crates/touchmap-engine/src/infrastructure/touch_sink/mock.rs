//! In-memory touch sink for tests.
//!
//! # Why a recording sink?
//!
//! A real touch sink hands entities to the host's injection pipeline, which:
//!
//! - Needs a running host app with a touch surface to inject into.
//! - Turns every entity into a real tap or swipe on that surface.
//! - Gives a test nothing to read back once the entity is delivered.
//!
//! [`RecordingTouchSink`] replaces the pipeline with in-memory recording.
//! Each injected entity is pushed into a `Mutex<Vec<_>>`, so assertions can
//! see exactly what the engine emitted and in what order.
//!
//! # Usage in tests
//!
//! ```ignore
//! let sink = Arc::new(RecordingTouchSink::new());
//! let engine = InputToTouchEngine::new(provider, sink.clone(), pointers, TickDriver::Manual, settings);
//!
//! engine.handle_key_event(&KeyEvent::down(KEYCODE_Q, 0))?;
//!
//! // Exactly one finger went down.
//! let emitted = sink.entities();
//! assert_eq!(emitted.len(), 1);
//! assert_eq!(emitted[0].action, TouchAction::Down);
//! ```
//!
//! # `should_fail` flag
//!
//! A sink built with [`RecordingTouchSink::failing`] rejects every entity
//! with [`SinkError::Injection`]. This exercises the emitter's failure path
//! (log, then keep the pointer cache as if delivered) without a broken
//! pipeline.

use parking_lot::Mutex;
use touchmap_core::TouchEntity;

use crate::application::emitter::{SinkError, TouchSink};

#[derive(Debug, Default)]
pub struct RecordingTouchSink {
    entities: Mutex<Vec<TouchEntity>>,
    /// When `true`, every injection fails and nothing is recorded.
    pub should_fail: bool,
}

impl RecordingTouchSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Snapshot of everything recorded so far.
    pub fn entities(&self) -> Vec<TouchEntity> {
        self.entities.lock().clone()
    }

    /// Drains the recorded entities.
    pub fn take(&self) -> Vec<TouchEntity> {
        std::mem::take(&mut *self.entities.lock())
    }
}

impl TouchSink for RecordingTouchSink {
    fn inject(&self, entity: &TouchEntity) -> Result<(), SinkError> {
        if self.should_fail {
            return Err(SinkError::Injection("mock failure".into()));
        }
        self.entities.lock().push(*entity);
        Ok(())
    }
}
