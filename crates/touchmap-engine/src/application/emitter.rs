//! Touch-entity construction and delivery.
//!
//! Every handler and the ticker emit through one [`TouchEmitter`]. Emitting a
//! Down or Move also records the new position in the context's pointer cache;
//! after an Up the caller removes the cache entry itself.

use std::sync::Arc;

use thiserror::Error;
use touchmap_core::{KeyToTouchMappingInfo, PointerId, TouchAction, TouchEntity, TouchPoint};
use tracing::{error, trace};

use super::context::InputToTouchContext;

/// Error type for touch injection.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("touch sink is closed")]
    Closed,
    #[error("touch injection failed: {0}")]
    Injection(String),
}

/// The host's touch-injection pipeline.
///
/// Implementations are called with the session lock held and must not call
/// back into the engine.
pub trait TouchSink: Send + Sync {
    fn inject(&self, entity: &TouchEntity) -> Result<(), SinkError>;
}

/// Builds touch entities and forwards them to the [`TouchSink`].
pub struct TouchEmitter {
    sink: Arc<dyn TouchSink>,
}

impl TouchEmitter {
    pub fn new(sink: Arc<dyn TouchSink>) -> Self {
        Self { sink }
    }

    /// Emits one touch entity for `pointer_id` at `point`.
    ///
    /// Sink failures are logged and otherwise ignored: the context is updated
    /// as if the entity had been delivered, so a later Up still releases the
    /// pointer.
    pub fn emit(
        &self,
        ctx: &mut InputToTouchContext,
        pointer_id: PointerId,
        action: TouchAction,
        point: TouchPoint,
        action_time: i64,
    ) -> TouchEntity {
        let entity = TouchEntity::new(pointer_id, action, point, action_time);
        trace!(?entity, "emitting touch entity");
        if let Err(e) = self.sink.inject(&entity) {
            error!(pointer_id, ?action, "touch injection failed: {e}");
        }
        if matches!(action, TouchAction::Down | TouchAction::Move) {
            ctx.pointer_items.insert(pointer_id, point);
        }
        entity
    }

    /// Emits a Down at the mapping's target, clamped to the window.
    pub fn emit_down(
        &self,
        ctx: &mut InputToTouchContext,
        pointer_id: PointerId,
        mapping: &KeyToTouchMappingInfo,
        action_time: i64,
    ) -> TouchEntity {
        let point = ctx
            .window_info
            .clamp(TouchPoint::new(mapping.x_value, mapping.y_value));
        self.emit(ctx, pointer_id, TouchAction::Down, point, action_time)
    }
}
