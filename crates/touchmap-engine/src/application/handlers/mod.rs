//! Mode handlers.
//!
//! Each input mode is a small state machine that consumes the session
//! context, one event and the resolved mapping. All of them implement
//! [`InputToTouchHandler`]; the engine picks one through the closed
//! [`TouchMode`] sum type.
//!
//! Handlers are stateless: everything they remember lives in the
//! [`InputToTouchContext`] passed in, which the caller keeps locked for the
//! duration of the call.
//!
//! A handler that decides not to act returns a [`Discard`] describing why.
//! Discards are never fatal and leave the context unchanged.

use std::sync::Arc;

use thiserror::Error;
use touchmap_core::{
    KeyCode, KeyEvent, KeyToTouchMappingInfo, MappingError, MappingType, PointerEvent, PointerId,
    PointerManager, TouchAction,
};

use super::context::InputToTouchContext;
use super::emitter::TouchEmitter;
use super::observation_task::{KeyboardObservationTask, TaskError};

pub mod combination_key;
pub mod keyboard_observation;
pub mod mouse_left_fire;
pub mod mouse_right_click;
pub mod observation_key;
pub mod single_key;

pub use combination_key::CombinationKeyHandler;
pub use keyboard_observation::KeyboardObservationHandler;
pub use mouse_left_fire::MouseLeftFireHandler;
pub use mouse_right_click::MouseRightClickHandler;
pub use observation_key::ObservationKeyHandler;
pub use single_key::SingleKeyHandler;

/// Result of one handler call. `Err` is informational only.
pub type HandleResult = Result<(), Discard>;

/// The six translation strategies the engine implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchMode {
    SingleKey,
    CombinationKey,
    ObservationKey,
    KeyboardObservation,
    MouseLeftFire,
    MouseRightClick,
}

impl TouchMode {
    /// Mode that handles `mapping_type`. The walking variant of right click is
    /// handled by the right-click mode; skill keys have no handler.
    pub fn from_mapping_type(mapping_type: MappingType) -> Option<Self> {
        match mapping_type {
            MappingType::SingleKey => Some(TouchMode::SingleKey),
            MappingType::CombinationKey => Some(TouchMode::CombinationKey),
            MappingType::ObservationKey => Some(TouchMode::ObservationKey),
            MappingType::KeyboardObservation => Some(TouchMode::KeyboardObservation),
            MappingType::MouseLeftFire => Some(TouchMode::MouseLeftFire),
            MappingType::MouseRightClick | MappingType::MouseRightWalking => {
                Some(TouchMode::MouseRightClick)
            }
            MappingType::SkillKey => None,
        }
    }
}

/// Why an event produced no touch entity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Discard {
    #[error("key {0} has no mapping")]
    Unmapped(KeyCode),
    #[error("no {0:?} mapping is configured")]
    UnmappedMode(MappingType),
    #[error("mouse button {0} has no mapping")]
    UnmappedButton(i32),
    #[error("mapping type {0:?} has no handler")]
    Unsupported(MappingType),
    #[error("{mode:?} is blocked while {active:?} is operating")]
    BlockedBy { mode: TouchMode, active: TouchMode },
    #[error("{0:?} is already active")]
    AlreadyActive(TouchMode),
    #[error("{0:?} is not active")]
    NotActive(TouchMode),
    #[error("key {actual} does not drive the {mode:?} gesture (expected {expected})")]
    KeyMismatch {
        mode: TouchMode,
        expected: KeyCode,
        actual: KeyCode,
    },
    #[error("pointer {0} has no cached position")]
    MissingPointer(PointerId),
    #[error(transparent)]
    InvalidMapping(#[from] MappingError),
    #[error("key {0} is not a directional key of the active mapping")]
    UnknownDirection(KeyCode),
    #[error("no directional key is held")]
    NoHeldDirection,
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error("crosshair is not ready")]
    NotReady,
    #[error("pointer event carries no motion")]
    NoMotion,
    #[error("{mode:?} does not handle {event} events")]
    UnsupportedEvent { mode: TouchMode, event: &'static str },
}

/// Collaborators every handler emits through.
#[derive(Clone)]
pub struct TouchServices {
    pub emitter: Arc<TouchEmitter>,
    pub pointers: Arc<PointerManager>,
    pub observation_task: Arc<KeyboardObservationTask>,
    /// Pointer id the session reserved for mouse-left-fire. It stays
    /// allocated for the whole session.
    pub fire_pointer_id: PointerId,
}

/// One input mode.
pub trait InputToTouchHandler: Send + Sync {
    fn mode(&self) -> TouchMode;

    fn handle_key_down(
        &self,
        _ctx: &mut InputToTouchContext,
        _services: &TouchServices,
        _event: &KeyEvent,
        _mapping: &KeyToTouchMappingInfo,
    ) -> HandleResult {
        Err(Discard::UnsupportedEvent {
            mode: self.mode(),
            event: "key down",
        })
    }

    fn handle_key_up(
        &self,
        _ctx: &mut InputToTouchContext,
        _services: &TouchServices,
        _event: &KeyEvent,
        _mapping: &KeyToTouchMappingInfo,
    ) -> HandleResult {
        Err(Discard::UnsupportedEvent {
            mode: self.mode(),
            event: "key up",
        })
    }

    fn handle_pointer_event(
        &self,
        _ctx: &mut InputToTouchContext,
        _services: &TouchServices,
        _event: &PointerEvent,
    ) -> HandleResult {
        Err(Discard::UnsupportedEvent {
            mode: self.mode(),
            event: "pointer",
        })
    }
}

/// One handler per [`TouchMode`].
#[derive(Default)]
pub struct HandlerSet {
    single_key: SingleKeyHandler,
    combination_key: CombinationKeyHandler,
    observation_key: ObservationKeyHandler,
    keyboard_observation: KeyboardObservationHandler,
    mouse_left_fire: MouseLeftFireHandler,
    mouse_right_click: MouseRightClickHandler,
}

impl HandlerSet {
    pub fn get(&self, mode: TouchMode) -> &dyn InputToTouchHandler {
        match mode {
            TouchMode::SingleKey => &self.single_key,
            TouchMode::CombinationKey => &self.combination_key,
            TouchMode::ObservationKey => &self.observation_key,
            TouchMode::KeyboardObservation => &self.keyboard_observation,
            TouchMode::MouseLeftFire => &self.mouse_left_fire,
            TouchMode::MouseRightClick => &self.mouse_right_click,
        }
    }
}

/// Emits Up at the pointer's cached position, drops the cache entry and
/// returns the id to the allocator. The session's fire id is kept.
///
/// Discards without touching anything when the pointer has no cached
/// position.
pub(crate) fn lift_pointer(
    ctx: &mut InputToTouchContext,
    services: &TouchServices,
    pointer_id: PointerId,
    action_time: i64,
) -> HandleResult {
    let point = ctx
        .pointer_position(pointer_id)
        .ok_or(Discard::MissingPointer(pointer_id))?;
    services
        .emitter
        .emit(ctx, pointer_id, TouchAction::Up, point, action_time);
    ctx.pointer_items.remove(&pointer_id);
    if pointer_id != services.fire_pointer_id {
        services.pointers.release_pointer_id(pointer_id);
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Shared fixtures for handler unit tests.

    use std::sync::Arc;

    use touchmap_core::{PointerManager, TouchEntity, WindowInfo};

    use super::TouchServices;
    use crate::application::context::{InputToTouchContext, SharedContext};
    use crate::application::emitter::{TouchEmitter, TouchSink};
    use crate::application::observation_task::{KeyboardObservationTask, TickDriver};
    use crate::infrastructure::touch_sink::RecordingTouchSink;

    pub(crate) struct Fixture {
        pub context: SharedContext,
        pub services: TouchServices,
        pub sink: Arc<RecordingTouchSink>,
    }

    impl Fixture {
        pub fn new() -> Self {
            Self::with_window(WindowInfo::default())
        }

        pub fn with_window(window: WindowInfo) -> Self {
            let sink = Arc::new(RecordingTouchSink::new());
            let emitter = Arc::new(TouchEmitter::new(Arc::clone(&sink) as Arc<dyn TouchSink>));
            let context = InputToTouchContext::shared(window);
            let pointers = Arc::new(PointerManager::new());
            let fire_pointer_id = pointers.apply_pointer_id();
            let observation_task = KeyboardObservationTask::new(
                Arc::downgrade(&context),
                Arc::clone(&emitter),
                std::time::Duration::from_millis(50),
                TickDriver::Manual,
            );
            Self {
                context,
                services: TouchServices {
                    emitter,
                    pointers,
                    observation_task,
                    fire_pointer_id,
                },
                sink,
            }
        }

        pub fn entities(&self) -> Vec<TouchEntity> {
            self.sink.entities()
        }
    }
}
