//! InputToTouchEngine: the dispatcher of one mapped session.
//!
//! For every incoming event the engine resolves the mapping from the
//! [`MappingProvider`], locks the session context, and hands the event to the
//! handler of the mapping's mode. The context lock is held for the whole
//! handler call so the ticker never observes a half-applied event.
//!
//! Every outcome is informational: a discarded event is logged at `debug`
//! and returned, never escalated.

use std::sync::Arc;
use std::time::Duration;

use touchmap_core::{
    DeviceType, InputEvent, KeyAction, KeyEvent, KeyToTouchMappingInfo, MappingType, MouseButton,
    PointerEvent, PointerEventAction, PointerId, PointerManager, TouchAction, TouchEntity, WindowInfo,
};
use tracing::{debug, info, trace};

use super::context::{InputToTouchContext, SharedContext};
use super::emitter::{TouchEmitter, TouchSink};
use super::handlers::{Discard, HandleResult, HandlerSet, TouchMode, TouchServices};
use super::observation_task::{KeyboardObservationTask, TickDriver, DEFAULT_TICK_INTERVAL};
use super::provider::MappingProvider;

/// Per-session settings fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Device class used to look up key mappings.
    pub device_type: DeviceType,
    pub tick_interval: Duration,
    pub window_info: WindowInfo,
    /// Initial crosshair readiness; see [`InputToTouchEngine::set_crosshair_ready`].
    pub crosshair_ready: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            device_type: DeviceType::Keyboard,
            tick_interval: DEFAULT_TICK_INTERVAL,
            window_info: WindowInfo::default(),
            crosshair_ready: false,
        }
    }
}

/// The input-to-touch engine of one session.
pub struct InputToTouchEngine {
    device_type: DeviceType,
    provider: Arc<dyn MappingProvider>,
    context: SharedContext,
    services: TouchServices,
    handlers: HandlerSet,
}

impl InputToTouchEngine {
    /// Creates an engine with a fresh context.
    ///
    /// `pointers` may be shared between sessions; ids are unique across all
    /// engines that share it.
    pub fn new(
        provider: Arc<dyn MappingProvider>,
        sink: Arc<dyn TouchSink>,
        pointers: Arc<PointerManager>,
        driver: TickDriver,
        settings: EngineSettings,
    ) -> Self {
        let context = InputToTouchContext::shared(settings.window_info);
        context.lock().is_enter_crosshair_info = settings.crosshair_ready;
        let emitter = Arc::new(TouchEmitter::new(sink));
        let fire_pointer_id = pointers.apply_pointer_id();
        let observation_task = KeyboardObservationTask::new(
            Arc::downgrade(&context),
            Arc::clone(&emitter),
            settings.tick_interval,
            driver,
        );
        Self {
            device_type: settings.device_type,
            provider,
            context,
            services: TouchServices {
                emitter,
                pointers,
                observation_task,
                fire_pointer_id,
            },
            handlers: HandlerSet::default(),
        }
    }

    pub fn device_type(&self) -> DeviceType {
        self.device_type
    }

    pub fn context(&self) -> &SharedContext {
        &self.context
    }

    /// Pointer id this session uses for mouse-left-fire.
    pub fn fire_pointer_id(&self) -> PointerId {
        self.services.fire_pointer_id
    }

    pub fn observation_task(&self) -> &Arc<KeyboardObservationTask> {
        &self.services.observation_task
    }

    pub fn handle_event(&self, event: &InputEvent) -> HandleResult {
        match event {
            InputEvent::Key(key) => self.handle_key_event(key),
            InputEvent::Pointer(pointer) => self.handle_pointer_event(pointer),
        }
    }

    /// Handles a key press or release.
    ///
    /// The pressed-key state is updated even when the key is unmapped, so
    /// directional lookups always see the real keyboard state. When several
    /// records are bound to the key, the held keys decide which one runs.
    pub fn handle_key_event(&self, event: &KeyEvent) -> HandleResult {
        let candidates = self.provider.mappings_for_key(self.device_type, event.key_code);
        let mut ctx = self.context.lock();
        let event = KeyEvent {
            action_time: ctx.clock.observe(event.action_time),
            ..*event
        };
        match event.action {
            KeyAction::Down => ctx.press_key(event.key_code),
            KeyAction::Up => ctx.release_key(event.key_code),
        }
        let result = select_mapping(&ctx, &event, candidates)
            .ok_or(Discard::Unmapped(event.key_code))
            .and_then(|mapping| self.dispatch_key(&mut ctx, &event, &mapping));
        log_outcome("key", &result);
        result
    }

    /// Handles a mouse button or motion event.
    ///
    /// Buttons are looked up by mode: left fires, right clicks (or walks when
    /// only a walking mapping exists). Motion drives observation aiming only.
    pub fn handle_pointer_event(&self, event: &PointerEvent) -> HandleResult {
        let result = match event.action {
            PointerEventAction::Move => self.handle_motion(event),
            PointerEventAction::ButtonDown | PointerEventAction::ButtonUp => self.handle_button(event),
        };
        log_outcome("pointer", &result);
        result
    }

    fn handle_motion(&self, event: &PointerEvent) -> HandleResult {
        let mut ctx = self.context.lock();
        let event = PointerEvent {
            action_time: ctx.clock.observe(event.action_time),
            ..*event
        };
        if ctx.observing(MappingType::ObservationKey).is_none() {
            return Err(Discard::NotActive(TouchMode::ObservationKey));
        }
        self.handlers
            .get(TouchMode::ObservationKey)
            .handle_pointer_event(&mut ctx, &self.services, &event)
    }

    fn handle_button(&self, event: &PointerEvent) -> HandleResult {
        let mapping = match event.button() {
            MouseButton::Left => self.mapping_for_mode(MappingType::MouseLeftFire),
            MouseButton::Right => self
                .mapping_for_mode(MappingType::MouseRightClick)
                .or_else(|_| self.mapping_for_mode(MappingType::MouseRightWalking)),
            MouseButton::Middle | MouseButton::Other(_) => Err(Discard::UnmappedButton(event.button_id)),
        }?;
        let mut ctx = self.context.lock();
        let key_event = KeyEvent {
            key_code: event.button_id,
            action: match event.action {
                PointerEventAction::ButtonUp => KeyAction::Up,
                _ => KeyAction::Down,
            },
            action_time: ctx.clock.observe(event.action_time),
        };
        self.dispatch_key(&mut ctx, &key_event, &mapping)
    }

    fn mapping_for_mode(&self, mode: MappingType) -> Result<KeyToTouchMappingInfo, Discard> {
        self.provider
            .mapping_for_mode(DeviceType::Mouse, mode)
            .ok_or(Discard::UnmappedMode(mode))
    }

    fn dispatch_key(
        &self,
        ctx: &mut InputToTouchContext,
        event: &KeyEvent,
        mapping: &KeyToTouchMappingInfo,
    ) -> HandleResult {
        let mode = TouchMode::from_mapping_type(mapping.mapping_type)
            .ok_or(Discard::Unsupported(mapping.mapping_type))?;
        let handler = self.handlers.get(mode);
        match event.action {
            KeyAction::Down => handler.handle_key_down(ctx, &self.services, event, mapping),
            KeyAction::Up => handler.handle_key_up(ctx, &self.services, event, mapping),
        }
    }

    /// Updates the clamping bounds for subsequent emissions.
    pub fn set_window_info(&self, window_info: WindowInfo) {
        self.context.lock().window_info = window_info;
        debug!(?window_info, "window bounds updated");
    }

    /// Records whether the crosshair collaborator reports the session ready
    /// for mouse-left-fire.
    pub fn set_crosshair_ready(&self, ready: bool) {
        self.context.lock().is_enter_crosshair_info = ready;
        debug!(ready, "crosshair readiness updated");
    }

    /// Lifts every live finger, stops the ticker and clears every mode.
    ///
    /// Returns the number of Up entities emitted.
    pub fn reset(&self, action_time: i64) -> usize {
        let mut ctx = self.context.lock();
        let action_time = ctx.clock.observe(action_time);
        if let Err(e) = self.services.observation_task.stop() {
            trace!("{e}");
        }
        let live = ctx.live_pointers();
        for &(pointer_id, point) in &live {
            self.services
                .emitter
                .emit(&mut ctx, pointer_id, TouchAction::Up, point, action_time);
            if pointer_id != self.services.fire_pointer_id {
                self.services.pointers.release_pointer_id(pointer_id);
            }
        }
        ctx.clear_modes();
        info!(lifted = live.len(), "session reset");
        live.len()
    }

    /// Runs one keyboard-observation tick. Only needed with
    /// [`TickDriver::Manual`].
    pub fn tick(&self) -> Option<TouchEntity> {
        self.services.observation_task.tick()
    }
}

impl Drop for InputToTouchEngine {
    fn drop(&mut self) {
        self.services
            .pointers
            .release_pointer_id(self.services.fire_pointer_id);
    }
}

/// Picks the record `event` drives among the provider's candidates.
///
/// A combination claims only its trigger key: on a press while its modifier
/// is held, on a release while it is the latched combination. Otherwise the
/// next candidate is considered, so `R` and `Shift+R` can both be bound.
fn select_mapping(
    ctx: &InputToTouchContext,
    event: &KeyEvent,
    candidates: Vec<KeyToTouchMappingInfo>,
) -> Option<KeyToTouchMappingInfo> {
    candidates
        .into_iter()
        .find(|mapping| mapping.mapping_type != MappingType::CombinationKey || combination_claims(ctx, event, mapping))
}

fn combination_claims(ctx: &InputToTouchContext, event: &KeyEvent, mapping: &KeyToTouchMappingInfo) -> bool {
    if mapping.combination_trigger() != Ok(event.key_code) {
        return false;
    }
    match event.action {
        KeyAction::Down => mapping
            .combination_keys
            .first()
            .is_some_and(|&modifier| ctx.is_key_pressed(modifier)),
        KeyAction::Up => ctx
            .current_combination_key
            .as_ref()
            .is_some_and(|active| active.mapping == *mapping),
    }
}

fn log_outcome(kind: &str, result: &HandleResult) {
    match result {
        Ok(()) => trace!(kind, "event handled"),
        Err(reason) => debug!(kind, %reason, "event discarded"),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
