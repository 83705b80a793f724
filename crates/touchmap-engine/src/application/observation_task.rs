//! The keyboard-observation ticker.
//!
//! While a directional-pad mapping is active the ticker wakes every
//! `interval` (50 ms by default) and pushes the finger one step in the held
//! direction, independent of new key events.
//!
//! # Locking
//!
//! The ticker keeps its cached direction behind its own lock. Both the event
//! path and the tick path take the session context lock first and the ticker
//! lock second, so a tick always sees the context and the direction of one
//! consistent moment. [`KeyboardObservationTask::stop`] clears the cached
//! direction under those locks; a tick already waiting for the context lock
//! therefore finds nothing to do.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use touchmap_core::{
    find_diagonal, next_position, DpadKeyItem, DpadKeyType, KeyCode, MappingType, TouchAction, TouchEntity,
};
use tracing::{debug, info, trace, warn};

use super::context::InputToTouchContext;
use super::emitter::TouchEmitter;

/// Default tick period.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Shortest accepted tick period; `tokio::time::interval` rejects zero.
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Benign lifecycle misuse, reported instead of acted upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("keyboard observation task is already started")]
    AlreadyStarted,
    #[error("keyboard observation task is not started")]
    NotStarted,
}

/// What drives the ticker's clock.
#[derive(Debug, Clone)]
pub enum TickDriver {
    /// Ticks are spawned on this tokio runtime.
    Runtime(Handle),
    /// Nothing is spawned; the host calls [`KeyboardObservationTask::tick`].
    Manual,
}

impl TickDriver {
    /// The runtime of the calling thread, or [`TickDriver::Manual`] outside
    /// of one.
    pub fn current() -> Self {
        Handle::try_current()
            .map(TickDriver::Runtime)
            .unwrap_or(TickDriver::Manual)
    }
}

#[derive(Debug, Default)]
struct TaskState {
    started: bool,
    current: Option<(KeyCode, DpadKeyType)>,
    dpad_keys: Vec<DpadKeyItem>,
    timer: Option<JoinHandle<()>>,
}

/// Periodic mover for the keyboard-observation finger of one session.
pub struct KeyboardObservationTask {
    context: Weak<Mutex<InputToTouchContext>>,
    emitter: Arc<TouchEmitter>,
    interval: Duration,
    driver: TickDriver,
    state: Mutex<TaskState>,
}

impl KeyboardObservationTask {
    pub fn new(
        context: Weak<Mutex<InputToTouchContext>>,
        emitter: Arc<TouchEmitter>,
        interval: Duration,
        driver: TickDriver,
    ) -> Arc<Self> {
        let interval = if interval < MIN_TICK_INTERVAL {
            warn!(?interval, "tick interval too short, using {MIN_TICK_INTERVAL:?}");
            MIN_TICK_INTERVAL
        } else {
            interval
        };
        Arc::new(Self {
            context,
            emitter,
            interval,
            driver,
            state: Mutex::new(TaskState::default()),
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_started(&self) -> bool {
        self.state.lock().started
    }

    /// Direction the next tick will apply, if any.
    pub fn current_direction(&self) -> Option<(KeyCode, DpadKeyType)> {
        self.state.lock().current
    }

    /// Starts ticking.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::AlreadyStarted`] if the task is running; nothing
    /// changes in that case.
    pub fn start(self: &Arc<Self>) -> Result<(), TaskError> {
        let mut state = self.state.lock();
        if state.started {
            return Err(TaskError::AlreadyStarted);
        }
        state.started = true;
        if let TickDriver::Runtime(handle) = &self.driver {
            state.timer = Some(self.spawn_timer(handle));
        }
        info!(interval_ms = self.interval.as_millis() as u64, "keyboard observation task started");
        Ok(())
    }

    fn spawn_timer(self: &Arc<Self>, handle: &Handle) -> JoinHandle<()> {
        let weak = Arc::downgrade(self);
        let period = self.interval;
        handle.spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await; // The first tick resolves immediately.

            loop {
                ticker.tick().await;
                let Some(task) = weak.upgrade() else { break };
                if !task.is_started() {
                    break;
                }
                task.tick();
            }
        })
    }

    /// Replaces the direction the ticker applies.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::NotStarted`] if the task is stopped.
    pub fn update_direction(
        &self,
        key_code: KeyCode,
        key_type: DpadKeyType,
        dpad_keys: Vec<DpadKeyItem>,
    ) -> Result<(), TaskError> {
        let mut state = self.state.lock();
        if !state.started {
            return Err(TaskError::NotStarted);
        }
        trace!(key_code, ?key_type, held = dpad_keys.len(), "direction updated");
        state.current = Some((key_code, key_type));
        state.dpad_keys = dpad_keys;
        Ok(())
    }

    /// Stops ticking, cancels the pending tick and forgets the direction.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::NotStarted`] if the task is already stopped.
    pub fn stop(&self) -> Result<(), TaskError> {
        let mut state = self.state.lock();
        if !state.started {
            return Err(TaskError::NotStarted);
        }
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        *state = TaskState::default();
        info!("keyboard observation task stopped");
        Ok(())
    }

    /// Runs one tick against the session context.
    ///
    /// Returns the emitted Move, or `None` when the tick had nothing to do.
    pub fn tick(&self) -> Option<TouchEntity> {
        let context = self.context.upgrade()?;
        let mut ctx = context.lock();
        self.tick_with(&mut ctx)
    }

    /// One tick against an already locked context.
    pub(crate) fn tick_with(&self, ctx: &mut InputToTouchContext) -> Option<TouchEntity> {
        let state = self.state.lock();
        if !state.started {
            return None;
        }
        let (key_code, key_type) = state.current?;
        if state.dpad_keys.is_empty() {
            return None;
        }
        let active = ctx.observing(MappingType::KeyboardObservation)?;
        let pointer_id = active.pointer_id;
        let mapping = active.mapping.clone();
        let Some(from) = ctx.pointer_position(pointer_id) else {
            debug!(pointer_id, "tick skipped: pointer has no cached position");
            return None;
        };

        let diagonal = find_diagonal(key_code, key_type, &state.dpad_keys);
        let target = next_position(from, key_type, diagonal, &mapping, &ctx.window_info);
        drop(state);

        let action_time = ctx.clock.now();
        Some(
            self.emitter
                .emit(ctx, pointer_id, TouchAction::Move, target, action_time),
        )
    }
}

impl Drop for KeyboardObservationTask {
    fn drop(&mut self) {
        if let Some(timer) = self.state.get_mut().timer.take() {
            timer.abort();
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
