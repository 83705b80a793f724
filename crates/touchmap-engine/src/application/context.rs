//! Per-session state of the input-to-touch engine.
//!
//! One [`InputToTouchContext`] exists per mapped session. It records which
//! modes are active, which mapping drives each active mode, where every live
//! virtual finger currently is, and the window bounds used for clamping.
//!
//! # Locking
//!
//! The context is shared between the input path and the keyboard-observation
//! ticker as a [`SharedContext`]. Both paths hold the lock for the whole of
//! one event or one tick, so check-then-act sequences never interleave.
//!
//! # Timeline
//!
//! Input events arrive stamped by the input source. Ticks have no event of
//! their own, so the [`SessionClock`] stamps them relative to the last event
//! and every entity of the session lands on one non-decreasing timeline.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::time::Instant;
use touchmap_core::{
    DpadKeyCodeEntity, DpadKeyItem, KeyCode, KeyToTouchMappingInfo, MappingType, PointerId,
    TouchPoint, WindowInfo,
};

/// The context as shared between the input path and the ticker.
pub type SharedContext = Arc<Mutex<InputToTouchContext>>;

/// A mapping currently driving a virtual finger.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveMapping {
    pub mapping: KeyToTouchMappingInfo,
    pub pointer_id: PointerId,
}

/// Session timeline in the input source's microseconds.
#[derive(Debug, Default, Clone, Copy)]
pub struct SessionClock {
    /// Last event time and the moment it was observed.
    anchor: Option<(i64, Instant)>,
    last: i64,
}

impl SessionClock {
    /// Records an input event's time and returns its stamp. A time older
    /// than the last stamp is raised to it.
    pub fn observe(&mut self, action_time: i64) -> i64 {
        self.anchor = Some((action_time, Instant::now()));
        self.last = self.last.max(action_time);
        self.last
    }

    /// Stamp for an emission with no event behind it: the last event's time
    /// plus the time elapsed since it was observed.
    pub fn now(&mut self) -> i64 {
        if let Some((time, observed_at)) = self.anchor {
            let elapsed = i64::try_from(observed_at.elapsed().as_micros()).unwrap_or(i64::MAX);
            self.last = self.last.max(time.saturating_add(elapsed));
        }
        self.last
    }
}

/// Mutable state of one mapped session.
#[derive(Debug, Default)]
pub struct InputToTouchContext {
    pub is_single_key_operating: bool,
    pub is_combination_key_operating: bool,
    /// Shared by observation and keyboard observation; the slot's mapping
    /// type tells the two apart.
    pub is_perspective_observing: bool,
    pub is_mouse_left_fire_operating: bool,
    pub is_mouse_right_click_operating: bool,
    /// Set by the crosshair collaborator; gates mouse-left-fire.
    pub is_enter_crosshair_info: bool,
    /// Every single key currently held, each with its own finger.
    pub current_single_key_map: HashMap<KeyCode, ActiveMapping>,
    pub current_combination_key: Option<ActiveMapping>,
    pub current_perspective_observing: Option<ActiveMapping>,
    pub current_mouse_left_fire: Option<ActiveMapping>,
    /// Kept for the walking variant, whose extra parameters are read by
    /// collaborators.
    pub current_mouse_right_click: Option<ActiveMapping>,
    /// Last emitted position of every live pointer.
    pub pointer_items: HashMap<PointerId, TouchPoint>,
    pub window_info: WindowInfo,
    /// Stamps tick emissions; see [`SessionClock`].
    pub clock: SessionClock,
    /// Keys currently held, in press order.
    pressed_keys: Vec<KeyCode>,
}

impl InputToTouchContext {
    pub fn new(window_info: WindowInfo) -> Self {
        Self {
            window_info,
            ..Self::default()
        }
    }

    /// Wraps a fresh context for sharing with the ticker.
    pub fn shared(window_info: WindowInfo) -> SharedContext {
        Arc::new(Mutex::new(Self::new(window_info)))
    }

    /// Records `key_code` as held. Repeats of a held key keep its original
    /// press position.
    pub fn press_key(&mut self, key_code: KeyCode) {
        if !self.pressed_keys.contains(&key_code) {
            self.pressed_keys.push(key_code);
        }
    }

    pub fn release_key(&mut self, key_code: KeyCode) {
        self.pressed_keys.retain(|&k| k != key_code);
    }

    pub fn pressed_keys(&self) -> &[KeyCode] {
        &self.pressed_keys
    }

    pub fn is_key_pressed(&self, key_code: KeyCode) -> bool {
        self.pressed_keys.contains(&key_code)
    }

    /// Held keys bound to a direction of `dpad`, in press order.
    pub fn held_dpad_keys(&self, dpad: &DpadKeyCodeEntity) -> Vec<DpadKeyItem> {
        self.pressed_keys
            .iter()
            .map(|&key_code| DpadKeyItem {
                key_code,
                key_type: dpad.classify(key_code),
            })
            .filter(|item| dpad.contains(item.key_code))
            .collect()
    }

    pub fn pointer_position(&self, pointer_id: PointerId) -> Option<TouchPoint> {
        self.pointer_items.get(&pointer_id).copied()
    }

    /// The observing slot, if it holds a mapping of `mapping_type`.
    pub fn observing(&self, mapping_type: MappingType) -> Option<&ActiveMapping> {
        if !self.is_perspective_observing {
            return None;
        }
        self.current_perspective_observing
            .as_ref()
            .filter(|active| active.mapping.mapping_type == mapping_type)
    }

    /// Live pointers ordered by id.
    pub fn live_pointers(&self) -> Vec<(PointerId, TouchPoint)> {
        let mut live: Vec<_> = self.pointer_items.iter().map(|(&id, &p)| (id, p)).collect();
        live.sort_unstable_by_key(|&(id, _)| id);
        live
    }

    /// Returns `true` if no mode is active and no pointer is live.
    pub fn is_idle(&self) -> bool {
        !self.is_single_key_operating
            && !self.is_combination_key_operating
            && !self.is_perspective_observing
            && !self.is_mouse_left_fire_operating
            && !self.is_mouse_right_click_operating
            && self.pointer_items.is_empty()
    }

    /// Clears every mode, slot, pointer and held key. Window bounds, the
    /// crosshair readiness flag and the clock survive.
    pub fn clear_modes(&mut self) {
        *self = Self {
            window_info: self.window_info,
            is_enter_crosshair_info: self.is_enter_crosshair_info,
            clock: self.clock,
            ..Self::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use touchmap_core::keymap::{KEYCODE_A, KEYCODE_D, KEYCODE_S, KEYCODE_SPACE, KEYCODE_W};
    use touchmap_core::DpadKeyType;

    fn wasd() -> DpadKeyCodeEntity {
        DpadKeyCodeEntity {
            up: KEYCODE_W,
            down: KEYCODE_S,
            left: KEYCODE_A,
            right: KEYCODE_D,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_stamps_ticks_after_the_last_event() {
        // Arrange
        let mut clock = SessionClock::default();
        clock.observe(1_000);

        // Act
        tokio::time::advance(std::time::Duration::from_millis(50)).await;
        let tick = clock.now();

        // Assert
        assert_eq!(tick, 51_000);
        assert_eq!(clock.observe(40_000), 51_000);
    }

    #[test]
    fn test_clock_without_events_stays_at_zero() {
        let mut clock = SessionClock::default();
        assert_eq!(clock.now(), 0);
    }

    #[test]
    fn test_pressed_keys_keep_press_order_and_ignore_repeats() {
        let mut ctx = InputToTouchContext::default();
        ctx.press_key(KEYCODE_W);
        ctx.press_key(KEYCODE_A);
        ctx.press_key(KEYCODE_W);

        assert_eq!(ctx.pressed_keys(), &[KEYCODE_W, KEYCODE_A]);

        ctx.release_key(KEYCODE_W);
        assert_eq!(ctx.pressed_keys(), &[KEYCODE_A]);
    }

    #[test]
    fn test_held_dpad_keys_skips_non_directional_keys() {
        let mut ctx = InputToTouchContext::default();
        ctx.press_key(KEYCODE_SPACE);
        ctx.press_key(KEYCODE_D);
        ctx.press_key(KEYCODE_W);

        let held = ctx.held_dpad_keys(&wasd());

        assert_eq!(
            held,
            vec![
                DpadKeyItem { key_code: KEYCODE_D, key_type: DpadKeyType::Right },
                DpadKeyItem { key_code: KEYCODE_W, key_type: DpadKeyType::Up },
            ]
        );
    }

    #[test]
    fn test_observing_filters_by_mapping_type() {
        let mut ctx = InputToTouchContext::default();
        ctx.is_perspective_observing = true;
        ctx.current_perspective_observing = Some(ActiveMapping {
            mapping: KeyToTouchMappingInfo::observation_key(KEYCODE_SPACE, 1, 2, 1, 1),
            pointer_id: 3,
        });

        assert!(ctx.observing(MappingType::ObservationKey).is_some());
        assert!(ctx.observing(MappingType::KeyboardObservation).is_none());
    }

    #[test]
    fn test_clear_modes_keeps_session_settings() {
        let mut ctx = InputToTouchContext::new(WindowInfo::new(800, 600));
        ctx.is_enter_crosshair_info = true;
        ctx.is_single_key_operating = true;
        ctx.pointer_items.insert(1, TouchPoint::new(5, 5));
        ctx.press_key(KEYCODE_W);

        ctx.clear_modes();

        assert!(ctx.is_idle());
        assert!(ctx.pressed_keys().is_empty());
        assert!(ctx.is_enter_crosshair_info);
        assert_eq!(ctx.window_info, WindowInfo::new(800, 600));
    }
}
