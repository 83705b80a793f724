//! Observation mode: press and hold a key, then aim with the mouse.
//!
//! While the key is held every mouse motion drags the finger by the raw delta
//! scaled by the mapping's step. Shares the observing slot with keyboard
//! observation.

use touchmap_core::{KeyEvent, KeyToTouchMappingInfo, MappingType, PointerEvent, TouchAction, TouchPoint};
use tracing::{debug, warn};

use super::{lift_pointer, Discard, HandleResult, InputToTouchHandler, TouchMode, TouchServices};
use crate::application::context::{ActiveMapping, InputToTouchContext};

#[derive(Debug, Default, Clone, Copy)]
pub struct ObservationKeyHandler;

/// A zero step would pin the finger; treat it as unscaled.
fn effective_step(step: i32) -> i32 {
    if step == 0 {
        1
    } else {
        step
    }
}

impl InputToTouchHandler for ObservationKeyHandler {
    fn mode(&self) -> TouchMode {
        TouchMode::ObservationKey
    }

    fn handle_key_down(
        &self,
        ctx: &mut InputToTouchContext,
        services: &TouchServices,
        event: &KeyEvent,
        mapping: &KeyToTouchMappingInfo,
    ) -> HandleResult {
        if ctx.is_perspective_observing {
            if let Some(active) = &ctx.current_perspective_observing {
                if active.mapping.key_code != event.key_code {
                    warn!(
                        key_code = event.key_code,
                        active_key_code = active.mapping.key_code,
                        "observation key pressed while another observation is active"
                    );
                }
            }
            return Err(Discard::AlreadyActive(TouchMode::ObservationKey));
        }

        let pointer_id = services.pointers.apply_pointer_id();
        ctx.is_perspective_observing = true;
        ctx.current_perspective_observing = Some(ActiveMapping {
            mapping: mapping.clone(),
            pointer_id,
        });
        services
            .emitter
            .emit_down(ctx, pointer_id, mapping, event.action_time);
        debug!(key_code = event.key_code, pointer_id, "observation started");
        Ok(())
    }

    fn handle_key_up(
        &self,
        ctx: &mut InputToTouchContext,
        services: &TouchServices,
        event: &KeyEvent,
        _mapping: &KeyToTouchMappingInfo,
    ) -> HandleResult {
        let active = ctx
            .observing(MappingType::ObservationKey)
            .ok_or(Discard::NotActive(TouchMode::ObservationKey))?;
        if active.mapping.key_code != event.key_code {
            return Err(Discard::KeyMismatch {
                mode: TouchMode::ObservationKey,
                expected: active.mapping.key_code,
                actual: event.key_code,
            });
        }
        let pointer_id = active.pointer_id;

        lift_pointer(ctx, services, pointer_id, event.action_time)?;
        ctx.is_perspective_observing = false;
        ctx.current_perspective_observing = None;
        debug!(key_code = event.key_code, pointer_id, "observation ended");
        Ok(())
    }

    fn handle_pointer_event(
        &self,
        ctx: &mut InputToTouchContext,
        services: &TouchServices,
        event: &PointerEvent,
    ) -> HandleResult {
        let active = ctx
            .observing(MappingType::ObservationKey)
            .ok_or(Discard::NotActive(TouchMode::ObservationKey))?;
        if event.raw_dx == 0 && event.raw_dy == 0 {
            return Err(Discard::NoMotion);
        }
        let pointer_id = active.pointer_id;
        let x_step = effective_step(active.mapping.x_step);
        let y_step = effective_step(active.mapping.y_step);
        let last = ctx
            .pointer_position(pointer_id)
            .ok_or(Discard::MissingPointer(pointer_id))?;

        let target = ctx.window_info.clamp(TouchPoint::new(
            last.x.saturating_add(event.raw_dx.saturating_mul(x_step)),
            last.y.saturating_add(event.raw_dy.saturating_mul(y_step)),
        ));
        services
            .emitter
            .emit(ctx, pointer_id, TouchAction::Move, target, event.action_time);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Fixture;
    use touchmap_core::{DpadKeyCodeEntity, WindowInfo};

    const KEY: i32 = 2050;

    #[test]
    fn test_mouse_motion_drags_the_finger_by_scaled_delta() {
        // Arrange
        let fx = Fixture::with_window(WindowInfo::new(1000, 1000));
        let mapping = KeyToTouchMappingInfo::observation_key(KEY, 500, 500, 2, 3);
        let mut ctx = fx.context.lock();
        ObservationKeyHandler
            .handle_key_down(&mut ctx, &fx.services, &KeyEvent::down(KEY, 1), &mapping)
            .unwrap();

        // Act
        ObservationKeyHandler
            .handle_pointer_event(&mut ctx, &fx.services, &PointerEvent::motion(10, -5, 2))
            .unwrap();

        // Assert
        let moved = fx.entities()[1];
        assert_eq!(moved.action, TouchAction::Move);
        assert_eq!(moved.point(), TouchPoint::new(520, 485));
    }

    #[test]
    fn test_motion_is_clamped_to_the_window() {
        let fx = Fixture::with_window(WindowInfo::new(600, 400));
        let mapping = KeyToTouchMappingInfo::observation_key(KEY, 590, 10, 0, 0);
        let mut ctx = fx.context.lock();
        ObservationKeyHandler
            .handle_key_down(&mut ctx, &fx.services, &KeyEvent::down(KEY, 1), &mapping)
            .unwrap();

        ObservationKeyHandler
            .handle_pointer_event(&mut ctx, &fx.services, &PointerEvent::motion(50, -50, 2))
            .unwrap();

        assert_eq!(fx.entities()[1].point(), TouchPoint::new(600, 0));
    }

    #[test]
    fn test_second_key_while_observing_is_discarded() {
        let fx = Fixture::new();
        let mapping = KeyToTouchMappingInfo::observation_key(KEY, 5, 5, 1, 1);
        let other = KeyToTouchMappingInfo::observation_key(KEY + 1, 9, 9, 1, 1);
        let mut ctx = fx.context.lock();
        ObservationKeyHandler
            .handle_key_down(&mut ctx, &fx.services, &KeyEvent::down(KEY, 1), &mapping)
            .unwrap();

        let result = ObservationKeyHandler.handle_key_down(&mut ctx, &fx.services, &KeyEvent::down(KEY + 1, 2), &other);

        assert_eq!(result, Err(Discard::AlreadyActive(TouchMode::ObservationKey)));
        assert_eq!(ctx.pointer_items.len(), 1);
        assert_eq!(ctx.current_perspective_observing.as_ref().map(|a| a.mapping.key_code), Some(KEY));
    }

    #[test]
    fn test_up_of_a_different_key_keeps_observing() {
        let fx = Fixture::new();
        let mapping = KeyToTouchMappingInfo::observation_key(KEY, 5, 5, 1, 1);
        let mut ctx = fx.context.lock();
        ObservationKeyHandler
            .handle_key_down(&mut ctx, &fx.services, &KeyEvent::down(KEY, 1), &mapping)
            .unwrap();

        let result = ObservationKeyHandler.handle_key_up(&mut ctx, &fx.services, &KeyEvent::up(KEY + 1, 2), &mapping);

        assert!(matches!(result, Err(Discard::KeyMismatch { .. })));
        assert!(ctx.is_perspective_observing);
    }

    #[test]
    fn test_up_lifts_at_the_dragged_position() {
        let fx = Fixture::new();
        let mapping = KeyToTouchMappingInfo::observation_key(KEY, 100, 100, 1, 1);
        let mut ctx = fx.context.lock();
        ObservationKeyHandler
            .handle_key_down(&mut ctx, &fx.services, &KeyEvent::down(KEY, 1), &mapping)
            .unwrap();
        ObservationKeyHandler
            .handle_pointer_event(&mut ctx, &fx.services, &PointerEvent::motion(4, 4, 2))
            .unwrap();

        ObservationKeyHandler
            .handle_key_up(&mut ctx, &fx.services, &KeyEvent::up(KEY, 3), &mapping)
            .unwrap();

        let up = fx.entities()[2];
        assert_eq!(up.action, TouchAction::Up);
        assert_eq!(up.point(), TouchPoint::new(104, 104));
        assert!(ctx.is_idle());
    }

    #[test]
    fn test_motion_is_ignored_while_keyboard_observation_holds_the_slot() {
        let fx = Fixture::new();
        let mut ctx = fx.context.lock();
        ctx.is_perspective_observing = true;
        ctx.current_perspective_observing = Some(ActiveMapping {
            mapping: KeyToTouchMappingInfo::keyboard_observation(DpadKeyCodeEntity::default(), 1, 1, 1, 1),
            pointer_id: 1,
        });

        let result = ObservationKeyHandler.handle_pointer_event(&mut ctx, &fx.services, &PointerEvent::motion(3, 3, 1));

        assert_eq!(result, Err(Discard::NotActive(TouchMode::ObservationKey)));
        assert!(fx.entities().is_empty());
    }
}
