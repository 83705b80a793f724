//! Mouse left fire: the left button taps the fire control.
//!
//! Only available once the crosshair collaborator has flagged the session
//! ready. Always uses the fire pointer id the session reserved at start, so
//! the fire finger never collides with another session's fingers.

use touchmap_core::{KeyEvent, KeyToTouchMappingInfo};
use tracing::debug;

use super::{lift_pointer, Discard, HandleResult, InputToTouchHandler, TouchMode, TouchServices};
use crate::application::context::{ActiveMapping, InputToTouchContext};

#[derive(Debug, Default, Clone, Copy)]
pub struct MouseLeftFireHandler;

impl InputToTouchHandler for MouseLeftFireHandler {
    fn mode(&self) -> TouchMode {
        TouchMode::MouseLeftFire
    }

    fn handle_key_down(
        &self,
        ctx: &mut InputToTouchContext,
        services: &TouchServices,
        event: &KeyEvent,
        mapping: &KeyToTouchMappingInfo,
    ) -> HandleResult {
        if ctx.is_single_key_operating {
            return Err(Discard::BlockedBy {
                mode: TouchMode::MouseLeftFire,
                active: TouchMode::SingleKey,
            });
        }
        if ctx.is_mouse_right_click_operating {
            return Err(Discard::BlockedBy {
                mode: TouchMode::MouseLeftFire,
                active: TouchMode::MouseRightClick,
            });
        }
        if ctx.is_mouse_left_fire_operating {
            return Err(Discard::AlreadyActive(TouchMode::MouseLeftFire));
        }
        if !ctx.is_enter_crosshair_info {
            return Err(Discard::NotReady);
        }

        let pointer_id = services.fire_pointer_id;
        ctx.is_mouse_left_fire_operating = true;
        ctx.current_mouse_left_fire = Some(ActiveMapping {
            mapping: mapping.clone(),
            pointer_id,
        });
        services
            .emitter
            .emit_down(ctx, pointer_id, mapping, event.action_time);
        debug!(pointer_id, "left fire down");
        Ok(())
    }

    fn handle_key_up(
        &self,
        ctx: &mut InputToTouchContext,
        services: &TouchServices,
        event: &KeyEvent,
        _mapping: &KeyToTouchMappingInfo,
    ) -> HandleResult {
        if !ctx.is_mouse_left_fire_operating {
            return Err(Discard::NotActive(TouchMode::MouseLeftFire));
        }
        lift_pointer(ctx, services, services.fire_pointer_id, event.action_time)?;
        ctx.is_mouse_left_fire_operating = false;
        ctx.current_mouse_left_fire = None;
        debug!("left fire up");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Fixture;
    use touchmap_core::{TouchAction, TouchPoint};

    fn fire() -> KeyToTouchMappingInfo {
        KeyToTouchMappingInfo::mouse_left_fire(1800, 700)
    }

    #[test]
    fn test_fire_down_and_up_use_the_session_fire_pointer() {
        // Arrange
        let fx = Fixture::new();
        let mut ctx = fx.context.lock();
        ctx.is_enter_crosshair_info = true;

        // Act
        MouseLeftFireHandler
            .handle_key_down(&mut ctx, &fx.services, &KeyEvent::down(0, 1), &fire())
            .unwrap();
        MouseLeftFireHandler
            .handle_key_up(&mut ctx, &fx.services, &KeyEvent::up(0, 2), &fire())
            .unwrap();

        // Assert
        let emitted = fx.entities();
        assert_eq!(emitted.len(), 2);
        assert!(emitted.iter().all(|e| e.pointer_id == fx.services.fire_pointer_id));
        assert_eq!(emitted[1].action, TouchAction::Up);
        assert_eq!(emitted[1].point(), TouchPoint::new(1800, 700));
        assert!(ctx.is_idle());
    }

    #[test]
    fn test_fire_release_keeps_the_fire_id_reserved() {
        // Arrange
        let fx = Fixture::new();
        let mut ctx = fx.context.lock();
        ctx.is_enter_crosshair_info = true;
        MouseLeftFireHandler
            .handle_key_down(&mut ctx, &fx.services, &KeyEvent::down(0, 1), &fire())
            .unwrap();

        // Act
        MouseLeftFireHandler
            .handle_key_up(&mut ctx, &fx.services, &KeyEvent::up(0, 2), &fire())
            .unwrap();

        // Assert
        let issued: Vec<_> = (0..8).map(|_| fx.services.pointers.apply_pointer_id()).collect();
        assert!(!issued.contains(&fx.services.fire_pointer_id));
    }

    #[test]
    fn test_fire_waits_for_crosshair_readiness() {
        let fx = Fixture::new();
        let mut ctx = fx.context.lock();

        let result = MouseLeftFireHandler.handle_key_down(&mut ctx, &fx.services, &KeyEvent::down(0, 1), &fire());

        assert_eq!(result, Err(Discard::NotReady));
        assert!(!ctx.is_mouse_left_fire_operating);
    }

    #[test]
    fn test_fire_is_blocked_by_a_held_single_key() {
        let fx = Fixture::new();
        let mut ctx = fx.context.lock();
        ctx.is_enter_crosshair_info = true;
        ctx.is_single_key_operating = true;

        let result = MouseLeftFireHandler.handle_key_down(&mut ctx, &fx.services, &KeyEvent::down(0, 1), &fire());

        assert!(matches!(result, Err(Discard::BlockedBy { active: TouchMode::SingleKey, .. })));
        assert!(fx.entities().is_empty());
    }

    #[test]
    fn test_second_down_while_firing_is_discarded() {
        let fx = Fixture::new();
        let mut ctx = fx.context.lock();
        ctx.is_enter_crosshair_info = true;
        MouseLeftFireHandler
            .handle_key_down(&mut ctx, &fx.services, &KeyEvent::down(0, 1), &fire())
            .unwrap();

        let result = MouseLeftFireHandler.handle_key_down(&mut ctx, &fx.services, &KeyEvent::down(0, 2), &fire());

        assert_eq!(result, Err(Discard::AlreadyActive(TouchMode::MouseLeftFire)));
        assert_eq!(fx.entities().len(), 1);
    }

    #[test]
    fn test_up_without_fire_is_discarded() {
        let fx = Fixture::new();
        let mut ctx = fx.context.lock();

        let result = MouseLeftFireHandler.handle_key_up(&mut ctx, &fx.services, &KeyEvent::up(0, 1), &fire());

        assert_eq!(result, Err(Discard::NotActive(TouchMode::MouseLeftFire)));
    }
}
