//! Single-key mode: one key press is one finger held at a fixed spot.
//!
//! Several single keys may be held at once; each gets its own pointer.

use touchmap_core::{KeyEvent, KeyToTouchMappingInfo};
use tracing::debug;

use super::{lift_pointer, Discard, HandleResult, InputToTouchHandler, TouchMode, TouchServices};
use crate::application::context::{ActiveMapping, InputToTouchContext};

#[derive(Debug, Default, Clone, Copy)]
pub struct SingleKeyHandler;

impl InputToTouchHandler for SingleKeyHandler {
    fn mode(&self) -> TouchMode {
        TouchMode::SingleKey
    }

    fn handle_key_down(
        &self,
        ctx: &mut InputToTouchContext,
        services: &TouchServices,
        event: &KeyEvent,
        mapping: &KeyToTouchMappingInfo,
    ) -> HandleResult {
        if ctx.is_mouse_right_click_operating {
            return Err(Discard::BlockedBy {
                mode: TouchMode::SingleKey,
                active: TouchMode::MouseRightClick,
            });
        }
        if ctx.is_mouse_left_fire_operating {
            return Err(Discard::BlockedBy {
                mode: TouchMode::SingleKey,
                active: TouchMode::MouseLeftFire,
            });
        }
        if ctx.current_single_key_map.contains_key(&event.key_code) {
            return Err(Discard::AlreadyActive(TouchMode::SingleKey));
        }

        let pointer_id = services.pointers.apply_pointer_id();
        ctx.is_single_key_operating = true;
        ctx.current_single_key_map.insert(
            event.key_code,
            ActiveMapping {
                mapping: mapping.clone(),
                pointer_id,
            },
        );
        services
            .emitter
            .emit_down(ctx, pointer_id, mapping, event.action_time);
        debug!(key_code = event.key_code, pointer_id, "single key down");
        Ok(())
    }

    fn handle_key_up(
        &self,
        ctx: &mut InputToTouchContext,
        services: &TouchServices,
        event: &KeyEvent,
        _mapping: &KeyToTouchMappingInfo,
    ) -> HandleResult {
        let pointer_id = ctx
            .current_single_key_map
            .get(&event.key_code)
            .map(|active| active.pointer_id)
            .ok_or(Discard::NotActive(TouchMode::SingleKey))?;

        lift_pointer(ctx, services, pointer_id, event.action_time)?;
        ctx.current_single_key_map.remove(&event.key_code);
        if ctx.current_single_key_map.is_empty() {
            ctx.is_single_key_operating = false;
        }
        debug!(key_code = event.key_code, pointer_id, "single key up");
        Ok(())
    }
}
