//! Mouse right click: the right button holds a finger on its control.
//!
//! Also serves the walking variant. The active mapping is kept in the context
//! because collaborators read the walking parameters from it.

use touchmap_core::{KeyEvent, KeyToTouchMappingInfo};
use tracing::debug;

use super::{lift_pointer, Discard, HandleResult, InputToTouchHandler, TouchMode, TouchServices};
use crate::application::context::{ActiveMapping, InputToTouchContext};

#[derive(Debug, Default, Clone, Copy)]
pub struct MouseRightClickHandler;

impl InputToTouchHandler for MouseRightClickHandler {
    fn mode(&self) -> TouchMode {
        TouchMode::MouseRightClick
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
                mode: TouchMode::MouseRightClick,
                active: TouchMode::SingleKey,
            });
        }
        if ctx.is_mouse_left_fire_operating {
            return Err(Discard::BlockedBy {
                mode: TouchMode::MouseRightClick,
                active: TouchMode::MouseLeftFire,
            });
        }
        if ctx.is_mouse_right_click_operating {
            return Err(Discard::AlreadyActive(TouchMode::MouseRightClick));
        }

        let pointer_id = services.pointers.apply_pointer_id();
        ctx.is_mouse_right_click_operating = true;
        ctx.current_mouse_right_click = Some(ActiveMapping {
            mapping: mapping.clone(),
            pointer_id,
        });
        services
            .emitter
            .emit_down(ctx, pointer_id, mapping, event.action_time);
        debug!(pointer_id, mapping_type = ?mapping.mapping_type, "right click down");
        Ok(())
    }

    fn handle_key_up(
        &self,
        ctx: &mut InputToTouchContext,
        services: &TouchServices,
        event: &KeyEvent,
        _mapping: &KeyToTouchMappingInfo,
    ) -> HandleResult {
        let pointer_id = match (&ctx.current_mouse_right_click, ctx.is_mouse_right_click_operating) {
            (Some(active), true) => active.pointer_id,
            _ => return Err(Discard::NotActive(TouchMode::MouseRightClick)),
        };
        lift_pointer(ctx, services, pointer_id, event.action_time)?;
        ctx.is_mouse_right_click_operating = false;
        ctx.current_mouse_right_click = None;
        debug!(pointer_id, "right click up");
        Ok(())
    }
}
