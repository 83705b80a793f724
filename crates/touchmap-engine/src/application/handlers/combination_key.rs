//! Combination mode: an ordered (modifier, trigger) pair acting as one button.
//!
//! The gesture starts on the trigger key's down and only the trigger key's up
//! ends it. Mappings that do not carry exactly two keys never emit.

use touchmap_core::{KeyEvent, KeyToTouchMappingInfo};
use tracing::debug;

use super::{lift_pointer, Discard, HandleResult, InputToTouchHandler, TouchMode, TouchServices};
use crate::application::context::{ActiveMapping, InputToTouchContext};

#[derive(Debug, Default, Clone, Copy)]
pub struct CombinationKeyHandler;

impl InputToTouchHandler for CombinationKeyHandler {
    fn mode(&self) -> TouchMode {
        TouchMode::CombinationKey
    }

    fn handle_key_down(
        &self,
        ctx: &mut InputToTouchContext,
        services: &TouchServices,
        event: &KeyEvent,
        mapping: &KeyToTouchMappingInfo,
    ) -> HandleResult {
        let trigger = mapping.combination_trigger()?;
        if ctx.is_combination_key_operating {
            return Err(Discard::AlreadyActive(TouchMode::CombinationKey));
        }
        if event.key_code != trigger {
            return Err(Discard::KeyMismatch {
                mode: TouchMode::CombinationKey,
                expected: trigger,
                actual: event.key_code,
            });
        }

        let pointer_id = services.pointers.apply_pointer_id();
        ctx.is_combination_key_operating = true;
        ctx.current_combination_key = Some(ActiveMapping {
            mapping: mapping.clone(),
            pointer_id,
        });
        services
            .emitter
            .emit_down(ctx, pointer_id, mapping, event.action_time);
        debug!(trigger, pointer_id, "combination latched");
        Ok(())
    }

    fn handle_key_up(
        &self,
        ctx: &mut InputToTouchContext,
        services: &TouchServices,
        event: &KeyEvent,
        mapping: &KeyToTouchMappingInfo,
    ) -> HandleResult {
        mapping.combination_trigger()?;
        let active = match (&ctx.current_combination_key, ctx.is_combination_key_operating) {
            (Some(active), true) => active,
            _ => return Err(Discard::NotActive(TouchMode::CombinationKey)),
        };
        let trigger = active.mapping.combination_trigger()?;
        if event.key_code != trigger {
            return Err(Discard::KeyMismatch {
                mode: TouchMode::CombinationKey,
                expected: trigger,
                actual: event.key_code,
            });
        }
        let pointer_id = active.pointer_id;

        lift_pointer(ctx, services, pointer_id, event.action_time)?;
        ctx.is_combination_key_operating = false;
        ctx.current_combination_key = None;
        debug!(trigger, pointer_id, "combination released");
        Ok(())
    }
}
