//! Keyboard observation: a directional pad emulating an analog stick.
//!
//! The first directional key puts a finger down at the mapping's base and
//! starts the ticker; every later press or release only changes the
//! direction the ticker applies. Releasing the last held directional key
//! stops the ticker and lifts the finger.
//!
//! Held keys are read from the context's pressed-key state, which the engine
//! updates before dispatching.

use touchmap_core::{DpadKeyType, KeyCode, KeyEvent, KeyToTouchMappingInfo, MappingType};
use tracing::debug;

use super::{lift_pointer, Discard, HandleResult, InputToTouchHandler, TouchMode, TouchServices};
use crate::application::context::{ActiveMapping, InputToTouchContext};

#[derive(Debug, Default, Clone, Copy)]
pub struct KeyboardObservationHandler;

impl KeyboardObservationHandler {
    /// Points the ticker at `key_code`'s direction, with every held
    /// directional key available for diagonals.
    fn move_by_key_down(
        ctx: &InputToTouchContext,
        services: &TouchServices,
        key_code: KeyCode,
        mapping: &KeyToTouchMappingInfo,
    ) -> HandleResult {
        let dpad = &mapping.dpad_key_code_entity;
        let key_type = dpad.classify(key_code);
        if key_type == DpadKeyType::Unknown {
            return Err(Discard::UnknownDirection(key_code));
        }
        let held = ctx.held_dpad_keys(dpad);
        if held.is_empty() {
            return Err(Discard::NoHeldDirection);
        }
        services
            .observation_task
            .update_direction(key_code, key_type, held)?;
        Ok(())
    }
}

impl InputToTouchHandler for KeyboardObservationHandler {
    fn mode(&self) -> TouchMode {
        TouchMode::KeyboardObservation
    }

    fn handle_key_down(
        &self,
        ctx: &mut InputToTouchContext,
        services: &TouchServices,
        event: &KeyEvent,
        mapping: &KeyToTouchMappingInfo,
    ) -> HandleResult {
        if ctx.is_perspective_observing {
            let active = ctx
                .observing(MappingType::KeyboardObservation)
                .map(|active| active.mapping.clone())
                .ok_or(Discard::BlockedBy {
                    mode: TouchMode::KeyboardObservation,
                    active: TouchMode::ObservationKey,
                })?;
            return Self::move_by_key_down(ctx, services, event.key_code, &active);
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
        if let Err(e) = services.observation_task.start() {
            debug!("{e}; keeping the running ticker");
        }
        debug!(key_code = event.key_code, pointer_id, "keyboard observation started");

        // The finger is down either way; a key that names no direction only
        // leaves the ticker idle until the next directional press.
        if let Err(reason) = Self::move_by_key_down(ctx, services, event.key_code, mapping) {
            debug!(key_code = event.key_code, %reason, "no initial direction");
        }
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
            .observing(MappingType::KeyboardObservation)
            .ok_or(Discard::NotActive(TouchMode::KeyboardObservation))?;
        let pointer_id = active.pointer_id;
        let dpad = active.mapping.dpad_key_code_entity;
        if !dpad.contains(event.key_code) {
            return Err(Discard::UnknownDirection(event.key_code));
        }

        let held = ctx.held_dpad_keys(&dpad);
        if let Some(latest) = held.last().copied() {
            services
                .observation_task
                .update_direction(latest.key_code, latest.key_type, held)?;
            debug!(key_code = latest.key_code, "direction handed to the latest held key");
            return Ok(());
        }

        if ctx.pointer_position(pointer_id).is_none() {
            return Err(Discard::MissingPointer(pointer_id));
        }
        if let Err(e) = services.observation_task.stop() {
            debug!("{e}");
        }
        lift_pointer(ctx, services, pointer_id, event.action_time)?;
        ctx.is_perspective_observing = false;
        ctx.current_perspective_observing = None;
        debug!(pointer_id, "keyboard observation ended");
        Ok(())
    }
}
