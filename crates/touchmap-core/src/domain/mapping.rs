//! Mapping records: how one input gesture translates into a touch action.
//!
//! A [`KeyToTouchMappingInfo`] is resolved by the configuration provider for
//! every event and is immutable for the duration of that event. Validation
//! that depends on the mode (for example the two-key rule of combination
//! mappings) happens in the handler that consumes the record, not here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::keymap::KeyCode;

/// Key code used for directional slots that are not bound to any key.
pub const UNSET_KEY_CODE: KeyCode = -1;

/// Number of keys a combination mapping must carry: modifier, then trigger.
pub const COMBINATION_KEY_COUNT: usize = 2;

/// Errors raised when a mapping record is unusable for its mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// A combination mapping did not carry exactly two keys.
    #[error("combination mapping needs exactly {COMBINATION_KEY_COUNT} keys, got {len}")]
    InvalidCombination { len: usize },
}

/// The translation strategy a mapping record asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingType {
    /// One key drives one virtual finger at a fixed position.
    SingleKey,
    /// An ordered modifier + trigger pair drives one virtual finger.
    CombinationKey,
    /// Press-and-hold: the finger follows mouse movement while held.
    ObservationKey,
    /// Directional keys emulate an analog stick.
    KeyboardObservation,
    /// Left mouse button fires at a fixed position once the crosshair is up.
    MouseLeftFire,
    /// Right mouse button taps a fixed position.
    MouseRightClick,
    /// Right mouse button variant carrying walking parameters.
    MouseRightWalking,
    /// Skill wheel key. Resolved by the provider but not handled by the engine.
    SkillKey,
}

/// Key codes bound to the four directions of an emulated directional pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DpadKeyCodeEntity {
    pub up: KeyCode,
    pub down: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
}

impl DpadKeyCodeEntity {
    /// Classifies `key_code` as one of the four directions.
    pub fn classify(&self, key_code: KeyCode) -> DpadKeyType {
        if key_code == UNSET_KEY_CODE {
            DpadKeyType::Unknown
        } else if key_code == self.up {
            DpadKeyType::Up
        } else if key_code == self.down {
            DpadKeyType::Down
        } else if key_code == self.left {
            DpadKeyType::Left
        } else if key_code == self.right {
            DpadKeyType::Right
        } else {
            DpadKeyType::Unknown
        }
    }

    /// Returns `true` if `key_code` is bound to any direction.
    pub fn contains(&self, key_code: KeyCode) -> bool {
        self.classify(key_code) != DpadKeyType::Unknown
    }
}

impl Default for DpadKeyCodeEntity {
    fn default() -> Self {
        Self {
            up: UNSET_KEY_CODE,
            down: UNSET_KEY_CODE,
            left: UNSET_KEY_CODE,
            right: UNSET_KEY_CODE,
        }
    }
}

/// Direction a directional key stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DpadKeyType {
    Up,
    Down,
    Left,
    Right,
    Unknown,
}

/// A held directional key, built per key event for keyboard observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DpadKeyItem {
    pub key_code: KeyCode,
    pub key_type: DpadKeyType,
}

/// One mapping record as supplied by the configuration provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyToTouchMappingInfo {
    pub mapping_type: MappingType,
    /// Key (or button) the mapping is bound to.
    #[serde(default = "unset_key_code")]
    pub key_code: KeyCode,
    /// Target touch position.
    #[serde(default)]
    pub x_value: i32,
    #[serde(default)]
    pub y_value: i32,
    #[serde(default)]
    pub radius: i32,
    #[serde(default)]
    pub skill_range: i32,
    /// Per-tick displacement (keyboard observation) or per-unit mouse scaling
    /// (observation).
    #[serde(default)]
    pub x_step: i32,
    #[serde(default)]
    pub y_step: i32,
    /// Ordered modifier + trigger pair for combination mappings.
    #[serde(default)]
    pub combination_keys: Vec<KeyCode>,
    #[serde(default)]
    pub dpad_key_code_entity: DpadKeyCodeEntity,
    /// Milliseconds; carried for collaborators, unused by the handlers.
    #[serde(default)]
    pub delay_time: i32,
}

fn unset_key_code() -> KeyCode {
    UNSET_KEY_CODE
}

impl KeyToTouchMappingInfo {
    /// Creates a record of `mapping_type` targeting `(x, y)` with every other
    /// field unset.
    pub fn new(mapping_type: MappingType, key_code: KeyCode, x_value: i32, y_value: i32) -> Self {
        Self {
            mapping_type,
            key_code,
            x_value,
            y_value,
            radius: 0,
            skill_range: 0,
            x_step: 0,
            y_step: 0,
            combination_keys: Vec::new(),
            dpad_key_code_entity: DpadKeyCodeEntity::default(),
            delay_time: 0,
        }
    }

    pub fn single_key(key_code: KeyCode, x_value: i32, y_value: i32) -> Self {
        Self::new(MappingType::SingleKey, key_code, x_value, y_value)
    }

    /// Combination mapping; the record's own `key_code` is the trigger when
    /// `keys` has one.
    pub fn combination_key(keys: Vec<KeyCode>, x_value: i32, y_value: i32) -> Self {
        let trigger = keys.get(1).copied().unwrap_or(UNSET_KEY_CODE);
        Self {
            combination_keys: keys,
            ..Self::new(MappingType::CombinationKey, trigger, x_value, y_value)
        }
    }

    pub fn observation_key(key_code: KeyCode, x_value: i32, y_value: i32, x_step: i32, y_step: i32) -> Self {
        Self {
            x_step,
            y_step,
            ..Self::new(MappingType::ObservationKey, key_code, x_value, y_value)
        }
    }

    pub fn keyboard_observation(
        dpad: DpadKeyCodeEntity,
        x_value: i32,
        y_value: i32,
        x_step: i32,
        y_step: i32,
    ) -> Self {
        Self {
            x_step,
            y_step,
            dpad_key_code_entity: dpad,
            ..Self::new(MappingType::KeyboardObservation, UNSET_KEY_CODE, x_value, y_value)
        }
    }

    pub fn mouse_left_fire(x_value: i32, y_value: i32) -> Self {
        Self::new(MappingType::MouseLeftFire, UNSET_KEY_CODE, x_value, y_value)
    }

    pub fn mouse_right_click(x_value: i32, y_value: i32) -> Self {
        Self::new(MappingType::MouseRightClick, UNSET_KEY_CODE, x_value, y_value)
    }

    /// Returns the trigger (second) key of a combination mapping.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::InvalidCombination`] unless the mapping carries
    /// exactly two combination keys.
    pub fn combination_trigger(&self) -> Result<KeyCode, MappingError> {
        match self.combination_keys.as_slice() {
            [_, trigger] => Ok(*trigger),
            keys => Err(MappingError::InvalidCombination { len: keys.len() }),
        }
    }
}
