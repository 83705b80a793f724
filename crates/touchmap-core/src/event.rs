//! Raw input events consumed by the engine.
//!
//! The input source delivers these sequentially. Times are microseconds in
//! the source's own clock and are copied onto the emitted touch entities.

use serde::{Deserialize, Serialize};

use crate::keymap::KeyCode;

/// Class of hardware the event came from. Mapping tables are kept per class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Keyboard,
    VirtualKeyboard,
    Mouse,
    Gamepad,
}

/// Phase of a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyAction {
    Down,
    Up,
}

/// A key (or gamepad button) press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key_code: KeyCode,
    pub action: KeyAction,
    pub action_time: i64,
}

impl KeyEvent {
    pub fn down(key_code: KeyCode, action_time: i64) -> Self {
        Self {
            key_code,
            action: KeyAction::Down,
            action_time,
        }
    }

    pub fn up(key_code: KeyCode, action_time: i64) -> Self {
        Self {
            key_code,
            action: KeyAction::Up,
            action_time,
        }
    }
}

/// Where a pointer event originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerSourceType {
    Mouse,
}

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventAction {
    ButtonDown,
    ButtonUp,
    Move,
}

/// Mouse button identifiers, numbered as the host reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(i32),
}

impl MouseButton {
    pub fn from_button_id(id: i32) -> Self {
        match id {
            0 => MouseButton::Left,
            1 => MouseButton::Right,
            2 => MouseButton::Middle,
            other => MouseButton::Other(other),
        }
    }

    pub fn button_id(self) -> i32 {
        match self {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
            MouseButton::Middle => 2,
            MouseButton::Other(id) => id,
        }
    }
}

/// A mouse button or motion event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub source_type: PointerSourceType,
    pub action: PointerEventAction,
    pub button_id: i32,
    /// Absolute cursor position inside the window.
    pub window_x: i32,
    pub window_y: i32,
    /// Raw relative motion since the previous event.
    pub raw_dx: i32,
    pub raw_dy: i32,
    pub action_time: i64,
}

impl PointerEvent {
    pub fn button_down(button: MouseButton, action_time: i64) -> Self {
        Self::with_button(PointerEventAction::ButtonDown, button, action_time)
    }

    pub fn button_up(button: MouseButton, action_time: i64) -> Self {
        Self::with_button(PointerEventAction::ButtonUp, button, action_time)
    }

    /// Relative mouse motion with no button change.
    pub fn motion(raw_dx: i32, raw_dy: i32, action_time: i64) -> Self {
        Self {
            source_type: PointerSourceType::Mouse,
            action: PointerEventAction::Move,
            button_id: -1,
            window_x: 0,
            window_y: 0,
            raw_dx,
            raw_dy,
            action_time,
        }
    }

    fn with_button(action: PointerEventAction, button: MouseButton, action_time: i64) -> Self {
        Self {
            source_type: PointerSourceType::Mouse,
            action,
            button_id: button.button_id(),
            window_x: 0,
            window_y: 0,
            raw_dx: 0,
            raw_dy: 0,
            action_time,
        }
    }

    pub fn button(&self) -> MouseButton {
        MouseButton::from_button_id(self.button_id)
    }
}

/// Either kind of input the engine accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Pointer(PointerEvent),
}
