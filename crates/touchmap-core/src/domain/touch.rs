//! Synthetic touch entities pushed to the host's touch pipeline.

use serde::{Deserialize, Serialize};

use super::pointer::PointerId;

/// Phase of a synthetic touch contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchAction {
    Down,
    Move,
    Up,
}

/// A position in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TouchPoint {
    pub x: i32,
    pub y: i32,
}

impl TouchPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One emitted touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouchEntity {
    pub pointer_id: PointerId,
    pub action: TouchAction,
    pub x: i32,
    pub y: i32,
    /// Microseconds, in the clock of the event that caused the emission.
    pub action_time: i64,
}

impl TouchEntity {
    pub fn new(pointer_id: PointerId, action: TouchAction, point: TouchPoint, action_time: i64) -> Self {
        Self {
            pointer_id,
            action,
            x: point.x,
            y: point.y,
            action_time,
        }
    }

    pub fn point(&self) -> TouchPoint {
        TouchPoint::new(self.x, self.y)
    }
}
