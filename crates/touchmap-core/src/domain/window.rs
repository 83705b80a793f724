//! Window bounds used to clamp emitted touch coordinates.

use serde::{Deserialize, Serialize};

use super::touch::TouchPoint;

/// Size of the mapped window. A zero extent means the axis is unbounded
/// above; every axis is always bounded below by 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WindowInfo {
    #[serde(default)]
    pub max_width: i32,
    #[serde(default)]
    pub max_height: i32,
}

impl WindowInfo {
    pub const fn new(max_width: i32, max_height: i32) -> Self {
        Self {
            max_width,
            max_height,
        }
    }

    pub fn clamp_x(&self, x: i32) -> i32 {
        clamp_axis(x, self.max_width)
    }

    pub fn clamp_y(&self, y: i32) -> i32 {
        clamp_axis(y, self.max_height)
    }

    /// Clamps both axes independently.
    pub fn clamp(&self, point: TouchPoint) -> TouchPoint {
        TouchPoint::new(self.clamp_x(point.x), self.clamp_y(point.y))
    }
}

fn clamp_axis(value: i32, max: i32) -> i32 {
    if max > 0 {
        value.clamp(0, max)
    } else {
        value.max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_keeps_points_inside_the_window() {
        let window = WindowInfo::new(1920, 1080);
        assert_eq!(window.clamp(TouchPoint::new(-5, 2000)), TouchPoint::new(0, 1080));
        assert_eq!(window.clamp(TouchPoint::new(1921, -1)), TouchPoint::new(1920, 0));
        assert_eq!(window.clamp(TouchPoint::new(10, 20)), TouchPoint::new(10, 20));
    }

    #[test]
    fn test_unset_window_only_clamps_at_zero() {
        let window = WindowInfo::default();
        assert_eq!(window.clamp(TouchPoint::new(5000, -3)), TouchPoint::new(5000, 0));
    }
}
