//! Directional-pad geometry for keyboard observation.
//!
//! Held directional keys are turned into a per-tick displacement. A second
//! held key may add a diagonal component, but only for the ordered pairs in
//! [`VALID_COMBINATIONS`]. Opposite pairs (Up+Down, Left+Right) are absent on
//! purpose and fall back to the primary direction alone.

use super::mapping::{DpadKeyItem, DpadKeyType, KeyToTouchMappingInfo};
use super::touch::TouchPoint;
use super::window::WindowInfo;
use crate::keymap::KeyCode;

/// Whitelist of direction sequences a tick may apply.
const VALID_COMBINATIONS: &[&[DpadKeyType]] = &[
    &[DpadKeyType::Up],
    &[DpadKeyType::Up, DpadKeyType::Left],
    &[DpadKeyType::Left, DpadKeyType::Up],
    &[DpadKeyType::Up, DpadKeyType::Right],
    &[DpadKeyType::Right, DpadKeyType::Up],
    &[DpadKeyType::Down],
    &[DpadKeyType::Down, DpadKeyType::Left],
    &[DpadKeyType::Left, DpadKeyType::Down],
    &[DpadKeyType::Down, DpadKeyType::Right],
    &[DpadKeyType::Right, DpadKeyType::Down],
    &[DpadKeyType::Left],
    &[DpadKeyType::Right],
];

/// Returns `true` if holding `secondary` together with `primary` forms a
/// diagonal listed in the whitelist.
pub fn is_valid_combination(primary: DpadKeyType, secondary: DpadKeyType) -> bool {
    VALID_COMBINATIONS
        .iter()
        .any(|combo| **combo == [primary, secondary])
}

/// Finds the first held key, other than `current_key_code`, whose direction
/// forms a valid diagonal with `current_type`.
pub fn find_diagonal(
    current_key_code: KeyCode,
    current_type: DpadKeyType,
    held: &[DpadKeyItem],
) -> Option<DpadKeyType> {
    held.iter()
        .filter(|item| item.key_code != current_key_code)
        .map(|item| item.key_type)
        .find(|&key_type| is_valid_combination(current_type, key_type))
}

/// Displacement one tick applies for `direction`.
pub fn step_for(direction: DpadKeyType, mapping: &KeyToTouchMappingInfo) -> (i32, i32) {
    match direction {
        DpadKeyType::Up => (0, -mapping.y_step),
        DpadKeyType::Down => (0, mapping.y_step),
        DpadKeyType::Left => (-mapping.x_step, 0),
        DpadKeyType::Right => (mapping.x_step, 0),
        DpadKeyType::Unknown => (0, 0),
    }
}

/// Computes the position after one tick.
///
/// The diagonal step (if any) is applied first, then the primary step; each
/// axis is clamped to the window after every step.
pub fn next_position(
    from: TouchPoint,
    primary: DpadKeyType,
    diagonal: Option<DpadKeyType>,
    mapping: &KeyToTouchMappingInfo,
    window: &WindowInfo,
) -> TouchPoint {
    let apply = |point: TouchPoint, direction: DpadKeyType| {
        let (dx, dy) = step_for(direction, mapping);
        TouchPoint::new(
            window.clamp_x(point.x.saturating_add(dx)),
            window.clamp_y(point.y.saturating_add(dy)),
        )
    };

    let after_diagonal = match diagonal {
        Some(direction) => apply(from, direction),
        None => from,
    };
    apply(after_diagonal, primary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::mapping::DpadKeyCodeEntity;

    fn mapping(x_step: i32, y_step: i32) -> KeyToTouchMappingInfo {
        KeyToTouchMappingInfo::keyboard_observation(DpadKeyCodeEntity::default(), 500, 500, x_step, y_step)
    }

    fn item(key_code: KeyCode, key_type: DpadKeyType) -> DpadKeyItem {
        DpadKeyItem { key_code, key_type }
    }

    #[test]
    fn test_adjacent_directions_form_diagonals_in_both_orders() {
        assert!(is_valid_combination(DpadKeyType::Up, DpadKeyType::Left));
        assert!(is_valid_combination(DpadKeyType::Left, DpadKeyType::Up));
        assert!(is_valid_combination(DpadKeyType::Down, DpadKeyType::Right));
        assert!(is_valid_combination(DpadKeyType::Right, DpadKeyType::Down));
    }

    #[test]
    fn test_opposite_directions_are_not_diagonals() {
        assert!(!is_valid_combination(DpadKeyType::Up, DpadKeyType::Down));
        assert!(!is_valid_combination(DpadKeyType::Down, DpadKeyType::Up));
        assert!(!is_valid_combination(DpadKeyType::Left, DpadKeyType::Right));
        assert!(!is_valid_combination(DpadKeyType::Up, DpadKeyType::Unknown));
    }

    #[test]
    fn test_find_diagonal_skips_the_current_key_and_invalid_pairs() {
        let held = [
            item(1, DpadKeyType::Up),
            item(2, DpadKeyType::Down),
            item(3, DpadKeyType::Left),
        ];

        assert_eq!(find_diagonal(1, DpadKeyType::Up, &held), Some(DpadKeyType::Left));
        assert_eq!(find_diagonal(3, DpadKeyType::Left, &held), Some(DpadKeyType::Up));
        assert_eq!(find_diagonal(1, DpadKeyType::Up, &held[..2]), None);
    }

    #[test]
    fn test_up_alone_moves_by_negative_y_step() {
        let next = next_position(
            TouchPoint::new(100, 100),
            DpadKeyType::Up,
            None,
            &mapping(7, 10),
            &WindowInfo::new(1000, 1000),
        );
        assert_eq!(next, TouchPoint::new(100, 90));
    }

    #[test]
    fn test_up_left_moves_on_both_axes() {
        let next = next_position(
            TouchPoint::new(100, 100),
            DpadKeyType::Up,
            Some(DpadKeyType::Left),
            &mapping(7, 10),
            &WindowInfo::new(1000, 1000),
        );
        assert_eq!(next, TouchPoint::new(93, 90));
    }

    #[test]
    fn test_each_axis_is_clamped_independently() {
        let next = next_position(
            TouchPoint::new(995, 4),
            DpadKeyType::Right,
            Some(DpadKeyType::Up),
            &mapping(20, 10),
            &WindowInfo::new(1000, 1000),
        );
        assert_eq!(next, TouchPoint::new(1000, 0));
    }
}
