//! Integration tests for directional-pad geometry.
//!
//! These walk a finger through many consecutive ticks using only the public
//! API, the way the engine's ticker does.

use touchmap_core::keymap::{KeyCode, KEYCODE_A, KEYCODE_D, KEYCODE_S, KEYCODE_W};
use touchmap_core::{
    find_diagonal, next_position, DpadKeyCodeEntity, DpadKeyItem, KeyToTouchMappingInfo, TouchPoint, WindowInfo,
};

fn wasd_mapping(x_step: i32, y_step: i32) -> KeyToTouchMappingInfo {
    let dpad = DpadKeyCodeEntity {
        up: KEYCODE_W,
        down: KEYCODE_S,
        left: KEYCODE_A,
        right: KEYCODE_D,
    };
    KeyToTouchMappingInfo::keyboard_observation(dpad, 100, 100, x_step, y_step)
}

/// Runs `ticks` ticks with `current` as the primary key and `held` pressed.
fn walk(mapping: &KeyToTouchMappingInfo, window: &WindowInfo, current: KeyCode, held: &[KeyCode], ticks: usize) -> TouchPoint {
    let dpad = &mapping.dpad_key_code_entity;
    let items: Vec<_> = held
        .iter()
        .map(|&key_code| DpadKeyItem {
            key_code,
            key_type: dpad.classify(key_code),
        })
        .collect();
    let primary = dpad.classify(current);
    let diagonal = find_diagonal(current, primary, &items);

    (0..ticks).fold(TouchPoint::new(mapping.x_value, mapping.y_value), |point, _| {
        next_position(point, primary, diagonal, mapping, window)
    })
}

#[test]
fn test_diagonal_walk_stops_at_the_window_corner() {
    // Arrange
    let mapping = wasd_mapping(30, 20);
    let window = WindowInfo::new(200, 160);

    // Act
    let point = walk(&mapping, &window, KEYCODE_D, &[KEYCODE_S, KEYCODE_D], 50);

    // Assert
    assert_eq!(point, TouchPoint::new(200, 160));
}

#[test]
fn test_up_left_walk_never_goes_negative() {
    let mapping = wasd_mapping(7, 9);
    let window = WindowInfo::new(1000, 1000);

    let point = walk(&mapping, &window, KEYCODE_W, &[KEYCODE_A, KEYCODE_W], 40);

    assert_eq!(point, TouchPoint::new(0, 0));
}

#[test]
fn test_unbounded_window_only_clamps_below() {
    let mapping = wasd_mapping(25, 25);
    let window = WindowInfo::default();

    let point = walk(&mapping, &window, KEYCODE_D, &[KEYCODE_D], 100);

    assert_eq!(point, TouchPoint::new(100 + 25 * 100, 100));
}

#[test]
fn test_opposite_keys_walk_along_the_primary_axis() {
    let mapping = wasd_mapping(10, 10);
    let window = WindowInfo::new(1000, 1000);

    let point = walk(&mapping, &window, KEYCODE_S, &[KEYCODE_W, KEYCODE_S], 3);

    assert_eq!(point, TouchPoint::new(100, 130));
}
