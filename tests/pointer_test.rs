mod common;

use cgmath::Vector2;
use common::fixtures::assert_close;
use riso_scene::pointer::{self, PointerState};

#[test]
fn window_pixels_map_to_ndc() {
    assert_eq!(pointer::to_ndc(0.0, 0.0, 800, 600), Some(Vector2::new(-1.0, 1.0)));
    assert_eq!(pointer::to_ndc(800.0, 600.0, 800, 600), Some(Vector2::new(1.0, -1.0)));
    assert_eq!(pointer::to_ndc(400.0, 300.0, 800, 600), Some(Vector2::new(0.0, 0.0)));
    assert_eq!(pointer::to_ndc(10.0, 10.0, 0, 600), None);
}

#[test]
fn mouse_move_sets_only_the_target() {
    let mut state = PointerState::default();
    state.handle_mouse_move(800.0, 0.0, 800, 600);
    assert_eq!(state.target, Vector2::new(1.0, 1.0));
    assert_eq!(state.smoothed, Vector2::new(0.0, 0.0));

    // Zero sized windows keep the previous target
    state.handle_mouse_move(0.0, 0.0, 0, 0);
    assert_eq!(state.target, Vector2::new(1.0, 1.0));
}

#[test]
fn smoothing_moves_a_tenth_of_the_way_each_frame() {
    let mut state = PointerState {
        target: Vector2::new(1.0, -1.0),
        ..Default::default()
    };
    state.smooth(0.1);
    assert_close(state.smoothed.x, 0.1);
    assert_close(state.smoothed.y, -0.1);
    state.smooth(0.1);
    assert_close(state.smoothed.x, 0.19);

    for _ in 0..200 {
        state.smooth(0.1);
    }
    assert_close(state.smoothed.x, 1.0);
    assert_close(state.smoothed.y, -1.0);
}

#[test]
fn lerp_interpolates_linearly() {
    assert_eq!(pointer::lerp(2.0, 4.0, 0.0), 2.0);
    assert_eq!(pointer::lerp(2.0, 4.0, 0.5), 3.0);
    assert_eq!(pointer::lerp(2.0, 4.0, 1.0), 4.0);
}
