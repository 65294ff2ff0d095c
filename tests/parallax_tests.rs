// Host-side tests for pointer/scroll parallax smoothing.

use backdrop_core::{DepthLayer, GeoConfig, ParallaxTracker};

fn tracker(height: f32) -> ParallaxTracker {
    ParallaxTracker::new(GeoConfig::default().parallax, height)
}

#[test]
fn centered_pointer_and_top_of_page_give_no_offset() {
    let mut p = tracker(800.0);
    for _ in 0..50 {
        p.update();
    }
    for layer in DepthLayer::ALL {
        assert_eq!(p.offset(layer), glam::Vec2::ZERO);
    }
}

#[test]
fn pointer_offset_converges_without_overshoot() {
    let mut p = tracker(800.0);
    p.set_pointer(1.0, 0.5);
    let target = GeoConfig::default().parallax.mouse.near;
    let mut prev = 0.0;
    for _ in 0..300 {
        p.update();
        let x = p.offset(DepthLayer::Near).x;
        assert!(x >= prev, "offset moved away from target");
        assert!(x <= target + 1e-4, "overshoot: {x}");
        prev = x;
    }
    assert!((prev - target).abs() < 0.01);
    assert!(p.offset(DepthLayer::Near).y.abs() < 1e-6);
}

#[test]
fn nearer_layers_move_further() {
    let mut p = tracker(800.0);
    p.set_pointer(0.0, 0.0);
    p.set_scroll_progress(0.5);
    for _ in 0..400 {
        p.update();
    }
    let far = p.offset(DepthLayer::Far);
    let mid = p.offset(DepthLayer::Mid);
    let near = p.offset(DepthLayer::Near);
    assert!(far.x < 0.0);
    assert!(near.x < mid.x && mid.x < far.x);
}

#[test]
fn scroll_offset_tracks_progress_times_height() {
    let mut p = tracker(1000.0);
    p.set_scroll_progress(0.5);
    for _ in 0..600 {
        p.update();
    }
    let scroll = GeoConfig::default().parallax.scroll;
    assert!((p.offset(DepthLayer::Far).y - 500.0 * scroll.far).abs() < 0.05);
    assert!((p.offset(DepthLayer::Near).y - 500.0 * scroll.near).abs() < 0.05);
}

#[test]
fn one_update_moves_a_fraction_of_the_gap() {
    let mut p = tracker(1000.0);
    p.set_pointer(1.0, 0.5);
    p.update();
    let mouse = GeoConfig::default().parallax.mouse;
    let expected = mouse.near * mouse.lerp;
    assert!((p.offset(DepthLayer::Near).x - expected).abs() < 1e-5);
}

#[test]
fn scroll_progress_is_clamped_and_nan_ignored() {
    let mut p = tracker(600.0);
    p.set_scroll_progress(3.0);
    assert_eq!(p.scroll_progress(), 1.0);
    p.set_scroll_progress(-1.0);
    assert_eq!(p.scroll_progress(), 0.0);
    p.set_scroll_progress(0.25);
    p.set_scroll_progress(f32::NAN);
    assert_eq!(p.scroll_progress(), 0.25);
}

#[test]
fn non_finite_pointer_is_ignored() {
    let mut p = tracker(600.0);
    p.set_pointer(f32::NAN, 0.2);
    for _ in 0..10 {
        p.update();
    }
    assert_eq!(p.offset(DepthLayer::Mid), glam::Vec2::ZERO);
}
