// Host-side tests for pure input functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}

use input::*;

#[test]
fn pointer_normalizes_to_unit_square() {
    assert_eq!(normalize(0.0, 0.0, 800.0, 600.0), [0.0, 0.0]);
    assert_eq!(normalize(400.0, 300.0, 800.0, 600.0), [0.5, 0.5]);
    assert_eq!(normalize(800.0, 600.0, 800.0, 600.0), [1.0, 1.0]);
}

#[test]
fn pointer_outside_window_is_clamped() {
    assert_eq!(normalize(-50.0, 900.0, 800.0, 600.0), [0.0, 1.0]);
}

#[test]
fn zero_sized_window_reads_centered() {
    assert_eq!(normalize(10.0, 10.0, 0.0, 600.0), [0.5, 0.5]);
}

#[test]
fn scroll_fraction_spans_the_scrollable_range() {
    assert_eq!(scroll_fraction(0.0, 3000.0, 1000.0), 0.0);
    assert_eq!(scroll_fraction(1000.0, 3000.0, 1000.0), 0.5);
    assert_eq!(scroll_fraction(2000.0, 3000.0, 1000.0), 1.0);
}

#[test]
fn scroll_fraction_handles_short_pages() {
    // page no taller than the window
    assert_eq!(scroll_fraction(0.0, 800.0, 1000.0), 0.0);
    // overscroll bounce
    assert_eq!(scroll_fraction(2100.0, 3000.0, 1000.0), 1.0);
    assert_eq!(scroll_fraction(-40.0, 3000.0, 1000.0), 0.0);
}
