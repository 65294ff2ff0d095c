// Host-side tests for the frame-rate governor.

use backdrop_core::{GeoConfig, PerformanceConfig, QualityGovernor};

fn perf() -> PerformanceConfig {
    GeoConfig::default().performance
}

/// Tick every `step_ms` from `from_ms` (exclusive) through `to_ms` (inclusive).
fn run(g: &mut QualityGovernor, from_ms: u32, to_ms: u32, step_ms: u32) {
    let mut t = from_ms + step_ms;
    while t <= to_ms {
        g.tick(t as f64);
        t += step_ms;
    }
}

#[test]
fn starts_at_full_quality() {
    let g = QualityGovernor::new(perf(), 0.0);
    assert_eq!(g.level(), 0);
    assert_eq!(g.settings().point_cap, 150);
    assert!(g.settings().field_enabled);
}

#[test]
fn steady_sixty_fps_never_degrades() {
    let mut g = QualityGovernor::new(perf(), 0.0);
    for i in 0..1200 {
        g.tick(i as f64 * 1000.0 / 60.0);
    }
    assert_eq!(g.level(), 0);
    assert!((59..=61).contains(&g.fps()));
}

#[test]
fn sustained_low_fps_degrades_after_grace() {
    let mut g = QualityGovernor::new(perf(), 0.0);
    g.tick(0.0);
    run(&mut g, 0, 2450, 50);
    assert_eq!(g.level(), 0, "grace period not yet exceeded");

    g.tick(2500.0);
    assert_eq!(g.level(), 1);
    assert_eq!(g.settings().point_cap, 80);
    assert_eq!(g.fps(), 20);
}

#[test]
fn one_step_per_grace_period() {
    let mut g = QualityGovernor::new(perf(), 0.0);
    g.tick(0.0);
    run(&mut g, 0, 2500, 50);
    assert_eq!(g.level(), 1);

    // the timer restarts after a step
    run(&mut g, 2500, 4950, 50);
    assert_eq!(g.level(), 1);
    g.tick(5000.0);
    assert_eq!(g.level(), 2);
}

#[test]
fn recovery_never_restores_quality() {
    let mut g = QualityGovernor::new(perf(), 0.0);
    g.tick(0.0);
    run(&mut g, 0, 2500, 50);
    assert_eq!(g.level(), 1);

    run(&mut g, 2500, 20_000, 10);
    assert_eq!(g.level(), 1);
    assert!(g.fps() >= 99);
}

#[test]
fn brief_dips_reset_the_timer() {
    let mut g = QualityGovernor::new(perf(), 0.0);
    g.tick(0.0);
    let mut t = 0;
    for _ in 0..10 {
        // one slow second, then half a fast second
        run(&mut g, t, t + 1000, 50);
        t += 1000;
        run(&mut g, t, t + 500, 10);
        t += 500;
    }
    assert_eq!(g.level(), 0);
}

#[test]
fn stops_at_the_last_level() {
    let mut g = QualityGovernor::new(perf(), 0.0);
    g.tick(0.0);
    run(&mut g, 0, 60_000, 250);
    assert_eq!(g.level(), 3);
    assert!(g.is_at_floor());
    assert_eq!(g.settings().point_cap, 30);
    assert!(!g.settings().lines_enabled);
    assert!(!g.settings().streaks_enabled);
}

#[test]
fn level_is_monotonic_and_never_skips() {
    let mut g = QualityGovernor::new(perf(), 0.0);
    let mut prev = 0;
    let mut t = 0.0;
    for i in 0..4000 {
        // alternating stretches of slow and fast frames
        t += if (i / 120) % 3 == 0 { 8.0 } else { 70.0 };
        let level = g.tick(t);
        assert!(level >= prev, "level went back up at {t}");
        assert!(level <= prev + 1, "skipped a level at {t}");
        prev = level;
    }
}

#[test]
fn resync_discards_time_spent_paused() {
    let mut g = QualityGovernor::new(perf(), 0.0);
    g.tick(0.0);
    // a long gap would otherwise read as a single very slow window
    g.resync(10_000.0);
    run(&mut g, 10_000, 13_000, 16);
    assert_eq!(g.level(), 0);
}

#[test]
fn empty_level_table_falls_back_to_minimal() {
    let mut cfg = perf();
    cfg.levels.clear();
    let mut g = QualityGovernor::new(cfg, 0.0);
    run(&mut g, 0, 5000, 100);
    assert_eq!(g.level(), 0);
    assert_eq!(g.settings().point_cap, 0);
}
