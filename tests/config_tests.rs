// Host-side tests for configuration defaults, JSON overrides, validation and
// the fixed constants.
// The web crate is wasm-only, so its constants are included directly.

#![allow(dead_code)]
mod web_constants {
    include!("../src/constants.rs");
}

use backdrop_core::constants::*;
use backdrop_core::{ConfigError, DepthLayer, GeoConfig};
use web_constants::*;

fn invalid_field(json: &str) -> &'static str {
    match GeoConfig::from_json(json) {
        Err(ConfigError::Invalid { field, .. }) => field,
        Err(other) => panic!("expected Invalid, got {other}"),
        Ok(_) => panic!("expected {json} to be rejected"),
    }
}

#[test]
fn defaults_validate() {
    assert!(GeoConfig::default().validate().is_ok());
}

#[test]
fn default_level_table_shape() {
    let levels = GeoConfig::default().performance.levels;
    let caps: Vec<_> = levels.iter().map(|l| l.point_cap).collect();
    assert_eq!(caps, vec![150, 80, 60, 30]);
    assert!(levels[0].field_enabled && levels[0].music_reactive && levels[0].lines_enabled);
    assert!(!levels[2].lines_enabled && levels[2].streaks_enabled);
    assert!(!levels[3].streaks_enabled && !levels[3].music_reactive);
}

#[test]
fn mouse_smoothing_is_faster_than_scroll() {
    let p = GeoConfig::default().parallax;
    assert!(p.mouse.lerp > p.scroll.lerp);
    assert!(p.mouse.weight(DepthLayer::Far) < p.mouse.weight(DepthLayer::Mid));
    assert!(p.mouse.weight(DepthLayer::Mid) < p.mouse.weight(DepthLayer::Near));
    assert!(p.scroll.weight(DepthLayer::Near) < 1.0);
}

#[test]
fn partial_json_keeps_other_defaults() {
    let cfg = GeoConfig::from_json(
        r#"{ "points": { "count": 40 }, "colors": { "accent": [0, 200, 255] } }"#,
    )
    .unwrap();
    assert_eq!(cfg.points.count, 40);
    assert_eq!(cfg.points.max_alpha, GeoConfig::default().points.max_alpha);
    assert_eq!(cfg.colors.accent, [0, 200, 255]);
    assert_eq!(cfg.performance.levels.len(), 4);
    assert_eq!(cfg.ornaments.placements.len(), 2);
}

#[test]
fn empty_json_is_the_default() {
    let cfg = GeoConfig::from_json("{}").unwrap();
    assert_eq!(cfg.points.count, GeoConfig::default().points.count);
    assert_eq!(cfg.audio.fft_size, 256);
}

#[test]
fn parallax_tables_are_replaced_whole() {
    let cfg = GeoConfig::from_json(
        r#"{ "parallax": { "scroll": { "far": 0.1, "mid": 0.2, "near": 0.3, "lerp": 0.5 } } }"#,
    )
    .unwrap();
    assert_eq!(cfg.parallax.scroll.near, 0.3);
    assert_eq!(cfg.parallax.mouse.near, 16.0);
    assert!(matches!(
        GeoConfig::from_json(r#"{ "parallax": { "mouse": { "lerp": 0.2 } } }"#),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn custom_level_table() {
    let cfg = GeoConfig::from_json(
        r#"{ "performance": { "levels": [
            { "point_cap": 50, "lines_enabled": true, "streaks_enabled": false,
              "music_reactive": true, "field_enabled": false }
        ] } }"#,
    )
    .unwrap();
    assert_eq!(cfg.performance.levels.len(), 1);
    assert_eq!(cfg.performance.fps_threshold, 30.0);
}

#[test]
fn malformed_json_is_a_parse_error() {
    assert!(matches!(
        GeoConfig::from_json("{ points: "),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        GeoConfig::from_json(r#"{ "points": { "count": "many" } }"#),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn unusable_values_are_rejected() {
    assert_eq!(
        invalid_field(r#"{ "performance": { "levels": [] } }"#),
        "performance.levels"
    );
    assert_eq!(
        invalid_field(r#"{ "performance": { "fps_threshold": 0 } }"#),
        "performance.fps_threshold"
    );
    assert_eq!(
        invalid_field(
            r#"{ "parallax": { "mouse": { "far": 4, "mid": 10, "near": 16, "lerp": 0 } } }"#,
        ),
        "parallax.mouse.lerp"
    );
    assert_eq!(
        invalid_field(r#"{ "audio": { "music_lerp": 1.5 } }"#),
        "audio.music_lerp"
    );
    assert_eq!(invalid_field(r#"{ "audio": { "fft_size": 300 } }"#), "audio.fft_size");
    assert_eq!(
        invalid_field(r#"{ "audio": { "bass_split": 0.6 } }"#),
        "audio.bass_split"
    );
    assert_eq!(
        invalid_field(r#"{ "streaks": { "interval_ms": [6000, 2000] } }"#),
        "streaks.interval_ms"
    );
    assert_eq!(
        invalid_field(r#"{ "viewport": { "max_device_pixel_ratio": 0.5 } }"#),
        "viewport.max_device_pixel_ratio"
    );
}

#[test]
fn increasing_caps_are_rejected() {
    let mut cfg = GeoConfig::default();
    cfg.performance.levels[2].point_cap = 500;
    assert!(matches!(
        cfg.validate(),
        Err(ConfigError::Invalid {
            field: "performance.levels",
            ..
        })
    ));
}

#[test]
fn errors_render_readably() {
    let err = GeoConfig::from_json(r#"{ "audio": { "fft_size": 300 } }"#).unwrap_err();
    assert!(err.to_string().contains("audio.fft_size"));
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn constants_are_within_reasonable_bounds() {
    assert!(FRAME_BUDGET_MS > 16.0 && FRAME_BUDGET_MS < 17.0);
    assert!(MAX_FRAME_DT_MS > FRAME_BUDGET_MS);
    assert!(FPS_SAMPLE_WINDOW_MS > 0.0);
    assert!(WRAP_MARGIN_PX > 0.0);
    assert!(MUSIC_PRESENCE_EPS > 0.0 && MUSIC_PRESENCE_EPS < 0.1);
    assert_ne!(TERRAIN_NOISE_SEED, AURORA_NOISE_SEED);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn streak_spawn_box_sits_above_the_viewport() {
    assert!(STREAK_SPAWN_Y_MIN < STREAK_SPAWN_Y_MAX);
    assert!(STREAK_SPAWN_Y_MAX < 0.0);
    assert!(STREAK_SPAWN_X_BEFORE < 0.0 && STREAK_SPAWN_X_AFTER > 0.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn audio_watch_is_bounded() {
    assert!(AUDIO_WATCH_INTERVAL_MS > 0);
    assert!(AUDIO_WATCH_MAX_ATTEMPTS > 0);
    // gives up within a minute
    assert!(AUDIO_WATCH_INTERVAL_MS as u32 * AUDIO_WATCH_MAX_ATTEMPTS <= 60_000);
    assert!(!DEFAULT_AUDIO_SELECTOR.is_empty());
}
