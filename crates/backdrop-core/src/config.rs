//! Tunable settings for every layer of the background.
//!
//! [`GeoConfig::default`] is the reference look. Hosts can override any subset
//! through JSON; missing fields keep their defaults.

use crate::error::ConfigError;
use crate::parallax::DepthLayer;
use serde::Deserialize;

pub type Rgb = [u8; 3];

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GeoConfig {
    pub colors: Colors,
    pub points: PointsConfig,
    pub lines: LinesConfig,
    pub terrain: TerrainConfig,
    pub streaks: StreakConfig,
    pub ornaments: OrnamentConfig,
    pub aurora: AuroraConfig,
    pub parallax: ParallaxConfig,
    pub audio: AudioConfig,
    pub performance: PerformanceConfig,
    pub vignette: VignetteConfig,
    pub viewport: ViewportConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Colors {
    pub accent: Rgb,
    pub light: Rgb,
    pub shade: Rgb,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            accent: [255, 122, 24],
            light: [255, 255, 255],
            shade: [0, 0, 0],
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PointsConfig {
    pub count: usize,
    pub min_alpha: f32,
    pub max_alpha: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub drift_speed: f32,  // px per frame budget
    pub accent_ratio: f32, // share of accent-colored points
}

impl Default for PointsConfig {
    fn default() -> Self {
        Self {
            count: 150,
            min_alpha: 0.12,
            max_alpha: 0.35,
            min_radius: 1.0,
            max_radius: 1.5,
            drift_speed: 0.15,
            accent_ratio: 0.08,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LinesConfig {
    pub max_distance: f32,
    pub max_connections: usize, // per point
    pub line_width: f32,
    pub min_alpha: f32, // at max_distance
    pub max_alpha: f32, // touching
    pub accent_ratio: f32,
}

impl Default for LinesConfig {
    fn default() -> Self {
        Self {
            max_distance: 120.0,
            max_connections: 3,
            line_width: 0.5,
            min_alpha: 0.06,
            max_alpha: 0.18,
            accent_ratio: 0.08,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub layers: usize,
    pub height_ratio: f32, // share of the viewport bottom the silhouettes occupy
    pub segment_count: usize,
    pub noise_scale: f32,
    pub noise_speed: f32,
    pub line_width: f32,
    pub back_alpha: f32,
    pub front_alpha: f32,
    pub ridge_divisions: usize,
    pub ridge_alpha_scale: f32,
    pub parallax_x: f32, // fraction of the far-layer offset applied
    pub parallax_y: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            layers: 4,
            height_ratio: 0.30,
            segment_count: 80,
            noise_scale: 0.004,
            noise_speed: 0.0003,
            line_width: 0.8,
            back_alpha: 0.12,
            front_alpha: 0.25,
            ridge_divisions: 12,
            ridge_alpha_scale: 0.3,
            parallax_x: 0.5,
            parallax_y: 0.3,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct StreakConfig {
    pub interval_ms: [f32; 2],
    pub speed: [f32; 2], // px per frame budget
    pub length: [f32; 2],
    pub life_ms: f32,
    pub head_size: f32,
    pub line_width: f32,
    pub angle_deg: f32,
    pub glow_radius: f32,
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            interval_ms: [2000.0, 6000.0],
            speed: [4.0, 8.0],
            length: [60.0, 160.0],
            life_ms: 4000.0,
            head_size: 3.0,
            line_width: 1.5,
            angle_deg: -30.0,
            glow_radius: 12.0,
        }
    }
}

/// One row of the ornament position table.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct OrnamentPlacement {
    pub x_ratio: f32,
    pub y_ratio: f32,
    pub anchor_count: usize,
    pub chord_limit: usize,
    pub spokes: bool,
    pub radius_scale: f32,
    pub spin_multiplier: f32,
}

impl Default for OrnamentPlacement {
    fn default() -> Self {
        Self {
            x_ratio: 0.5,
            y_ratio: 0.5,
            anchor_count: 6,
            chord_limit: 12,
            spokes: false,
            radius_scale: 1.0,
            spin_multiplier: 1.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct OrnamentConfig {
    pub base_radius: [f32; 2],
    pub breathe_period_sec: f32,
    pub breathe_amp: f32,
    pub music_multiplier: f32,
    pub base_spin: f32,      // rad/s
    pub spin_boost_max: f32, // rad/s added at full bass
    pub angle_jitter: f32,
    pub ring_opacity: f32,
    pub ring_stroke_width: f32,
    pub ring_glow_opacity: f32,
    pub ring_glow_spread: f32,
    pub inside_opacity: f32,
    pub inside_stroke_width: f32,
    pub placements: Vec<OrnamentPlacement>,
}

impl Default for OrnamentConfig {
    fn default() -> Self {
        Self {
            base_radius: [120.0, 200.0],
            breathe_period_sec: 6.0,
            breathe_amp: 0.05,
            music_multiplier: 1.5,
            base_spin: 0.12,
            spin_boost_max: 0.9,
            angle_jitter: 0.12,
            ring_opacity: 0.32,
            ring_stroke_width: 1.2,
            ring_glow_opacity: 0.12,
            ring_glow_spread: 1.6,
            inside_opacity: 0.14,
            inside_stroke_width: 0.8,
            placements: vec![
                OrnamentPlacement {
                    x_ratio: 0.78,
                    y_ratio: 0.32,
                    anchor_count: 7,
                    chord_limit: 12,
                    spokes: true,
                    radius_scale: 1.0,
                    spin_multiplier: 1.0,
                },
                OrnamentPlacement {
                    x_ratio: 0.18,
                    y_ratio: 0.72,
                    anchor_count: 5,
                    chord_limit: 8,
                    spokes: false,
                    radius_scale: 0.7,
                    spin_multiplier: -0.6,
                },
            ],
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AuroraBlob {
    pub x: f32, // viewport ratios
    pub y: f32,
    pub radius: f32, // ratio of the larger viewport side
    pub color: Rgb,
}

impl Default for AuroraBlob {
    fn default() -> Self {
        Self {
            x: 0.5,
            y: 0.5,
            radius: 0.5,
            color: [40, 20, 80],
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AuroraConfig {
    pub enabled: bool,
    pub intensity: f32,
    pub drift_speed: f32,
    pub drift_amplitude: f32,
    pub scroll_hue_shift: f32, // degrees at either end of the page
    pub blobs: Vec<AuroraBlob>,
}

impl Default for AuroraConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            intensity: 0.14,
            drift_speed: 0.00004,
            drift_amplitude: 0.08,
            scroll_hue_shift: 18.0,
            blobs: vec![
                AuroraBlob {
                    x: 0.2,
                    y: 0.25,
                    radius: 0.55,
                    color: [255, 122, 24],
                },
                AuroraBlob {
                    x: 0.8,
                    y: 0.6,
                    radius: 0.6,
                    color: [60, 40, 140],
                },
                AuroraBlob {
                    x: 0.5,
                    y: 0.95,
                    radius: 0.45,
                    color: [20, 90, 120],
                },
            ],
        }
    }
}

/// Per-layer displacement weights plus the smoothing factor shared by all three.
///
/// Overrides must give all four fields; mouse and scroll tables share no defaults.
#[derive(Clone, Debug, Deserialize)]
pub struct LayerWeights {
    pub far: f32,
    pub mid: f32,
    pub near: f32,
    pub lerp: f32,
}

impl LayerWeights {
    pub fn weight(&self, layer: DepthLayer) -> f32 {
        match layer {
            DepthLayer::Far => self.far,
            DepthLayer::Mid => self.mid,
            DepthLayer::Near => self.near,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ParallaxConfig {
    pub mouse: LayerWeights,  // px at full pointer deflection
    pub scroll: LayerWeights, // multiples of scroll progress * viewport height
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            mouse: LayerWeights {
                far: 4.0,
                mid: 10.0,
                near: 16.0,
                lerp: 0.08,
            },
            scroll: LayerWeights {
                far: 0.2,
                mid: 0.45,
                near: 0.9,
                lerp: 0.06,
            },
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub fft_size: u32,
    pub smoothing_time_constant: f64,
    pub bass_split: f32, // fraction of bins ending the bass band
    pub mid_split: f32,  // fraction of bins ending the mid band
    pub energy_divisor: f32,
    pub bass_divisor: f32,
    pub mid_divisor: f32,
    pub high_divisor: f32,
    pub music_lerp: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            fft_size: 256,
            smoothing_time_constant: 0.8,
            bass_split: 0.15,
            mid_split: 0.5,
            energy_divisor: 200.0,
            bass_divisor: 220.0,
            mid_divisor: 200.0,
            high_divisor: 180.0,
            music_lerp: 0.12,
        }
    }
}

/// Everything a quality tier switches on or off.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct QualitySettings {
    pub point_cap: usize,
    pub lines_enabled: bool,
    pub streaks_enabled: bool,
    pub music_reactive: bool,
    pub field_enabled: bool,
}

impl QualitySettings {
    /// Used when a level table is empty.
    pub const MINIMAL: QualitySettings = QualitySettings {
        point_cap: 0,
        lines_enabled: false,
        streaks_enabled: false,
        music_reactive: false,
        field_enabled: false,
    };
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    pub fps_threshold: f64,
    pub degrade_after_ms: f64,
    pub sample_window_ms: f64,
    pub levels: Vec<QualitySettings>,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            fps_threshold: 30.0,
            degrade_after_ms: 2000.0,
            sample_window_ms: crate::constants::FPS_SAMPLE_WINDOW_MS,
            levels: vec![
                // full quality
                QualitySettings {
                    point_cap: 150,
                    lines_enabled: true,
                    streaks_enabled: true,
                    music_reactive: true,
                    field_enabled: true,
                },
                QualitySettings {
                    point_cap: 80,
                    lines_enabled: true,
                    streaks_enabled: true,
                    music_reactive: true,
                    field_enabled: true,
                },
                QualitySettings {
                    point_cap: 60,
                    lines_enabled: false,
                    streaks_enabled: true,
                    music_reactive: false,
                    field_enabled: false,
                },
                // static dots only
                QualitySettings {
                    point_cap: 30,
                    lines_enabled: false,
                    streaks_enabled: false,
                    music_reactive: false,
                    field_enabled: false,
                },
            ],
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct VignetteConfig {
    pub strength: f32,
    pub radius: f32, // clear zone, 0 = center .. 1 = edge
    pub edge_darken: f32,
}

impl Default for VignetteConfig {
    fn default() -> Self {
        Self {
            strength: 0.55,
            radius: 0.45,
            edge_darken: 0.35,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub max_device_pixel_ratio: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            max_device_pixel_ratio: 2.0,
        }
    }
}

impl GeoConfig {
    /// Parse a (possibly partial) JSON override and validate the result.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GeoConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let perf = &self.performance;
        if perf.levels.is_empty() {
            return Err(ConfigError::invalid(
                "performance.levels",
                "at least one level is required",
            ));
        }
        if perf
            .levels
            .windows(2)
            .any(|w| w[1].point_cap > w[0].point_cap)
        {
            return Err(ConfigError::invalid(
                "performance.levels",
                "point caps must not increase with level",
            ));
        }
        if !(perf.fps_threshold > 0.0) {
            return Err(ConfigError::invalid(
                "performance.fps_threshold",
                "must be positive",
            ));
        }
        if !(perf.degrade_after_ms >= 0.0) {
            return Err(ConfigError::invalid(
                "performance.degrade_after_ms",
                "must not be negative",
            ));
        }
        if !(perf.sample_window_ms > 0.0) {
            return Err(ConfigError::invalid(
                "performance.sample_window_ms",
                "must be positive",
            ));
        }

        check_lerp("parallax.mouse.lerp", self.parallax.mouse.lerp)?;
        check_lerp("parallax.scroll.lerp", self.parallax.scroll.lerp)?;
        check_lerp("audio.music_lerp", self.audio.music_lerp)?;

        let audio = &self.audio;
        if !(audio.bass_split > 0.0 && audio.bass_split < audio.mid_split && audio.mid_split < 1.0)
        {
            return Err(ConfigError::invalid(
                "audio.bass_split",
                "need 0 < bass_split < mid_split < 1",
            ));
        }
        if !audio.fft_size.is_power_of_two() || !(32..=32768).contains(&audio.fft_size) {
            return Err(ConfigError::invalid(
                "audio.fft_size",
                "must be a power of two in 32..=32768",
            ));
        }
        let divisors = [
            audio.energy_divisor,
            audio.bass_divisor,
            audio.mid_divisor,
            audio.high_divisor,
        ];
        if divisors.iter().any(|d| !(*d > 0.0)) {
            return Err(ConfigError::invalid("audio.*_divisor", "must be positive"));
        }

        let streaks = &self.streaks;
        check_range("streaks.interval_ms", streaks.interval_ms)?;
        check_range("streaks.speed", streaks.speed)?;
        check_range("streaks.length", streaks.length)?;
        if !(streaks.life_ms > 0.0) {
            return Err(ConfigError::invalid("streaks.life_ms", "must be positive"));
        }

        check_range("ornaments.base_radius", self.ornaments.base_radius)?;
        if !(self.ornaments.breathe_period_sec > 0.0) {
            return Err(ConfigError::invalid(
                "ornaments.breathe_period_sec",
                "must be positive",
            ));
        }
        if self
            .ornaments
            .placements
            .iter()
            .any(|p| p.anchor_count < 3)
        {
            return Err(ConfigError::invalid(
                "ornaments.placements.anchor_count",
                "an inscribed polygon needs at least 3 anchors",
            ));
        }

        if self.points.min_radius > self.points.max_radius
            || self.points.min_alpha > self.points.max_alpha
        {
            return Err(ConfigError::invalid("points", "inverted radius or alpha range"));
        }
        if !(self.lines.max_distance > 0.0) {
            return Err(ConfigError::invalid("lines.max_distance", "must be positive"));
        }
        if self.terrain.layers == 0 || self.terrain.segment_count == 0 {
            return Err(ConfigError::invalid(
                "terrain",
                "layers and segment_count must be at least 1",
            ));
        }
        if !(self.viewport.max_device_pixel_ratio >= 1.0) {
            return Err(ConfigError::invalid(
                "viewport.max_device_pixel_ratio",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

fn check_lerp(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} is outside (0, 1]")))
    }
}

fn check_range(field: &'static str, range: [f32; 2]) -> Result<(), ConfigError> {
    if range[0].is_finite() && range[1].is_finite() && range[0] <= range[1] {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("[{}, {}] is not an ordered range", range[0], range[1]),
        ))
    }
}
