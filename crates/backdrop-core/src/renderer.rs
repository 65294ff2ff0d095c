//! Frame pipeline and layered drawing.
//!
//! One [`FrameRenderer`] owns every other component of a mounted background.
//! Each frame runs governor -> parallax -> analyzer -> scene -> draw, and the
//! draw pass walks a fixed back-to-front [`Layer`] plan.

use crate::analyzer::{AudioEnergy, FrequencyAnalyzer, SignalGraph};
use crate::config::{GeoConfig, LinesConfig, QualitySettings};
use crate::constants::*;
use crate::error::ConfigError;
use crate::lifecycle::{FrameScheduler, RenderLoop};
use crate::noise::NoiseField;
use crate::paint::{rotate_hue, Canvas2d, Gradient, Paint, Rgba};
use crate::parallax::{DepthLayer, ParallaxTracker};
use crate::quality::QualityGovernor;
use crate::scene::{BackgroundPoint, SceneState};
use glam::Vec2;
use smallvec::SmallVec;
use std::f32::consts::TAU;

/// Draw layers, in back-to-front order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    GradientField,
    Terrain,
    Points,
    Ornaments,
    Streaks,
    Vignette,
}

pub type FramePlan = SmallVec<[Layer; 6]>;

/// Layers drawn for a quality tier.
pub fn frame_plan(settings: &QualitySettings, field_configured: bool) -> FramePlan {
    let mut plan = FramePlan::new();
    if settings.field_enabled && field_configured {
        plan.push(Layer::GradientField);
    }
    plan.push(Layer::Terrain);
    plan.push(Layer::Points);
    plan.push(Layer::Ornaments);
    if settings.streaks_enabled {
        plan.push(Layer::Streaks);
    }
    plan.push(Layer::Vignette);
    plan
}

/// CSS size of the drawing area plus the (capped) device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl Viewport {
    /// Sanitizes layout reads: zero, negative or non-finite sizes become 1px.
    /// The ratio is capped at `max_ratio` (never below 1); ratios under 1 are
    /// kept, and a missing or non-positive ratio reads as 1.
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32, max_ratio: f32) -> Self {
        let side = |v: f32| if v.is_finite() && v >= 1.0 { v } else { 1.0 };
        let ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(max_ratio.max(1.0))
        } else {
            1.0
        };
        Self {
            width: side(width),
            height: side(height),
            pixel_ratio: ratio,
        }
    }

    /// Backing store size in device pixels.
    pub fn backing_size(&self) -> (u32, u32) {
        (
            ((self.width * self.pixel_ratio).round() as u32).max(1),
            ((self.height * self.pixel_ratio).round() as u32).max(1),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProximityLink {
    pub a: usize,
    pub b: usize,
    pub alpha: f32,
}

/// Greedy proximity pairs: for each point in order, the first
/// `max_connections` later points closer than `max_distance`.
pub fn proximity_links(points: &[BackgroundPoint], cfg: &LinesConfig) -> Vec<ProximityLink> {
    let mut links = Vec::new();
    for (i, a) in points.iter().enumerate() {
        let mut connections = 0;
        for (j, b) in points.iter().enumerate().skip(i + 1) {
            if connections >= cfg.max_connections {
                break;
            }
            let dist = a.position.distance(b.position);
            if dist < cfg.max_distance {
                links.push(ProximityLink {
                    a: i,
                    b: j,
                    alpha: lerp(cfg.max_alpha, cfg.min_alpha, dist / cfg.max_distance),
                });
                connections += 1;
            }
        }
    }
    links
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

// Stable 0..1 value per point pair so highlighted lines don't flicker
#[inline]
fn pair_unit(a: usize, b: usize) -> f32 {
    let mut x = ((a as u64) << 32) | b as u64;
    x ^= x >> 33;
    x = x.wrapping_mul(0xff51_afd7_ed55_8ccd);
    x ^= x >> 33;
    (x >> 40) as f32 / (1u64 << 24) as f32
}

pub struct FrameRenderer<G: SignalGraph> {
    config: GeoConfig,
    terrain_noise: NoiseField,
    aurora_noise: NoiseField,
    scene: SceneState,
    parallax: ParallaxTracker,
    analyzer: FrequencyAnalyzer<G>,
    governor: QualityGovernor,
    smoothed: AudioEnergy,
    viewport: Viewport,
    time_sec: f64,
    last_frame_ms: Option<f64>,
    frame_loop: RenderLoop,
}

impl<G: SignalGraph> FrameRenderer<G> {
    /// Validate `config` and build every component. `seed` drives the scene layout.
    pub fn new(
        config: GeoConfig,
        viewport: Viewport,
        seed: u64,
        now_ms: f64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let scene = SceneState::new(&config, viewport.width, viewport.height, seed);
        let parallax = ParallaxTracker::new(config.parallax.clone(), viewport.height);
        let analyzer = FrequencyAnalyzer::new(config.audio.clone());
        let governor = QualityGovernor::new(config.performance.clone(), now_ms);
        Ok(Self {
            terrain_noise: NoiseField::new(TERRAIN_NOISE_SEED),
            aurora_noise: NoiseField::new(AURORA_NOISE_SEED),
            scene,
            parallax,
            analyzer,
            governor,
            smoothed: AudioEnergy::SILENT,
            viewport,
            time_sec: 0.0,
            last_frame_ms: None,
            frame_loop: RenderLoop::default(),
            config,
        })
    }

    pub fn config(&self) -> &GeoConfig {
        &self.config
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn parallax(&self) -> &ParallaxTracker {
        &self.parallax
    }

    pub fn parallax_mut(&mut self) -> &mut ParallaxTracker {
        &mut self.parallax
    }

    pub fn analyzer(&self) -> &FrequencyAnalyzer<G> {
        &self.analyzer
    }

    pub fn analyzer_mut(&mut self) -> &mut FrequencyAnalyzer<G> {
        &mut self.analyzer
    }

    pub fn governor(&self) -> &QualityGovernor {
        &self.governor
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Scene time driving drift and breathing, in seconds.
    pub fn elapsed_sec(&self) -> f64 {
        self.time_sec
    }

    pub fn smoothed_energy(&self) -> AudioEnergy {
        self.smoothed
    }

    pub fn is_running(&self) -> bool {
        self.frame_loop.is_running()
    }

    pub fn pending_frame(&self) -> Option<i32> {
        self.frame_loop.pending()
    }

    /// Apply a new viewport and reset the canvas transform to its pixel ratio.
    /// Call before the next draw; the backing store must already be resized.
    pub fn resize(&mut self, viewport: Viewport, canvas: &mut impl Canvas2d) {
        self.viewport = viewport;
        self.scene.resize(viewport.width, viewport.height);
        self.parallax.set_viewport_height(viewport.height);
        canvas.reset_transform(viewport.pixel_ratio);
        log::debug!(
            "[renderer] resized to {}x{} @{}x",
            viewport.width,
            viewport.height,
            viewport.pixel_ratio
        );
    }

    /// Begin the frame loop. A no-op while running or after destroy.
    pub fn start(&mut self, scheduler: &mut impl FrameScheduler) -> bool {
        if !self.frame_loop.start(scheduler) {
            return false;
        }
        self.last_frame_ms = None;
        log::info!("[renderer] started");
        true
    }

    pub fn stop(&mut self, scheduler: &mut impl FrameScheduler) {
        if self.frame_loop.is_running() {
            log::info!("[renderer] stopped");
        }
        self.frame_loop.stop(scheduler);
    }

    /// Stop for good and release the audio graph.
    pub fn destroy(&mut self, scheduler: &mut impl FrameScheduler) {
        if self.frame_loop.is_destroyed() {
            return;
        }
        self.frame_loop.destroy(scheduler);
        self.analyzer.destroy();
        log::info!("[renderer] destroyed");
    }

    /// Frame callback body: runs one tick if the loop is live and chains the next callback.
    pub fn on_frame(
        &mut self,
        now_ms: f64,
        canvas: &mut impl Canvas2d,
        scheduler: &mut impl FrameScheduler,
    ) -> Option<FramePlan> {
        if !self.frame_loop.begin_frame() {
            return None;
        }
        let plan = self.tick(now_ms, canvas);
        self.frame_loop.end_frame(scheduler);
        Some(plan)
    }

    /// Advance every component by the time since the previous tick, then draw.
    pub fn tick(&mut self, now_ms: f64, canvas: &mut impl Canvas2d) -> FramePlan {
        let dt_ms = match self.last_frame_ms {
            Some(last) => (now_ms - last) as f32,
            None => {
                // time spent stopped must not count as slow frames
                self.governor.resync(now_ms);
                0.0
            }
        };
        self.last_frame_ms = Some(now_ms);

        self.governor.tick(now_ms);
        let settings = self.governor.settings();
        self.parallax.update();
        let raw = self.analyzer.update();
        self.smoothed.approach(&raw, self.config.audio.music_lerp);

        let bass = if settings.music_reactive {
            self.smoothed.bass
        } else {
            0.0
        };
        let dt = self.scene.advance(dt_ms, &settings, bass);
        self.time_sec += dt as f64 * 0.001;

        self.draw(canvas)
    }

    fn has_live_music(&self, settings: &QualitySettings) -> bool {
        settings.music_reactive
            && self.analyzer.is_connected()
            && self.smoothed.energy > MUSIC_PRESENCE_EPS
    }

    /// Clear and draw every enabled layer. Returns the plan that was drawn.
    pub fn draw(&self, canvas: &mut impl Canvas2d) -> FramePlan {
        let settings = self.governor.settings();
        let Viewport { width, height, .. } = self.viewport;
        canvas.clear_rect(0.0, 0.0, width, height);

        let plan = frame_plan(&settings, self.config.aurora.enabled);
        for layer in &plan {
            match layer {
                Layer::GradientField => self.draw_gradient_field(canvas),
                Layer::Terrain => self.draw_terrain(canvas, self.parallax.offset(DepthLayer::Far)),
                Layer::Points => {
                    self.draw_points(canvas, self.parallax.offset(DepthLayer::Far), &settings)
                }
                Layer::Ornaments => {
                    self.draw_ornaments(canvas, self.parallax.offset(DepthLayer::Mid), &settings)
                }
                Layer::Streaks => self.draw_streaks(canvas, self.parallax.offset(DepthLayer::Near)),
                Layer::Vignette => self.draw_vignette(canvas),
            }
        }
        plan
    }

    fn draw_gradient_field(&self, canvas: &mut impl Canvas2d) {
        let cfg = &self.config.aurora;
        let Viewport { width: w, height: h, .. } = self.viewport;
        let t = self.time_sec;
        let drift = |rate: f32| (t * (cfg.drift_speed * rate) as f64) as f32;
        let noise = &self.aurora_noise;
        let hue_shift = cfg.scroll_hue_shift * (self.parallax.scroll_progress() * 2.0 - 1.0);

        for (i, blob) in cfg.blobs.iter().enumerate() {
            let fi = i as f32;
            let nx = noise.sample_2d(fi * 7.3 + drift(1000.0), fi * 3.1)
                * cfg.drift_amplitude;
            let ny = noise.sample_2d(fi * 2.7 + drift(800.0), fi * 5.9 + 100.0)
                * cfg.drift_amplitude;
            let bx = (blob.x + nx) * w;
            let by = (blob.y + ny) * h;
            let br = blob.radius * w.max(h);

            let rgb = if cfg.scroll_hue_shift > 0.0 {
                rotate_hue(blob.color, hue_shift)
            } else {
                blob.color
            };
            let breath = noise.sample_2d((t * 0.05) as f32 + fi * 20.0, fi * 13.0) * 0.5 + 0.5;
            let alpha = cfg.intensity * lerp(0.6, 1.0, breath);

            let grad = Gradient::radial(bx, by, 0.0, br)
                .stop(0.0, Rgba::new(rgb, alpha))
                .stop(0.5, Rgba::new(rgb, alpha * 0.4))
                .stop(1.0, Rgba::new(rgb, 0.0));
            canvas.set_fill(&grad.into());
            canvas.fill_rect(0.0, 0.0, w, h);
        }
    }

    fn draw_terrain(&self, canvas: &mut impl Canvas2d, offset: Vec2) {
        let cfg = &self.config.terrain;
        let light = self.config.colors.light;
        let Viewport { width: w, height: h, .. } = self.viewport;
        let base_y = h * (1.0 - cfg.height_ratio);
        let segments = cfg.segment_count.max(1);
        let ridge_step = (segments / cfg.ridge_divisions.max(1)).max(1);
        let drift = (self.time_sec * (cfg.noise_speed * 1000.0) as f64) as f32;

        canvas.save();
        canvas.translate(offset.x * cfg.parallax_x, offset.y * cfg.parallax_y);

        for layer in 0..cfg.layers {
            let ratio = if cfg.layers > 1 {
                layer as f32 / (cfg.layers - 1) as f32
            } else {
                1.0
            };
            let alpha = lerp(cfg.back_alpha, cfg.front_alpha, ratio);
            let height_scale = lerp(0.3, 1.0, ratio);
            let layer_y = base_y + (1.0 - ratio) * (h * cfg.height_ratio * 0.3);
            // per-layer phase keeps silhouettes from moving in lockstep
            let noise_offset = layer as f32 * 100.0 + drift;
            let amplitude = h * cfg.height_ratio * height_scale * 0.5;
            let vertex = |i: usize| {
                let x = (i as f32 / segments as f32) * (w + 40.0) - 20.0;
                let n = self
                    .terrain_noise
                    .sample_2d(x * cfg.noise_scale + noise_offset, layer as f32 * 10.0);
                Vec2::new(x, layer_y - n * amplitude)
            };

            canvas.set_stroke(&Rgba::new(light, alpha).into());
            canvas.set_line_width(cfg.line_width);
            canvas.begin_path();
            for i in 0..=segments {
                let v = vertex(i);
                if i == 0 {
                    canvas.move_to(v.x, v.y);
                } else {
                    canvas.line_to(v.x, v.y);
                }
            }
            canvas.stroke();

            canvas.set_stroke(&Rgba::new(light, alpha * cfg.ridge_alpha_scale).into());
            for i in (0..=segments).step_by(ridge_step) {
                let v = vertex(i);
                canvas.line(v.x, v.y, v.x, h);
            }
        }

        canvas.restore();
    }

    fn draw_points(&self, canvas: &mut impl Canvas2d, offset: Vec2, settings: &QualitySettings) {
        let lines = &self.config.lines;
        let colors = &self.config.colors;
        let points = self.scene.points();

        canvas.save();
        canvas.translate(offset.x, offset.y);

        if settings.lines_enabled {
            canvas.set_line_width(lines.line_width);
            for link in proximity_links(points, lines) {
                let (a, b) = (&points[link.a], &points[link.b]);
                let accent = (a.accent || b.accent)
                    && pair_unit(link.a, link.b) < lines.accent_ratio * 10.0;
                let rgb = if accent { colors.accent } else { colors.light };
                canvas.set_stroke(&Rgba::new(rgb, link.alpha).into());
                canvas.line(a.position.x, a.position.y, b.position.x, b.position.y);
            }
        }

        for p in points {
            let rgb = if p.accent { colors.accent } else { colors.light };
            canvas.set_fill(&Rgba::new(rgb, p.alpha).into());
            canvas.dot(p.position.x, p.position.y, p.radius);
        }

        canvas.restore();
    }

    fn draw_ornaments(
        &self,
        canvas: &mut impl Canvas2d,
        offset: Vec2,
        settings: &QualitySettings,
    ) {
        let cfg = &self.config.ornaments;
        let accent = self.config.colors.accent;
        let Viewport { width: w, height: h, .. } = self.viewport;
        let live = self.has_live_music(settings);
        let bass_e = if live {
            (self.smoothed.bass * cfg.music_multiplier).clamp(0.0, 1.0)
        } else {
            0.0
        };

        canvas.save();
        canvas.translate(offset.x, offset.y);

        for c in self.scene.ornaments() {
            let center = Vec2::new(w * c.x_ratio, h * c.y_ratio);

            // idle breathing
            let cycle = (self.time_sec / cfg.breathe_period_sec as f64).fract() as f32;
            let idle = (cycle * TAU + c.phase).sin();
            let breath_weight = if live { 0.45 + bass_e * 0.55 } else { 0.28 };
            let outer_r = c.base_radius * (1.0 + idle * cfg.breathe_amp * breath_weight);

            let glow_alpha = cfg.ring_glow_opacity * (0.45 + bass_e * 1.2);
            let glow_r = outer_r * cfg.ring_glow_spread;
            let glow = Gradient::radial(center.x, center.y, outer_r * 0.45, glow_r)
                .stop(0.0, Rgba::new(accent, glow_alpha.clamp(0.02, 0.2)))
                .stop(0.7, Rgba::new(accent, (glow_alpha * 0.18).clamp(0.01, 0.06)))
                .stop(1.0, Rgba::new(accent, 0.0));
            canvas.set_fill(&glow.into());
            canvas.dot(center.x, center.y, glow_r);

            let ring_alpha = (cfg.ring_opacity + bass_e * 0.22).clamp(0.2, 0.7);
            canvas.set_stroke(&Rgba::new(accent, ring_alpha).into());
            canvas.set_line_width(cfg.ring_stroke_width + bass_e * 2.0);
            canvas.begin_path();
            canvas.circle(center.x, center.y, outer_r);
            canvas.stroke();

            let anchors = c.anchor_points(center, outer_r);
            let inside_alpha = cfg.inside_opacity
                + if live {
                    bass_e * 0.16
                } else {
                    (idle * 0.5 + 0.5) * 0.05
                };
            canvas.set_stroke(&Rgba::new(accent, inside_alpha.clamp(0.08, 0.34)).into());
            canvas.set_line_width(cfg.inside_stroke_width);
            for &(a, b) in &c.connections {
                if let (Some(pa), Some(pb)) = (anchors.get(a), anchors.get(b)) {
                    canvas.line(pa.x, pa.y, pb.x, pb.y);
                }
            }

            if c.spokes {
                let spoke_alpha = (inside_alpha * 0.68).clamp(0.06, 0.24);
                canvas.set_stroke(&Rgba::new(accent, spoke_alpha).into());
                canvas.set_line_width(cfg.inside_stroke_width * 0.82);
                for pt in &anchors {
                    canvas.line(center.x, center.y, pt.x, pt.y);
                }
            }

            let hub_alpha = (cfg.ring_opacity * 0.45).clamp(0.08, 0.25);
            canvas.set_fill(&Rgba::new(accent, hub_alpha).into());
            canvas.dot(center.x, center.y, 2.2);
        }

        canvas.restore();
    }

    fn draw_streaks(&self, canvas: &mut impl Canvas2d, offset: Vec2) {
        let cfg = &self.config.streaks;
        let accent = self.config.colors.accent;
        let light = self.config.colors.light;

        canvas.save();
        canvas.translate(offset.x, offset.y);
        canvas.set_round_caps(true);

        for m in self.scene.streaks() {
            let head = m.position;
            let tail = head - m.velocity.normalize_or_zero() * m.length;

            let trail = Gradient::linear(tail.x, tail.y, head.x, head.y)
                .stop(0.0, Rgba::new(accent, 0.0))
                .stop(0.7, Rgba::new(accent, 0.4))
                .stop(1.0, Rgba::new(accent, 0.9));
            canvas.set_stroke(&trail.into());
            canvas.set_line_width(cfg.line_width);
            canvas.line(tail.x, tail.y, head.x, head.y);

            let glow = Gradient::radial(head.x, head.y, 0.0, cfg.glow_radius)
                .stop(0.0, Rgba::new(accent, 0.8))
                .stop(0.3, Rgba::new(accent, 0.3))
                .stop(1.0, Rgba::new(accent, 0.0));
            canvas.set_fill(&glow.into());
            canvas.dot(head.x, head.y, cfg.glow_radius);

            canvas.set_fill(&Rgba::new(light, 0.9).into());
            canvas.dot(head.x, head.y, cfg.head_size);
        }

        canvas.restore();
    }

    fn draw_vignette(&self, canvas: &mut impl Canvas2d) {
        let cfg = &self.config.vignette;
        let shade = self.config.colors.shade;
        let Viewport { width: w, height: h, .. } = self.viewport;

        let center = Gradient::radial(w / 2.0, h / 2.0, w * cfg.radius * 0.5, w * 0.85)
            .stop(0.0, Rgba::new(shade, cfg.strength))
            .stop(0.6, Rgba::new(shade, cfg.strength * 0.4))
            .stop(1.0, Rgba::new(shade, 0.0));
        canvas.set_fill(&center.into());
        canvas.fill_rect(0.0, 0.0, w, h);

        if cfg.edge_darken <= 0.0 {
            return;
        }
        let edge = cfg.edge_darken;
        let side = edge * 0.7;
        let clear = Rgba::new(shade, 0.0);
        let edges: [(Gradient, [f32; 4]); 4] = [
            (
                Gradient::linear(0.0, 0.0, 0.0, h * 0.15)
                    .stop(0.0, Rgba::new(shade, edge))
                    .stop(1.0, clear),
                [0.0, 0.0, w, h * 0.15],
            ),
            (
                Gradient::linear(0.0, h * 0.85, 0.0, h)
                    .stop(0.0, clear)
                    .stop(1.0, Rgba::new(shade, edge)),
                [0.0, h * 0.85, w, h * 0.15],
            ),
            (
                Gradient::linear(0.0, 0.0, w * 0.08, 0.0)
                    .stop(0.0, Rgba::new(shade, side))
                    .stop(1.0, clear),
                [0.0, 0.0, w * 0.08, h],
            ),
            (
                Gradient::linear(w * 0.92, 0.0, w, 0.0)
                    .stop(0.0, clear)
                    .stop(1.0, Rgba::new(shade, side)),
                [w * 0.92, 0.0, w * 0.08, h],
            ),
        ];
        for (grad, [x, y, rw, rh]) in edges {
            canvas.set_fill(&Paint::Gradient(grad));
            canvas.fill_rect(x, y, rw, rh);
        }
    }
}
