//! Simulation entities and their per-tick advance.

use crate::config::{
    GeoConfig, OrnamentConfig, OrnamentPlacement, PointsConfig, QualitySettings, StreakConfig,
};
use crate::constants::*;
use fnv::FnvHashSet;
use glam::Vec2;
use rand::prelude::*;
use smallvec::SmallVec;
use std::f32::consts::TAU;

/// A drifting light speck.
#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundPoint {
    pub position: Vec2,
    pub velocity: Vec2, // px per frame budget
    pub alpha: f32,
    pub radius: f32,
    pub accent: bool,
}

/// A short-lived directional streak ("meteor").
#[derive(Clone, Debug, PartialEq)]
pub struct StreakParticle {
    pub id: u64,
    pub position: Vec2,
    pub velocity: Vec2,
    pub life_ms: f32,
    pub length: f32,
}

/// A decorative ring with an inscribed polygon. Topology is fixed at creation.
#[derive(Clone, Debug)]
pub struct OrbitalOrnament {
    pub x_ratio: f32,
    pub y_ratio: f32,
    pub base_radius: f32,
    pub phase: f32,
    pub edge_angles: SmallVec<[f32; 8]>,
    pub connections: SmallVec<[(usize, usize); 16]>,
    pub spin: f32,
    pub spin_multiplier: f32,
    pub spokes: bool,
}

impl OrbitalOrnament {
    fn build(placement: &OrnamentPlacement, cfg: &OrnamentConfig, rng: &mut StdRng) -> Self {
        let n = placement.anchor_count;
        let base_angle = rng.gen_range(0.0..TAU);
        let edge_angles = (0..n)
            .map(|p| {
                base_angle
                    + (p as f32 / n as f32) * TAU
                    + rand_between(rng, -cfg.angle_jitter, cfg.angle_jitter)
            })
            .collect();
        Self {
            x_ratio: placement.x_ratio,
            y_ratio: placement.y_ratio,
            base_radius: rand_between(rng, cfg.base_radius[0], cfg.base_radius[1])
                * placement.radius_scale,
            phase: rng.gen_range(0.0..TAU),
            edge_angles,
            connections: polygon_chords(n, placement.chord_limit),
            spin: rng.gen_range(0.0..TAU),
            spin_multiplier: placement.spin_multiplier,
            spokes: placement.spokes,
        }
    }

    /// Anchor positions on a circle of `radius` around `center`, rotated by the current spin.
    pub fn anchor_points(&self, center: Vec2, radius: f32) -> SmallVec<[Vec2; 8]> {
        self.edge_angles
            .iter()
            .map(|a| center + Vec2::from_angle(a + self.spin) * radius)
            .collect()
    }
}

/// Chords of an `n`-gon: every edge, plus diameters from 5 anchors up and
/// skip-one chords from 7 up. Duplicates are dropped and the list is cut to `limit`.
pub fn polygon_chords(n: usize, limit: usize) -> SmallVec<[(usize, usize); 16]> {
    let mut seen: FnvHashSet<(usize, usize)> = FnvHashSet::default();
    let mut out = SmallVec::new();
    if n < 2 {
        return out;
    }
    for a in 0..n {
        let mut candidates: SmallVec<[usize; 3]> = SmallVec::new();
        candidates.push((a + 1) % n);
        if n >= 5 {
            candidates.push((a + n / 2) % n);
        }
        if n >= 7 {
            candidates.push((a + 2) % n);
        }
        for b in candidates {
            let key = (a.min(b), a.max(b));
            if seen.insert(key) {
                out.push((a, b));
            }
        }
    }
    out.truncate(limit);
    out
}

#[inline]
fn rand_between(rng: &mut StdRng, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

/// Owns every simulated entity of one mounted background.
pub struct SceneState {
    points_cfg: PointsConfig,
    streak_cfg: StreakConfig,
    ornament_cfg: OrnamentConfig,
    rng: StdRng,
    width: f32,
    height: f32,
    points: Vec<BackgroundPoint>,
    streaks: Vec<StreakParticle>,
    ornaments: Vec<OrbitalOrnament>,
    clock_ms: f64,
    next_streak_ms: f64,
    next_streak_id: u64,
}

impl SceneState {
    pub fn new(config: &GeoConfig, width: f32, height: f32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let (width, height) = sane_size(width, height);

        let pc = &config.points;
        let points = (0..pc.count)
            .map(|_| BackgroundPoint {
                position: Vec2::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height)),
                velocity: Vec2::new(
                    rand_between(&mut rng, -pc.drift_speed, pc.drift_speed),
                    rand_between(&mut rng, -pc.drift_speed, pc.drift_speed),
                ),
                alpha: rand_between(&mut rng, pc.min_alpha, pc.max_alpha),
                radius: rand_between(&mut rng, pc.min_radius, pc.max_radius),
                accent: rng.gen::<f32>() < pc.accent_ratio,
            })
            .collect::<Vec<_>>();

        let ornaments = config
            .ornaments
            .placements
            .iter()
            .map(|p| OrbitalOrnament::build(p, &config.ornaments, &mut rng))
            .collect::<Vec<_>>();

        log::debug!(
            "[scene] {} points, {} ornaments in {}x{}",
            points.len(),
            ornaments.len(),
            width,
            height
        );

        Self {
            points_cfg: pc.clone(),
            streak_cfg: config.streaks.clone(),
            ornament_cfg: config.ornaments.clone(),
            rng,
            width,
            height,
            points,
            streaks: Vec::new(),
            ornaments,
            clock_ms: 0.0,
            next_streak_ms: 0.0,
            next_streak_id: 0,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        let (w, h) = sane_size(width, height);
        self.width = w;
        self.height = h;
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn points(&self) -> &[BackgroundPoint] {
        &self.points
    }

    pub fn streaks(&self) -> &[StreakParticle] {
        &self.streaks
    }

    pub fn ornaments(&self) -> &[OrbitalOrnament] {
        &self.ornaments
    }

    pub fn points_config(&self) -> &PointsConfig {
        &self.points_cfg
    }

    /// Advance every entity by `dt_ms` (clamped to [`MAX_FRAME_DT_MS`]).
    /// `bass` is the smoothed bass energy, already zeroed when the level is not music-reactive.
    /// Returns the dt actually applied.
    pub fn advance(&mut self, dt_ms: f32, settings: &QualitySettings, bass: f32) -> f32 {
        let dt = if dt_ms.is_finite() {
            dt_ms.clamp(0.0, MAX_FRAME_DT_MS)
        } else {
            0.0
        };
        self.clock_ms += dt as f64;
        let step = dt / FRAME_BUDGET_MS;

        // shrink only, from the tail
        self.points.truncate(settings.point_cap);

        let (w, h) = (self.width, self.height);
        for p in &mut self.points {
            p.position += p.velocity * step;
            p.position.x = wrap(p.position.x, w);
            p.position.y = wrap(p.position.y, h);
        }

        if settings.streaks_enabled {
            if self.clock_ms > self.next_streak_ms {
                self.spawn_streak();
                let [lo, hi] = self.streak_cfg.interval_ms;
                self.next_streak_ms = self.clock_ms + rand_between(&mut self.rng, lo, hi) as f64;
            }
            for s in &mut self.streaks {
                s.position += s.velocity * step;
                s.life_ms -= dt;
            }
            self.streaks.retain(|s| s.life_ms > 0.0);
        } else if !self.streaks.is_empty() {
            self.streaks.clear();
        }

        let oc = &self.ornament_cfg;
        let bass_boost = (bass * oc.music_multiplier).clamp(0.0, 1.0);
        let rate = oc.base_spin + bass_boost * oc.spin_boost_max;
        for o in &mut self.ornaments {
            o.spin += rate * (dt * 0.001) * o.spin_multiplier;
        }

        dt
    }

    /// Spawn one streak above the viewport. Returns its id.
    pub fn spawn_streak(&mut self) -> u64 {
        let cfg = &self.streak_cfg;
        let angle = cfg.angle_deg.to_radians();
        let speed = rand_between(&mut self.rng, cfg.speed[0], cfg.speed[1]);
        let length = rand_between(&mut self.rng, cfg.length[0], cfg.length[1]);
        let life_ms = cfg.life_ms;
        let x = rand_between(
            &mut self.rng,
            STREAK_SPAWN_X_BEFORE,
            self.width + STREAK_SPAWN_X_AFTER,
        );
        let y = rand_between(&mut self.rng, STREAK_SPAWN_Y_MIN, STREAK_SPAWN_Y_MAX);

        let id = self.next_streak_id;
        self.next_streak_id += 1;
        self.streaks.push(StreakParticle {
            id,
            position: Vec2::new(x, y),
            velocity: Vec2::new(angle.cos() * speed, -angle.sin() * speed),
            life_ms,
            length,
        });
        id
    }
}

#[inline]
fn wrap(v: f32, extent: f32) -> f32 {
    if v < -WRAP_MARGIN_PX {
        extent + WRAP_MARGIN_PX
    } else if v > extent + WRAP_MARGIN_PX {
        -WRAP_MARGIN_PX
    } else {
        v
    }
}

fn sane_size(width: f32, height: f32) -> (f32, f32) {
    let w = if width.is_finite() && width >= 1.0 {
        width
    } else {
        FALLBACK_WIDTH
    };
    let h = if height.is_finite() && height >= 1.0 {
        height
    } else {
        FALLBACK_HEIGHT
    };
    (w, h)
}
