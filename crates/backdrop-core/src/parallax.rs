use crate::config::ParallaxConfig;
use glam::Vec2;

/// Depth layers, back to front.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DepthLayer {
    Far,
    Mid,
    Near,
}

impl DepthLayer {
    pub const ALL: [DepthLayer; 3] = [DepthLayer::Far, DepthLayer::Mid, DepthLayer::Near];

    #[inline]
    fn index(self) -> usize {
        match self {
            DepthLayer::Far => 0,
            DepthLayer::Mid => 1,
            DepthLayer::Near => 2,
        }
    }
}

/// Smoothed per-layer offsets derived from pointer position and scroll progress.
///
/// Raw input is captured with [`set_pointer`](Self::set_pointer) and
/// [`set_scroll_progress`](Self::set_scroll_progress) whenever events arrive;
/// [`update`](Self::update) runs once per frame and eases every layer toward
/// its target.
#[derive(Clone, Debug)]
pub struct ParallaxTracker {
    config: ParallaxConfig,
    pointer: Vec2, // normalized 0..1, 0.5 is centered
    scroll_progress: f32,
    viewport_height: f32,
    mouse_offsets: [Vec2; 3],
    scroll_offsets: [f32; 3],
}

impl ParallaxTracker {
    pub fn new(config: ParallaxConfig, viewport_height: f32) -> Self {
        Self {
            config,
            pointer: Vec2::splat(0.5),
            scroll_progress: 0.0,
            viewport_height,
            mouse_offsets: [Vec2::ZERO; 3],
            scroll_offsets: [0.0; 3],
        }
    }

    pub fn set_pointer(&mut self, x_norm: f32, y_norm: f32) {
        if x_norm.is_finite() && y_norm.is_finite() {
            self.pointer = Vec2::new(x_norm, y_norm);
        }
    }

    pub fn set_scroll_progress(&mut self, progress: f32) {
        if progress.is_finite() {
            self.scroll_progress = progress.clamp(0.0, 1.0);
        }
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height;
    }

    pub fn scroll_progress(&self) -> f32 {
        self.scroll_progress
    }

    pub fn update(&mut self) {
        let mouse = &self.config.mouse;
        let scroll = &self.config.scroll;
        // center-based deflection in -1..1
        let deflection = (self.pointer - Vec2::splat(0.5)) * 2.0;
        let scroll_px = self.scroll_progress * self.viewport_height;

        for layer in DepthLayer::ALL {
            let i = layer.index();
            let mouse_target = deflection * mouse.weight(layer);
            self.mouse_offsets[i] += (mouse_target - self.mouse_offsets[i]) * mouse.lerp;

            let scroll_target = scroll_px * scroll.weight(layer);
            self.scroll_offsets[i] += (scroll_target - self.scroll_offsets[i]) * scroll.lerp;
        }
    }

    /// Combined mouse + scroll offset for a layer.
    pub fn offset(&self, layer: DepthLayer) -> Vec2 {
        let i = layer.index();
        self.mouse_offsets[i] + Vec2::new(0.0, self.scroll_offsets[i])
    }
}
