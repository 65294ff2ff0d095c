use crate::config::{PerformanceConfig, QualitySettings};

/// Frame-rate watchdog that ratchets the quality level down under sustained load.
///
/// Levels only ever increase for the lifetime of one instance: recovering
/// FPS resets the low-FPS timer but never restores a finer level.
#[derive(Clone, Debug)]
pub struct QualityGovernor {
    config: PerformanceConfig,
    level: usize,
    frames: u32,
    window_start_ms: f64,
    fps: f64,
    low_since_ms: Option<f64>,
}

impl QualityGovernor {
    pub fn new(config: PerformanceConfig, now_ms: f64) -> Self {
        Self {
            config,
            level: 0,
            frames: 0,
            window_start_ms: now_ms,
            fps: 60.0,
            low_since_ms: None,
        }
    }

    #[inline]
    fn max_level(&self) -> usize {
        self.config.levels.len().saturating_sub(1)
    }

    /// Open a fresh sample window at `now_ms`, e.g. after the loop was paused.
    /// Keeps the level.
    pub fn resync(&mut self, now_ms: f64) {
        self.frames = 0;
        self.window_start_ms = now_ms;
        self.low_since_ms = None;
    }

    /// Count one frame at `now_ms`. Returns the current level.
    pub fn tick(&mut self, now_ms: f64) -> usize {
        self.frames += 1;
        let elapsed = now_ms - self.window_start_ms;
        if elapsed < self.config.sample_window_ms {
            return self.level;
        }

        let window_start = self.window_start_ms;
        self.fps = self.frames as f64 / elapsed * 1000.0;
        self.frames = 0;
        self.window_start_ms = now_ms;

        if self.level >= self.max_level() {
            return self.level;
        }

        if self.fps < self.config.fps_threshold {
            let since = *self.low_since_ms.get_or_insert(window_start);
            if now_ms - since > self.config.degrade_after_ms {
                self.level += 1;
                self.low_since_ms = None;
                log::info!(
                    "[quality] sustained {:.0} fps, degrading to level {}",
                    self.fps,
                    self.level
                );
            }
        } else {
            self.low_since_ms = None;
        }
        self.level
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn is_at_floor(&self) -> bool {
        self.level >= self.max_level()
    }

    pub fn settings(&self) -> QualitySettings {
        self.config
            .levels
            .get(self.level)
            .copied()
            .unwrap_or(QualitySettings::MINIMAL)
    }

    /// Last measured frame rate, rounded.
    pub fn fps(&self) -> u32 {
        self.fps.round().max(0.0) as u32
    }
}
