// Fixed simulation constants. Tunable knobs live in `config.rs`.

// Timing
pub const FRAME_BUDGET_MS: f32 = 16.67; // one frame at 60fps; velocities are px per budget
pub const MAX_FRAME_DT_MS: f32 = 50.0; // clamp after tab backgrounding
pub const FPS_SAMPLE_WINDOW_MS: f64 = 500.0;

// Noise seeds (fixed so visuals repeat across reloads)
pub const TERRAIN_NOISE_SEED: u32 = 37;
pub const AURORA_NOISE_SEED: u32 = 73;

// Scene bounds
pub const WRAP_MARGIN_PX: f32 = 20.0; // points wrap this far outside the viewport

// Streak spawn box, relative to the viewport
pub const STREAK_SPAWN_X_BEFORE: f32 = -100.0;
pub const STREAK_SPAWN_X_AFTER: f32 = 200.0;
pub const STREAK_SPAWN_Y_MIN: f32 = -200.0;
pub const STREAK_SPAWN_Y_MAX: f32 = -20.0;

// Below this smoothed energy the analyzer is treated as silent
pub const MUSIC_PRESENCE_EPS: f32 = 0.01;

// Fallback viewport when layout has not produced a size yet
pub const FALLBACK_WIDTH: f32 = 1920.0;
pub const FALLBACK_HEIGHT: f32 = 1080.0;
