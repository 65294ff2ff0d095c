// Browser wiring constants.
// Audio element discovery
pub const AUDIO_WATCH_INTERVAL_MS: i32 = 2000;
pub const AUDIO_WATCH_MAX_ATTEMPTS: u32 = 15;
pub const DEFAULT_AUDIO_SELECTOR: &str = "audio";

// Canvas layering (behind page content, never intercepts input)
pub const CANVAS_Z_INDEX: &str = "0";
