//! Platform-free core of the geometry background.
//!
//! Everything here is advanced by time and emits draw calls through the
//! [`Canvas2d`] trait, so the same code runs in the browser (see the
//! `backdrop-web` package) and under host-side tests.

pub mod analyzer;
pub mod config;
pub mod constants;
pub mod error;
pub mod lifecycle;
pub mod noise;
pub mod paint;
pub mod parallax;
pub mod quality;
pub mod renderer;
pub mod scene;

pub use analyzer::*;
pub use config::*;
pub use error::*;
pub use lifecycle::*;
pub use noise::*;
pub use paint::*;
pub use parallax::*;
pub use quality::*;
pub use renderer::*;
pub use scene::*;
