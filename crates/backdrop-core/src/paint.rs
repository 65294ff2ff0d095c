//! Draw-call vocabulary shared by the renderer and its canvas backends.

use crate::config::Rgb;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    #[inline]
    pub fn new(rgb: Rgb, a: f32) -> Self {
        Self {
            r: rgb[0],
            g: rgb[1],
            b: rgb[2],
            a: a.clamp(0.0, 1.0),
        }
    }

    /// CSS color string, e.g. `rgba(255,122,24,0.350)`.
    pub fn css(&self) -> String {
        format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GradientShape {
    Linear {
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
    },
    Radial {
        x0: f32,
        y0: f32,
        r0: f32,
        x1: f32,
        y1: f32,
        r1: f32,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    pub shape: GradientShape,
    pub stops: SmallVec<[(f32, Rgba); 4]>,
}

impl Gradient {
    pub fn linear(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            shape: GradientShape::Linear { x0, y0, x1, y1 },
            stops: SmallVec::new(),
        }
    }

    /// Concentric radial gradient around `(x, y)`.
    pub fn radial(x: f32, y: f32, r0: f32, r1: f32) -> Self {
        Self {
            shape: GradientShape::Radial {
                x0: x,
                y0: y,
                r0,
                x1: x,
                y1: y,
                r1,
            },
            stops: SmallVec::new(),
        }
    }

    pub fn stop(mut self, offset: f32, color: Rgba) -> Self {
        self.stops.push((offset.clamp(0.0, 1.0), color));
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Gradient(Gradient),
}

impl From<Rgba> for Paint {
    fn from(c: Rgba) -> Self {
        Paint::Solid(c)
    }
}

impl From<Gradient> for Paint {
    fn from(g: Gradient) -> Self {
        Paint::Gradient(g)
    }
}

/// Immediate-mode 2D drawing surface, modelled on `CanvasRenderingContext2D`.
///
/// Coordinates are CSS pixels; backends apply the device pixel ratio through
/// [`reset_transform`](Canvas2d::reset_transform).
pub trait Canvas2d {
    /// Replace the current transform with a uniform `scale`.
    fn reset_transform(&mut self, scale: f32);
    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f32, dy: f32);
    fn set_fill(&mut self, paint: &Paint);
    fn set_stroke(&mut self, paint: &Paint);
    fn set_line_width(&mut self, width: f32);
    fn set_round_caps(&mut self, round: bool);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    /// Full circle.
    fn circle(&mut self, cx: f32, cy: f32, r: f32);
    fn stroke(&mut self);
    fn fill(&mut self);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32);

    /// Stroke a single segment with the current stroke style.
    fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) {
        self.begin_path();
        self.move_to(x0, y0);
        self.line_to(x1, y1);
        self.stroke();
    }

    /// Fill a single circle with the current fill style.
    fn dot(&mut self, cx: f32, cy: f32, r: f32) {
        self.begin_path();
        self.circle(cx, cy, r);
        self.fill();
    }
}

/// Rotate an RGB color around the luminance axis by `degrees`.
pub fn rotate_hue(rgb: Rgb, degrees: f32) -> Rgb {
    let (s, c) = degrees.to_radians().sin_cos();
    let [r, g, b] = rgb.map(|v| v as f32);
    let nr = r * (0.299 + 0.701 * c + 0.168 * s)
        + g * (0.587 - 0.587 * c + 0.330 * s)
        + b * (0.114 - 0.114 * c - 0.497 * s);
    let ng = r * (0.299 - 0.299 * c - 0.328 * s)
        + g * (0.587 + 0.413 * c + 0.035 * s)
        + b * (0.114 - 0.114 * c + 0.292 * s);
    let nb = r * (0.299 - 0.300 * c + 1.250 * s)
        + g * (0.587 - 0.588 * c - 1.050 * s)
        + b * (0.114 + 0.886 * c - 0.203 * s);
    [nr, ng, nb].map(|v| v.clamp(0.0, 255.0).round() as u8)
}
