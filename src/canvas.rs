use backdrop_core::{Canvas2d, Gradient, GradientShape, Paint};
use std::f64::consts::TAU;
use web_sys as web;

/// `Canvas2d` over a browser 2D context.
pub struct WebCanvas {
    ctx: web::CanvasRenderingContext2d,
}

impl WebCanvas {
    pub fn new(ctx: web::CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    fn gradient(&self, g: &Gradient) -> web::CanvasGradient {
        let grad = match g.shape {
            GradientShape::Linear { x0, y0, x1, y1 } => {
                self.ctx
                    .create_linear_gradient(x0 as f64, y0 as f64, x1 as f64, y1 as f64)
            }
            GradientShape::Radial {
                x0,
                y0,
                r0,
                x1,
                y1,
                r1,
            } => {
                // negative radii throw; collapse them instead
                match self.ctx.create_radial_gradient(
                    x0 as f64,
                    y0 as f64,
                    r0.max(0.0) as f64,
                    x1 as f64,
                    y1 as f64,
                    r1.max(0.0) as f64,
                ) {
                    Ok(grad) => grad,
                    Err(_) => self.ctx.create_linear_gradient(0.0, 0.0, 0.0, 0.0),
                }
            }
        };
        for (offset, color) in &g.stops {
            _ = grad.add_color_stop(*offset, &color.css());
        }
        grad
    }
}

impl Canvas2d for WebCanvas {
    fn reset_transform(&mut self, scale: f32) {
        let s = scale as f64;
        _ = self.ctx.set_transform(s, 0.0, 0.0, s, 0.0, 0.0);
    }

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.clear_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        _ = self.ctx.translate(dx as f64, dy as f64);
    }

    fn set_fill(&mut self, paint: &Paint) {
        match paint {
            Paint::Solid(c) => self.ctx.set_fill_style_str(&c.css()),
            Paint::Gradient(g) => {
                let grad = self.gradient(g);
                self.ctx.set_fill_style_canvas_gradient(&grad);
            }
        }
    }

    fn set_stroke(&mut self, paint: &Paint) {
        match paint {
            Paint::Solid(c) => self.ctx.set_stroke_style_str(&c.css()),
            Paint::Gradient(g) => {
                let grad = self.gradient(g);
                self.ctx.set_stroke_style_canvas_gradient(&grad);
            }
        }
    }

    fn set_line_width(&mut self, width: f32) {
        self.ctx.set_line_width(width as f64);
    }

    fn set_round_caps(&mut self, round: bool) {
        self.ctx.set_line_cap(if round { "round" } else { "butt" });
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.ctx.move_to(x as f64, y as f64);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.ctx.line_to(x as f64, y as f64);
    }

    fn circle(&mut self, cx: f32, cy: f32, r: f32) {
        _ = self
            .ctx
            .arc(cx as f64, cy as f64, r.max(0.0) as f64, 0.0, TAU);
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }
}
