use web_sys as web;

/// Pointer position normalized to the window, 0.5 is centered.
#[inline]
pub fn pointer_uv(ev: &web::PointerEvent) -> [f32; 2] {
    let Some(w) = web::window() else {
        return [0.5, 0.5];
    };
    let width = w.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let height = w.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    normalize(ev.client_x() as f64, ev.client_y() as f64, width, height)
}

#[inline]
pub fn normalize(x: f64, y: f64, width: f64, height: f64) -> [f32; 2] {
    if width > 0.0 && height > 0.0 {
        [
            (x / width).clamp(0.0, 1.0) as f32,
            (y / height).clamp(0.0, 1.0) as f32,
        ]
    } else {
        [0.5, 0.5]
    }
}

/// `scroll_y / (scroll_height - inner_height)`, with a 1px floor on the range.
#[inline]
pub fn scroll_fraction(scroll_y: f64, scroll_height: f64, inner_height: f64) -> f32 {
    let range = (scroll_height - inner_height).max(1.0);
    (scroll_y / range).clamp(0.0, 1.0) as f32
}
