use anyhow::anyhow;
use backdrop_core::Viewport;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::constants::CANVAS_Z_INDEX;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn canvas_by_id(id: &str) -> anyhow::Result<web::HtmlCanvasElement> {
    let document = window_document().ok_or_else(|| anyhow!("no document"))?;
    let el = document
        .get_element_by_id(id)
        .ok_or_else(|| anyhow!("missing #{}", id))?;
    el.dyn_into::<web::HtmlCanvasElement>()
        .map_err(|_| anyhow!("#{} is not a canvas", id))
}

pub fn context_2d(
    canvas: &web::HtmlCanvasElement,
) -> anyhow::Result<web::CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .map_err(|e| anyhow!("getContext failed: {:?}", e))?
        .ok_or_else(|| anyhow!("2d context unavailable"))?
        .dyn_into::<web::CanvasRenderingContext2d>()
        .map_err(|_| anyhow!("unexpected context type"))
}

/// Window inner size and device pixel ratio, capped at `max_ratio`.
pub fn read_viewport(max_ratio: f32) -> Viewport {
    let Some(w) = web::window() else {
        return Viewport::new(0.0, 0.0, 1.0, max_ratio);
    };
    let num = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
    };
    Viewport::new(
        num(w.inner_width()),
        num(w.inner_height()),
        w.device_pixel_ratio() as f32,
        max_ratio,
    )
}

/// Match the backing store to the viewport and pin the canvas behind the page.
pub fn size_canvas(canvas: &web::HtmlCanvasElement, viewport: &Viewport) {
    let (bw, bh) = viewport.backing_size();
    canvas.set_width(bw);
    canvas.set_height(bh);
    let style = canvas.style();
    _ = style.set_property("width", &format!("{}px", viewport.width));
    _ = style.set_property("height", &format!("{}px", viewport.height));
}

pub fn pin_canvas(canvas: &web::HtmlCanvasElement) {
    let style = canvas.style();
    _ = style.set_property("position", "fixed");
    _ = style.set_property("inset", "0");
    _ = style.set_property("z-index", CANVAS_Z_INDEX);
    _ = style.set_property("pointer-events", "none");
}

/// 0..1 page scroll progress.
pub fn scroll_progress() -> f32 {
    let Some(w) = web::window() else {
        return 0.0;
    };
    let scroll_y = w.scroll_y().unwrap_or(0.0);
    let inner_h = w
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let scroll_h = w
        .document()
        .and_then(|d| d.document_element())
        .map(|el| el.scroll_height() as f64)
        .unwrap_or(0.0);
    crate::input::scroll_fraction(scroll_y, scroll_h, inner_h)
}

pub fn query_media(selector: &str) -> Option<web::HtmlMediaElement> {
    window_document()?
        .query_selector(selector)
        .ok()
        .flatten()?
        .dyn_into::<web::HtmlMediaElement>()
        .ok()
}
