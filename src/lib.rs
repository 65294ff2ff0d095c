#![cfg(target_arch = "wasm32")]
//! Browser bindings for the geometry background.
//!
//! ```js
//! const bg = new GeometryBackground(document.getElementById("bg"));
//! bg.watch_audio("audio");
//! bg.start();
//! ```
use anyhow::anyhow;
use backdrop_core::{FrameRenderer, GeoConfig};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

mod audio;
mod canvas;
mod constants;
mod dom;
mod events;
mod frame;
mod input;

use constants::*;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("backdrop-web loaded");
    Ok(())
}

#[inline]
fn to_js(e: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{:#}", e))
}

/// Handle to one mounted background. Dropping it from JS (`free()`) tears
/// everything down like [`destroy`](GeometryBackground::destroy).
#[wasm_bindgen]
pub struct GeometryBackground {
    frame_ctx: Rc<RefCell<frame::FrameContext>>,
    listeners: events::Listeners,
    audio_watch: Option<audio::AudioWatch>,
}

#[wasm_bindgen]
impl GeometryBackground {
    /// Mount with the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: web::HtmlCanvasElement) -> Result<GeometryBackground, JsValue> {
        Self::mount_with(canvas, GeoConfig::default()).map_err(to_js)
    }

    /// Mount with a JSON override of any subset of the configuration.
    pub fn with_config(
        canvas: web::HtmlCanvasElement,
        config_json: &str,
    ) -> Result<GeometryBackground, JsValue> {
        GeoConfig::from_json(config_json)
            .map_err(|e| anyhow!("invalid config: {}", e))
            .and_then(|config| Self::mount_with(canvas, config))
            .map_err(to_js)
    }

    pub fn start(&self) {
        self.frame_ctx.borrow_mut().start();
    }

    pub fn stop(&self) {
        self.frame_ctx.borrow_mut().stop();
    }

    /// Stop the loop, detach every listener and release the audio graph.
    /// Safe to call more than once.
    pub fn destroy(&mut self) {
        self.audio_watch = None;
        self.listeners.clear();
        self.frame_ctx.borrow_mut().destroy();
    }

    /// Connect the analyser to a specific media element.
    pub fn attach_audio(&self, element: &web::HtmlMediaElement) -> bool {
        self.frame_ctx.borrow_mut().attach_audio(element)
    }

    /// Connect to the first element matching `selector`, polling until it appears.
    pub fn watch_audio(&mut self, selector: Option<String>) -> bool {
        let selector = selector.unwrap_or_else(|| DEFAULT_AUDIO_SELECTOR.to_string());
        let connected = {
            let mut ctx = self.frame_ctx.borrow_mut();
            ctx.audio_selector = Some(selector);
            ctx.attach_from_selector()
        };
        self.audio_watch = if connected {
            None
        } else {
            web::window().and_then(|w| {
                audio::AudioWatch::start(
                    w,
                    Rc::downgrade(&self.frame_ctx),
                    AUDIO_WATCH_INTERVAL_MS,
                    AUDIO_WATCH_MAX_ATTEMPTS,
                )
            })
        };
        connected
    }

    pub fn resume_audio(&self) {
        self.frame_ctx.borrow().renderer.analyzer().resume();
    }

    pub fn quality_level(&self) -> u32 {
        self.frame_ctx.borrow().renderer.governor().level() as u32
    }

    pub fn fps(&self) -> u32 {
        self.frame_ctx.borrow().renderer.governor().fps()
    }

    pub fn is_running(&self) -> bool {
        self.frame_ctx.borrow().renderer.is_running()
    }
}

impl GeometryBackground {
    fn mount_with(canvas: web::HtmlCanvasElement, config: GeoConfig) -> anyhow::Result<Self> {
        let window = web::window().ok_or_else(|| anyhow!("no window"))?;
        let ctx2d = dom::context_2d(&canvas)?;
        dom::pin_canvas(&canvas);

        let viewport = dom::read_viewport(config.viewport.max_device_pixel_ratio);
        let epoch = Instant::now();
        let renderer = FrameRenderer::new(config, viewport, rand::random::<u64>(), 0.0)
            .map_err(|e| anyhow!("invalid config: {}", e))?;

        let frame_ctx = Rc::new(RefCell::new(frame::FrameContext::new(
            renderer,
            canvas::WebCanvas::new(ctx2d),
            canvas,
            frame::RafScheduler::new(window.clone()),
            epoch,
        )));
        {
            let mut ctx = frame_ctx.borrow_mut();
            ctx.apply_viewport();
            let progress = dom::scroll_progress();
            ctx.renderer.parallax_mut().set_scroll_progress(progress);
        }
        frame::install_loop(&frame_ctx);

        let mut listeners = events::Listeners::new(window);
        events::wire_viewport_inputs(&mut listeners, Rc::downgrade(&frame_ctx));
        events::wire_audio_gestures(&mut listeners, Rc::downgrade(&frame_ctx));

        Ok(Self {
            frame_ctx,
            listeners,
            audio_watch: None,
        })
    }
}

impl Drop for GeometryBackground {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Mount on `#canvas_id`, watch for a page `<audio>` element and start.
#[wasm_bindgen]
pub fn mount(canvas_id: &str) -> Result<GeometryBackground, JsValue> {
    let canvas = dom::canvas_by_id(canvas_id).map_err(to_js)?;
    let mut bg = GeometryBackground::new(canvas)?;
    bg.watch_audio(None);
    bg.start();
    Ok(bg)
}
