use crate::audio::WebAudioGraph;
use crate::canvas::WebCanvas;
use crate::dom;
use backdrop_core::{FrameRenderer, FrameScheduler};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// `requestAnimationFrame` driver. Holds the frame callback so it can be
/// re-requested from inside itself.
pub struct RafScheduler {
    window: web::Window,
    tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl RafScheduler {
    pub fn new(window: web::Window) -> Self {
        Self {
            window,
            tick: Rc::new(RefCell::new(None)),
        }
    }

    /// Drop the frame callback. Only call outside of a frame.
    pub fn release(&self) {
        self.tick.borrow_mut().take();
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> Option<i32> {
        let tick = self.tick.borrow();
        let cb = tick.as_ref()?;
        self.window
            .request_animation_frame(cb.as_ref().unchecked_ref())
            .ok()
    }

    fn cancel_frame(&mut self, handle: i32) {
        _ = self.window.cancel_animation_frame(handle);
    }
}

pub struct FrameContext {
    pub renderer: FrameRenderer<WebAudioGraph>,
    pub canvas: WebCanvas,
    pub element: web::HtmlCanvasElement,
    pub scheduler: RafScheduler,
    pub audio_selector: Option<String>,
    epoch: Instant,
}

impl FrameContext {
    pub fn new(
        renderer: FrameRenderer<WebAudioGraph>,
        canvas: WebCanvas,
        element: web::HtmlCanvasElement,
        scheduler: RafScheduler,
        epoch: Instant,
    ) -> Self {
        Self {
            renderer,
            canvas,
            element,
            scheduler,
            audio_selector: None,
            epoch,
        }
    }

    #[inline]
    pub fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }

    /// Re-read the window size and push it to the canvas and renderer.
    pub fn apply_viewport(&mut self) {
        let max_ratio = self.renderer.config().viewport.max_device_pixel_ratio;
        let viewport = dom::read_viewport(max_ratio);
        dom::size_canvas(&self.element, &viewport);
        self.renderer.resize(viewport, &mut self.canvas);
    }

    pub fn attach_audio(&mut self, element: &web::HtmlMediaElement) -> bool {
        let analyzer = self.renderer.analyzer_mut();
        analyzer.connect(|cfg| WebAudioGraph::build(element, cfg));
        analyzer.is_connected()
    }

    /// Look up the watched selector and connect to it. True once connected.
    pub fn attach_from_selector(&mut self) -> bool {
        if self.renderer.analyzer().is_connected() {
            return true;
        }
        let Some(selector) = self.audio_selector.as_deref() else {
            return false;
        };
        match dom::query_media(selector) {
            Some(el) => self.attach_audio(&el),
            None => false,
        }
    }

    pub fn start(&mut self) -> bool {
        let Self {
            renderer,
            scheduler,
            ..
        } = self;
        renderer.start(scheduler)
    }

    pub fn stop(&mut self) {
        let Self {
            renderer,
            scheduler,
            ..
        } = self;
        renderer.stop(scheduler);
    }

    pub fn destroy(&mut self) {
        let Self {
            renderer,
            scheduler,
            ..
        } = self;
        renderer.destroy(scheduler);
        scheduler.release();
    }

    fn frame(&mut self) {
        let now = self.now_ms();
        let Self {
            renderer,
            canvas,
            scheduler,
            ..
        } = self;
        renderer.on_frame(now, canvas, scheduler);
    }
}

/// Install the frame callback. The callback only holds a weak handle, so
/// dropping the context ends the loop.
pub fn install_loop(frame_ctx: &Rc<RefCell<FrameContext>>) {
    let weak = Rc::downgrade(frame_ctx);
    let closure = Closure::wrap(Box::new(move || {
        if let Some(ctx) = weak.upgrade() {
            ctx.borrow_mut().frame();
        }
    }) as Box<dyn FnMut()>);
    *frame_ctx.borrow().scheduler.tick.borrow_mut() = Some(closure);
}
