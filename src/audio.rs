use crate::frame::FrameContext;
use backdrop_core::{AudioConfig, GraphError, SignalGraph};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// media element -> analyser -> destination
///
/// Nodes are held as options so a half-built graph can still be torn down.
pub struct WebAudioGraph {
    ctx: Option<web::AudioContext>,
    source: Option<web::MediaElementAudioSourceNode>,
    analyser: Option<web::AnalyserNode>,
}

fn js_err(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

impl WebAudioGraph {
    pub fn build(element: &web::HtmlMediaElement, cfg: &AudioConfig) -> Result<Self, GraphError> {
        let ctx = web::AudioContext::new().map_err(|e| GraphError::Unsupported(js_err(e)))?;
        let mut graph = Self {
            ctx: Some(ctx.clone()),
            source: None,
            analyser: None,
        };
        if let Err(e) = graph.wire(&ctx, element, cfg) {
            graph.disconnect();
            return Err(e);
        }
        Ok(graph)
    }

    fn wire(
        &mut self,
        ctx: &web::AudioContext,
        element: &web::HtmlMediaElement,
        cfg: &AudioConfig,
    ) -> Result<(), GraphError> {
        let analyser = web::AnalyserNode::new(ctx).map_err(|e| GraphError::Unsupported(js_err(e)))?;
        analyser.set_fft_size(cfg.fft_size);
        analyser.set_smoothing_time_constant(cfg.smoothing_time_constant);
        self.analyser = Some(analyser.clone());

        // throws if the element already feeds another context
        let source = ctx
            .create_media_element_source(element)
            .map_err(|e| GraphError::Unsupported(js_err(e)))?;
        self.source = Some(source.clone());

        source
            .connect_with_audio_node(&analyser)
            .map_err(|e| GraphError::Unsupported(js_err(e)))?;
        analyser
            .connect_with_audio_node(&ctx.destination())
            .map_err(|e| GraphError::Unsupported(js_err(e)))?;
        Ok(())
    }
}

impl SignalGraph for WebAudioGraph {
    fn frequency_data(&mut self, out: &mut Vec<u8>) {
        match &self.analyser {
            Some(a) => {
                let bins = a.frequency_bin_count() as usize;
                if out.len() != bins {
                    out.resize(bins, 0);
                }
                a.get_byte_frequency_data(out.as_mut_slice());
            }
            None => out.clear(),
        }
    }

    fn is_suspended(&self) -> bool {
        self.ctx
            .as_ref()
            .map(|c| c.state() == web::AudioContextState::Suspended)
            .unwrap_or(false)
    }

    fn resume(&self) -> Result<(), GraphError> {
        let Some(ctx) = &self.ctx else {
            return Ok(());
        };
        let promise = ctx.resume().map_err(|e| GraphError::Rejected(js_err(e)))?;
        spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                log::debug!("[audio] resume rejected: {}", js_err(e));
            }
        });
        Ok(())
    }

    fn disconnect(&mut self) {
        if let Some(source) = self.source.take() {
            _ = source.disconnect();
        }
        if let Some(analyser) = self.analyser.take() {
            _ = analyser.disconnect();
        }
        if let Some(ctx) = self.ctx.take() {
            if let Ok(promise) = ctx.close() {
                spawn_local(async move {
                    _ = JsFuture::from(promise).await;
                });
            }
        }
    }
}

/// Periodic selector lookup for an audio element that may mount late.
/// Clears its interval on success, after the attempt cap, or on drop.
pub struct AudioWatch {
    window: web::Window,
    handle: Rc<Cell<Option<i32>>>,
    _tick: Closure<dyn FnMut()>,
}

impl AudioWatch {
    pub fn start(
        window: web::Window,
        ctx: Weak<RefCell<FrameContext>>,
        interval_ms: i32,
        max_attempts: u32,
    ) -> Option<Self> {
        let handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let attempts = Rc::new(Cell::new(0u32));
        let handle_tick = handle.clone();
        let window_tick = window.clone();
        let tick = Closure::wrap(Box::new(move || {
            let done = match ctx.upgrade() {
                Some(ctx) => {
                    attempts.set(attempts.get() + 1);
                    let connected = ctx.borrow_mut().attach_from_selector();
                    if !connected && attempts.get() >= max_attempts {
                        log::info!("[audio] no audio element after {} attempts", max_attempts);
                    }
                    connected || attempts.get() >= max_attempts
                }
                None => true,
            };
            if done {
                if let Some(h) = handle_tick.take() {
                    window_tick.clear_interval_with_handle(h);
                }
            }
        }) as Box<dyn FnMut()>);
        let id = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                tick.as_ref().unchecked_ref(),
                interval_ms,
            )
            .ok()?;
        handle.set(Some(id));
        Some(Self {
            window,
            handle,
            _tick: tick,
        })
    }
}

impl Drop for AudioWatch {
    fn drop(&mut self) {
        if let Some(h) = self.handle.take() {
            self.window.clear_interval_with_handle(h);
        }
    }
}
