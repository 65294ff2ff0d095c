pub mod gesture;
pub mod pointer;

pub use gesture::wire_audio_gestures;
pub use pointer::wire_viewport_inputs;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Passive window listeners that are removed together.
pub struct Listeners {
    window: web::Window,
    entries: Vec<(&'static str, Closure<dyn FnMut(web::Event)>)>,
}

impl Listeners {
    pub fn new(window: web::Window) -> Self {
        Self {
            window,
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, kind: &'static str, handler: impl FnMut(web::Event) + 'static) {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        let opts = web::AddEventListenerOptions::new();
        opts.set_passive(true);
        _ = self
            .window
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                closure.as_ref().unchecked_ref(),
                &opts,
            );
        self.entries.push((kind, closure));
    }

    pub fn clear(&mut self) {
        for (kind, closure) in self.entries.drain(..) {
            _ = self
                .window
                .remove_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        }
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        self.clear();
    }
}
