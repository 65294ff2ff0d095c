use super::Listeners;
use crate::dom;
use crate::frame::FrameContext;
use crate::input;
use std::cell::RefCell;
use std::rc::Weak;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Pointer, scroll and resize feed the parallax tracker and viewport.
pub fn wire_viewport_inputs(listeners: &mut Listeners, ctx: Weak<RefCell<FrameContext>>) {
    let ctx_move = ctx.clone();
    listeners.add("pointermove", move |ev: web::Event| {
        let Some(ev) = ev.dyn_ref::<web::PointerEvent>() else {
            return;
        };
        let [u, v] = input::pointer_uv(ev);
        if let Some(ctx) = ctx_move.upgrade() {
            ctx.borrow_mut().renderer.parallax_mut().set_pointer(u, v);
        }
    });

    let ctx_scroll = ctx.clone();
    listeners.add("scroll", move |_| {
        let progress = dom::scroll_progress();
        if let Some(ctx) = ctx_scroll.upgrade() {
            ctx.borrow_mut()
                .renderer
                .parallax_mut()
                .set_scroll_progress(progress);
        }
    });

    listeners.add("resize", move |_| {
        if let Some(ctx) = ctx.upgrade() {
            ctx.borrow_mut().apply_viewport();
        }
    });
}
