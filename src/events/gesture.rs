use super::Listeners;
use crate::frame::FrameContext;
use std::cell::RefCell;
use std::rc::Weak;

// Autoplay policy keeps the context suspended until a user gesture.
pub fn wire_audio_gestures(listeners: &mut Listeners, ctx: Weak<RefCell<FrameContext>>) {
    for kind in ["pointerdown", "keydown"] {
        let ctx = ctx.clone();
        listeners.add(kind, move |_| {
            let Some(ctx) = ctx.upgrade() else {
                return;
            };
            let mut ctx = ctx.borrow_mut();
            if ctx.attach_from_selector() {
                ctx.renderer.analyzer().resume();
            }
        });
    }
}
