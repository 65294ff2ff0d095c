/// Platform hook that schedules one frame callback at a time.
///
/// In the browser this is `requestAnimationFrame`/`cancelAnimationFrame`.
pub trait FrameScheduler {
    /// Schedule the next callback. `None` when the platform refused.
    fn request_frame(&mut self) -> Option<i32>;
    fn cancel_frame(&mut self, handle: i32);
}

/// Running/pending bookkeeping for the animation loop.
///
/// At most one callback is ever pending, and after [`stop`](Self::stop) or
/// [`destroy`](Self::destroy) no pending callback survives.
#[derive(Debug, Default)]
pub struct RenderLoop {
    running: bool,
    destroyed: bool,
    pending: Option<i32>,
}

impl RenderLoop {
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn pending(&self) -> Option<i32> {
        self.pending
    }

    /// Returns `false` when already running or destroyed.
    pub fn start(&mut self, scheduler: &mut impl FrameScheduler) -> bool {
        if self.running || self.destroyed {
            return false;
        }
        self.running = true;
        self.pending = scheduler.request_frame();
        true
    }

    /// Called at the top of a frame callback. Returns whether the frame should run.
    pub fn begin_frame(&mut self) -> bool {
        self.pending = None;
        self.running
    }

    /// Called at the end of a frame callback to chain the next one.
    pub fn end_frame(&mut self, scheduler: &mut impl FrameScheduler) {
        if self.running && self.pending.is_none() {
            self.pending = scheduler.request_frame();
        }
    }

    pub fn stop(&mut self, scheduler: &mut impl FrameScheduler) {
        self.running = false;
        if let Some(handle) = self.pending.take() {
            scheduler.cancel_frame(handle);
        }
    }

    pub fn destroy(&mut self, scheduler: &mut impl FrameScheduler) {
        self.stop(scheduler);
        self.destroyed = true;
    }
}
