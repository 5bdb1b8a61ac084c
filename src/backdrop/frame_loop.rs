use std::cell::RefCell;
use std::rc::Rc;

use gloo::render::{request_animation_frame, AnimationFrame};

/// Source of "next frame" callbacks. Dropping the returned handle must
/// cancel the request.
pub trait FrameScheduler: 'static {
    type Handle: 'static;

    fn request(&self, callback: Box<dyn FnOnce()>) -> Self::Handle;
}

/// `requestAnimationFrame`
#[derive(Debug, Default, Clone, Copy)]
pub struct AnimationFrames;

impl FrameScheduler for AnimationFrames {
    type Handle = AnimationFrame;

    fn request(&self, callback: Box<dyn FnOnce()>) -> AnimationFrame {
        request_animation_frame(move |_timestamp| callback())
    }
}

struct Shared<S: FrameScheduler> {
    scheduler: S,
    on_frame: RefCell<Box<dyn FnMut()>>,
    pending: RefCell<Option<S::Handle>>,
}

/// Self-rescheduling frame loop: runs `on_frame` once per frame until
/// dropped. Dropping cancels the pending request.
pub struct FrameLoop<S: FrameScheduler> {
    shared: Rc<Shared<S>>,
}

impl<S: FrameScheduler> FrameLoop<S> {
    pub fn start(scheduler: S, on_frame: impl FnMut() + 'static) -> Self {
        let shared = Rc::new(Shared {
            scheduler,
            on_frame: RefCell::new(Box::new(on_frame)),
            pending: RefCell::new(None),
        });
        schedule_next(shared.clone());
        Self { shared }
    }
}

impl<S: FrameScheduler> Drop for FrameLoop<S> {
    fn drop(&mut self) {
        // The pending callback holds a clone of `shared`; dropping its
        // handle cancels it and breaks that cycle.
        let pending = self.shared.pending.borrow_mut().take();
        drop(pending);
    }
}

fn schedule_next<S: FrameScheduler>(shared: Rc<Shared<S>>) {
    let next = shared.clone();
    let handle = shared.scheduler.request(Box::new(move || {
        (next.on_frame.borrow_mut())();
        schedule_next(next);
    }));
    let previous = shared.pending.borrow_mut().replace(handle);
    drop(previous);
}
