//! Frame scheduling between a host and an animation
//!
//! An `Animation` only reports whether it wants another frame. `FrameLoop`
//! owns the single outstanding frame registration, so starting twice never
//! produces two loops and stopping cancels exactly the frame it requested.

/// Anything advanced once per display frame
pub trait Animation {
    /// Advance one frame at host time `now_ms`. Returns whether more frames are wanted.
    fn tick(&mut self, now_ms: f64) -> bool;

    /// Stop and drop any outstanding work
    fn halt(&mut self);
}

/// Opaque frame registration handle
pub type FrameId = u32;

/// Source of frame callbacks (requestAnimationFrame, a game loop, a test clock)
pub trait FrameScheduler {
    /// Register for the next frame. None if the host refused.
    fn request(&mut self) -> Option<FrameId>;
    fn cancel(&mut self, id: FrameId);
}

/// An animation bound to a scheduler with at most one pending frame
pub struct FrameLoop<A, F> {
    animation: A,
    scheduler: F,
    pending: Option<FrameId>,
}

impl<A: Animation, F: FrameScheduler> FrameLoop<A, F> {
    pub fn new(animation: A, scheduler: F) -> Self {
        Self {
            animation,
            scheduler,
            pending: None,
        }
    }

    pub fn animation(&self) -> &A {
        &self.animation
    }

    pub fn animation_mut(&mut self) -> &mut A {
        &mut self.animation
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }

    /// The frame this loop is waiting for
    pub fn pending_frame(&self) -> Option<FrameId> {
        self.pending
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    /// Request a frame unless one is already pending.
    /// A refused request leaves nothing pending, so a later kick retries.
    pub fn kick(&mut self) {
        if self.pending.is_none() {
            self.pending = self.scheduler.request();
            if self.pending.is_none() {
                log::debug!("frame request refused");
            }
        }
    }

    /// Deliver frame `id`. Stale or cancelled ids are ignored.
    /// Returns whether the loop re-armed itself.
    pub fn on_frame(&mut self, id: FrameId, now_ms: f64) -> bool {
        if self.pending != Some(id) {
            log::trace!("ignoring stale frame {}", id);
            return false;
        }
        self.pending = None;
        if self.animation.tick(now_ms) {
            self.kick();
            true
        } else {
            false
        }
    }

    /// Deliver the pending frame, for hosts whose callback carries no id.
    /// Cancelled callbacks never fire there, so the pending frame is the one
    /// arriving. Returns whether the loop re-armed itself.
    pub fn on_next_frame(&mut self, now_ms: f64) -> bool {
        match self.pending {
            Some(id) => self.on_frame(id, now_ms),
            None => false,
        }
    }

    /// Cancel the pending frame (if any) and halt the animation
    pub fn stop(&mut self) {
        if let Some(id) = self.pending.take() {
            self.scheduler.cancel(id);
        }
        self.animation.halt();
    }
}

/// Deterministic scheduler for headless hosts and tests
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: FrameId,
    pending: Vec<FrameId>,
    /// Total frames ever requested
    pub registrations: usize,
    /// Total frames cancelled before firing
    pub cancellations: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames requested but not yet delivered
    pub fn pending(&self) -> &[FrameId] {
        &self.pending
    }

    fn take_pending(&mut self) -> Vec<FrameId> {
        std::mem::take(&mut self.pending)
    }
}

impl FrameScheduler for ManualScheduler {
    fn request(&mut self) -> Option<FrameId> {
        self.next_id = self.next_id.wrapping_add(1);
        self.registrations += 1;
        self.pending.push(self.next_id);
        Some(self.next_id)
    }

    fn cancel(&mut self, id: FrameId) {
        let before = self.pending.len();
        self.pending.retain(|&p| p != id);
        if self.pending.len() != before {
            self.cancellations += 1;
        }
    }
}

impl<A: Animation> FrameLoop<A, ManualScheduler> {
    /// Deliver every pending frame at `now_ms`. Returns whether a frame is pending afterwards.
    pub fn pump(&mut self, now_ms: f64) -> bool {
        for id in self.scheduler.take_pending() {
            self.on_frame(id, now_ms);
        }
        self.is_scheduled()
    }

    /// Pump at a fixed frame period until idle or `max_frames` pass.
    /// Returns the number of frames delivered.
    pub fn run_until_idle(&mut self, start_ms: f64, frame_ms: f64, max_frames: usize) -> usize {
        let mut frames = 0;
        while self.is_scheduled() && frames < max_frames {
            self.pump(start_ms + frames as f64 * frame_ms);
            frames += 1;
        }
        frames
    }
}
