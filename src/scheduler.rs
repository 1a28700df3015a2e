//! Redraw and resize timing.
//!
//! The host owns the real timers. It calls [`FrameScheduler::tick`] from a
//! coarse interval and forwards the returned request to the browser's frame
//! callback; resize events go through [`ResizeDebouncer`], which it polls
//! from the same interval.

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod scheduler_test;

use serde::{Deserialize, Serialize};

/// Identifier of a requested animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameId(pub u64);

/// What the host should do with its frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRequest {
    pub id: FrameId,
    /// Frame to cancel before requesting `id`.
    pub cancel: Option<FrameId>,
}

/// Coalesces redraw requests so at most one frame is pending.
#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    pending: Option<FrameId>,
    next_id: u64,
    drawn: u64,
}

impl FrameScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Coarse tick. Nothing is requested while the canvas is hidden.
    pub fn tick(&mut self, shown: bool) -> Option<FrameRequest> {
        if !shown {
            return None;
        }
        let id = FrameId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let cancel = self.pending.replace(id);
        Some(FrameRequest { id, cancel })
    }

    /// Claim frame `id` for drawing. Stale ids (cancelled or already drawn) are refused.
    pub fn begin_frame(&mut self, id: FrameId) -> bool {
        if self.pending != Some(id) {
            return false;
        }
        self.pending = None;
        self.drawn += 1;
        true
    }

    #[must_use]
    pub fn pending(&self) -> Option<FrameId> {
        self.pending
    }

    /// Frames drawn so far.
    #[must_use]
    pub fn frames_drawn(&self) -> u64 {
        self.drawn
    }
}

/// Collapses bursts of resize events into one.
#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    window_ms: f64,
    deadline_ms: Option<f64>,
}

impl ResizeDebouncer {
    #[must_use]
    pub fn new(window_ms: f64) -> Self {
        Self { window_ms, deadline_ms: None }
    }

    /// Record a resize event, pushing the deadline out.
    pub fn notify(&mut self, now_ms: f64) {
        self.deadline_ms = Some(now_ms + self.window_ms);
    }

    /// Whether the quiet period has elapsed. Fires once per burst.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline_ms.is_some()
    }
}
