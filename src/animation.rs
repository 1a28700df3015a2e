//! Camera transitions between levels.
//!
//! A small state machine advanced by [`Animator::tick`]. The host's timer
//! supplies the clock; nothing here reads wall time, so tests drive it with
//! plain numbers.
//!
//! Two paths exist:
//!
//! - **DirectFit**: from the all-levels overview straight into the
//!   destination level. Scale moves linearly; shifts follow a cube-root ease so
//!   most of the pan happens early.
//! - **TwoHopFly**: zoom out from the origin level to the overview, then in to
//!   the destination. The active level flips at the halfway point.
//!
//! Both read their targets from each viewport's [`Stages`](crate::viewport::Stages),
//! which the caller fills before starting.

#[cfg(test)]
#[path = "animation_test.rs"]
mod animation_test;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fit::Snapshot;
use crate::model::LevelIndex;
use crate::viewport::{Viewport, ViewportId, Writer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationKind {
    DirectFit,
    TwoHopFly,
}

/// Identifies one started animation. A new start always gets a new handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(pub u64);

#[derive(Debug, Clone, PartialEq)]
struct Run {
    kind: AnimationKind,
    handle: TimerHandle,
    from_level: LevelIndex,
    to_level: LevelIndex,
    duration_ms: f64,
    remaining_ms: f64,
    last_tick_ms: f64,
    viewports: Vec<ViewportId>,
}

impl Run {
    fn percent(&self) -> f64 {
        (1.0 - self.remaining_ms / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Viewport state at `percent`.
    fn sample(&self, viewport: &Viewport, percent: f64) -> Snapshot {
        let st = &viewport.stages;
        match self.kind {
            AnimationKind::DirectFit => {
                let ease = percent.cbrt();
                Snapshot {
                    scale: st.middle_in.scale + (st.finish.scale - st.middle_in.scale) * percent,
                    shift_x: st.middle_in.shift_x + (st.finish.shift_x - st.middle_in.shift_x) * ease,
                    shift_y: st.middle_in.shift_y + (st.finish.shift_y - st.middle_in.shift_y) * ease,
                }
            }
            AnimationKind::TwoHopFly if percent < 0.5 => st.start.lerp(&st.middle_out, percent * 2.0),
            AnimationKind::TwoHopFly => st.middle_in.lerp(&st.finish, (percent - 0.5) * 2.0),
        }
    }

    fn level_at(&self, percent: f64) -> LevelIndex {
        match self.kind {
            AnimationKind::TwoHopFly if percent < 0.5 => self.from_level,
            _ => self.to_level,
        }
    }
}

/// Result of one [`Animator::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// No animation is running.
    Idle,
    /// Still running; `active_level` is the level to show this frame.
    Running { active_level: LevelIndex },
    /// Completed this tick. Viewports hold their exact `finish` snapshot and
    /// are back under input control.
    Finished { level: LevelIndex },
}

#[derive(Debug, Clone, Default)]
pub struct Animator {
    run: Option<Run>,
    next_handle: u64,
}

impl Animator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Handle of the running animation's timer, if any.
    #[must_use]
    pub fn timer(&self) -> Option<TimerHandle> {
        self.run.as_ref().map(|r| r.handle)
    }

    #[must_use]
    pub fn kind(&self) -> Option<AnimationKind> {
        self.run.as_ref().map(|r| r.kind)
    }

    /// Start an animation on `viewports`, replacing any running one.
    ///
    /// Each viewport's stages must already be filled in. The viewports are
    /// claimed for the animation and set to their percent-0 state.
    pub fn start(
        &mut self,
        kind: AnimationKind,
        from_level: LevelIndex,
        to_level: LevelIndex,
        duration_ms: f64,
        now_ms: f64,
        viewports: &mut [Viewport],
    ) -> TimerHandle {
        if self.run.is_some() {
            self.cancel(viewports);
        }
        let handle = TimerHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);

        let run = Run {
            kind,
            handle,
            from_level,
            to_level,
            duration_ms,
            remaining_ms: duration_ms,
            last_tick_ms: now_ms,
            viewports: viewports.iter().map(Viewport::id).collect(),
        };
        for v in viewports.iter_mut() {
            v.set_writer(Writer::Animation);
            let s = run.sample(v, 0.0);
            v.apply(s);
        }
        debug!(?kind, from_level, to_level, duration_ms, handle = handle.0, "animation started");
        self.run = Some(run);
        handle
    }

    /// Advance to `now_ms` and write the interpolated state into the claimed viewports.
    pub fn tick(&mut self, now_ms: f64, viewports: &mut [Viewport]) -> Tick {
        let Some(run) = self.run.as_mut() else {
            return Tick::Idle;
        };
        run.remaining_ms -= (now_ms - run.last_tick_ms).max(0.0);
        run.last_tick_ms = now_ms;

        if run.remaining_ms <= 0.0 || run.duration_ms <= 0.0 {
            let level = run.to_level;
            self.finish(viewports);
            return Tick::Finished { level };
        }

        let percent = run.percent();
        for v in viewports.iter_mut().filter(|v| run.viewports.contains(&v.id())) {
            let s = run.sample(v, percent);
            v.apply(s);
        }
        Tick::Running { active_level: run.level_at(percent) }
    }

    /// Stop the running animation where it is and return the viewports to input.
    pub fn cancel(&mut self, viewports: &mut [Viewport]) {
        if let Some(run) = self.run.take() {
            release(&run, viewports);
            debug!(handle = run.handle.0, "animation cancelled");
        }
    }

    fn finish(&mut self, viewports: &mut [Viewport]) {
        if let Some(run) = self.run.take() {
            for v in viewports.iter_mut().filter(|v| run.viewports.contains(&v.id())) {
                let finish = v.stages.finish;
                v.apply(finish);
            }
            release(&run, viewports);
            debug!(handle = run.handle.0, level = run.to_level, "animation finished");
        }
    }
}

fn release(run: &Run, viewports: &mut [Viewport]) {
    for v in viewports.iter_mut().filter(|v| run.viewports.contains(&v.id())) {
        v.set_writer(Writer::Input);
    }
}
