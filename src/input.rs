//! Input model: modifier keys, buttons, wheel deltas, and the press/drag
//! tracker shared by every viewport.
//!
//! `PointerState` is the gesture tracked between pointer-down and pointer-up.
//! It only decides whether a movement is a drag and by how much; the engine
//! applies the delta to whichever viewport the event came from.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button or a single-finger touch.
    Primary,
    Middle,
    Secondary,
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down, which zooms out).
    pub dy: f64,
}

/// Cursor the host should show over the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cursor {
    #[default]
    Default,
    /// Over a selectable photo or tour viewpoint.
    Pointer,
}

impl Cursor {
    /// CSS cursor keyword.
    #[must_use]
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Pointer => "pointer",
        }
    }
}

/// Press and drag tracking.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerState {
    /// A button or touch is held.
    pub down: bool,
    /// The current press has turned into a drag.
    pub moved: bool,
    /// Screen position of the press, or of the last applied drag step.
    last_screen: Option<Point>,
}

impl PointerState {
    pub fn press(&mut self, screen: Point) {
        self.down = true;
        self.last_screen = Some(screen);
    }

    /// Screen-pixel delta to pan by, or `None` while the press is still a click.
    ///
    /// Until the first drag step both axes must stay under `dead_zone`; after
    /// that every movement counts.
    pub fn drag(&mut self, screen: Point, dead_zone: f64) -> Option<(f64, f64)> {
        if !self.down {
            return None;
        }
        let last = self.last_screen?;
        let (dx, dy) = (screen.x - last.x, screen.y - last.y);
        if !self.moved && dx.abs() < dead_zone && dy.abs() < dead_zone {
            return None;
        }
        self.last_screen = Some(screen);
        self.moved = true;
        Some((dx, dy))
    }

    /// End the gesture. Returns whether it was a drag.
    pub fn release(&mut self) -> bool {
        let moved = self.moved;
        *self = Self::default();
        moved
    }
}
