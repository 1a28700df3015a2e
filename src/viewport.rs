#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};

use crate::fit::Snapshot;
use crate::geometry::{Affine, Bounds, Point, Size};

/// Handle of one registered viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ViewportId(pub u32);

/// Which controller may currently move a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Writer {
    /// Pointer, wheel, pinch and zoom buttons.
    #[default]
    Input,
    /// A running camera animation; input mutations are refused.
    Animation,
}

/// Snapshots staged by an animation.
///
/// The all-levels overview is stored twice because it is anchored on the
/// origin level for the zoom-out half of a fly and on the destination level
/// for the zoom-in half.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Stages {
    pub start: Snapshot,
    pub middle_out: Snapshot,
    pub middle_in: Snapshot,
    pub finish: Snapshot,
}

/// Pan/zoom state of one drawing surface ("canvas shell").
///
/// `shift_x` / `shift_y` are HPL pixels added before scaling, measured from
/// the active level's top-left corner. `scale` is canvas pixels per HPL pixel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    id: ViewportId,
    pub size: Size,
    /// Full-bleed viewports take the host's full size on resize instead of
    /// their parent's.
    pub full: bool,
    pub scale: f64,
    pub shift_x: f64,
    pub shift_y: f64,
    pinch_scale: f64,
    pinch_shift_x: f64,
    pinch_shift_y: f64,
    pub stages: Stages,
    writer: Writer,
}

impl Viewport {
    #[must_use]
    pub fn new(id: ViewportId, size: Size, full: bool) -> Self {
        Self {
            id,
            size,
            full,
            scale: 1.0,
            shift_x: 0.0,
            shift_y: 0.0,
            pinch_scale: 1.0,
            pinch_shift_x: 0.0,
            pinch_shift_y: 0.0,
            stages: Stages::default(),
            writer: Writer::Input,
        }
    }

    #[must_use]
    pub fn id(&self) -> ViewportId {
        self.id
    }

    #[must_use]
    pub fn writer(&self) -> Writer {
        self.writer
    }

    /// Hand the viewport to `writer`. Only the animation controller claims it.
    pub fn set_writer(&mut self, writer: Writer) {
        self.writer = writer;
    }

    fn accepts_input(&self) -> bool {
        self.writer == Writer::Input
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.scale, self.shift_x, self.shift_y)
    }

    /// Overwrite scale and shifts. Non-finite snapshots are ignored.
    pub fn apply(&mut self, s: Snapshot) {
        if s.scale.is_finite() && s.shift_x.is_finite() && s.shift_y.is_finite() {
            self.scale = s.scale;
            self.shift_x = s.shift_x;
            self.shift_y = s.shift_y;
        }
    }

    // --- Coordinates ---

    /// Canvas pixels to HPL pixels in the active level's frame.
    #[must_use]
    pub fn canvas_to_hpl(&self, canvas: Point) -> Point {
        Point::new(canvas.x / self.scale - self.shift_x, canvas.y / self.scale - self.shift_y)
    }

    /// HPL pixels in the active level's frame to canvas pixels.
    #[must_use]
    pub fn hpl_to_canvas(&self, hpl: Point) -> Point {
        Point::new((hpl.x + self.shift_x) * self.scale, (hpl.y + self.shift_y) * self.scale)
    }

    /// Transform from absolute HPL (the job's shared pixel space) to canvas.
    #[must_use]
    pub fn board_transform(&self, active: &Bounds) -> Affine {
        Affine::new(
            self.scale,
            0.0,
            0.0,
            self.scale,
            (self.shift_x - active.left) * self.scale,
            (self.shift_y - active.top) * self.scale,
        )
    }

    /// Transform from a level's bottom-left, y-up frame to canvas. World
    /// drawing stacks the level's world transform on top of this.
    #[must_use]
    pub fn level_transform(&self, active: &Bounds, level: &Bounds) -> Affine {
        self.board_transform(active)
            .then_local(&Affine::new(1.0, 0.0, 0.0, -1.0, level.left, level.top + level.height()))
    }

    // --- Input mutations ---
    //
    // Each returns whether the viewport changed. Viewports owned by an
    // animation refuse all of them.

    /// Zoom by `1 + increment` keeping the HPL point under `canvas` fixed.
    pub fn zoom_on_point(&mut self, canvas: Point, increment: f64) -> bool {
        let next = self.scale * (1.0 + increment);
        if !self.accepts_input() || !(next.is_finite() && next > 0.0) {
            return false;
        }
        self.scale = next;
        self.shift_x -= canvas.x / self.scale * increment;
        self.shift_y -= canvas.y / self.scale * increment;
        true
    }

    /// Zoom about the viewport's centre.
    pub fn zoom_step(&mut self, increment: f64) -> bool {
        self.zoom_on_point(self.size.center(), increment)
    }

    /// Shift+wheel.
    pub fn wheel_pan_vertical(&mut self, delta_y: f64) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.shift_y += delta_y / (self.scale + 1.0);
        true
    }

    /// Ctrl+wheel.
    pub fn wheel_pan_horizontal(&mut self, delta_y: f64) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.shift_x += delta_y / (self.scale + 1.0);
        true
    }

    /// Pan by a screen-pixel delta.
    pub fn pan_screen(&mut self, dx: f64, dy: f64) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.shift_x += dx / self.scale;
        self.shift_y += dy / self.scale;
        true
    }

    /// Record the pinch baseline at gesture start.
    pub fn begin_pinch(&mut self) {
        self.pinch_scale = self.scale;
        self.pinch_shift_x = self.shift_x / self.scale;
        self.pinch_shift_y = self.shift_y / self.scale;
    }

    /// Apply a gesture scale factor relative to the baseline.
    pub fn pinch(&mut self, factor: f64) -> bool {
        let next = self.pinch_scale * factor;
        if !self.accepts_input() || !(next.is_finite() && next > 0.0) {
            return false;
        }
        self.scale = next;
        self.shift_x = self.pinch_shift_x * self.pinch_scale;
        self.shift_y = self.pinch_shift_y * self.pinch_scale;
        true
    }
}
