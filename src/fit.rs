//! Fit computations: the scale and pan offsets that place a level, or the
//! union of all levels, inside a canvas.
//!
//! A [`Snapshot`]'s shifts are HPL pixels relative to the active level's
//! top-left corner, so canvas = `(hpl + shift) * scale`.

#[cfg(test)]
#[path = "fit_test.rs"]
mod fit_test;

use serde::{Deserialize, Serialize};

use crate::config::FitPosition;
use crate::consts::{FIT_CENTER_VERTICAL_BIAS, FIT_TOP_RIGHT_VERTICAL_BIAS, SCALE_EPSILON};
use crate::error::ViewerError;
use crate::geometry::{Bounds, Size};

/// Scale and pan offsets of a viewport at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub scale: f64,
    pub shift_x: f64,
    pub shift_y: f64,
}

impl Snapshot {
    #[must_use]
    pub fn new(scale: f64, shift_x: f64, shift_y: f64) -> Self {
        Self { scale, shift_x, shift_y }
    }

    /// Linear interpolation of all three fields; `t = 0` is `self`.
    #[must_use]
    pub fn lerp(&self, to: &Snapshot, t: f64) -> Snapshot {
        Snapshot {
            scale: self.scale + (to.scale - self.scale) * t,
            shift_x: self.shift_x + (to.shift_x - self.shift_x) * t,
            shift_y: self.shift_y + (to.shift_y - self.shift_y) * t,
        }
    }
}

/// Horizontal and vertical share of the spare canvas space placed before the content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

impl Anchor {
    /// Centred on both axes.
    pub const MIDDLE: Anchor = Anchor { x: 0.5, y: 0.5 };
}

impl From<FitPosition> for Anchor {
    fn from(position: FitPosition) -> Self {
        match position {
            FitPosition::Center => Anchor { x: 0.5, y: FIT_CENTER_VERTICAL_BIAS },
            FitPosition::TopRight => Anchor { x: 1.0, y: FIT_TOP_RIGHT_VERTICAL_BIAS },
        }
    }
}

/// `min(cw / w, ch / h) * k`, rejecting empty canvases and content.
fn fit_scale(canvas: Size, width: f64, height: f64, k: f64) -> Result<f64, ViewerError> {
    let degenerate = || ViewerError::DegenerateFit {
        width,
        height,
        canvas_width: canvas.width,
        canvas_height: canvas.height,
    };
    if canvas.is_empty() || !(width > SCALE_EPSILON && height > SCALE_EPSILON) {
        return Err(degenerate());
    }
    let scale = (canvas.width / width).min(canvas.height / height) * k;
    if scale.is_finite() && scale > SCALE_EPSILON { Ok(scale) } else { Err(degenerate()) }
}

/// Fit one level box so that it fills `k` of the canvas.
///
/// # Errors
///
/// [`ViewerError::DegenerateFit`] when the canvas or the level has no area.
pub fn fit_level(canvas: Size, level: &Bounds, k: f64, anchor: Anchor) -> Result<Snapshot, ViewerError> {
    let scale = fit_scale(canvas, level.width(), level.height(), k)?;
    Ok(Snapshot {
        scale,
        shift_x: (canvas.width / scale - level.width()) * anchor.x,
        shift_y: (canvas.height / scale - level.height()) * anchor.y,
    })
}

/// Fit the union of every level, expressed relative to `anchor_level`'s origin.
///
/// The union is always centred; the shift compensates for the distance between
/// the union's top-left and the anchor level's.
///
/// # Errors
///
/// [`ViewerError::DegenerateFit`] when the canvas or the union has no area.
pub fn fit_union(canvas: Size, union: &Bounds, anchor_level: &Bounds, k: f64) -> Result<Snapshot, ViewerError> {
    let scale = fit_scale(canvas, union.width(), union.height(), k)?;
    Ok(Snapshot {
        scale,
        shift_x: (canvas.width / scale - union.width()) * 0.5 - (union.left - anchor_level.left),
        shift_y: (canvas.height / scale - union.height()) * 0.5 - (union.top - anchor_level.top),
    })
}
