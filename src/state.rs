//! Selection and mode state shared by every viewport.
//!
//! DESIGN
//! ======
//! Everything the viewer remembers between events apart from per-viewport
//! pan/zoom lives in one plain `ViewerState`. It is owned by
//! [`crate::engine::Viewer`], passed by reference to the pieces that read it,
//! and serializable so a host can persist or inspect it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_FIT_K;
use crate::geometry::Point;
use crate::input::{Cursor, PointerState};
use crate::model::{LevelIndex, PhotoId};

/// Where the photo popup is drawn after a click selects a photo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopupAnchor {
    /// Pointer position in canvas pixels.
    pub camera: Point,
    /// Pointer position in world units.
    pub world: Point,
    /// Screen-scaled offset from the pointer to the hotspot.
    pub vector: Point,
}

impl PopupAnchor {
    /// Canvas position of the popup: the hotspot under the pointer's screen frame.
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.camera.x - self.vector.x, self.camera.y - self.vector.y)
    }
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerState {
    pub active_level: LevelIndex,
    pub active_photo: Option<PhotoId>,
    /// Tour viewpoint under the pointer in tour mode.
    pub hover_sweep: Option<String>,
    pub popup: Option<PopupAnchor>,
    /// Photos that have been the active photo at least once.
    pub shown_photos: HashSet<PhotoId>,
    /// The last pointer position was strictly inside the active level.
    pub in_active_level: bool,
    pub cursor: Cursor,
    pub pointer: PointerState,

    pub measure_mode: bool,
    /// The 3D tour is shown; clicks navigate it instead of selecting photos.
    pub tour_mode: bool,
    pub show_all_levels: bool,
    pub show_all_hotspots: bool,
    pub show_level_titles: bool,
    /// Host switch that freezes pointer and wheel zoom/pan.
    pub zoom_enabled: bool,
    /// Rebuild map polygons on every lookup.
    pub edit_mode: bool,
    /// Stroke room outlines in random colours.
    pub debug_outlines: bool,
    pub initialized: bool,

    /// Snap every viewport to the active level on the next frame.
    pub fit_all: bool,
    /// Snap every viewport to the all-levels overview on the next frame.
    pub fit_all_levels: bool,
    pub fit_all_levels_k: f64,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            active_level: 0,
            active_photo: None,
            hover_sweep: None,
            popup: None,
            shown_photos: HashSet::new(),
            in_active_level: false,
            cursor: Cursor::Default,
            pointer: PointerState::default(),
            measure_mode: false,
            tour_mode: false,
            show_all_levels: false,
            show_all_hotspots: false,
            show_level_titles: false,
            zoom_enabled: true,
            edit_mode: false,
            debug_outlines: false,
            initialized: false,
            fit_all: false,
            fit_all_levels: false,
            fit_all_levels_k: DEFAULT_FIT_K,
        }
    }
}
