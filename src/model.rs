//! Job model: levels, rooms, photos, labels, and tour floor mappings.
//!
//! The job is loaded once and treated as read-only by the viewer. Data
//! arrives as JSON from the host; everything here derives serde so the probe
//! binary and tests can build jobs from fixtures. Derived per-level values
//! (scale factors, map-space polygons, default photos) are not stored here,
//! see [`crate::cache`].

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ViewerError;
use crate::geometry::{Bounds, Point};

/// Index of a building level as used throughout the job.
pub type LevelIndex = usize;

/// Unique identifier for a photo.
pub type PhotoId = Uuid;

/// World-space extent of a level's drawing, as published by its floor routine.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldBounds {
    pub left: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

/// World-space bounding box of a level's walls (the well).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WallBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

/// One building level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub index: LevelIndex,
    /// Box of the level in HPL space.
    pub bounds: Bounds,
    /// World extent matching `bounds`; `bounds.width() / world.width` is the world scale.
    pub world: WorldBounds,
    /// Wall extent in world units.
    #[serde(default)]
    pub walls: WallBounds,
    /// Outline of the level's well, in world units.
    #[serde(default)]
    pub polygon: Vec<Point>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub family: String,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub point_size: f64,
    /// `"YES"` (any case) marks the level shown first.
    #[serde(default)]
    pub default: String,
}

impl Level {
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.default.eq_ignore_ascii_case("yes")
    }
}

/// A room outline on one level, in world units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub index_level: LevelIndex,
    pub polygon: Vec<Point>,
}

/// Where a photo was taken.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub level_index: LevelIndex,
    pub wx: f64,
    pub wy: f64,
    /// Facing direction in sixteenths of a turn.
    #[serde(default)]
    pub dir: f64,
}

impl Hotspot {
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.wx, self.wy)
    }
}

/// A photo and its hotspot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: PhotoId,
    #[serde(default)]
    pub hotspot: Option<Hotspot>,
    #[serde(default)]
    pub deleted: bool,
    /// Marker has been shown highlighted at least once.
    #[serde(default, skip_serializing)]
    pub show: bool,
    /// Marker click is pending confirmation.
    #[serde(default, skip_serializing)]
    pub show_click: bool,
}

impl Photo {
    #[must_use]
    pub fn level_index(&self) -> Option<LevelIndex> {
        self.hotspot.map(|h| h.level_index)
    }

    #[must_use]
    pub fn is_on_level(&self, level: LevelIndex) -> bool {
        self.level_index() == Some(level)
    }
}

/// A text label placed on a level, in world units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub level_number: LevelIndex,
    pub text: String,
    pub wx: f64,
    pub wy: f64,
    /// Minimum viewport scale at which the label shows; `0` or absent defers to the global threshold.
    #[serde(default)]
    pub scale: Option<f64>,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub family: String,
}

/// Maps a tour floor to a building level, with per-axis corrections.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TourLevel {
    /// Tour-internal floor sequence number.
    pub index: usize,
    pub index_level: LevelIndex,
    #[serde(default)]
    pub offset_x: f64,
    #[serde(default)]
    pub offset_y: f64,
}

/// The read-only job model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub levels: Vec<Level>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub tour_levels: Vec<TourLevel>,
    /// Rotation of the tour relative to the building, in degrees.
    #[serde(default)]
    pub tour_rotation: i32,
}

impl Job {
    /// Parse a job from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::InvalidJob`] if the JSON does not match the model.
    pub fn from_json(json: &str) -> Result<Self, ViewerError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Look up a level by its index, falling back to its position in the list.
    #[must_use]
    pub fn level(&self, index: LevelIndex) -> Option<&Level> {
        self.levels
            .iter()
            .find(|l| l.index == index)
            .or_else(|| self.levels.get(index))
    }

    /// HPL box of a level; all zeros for unknown levels.
    #[must_use]
    pub fn level_bounds(&self, index: LevelIndex) -> Bounds {
        self.level(index).map(|l| l.bounds).unwrap_or_default()
    }

    /// The level flagged as default, else 0.
    #[must_use]
    pub fn default_level(&self) -> LevelIndex {
        self.levels
            .iter()
            .find(|l| l.is_default())
            .map_or(0, |l| l.index)
    }

    /// Box enclosing every level, or `None` for a job without levels.
    #[must_use]
    pub fn union_bounds(&self) -> Option<Bounds> {
        let mut levels = self.levels.iter();
        let first = levels.next()?.bounds;
        Some(levels.fold(first, |acc, l| acc.union(&l.bounds)))
    }

    #[must_use]
    pub fn photo(&self, id: PhotoId) -> Option<&Photo> {
        self.photos.iter().find(|p| p.id == id)
    }

    pub fn photos_on_level(&self, level: LevelIndex) -> impl Iterator<Item = &Photo> {
        self.photos.iter().filter(move |p| p.is_on_level(level))
    }

    pub fn labels_on_level(&self, level: LevelIndex) -> impl Iterator<Item = &Label> {
        self.labels.iter().filter(move |l| l.level_number == level)
    }

    pub fn rooms_on_level(&self, level: LevelIndex) -> impl Iterator<Item = &Room> {
        self.rooms.iter().filter(move |r| r.index_level == level)
    }

    /// Tour floor shown for `level`; floor 0 when the level has no mapping.
    #[must_use]
    pub fn tour_floor_for_level(&self, level: LevelIndex) -> usize {
        self.tour_levels
            .iter()
            .find(|m| m.index_level == level)
            .map_or(0, |m| m.index)
    }

    /// Level shown for tour floor `floor`, if mapped.
    #[must_use]
    pub fn level_for_tour_floor(&self, floor: usize) -> Option<LevelIndex> {
        self.tour_levels
            .iter()
            .find(|m| m.index == floor)
            .map(|m| m.index_level)
    }

    /// Offset corrections for tour floor `floor`; zero when unmapped.
    #[must_use]
    pub fn tour_offset(&self, floor: usize) -> (f64, f64) {
        self.tour_levels
            .iter()
            .find(|m| m.index == floor)
            .map_or((0.0, 0.0), |m| (m.offset_x, m.offset_y))
    }

    /// Smallest label point size across levels; 0 without levels.
    #[must_use]
    pub fn min_point_size(&self) -> f64 {
        let min = self
            .levels
            .iter()
            .map(|l| l.point_size)
            .fold(f64::INFINITY, f64::min);
        if min.is_finite() { min } else { 0.0 }
    }
}
