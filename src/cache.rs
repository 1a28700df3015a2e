//! Memoized per-level derived values.
//!
//! Three tables, all keyed by level index and all cleared explicitly:
//! world scale factors, map-space polygons for rooms and levels, and the
//! default photo shown when a level becomes active.

#[cfg(test)]
#[path = "cache_test.rs"]
mod cache_test;

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use crate::geometry::Point;
use crate::model::{Job, LevelIndex, Photo};
use crate::transform::{Transformer, try_world_scale};

/// Cached world scale per level. A cached `None` records a degenerate level.
#[derive(Debug, Clone, Default)]
pub struct ScaleTable {
    scales: HashMap<LevelIndex, Option<f64>>,
}

impl ScaleTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute and cache the scale of every level in the job.
    #[must_use]
    pub fn build(job: &Job) -> Self {
        let mut table = Self::new();
        for level in &job.levels {
            table.ensure(job, level.index);
        }
        table
    }

    /// Cached entry; the outer `None` means "not computed yet".
    #[must_use]
    pub fn get(&self, level: LevelIndex) -> Option<Option<f64>> {
        self.scales.get(&level).copied()
    }

    /// Return the cached scale, computing it first if needed.
    pub fn ensure(&mut self, job: &Job, level: LevelIndex) -> Option<f64> {
        *self
            .scales
            .entry(level)
            .or_insert_with(|| match try_world_scale(job, level) {
                Ok(scale) => Some(scale),
                Err(e) => {
                    debug!(level, error = %e, "no world scale");
                    None
                }
            })
    }

    /// Forget one level's scale, e.g. after its world bounds changed.
    pub fn invalidate(&mut self, level: LevelIndex) {
        self.scales.remove(&level);
    }

    pub fn clear(&mut self) {
        self.scales.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scales.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }
}

/// Map-space outlines of rooms and levels, parallel to `job.rooms` and
/// `job.levels`.
#[derive(Debug, Clone, Default)]
pub struct PolygonCache {
    rooms: Vec<Vec<Point>>,
    levels: Vec<Vec<Point>>,
    built: bool,
}

impl PolygonCache {
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Build the cache if it is incomplete, or unconditionally while editing.
    ///
    /// The cache only counts as built once every vertex converted. Until the
    /// tour has reported the extents it needs, each lookup retries.
    pub fn refresh(&mut self, transformer: &Transformer<'_>, job: &Job, edit_mode: bool) {
        if self.built && !edit_mode {
            return;
        }
        self.rooms = job
            .rooms
            .iter()
            .map(|room| map_polygon(transformer, &room.polygon, room.index_level))
            .collect();
        self.levels = job
            .levels
            .iter()
            .map(|level| map_polygon(transformer, &level.polygon, level.index))
            .collect();
        let complete = job.rooms.iter().zip(&self.rooms).all(|(r, m)| r.polygon.len() == m.len())
            && job.levels.iter().zip(&self.levels).all(|(l, m)| l.polygon.len() == m.len());
        self.built = complete;
        debug!(rooms = self.rooms.len(), levels = self.levels.len(), complete, "rebuilt map polygons");
    }

    /// Map-space outline of `job.rooms[position]`.
    #[must_use]
    pub fn room(&self, position: usize) -> Option<&[Point]> {
        self.rooms.get(position).map(Vec::as_slice)
    }

    /// Map-space outline of `job.levels[position]`.
    #[must_use]
    pub fn level(&self, position: usize) -> Option<&[Point]> {
        self.levels.get(position).map(Vec::as_slice)
    }

    pub fn invalidate(&mut self) {
        self.rooms.clear();
        self.levels.clear();
        self.built = false;
    }
}

/// World outline -> level-own HPL -> map. Vertices that cannot be converted
/// yet (no tour extent, degenerate scale) are dropped.
fn map_polygon(transformer: &Transformer<'_>, polygon: &[Point], level: LevelIndex) -> Vec<Point> {
    polygon
        .iter()
        .filter_map(|&p| transformer.world_to_map(p, level))
        .collect()
}

/// Default photo shown for each level.
#[derive(Debug, Clone, Default)]
pub struct DefaultPhotos {
    by_level: HashMap<LevelIndex, Photo>,
}

impl DefaultPhotos {
    #[must_use]
    pub fn get(&self, level: LevelIndex) -> Option<&Photo> {
        self.by_level.get(&level)
    }

    pub fn set(&mut self, level: LevelIndex, photo: Photo) {
        self.by_level.insert(level, photo);
    }

    /// Resolve the default photo for `level` and cache it.
    ///
    /// Order: cached value, first photo on the level, then a copy of another
    /// level's cached default retargeted to `level` under a fresh id.
    pub fn resolve(&mut self, job: &Job, level: LevelIndex) -> Option<Photo> {
        if let Some(p) = self.by_level.get(&level) {
            return Some(p.clone());
        }
        let photo = job
            .photos_on_level(level)
            .next()
            .cloned()
            .or_else(|| self.borrow_from_neighbour(level))?;
        self.by_level.insert(level, photo.clone());
        Some(photo)
    }

    fn borrow_from_neighbour(&self, level: LevelIndex) -> Option<Photo> {
        let mut levels: Vec<_> = self.by_level.keys().copied().filter(|&l| l != level).collect();
        levels.sort_unstable();
        let source = self.by_level.get(levels.first()?)?;
        let mut photo = source.clone();
        photo.id = Uuid::new_v4();
        if let Some(h) = photo.hotspot.as_mut() {
            h.level_index = level;
        }
        debug!(level, source = %source.id, "borrowed default photo from another level");
        Some(photo)
    }

    pub fn clear(&mut self) {
        self.by_level.clear();
    }
}
