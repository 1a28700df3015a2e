//! Hit-testing: which level, room, photo, or tour viewpoint is under the pointer.
//!
//! Every function here is pure over the job model and already-converted
//! pointer coordinates. The caller resolves the level first, because the
//! level decides which transform produces the world and map points.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::FAR_DISTANCE;
use crate::geometry::{Point, inside};
use crate::model::{Job, LevelIndex, Photo, PhotoId};
use crate::tour::Sweep;

/// Level resolved from a pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelHit {
    pub level: LevelIndex,
    /// The pointer is strictly inside the active level's box.
    pub in_active_level: bool,
}

/// Find the level whose box strictly contains the pointer.
///
/// `pointer` is HPL in the active level's frame. Without a match the active
/// level is kept and `in_active_level` is false.
#[must_use]
pub fn resolve_level(job: &Job, active: LevelIndex, pointer: Point) -> LevelHit {
    let origin = job.level_bounds(active);
    let absolute = Point::new(pointer.x + origin.left, pointer.y + origin.top);
    match job.levels.iter().find(|l| l.bounds.contains_strict(absolute)) {
        Some(l) => LevelHit { level: l.index, in_active_level: l.index == active },
        None => LevelHit { level: active, in_active_level: false },
    }
}

/// Positions in `job.rooms` of the rooms on `level` containing `world`, in
/// document order.
#[must_use]
pub fn identify_rooms(job: &Job, level: LevelIndex, world: Point) -> Vec<usize> {
    job.rooms
        .iter()
        .enumerate()
        .filter(|(_, room)| room.index_level == level && inside(world, &room.polygon, false))
        .map(|(i, _)| i)
        .collect()
}

fn candidates(job: &Job, level: LevelIndex) -> impl Iterator<Item = (&Photo, Point)> {
    job.photos_on_level(level)
        .filter(|p| !p.deleted)
        .filter_map(|p| p.hotspot.map(|h| (p, h.position())))
}

/// First live photo on `level` within `tolerance` of `world` on both axes.
#[must_use]
pub fn select_photo(job: &Job, level: LevelIndex, world: Point, tolerance: f64) -> Option<&Photo> {
    candidates(job, level)
        .find(|(_, at)| (world.x - at.x).abs() < tolerance && (world.y - at.y).abs() < tolerance)
        .map(|(p, _)| p)
}

#[derive(Debug, Clone, Copy)]
pub struct NearestPhoto<'a> {
    pub photo: &'a Photo,
    /// World distance from the pointer.
    pub distance: f64,
}

/// Closest live photo on `level` to `world`; ties keep the earlier photo.
#[must_use]
pub fn nearest_photo(job: &Job, level: LevelIndex, world: Point) -> Option<NearestPhoto<'_>> {
    let mut best: Option<NearestPhoto<'_>> = None;
    for (photo, at) in candidates(job, level) {
        let distance = world.distance(at);
        if distance < best.map_or(FAR_DISTANCE, |b| b.distance) {
            best = Some(NearestPhoto { photo, distance });
        }
    }
    best
}

/// Hover hysteresis: adopt `candidate` when nothing is active yet, or when it
/// is a different photo closer than `threshold`.
#[must_use]
pub fn should_switch(active: Option<PhotoId>, candidate: &NearestPhoto<'_>, threshold: f64) -> bool {
    match active {
        None => true,
        Some(id) => id != candidate.photo.id && candidate.distance < threshold,
    }
}

/// Viewpoints on tour floor `floor` that pass the area filter.
///
/// With a room outline only viewpoints inside it pass. Otherwise the level
/// outline is tested with an inverted seed, so viewpoints pass when they are
/// *not* inside it; an empty outline lets everything through.
#[must_use]
pub fn sweeps_inside<'a>(sweeps: &'a [Sweep], floor: usize, room: Option<&[Point]>, level: &[Point]) -> Vec<&'a Sweep> {
    sweeps
        .iter()
        .filter(|s| s.floor_sequence == floor)
        .filter(|s| match (s.map_point(), room) {
            (Some(at), Some(ring)) => inside(at, ring, false),
            (Some(at), None) => inside(at, level, true),
            (None, _) => false,
        })
        .collect()
}

/// Closest viewpoint to `pointer` in map space, optionally within `max_distance`.
#[must_use]
pub fn nearest_sweep<'a>(candidates: &[&'a Sweep], pointer: Point, max_distance: Option<f64>) -> Option<&'a Sweep> {
    let mut best = FAR_DISTANCE;
    let mut found = None;
    for &sweep in candidates {
        let Some(at) = sweep.map_point() else { continue };
        let d = pointer.distance(at);
        if d < best && max_distance.is_none_or(|max| d < max) {
            best = d;
            found = Some(sweep);
        }
    }
    found
}
