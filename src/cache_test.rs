#![allow(clippy::float_cmp)]

use super::*;
use crate::fixtures::{pt, sample_job, sample_tour};
use crate::model::Hotspot;
use crate::tour::TourSnapshot;
use crate::transform::Rotation;

// =============================================================
// ScaleTable
// =============================================================

#[test]
fn scale_table_build_covers_every_level() {
    let job = sample_job();
    let table = ScaleTable::build(&job);
    assert_eq!(table.len(), 2);
    assert_eq!(table.get(0), Some(Some(1.25)));
    assert_eq!(table.get(1), Some(Some(1.25)));
    assert_eq!(table.get(7), None);
}

#[test]
fn scale_table_caches_degenerate_levels() {
    let mut job = sample_job();
    job.levels[1].world.width = 0.0;
    let table = ScaleTable::build(&job);
    assert_eq!(table.get(1), Some(None));
}

#[test]
fn scale_table_ensure_computes_once() {
    let mut job = sample_job();
    let mut table = ScaleTable::new();
    assert!(table.is_empty());
    assert_eq!(table.ensure(&job, 0), Some(1.25));

    job.levels[0].world.width = 400.0;
    assert_eq!(table.ensure(&job, 0), Some(1.25));

    table.invalidate(0);
    assert_eq!(table.ensure(&job, 0), Some(2.5));
}

#[test]
fn scale_table_clear_empties() {
    let mut table = ScaleTable::build(&sample_job());
    table.clear();
    assert!(table.is_empty());
}

// =============================================================
// PolygonCache
// =============================================================

#[test]
fn polygon_cache_builds_parallel_tables() {
    let job = sample_job();
    let tour = sample_tour();
    let scales = ScaleTable::build(&job);
    let t = Transformer::new(&job, &tour, &scales, Rotation::Deg0, 0);

    let mut cache = PolygonCache::default();
    assert!(!cache.is_built());
    cache.refresh(&t, &job, false);
    assert!(cache.is_built());
    assert_eq!(cache.room(0).map(<[Point]>::len), Some(4));
    assert_eq!(cache.room(2).map(<[Point]>::len), Some(4));
    assert!(cache.room(3).is_none());
    assert_eq!(cache.level(1).map(<[Point]>::len), Some(4));
}

#[test]
fn polygon_cache_matches_world_to_map() {
    let job = sample_job();
    let tour = sample_tour();
    let scales = ScaleTable::build(&job);
    let t = Transformer::new(&job, &tour, &scales, Rotation::Deg0, 0);
    let mut cache = PolygonCache::default();
    cache.refresh(&t, &job, false);

    let expected = t.world_to_map(job.rooms[1].polygon[2], 0).unwrap();
    assert_eq!(cache.room(1).unwrap()[2], expected);
}

#[test]
fn polygon_cache_is_sticky_outside_edit_mode() {
    let mut job = sample_job();
    let tour = sample_tour();
    let scales = ScaleTable::build(&job);
    let mut cache = PolygonCache::default();
    {
        let t = Transformer::new(&job, &tour, &scales, Rotation::Deg0, 0);
        cache.refresh(&t, &job, false);
    }
    let before = cache.room(0).unwrap().to_vec();

    job.rooms[0].polygon[0] = pt(0.0, 0.0);
    let t = Transformer::new(&job, &tour, &scales, Rotation::Deg0, 0);
    cache.refresh(&t, &job, false);
    assert_eq!(cache.room(0).unwrap(), before.as_slice());

    cache.refresh(&t, &job, true);
    assert_ne!(cache.room(0).unwrap(), before.as_slice());
}

#[test]
fn polygon_cache_retries_until_tour_extents_arrive() {
    let job = sample_job();
    let scales = ScaleTable::build(&job);
    let mut cache = PolygonCache::default();

    let early = TourSnapshot::new();
    let t = Transformer::new(&job, &early, &scales, Rotation::Deg0, 0);
    cache.refresh(&t, &job, false);
    assert_eq!(cache.room(0).map(<[Point]>::len), Some(0));
    assert!(!cache.is_built());

    let tour = sample_tour();
    let t = Transformer::new(&job, &tour, &scales, Rotation::Deg0, 0);
    cache.refresh(&t, &job, false);
    assert!(cache.is_built());
    assert_eq!(cache.room(0).map(<[Point]>::len), Some(job.rooms[0].polygon.len()));
}

#[test]
fn polygon_cache_invalidate_forces_rebuild() {
    let job = sample_job();
    let tour = sample_tour();
    let scales = ScaleTable::build(&job);
    let t = Transformer::new(&job, &tour, &scales, Rotation::Deg0, 0);
    let mut cache = PolygonCache::default();
    cache.refresh(&t, &job, false);
    cache.invalidate();
    assert!(!cache.is_built());
    assert!(cache.room(0).is_none());
}

// =============================================================
// DefaultPhotos
// =============================================================

#[test]
fn default_photo_is_first_photo_on_level() {
    let job = sample_job();
    let mut defaults = DefaultPhotos::default();
    let photo = defaults.resolve(&job, 0).unwrap();
    assert_eq!(photo.id, job.photos[0].id);
    assert_eq!(defaults.get(0).map(|p| p.id), Some(job.photos[0].id));
}

#[test]
fn default_photo_prefers_cached_value() {
    let job = sample_job();
    let mut defaults = DefaultPhotos::default();
    defaults.set(0, job.photos[1].clone());
    assert_eq!(defaults.resolve(&job, 0).unwrap().id, job.photos[1].id);
}

#[test]
fn default_photo_borrows_from_other_level() {
    let mut job = sample_job();
    job.photos.retain(|p| !p.is_on_level(1));
    let mut defaults = DefaultPhotos::default();
    let ground = defaults.resolve(&job, 0).unwrap();

    let borrowed = defaults.resolve(&job, 1).unwrap();
    assert_ne!(borrowed.id, ground.id);
    assert_eq!(borrowed.level_index(), Some(1));
    assert_eq!(
        borrowed.hotspot.map(|h| h.position()),
        ground.hotspot.map(|h: Hotspot| h.position())
    );
}

#[test]
fn default_photo_none_without_any_source() {
    let mut job = sample_job();
    job.photos.clear();
    let mut defaults = DefaultPhotos::default();
    assert!(defaults.resolve(&job, 0).is_none());
    assert!(defaults.get(0).is_none());
}

#[test]
fn default_photo_clear_forgets_levels() {
    let job = sample_job();
    let mut defaults = DefaultPhotos::default();
    defaults.resolve(&job, 0);
    defaults.clear();
    assert!(defaults.get(0).is_none());
}
