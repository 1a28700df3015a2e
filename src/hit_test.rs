#![allow(clippy::float_cmp)]

use super::*;
use crate::fixtures::{pt, rect_ring, sample_job, sample_tour};

// =============================================================
// resolve_level
// =============================================================

#[test]
fn resolve_level_inside_active() {
    let job = sample_job();
    let hit = resolve_level(&job, 0, pt(500.0, 400.0));
    assert_eq!(hit, LevelHit { level: 0, in_active_level: true });
}

#[test]
fn resolve_level_finds_other_level() {
    let job = sample_job();
    let hit = resolve_level(&job, 0, pt(1300.0, 100.0));
    assert_eq!(hit, LevelHit { level: 1, in_active_level: false });
}

#[test]
fn resolve_level_keeps_active_in_gap() {
    let job = sample_job();
    let hit = resolve_level(&job, 1, pt(-100.0, 100.0));
    assert_eq!(hit, LevelHit { level: 1, in_active_level: false });
}

#[test]
fn resolve_level_offsets_by_active_origin() {
    let job = sample_job();
    // Level 1 starts at x=1200, so -1000 in its frame is x=200 on level 0.
    let hit = resolve_level(&job, 1, pt(-1000.0, 100.0));
    assert_eq!(hit.level, 0);
}

#[test]
fn resolve_level_edges_are_outside() {
    let job = sample_job();
    let hit = resolve_level(&job, 0, pt(0.0, 400.0));
    assert!(!hit.in_active_level);
}

#[test]
fn resolve_level_without_levels() {
    let hit = resolve_level(&Job::default(), 0, pt(1.0, 1.0));
    assert_eq!(hit, LevelHit { level: 0, in_active_level: false });
}

// =============================================================
// identify_rooms
// =============================================================

#[test]
fn identify_rooms_matches_polygon_and_level() {
    let job = sample_job();
    assert_eq!(identify_rooms(&job, 0, pt(100.0, 100.0)), vec![0]);
    assert_eq!(identify_rooms(&job, 0, pt(500.0, 300.0)), vec![1]);
    assert_eq!(identify_rooms(&job, 1, pt(100.0, 100.0)), vec![2]);
}

#[test]
fn identify_rooms_empty_outside() {
    let job = sample_job();
    assert!(identify_rooms(&job, 0, pt(10.0, 10.0)).is_empty());
    assert!(identify_rooms(&job, 1, pt(500.0, 300.0)).is_empty());
}

// =============================================================
// select_photo
// =============================================================

#[test]
fn select_photo_within_box_tolerance() {
    let job = sample_job();
    let p = select_photo(&job, 0, pt(205.0, 195.0), 10.0).unwrap();
    assert_eq!(p.id, job.photos[0].id);
}

#[test]
fn select_photo_skips_deleted() {
    let job = sample_job();
    // Only the deleted photo at (210, 210) is within tolerance.
    assert!(select_photo(&job, 0, pt(215.0, 215.0), 7.0).is_none());
}

#[test]
fn select_photo_respects_level() {
    let job = sample_job();
    assert!(select_photo(&job, 1, pt(200.0, 200.0), 10.0).is_none());
    assert!(select_photo(&job, 1, pt(100.0, 100.0), 10.0).is_some());
}

#[test]
fn select_photo_is_per_axis() {
    let job = sample_job();
    // 9 units off on each axis: about 12.7 away, still a hit.
    assert!(select_photo(&job, 0, pt(609.0, 291.0), 10.0).is_some());
}

// =============================================================
// nearest_photo + hysteresis
// =============================================================

#[test]
fn nearest_photo_picks_closest_live_photo() {
    let job = sample_job();
    let n = nearest_photo(&job, 0, pt(590.0, 310.0)).unwrap();
    assert_eq!(n.photo.id, job.photos[1].id);
    assert!((n.distance - 200.0_f64.sqrt()).abs() < 1e-9);
}

#[test]
fn nearest_photo_ignores_deleted_even_when_closer() {
    let job = sample_job();
    let n = nearest_photo(&job, 0, pt(211.0, 211.0)).unwrap();
    assert_eq!(n.photo.id, job.photos[0].id);
}

#[test]
fn nearest_photo_none_on_empty_level() {
    let mut job = sample_job();
    job.photos.retain(|p| !p.is_on_level(1));
    assert!(nearest_photo(&job, 1, pt(0.0, 0.0)).is_none());
}

#[test]
fn hysteresis_switches_when_nothing_active() {
    let job = sample_job();
    let n = NearestPhoto { photo: &job.photos[1], distance: 500.0 };
    assert!(should_switch(None, &n, 70.0));
}

#[test]
fn hysteresis_switches_to_close_candidate_regardless_of_previous_distance() {
    // Active photo A is 80 away, candidate B is 40 away.
    let job = sample_job();
    let a = job.photos[0].id;
    let b = NearestPhoto { photo: &job.photos[1], distance: 40.0 };
    assert!(should_switch(Some(a), &b, 70.0));
}

#[test]
fn hysteresis_keeps_active_when_candidate_is_far() {
    let job = sample_job();
    let a = job.photos[0].id;
    let b = NearestPhoto { photo: &job.photos[1], distance: 75.0 };
    assert!(!should_switch(Some(a), &b, 70.0));
}

#[test]
fn hysteresis_never_switches_to_same_photo() {
    let job = sample_job();
    let a = NearestPhoto { photo: &job.photos[0], distance: 1.0 };
    assert!(!should_switch(Some(job.photos[0].id), &a, 70.0));
}

// =============================================================
// sweeps
// =============================================================

fn ids(sweeps: &[&Sweep]) -> Vec<String> {
    sweeps.iter().map(|s| s.id.clone()).collect()
}

#[test]
fn sweeps_inside_room_outline() {
    let tour = sample_tour();
    let room = rect_ring(-6.0, -4.0, 0.0, 0.0);
    let found = sweeps_inside(&tour.sweeps, 0, Some(&room), &[]);
    assert_eq!(ids(&found), vec!["s0"]);
}

#[test]
fn sweeps_inside_filters_floor() {
    let tour = sample_tour();
    let room = rect_ring(-10.0, -10.0, 10.0, 10.0);
    assert_eq!(ids(&sweeps_inside(&tour.sweeps, 1, Some(&room), &[])), vec!["s2"]);
}

#[test]
fn sweeps_inside_level_outline_is_inverted() {
    let tour = sample_tour();
    let level = rect_ring(-9.0, -7.0, 9.0, 7.0);
    assert!(sweeps_inside(&tour.sweeps, 0, None, &level).is_empty());

    let small = rect_ring(-6.0, -4.0, 0.0, 0.0);
    assert_eq!(ids(&sweeps_inside(&tour.sweeps, 0, None, &small)), vec!["s1"]);
}

#[test]
fn sweeps_inside_empty_level_outline_accepts_all_positioned() {
    let tour = sample_tour();
    assert_eq!(ids(&sweeps_inside(&tour.sweeps, 0, None, &[])), vec!["s0", "s1"]);
}

#[test]
fn nearest_sweep_without_cutoff() {
    let tour = sample_tour();
    let all: Vec<&Sweep> = tour.sweeps.iter().collect();
    assert_eq!(nearest_sweep(&all, pt(4.0, 2.0), None).map(|s| s.id.as_str()), Some("s1"));
}

#[test]
fn nearest_sweep_honours_cutoff() {
    let tour = sample_tour();
    let all: Vec<&Sweep> = tour.sweeps.iter().filter(|s| s.floor_sequence == 0).collect();
    assert!(nearest_sweep(&all, pt(4.0, 2.0), Some(1.0)).is_none());
    assert_eq!(nearest_sweep(&all, pt(4.0, 2.0), Some(2.0)).map(|s| s.id.as_str()), Some("s1"));
}

#[test]
fn nearest_sweep_empty_candidates() {
    assert!(nearest_sweep(&[], pt(0.0, 0.0), None).is_none());
}
