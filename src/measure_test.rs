#![allow(clippy::float_cmp)]

use super::*;
use crate::fixtures::pt;

// =============================================================
// Measurement
// =============================================================

#[test]
fn new_measurement_is_a_point() {
    let m = Measurement::new(1, pt(10.0, 20.0));
    assert_eq!(m.start, m.end);
    assert!(m.in_progress);
    assert_eq!(m.hpl_length(), 0.0);
}

#[test]
fn value_divides_by_world_scale() {
    let mut m = Measurement::new(0, pt(0.0, 0.0));
    m.end = pt(30.0, 40.0);
    assert_eq!(m.value(1.25), Some(40.0));
}

#[test]
fn label_has_two_decimals() {
    let mut m = Measurement::new(0, pt(0.0, 0.0));
    m.end = pt(10.0, 0.0);
    assert_eq!(m.label(3.0).as_deref(), Some("3.33"));
    assert_eq!(m.label(1.0).as_deref(), Some("10.00"));
}

#[test]
fn degenerate_scale_has_no_value() {
    let mut m = Measurement::new(0, pt(0.0, 0.0));
    m.end = pt(10.0, 0.0);
    assert_eq!(m.value(0.0), None);
    assert_eq!(m.value(f64::NAN), None);
    assert_eq!(m.label(0.0), None);
}

#[test]
fn midpoint_between_ends() {
    let mut m = Measurement::new(0, pt(0.0, 10.0));
    m.end = pt(20.0, 30.0);
    assert_eq!(m.midpoint(), pt(10.0, 20.0));
}

// =============================================================
// Measurements
// =============================================================

#[test]
fn begin_update_finish() {
    let mut all = Measurements::new();
    all.begin(0, pt(1.0, 1.0));
    assert!(all.update(pt(5.0, 4.0)));
    let done = all.finish().cloned();
    assert_eq!(done.map(|m| (m.end, m.in_progress)), Some((pt(5.0, 4.0), false)));
    assert!(all.current().is_none());
    assert_eq!(all.len(), 1);
}

#[test]
fn update_without_current_is_ignored() {
    let mut all = Measurements::new();
    assert!(!all.update(pt(1.0, 1.0)));
    all.begin(0, pt(0.0, 0.0));
    all.finish();
    assert!(!all.update(pt(9.0, 9.0)));
    assert_eq!(all.all()[0].end, pt(0.0, 0.0));
}

#[test]
fn only_one_current_at_a_time() {
    let mut all = Measurements::new();
    all.begin(0, pt(0.0, 0.0));
    all.begin(0, pt(5.0, 5.0));
    assert_eq!(all.len(), 2);
    assert!(!all.all()[0].in_progress);
    assert!(all.all()[1].in_progress);
    assert_eq!(all.all().iter().filter(|m| m.in_progress).count(), 1);
}

#[test]
fn cancel_discards_current_only() {
    let mut all = Measurements::new();
    all.begin(0, pt(0.0, 0.0));
    all.finish();
    all.begin(0, pt(5.0, 5.0));
    all.cancel();
    assert_eq!(all.len(), 1);
    assert!(all.current().is_none());
}

#[test]
fn finish_without_current_is_none() {
    let mut all = Measurements::new();
    assert!(all.finish().is_none());
}

#[test]
fn clear_drops_everything() {
    let mut all = Measurements::new();
    all.begin(0, pt(0.0, 0.0));
    all.clear();
    assert!(all.is_empty());
    assert!(all.current().is_none());
}

#[test]
fn on_level_filters() {
    let mut all = Measurements::new();
    all.begin(0, pt(0.0, 0.0));
    all.begin(1, pt(0.0, 0.0));
    all.begin(0, pt(1.0, 1.0));
    all.finish();
    assert_eq!(all.on_level(0).count(), 2);
    assert_eq!(all.on_level(1).count(), 1);
    assert_eq!(all.on_level(2).count(), 0);
}
