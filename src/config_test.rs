#![allow(clippy::float_cmp)]

use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_match_constants() {
    let c = ViewerConfig::default();
    assert_eq!(c.zoom_increment, 0.05);
    assert_eq!(c.drag_dead_zone_px, 4.0);
    assert_eq!(c.nearest_switch_distance, 70.0);
    assert_eq!(c.fit_k, 0.8);
    assert_eq!(c.direct_fit_ms, 1500.0);
    assert_eq!(c.two_hop_ms, 3000.0);
    assert_eq!(c.frame_interval_ms, 34.0);
    assert_eq!(c.fit_position, FitPosition::Center);
    assert_eq!(c.rotation_deg, None);
}

#[test]
fn empty_lookup_yields_defaults() {
    assert_eq!(ViewerConfig::from_lookup(|_| None), ViewerConfig::default());
}

#[test]
fn lookup_overrides_fields() {
    let c = ViewerConfig::from_lookup(lookup_from(&[
        ("FLOORPLAN_ZOOM_INCREMENT", "0.1"),
        ("FLOORPLAN_FIT_K", " 0.9 "),
        ("FLOORPLAN_FIT_POSITION", "top-right"),
        ("FLOORPLAN_TOUR_ROTATION", "270"),
        ("FLOORPLAN_TWO_HOP_MS", "2000"),
    ]));
    assert_eq!(c.zoom_increment, 0.1);
    assert_eq!(c.fit_k, 0.9);
    assert_eq!(c.fit_position, FitPosition::TopRight);
    assert_eq!(c.rotation_deg, Some(270));
    assert_eq!(c.two_hop_ms, 2000.0);
    assert_eq!(c.direct_fit_ms, 1500.0);
}

#[test]
fn invalid_values_fall_back_to_defaults() {
    let c = ViewerConfig::from_lookup(lookup_from(&[
        ("FLOORPLAN_CLICK_TOLERANCE", "wide"),
        ("FLOORPLAN_FIT_POSITION", "bottom-left"),
        ("FLOORPLAN_TOUR_ROTATION", "quarter"),
    ]));
    assert_eq!(c.click_tolerance, 10.0);
    assert_eq!(c.fit_position, FitPosition::Center);
    assert_eq!(c.rotation_deg, None);
}

#[test]
fn host_timer_periods_are_configurable() {
    let c = ViewerConfig::from_lookup(lookup_from(&[
        ("FLOORPLAN_ANIMATION_TICK_MS", "8"),
        ("FLOORPLAN_FRAME_INTERVAL_MS", "20"),
    ]));
    assert_eq!(c.animation_tick_ms, 8.0);
    assert_eq!(c.frame_interval_ms, 20.0);

    let d = ViewerConfig::default();
    assert_eq!(d.animation_tick_ms, DEFAULT_ANIMATION_TICK_MS);
}

#[test]
fn unprefixed_keys_are_ignored() {
    let c = ViewerConfig::from_lookup(lookup_from(&[("FIT_K", "0.5")]));
    assert_eq!(c.fit_k, 0.8);
}

#[test]
fn fit_position_parses_variants() {
    assert_eq!("Center".parse::<FitPosition>().unwrap(), FitPosition::Center);
    assert_eq!("top right".parse::<FitPosition>().unwrap(), FitPosition::TopRight);
    assert!("middle".parse::<FitPosition>().is_err());
}

#[test]
fn from_env_reads_prefixed_variables() {
    unsafe { std::env::set_var("FLOORPLAN_SWEEP_HOVER_DISTANCE", "2.5") };
    let c = ViewerConfig::from_env();
    unsafe { std::env::remove_var("FLOORPLAN_SWEEP_HOVER_DISTANCE") };
    assert_eq!(c.sweep_hover_distance, 2.5);
}
