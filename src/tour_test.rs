#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn sweep_map_point_uses_x_and_z() {
    let s = Sweep { id: "a".into(), position: Some(TourVector { x: 1.0, y: 9.0, z: -2.0 }), floor_sequence: 0 };
    assert_eq!(s.map_point(), Some(Point::new(1.0, -2.0)));
}

#[test]
fn sweep_without_position_has_no_map_point() {
    let s = Sweep { id: "a".into(), position: None, floor_sequence: 0 };
    assert_eq!(s.map_point(), None);
}

#[test]
fn floor_extent_dimensions() {
    let e = FloorExtent { min_x: -2.0, min_y: 1.0, max_x: 8.0, max_y: 4.0 };
    assert_eq!(e.width(), 10.0);
    assert_eq!(e.height(), 3.0);
}

#[test]
fn snapshot_queues_and_drains_commands() {
    let mut tour = TourSnapshot::new();
    tour.move_to_floor(2);
    tour.move_to_sweep("s1");
    assert_eq!(tour.commands().len(), 2);
    let drained = tour.drain_commands();
    assert_eq!(drained, vec![TourCommand::MoveToFloor(2), TourCommand::MoveToSweep("s1".into())]);
    assert!(tour.commands().is_empty());
}

#[test]
fn snapshot_reports_extents_by_floor() {
    let mut tour = TourSnapshot::new();
    tour.extents.insert(1, FloorExtent { min_x: 0.0, min_y: 0.0, max_x: 5.0, max_y: 5.0 });
    assert!(tour.floor_extent(1).is_some());
    assert!(tour.floor_extent(0).is_none());
}
