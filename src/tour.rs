//! Boundary to the third-party 3D tour.
//!
//! The tour reports its viewpoints (sweeps), the extent of each floor in its
//! own units, and the current camera pose, and it accepts navigation
//! commands. Sweep positions are map-space coordinates: `x` and `z` are the
//! floor-plan axes, `y` is height. Nothing here is comparable to world or HPL
//! values until it goes through [`crate::transform`].

#[cfg(test)]
#[path = "tour_test.rs"]
mod tour_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TourVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A captured viewpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sweep {
    pub id: String,
    pub position: Option<TourVector>,
    /// Tour floor this sweep belongs to.
    pub floor_sequence: usize,
}

impl Sweep {
    /// Floor-plan position in map space.
    #[must_use]
    pub fn map_point(&self) -> Option<Point> {
        self.position.map(|p| Point::new(p.x, p.z))
    }
}

/// Extent of one tour floor, in tour units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FloorExtent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl FloorExtent {
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Current tour camera.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    /// Sweep the camera is standing on, if any.
    pub sweep: Option<String>,
    pub position: TourVector,
    /// Euler rotation in degrees; `y` is the heading.
    pub rotation: TourVector,
}

/// Commands the viewer issues to the tour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TourCommand {
    MoveToFloor(usize),
    MoveToSweep(String),
}

/// Capability the viewer needs from the tour SDK.
pub trait TourSdk {
    fn sweeps(&self) -> &[Sweep];
    fn floor_extent(&self, floor: usize) -> Option<FloorExtent>;
    fn pose(&self) -> Option<&Pose>;
    fn move_to_floor(&mut self, floor: usize);
    fn move_to_sweep(&mut self, sweep_id: &str);
}

/// In-memory tour state fed by the host from SDK callbacks.
///
/// Commands are queued and drained by the host, which forwards them to the
/// real SDK.
#[derive(Debug, Clone, Default)]
pub struct TourSnapshot {
    pub sweeps: Vec<Sweep>,
    pub extents: HashMap<usize, FloorExtent>,
    pub pose: Option<Pose>,
    commands: Vec<TourCommand>,
}

impl TourSnapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all commands issued since the last drain.
    pub fn drain_commands(&mut self) -> Vec<TourCommand> {
        std::mem::take(&mut self.commands)
    }

    #[must_use]
    pub fn commands(&self) -> &[TourCommand] {
        &self.commands
    }
}

impl TourSdk for TourSnapshot {
    fn sweeps(&self) -> &[Sweep] {
        &self.sweeps
    }

    fn floor_extent(&self, floor: usize) -> Option<FloorExtent> {
        self.extents.get(&floor).copied()
    }

    fn pose(&self) -> Option<&Pose> {
        self.pose.as_ref()
    }

    fn move_to_floor(&mut self, floor: usize) {
        self.commands.push(TourCommand::MoveToFloor(floor));
    }

    fn move_to_sweep(&mut self, sweep_id: &str) {
        self.commands.push(TourCommand::MoveToSweep(sweep_id.to_owned()));
    }
}
