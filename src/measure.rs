//! Distance measurements drawn on top of a level.
//!
//! Endpoints are absolute HPL pixels (the active level's HPL plus its
//! top-left corner), so a measurement stays put when the active level
//! changes. At most one measurement is being edited at a time.

#[cfg(test)]
#[path = "measure_test.rs"]
mod measure_test;

use serde::{Deserialize, Serialize};

use crate::consts::SCALE_EPSILON;
use crate::geometry::Point;
use crate::model::LevelIndex;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub level: LevelIndex,
    pub start: Point,
    pub end: Point,
    pub in_progress: bool,
}

impl Measurement {
    #[must_use]
    pub fn new(level: LevelIndex, at: Point) -> Self {
        Self { level, start: at, end: at, in_progress: true }
    }

    /// Length in HPL pixels.
    #[must_use]
    pub fn hpl_length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Length in world units, or `None` for a degenerate world scale.
    #[must_use]
    pub fn value(&self, world_scale: f64) -> Option<f64> {
        if !world_scale.is_finite() || world_scale.abs() < SCALE_EPSILON {
            return None;
        }
        Some(self.hpl_length() / world_scale)
    }

    /// The value as drawn next to the line.
    #[must_use]
    pub fn label(&self, world_scale: f64) -> Option<String> {
        self.value(world_scale).map(|v| format!("{v:.2}"))
    }

    #[must_use]
    pub fn midpoint(&self) -> Point {
        Point::new((self.start.x + self.end.x) * 0.5, (self.start.y + self.end.y) * 0.5)
    }
}

/// All measurements taken since measure mode was last switched on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Measurements {
    items: Vec<Measurement>,
    current: Option<usize>,
}

impl Measurements {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new measurement at `at`, finishing any current one first.
    pub fn begin(&mut self, level: LevelIndex, at: Point) {
        self.finish();
        self.items.push(Measurement::new(level, at));
        self.current = Some(self.items.len() - 1);
    }

    /// Move the current measurement's end point. Returns whether one was updated.
    pub fn update(&mut self, at: Point) -> bool {
        match self.current_mut() {
            Some(m) => {
                m.end = at;
                true
            }
            None => false,
        }
    }

    /// Stop editing the current measurement and keep it.
    pub fn finish(&mut self) -> Option<&Measurement> {
        let index = self.current.take()?;
        let m = self.items.get_mut(index)?;
        m.in_progress = false;
        Some(m)
    }

    /// Drop the current measurement.
    pub fn cancel(&mut self) {
        if let Some(index) = self.current.take() {
            if index < self.items.len() {
                self.items.remove(index);
            }
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.current = None;
    }

    #[must_use]
    pub fn current(&self) -> Option<&Measurement> {
        self.current.and_then(|i| self.items.get(i))
    }

    fn current_mut(&mut self) -> Option<&mut Measurement> {
        self.current.and_then(|i| self.items.get_mut(i))
    }

    pub fn on_level(&self, level: LevelIndex) -> impl Iterator<Item = &Measurement> {
        self.items.iter().filter(move |m| m.level == level)
    }

    #[must_use]
    pub fn all(&self) -> &[Measurement] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
