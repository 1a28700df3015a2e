//! Coordinate transforms between the viewer's four spaces.
//!
//! | Space | Unit | Origin |
//! |-------|------|--------|
//! | World | building units, y up | building survey origin |
//! | HPL | level pixels, y down | a level's top-left corner |
//! | Map | tour units | tour floor origin, rotated in 90° steps |
//! | Tour-local | tour units, unrotated | used only for drawing sweeps |
//!
//! World <-> HPL scales by the level's world scale and shifts by the level's
//! offset. The shift is taken relative to the level itself
//! ([`Reference::Own`]) or to the active level ([`Reference::Active`]) so that
//! several levels can share one canvas origin.
//!
//! HPL <-> Map depends on the tour rotation. Each rotation picks which HPL
//! axis feeds each map axis, a sign, and an offset built from the level's
//! [`Alignment`] terms. All four rotations share one formula driven by
//! [`RotationRule`], so the forward and inverse paths cannot drift apart.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use serde::{Deserialize, Serialize};

use crate::cache::ScaleTable;
use crate::consts::FOOT_K_FACTOR;
use crate::error::ViewerError;
use crate::geometry::{Affine, Point};
use crate::model::{Job, LevelIndex};
use crate::tour::TourSdk;

/// Tour rotation relative to the building. There is no continuous rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Normalize `degrees` into one of the four supported rotations.
    #[must_use]
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(Self::Deg0),
            90 => Some(Self::Deg90),
            180 => Some(Self::Deg180),
            270 => Some(Self::Deg270),
            _ => None,
        }
    }

    #[must_use]
    pub fn degrees(self) -> i32 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    #[must_use]
    pub fn radians(self) -> f64 {
        f64::from(self.degrees()).to_radians()
    }

    /// Whether the tour's x axis runs along the building's y axis.
    #[must_use]
    pub fn swaps_axes(self) -> bool {
        self.rule().swap_well
    }

    fn rule(self) -> &'static RotationRule {
        match self {
            Self::Deg0 => &RULES[0],
            Self::Deg90 => &RULES[1],
            Self::Deg180 => &RULES[2],
            Self::Deg270 => &RULES[3],
        }
    }
}

/// Which level the HPL origin is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    /// The active level: points share the canvas origin used for rendering.
    Active,
    /// The level itself: points are relative to the level's own box.
    Own,
}

/// Per-level quantities that place the tour floor inside the building, all in
/// HPL pixels except `foot_k`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alignment {
    /// HPL pixels per tour unit.
    pub foot_k: f64,
    pub level_width: f64,
    pub level_height: f64,
    pub tour_width: f64,
    pub tour_height: f64,
    /// Shift that centres the tour extent in the well, x axis.
    pub well_x: f64,
    /// Shift that centres the tour extent in the well, y axis.
    pub well_y: f64,
    /// Tour floor minimum x plus the mapping's offset, scaled by `foot_k`.
    pub min_x: f64,
    /// Tour floor minimum y plus the mapping's offset, scaled by `foot_k`.
    pub min_y: f64,
}

/// Coefficients of a linear combination of [`Alignment`] terms.
#[derive(Debug, Clone, Copy)]
struct OffsetTerms {
    level_width: f64,
    level_height: f64,
    tour_width: f64,
    tour_height: f64,
    well_x: f64,
    well_y: f64,
    min_x: f64,
    min_y: f64,
}

impl OffsetTerms {
    const ZERO: OffsetTerms = OffsetTerms {
        level_width: 0.0,
        level_height: 0.0,
        tour_width: 0.0,
        tour_height: 0.0,
        well_x: 0.0,
        well_y: 0.0,
        min_x: 0.0,
        min_y: 0.0,
    };

    fn eval(&self, a: &Alignment) -> f64 {
        self.level_width * a.level_width
            + self.level_height * a.level_height
            + self.tour_width * a.tour_width
            + self.tour_height * a.tour_height
            + self.well_x * a.well_x
            + self.well_y * a.well_y
            + self.min_x * a.min_x
            + self.min_y * a.min_y
    }
}

/// One map axis: `map = (sign * hpl[source] + offset) / foot_k`.
#[derive(Debug, Clone, Copy)]
struct AxisRule {
    /// Read the HPL y coordinate instead of x.
    from_hpl_y: bool,
    sign: f64,
    offset: OffsetTerms,
}

#[derive(Debug, Clone, Copy)]
struct RotationRule {
    map_x: AxisRule,
    map_y: AxisRule,
    /// Well centring uses the building's height for the tour's width.
    swap_well: bool,
    /// Translation of the sweep overlay after rotating and scaling by `foot_k`.
    overlay_e: OffsetTerms,
    overlay_f: OffsetTerms,
}

static RULES: [RotationRule; 4] = [
    // 0°
    RotationRule {
        map_x: AxisRule { from_hpl_y: false, sign: 1.0, offset: OffsetTerms { well_x: -1.0, min_x: 1.0, ..OffsetTerms::ZERO } },
        map_y: AxisRule { from_hpl_y: true, sign: 1.0, offset: OffsetTerms { well_y: -1.0, min_y: 1.0, ..OffsetTerms::ZERO } },
        swap_well: false,
        overlay_e: OffsetTerms { well_x: 1.0, min_x: -1.0, ..OffsetTerms::ZERO },
        overlay_f: OffsetTerms { min_y: 1.0, well_y: -1.0, level_height: 1.0, ..OffsetTerms::ZERO },
    },
    // 90°
    RotationRule {
        map_x: AxisRule { from_hpl_y: true, sign: -1.0, offset: OffsetTerms { well_x: -1.0, min_y: -1.0, ..OffsetTerms::ZERO } },
        map_y: AxisRule { from_hpl_y: false, sign: 1.0, offset: OffsetTerms { well_y: -1.0, min_y: 1.0, ..OffsetTerms::ZERO } },
        swap_well: true,
        overlay_e: OffsetTerms { min_x: -1.0, well_y: 1.0, ..OffsetTerms::ZERO },
        overlay_f: OffsetTerms { min_y: 1.0, well_x: -1.0, ..OffsetTerms::ZERO },
    },
    // 180°
    RotationRule {
        map_x: AxisRule {
            from_hpl_y: false,
            sign: -1.0,
            offset: OffsetTerms { level_width: 1.0, well_x: -1.0, min_x: 1.0, ..OffsetTerms::ZERO },
        },
        map_y: AxisRule {
            from_hpl_y: true,
            sign: -1.0,
            offset: OffsetTerms { tour_height: 1.0, well_y: 1.0, min_y: 1.0, ..OffsetTerms::ZERO },
        },
        swap_well: false,
        overlay_e: OffsetTerms { tour_width: -1.0, well_x: -1.0, min_x: -1.0, ..OffsetTerms::ZERO },
        overlay_f: OffsetTerms { min_y: 1.0, well_y: 1.0, level_height: -1.0, tour_height: 1.0, ..OffsetTerms::ZERO },
    },
    // 270°
    RotationRule {
        map_x: AxisRule {
            from_hpl_y: true,
            sign: -1.0,
            offset: OffsetTerms { level_width: 1.0, well_x: -1.0, min_x: 1.0, ..OffsetTerms::ZERO },
        },
        map_y: AxisRule {
            from_hpl_y: false,
            sign: -1.0,
            offset: OffsetTerms { tour_height: 1.0, well_y: 1.0, min_y: 1.0, ..OffsetTerms::ZERO },
        },
        swap_well: true,
        overlay_e: OffsetTerms { min_x: -1.0, well_y: 1.0, level_height: -1.0, ..OffsetTerms::ZERO },
        overlay_f: OffsetTerms { min_y: 1.0, well_x: 1.0, level_width: 1.0, ..OffsetTerms::ZERO },
    },
];

/// World scale of `level`: HPL width over world width.
///
/// # Errors
///
/// [`ViewerError::UnknownLevel`] for a missing level and
/// [`ViewerError::DegenerateScale`] when the ratio is zero or not finite.
pub fn try_world_scale(job: &Job, level: LevelIndex) -> Result<f64, ViewerError> {
    let l = job.level(level).ok_or(ViewerError::UnknownLevel(level))?;
    let degenerate = ViewerError::DegenerateScale { level, width: l.bounds.width(), world_width: l.world.width };
    if l.world.width.abs() < crate::consts::SCALE_EPSILON {
        return Err(degenerate);
    }
    let scale = l.bounds.width() / l.world.width;
    if !scale.is_finite() || scale.abs() < crate::consts::SCALE_EPSILON {
        return Err(degenerate);
    }
    Ok(scale)
}

/// [`try_world_scale`] for callers that skip degenerate levels.
#[must_use]
pub fn compute_world_scale(job: &Job, level: LevelIndex) -> Option<f64> {
    match try_world_scale(job, level) {
        Ok(scale) => Some(scale),
        Err(_) => None,
    }
}

/// Read-only view over the job, the tour, and the cached scale table that
/// performs every coordinate conversion.
pub struct Transformer<'a> {
    job: &'a Job,
    tour: &'a dyn TourSdk,
    scales: &'a ScaleTable,
    rotation: Rotation,
    active_level: LevelIndex,
}

impl<'a> Transformer<'a> {
    #[must_use]
    pub fn new(
        job: &'a Job,
        tour: &'a dyn TourSdk,
        scales: &'a ScaleTable,
        rotation: Rotation,
        active_level: LevelIndex,
    ) -> Self {
        Self { job, tour, scales, rotation, active_level }
    }

    #[must_use]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    #[must_use]
    pub fn active_level(&self) -> LevelIndex {
        self.active_level
    }

    // --- World <-> HPL ---

    /// Cached world scale, computed on the fly for levels the table has not seen.
    #[must_use]
    pub fn world_scale(&self, level: LevelIndex) -> Option<f64> {
        self.scales
            .get(level)
            .unwrap_or_else(|| compute_world_scale(self.job, level))
    }

    /// HPL pixels per tour unit.
    #[must_use]
    pub fn foot_k(&self, level: LevelIndex) -> Option<f64> {
        self.world_scale(level).map(|s| FOOT_K_FACTOR * s)
    }

    fn reference_level(&self, level: LevelIndex, reference: Reference) -> LevelIndex {
        match reference {
            Reference::Active => self.active_level,
            Reference::Own => level,
        }
    }

    /// Horizontal distance from `level`'s box to the reference level's box.
    #[must_use]
    pub fn level_shift_left(&self, level: LevelIndex, reference: Reference) -> f64 {
        let reference = self.reference_level(level, reference);
        self.job.level_bounds(reference).left - self.job.level_bounds(level).left
    }

    /// Vertical distance from `level`'s bottom edge to the reference level's top.
    #[must_use]
    pub fn level_shift_top(&self, level: LevelIndex, reference: Reference) -> f64 {
        let reference = self.reference_level(level, reference);
        let own = self.job.level_bounds(level);
        self.job.level_bounds(reference).top - own.top - own.height()
    }

    /// World extent origin in HPL pixels: `(world.left * s, world.bottom * s)`.
    #[must_use]
    pub fn world_origin_shift(&self, level: LevelIndex) -> Option<(f64, f64)> {
        let s = self.world_scale(level)?;
        let world = self.job.level(level)?.world;
        Some((world.left * s, world.bottom * s))
    }

    #[must_use]
    pub fn world_to_hpl(&self, p: Point, level: LevelIndex, reference: Reference) -> Option<Point> {
        let s = self.world_scale(level)?;
        let (shift_left, shift_bottom) = self.world_origin_shift(level)?;
        Some(Point::new(
            p.x * s - self.level_shift_left(level, reference) - shift_left,
            -p.y * s - self.level_shift_top(level, reference) + shift_bottom,
        ))
    }

    #[must_use]
    pub fn hpl_to_world(&self, p: Point, level: LevelIndex, reference: Reference) -> Option<Point> {
        let s = self.world_scale(level)?;
        let (shift_left, shift_bottom) = self.world_origin_shift(level)?;
        Some(Point::new(
            (p.x + shift_left + self.level_shift_left(level, reference)) / s,
            -(p.y - shift_bottom + self.level_shift_top(level, reference)) / s,
        ))
    }

    /// Convert a point in the active level's HPL frame into `level`'s own frame.
    #[must_use]
    pub fn active_to_own_hpl(&self, p: Point, level: LevelIndex) -> Point {
        let active = self.job.level_bounds(self.active_level);
        let own = self.job.level_bounds(level);
        Point::new(p.x + active.left - own.left, p.y + active.top - own.top)
    }

    /// Canvas transform from world units into `level`'s flipped drawing frame.
    #[must_use]
    pub fn world_transform(&self, level: LevelIndex) -> Option<Affine> {
        let s = self.world_scale(level)?;
        let (shift_left, shift_bottom) = self.world_origin_shift(level)?;
        Some(Affine::new(s, 0.0, 0.0, s, -shift_left, -shift_bottom))
    }

    // --- HPL <-> Map ---

    /// Alignment terms for `level`, or `None` until the tour reports the
    /// level's floor extent.
    #[must_use]
    pub fn alignment(&self, level: LevelIndex) -> Option<Alignment> {
        let s = self.world_scale(level)?;
        let foot_k = FOOT_K_FACTOR * s;
        let l = self.job.level(level)?;
        let floor = self.job.tour_floor_for_level(level);
        let extent = self.tour.floor_extent(floor)?;
        let (offset_x, offset_y) = self.job.tour_offset(floor);

        let tour_width = extent.width() * foot_k;
        let tour_height = extent.height() * foot_k;
        let well_width = (l.walls.max_x - l.walls.min_x) * s;
        let well_height = (l.walls.max_y - l.walls.min_y) * s;
        let top_gap = -(l.walls.max_y - (l.world.bottom + l.world.height)) * s;

        let (well_x, well_y) = if self.rotation.rule().swap_well {
            let shifted = top_gap + (well_height - tour_width) * 0.5;
            (shifted, shifted)
        } else {
            (
                (l.walls.min_x - l.world.left) * s + (well_width - tour_width) * 0.5,
                top_gap + (well_height - tour_height) * 0.5,
            )
        };

        Some(Alignment {
            foot_k,
            level_width: l.bounds.width(),
            level_height: l.bounds.height(),
            tour_width,
            tour_height,
            well_x,
            well_y,
            min_x: (extent.min_x + offset_x) * foot_k,
            min_y: (extent.min_y + offset_y) * foot_k,
        })
    }

    /// Level-own HPL to map space.
    #[must_use]
    pub fn hpl_to_map(&self, p: Point, level: LevelIndex) -> Option<Point> {
        let a = self.alignment(level)?;
        let rule = self.rotation.rule();
        let forward = |axis: &AxisRule| {
            let source = if axis.from_hpl_y { p.y } else { p.x };
            (axis.sign * source + axis.offset.eval(&a)) / a.foot_k
        };
        Some(Point::new(forward(&rule.map_x), forward(&rule.map_y)))
    }

    /// Map space to level-own HPL.
    #[must_use]
    pub fn map_to_hpl(&self, p: Point, level: LevelIndex) -> Option<Point> {
        let a = self.alignment(level)?;
        let rule = self.rotation.rule();
        let mut out = Point::default();
        for (axis, m) in [(&rule.map_x, p.x), (&rule.map_y, p.y)] {
            let source = axis.sign * (m * a.foot_k - axis.offset.eval(&a));
            if axis.from_hpl_y {
                out.y = source;
            } else {
                out.x = source;
            }
        }
        Some(out)
    }

    #[must_use]
    pub fn world_to_map(&self, p: Point, level: LevelIndex) -> Option<Point> {
        let hpl = self.world_to_hpl(p, level, Reference::Own)?;
        self.hpl_to_map(hpl, level)
    }

    #[must_use]
    pub fn map_to_world(&self, p: Point, level: LevelIndex) -> Option<Point> {
        let hpl = self.map_to_hpl(p, level)?;
        self.hpl_to_world(hpl, level, Reference::Own)
    }

    // --- Tour-local ---

    /// Unrotated HPL placement of a tour point, as drawn before the overlay
    /// rotation is applied.
    #[must_use]
    pub fn tour_to_hpl(&self, p: Point, level: LevelIndex) -> Option<Point> {
        let a = self.alignment(level)?;
        Some(Point::new(a.well_x - a.min_x + p.x * a.foot_k, a.well_y - a.min_y + p.y * a.foot_k))
    }

    /// Transform applied inside a level's flipped drawing frame before
    /// drawing sweeps in tour units.
    #[must_use]
    pub fn tour_overlay_transform(&self, level: LevelIndex) -> Option<Affine> {
        let a = self.alignment(level)?;
        let rule = self.rotation.rule();
        let place = Affine::new(a.foot_k, 0.0, 0.0, -a.foot_k, rule.overlay_e.eval(&a), rule.overlay_f.eval(&a));
        Some(Affine::rotate(self.rotation.radians()).then_local(&place))
    }
}
