//! Render orchestration: walks the levels of one viewport and issues draw
//! requests to a [`DrawSurface`].
//!
//! This module computes every transform itself and hands the surface
//! absolute affines; the surface never has to track a transform stack. Floor
//! geometry comes from an external [`FloorRenderer`]. Its failures are logged
//! per level and the pass moves on, so one broken level never blanks the
//! rest of the canvas.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::PI;

use tracing::{debug, error};

use crate::config::ViewerConfig;
use crate::consts::{
    LABEL_LINE_HEIGHT, LEVEL_TITLE_FONT_K, MARKER_SIZE_PX, PHOTO_DIR_OFFSET_RAD, PHOTO_DIR_STEP_RAD, PIN_SCALE,
};
use crate::error::RenderError;
use crate::geometry::{Affine, Point, Size, random_color};
use crate::measure::Measurements;
use crate::model::{Job, Label, Level, LevelIndex};
use crate::state::ViewerState;
use crate::tour::TourSdk;
use crate::transform::Transformer;
use crate::viewport::Viewport;

/// Floor opacity while measuring, so the measurement lines stand out.
const MEASURE_FLOOR_ALPHA: f64 = 0.35;

const MEASURE_COLOR: &str = "#ff0000";
const MEASURE_LINE_WIDTH: f64 = 0.5;
const MEASURE_END_RADIUS: f64 = 0.5;
const MEASURE_FONT: &str = "10px sans-serif";

const LABEL_COLOR: &str = "black";
const DEBUG_OUTLINE_WIDTH: f64 = 2.0;

/// Degrees to radians as used for the tour camera heading.
const TOUR_HEADING_RAD_PER_DEG: f64 = 0.01745;

/// Drawing primitives the viewer needs from a 2D canvas.
///
/// Every call draws under the transform most recently passed to
/// [`DrawSurface::set_transform`].
pub trait DrawSurface {
    /// Clear the whole surface, ignoring the current transform.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the underlying context rejects the call.
    fn clear(&mut self, size: Size) -> Result<(), RenderError>;

    /// # Errors
    ///
    /// Returns `Err` if the underlying context rejects the call.
    fn set_transform(&mut self, m: &Affine) -> Result<(), RenderError>;

    fn set_alpha(&mut self, alpha: f64);

    /// # Errors
    ///
    /// Returns `Err` if the underlying context rejects the call.
    fn fill_circle(&mut self, center: Point, radius: f64, color: &str) -> Result<(), RenderError>;

    /// # Errors
    ///
    /// Returns `Err` if the underlying context rejects the call.
    fn stroke_path(&mut self, points: &[Point], closed: bool, width: f64, color: &str) -> Result<(), RenderError>;

    /// Fill `text` anchored at `at`, horizontally centred, top baseline.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the underlying context rejects the call.
    fn fill_text(&mut self, text: &str, at: Point, font: &str, color: &str) -> Result<(), RenderError>;

    /// Draw the direction pin image centred on the origin, `size` wide and high.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the underlying context rejects the call.
    fn draw_pin(&mut self, size: f64) -> Result<(), RenderError>;
}

/// Per-level floor drawing supplied by the host (walls, fixtures, dimensions).
pub trait FloorRenderer {
    /// Draw `level`'s floor in world units. `scale` is the viewport scale.
    ///
    /// # Errors
    ///
    /// Any error is logged by the caller and the pass continues.
    fn draw_floor(&mut self, level: LevelIndex, surface: &mut dyn DrawSurface, scale: f64) -> Result<(), RenderError>;

    /// Draw adornments in world units with y pointing down.
    ///
    /// # Errors
    ///
    /// Any error is logged by the caller and the pass continues.
    fn draw_adornments(
        &mut self,
        _level: LevelIndex,
        _surface: &mut dyn DrawSurface,
        _scale: f64,
    ) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Read-only inputs of one render pass.
pub struct Scene<'a> {
    pub job: &'a Job,
    pub tour: &'a dyn TourSdk,
    pub transformer: &'a Transformer<'a>,
    pub state: &'a ViewerState,
    pub measurements: &'a Measurements,
    pub config: &'a ViewerConfig,
    /// Host clock, used for the marker pulse.
    pub now_ms: f64,
}

/// Outcome of drawing one viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub levels_drawn: usize,
    pub failures: usize,
}

/// Draw every visible level of `viewport` onto `surface`.
pub fn draw_viewport(
    scene: &Scene<'_>,
    viewport: &Viewport,
    surface: &mut dyn DrawSurface,
    floors: &mut dyn FloorRenderer,
) -> RenderStats {
    let mut stats = RenderStats::default();
    if let Err(e) = surface.clear(viewport.size) {
        error!(viewport = viewport.id().0, error = %e, "clear failed");
        stats.failures += 1;
        return stats;
    }

    let active = scene.state.active_level;
    for level in &scene.job.levels {
        if !(scene.state.show_all_levels || level.index == active) {
            continue;
        }
        if let Err(e) = floor_pass(scene, viewport, level, surface, floors) {
            error!(level = level.index, error = %e, "floor routine failed");
            stats.failures += 1;
        }
        match overlay_pass(scene, viewport, level, surface) {
            Ok(()) => stats.levels_drawn += 1,
            Err(e) => {
                error!(level = level.index, error = %e, "level overlay failed");
                stats.failures += 1;
            }
        }
    }
    stats
}

/// Transform from `level`'s world units to canvas pixels.
fn world_frame(scene: &Scene<'_>, viewport: &Viewport, level: &Level) -> Option<Affine> {
    let active = scene.job.level_bounds(scene.state.active_level);
    let world = scene.transformer.world_transform(level.index)?;
    Some(viewport.level_transform(&active, &level.bounds).then_local(&world))
}

fn floor_pass(
    scene: &Scene<'_>,
    viewport: &Viewport,
    level: &Level,
    surface: &mut dyn DrawSurface,
    floors: &mut dyn FloorRenderer,
) -> Result<(), RenderError> {
    let Some(world) = world_frame(scene, viewport, level) else {
        debug!(level = level.index, "no world scale, skipping floor");
        return Ok(());
    };
    surface.set_transform(&world)?;
    if scene.state.measure_mode {
        surface.set_alpha(MEASURE_FLOOR_ALPHA);
    }
    let result = floors.draw_floor(level.index, surface, viewport.scale).and_then(|()| {
        surface.set_transform(&world.then_local(&Affine::scale(1.0, -1.0)))?;
        floors.draw_adornments(level.index, surface, viewport.scale)
    });
    surface.set_alpha(1.0);
    result
}

fn overlay_pass(
    scene: &Scene<'_>,
    viewport: &Viewport,
    level: &Level,
    surface: &mut dyn DrawSurface,
) -> Result<(), RenderError> {
    let state = scene.state;
    if let (Some(world), Some(ws)) = (world_frame(scene, viewport, level), scene.transformer.world_scale(level.index)) {
        if state.show_level_titles {
            draw_level_title(scene, viewport, level, &world, ws, surface)?;
        }
        draw_labels(scene, viewport, level, &world, ws, surface)?;
        if !state.tour_mode && !state.measure_mode {
            draw_hotspots(scene, viewport, level.index, &world, ws, surface)?;
        }
        if state.debug_outlines {
            draw_room_outlines(scene, level.index, &world, surface)?;
        }
    }
    if state.tour_mode {
        draw_sweeps(scene, viewport, level, surface)?;
    }
    if state.measure_mode {
        draw_measurements(scene, viewport, level.index, surface)?;
    }
    Ok(())
}

// =============================================================
// Labels
// =============================================================

/// Font size of labels in world units before any title multiplier.
fn label_size(scene: &Scene<'_>, viewport: &Viewport, world_scale: f64) -> f64 {
    scene.job.min_point_size() / viewport.scale / world_scale
}

fn font(weight: f64, size: f64, family: &str) -> String {
    format!("{weight} {size}pt {family}")
}

/// Whether `label` is visible at viewport scale `scale`.
#[must_use]
pub fn label_visible(label: &Label, scale: f64, text_label_scale: f64) -> bool {
    if label.text.is_empty() {
        return false;
    }
    let own = label.scale.filter(|s| *s != 0.0);
    own.is_some_and(|s| s < scale) || scale >= text_label_scale
}

/// Split label text on `<BR>`, `<br>` and a literal `\n`.
#[must_use]
pub fn label_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    while let Some((at, len)) = ["<BR>", "<br>", "\\n"]
        .iter()
        .filter_map(|sep| rest.find(sep).map(|i| (i, sep.len())))
        .min_by_key(|(i, _)| *i)
    {
        lines.push(&rest[..at]);
        rest = &rest[at + len..];
    }
    lines.push(rest);
    lines
}

fn draw_labels(
    scene: &Scene<'_>,
    viewport: &Viewport,
    level: &Level,
    world: &Affine,
    world_scale: f64,
    surface: &mut dyn DrawSurface,
) -> Result<(), RenderError> {
    let size = label_size(scene, viewport, world_scale);
    let line_height = scene.job.min_point_size() / viewport.scale * LABEL_LINE_HEIGHT / world_scale;

    for label in scene.job.labels_on_level(level.index) {
        if !label_visible(label, viewport.scale, scene.config.text_label_scale) {
            continue;
        }
        let weight = if label.weight > 0.0 { label.weight } else { level.weight };
        let family = if label.family.is_empty() { &level.family } else { &label.family };
        let font = font(weight, size, family);

        let lines = label_lines(&label.text);
        #[allow(clippy::cast_precision_loss)]
        let mut y = if lines.len() > 1 { label.wy + line_height * lines.len() as f64 * 0.5 } else { label.wy };
        for line in lines {
            let at = world
                .then_local(&Affine::translate(label.wx, y))
                .then_local(&Affine::scale(1.0, -1.0));
            surface.set_transform(&at)?;
            surface.fill_text(line, Point::default(), &font, LABEL_COLOR)?;
            y -= line_height;
        }
    }
    Ok(())
}

fn draw_level_title(
    scene: &Scene<'_>,
    viewport: &Viewport,
    level: &Level,
    world: &Affine,
    world_scale: f64,
    surface: &mut dyn DrawSurface,
) -> Result<(), RenderError> {
    let Some((shift_left, shift_bottom)) = scene.transformer.world_origin_shift(level.index) else {
        return Ok(());
    };
    let at = world.then_local(&Affine::new(
        1.0,
        0.0,
        0.0,
        -1.0,
        shift_left / world_scale,
        (level.bounds.height() + shift_bottom) / world_scale,
    ));
    let size = LEVEL_TITLE_FONT_K * label_size(scene, viewport, world_scale);
    surface.set_transform(&at)?;
    surface.fill_text(&level.title, Point::default(), &font(level.weight, size, &level.family), LABEL_COLOR)
}

// =============================================================
// Markers
// =============================================================

/// Pulse phase in `[0, 1)` from the host clock.
fn pulse(now_ms: f64) -> f64 {
    now_ms.rem_euclid(1000.0) / 1000.0
}

/// Pin rotation for a photo facing `dir` sixteenths of a turn.
#[must_use]
pub fn photo_heading(dir: f64) -> f64 {
    let heading = dir * PHOTO_DIR_STEP_RAD + PHOTO_DIR_OFFSET_RAD;
    if heading < 0.0 { heading + 2.0 * PI } else { heading }
}

fn dot_color(green: bool, alpha: f64) -> String {
    if green {
        format!("rgba(0, 255, 0, {alpha})")
    } else {
        format!("rgba(255, 0, 0, {alpha})")
    }
}

fn draw_pin_at(
    frame: &Affine,
    at: Point,
    heading: f64,
    size: f64,
    surface: &mut dyn DrawSurface,
) -> Result<(), RenderError> {
    let m = frame
        .then_local(&Affine::translate(at.x, at.y))
        .then_local(&Affine::rotate(heading + PI));
    surface.set_transform(&m)?;
    surface.draw_pin(size * PIN_SCALE)
}

fn draw_hotspots(
    scene: &Scene<'_>,
    viewport: &Viewport,
    level: LevelIndex,
    world: &Affine,
    world_scale: f64,
    surface: &mut dyn DrawSurface,
) -> Result<(), RenderError> {
    let size = MARKER_SIZE_PX / (viewport.scale * world_scale);
    let p = pulse(scene.now_ms);
    let radius = 2.0 + 6.0 * p;
    let alpha = 0.5 - p * 0.5;
    let state = scene.state;

    for photo in scene.job.photos_on_level(level).filter(|p| !p.deleted) {
        let Some(h) = photo.hotspot else { continue };
        if state.active_photo == Some(photo.id) {
            draw_pin_at(world, h.position(), photo_heading(h.dir), size, surface)?;
        } else if state.show_all_hotspots {
            let green = state.shown_photos.contains(&photo.id) && photo.show_click;
            surface.set_transform(world)?;
            surface.fill_circle(h.position(), radius, &dot_color(green, alpha))?;
        }
    }
    Ok(())
}

fn draw_sweeps(
    scene: &Scene<'_>,
    viewport: &Viewport,
    level: &Level,
    surface: &mut dyn DrawSurface,
) -> Result<(), RenderError> {
    let t = scene.transformer;
    let (Some(overlay), Some(foot_k)) = (t.tour_overlay_transform(level.index), t.foot_k(level.index)) else {
        debug!(level = level.index, "tour floor not aligned yet, skipping sweeps");
        return Ok(());
    };
    let active = scene.job.level_bounds(scene.state.active_level);
    let frame = viewport.level_transform(&active, &level.bounds).then_local(&overlay);
    let size = MARKER_SIZE_PX / (foot_k * viewport.scale);
    let p = pulse(scene.now_ms);
    let floor = scene.job.tour_floor_for_level(level.index);
    let pose = scene.tour.pose();

    for sweep in scene.tour.sweeps().iter().filter(|s| s.floor_sequence == floor) {
        let Some(at) = sweep.map_point() else { continue };
        match pose.filter(|pose| pose.sweep.as_deref() == Some(sweep.id.as_str())) {
            Some(pose) => {
                let heading = -pose.rotation.y * TOUR_HEADING_RAD_PER_DEG;
                draw_pin_at(&frame, Point::new(pose.position.x, pose.position.z), heading, size, surface)?;
            }
            None => {
                surface.set_transform(&frame)?;
                surface.fill_circle(at, 0.5 * p, &dot_color(false, 0.5 - p * 0.5))?;
            }
        }
    }
    Ok(())
}

fn draw_measurements(
    scene: &Scene<'_>,
    viewport: &Viewport,
    level: LevelIndex,
    surface: &mut dyn DrawSurface,
) -> Result<(), RenderError> {
    let Some(ws) = scene.transformer.world_scale(level) else {
        return Ok(());
    };
    let active = scene.job.level_bounds(scene.state.active_level);
    surface.set_transform(&viewport.board_transform(&active))?;
    for m in scene.measurements.on_level(level) {
        let Some(text) = m.label(ws) else { continue };
        surface.stroke_path(&[m.start, m.end], false, MEASURE_LINE_WIDTH, MEASURE_COLOR)?;
        surface.fill_circle(m.start, MEASURE_END_RADIUS, MEASURE_COLOR)?;
        surface.fill_circle(m.end, MEASURE_END_RADIUS, MEASURE_COLOR)?;
        surface.fill_text(&text, m.midpoint(), MEASURE_FONT, MEASURE_COLOR)?;
    }
    Ok(())
}

fn draw_room_outlines(
    scene: &Scene<'_>,
    level: LevelIndex,
    world: &Affine,
    surface: &mut dyn DrawSurface,
) -> Result<(), RenderError> {
    let mut rng = rand::rng();
    surface.set_transform(world)?;
    for room in scene.job.rooms_on_level(level) {
        surface.stroke_path(&room.polygon, true, DEBUG_OUTLINE_WIDTH, &random_color(&mut rng))?;
    }
    Ok(())
}
