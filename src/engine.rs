//! The viewer: owns the job, the tour handle, every viewport, and all
//! interaction state, and exposes the host-facing API.
//!
//! DESIGN
//! ======
//! All logic that does not depend on a browser lives here so it can be tested
//! without WASM. The host forwards pointer, wheel, and timer callbacks; the
//! viewer mutates its state and reports what changed through the
//! [`EventBus`]. Drawing goes through [`render::draw_viewport`] with a
//! host-supplied [`DrawSurface`] and [`FloorRenderer`].
//!
//! Coordinate conversions borrow the job, the tour and the scale table
//! through a short-lived [`Transformer`]; results are copied out before any
//! state is mutated.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::{debug, info, warn};

use crate::animation::{AnimationKind, Animator, Tick, TimerHandle};
use crate::cache::{DefaultPhotos, PolygonCache, ScaleTable};
use crate::config::ViewerConfig;
use crate::consts::RESIZE_PARENT_INSET_PX;
use crate::error::ViewerError;
use crate::events::{EventBus, ViewerEvent};
use crate::fit::{Anchor, fit_level, fit_union};
use crate::geometry::{Point, Size};
use crate::hit::{identify_rooms, nearest_photo, nearest_sweep, resolve_level, select_photo, should_switch, sweeps_inside};
use crate::input::{Button, Cursor, Modifiers, WheelDelta};
use crate::measure::Measurements;
use crate::model::{Job, LevelIndex, Photo, PhotoId};
use crate::render::{self, DrawSurface, FloorRenderer, RenderStats, Scene};
use crate::scheduler::{FrameId, FrameRequest, FrameScheduler, ResizeDebouncer};
use crate::state::{PopupAnchor, ViewerState};
use crate::tour::TourSdk;
use crate::transform::{Reference, Rotation, Transformer};
use crate::viewport::{Stages, Viewport, ViewportId, Writer};

/// Pointer position resolved against the job.
#[derive(Debug, Clone, Copy)]
struct Located {
    /// HPL in the active level's frame.
    hpl: Point,
    level: LevelIndex,
    in_active_level: bool,
    /// `None` when the level has a degenerate world scale.
    world: Option<Point>,
}

/// Floor-plan viewer core.
pub struct Viewer<T: TourSdk> {
    job: Job,
    tour: T,
    config: ViewerConfig,
    rotation: Rotation,
    scales: ScaleTable,
    polygons: PolygonCache,
    defaults: DefaultPhotos,
    state: ViewerState,
    measurements: Measurements,
    viewports: Vec<Viewport>,
    next_viewport_id: u32,
    animator: Animator,
    events: EventBus,
    frames: FrameScheduler,
    resize: ResizeDebouncer,
}

impl<T: TourSdk> Viewer<T> {
    #[must_use]
    pub fn new(job: Job, tour: T, config: ViewerConfig) -> Self {
        let degrees = config.rotation_deg.unwrap_or(job.tour_rotation);
        let rotation = Rotation::from_degrees(degrees).unwrap_or_else(|| {
            warn!(degrees, "unsupported tour rotation; using 0");
            Rotation::Deg0
        });
        let scales = ScaleTable::build(&job);
        Self {
            job,
            tour,
            rotation,
            scales,
            polygons: PolygonCache::default(),
            defaults: DefaultPhotos::default(),
            state: ViewerState::default(),
            measurements: Measurements::new(),
            viewports: Vec::new(),
            next_viewport_id: 0,
            animator: Animator::new(),
            events: EventBus::new(),
            frames: FrameScheduler::new(),
            resize: ResizeDebouncer::new(config.resize_debounce_ms),
            config,
        }
    }

    fn transformer(&self) -> Transformer<'_> {
        Transformer::new(&self.job, &self.tour, &self.scales, self.rotation, self.state.active_level)
    }

    fn viewport_index(&self, id: ViewportId) -> Option<usize> {
        self.viewports.iter().position(|v| v.id() == id)
    }

    fn check_level(&self, level: LevelIndex) -> Result<(), ViewerError> {
        if self.job.levels.is_empty() {
            return Err(ViewerError::NoLevels);
        }
        match self.job.level(level) {
            Some(_) => Ok(()),
            None => Err(ViewerError::UnknownLevel(level)),
        }
    }

    // --- Viewports ---

    /// Register a drawing surface of `size` CSS pixels.
    pub fn add_viewport(&mut self, size: Size, full: bool) -> ViewportId {
        let id = ViewportId(self.next_viewport_id);
        self.next_viewport_id = self.next_viewport_id.wrapping_add(1);
        self.viewports.push(Viewport::new(id, size, full));
        debug!(viewport = id.0, width = size.width, height = size.height, full, "viewport added");
        id
    }

    /// Returns whether the viewport existed.
    pub fn remove_viewport(&mut self, id: ViewportId) -> bool {
        let Some(index) = self.viewport_index(id) else {
            return false;
        };
        self.viewports.remove(index);
        debug!(viewport = id.0, "viewport removed");
        true
    }

    // --- Levels ---

    /// Activate the level flagged as default. Runs once; later calls are no-ops.
    ///
    /// # Errors
    ///
    /// [`ViewerError::NoLevels`] for an empty job.
    pub fn init(&mut self) -> Result<(), ViewerError> {
        if self.state.initialized {
            return Ok(());
        }
        self.state.initialized = true;
        let level = self.job.default_level();
        self.check_level(level)?;
        self.activate_level(level);
        Ok(())
    }

    /// Switch to `level`. No-op when it is already active.
    ///
    /// In tour mode the tour is asked to move to the mapped floor; otherwise
    /// the level's default photo is restored and every viewport refits.
    ///
    /// # Errors
    ///
    /// [`ViewerError::UnknownLevel`] when the job has no such level.
    pub fn set_active_level(&mut self, level: LevelIndex) -> Result<(), ViewerError> {
        self.check_level(level)?;
        if level != self.state.active_level {
            self.activate_level(level);
        }
        Ok(())
    }

    /// Level picker button. Always acts; in tour mode only the tour moves and
    /// the level follows once the tour reports its new floor.
    ///
    /// # Errors
    ///
    /// [`ViewerError::UnknownLevel`] when the job has no such level.
    pub fn set_active_level_button(&mut self, level: LevelIndex) -> Result<(), ViewerError> {
        self.check_level(level)?;
        if self.state.tour_mode {
            let floor = self.job.tour_floor_for_level(level);
            self.tour.move_to_floor(floor);
            debug!(level, floor, "tour asked to move to floor");
            return Ok(());
        }
        self.state.active_level = level;
        self.events.emit(ViewerEvent::ActiveLevelChanged { level });
        self.restore_default_photo(Some(level));
        self.fit_all();
        info!(level, "active level set from button");
        Ok(())
    }

    /// Floor-plan level picker: flies every viewport from the current level to
    /// `level` when it changes and no animation is running. The fly switches
    /// the active level at its midpoint; otherwise the switch is immediate.
    ///
    /// # Errors
    ///
    /// [`ViewerError::UnknownLevel`] when the job has no such level.
    pub fn set_active_level_floorplan(&mut self, level: LevelIndex, now_ms: f64) -> Result<(), ViewerError> {
        self.check_level(level)?;
        let from = self.state.active_level;
        self.restore_default_photo(Some(level));
        if from != level && !self.animator.is_running() {
            self.start_fly(from, level, now_ms);
            return Ok(());
        }
        if self.state.active_level != level {
            self.state.active_level = level;
            self.events.emit(ViewerEvent::ActiveLevelChanged { level });
        }
        Ok(())
    }

    /// Follow the tour onto its floor `floor`. Unmapped floors are ignored.
    ///
    /// # Errors
    ///
    /// [`ViewerError::UnknownLevel`] when the mapping names a missing level.
    pub fn set_active_level_from_tour(&mut self, floor: usize) -> Result<(), ViewerError> {
        match self.job.level_for_tour_floor(floor) {
            Some(level) => self.set_active_level(level),
            None => {
                debug!(floor, "tour floor has no level");
                Ok(())
            }
        }
    }

    fn activate_level(&mut self, level: LevelIndex) {
        self.state.active_level = level;
        self.events.emit(ViewerEvent::ActiveLevelChanged { level });
        if self.state.tour_mode {
            let floor = self.job.tour_floor_for_level(level);
            self.tour.move_to_floor(floor);
            debug!(level, floor, "tour asked to move to floor");
        } else {
            self.restore_default_photo(Some(level));
            self.fit_all();
        }
        info!(level, "active level changed");
    }

    // --- Photos ---

    /// Restore the default photo for `level`, or the job's first photo when
    /// no level is given.
    pub fn restore_default_photo(&mut self, level: Option<LevelIndex>) {
        let photo = match level {
            Some(level) => self.defaults.resolve(&self.job, level).map(|p| p.id),
            None => self.job.photos.first().map(|p| p.id),
        };
        if photo.is_some() {
            self.set_active_photo(photo);
        }
    }

    /// Make `id` the active photo and remember it as its level's default,
    /// switching levels when the photo lives elsewhere.
    ///
    /// # Errors
    ///
    /// [`ViewerError::UnknownPhoto`] when the job has no such photo.
    pub fn set_active_camera(&mut self, id: PhotoId) -> Result<(), ViewerError> {
        let photo = self.job.photo(id).cloned().ok_or(ViewerError::UnknownPhoto(id))?;
        self.set_active_photo(Some(photo.id));
        if let Some(level) = photo.level_index() {
            self.defaults.set(level, photo);
            if level != self.state.active_level {
                self.set_active_level(level)?;
            }
        }
        Ok(())
    }

    fn set_active_photo(&mut self, photo: Option<PhotoId>) {
        if let Some(id) = photo {
            self.state.shown_photos.insert(id);
        }
        if self.state.active_photo != photo {
            self.state.active_photo = photo;
            self.events.emit(ViewerEvent::ActivePhotoChanged { photo });
        }
    }

    /// The active photo, including a default borrowed from another level.
    #[must_use]
    pub fn active_photo(&self) -> Option<&Photo> {
        let id = self.state.active_photo?;
        self.job.photo(id).or_else(|| {
            self.defaults
                .get(self.state.active_level)
                .filter(|p| p.id == id)
        })
    }

    // --- Modes ---

    /// Flip measure mode. Switching it on discards earlier measurements;
    /// switching it off discards the one being drawn.
    pub fn toggle_measure(&mut self) {
        self.state.measure_mode = !self.state.measure_mode;
        if self.state.measure_mode {
            self.measurements.clear();
        } else {
            self.measurements.cancel();
        }
        debug!(on = self.state.measure_mode, "measure mode toggled");
    }

    /// Drop the measurement being drawn, keeping finished ones.
    pub fn cancel_measurement(&mut self) {
        if self.measurements.current().is_some() {
            self.measurements.cancel();
            debug!("measurement cancelled");
        }
    }

    pub fn set_tour_mode(&mut self, on: bool) {
        self.state.tour_mode = on;
        if !on && self.state.hover_sweep.is_some() {
            self.state.hover_sweep = None;
            self.events.emit(ViewerEvent::HoverSweepChanged { sweep: None });
        }
    }

    /// While editing, map polygons are rebuilt on every lookup.
    pub fn set_edit_mode(&mut self, on: bool) {
        self.state.edit_mode = on;
        if on {
            self.polygons.invalidate();
        }
    }

    /// Forget every derived per-level value, e.g. after the job was edited.
    pub fn invalidate_caches(&mut self) {
        self.scales = ScaleTable::build(&self.job);
        self.polygons.invalidate();
        self.defaults.clear();
    }

    // --- Fits and animations ---

    /// Fit the active level into every viewport on the next frame.
    pub fn fit_all(&mut self) {
        self.state.fit_all = true;
    }

    /// Fit every level into every viewport on the next frame. `start` uses the
    /// wider overview margin.
    pub fn view_all_levels(&mut self, start: bool) {
        self.state.fit_all_levels_k = if start { self.config.fit_k_mid } else { self.config.fit_k };
        self.state.fit_all_levels = true;
    }

    /// Animate every viewport from the all-levels overview into level `to`,
    /// which becomes active immediately.
    ///
    /// # Errors
    ///
    /// [`ViewerError::UnknownLevel`] when the job has no such level.
    pub fn start_animation(&mut self, to: LevelIndex, now_ms: f64) -> Result<TimerHandle, ViewerError> {
        self.check_level(to)?;
        self.state.fit_all_levels = false;
        for i in 0..self.viewports.len() {
            let staged = self.stage_direct(&self.viewports[i], to);
            self.set_stages(i, staged);
        }
        let from = self.state.active_level;
        let handle = self.animator.start(
            AnimationKind::DirectFit,
            from,
            to,
            self.config.direct_fit_ms,
            now_ms,
            &mut self.viewports,
        );
        if from != to {
            self.state.active_level = to;
            self.events.emit(ViewerEvent::ActiveLevelChanged { level: to });
        }
        self.events.emit(ViewerEvent::AnimationStarted { kind: AnimationKind::DirectFit, to_level: to });
        Ok(handle)
    }

    fn start_fly(&mut self, from: LevelIndex, to: LevelIndex, now_ms: f64) -> TimerHandle {
        for i in 0..self.viewports.len() {
            let staged = self.stage_two_hop(&self.viewports[i], from, to);
            self.set_stages(i, staged);
        }
        let handle = self.animator.start(
            AnimationKind::TwoHopFly,
            from,
            to,
            self.config.two_hop_ms,
            now_ms,
            &mut self.viewports,
        );
        self.events.emit(ViewerEvent::AnimationStarted { kind: AnimationKind::TwoHopFly, to_level: to });
        handle
    }

    fn stage_direct(&self, v: &Viewport, to: LevelIndex) -> Result<Stages, ViewerError> {
        let union = self.job.union_bounds().ok_or(ViewerError::NoLevels)?;
        let dest = self.job.level_bounds(to);
        let middle = fit_union(v.size, &union, &dest, self.config.fit_k_mid)?;
        let finish = fit_level(v.size, &dest, self.config.fit_k, self.config.fit_position.into())?;
        Ok(Stages { start: v.snapshot(), middle_out: middle, middle_in: middle, finish })
    }

    fn stage_two_hop(&self, v: &Viewport, from: LevelIndex, to: LevelIndex) -> Result<Stages, ViewerError> {
        let union = self.job.union_bounds().ok_or(ViewerError::NoLevels)?;
        let origin = self.job.level_bounds(from);
        let dest = self.job.level_bounds(to);
        Ok(Stages {
            start: fit_level(v.size, &origin, self.config.fit_k, Anchor::MIDDLE)?,
            middle_out: fit_union(v.size, &union, &origin, self.config.fit_k_mid)?,
            middle_in: fit_union(v.size, &union, &dest, self.config.fit_k_mid)?,
            finish: fit_level(v.size, &dest, self.config.fit_k, self.config.fit_position.into())?,
        })
    }

    /// Store staged snapshots; a viewport that cannot be fitted holds still.
    fn set_stages(&mut self, index: usize, staged: Result<Stages, ViewerError>) {
        let v = &mut self.viewports[index];
        v.stages = match staged {
            Ok(stages) => stages,
            Err(e) => {
                debug!(viewport = v.id().0, error = %e, "animation staging skipped");
                let here = v.snapshot();
                Stages { start: here, middle_out: here, middle_in: here, finish: here }
            }
        };
    }

    /// Advance the running animation. Called from the host's 60 Hz timer.
    pub fn tick_animation(&mut self, now_ms: f64) -> Tick {
        let tick = self.animator.tick(now_ms, &mut self.viewports);
        match tick {
            Tick::Idle => {}
            Tick::Running { active_level } => {
                if active_level != self.state.active_level {
                    self.state.active_level = active_level;
                    self.events.emit(ViewerEvent::ActiveLevelChanged { level: active_level });
                }
            }
            Tick::Finished { level } => {
                if level != self.state.active_level {
                    self.state.active_level = level;
                    self.events.emit(ViewerEvent::ActiveLevelChanged { level });
                }
                self.restore_default_photo(Some(level));
                self.events.emit(ViewerEvent::AnimationFinished { level });
            }
        }
        tick
    }

    /// Stop the running animation where it is.
    pub fn cancel_animation(&mut self) {
        self.animator.cancel(&mut self.viewports);
    }

    // --- Pointer input ---

    fn locate(&self, index: usize, canvas: Point) -> Located {
        let hpl = self.viewports[index].canvas_to_hpl(canvas);
        let hit = resolve_level(&self.job, self.state.active_level, hpl);
        let world = self.transformer().hpl_to_world(hpl, hit.level, Reference::Active);
        Located { hpl, level: hit.level, in_active_level: hit.in_active_level, world }
    }

    /// Pointer position in absolute HPL, where measurements live.
    fn absolute_hpl(&self, index: usize, canvas: Point) -> Point {
        let hpl = self.viewports[index].canvas_to_hpl(canvas);
        let origin = self.job.level_bounds(self.state.active_level);
        Point::new(hpl.x + origin.left, hpl.y + origin.top)
    }

    pub fn on_pointer_down(&mut self, id: ViewportId, canvas: Point, button: Button) {
        let Some(index) = self.viewport_index(id) else {
            return;
        };
        if button != Button::Primary {
            return;
        }
        if self.state.measure_mode {
            let at = self.absolute_hpl(index, canvas);
            self.measurements.begin(self.state.active_level, at);
        }
        self.state.pointer.press(canvas);
    }

    pub fn on_pointer_move(&mut self, id: ViewportId, canvas: Point) {
        let Some(index) = self.viewport_index(id) else {
            return;
        };
        if self.state.pointer.down {
            if self.state.measure_mode && self.measurements.current().is_some() {
                let at = self.absolute_hpl(index, canvas);
                self.measurements.update(at);
            } else if self.state.zoom_enabled {
                if let Some((dx, dy)) = self.state.pointer.drag(canvas, self.config.drag_dead_zone_px) {
                    self.viewports[index].pan_screen(dx, dy);
                }
            }
            return;
        }
        self.update_hover(index, canvas);
    }

    fn update_hover(&mut self, index: usize, canvas: Point) {
        let located = self.locate(index, canvas);
        self.state.in_active_level = located.in_active_level;

        let cursor = if self.state.tour_mode {
            let sweep = self.sweep_under(index, canvas, Some(self.config.sweep_hover_distance));
            let over = sweep.is_some();
            if sweep != self.state.hover_sweep {
                self.state.hover_sweep.clone_from(&sweep);
                self.events.emit(ViewerEvent::HoverSweepChanged { sweep });
            }
            if over { Cursor::Pointer } else { Cursor::Default }
        } else if self.state.measure_mode {
            Cursor::Default
        } else {
            let over = located
                .world
                .and_then(|w| select_photo(&self.job, located.level, w, self.config.click_tolerance))
                .is_some();
            if over { Cursor::Pointer } else { Cursor::Default }
        };

        if cursor != self.state.cursor {
            self.state.cursor = cursor;
            self.events.emit(ViewerEvent::CursorChanged { cursor });
        }
    }

    /// Id of the tour viewpoint nearest the pointer in map space, limited to
    /// the room (or level) under the pointer.
    fn sweep_under(&mut self, index: usize, canvas: Point, max_distance: Option<f64>) -> Option<String> {
        let hpl = self.viewports[index].canvas_to_hpl(canvas);
        let active = self.state.active_level;
        let level = resolve_level(&self.job, active, hpl).level;

        let t = Transformer::new(&self.job, &self.tour, &self.scales, self.rotation, active);
        let world = t.hpl_to_world(hpl, level, Reference::Active)?;
        self.polygons.refresh(&t, &self.job, self.state.edit_mode);

        let rooms = identify_rooms(&self.job, level, world);
        let room = rooms.first().and_then(|&r| self.polygons.room(r));
        // The level fallback compares map points against the world outline.
        let outline = self.job.level(level).map_or(&[][..], |l| l.polygon.as_slice());
        let candidates = sweeps_inside(self.tour.sweeps(), self.job.tour_floor_for_level(level), room, outline);

        let pointer = t.hpl_to_map(t.active_to_own_hpl(hpl, level), level)?;
        nearest_sweep(&candidates, pointer, max_distance).map(|s| s.id.clone())
    }

    pub fn on_pointer_up(&mut self, id: ViewportId, canvas: Point) {
        let Some(index) = self.viewport_index(id) else {
            return;
        };
        let dragged = self.state.pointer.moved;
        let mut selected = None;

        if !self.state.measure_mode && !self.state.tour_mode {
            selected = self.select_on_click(index, canvas);
        } else if self.state.tour_mode && !dragged && !self.state.measure_mode {
            if let Some(sweep) = self.sweep_under(index, canvas, None) {
                debug!(sweep = %sweep, "tour asked to move to sweep");
                self.tour.move_to_sweep(&sweep);
            }
        }

        if self.state.measure_mode {
            self.finish_measurement();
        }
        self.state.pointer.release();

        let popup = selected.map(|(photo, world): (Photo, Point)| {
            let scale = self.viewports[index].scale;
            let at = photo.hotspot.map_or(Point::new(0.0, 0.0), |h| h.position());
            PopupAnchor {
                camera: canvas,
                world,
                vector: Point::new(-(at.x - world.x) * scale, (at.y - world.y) * scale),
            }
        });
        self.state.popup = popup;
        self.events.emit(ViewerEvent::PopupChanged { popup });
    }

    /// Click selection outside tour and measure modes. Returns the photo the
    /// popup points at, with the pointer's world position.
    fn select_on_click(&mut self, index: usize, canvas: Point) -> Option<(Photo, Point)> {
        let located = self.locate(index, canvas);
        self.state.in_active_level = located.in_active_level;
        let world = located.world?;

        let (photo, adopt) = if self.state.show_all_hotspots {
            let photo = select_photo(&self.job, located.level, world, self.config.click_tolerance)?.clone();
            (photo, true)
        } else {
            match nearest_photo(&self.job, located.level, world) {
                Some(nearest) => {
                    let adopt = should_switch(self.state.active_photo, &nearest, self.config.nearest_switch_distance);
                    (nearest.photo.clone(), adopt)
                }
                None => (self.active_photo()?.clone(), false),
            }
        };

        if adopt {
            if let Err(e) = self.set_active_camera(photo.id) {
                warn!(photo = %photo.id, error = %e, "selected photo could not be activated");
            }
        }
        Some((photo, world))
    }

    fn finish_measurement(&mut self) {
        let Some(m) = self.measurements.finish() else {
            return;
        };
        let level = m.level;
        let value = self.scales.ensure(&self.job, level).and_then(|s| m.value(s));
        self.events.emit(ViewerEvent::MeasurementFinished { level, value });
    }

    /// Pointer left the canvas: drop the gesture and keep any measurement.
    pub fn on_leave(&mut self) {
        self.state.pointer.release();
        if self.state.measure_mode {
            self.finish_measurement();
        }
    }

    // --- Wheel, pinch, buttons ---

    /// Plain wheel zooms on the pointer; shift pans vertically and ctrl
    /// horizontally. Returns whether the viewport moved.
    pub fn on_wheel(&mut self, id: ViewportId, canvas: Point, delta: WheelDelta, modifiers: Modifiers) -> bool {
        let Some(index) = self.viewport_index(id) else {
            return false;
        };
        if !self.state.zoom_enabled {
            return false;
        }
        let v = &mut self.viewports[index];
        if modifiers.shift {
            v.wheel_pan_vertical(delta.dy)
        } else if modifiers.ctrl {
            v.wheel_pan_horizontal(delta.dy)
        } else {
            let inc = if delta.dy > 0.0 { -self.config.zoom_increment } else { self.config.zoom_increment };
            v.zoom_on_point(canvas, inc)
        }
    }

    pub fn on_pinch_start(&mut self, id: ViewportId) {
        if let Some(index) = self.viewport_index(id) {
            self.viewports[index].begin_pinch();
        }
    }

    pub fn on_pinch(&mut self, id: ViewportId, factor: f64) -> bool {
        match self.viewport_index(id) {
            Some(index) if self.state.zoom_enabled => self.viewports[index].pinch(factor),
            _ => false,
        }
    }

    /// Zoom in about the viewport's centre.
    pub fn plus(&mut self, id: ViewportId) -> bool {
        self.zoom_button(id, self.config.zoom_increment)
    }

    /// Zoom out about the viewport's centre.
    pub fn minus(&mut self, id: ViewportId) -> bool {
        self.zoom_button(id, -self.config.zoom_increment)
    }

    fn zoom_button(&mut self, id: ViewportId, increment: f64) -> bool {
        match self.viewport_index(id) {
            Some(index) => self.viewports[index].zoom_step(increment),
            None => false,
        }
    }

    // --- Timers and drawing ---

    /// Coarse redraw tick; forward the request to the browser's frame callback.
    pub fn tick_frame(&mut self, shown: bool) -> Option<FrameRequest> {
        self.frames.tick(shown)
    }

    /// Claim frame `frame` and apply pending fits. Returns `false` for stale
    /// frames, which must not be drawn.
    pub fn begin_frame(&mut self, frame: FrameId) -> bool {
        if !self.frames.begin_frame(frame) {
            return false;
        }
        self.apply_pending_fits();
        true
    }

    fn apply_pending_fits(&mut self) {
        if !self.state.fit_all && !self.state.fit_all_levels {
            return;
        }
        let active = self.job.level_bounds(self.state.active_level);
        let union = self.job.union_bounds();
        let anchor = Anchor::from(self.config.fit_position);
        for v in self.viewports.iter_mut().filter(|v| v.writer() == Writer::Input) {
            if self.state.fit_all {
                match fit_level(v.size, &active, self.config.fit_k, anchor) {
                    Ok(s) => v.apply(s),
                    Err(e) => debug!(viewport = v.id().0, error = %e, "fit skipped"),
                }
            }
            if let (true, Some(union)) = (self.state.fit_all_levels, union) {
                match fit_union(v.size, &union, &active, self.state.fit_all_levels_k) {
                    Ok(s) => v.apply(s),
                    Err(e) => debug!(viewport = v.id().0, error = %e, "fit skipped"),
                }
            }
        }
        self.state.fit_all = false;
        self.state.fit_all_levels = false;
    }

    /// Draw one viewport. `None` for an unknown viewport.
    pub fn render_viewport(
        &self,
        id: ViewportId,
        surface: &mut dyn DrawSurface,
        floors: &mut dyn FloorRenderer,
        now_ms: f64,
    ) -> Option<RenderStats> {
        let viewport = self.viewports.get(self.viewport_index(id)?)?;
        let t = self.transformer();
        let scene = Scene {
            job: &self.job,
            tour: &self.tour,
            transformer: &t,
            state: &self.state,
            measurements: &self.measurements,
            config: &self.config,
            now_ms,
        };
        Some(render::draw_viewport(&scene, viewport, surface, floors))
    }

    /// Record a resize event; the refit happens once the burst is over.
    pub fn on_resize(&mut self, now_ms: f64) {
        self.resize.notify(now_ms);
    }

    /// Apply a debounced resize. `parent_size` reports the measured parent
    /// box of each viewport; full-bleed viewports take `full_size`.
    pub fn poll_resize(&mut self, now_ms: f64, parent_size: impl Fn(ViewportId) -> Option<Size>, full_size: Size) -> bool {
        if !self.resize.poll(now_ms) {
            return false;
        }
        for v in &mut self.viewports {
            if v.full {
                v.size = full_size;
            } else if let Some(parent) = parent_size(v.id()) {
                v.size = Size::new(
                    (parent.width - RESIZE_PARENT_INSET_PX).floor().max(0.0),
                    (parent.height - RESIZE_PARENT_INSET_PX).floor().max(0.0),
                );
            }
        }
        self.fit_all();
        true
    }

    // --- Queries ---

    #[must_use]
    pub fn job(&self) -> &Job {
        &self.job
    }

    #[must_use]
    pub fn tour(&self) -> &T {
        &self.tour
    }

    /// The tour handle, for feeding SDK callbacks and draining commands.
    /// Map polygons are rebuilt on the next lookup since extents may change.
    pub fn tour_mut(&mut self) -> &mut T {
        self.polygons.invalidate();
        &mut self.tour
    }

    #[must_use]
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    #[must_use]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    #[must_use]
    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    /// Host-owned switches (show all levels, hotspots, titles, zoom lock).
    pub fn state_mut(&mut self) -> &mut ViewerState {
        &mut self.state
    }

    #[must_use]
    pub fn measurements(&self) -> &Measurements {
        &self.measurements
    }

    #[must_use]
    pub fn viewport(&self, id: ViewportId) -> Option<&Viewport> {
        self.viewports.iter().find(|v| v.id() == id)
    }

    #[must_use]
    pub fn viewports(&self) -> &[Viewport] {
        &self.viewports
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animator.is_running()
    }

    /// Subscribe to or drain emitted events.
    pub fn events(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// World point under `canvas` in viewport `id`, for host tooltips.
    #[must_use]
    pub fn world_at(&self, id: ViewportId, canvas: Point) -> Option<(LevelIndex, Point)> {
        let located = self.locate(self.viewport_index(id)?, canvas);
        Some((located.level, located.world?))
    }

    /// HPL point under `canvas` in viewport `id`, in the active level's frame.
    #[must_use]
    pub fn hpl_at(&self, id: ViewportId, canvas: Point) -> Option<Point> {
        let index = self.viewport_index(id)?;
        Some(self.locate(index, canvas).hpl)
    }
}
