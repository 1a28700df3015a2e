//! Shared numeric constants for the viewer core.
//!
//! Tunables that a host may want to change live in [`crate::config::ViewerConfig`];
//! the values here are its defaults plus the fixed constants of the geometry.

// ── Geometry ────────────────────────────────────────────────────

/// Inches per meter. Multiplied by a level's world scale to get the tour's
/// foot-based unit in HPL pixels.
pub const FOOT_K_FACTOR: f64 = 39.370_08;

/// Denominators below this are treated as "no fit possible".
pub const SCALE_EPSILON: f64 = 1e-9;

/// Pixels shaved off the parent box when sizing a non-full viewport on resize.
pub const RESIZE_PARENT_INSET_PX: f64 = 5.0;

// ── Input ───────────────────────────────────────────────────────

/// Fractional zoom step per wheel notch or +/- button press.
pub const DEFAULT_ZOOM_INCREMENT: f64 = 0.05;

/// Screen-pixel movement below which a press is still a click.
pub const DEFAULT_DRAG_DEAD_ZONE_PX: f64 = 4.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Per-axis world-unit tolerance for exact photo selection.
pub const DEFAULT_CLICK_TOLERANCE: f64 = 10.0;

/// A hover only steals the active photo when the nearest candidate is closer than this.
pub const DEFAULT_NEAREST_SWITCH_DISTANCE: f64 = 70.0;

/// Map-space radius for hovering a tour viewpoint.
pub const DEFAULT_SWEEP_HOVER_DISTANCE: f64 = 1.0;

/// Sentinel upper bound for nearest-neighbour scans.
pub const FAR_DISTANCE: f64 = 1_000_000.0;

// ── Fitting ─────────────────────────────────────────────────────

/// Fraction of the canvas a fitted level occupies.
pub const DEFAULT_FIT_K: f64 = 0.8;

/// Fraction of the canvas the all-levels overview occupies mid-flight.
pub const DEFAULT_FIT_K_MID: f64 = 0.6;

/// Vertical bias of a centred fit: the level sits in the lower part of the canvas.
pub const FIT_CENTER_VERTICAL_BIAS: f64 = 0.65;

/// Vertical bias of a top-right fit.
pub const FIT_TOP_RIGHT_VERTICAL_BIAS: f64 = 0.1;

// ── Timing ──────────────────────────────────────────────────────

/// Duration of a direct fit-to-level animation.
pub const DEFAULT_DIRECT_FIT_MS: f64 = 1500.0;

/// Duration of a zoom-out / zoom-in level fly.
pub const DEFAULT_TWO_HOP_MS: f64 = 3000.0;

/// Animation timer period (60 Hz).
pub const DEFAULT_ANIMATION_TICK_MS: f64 = 1000.0 / 60.0;

/// Coarse redraw tick.
pub const DEFAULT_FRAME_INTERVAL_MS: f64 = 34.0;

/// Resize events closer together than this collapse into one.
pub const DEFAULT_RESIZE_DEBOUNCE_MS: f64 = 100.0;

// ── Drawing ─────────────────────────────────────────────────────

/// Viewport scale at which every label becomes visible.
pub const DEFAULT_TEXT_LABEL_SCALE: f64 = 1.0;

/// Screen size of hotspot and sweep markers, in pixels.
pub const MARKER_SIZE_PX: f64 = 16.0;

/// Pin image scale relative to the marker size.
pub const PIN_SCALE: f64 = 1.6;

/// Radians per photo direction step (16 compass steps).
pub const PHOTO_DIR_STEP_RAD: f64 = 0.3925;

/// Quarter turn applied to photo directions so 0 points up.
pub const PHOTO_DIR_OFFSET_RAD: f64 = 1.5708;

/// Label line height as a multiple of the font size.
pub const LABEL_LINE_HEIGHT: f64 = 1.2;

/// Level titles are drawn at this multiple of the label size.
pub const LEVEL_TITLE_FONT_K: f64 = 3.0;
