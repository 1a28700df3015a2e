//! Viewer tunables, loaded from `FLOORPLAN_*` environment variables.
//!
//! Every field has a default from [`crate::consts`]. A variable that is set
//! but does not parse is logged and ignored.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::consts::{
    DEFAULT_ANIMATION_TICK_MS, DEFAULT_CLICK_TOLERANCE, DEFAULT_DIRECT_FIT_MS, DEFAULT_DRAG_DEAD_ZONE_PX,
    DEFAULT_FIT_K, DEFAULT_FIT_K_MID, DEFAULT_FRAME_INTERVAL_MS, DEFAULT_NEAREST_SWITCH_DISTANCE,
    DEFAULT_RESIZE_DEBOUNCE_MS, DEFAULT_SWEEP_HOVER_DISTANCE, DEFAULT_TEXT_LABEL_SCALE, DEFAULT_TWO_HOP_MS,
    DEFAULT_ZOOM_INCREMENT,
};
use crate::error::ViewerError;

const ENV_PREFIX: &str = "FLOORPLAN_";

/// Where a fitted level sits inside the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FitPosition {
    /// Horizontally centred, vertically biased toward the bottom.
    #[default]
    Center,
    /// Against the right edge, near the top.
    TopRight,
}

impl FromStr for FitPosition {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "center" | "centre" => Ok(Self::Center),
            "top-right" | "top_right" | "top right" => Ok(Self::TopRight),
            _ => Err(ViewerError::ConfigParse { key: "FIT_POSITION".into(), value: s.to_owned() }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Fractional zoom step per wheel notch or button press.
    pub zoom_increment: f64,
    /// Screen pixels a press must travel before it becomes a drag.
    pub drag_dead_zone_px: f64,
    /// Per-axis world-unit tolerance for selecting a photo.
    pub click_tolerance: f64,
    /// Hover only switches the active photo below this world distance.
    pub nearest_switch_distance: f64,
    /// Map-unit radius for hovering a tour viewpoint.
    pub sweep_hover_distance: f64,
    pub fit_k: f64,
    pub fit_k_mid: f64,
    pub fit_position: FitPosition,
    pub direct_fit_ms: f64,
    pub two_hop_ms: f64,
    /// Period of the host timer that calls [`crate::engine::Viewer::tick_animation`].
    /// The viewer only reads timestamps, so this is a hint for the host.
    pub animation_tick_ms: f64,
    /// Period of the host timer that calls [`crate::engine::Viewer::tick_frame`].
    /// Read by the host; the scheduler coalesces whatever rate it is driven at.
    pub frame_interval_ms: f64,
    pub resize_debounce_ms: f64,
    /// Viewport scale from which every label is drawn.
    pub text_label_scale: f64,
    /// Overrides the job's tour rotation when set.
    pub rotation_deg: Option<i32>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            zoom_increment: DEFAULT_ZOOM_INCREMENT,
            drag_dead_zone_px: DEFAULT_DRAG_DEAD_ZONE_PX,
            click_tolerance: DEFAULT_CLICK_TOLERANCE,
            nearest_switch_distance: DEFAULT_NEAREST_SWITCH_DISTANCE,
            sweep_hover_distance: DEFAULT_SWEEP_HOVER_DISTANCE,
            fit_k: DEFAULT_FIT_K,
            fit_k_mid: DEFAULT_FIT_K_MID,
            fit_position: FitPosition::Center,
            direct_fit_ms: DEFAULT_DIRECT_FIT_MS,
            two_hop_ms: DEFAULT_TWO_HOP_MS,
            animation_tick_ms: DEFAULT_ANIMATION_TICK_MS,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            resize_debounce_ms: DEFAULT_RESIZE_DEBOUNCE_MS,
            text_label_scale: DEFAULT_TEXT_LABEL_SCALE,
            rotation_deg: None,
        }
    }
}

impl ViewerConfig {
    /// Load from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(_) => None,
        })
    }

    /// Load through an arbitrary key lookup; keys carry the `FLOORPLAN_` prefix.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        let get = |suffix: &str| {
            let key = format!("{ENV_PREFIX}{suffix}");
            lookup(&key).map(|value| (key, value))
        };
        Self {
            zoom_increment: parse_or(get("ZOOM_INCREMENT"), d.zoom_increment),
            drag_dead_zone_px: parse_or(get("DRAG_DEAD_ZONE_PX"), d.drag_dead_zone_px),
            click_tolerance: parse_or(get("CLICK_TOLERANCE"), d.click_tolerance),
            nearest_switch_distance: parse_or(get("NEAREST_SWITCH_DISTANCE"), d.nearest_switch_distance),
            sweep_hover_distance: parse_or(get("SWEEP_HOVER_DISTANCE"), d.sweep_hover_distance),
            fit_k: parse_or(get("FIT_K"), d.fit_k),
            fit_k_mid: parse_or(get("FIT_K_MID"), d.fit_k_mid),
            fit_position: parse_or(get("FIT_POSITION"), d.fit_position),
            direct_fit_ms: parse_or(get("DIRECT_FIT_MS"), d.direct_fit_ms),
            two_hop_ms: parse_or(get("TWO_HOP_MS"), d.two_hop_ms),
            animation_tick_ms: parse_or(get("ANIMATION_TICK_MS"), d.animation_tick_ms),
            frame_interval_ms: parse_or(get("FRAME_INTERVAL_MS"), d.frame_interval_ms),
            resize_debounce_ms: parse_or(get("RESIZE_DEBOUNCE_MS"), d.resize_debounce_ms),
            text_label_scale: parse_or(get("TEXT_LABEL_SCALE"), d.text_label_scale),
            rotation_deg: get("TOUR_ROTATION").and_then(parse_entry),
        }
    }
}

fn parse_or<T: FromStr>(entry: Option<(String, String)>, default: T) -> T {
    entry.and_then(parse_entry).unwrap_or(default)
}

fn parse_entry<T: FromStr>((key, value): (String, String)) -> Option<T> {
    match value.trim().parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(%key, %value, "ignoring unparseable config value");
            None
        }
    }
}
