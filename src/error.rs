//! Error types for the viewer core.
//!
//! Lookups that the viewer treats as "nothing to show" return `Option`; these
//! errors cover computations a caller has to react to.

use crate::model::{LevelIndex, PhotoId};

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("unknown level: {0}")]
    UnknownLevel(LevelIndex),
    #[error("unknown photo: {0}")]
    UnknownPhoto(PhotoId),
    #[error("level {level} has a degenerate world scale (width {width}, world width {world_width})")]
    DegenerateScale { level: LevelIndex, width: f64, world_width: f64 },
    #[error("cannot fit {width}x{height} content into a {canvas_width}x{canvas_height} canvas")]
    DegenerateFit { width: f64, height: f64, canvas_width: f64, canvas_height: f64 },
    #[error("job has no levels")]
    NoLevels,
    #[error("invalid config value for {key}: {value}")]
    ConfigParse { key: String, value: String },
    #[error("invalid job JSON: {0}")]
    InvalidJob(#[from] serde_json::Error),
}

/// Failure raised while drawing one level. The render pass logs it and moves
/// on to the next level.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("drawing surface error: {0}")]
    Surface(String),
    #[error("floor routine for level {level} failed: {message}")]
    FloorRoutine { level: LevelIndex, message: String },
}
