//! Geometry and interaction core for a multi-level floor-plan viewer.
//!
//! The crate owns everything between raw pointer events and draw calls: the
//! job model, conversions between world units, the shared drawing frame and
//! the 3D tour's map space, per-viewport pan/zoom, hit-testing, measurement,
//! camera animations and frame scheduling. The host page wires DOM events to
//! [`engine::Viewer`], forwards [`tour::TourCommand`]s to the tour SDK, and
//! supplies a [`render::DrawSurface`] plus a [`render::FloorRenderer`] for
//! each frame. Built with the `web` feature it also provides a
//! `CanvasRenderingContext2d` surface.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | The [`engine::Viewer`] facade and its host-facing API |
//! | [`model`] | Read-only job model: levels, rooms, photos, labels |
//! | [`tour`] | Tour SDK capability and an in-memory snapshot |
//! | [`transform`] | World, HPL and tour-map conversions |
//! | [`cache`] | World scales, map polygons, per-level default photos |
//! | [`viewport`] | Per-canvas pan/zoom state and input mutations |
//! | [`fit`] | Fit-to-level and all-levels overview snapshots |
//! | [`hit`] | Level, room, photo and viewpoint hit-testing |
//! | [`input`] | Pointer, wheel and modifier types; drag tracking |
//! | [`measure`] | Distance measurements |
//! | [`animation`] | Direct-fit and two-hop camera animations |
//! | [`scheduler`] | Frame request bookkeeping and resize debounce |
//! | [`events`] | Change notifications for the host |
//! | [`state`] | Selection and mode state |
//! | [`render`] | Scene drawing against a [`render::DrawSurface`] |
//! | [`config`] | Tunables with environment overrides |
//! | [`geometry`] | Points, bounds, affine transforms, polygon tests |
//! | [`error`] | Error types |
//! | [`consts`] | Shared numeric constants |

pub mod animation;
pub mod cache;
pub mod config;
pub mod consts;
pub mod engine;
pub mod error;
pub mod events;
pub mod fit;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod measure;
pub mod model;
pub mod render;
pub mod scheduler;
pub mod state;
pub mod tour;
pub mod transform;
pub mod viewport;
#[cfg(feature = "web")]
pub mod web;

#[cfg(test)]
#[path = "fixtures_test.rs"]
pub(crate) mod fixtures;
