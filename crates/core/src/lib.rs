#![deny(unsafe_code)]
//! Core types and pipeline for the grade-engine LUT color-grading renderer.
//!
//! Provides the `Shape` geometry trait with its `Cube` variant,
//! `SceneTransform` and the projection/model-view matrix contract, `Lut3d`
//! (3D lookup-table construction, registry, and CPU grading reference),
//! JSON option helpers, and -- behind the `render` feature -- the glow-based
//! two-pass pipeline (scene pass into an offscreen target, LUT grading
//! pass into the display surface).

pub mod error;
pub mod geometry;
pub mod lut;
pub mod params;
pub mod transform;

#[cfg(feature = "render")]
pub mod render;

pub use error::PipelineError;
pub use geometry::{Cube, Shape};
pub use lut::{grading_coord, Lut3d, DEFAULT_LUT_SIZE};
pub use transform::{projection, wrap_angle, SceneTransform};
