//! GPU rendering infrastructure for the two-pass grading pipeline.
//!
//! This module is only available when the `render` feature is enabled.
//! It provides shader compilation, texture management, the offscreen
//! target, geometry upload, and the scene/composite passes driven by
//! [`pipeline::GradingPipeline`].
//!
//! # Module overview
//!
//! - [`context`] -- GPU context wrapper with capability verification.
//! - [`shader`] -- Shader compilation, linking, and contract resolution.
//! - [`texture`] -- Base texture, scene color, and 3D LUT uploads.
//! - [`target`] -- FBO + color + depth offscreen target.
//! - [`mesh`] -- Shape geometry upload and attribute wiring.
//! - [`quad`] -- Static fullscreen quad for the grading pass.
//! - [`scene`] -- First pass: textured geometry with depth testing.
//! - [`composite`] -- Second pass: LUT grading into the surface.
//! - [`pipeline`] -- Frame orchestration and resize handling.

pub mod composite;
pub mod context;
pub mod mesh;
pub mod pipeline;
pub mod quad;
pub mod scene;
pub mod shader;
pub mod target;
pub mod texture;

// Re-export key types at the render module level for convenience.
pub use composite::CompositePass;
pub use context::GpuContext;
pub use mesh::MeshBuffers;
pub use pipeline::GradingPipeline;
pub use quad::FullscreenQuad;
pub use scene::ScenePass;
pub use shader::{format_shader_error, ShaderError, ShaderProgram};
pub use target::OffscreenTarget;
pub use texture::{create_lut_texture, create_placeholder, delete_texture, upload_rgba};
