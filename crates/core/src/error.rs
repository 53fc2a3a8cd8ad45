//! Error types for the grade-engine core.

use thiserror::Error;

/// Errors produced by pipeline construction and rendering.
///
/// Every variant signals a startup-time fatal condition: there is no retry
/// path, the error is surfaced once and rendering does not proceed with the
/// affected resource. A still-loading base texture is deliberately *not* an
/// error -- the scene pass samples the placeholder until content arrives.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No suitable rendering context could be obtained, or the context lacks
    /// a required capability (e.g. 3D texture support too small for a LUT).
    #[error("rendering context unavailable: {0}")]
    ContextUnavailable(String),

    /// A shader stage failed to compile or a program failed to link.
    #[cfg(feature = "render")]
    #[error(transparent)]
    Shader(#[from] crate::render::shader::ShaderError),

    /// The offscreen target's framebuffer did not reach a renderable state.
    /// Signals a platform/driver limit; there is no recovery path.
    #[error("framebuffer incomplete: status 0x{status:04X}")]
    FramebufferIncomplete {
        /// The raw GL framebuffer status code.
        status: u32,
    },

    /// A surface or LUT dimension was outside the valid range
    /// (zero-sized surface, or LUT side length below 2).
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// A requested LUT name was not found in the registry.
    #[error("unknown LUT: {0}")]
    UnknownLut(String),

    /// The driver reported a failure creating a GPU object.
    #[error("gl object creation failed: {0}")]
    Gl(String),
}
