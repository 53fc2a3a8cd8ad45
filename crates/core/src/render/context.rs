//! GPU context wrapper with capability verification.
//!
//! `GpuContext` wraps a `glow::Context` and checks at initialization that
//! the platform can host the pipeline at all. The grading pass needs 3D
//! textures at least as large as the default LUT; a context that cannot
//! provide them is reported as unavailable before any resource is built.

use crate::error::PipelineError;
use crate::lut::DEFAULT_LUT_SIZE;

/// Wraps a `glow::Context` with verified capabilities.
///
/// Created once at initialization, before any pipeline resource. Failure
/// here is the `ContextUnavailable` startup condition: surfaced once to
/// the operator, no rendering proceeds.
pub struct GpuContext {
    gl: glow::Context,
    max_3d_texture_size: i32,
}

impl GpuContext {
    /// Wraps the given GL context, verifying 3D texture support.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::ContextUnavailable` if the driver's maximum
    /// 3D texture size cannot hold the default LUT -- the grading pass
    /// cannot function on such a context.
    #[allow(unsafe_code)]
    pub fn new(gl: glow::Context) -> Result<Self, PipelineError> {
        use glow::HasContext;

        // SAFETY: glow wraps raw GL parameter queries as unsafe; the
        // constant is a valid capability name.
        let max_3d_texture_size = unsafe { gl.get_parameter_i32(glow::MAX_3D_TEXTURE_SIZE) };

        if max_3d_texture_size < DEFAULT_LUT_SIZE as i32 {
            return Err(PipelineError::ContextUnavailable(format!(
                "3D texture support too small for a {DEFAULT_LUT_SIZE}-texel LUT \
                 (driver maximum {max_3d_texture_size})"
            )));
        }

        Ok(Self {
            gl,
            max_3d_texture_size,
        })
    }

    /// Returns a reference to the underlying `glow::Context`.
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    /// Consumes this wrapper and returns the underlying `glow::Context`.
    pub fn into_gl(self) -> glow::Context {
        self.gl
    }

    /// The driver's maximum 3D texture side length, bounding the largest
    /// usable LUT.
    pub fn max_3d_texture_size(&self) -> i32 {
        self.max_3d_texture_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // GpuContext requires a live GL context, so behavioral tests are ignored.

    #[test]
    fn gpu_context_exposes_expected_api() {
        // Compile-time check that the public API exists.
        fn _assert_api(ctx: &GpuContext) {
            let _gl: &glow::Context = ctx.gl();
            let _max: i32 = ctx.max_3d_texture_size();
        }
    }

    #[test]
    #[ignore = "requires GL context"]
    fn new_succeeds_on_a_gl3_class_context() {
        // Would test: GpuContext::new(gl) returns Ok on any desktop GL 3.3
        // or WebGL2 context (minimum MAX_3D_TEXTURE_SIZE is 256 there).
    }

    #[test]
    #[ignore = "requires GL context"]
    fn max_3d_texture_size_is_at_least_default_lut() {
        // Would test: the stored capability is >= DEFAULT_LUT_SIZE.
    }
}
