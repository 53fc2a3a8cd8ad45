//! The two-pass grading pipeline: scene pass into the offscreen target,
//! composite pass into the surface.
//!
//! One [`GradingPipeline`] owns everything with GPU lifetime tied to the
//! program contract -- both passes and the offscreen target. Per-frame
//! inputs (base texture, selected LUT, scene transform) are explicit
//! arguments: the pipeline holds no notion of a "current" LUT, that state
//! belongs to whichever component manages user selection.

use crate::error::PipelineError;
use crate::geometry::Shape;
use crate::transform::SceneTransform;

use super::composite::CompositePass;
use super::scene::ScenePass;
use super::target::OffscreenTarget;

/// The complete two-pass pipeline for one display surface.
pub struct GradingPipeline {
    scene: ScenePass,
    composite: CompositePass,
    target: OffscreenTarget,
}

impl GradingPipeline {
    /// Builds both program pairs, uploads `shape` and the fullscreen quad,
    /// and creates an offscreen target sized to the surface.
    ///
    /// # Errors
    ///
    /// Any of the startup-fatal conditions: shader compile/link failure,
    /// unresolved program contract, framebuffer incompleteness, zero
    /// dimensions, or GPU object-creation failure. Partially built passes
    /// are destroyed before the error propagates.
    pub fn new(
        gl: &glow::Context,
        shape: &dyn Shape,
        width: u32,
        height: u32,
    ) -> Result<Self, PipelineError> {
        let scene = ScenePass::new(gl, shape)?;

        let composite = match CompositePass::new(gl) {
            Ok(c) => c,
            Err(e) => {
                scene.destroy(gl);
                return Err(e);
            }
        };

        let target = match OffscreenTarget::new(gl, width, height) {
            Ok(t) => t,
            Err(e) => {
                composite.destroy(gl);
                scene.destroy(gl);
                return Err(e);
            }
        };

        Ok(Self {
            scene,
            composite,
            target,
        })
    }

    /// Renders one frame: scene pass into the offscreen target, then the
    /// grading pass into the default framebuffer.
    ///
    /// The scene pass is submitted before the composite pass because the
    /// compositor samples the texture the scene pass just wrote; ordering
    /// within the single command stream is what makes that read safe.
    /// `base_texture` may still hold placeholder content -- that is not an
    /// error, the frame simply shows the placeholder.
    pub fn render_frame(
        &self,
        gl: &glow::Context,
        base_texture: glow::Texture,
        lut_texture: glow::Texture,
        transform: &SceneTransform,
    ) {
        self.target.bind(gl);
        self.scene.draw(
            gl,
            base_texture,
            transform,
            self.target.width(),
            self.target.height(),
        );
        self.composite.draw(
            gl,
            self.target.color_texture(),
            lut_texture,
            self.target.width(),
            self.target.height(),
        );
    }

    /// Recreates the offscreen target for a new surface size.
    ///
    /// The replacement is created before the old target is destroyed, so a
    /// failed resize leaves the pipeline rendering at the previous size.
    /// GPU texture/renderbuffer storage is immutable after allocation,
    /// which is why this is a wholesale recreation rather than a mutation.
    ///
    /// # Errors
    ///
    /// Same conditions as [`OffscreenTarget::new`].
    pub fn resize(
        &mut self,
        gl: &glow::Context,
        width: u32,
        height: u32,
    ) -> Result<(), PipelineError> {
        let fresh = OffscreenTarget::new(gl, width, height)?;
        self.target.destroy(gl);
        self.target = fresh;
        Ok(())
    }

    /// Current surface width in pixels.
    pub fn width(&self) -> u32 {
        self.target.width()
    }

    /// Current surface height in pixels.
    pub fn height(&self) -> u32 {
        self.target.height()
    }

    /// Releases every GPU resource the pipeline owns.
    pub fn destroy(&self, gl: &glow::Context) {
        self.target.destroy(gl);
        self.composite.destroy(gl);
        self.scene.destroy(gl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_exposes_expected_api() {
        // Compile-time check that the public surface exists.
        fn _assert_api(p: &GradingPipeline, gl: &glow::Context) {
            let _w: u32 = p.width();
            let _h: u32 = p.height();
            p.destroy(gl);
        }
    }

    #[test]
    #[ignore = "requires GL context"]
    fn identity_graded_center_pixel_matches_base_texture() {
        // Would test: unit cube at (0,0,-6), zero rotation, 640x480,
        // identity LUT (S=16). The graded pixel at the image center equals
        // the base texture sampled at the front face's (0.5, 0.5) within
        // +-1/15 per channel.
    }

    #[test]
    #[ignore = "requires GL context"]
    fn resize_recreates_target_at_exact_new_dimensions() {
        // Would test: resize 640x480 -> 1280x720 yields a color texture of
        // exactly 1280x720 and the old framebuffer name is no longer bound.
    }

    #[test]
    #[ignore = "requires GL context"]
    fn failed_resize_keeps_previous_target_usable() {
        // Would test: a resize to 0x0 fails and render_frame still draws at
        // the old dimensions.
    }
}
