//! Offscreen render target: FBO + color texture + depth renderbuffer.
//!
//! The scene pass draws into an [`OffscreenTarget`]; the grading pass then
//! samples its color texture. GPU storage is immutable after allocation,
//! so a target is never resized in place -- when the surface changes size,
//! the owner creates a fresh target and destroys the old one.

use crate::error::PipelineError;

use super::texture::create_scene_color;

/// An offscreen render destination: one framebuffer binding an RGBA8 color
/// texture and a DEPTH_COMPONENT16 renderbuffer of matching size.
///
/// Construction verifies framebuffer completeness; an incomplete
/// framebuffer is a fatal platform/driver condition with no recovery path.
/// Depth is always a renderbuffer -- the scene pass needs depth testing but
/// nothing ever samples the depth values.
pub struct OffscreenTarget {
    fbo: glow::Framebuffer,
    color: glow::Texture,
    depth: glow::Renderbuffer,
    width: u32,
    height: u32,
}

impl OffscreenTarget {
    /// Creates a target sized exactly to the display surface.
    ///
    /// # Errors
    ///
    /// `PipelineError::InvalidDimensions` for a zero-sized surface,
    /// `PipelineError::Gl` if an object cannot be created, or
    /// `PipelineError::FramebufferIncomplete` if the attachment combination
    /// is not renderable on this platform. All partially created objects
    /// are released on every failure path.
    #[allow(unsafe_code)]
    pub fn new(gl: &glow::Context, width: u32, height: u32) -> Result<Self, PipelineError> {
        use glow::HasContext;

        if width == 0 || height == 0 {
            return Err(PipelineError::InvalidDimensions(
                "offscreen target dimensions must be non-zero".into(),
            ));
        }

        let color = create_scene_color(gl, width, height)?;

        // SAFETY: glow wraps raw GL calls as unsafe. Every handle used below
        // was created above; all are deleted on each failure path.
        let depth = match unsafe { gl.create_renderbuffer() } {
            Ok(rb) => rb,
            Err(e) => {
                unsafe { gl.delete_texture(color) };
                return Err(PipelineError::Gl(e));
            }
        };

        unsafe {
            gl.bind_renderbuffer(glow::RENDERBUFFER, Some(depth));
            gl.renderbuffer_storage(
                glow::RENDERBUFFER,
                glow::DEPTH_COMPONENT16,
                width as i32,
                height as i32,
            );
            gl.bind_renderbuffer(glow::RENDERBUFFER, None);
        }

        let fbo = match unsafe { gl.create_framebuffer() } {
            Ok(f) => f,
            Err(e) => {
                unsafe {
                    gl.delete_renderbuffer(depth);
                    gl.delete_texture(color);
                }
                return Err(PipelineError::Gl(e));
            }
        };

        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(fbo));
            gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                Some(color),
                0,
            );
            gl.framebuffer_renderbuffer(
                glow::FRAMEBUFFER,
                glow::DEPTH_ATTACHMENT,
                glow::RENDERBUFFER,
                Some(depth),
            );

            let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);

            if status != glow::FRAMEBUFFER_COMPLETE {
                gl.delete_framebuffer(fbo);
                gl.delete_renderbuffer(depth);
                gl.delete_texture(color);
                return Err(PipelineError::FramebufferIncomplete { status });
            }
        }

        Ok(Self {
            fbo,
            color,
            depth,
            width,
            height,
        })
    }

    /// Binds this target's framebuffer as the active draw destination and
    /// sets the viewport to its dimensions.
    #[allow(unsafe_code)]
    pub fn bind(&self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: self.fbo is a valid framebuffer handle from new().
        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.fbo));
            gl.viewport(0, 0, self.width as i32, self.height as i32);
        }
    }

    /// The color texture the grading pass samples.
    pub fn color_texture(&self) -> glow::Texture {
        self.color
    }

    /// Target width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Target height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Deletes the framebuffer, color texture, and depth renderbuffer.
    ///
    /// Must be called before dropping for deterministic cleanup; GL objects
    /// have no destructor.
    #[allow(unsafe_code)]
    pub fn destroy(&self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: all three handles are valid objects from new().
        unsafe {
            gl.delete_framebuffer(self.fbo);
            gl.delete_renderbuffer(self.depth);
            gl.delete_texture(self.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // OffscreenTarget requires a live GL context, so behavioral tests are
    // ignored. Run with `cargo test --features render -- --ignored` under a
    // headless EGL/osmesa setup.

    #[test]
    fn offscreen_target_exposes_expected_api() {
        // Compile-time check that the public surface exists.
        fn _assert_api(t: &OffscreenTarget) {
            let _tex: glow::Texture = t.color_texture();
            let _w: u32 = t.width();
            let _h: u32 = t.height();
        }
    }

    #[test]
    #[ignore = "requires GL context"]
    fn new_produces_a_complete_framebuffer() {
        // Would test: OffscreenTarget::new(gl, 640, 480) succeeds and
        // check_framebuffer_status reports FRAMEBUFFER_COMPLETE when bound.
    }

    #[test]
    #[ignore = "requires GL context"]
    fn color_texture_matches_surface_dimensions() {
        // Would test: texture level-0 width/height equal the constructor
        // arguments exactly.
    }

    #[test]
    #[ignore = "requires GL context"]
    fn destroy_releases_all_three_objects() {
        // Would test: after destroy(), fbo/texture/renderbuffer are
        // no longer valid names.
    }
}
