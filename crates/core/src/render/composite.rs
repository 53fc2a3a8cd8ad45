//! Grading pass: fullscreen quad through the 3D LUT into the surface.
//!
//! Always renders to the default framebuffer -- this pass *is* the
//! presentation step. The fragment stage queries the LUT's side length from
//! the texture itself and applies the half-texel remap
//! `coord = (c * (S - 1) + 0.5) / S` before the nearest-filtered sample.
//! Sampling at `c` directly would read one texel short of the final slice
//! for values near 1.0 and band visibly; the remap maps the unit cube onto
//! texel centers exactly at every grid point.

use crate::error::PipelineError;

use super::quad::{FullscreenQuad, QUAD_VERTEX_COUNT};
use super::shader::ShaderProgram;

/// Vertex stage of the composite program.
///
/// Contract: attribute `position` (2 components, NDC); the UV is derived
/// from it, so the quad carries no second attribute.
pub const COMPOSITE_VERTEX_SHADER: &str = r#"#version 300 es
in vec2 position;
out vec2 v_uv;
void main() {
    v_uv = position * 0.5 + 0.5;
    gl_Position = vec4(position, 0.0, 1.0);
}
"#;

/// Fragment stage of the composite program.
///
/// Contract: uniforms `sceneSampler` (unit 0) and `lutSampler` (unit 1).
/// The LUT side length comes from `textureSize`, never a hardcoded
/// constant, so any cubic LUT resolution works unchanged.
pub const COMPOSITE_FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;
precision mediump sampler3D;
in vec2 v_uv;
uniform sampler2D sceneSampler;
uniform sampler3D lutSampler;
out vec4 fragColor;
void main() {
    vec4 scene = texture(sceneSampler, v_uv);
    float size = float(textureSize(lutSampler, 0).x);
    vec3 coord = (scene.rgb * (size - 1.0) + 0.5) / size;
    fragColor = vec4(texture(lutSampler, coord).rgb, scene.a);
}
"#;

/// The grading pass: program, static quad, and resolved sampler uniforms.
pub struct CompositePass {
    program: ShaderProgram,
    quad: FullscreenQuad,
    scene_sampler_uniform: glow::UniformLocation,
    lut_sampler_uniform: glow::UniformLocation,
}

impl CompositePass {
    /// Compiles the composite program, uploads the quad, and resolves both
    /// sampler uniforms.
    ///
    /// # Errors
    ///
    /// `PipelineError::Shader` for compile/link failures or unresolved
    /// names, `PipelineError::Gl` for object-creation failures.
    pub fn new(gl: &glow::Context) -> Result<Self, PipelineError> {
        let program =
            ShaderProgram::compile(gl, COMPOSITE_VERTEX_SHADER, COMPOSITE_FRAGMENT_SHADER)?;

        let quad = match FullscreenQuad::new(gl, &program, "position") {
            Ok(q) => q,
            Err(e) => {
                program.destroy(gl);
                return Err(e);
            }
        };

        let uniforms = (|| {
            Ok::<_, super::shader::ShaderError>((
                program.uniform(gl, "sceneSampler")?,
                program.uniform(gl, "lutSampler")?,
            ))
        })();
        let (scene_sampler_uniform, lut_sampler_uniform) = match uniforms {
            Ok(u) => u,
            Err(e) => {
                quad.destroy(gl);
                program.destroy(gl);
                return Err(e.into());
            }
        };

        Ok(Self {
            program,
            quad,
            scene_sampler_uniform,
            lut_sampler_uniform,
        })
    }

    /// Grades `scene_texture` through `lut_texture` into the default
    /// framebuffer.
    ///
    /// Clears color and depth of the destination, binds the scene color to
    /// unit 0 and the LUT volume to unit 1, and draws the 6-vertex quad.
    /// `width`/`height` are the surface dimensions for the viewport.
    #[allow(unsafe_code)]
    pub fn draw(
        &self,
        gl: &glow::Context,
        scene_texture: glow::Texture,
        lut_texture: glow::Texture,
        width: u32,
        height: u32,
    ) {
        use glow::HasContext;

        // SAFETY: handles are owned by this pass or supplied live by the
        // caller; binding None selects the default framebuffer.
        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            gl.viewport(0, 0, width as i32, height as i32);
            gl.clear_color(0.0, 0.0, 0.0, 1.0);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }

        self.program.bind(gl);
        self.quad.bind(gl);

        unsafe {
            gl.active_texture(glow::TEXTURE0);
            gl.bind_texture(glow::TEXTURE_2D, Some(scene_texture));
            gl.uniform_1_i32(Some(&self.scene_sampler_uniform), 0);

            gl.active_texture(glow::TEXTURE1);
            gl.bind_texture(glow::TEXTURE_3D, Some(lut_texture));
            gl.uniform_1_i32(Some(&self.lut_sampler_uniform), 1);

            gl.draw_arrays(glow::TRIANGLES, 0, QUAD_VERTEX_COUNT);
            gl.bind_vertex_array(None);
        }
    }

    /// Deletes the program and quad buffers.
    pub fn destroy(&self, gl: &glow::Context) {
        self.quad.destroy(gl);
        self.program.destroy(gl);
    }
}
