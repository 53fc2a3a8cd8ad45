//! Scene pass: textured geometry into whatever framebuffer is bound.
//!
//! The pass draws into the *currently bound* framebuffer on purpose -- the
//! frame loop binds the offscreen target first, and the same pass would
//! render directly to the surface if grading were bypassed.

use crate::error::PipelineError;
use crate::geometry::Shape;
use crate::transform::{projection, SceneTransform};

use super::mesh::MeshBuffers;
use super::shader::ShaderProgram;

/// Vertex stage of the scene program.
///
/// Contract: attributes `position`, `texCoord`; uniforms
/// `modelViewMatrix`, `projectionMatrix`.
pub const SCENE_VERTEX_SHADER: &str = r#"#version 300 es
in vec3 position;
in vec2 texCoord;
uniform mat4 modelViewMatrix;
uniform mat4 projectionMatrix;
out vec2 v_texCoord;
void main() {
    v_texCoord = texCoord;
    gl_Position = projectionMatrix * modelViewMatrix * vec4(position, 1.0);
}
"#;

/// Fragment stage of the scene program.
///
/// Contract: uniform `baseSampler` on texture unit 0.
pub const SCENE_FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;
in vec2 v_texCoord;
uniform sampler2D baseSampler;
out vec4 fragColor;
void main() {
    fragColor = texture(baseSampler, v_texCoord);
}
"#;

/// The scene pass: program, uploaded geometry, and resolved uniform
/// locations, built once and reused every frame.
pub struct ScenePass {
    program: ShaderProgram,
    mesh: MeshBuffers,
    model_view_uniform: glow::UniformLocation,
    projection_uniform: glow::UniformLocation,
    base_sampler_uniform: glow::UniformLocation,
}

impl ScenePass {
    /// Compiles the scene program, uploads `shape`, and resolves the full
    /// uniform contract up front so a source mismatch surfaces here rather
    /// than mid-frame.
    ///
    /// # Errors
    ///
    /// `PipelineError::Shader` for compile/link failures or unresolved
    /// names, `PipelineError::Gl` for object-creation failures.
    pub fn new(gl: &glow::Context, shape: &dyn Shape) -> Result<Self, PipelineError> {
        let program = ShaderProgram::compile(gl, SCENE_VERTEX_SHADER, SCENE_FRAGMENT_SHADER)?;

        let mesh = match MeshBuffers::upload(gl, shape, &program, "position", "texCoord") {
            Ok(m) => m,
            Err(e) => {
                program.destroy(gl);
                return Err(e);
            }
        };

        let uniforms = (|| {
            Ok::<_, super::shader::ShaderError>((
                program.uniform(gl, "modelViewMatrix")?,
                program.uniform(gl, "projectionMatrix")?,
                program.uniform(gl, "baseSampler")?,
            ))
        })();
        let (model_view_uniform, projection_uniform, base_sampler_uniform) = match uniforms {
            Ok(u) => u,
            Err(e) => {
                mesh.destroy(gl);
                program.destroy(gl);
                return Err(e.into());
            }
        };

        Ok(Self {
            program,
            mesh,
            model_view_uniform,
            projection_uniform,
            base_sampler_uniform,
        })
    }

    /// Renders the shape with `base_texture` and `transform` into the
    /// currently bound framebuffer.
    ///
    /// Enables LEQUAL depth testing, clears color and depth, binds the base
    /// texture to unit 0, sets both matrix uniforms, and issues one indexed
    /// triangle-list draw. `width`/`height` are the bound framebuffer's
    /// dimensions and drive the projection aspect ratio.
    #[allow(unsafe_code)]
    pub fn draw(
        &self,
        gl: &glow::Context,
        base_texture: glow::Texture,
        transform: &SceneTransform,
        width: u32,
        height: u32,
    ) {
        use glow::HasContext;

        // SAFETY: all handles were created by this pass's constructor and
        // the caller-supplied texture is a live handle by contract.
        unsafe {
            gl.enable(glow::DEPTH_TEST);
            gl.depth_func(glow::LEQUAL);
            gl.clear_color(0.0, 0.0, 0.0, 1.0);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }

        self.program.bind(gl);
        self.mesh.bind(gl);

        unsafe {
            gl.active_texture(glow::TEXTURE0);
            gl.bind_texture(glow::TEXTURE_2D, Some(base_texture));
            gl.uniform_1_i32(Some(&self.base_sampler_uniform), 0);

            gl.uniform_matrix_4_f32_slice(
                Some(&self.model_view_uniform),
                false,
                &transform.model_view().to_cols_array(),
            );
            gl.uniform_matrix_4_f32_slice(
                Some(&self.projection_uniform),
                false,
                &projection(width, height).to_cols_array(),
            );

            gl.draw_elements(
                glow::TRIANGLES,
                self.mesh.index_count(),
                glow::UNSIGNED_SHORT,
                0,
            );
            gl.bind_vertex_array(None);
        }
    }

    /// Deletes the program and geometry buffers.
    pub fn destroy(&self, gl: &glow::Context) {
        self.mesh.destroy(gl);
        self.program.destroy(gl);
    }
}
