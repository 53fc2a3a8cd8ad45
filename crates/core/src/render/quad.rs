//! Static fullscreen quad for the grading pass.
//!
//! Two triangles spanning normalized device coordinates [-1, 1]², built
//! once and reused every frame. The composite vertex stage derives its UV
//! from the 2-component position, so this is the only attribute the quad
//! carries.

use crate::error::PipelineError;

use super::mesh::f32_bytes;
use super::shader::ShaderProgram;

/// Vertices submitted per fullscreen draw.
pub const QUAD_VERTEX_COUNT: i32 = 6;

/// Two CCW triangles covering the whole of NDC.
const QUAD_POSITIONS: [f32; 12] = [
    -1.0, -1.0, 1.0, -1.0, 1.0, 1.0, // lower-right triangle
    -1.0, -1.0, 1.0, 1.0, -1.0, 1.0, // upper-left triangle
];

/// The fullscreen quad's GPU-side state: a vertex array owning one static
/// position buffer, wired to the composite program's position attribute.
pub struct FullscreenQuad {
    vao: glow::VertexArray,
    buffer: glow::Buffer,
}

impl FullscreenQuad {
    /// Uploads the quad and wires its position attribute on `program`.
    ///
    /// # Errors
    ///
    /// `PipelineError::Shader` if `position_attr` does not resolve, or
    /// `PipelineError::Gl` on object-creation failure.
    #[allow(unsafe_code)]
    pub fn new(
        gl: &glow::Context,
        program: &ShaderProgram,
        position_attr: &str,
    ) -> Result<Self, PipelineError> {
        use glow::HasContext;

        let position_loc = program.attribute(gl, position_attr)?;
        let bytes = f32_bytes(&QUAD_POSITIONS);

        // SAFETY: glow wraps raw GL calls as unsafe. Objects are created
        // fresh and deleted on the failure path.
        let vao = unsafe { gl.create_vertex_array().map_err(PipelineError::Gl)? };
        let buffer = match unsafe { gl.create_buffer() } {
            Ok(b) => b,
            Err(e) => {
                unsafe { gl.delete_vertex_array(vao) };
                return Err(PipelineError::Gl(e));
            }
        };

        unsafe {
            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, &bytes, glow::STATIC_DRAW);
            gl.enable_vertex_attrib_array(position_loc);
            gl.vertex_attrib_pointer_f32(position_loc, 2, glow::FLOAT, false, 0, 0);
            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }

        Ok(Self { vao, buffer })
    }

    /// Binds the quad's vertex array for a 6-vertex triangle draw.
    #[allow(unsafe_code)]
    pub fn bind(&self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: self.vao is a valid vertex array from new().
        unsafe { gl.bind_vertex_array(Some(self.vao)) };
    }

    /// Deletes the vertex array and position buffer.
    #[allow(unsafe_code)]
    pub fn destroy(&self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: both handles are valid objects from new().
        unsafe {
            gl.delete_vertex_array(self.vao);
            gl.delete_buffer(self.buffer);
        }
    }
}
