//! GPU buffer upload for [`Shape`] geometry.
//!
//! [`MeshBuffers::upload`] pushes a shape's positions, texture coordinates,
//! and indices into GPU buffers and wires them to the named vertex
//! attributes of a program, capturing the configuration in a vertex array
//! object. The wiring is per program -- switching to a program with
//! different attribute bindings requires a fresh upload (or a cached
//! `MeshBuffers` per program).

use crate::error::PipelineError;
use crate::geometry::Shape;

use super::shader::ShaderProgram;

/// Flattens `[f32]` data into the byte layout GL buffer uploads expect.
pub(super) fn f32_bytes(data: &[f32]) -> Vec<u8> {
    data.iter().flat_map(|v| v.to_ne_bytes()).collect()
}

/// Flattens `[u16]` index data into bytes for an element buffer upload.
pub(super) fn u16_bytes(data: &[u16]) -> Vec<u8> {
    data.iter().flat_map(|v| v.to_ne_bytes()).collect()
}

/// GPU-side geometry: a vertex array object owning position, texture
/// coordinate, and index buffers for one shape wired to one program.
pub struct MeshBuffers {
    vao: glow::VertexArray,
    position_buffer: glow::Buffer,
    tex_coord_buffer: glow::Buffer,
    index_buffer: glow::Buffer,
    index_count: i32,
}

impl MeshBuffers {
    /// Uploads `shape` and wires its attributes to `program` by name.
    ///
    /// # Errors
    ///
    /// `PipelineError::Shader` if either attribute name does not resolve on
    /// the program (a configuration fault -- mismatched shader source), or
    /// `PipelineError::Gl` if a GPU object cannot be created.
    #[allow(unsafe_code)]
    pub fn upload(
        gl: &glow::Context,
        shape: &dyn Shape,
        program: &ShaderProgram,
        position_attr: &str,
        tex_coord_attr: &str,
    ) -> Result<Self, PipelineError> {
        use glow::HasContext;

        // Resolve the program contract before allocating anything.
        let position_loc = program.attribute(gl, position_attr)?;
        let tex_coord_loc = program.attribute(gl, tex_coord_attr)?;

        let positions = f32_bytes(&shape.positions().concat());
        let tex_coords = f32_bytes(&shape.tex_coords().concat());
        let indices = u16_bytes(shape.indices());
        let index_count = shape.vertex_count() as i32;

        // SAFETY: glow wraps raw GL calls as unsafe. All handles below are
        // freshly created; on any creation failure the already-created
        // objects are deleted before returning.
        let vao = unsafe { gl.create_vertex_array().map_err(PipelineError::Gl)? };

        let mut created: Vec<glow::Buffer> = Vec::with_capacity(3);
        for _ in 0..3 {
            match unsafe { gl.create_buffer() } {
                Ok(b) => created.push(b),
                Err(e) => {
                    unsafe {
                        for b in created {
                            gl.delete_buffer(b);
                        }
                        gl.delete_vertex_array(vao);
                    }
                    return Err(PipelineError::Gl(e));
                }
            }
        }
        let (position_buffer, tex_coord_buffer, index_buffer) =
            (created[0], created[1], created[2]);

        unsafe {
            gl.bind_vertex_array(Some(vao));

            gl.bind_buffer(glow::ARRAY_BUFFER, Some(position_buffer));
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, &positions, glow::STATIC_DRAW);
            gl.enable_vertex_attrib_array(position_loc);
            gl.vertex_attrib_pointer_f32(position_loc, 3, glow::FLOAT, false, 0, 0);

            gl.bind_buffer(glow::ARRAY_BUFFER, Some(tex_coord_buffer));
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, &tex_coords, glow::STATIC_DRAW);
            gl.enable_vertex_attrib_array(tex_coord_loc);
            gl.vertex_attrib_pointer_f32(tex_coord_loc, 2, glow::FLOAT, false, 0, 0);

            // The element buffer binding is captured by the VAO.
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(index_buffer));
            gl.buffer_data_u8_slice(glow::ELEMENT_ARRAY_BUFFER, &indices, glow::STATIC_DRAW);

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
        }

        Ok(Self {
            vao,
            position_buffer,
            tex_coord_buffer,
            index_buffer,
            index_count,
        })
    }

    /// Binds the vertex array for an indexed draw.
    #[allow(unsafe_code)]
    pub fn bind(&self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: self.vao is a valid vertex array from upload().
        unsafe { gl.bind_vertex_array(Some(self.vao)) };
    }

    /// Number of indices to submit to the draw call.
    pub fn index_count(&self) -> i32 {
        self.index_count
    }

    /// Deletes the vertex array and all three buffers.
    #[allow(unsafe_code)]
    pub fn destroy(&self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: all handles are valid objects from upload().
        unsafe {
            gl.delete_vertex_array(self.vao);
            gl.delete_buffer(self.position_buffer);
            gl.delete_buffer(self.tex_coord_buffer);
            gl.delete_buffer(self.index_buffer);
        }
    }
}
