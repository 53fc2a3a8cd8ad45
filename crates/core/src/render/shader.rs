//! Shader compilation, linking, and program-contract resolution.
//!
//! [`ShaderProgram::compile`] builds a vertex+fragment stage pair into a
//! linked program. Both passes of the pipeline share the same contract
//! style: attributes and uniforms are resolved **by name** after linking,
//! and a name that does not resolve is a programmer/configuration error
//! (mismatched shader source), reported as a distinct variant rather than
//! drawn through.

use thiserror::Error;

/// Errors that can occur while building or interrogating a shader program.
#[derive(Debug, Clone, Error)]
pub enum ShaderError {
    /// A shader stage failed to compile.
    #[error("shader compile error ({stage}):\n{log}")]
    CompileError {
        /// The shader stage that failed (e.g. "vertex", "fragment").
        stage: String,
        /// The driver's info log, prefixed with numbered source lines.
        log: String,
    },
    /// A program failed to link.
    #[error("shader link error:\n{0}")]
    LinkError(String),
    /// A named vertex attribute was not found on the linked program.
    #[error("attribute not found on program: {0}")]
    MissingAttribute(String),
    /// A named uniform was not found on the linked program.
    #[error("uniform not found on program: {0}")]
    MissingUniform(String),
}

/// Formats a shader compilation error for human-readable debugging.
///
/// Prepends right-aligned line numbers to each line of `source`, then
/// appends the driver's error `log`, so messages that reference line
/// numbers can be correlated with the actual GLSL.
pub fn format_shader_error(source: &str, log: &str) -> String {
    let source_lines: Vec<&str> = if source.is_empty() {
        Vec::new()
    } else {
        source.lines().collect()
    };

    let line_count = source_lines.len();
    let width = if line_count == 0 {
        1
    } else {
        line_count.to_string().len()
    };

    let numbered: String = source_lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>width$}: {line}", i + 1, width = width))
        .collect::<Vec<_>>()
        .join("\n");

    match (numbered.is_empty(), log.is_empty()) {
        (true, true) => String::new(),
        (true, false) => log.to_string(),
        (false, true) => numbered,
        (false, false) => format!("{numbered}\n\n{log}"),
    }
}

/// Compiles a single shader stage.
///
/// # Errors
///
/// Returns `ShaderError::CompileError` with the formatted driver log if the
/// GLSL source fails to compile. The failed shader object is deleted before
/// returning, so no GPU handle leaks.
#[allow(unsafe_code)]
fn compile_stage(
    gl: &glow::Context,
    shader_type: u32,
    source: &str,
) -> Result<glow::Shader, ShaderError> {
    use glow::HasContext;

    let stage_name = match shader_type {
        glow::VERTEX_SHADER => "vertex",
        glow::FRAGMENT_SHADER => "fragment",
        _ => "unknown",
    };

    // SAFETY: glow wraps raw GL calls as unsafe. We pass valid shader_type
    // constants and valid source strings, and delete the shader on every
    // failure path.
    let shader = unsafe {
        gl.create_shader(shader_type)
            .map_err(|e| ShaderError::CompileError {
                stage: stage_name.to_string(),
                log: e,
            })?
    };

    unsafe {
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
    }

    let compiled = unsafe { gl.get_shader_compile_status(shader) };

    if compiled {
        Ok(shader)
    } else {
        let info_log = unsafe { gl.get_shader_info_log(shader) };
        unsafe { gl.delete_shader(shader) };
        Err(ShaderError::CompileError {
            stage: stage_name.to_string(),
            log: format_shader_error(source, &info_log),
        })
    }
}

/// A linked GPU program together with by-name attribute/uniform resolution.
///
/// Obtained only through [`ShaderProgram::compile`]; a compilation or link
/// failure never produces a handle, so holding a `ShaderProgram` implies a
/// fully built program.
pub struct ShaderProgram {
    program: glow::Program,
}

impl ShaderProgram {
    /// Compiles both stages and links them into a program.
    ///
    /// The stages are compiled independently; if either fails, the error
    /// carries that stage's diagnostic log and any already-compiled stage
    /// is released. Link failure is reported separately with the program
    /// log. Stage objects are deleted after linking -- the program retains
    /// its own copies.
    ///
    /// # Errors
    ///
    /// `ShaderError::CompileError` or `ShaderError::LinkError`.
    #[allow(unsafe_code)]
    pub fn compile(
        gl: &glow::Context,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<Self, ShaderError> {
        use glow::HasContext;

        let vert = compile_stage(gl, glow::VERTEX_SHADER, vertex_src)?;
        let frag = match compile_stage(gl, glow::FRAGMENT_SHADER, fragment_src) {
            Ok(f) => f,
            Err(e) => {
                // SAFETY: vert is a valid shader handle from a successful
                // compile_stage call.
                unsafe { gl.delete_shader(vert) };
                return Err(e);
            }
        };

        // SAFETY: glow wraps raw GL calls as unsafe. We pass valid shader
        // handles obtained above and clean up every object on error.
        let program = unsafe {
            match gl.create_program() {
                Ok(p) => p,
                Err(e) => {
                    gl.delete_shader(vert);
                    gl.delete_shader(frag);
                    return Err(ShaderError::LinkError(e));
                }
            }
        };

        unsafe {
            gl.attach_shader(program, vert);
            gl.attach_shader(program, frag);
            gl.link_program(program);

            // Detach and delete regardless of link outcome -- the program
            // owns its own copies of the stages.
            gl.detach_shader(program, vert);
            gl.detach_shader(program, frag);
            gl.delete_shader(vert);
            gl.delete_shader(frag);
        }

        let linked = unsafe { gl.get_program_link_status(program) };

        if linked {
            Ok(Self { program })
        } else {
            let info_log = unsafe { gl.get_program_info_log(program) };
            unsafe { gl.delete_program(program) };
            Err(ShaderError::LinkError(info_log))
        }
    }

    /// Makes this program current on the context.
    #[allow(unsafe_code)]
    pub fn bind(&self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: self.program is a valid linked program from compile().
        unsafe { gl.use_program(Some(self.program)) };
    }

    /// Resolves a named vertex attribute to its bound location.
    ///
    /// # Errors
    ///
    /// `ShaderError::MissingAttribute` if the name is not an active
    /// attribute of this program -- a configuration fault, not a runtime
    /// condition.
    #[allow(unsafe_code)]
    pub fn attribute(&self, gl: &glow::Context, name: &str) -> Result<u32, ShaderError> {
        use glow::HasContext;

        // SAFETY: self.program is a valid linked program.
        unsafe { gl.get_attrib_location(self.program, name) }
            .ok_or_else(|| ShaderError::MissingAttribute(name.to_string()))
    }

    /// Resolves a named uniform to its location.
    ///
    /// # Errors
    ///
    /// `ShaderError::MissingUniform` if the name is not an active uniform
    /// of this program.
    #[allow(unsafe_code)]
    pub fn uniform(
        &self,
        gl: &glow::Context,
        name: &str,
    ) -> Result<glow::UniformLocation, ShaderError> {
        use glow::HasContext;

        // SAFETY: self.program is a valid linked program.
        unsafe { gl.get_uniform_location(self.program, name) }
            .ok_or_else(|| ShaderError::MissingUniform(name.to_string()))
    }

    /// The raw program handle.
    pub fn program(&self) -> glow::Program {
        self.program
    }

    /// Deletes the program, releasing the GPU resource.
    ///
    /// GL objects have no destructor; call this for deterministic cleanup.
    #[allow(unsafe_code)]
    pub fn destroy(&self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: self.program is a valid program handle from compile().
        unsafe { gl.delete_program(self.program) };
    }
}
