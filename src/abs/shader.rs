//! OpenGL Shaders
//!
//! This module defines the [`Shader`] and [`ShaderProgram`] structs for managing OpenGL shaders.
//! This module also provides the [`Uniform`] trait for setting uniform variables in shader
//! programs.

use std::sync::Arc;

use glam::Vec4;

use crate::abs::Gpu;

/// Represents an individual OpenGL shader.
pub struct Shader<G: Gpu> {
    gl: Arc<G>,
    id: G::Shader,
}

impl<G: Gpu> Shader<G> {
    /// Compiles a new shader from the given source code.
    pub fn new(gl: &Arc<G>, shader_type: u32, source: &str) -> Result<Self, String> {
        let shader = gl.create_shader(shader_type)?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if !gl.shader_compile_status(shader) {
            let log = gl.shader_info_log(shader);
            gl.delete_shader(shader);
            return Err(log);
        }

        Ok(Self {
            gl: Arc::clone(gl),
            id: shader,
        })
    }
}

impl<G: Gpu> Drop for Shader<G> {
    fn drop(&mut self) {
        self.gl.delete_shader(self.id);
    }
}

/// Represents a uniform variable in a shader program.
pub trait Uniform {
    /// Sets the value of the uniform variable in the given shader program.
    fn set_uniform<G: Gpu>(&self, gl: &G, program: G::Program, name: &str);
}

impl Uniform for Vec4 {
    fn set_uniform<G: Gpu>(&self, gl: &G, program: G::Program, name: &str) {
        if let Some(loc) = gl.uniform_location(program, name) {
            gl.uniform_4_f32(&loc, self.x, self.y, self.z, self.w);
        }
    }
}

/// Represents an OpenGL shader program composed of multiple shaders.
pub struct ShaderProgram<G: Gpu> {
    gl: Arc<G>,
    id: G::Program,
}

impl<G: Gpu> ShaderProgram<G> {
    /// Links a new shader program from the given shaders.
    pub fn new(gl: &Arc<G>, shaders: &[&Shader<G>]) -> Result<Self, String> {
        let program = gl.create_program()?;

        for shader in shaders {
            gl.attach_shader(program, shader.id);
        }

        gl.link_program(program);

        if !gl.program_link_status(program) {
            let log = gl.program_info_log(program);
            gl.delete_program(program);
            return Err(log);
        }

        for shader in shaders {
            gl.detach_shader(program, shader.id);
        }

        Ok(Self {
            gl: Arc::clone(gl),
            id: program,
        })
    }

    /// Compiles a vertex and fragment shader pair and links them.
    ///
    /// The intermediate shader objects are released once linking is done.
    pub fn from_sources(gl: &Arc<G>, vertex: &str, fragment: &str) -> Result<Self, String> {
        let vert = Shader::new(gl, glow::VERTEX_SHADER, vertex)
            .map_err(|log| format!("vertex shader: {log}"))?;
        let frag = Shader::new(gl, glow::FRAGMENT_SHADER, fragment)
            .map_err(|log| format!("fragment shader: {log}"))?;
        Self::new(gl, &[&vert, &frag])
    }

    /// Returns the underlying program handle.
    pub fn id(&self) -> G::Program {
        self.id
    }

    /// Binds the shader program for use.
    pub fn use_program(&self) {
        self.gl.use_program(Some(self.id));
    }

    /// Sets a uniform variable in the shader program.
    pub fn set_uniform<T: Uniform>(&self, name: &str, value: T) {
        value.set_uniform(&*self.gl, self.id, name);
    }
}

impl<G: Gpu> Drop for ShaderProgram<G> {
    fn drop(&mut self) {
        self.gl.delete_program(self.id);
    }
}
