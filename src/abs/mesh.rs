//! Mesh management module.
//!
//! This module defines the [`PositionMesh`] struct, a vertex buffer plus the vertex array
//! that feeds it into a single 2D position attribute.

use std::sync::Arc;

use crate::abs::{Gpu, ShaderProgram};

/// Number of vertices in a rectangle drawn as two triangles.
pub const RECTANGLE_VERTEX_COUNT: i32 = 6;

/// Returns the two triangles covering the rectangle spanned by `(x1, y1)` and `(x2, y2)`.
pub fn rectangle_vertices(x1: f32, y1: f32, x2: f32, y2: f32) -> [f32; 12] {
    [
        x1, y1, //
        x2, y1, //
        x1, y2, //
        x1, y2, //
        x2, y1, //
        x2, y2,
    ]
}

/// Represents a dynamic vertex buffer bound to one attribute of a shader program.
///
/// The buffer and the vertex array are created and released together.
pub struct PositionMesh<G: Gpu> {
    gl: Arc<G>,
    vao: G::VertexArray,
    vbo: G::Buffer,
}

impl<G: Gpu> PositionMesh<G> {
    /// Creates a buffer and a vertex array feeding `attribute` with `size` floats per vertex.
    pub fn new(
        gl: &Arc<G>,
        program: &ShaderProgram<G>,
        attribute: &str,
        size: i32,
    ) -> Result<Self, String> {
        let location = gl
            .attrib_location(program.id(), attribute)
            .ok_or_else(|| format!("attribute `{attribute}` not found in program"))?;

        let vbo = gl.create_buffer()?;
        let vao = match gl.create_vertex_array() {
            Ok(vao) => vao,
            Err(e) => {
                gl.delete_buffer(vbo);
                return Err(e);
            }
        };

        gl.bind_vertex_array(Some(vao));
        gl.enable_vertex_attrib_array(location);
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.vertex_attrib_pointer_f32(location, size, 0, 0);

        gl.bind_vertex_array(None);
        gl.bind_buffer(glow::ARRAY_BUFFER, None);

        Ok(Self {
            gl: Arc::clone(gl),
            vao,
            vbo,
        })
    }

    /// Replaces the buffer contents with a rectangle spanning the two corners.
    pub fn set_rectangle(&self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vbo));
        self.gl.buffer_data_f32(
            glow::ARRAY_BUFFER,
            &rectangle_vertices(x1, y1, x2, y2),
            glow::STATIC_DRAW,
        );
    }

    /// Binds the vertex array.
    pub fn bind(&self) {
        self.gl.bind_vertex_array(Some(self.vao));
    }

    pub fn buffer(&self) -> G::Buffer {
        self.vbo
    }

    pub fn vertex_array(&self) -> G::VertexArray {
        self.vao
    }
}

impl<G: Gpu> Drop for PositionMesh<G> {
    fn drop(&mut self) {
        self.gl.delete_buffer(self.vbo);
        self.gl.delete_vertex_array(self.vao);
    }
}
