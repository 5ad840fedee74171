//! This module contains the core components for the OpenGL layer,
//! including application setup, the graphics API surface, shader management and meshes.

pub mod app;
pub mod gpu;
pub mod mesh;
pub mod shader;

pub use app::*;
pub use gpu::*;
pub use mesh::*;
pub use shader::*;
