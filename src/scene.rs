//! The rectangle scene.
//!
//! On every resize the scene adjusts the canvas and viewport, then draws
//! [`RECTANGLE_COUNT`] rectangles with random extents and colors.

use std::sync::Arc;

use glam::{Vec2, Vec4};
use rand::Rng;

use crate::{
    abs::{Gpu, PositionMesh, RECTANGLE_VERTEX_COUNT, ShaderProgram},
    display::{Canvas, ResizeContext},
    error::SceneError,
};

const VERTEX_SHADER: &str = include_str!("shaders/default/vert.glsl");
const FRAGMENT_SHADER: &str = include_str!("shaders/default/frag.glsl");

/// Name of the vertex attribute receiving rectangle positions.
pub const POSITION_ATTRIBUTE: &str = "a_position";
/// Name of the uniform receiving the rectangle color.
pub const COLOR_UNIFORM: &str = "u_color";
/// Rectangles drawn per render pass.
pub const RECTANGLE_COUNT: usize = 2;

/// GPU objects owned by a live scene.
struct SceneResources<G: Gpu> {
    program: ShaderProgram<G>,
    mesh: PositionMesh<G>,
}

enum SceneState<G: Gpu> {
    Ready(SceneResources<G>),
    Destroyed,
}

/// Picks the far corner of a rectangle anchored at the origin, in `[-1, 1)` on both axes.
pub fn random_corner<R: Rng>(rng: &mut R) -> Vec2 {
    let x = (rng.random::<f32>() - 0.5) * 2.0;
    let y = (rng.random::<f32>() - 0.5) * 2.0;
    Vec2::new(x, y)
}

/// Picks an opaque color with each channel in `[0, 1)`.
pub fn random_color<R: Rng>(rng: &mut R) -> Vec4 {
    Vec4::new(rng.random(), rng.random(), rng.random(), 1.0)
}

/// Owns the shader program and position mesh used to draw the random rectangles.
pub struct Scene<G: Gpu> {
    gl: Arc<G>,
    state: SceneState<G>,
}

impl<G: Gpu> Scene<G> {
    /// Creates the scene on the given canvas.
    pub fn new<C: Canvas<Gpu = G>>(canvas: &C) -> Result<Self, SceneError> {
        let gl = canvas.context().ok_or(SceneError::ContextUnavailable)?;

        let program = ShaderProgram::from_sources(&gl, VERTEX_SHADER, FRAGMENT_SHADER)
            .map_err(SceneError::Shader)?;
        let mesh = PositionMesh::new(&gl, &program, POSITION_ATTRIBUTE, 2)
            .map_err(SceneError::Resource)?;

        log::info!("Scene created");

        Ok(Self {
            gl,
            state: SceneState::Ready(SceneResources { program, mesh }),
        })
    }

    /// Whether the scene still owns its GPU resources.
    pub fn is_ready(&self) -> bool {
        matches!(self.state, SceneState::Ready(_))
    }

    /// Returns the position buffer and its vertex array while the scene is ready.
    pub fn handles(&self) -> Option<(G::Buffer, G::VertexArray)> {
        match &self.state {
            SceneState::Ready(res) => Some((res.mesh.buffer(), res.mesh.vertex_array())),
            SceneState::Destroyed => None,
        }
    }

    /// Resizes the canvas to the physical stage size and redraws.
    pub fn on_resize<C: Canvas>(&mut self, ctx: ResizeContext<'_, C>) {
        if !self.is_ready() {
            log::debug!("Resize ignored, scene is destroyed");
            return;
        }

        let size = ctx.display.physical_size();
        let (width, height) = (size.x.round() as u32, size.y.round() as u32);

        let (old_width, old_height) = ctx.canvas.backing_size();
        if old_width != width && old_height != height {
            ctx.canvas.set_backing_size(width, height);
        }

        self.gl.viewport(0, 0, width as i32, height as i32);
        log::debug!("Viewport set to {width}x{height}");

        self.render();
        ctx.debug
            .update_debug(&format!("Canvas size: {:.2}x{:.2}", size.x, size.y));
    }

    /// Called once per frame. The scene has no per-frame work.
    pub fn update(&mut self) {}

    /// Releases the shader program, the position buffer and its vertex array.
    pub fn destroy(&mut self) {
        if let SceneState::Ready(_) = std::mem::replace(&mut self.state, SceneState::Destroyed) {
            log::info!("Scene destroyed");
        }
    }

    fn render(&mut self) {
        self.render_with(&mut rand::rng());
    }

    fn render_with<R: Rng>(&mut self, rng: &mut R) {
        let SceneState::Ready(res) = &self.state else {
            return;
        };

        self.gl.clear_color(0.0, 0.0, 0.0, 0.0);
        self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        self.gl.enable(glow::DEPTH_TEST);

        res.program.use_program();
        res.mesh.bind();

        for _ in 0..RECTANGLE_COUNT {
            let corner = random_corner(rng);
            res.mesh.set_rectangle(0.0, 0.0, corner.x, corner.y);
            res.program.set_uniform(COLOR_UNIFORM, random_color(rng));
            self.gl
                .draw_arrays(glow::TRIANGLES, 0, RECTANGLE_VERTEX_COUNT);
        }
    }
}

impl<G: Gpu> Drop for Scene<G> {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{abs::gpu::recording::RecordingGpu, display::DisplayState};

    struct FakeCanvas {
        gl: Option<Arc<RecordingGpu>>,
        size: (u32, u32),
        resizes: Vec<(u32, u32)>,
    }

    impl FakeCanvas {
        fn new(size: (u32, u32)) -> Self {
            Self {
                gl: Some(Arc::new(RecordingGpu::default())),
                size,
                resizes: Vec::new(),
            }
        }

        fn gl(&self) -> Arc<RecordingGpu> {
            Arc::clone(self.gl.as_ref().unwrap())
        }
    }

    impl Canvas for FakeCanvas {
        type Gpu = RecordingGpu;

        fn context(&self) -> Option<Arc<RecordingGpu>> {
            self.gl.clone()
        }

        fn backing_size(&self) -> (u32, u32) {
            self.size
        }

        fn set_backing_size(&mut self, width: u32, height: u32) {
            self.size = (width, height);
            self.resizes.push((width, height));
        }
    }

    fn resize(
        scene: &mut Scene<RecordingGpu>,
        canvas: &mut FakeCanvas,
        logical: (f32, f32),
        ratio: f32,
    ) -> Vec<String> {
        let display = DisplayState::new(Vec2::new(logical.0, logical.1), ratio);
        let mut lines = Vec::new();
        let mut sink = |text: &str| lines.push(text.to_string());
        scene.on_resize(ResizeContext::new(canvas, &display, &mut sink));
        lines
    }

    #[test]
    fn test_new_without_context_fails() {
        let canvas = FakeCanvas {
            gl: None,
            size: (0, 0),
            resizes: Vec::new(),
        };
        let result = Scene::new(&canvas);
        assert!(matches!(result, Err(SceneError::ContextUnavailable)));
    }

    #[test]
    fn test_new_with_broken_shader_fails() {
        let canvas = FakeCanvas::new((0, 0));
        canvas.gl().fail_compile.set(true);
        let result = Scene::new(&canvas);
        assert!(matches!(result, Err(SceneError::Shader(_))));
        assert_eq!(canvas.gl().live_objects(), 0);
    }

    #[test]
    fn test_new_with_missing_attribute_fails() {
        let canvas = FakeCanvas::new((0, 0));
        canvas
            .gl()
            .missing_attributes
            .borrow_mut()
            .insert(POSITION_ATTRIBUTE.to_string());

        let result = Scene::new(&canvas);
        assert!(matches!(result, Err(SceneError::Resource(_))));
        assert_eq!(canvas.gl().live_objects(), 0);
    }

    #[test]
    fn test_new_with_vertex_array_failure_fails() {
        let canvas = FakeCanvas::new((0, 0));
        canvas.gl().fail_vertex_array.set(true);

        let result = Scene::new(&canvas);
        assert!(matches!(result, Err(SceneError::Resource(_))));
        assert_eq!(canvas.gl().live_objects(), 0);
    }

    #[test]
    fn test_new_allocates_buffer_and_vertex_array() {
        let canvas = FakeCanvas::new((0, 0));
        let scene = Scene::new(&canvas).unwrap();
        let gl = canvas.gl();

        assert!(scene.is_ready());
        let (buffer, vao) = scene.handles().unwrap();
        assert!(gl.live_buffers.borrow().contains(&buffer));
        assert!(gl.live_vertex_arrays.borrow().contains(&vao));
        assert_eq!(gl.attrib_pointers.borrow().as_slice(), &[(0, 2)]);
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let canvas = FakeCanvas::new((0, 0));
        let mut scene = Scene::new(&canvas).unwrap();
        let gl = canvas.gl();

        scene.destroy();
        assert!(!scene.is_ready());
        assert!(scene.handles().is_none());
        assert_eq!(gl.live_objects(), 0);
        let deleted = gl.deleted.borrow().len();

        scene.destroy();
        drop(scene);
        assert_eq!(gl.deleted.borrow().len(), deleted);
    }

    #[test]
    fn test_drop_releases_resources() {
        let canvas = FakeCanvas::new((0, 0));
        let scene = Scene::new(&canvas).unwrap();
        drop(scene);
        assert_eq!(canvas.gl().live_objects(), 0);
    }

    #[test]
    fn test_resize_sets_physical_viewport() {
        let mut canvas = FakeCanvas::new((0, 0));
        let mut scene = Scene::new(&canvas).unwrap();

        let lines = resize(&mut scene, &mut canvas, (400.0, 300.0), 2.0);

        assert_eq!(canvas.gl().viewport.get(), Some((0, 0, 800, 600)));
        assert_eq!(canvas.size, (800, 600));
        assert_eq!(lines, vec!["Canvas size: 800.00x600.00".to_string()]);
    }

    #[test]
    fn test_resize_rounds_fractional_sizes() {
        let mut canvas = FakeCanvas::new((0, 0));
        let mut scene = Scene::new(&canvas).unwrap();

        let display = DisplayState::from_sizes((333, 201), (500, 302));
        let mut lines = Vec::new();
        let mut sink = |text: &str| lines.push(text.to_string());
        scene.on_resize(ResizeContext::new(&mut canvas, &display, &mut sink));

        assert_eq!(canvas.gl().viewport.get(), Some((0, 0, 500, 302)));
        assert_eq!(canvas.size, (500, 302));
        assert_eq!(lines, vec!["Canvas size: 500.00x301.80".to_string()]);

        let lines = resize(&mut scene, &mut canvas, (333.0, 201.0), 1.5);
        assert_eq!(canvas.gl().viewport.get(), Some((0, 0, 500, 302)));
        assert_eq!(lines, vec!["Canvas size: 499.50x301.50".to_string()]);
    }

    #[test]
    fn test_resize_requires_both_dimensions_to_change() {
        let mut canvas = FakeCanvas::new((800, 300));
        let mut scene = Scene::new(&canvas).unwrap();

        resize(&mut scene, &mut canvas, (400.0, 300.0), 2.0);
        assert!(canvas.resizes.is_empty());
        assert_eq!(canvas.size, (800, 300));
        assert_eq!(canvas.gl().viewport.get(), Some((0, 0, 800, 600)));

        resize(&mut scene, &mut canvas, (500.0, 200.0), 2.0);
        assert_eq!(canvas.resizes, vec![(1000, 400)]);
    }

    #[test]
    fn test_resize_renders_two_rectangles() {
        let mut canvas = FakeCanvas::new((0, 0));
        let mut scene = Scene::new(&canvas).unwrap();
        let gl = canvas.gl();

        resize(&mut scene, &mut canvas, (100.0, 100.0), 1.0);

        let draws = gl.draws.borrow();
        assert_eq!(draws.len(), RECTANGLE_COUNT);
        for draw in draws.iter() {
            assert_eq!(draw.mode, glow::TRIANGLES);
            assert_eq!(draw.first, 0);
            assert_eq!(draw.count, 6);
        }
        assert_eq!(
            gl.clears.borrow().as_slice(),
            &[glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT]
        );
        assert!(gl.enabled.borrow().contains(&glow::DEPTH_TEST));
        assert!(gl.current_program.get().is_some());
        assert_eq!(
            gl.bound_vertex_array.get(),
            scene.handles().map(|(_, vao)| vao)
        );
    }

    #[test]
    fn test_render_values_stay_in_range() {
        let canvas = FakeCanvas::new((0, 0));
        let mut scene = Scene::new(&canvas).unwrap();
        let gl = canvas.gl();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            scene.render_with(&mut rng);
        }

        let draws = gl.draws.borrow();
        assert_eq!(draws.len(), 50 * RECTANGLE_COUNT);
        for draw in draws.iter() {
            let v = &draw.vertices;
            assert_eq!(v.len(), 12);
            assert_eq!((v[0], v[1]), (0.0, 0.0));
            let (x, y) = (v[10], v[11]);
            assert!((-1.0..1.0).contains(&x), "x = {x}");
            assert!((-1.0..1.0).contains(&y), "y = {y}");
            assert_eq!(v.as_slice(), &crate::abs::rectangle_vertices(0.0, 0.0, x, y));

            let color = draw.color.unwrap();
            for channel in &color[..3] {
                assert!((0.0..1.0).contains(channel));
            }
            assert_eq!(color[3], 1.0);
        }
    }

    #[test]
    fn test_operations_after_destroy_are_ignored() {
        let mut canvas = FakeCanvas::new((0, 0));
        let mut scene = Scene::new(&canvas).unwrap();
        let gl = canvas.gl();
        scene.destroy();

        let lines = resize(&mut scene, &mut canvas, (400.0, 300.0), 2.0);
        scene.update();

        assert!(lines.is_empty());
        assert!(gl.draws.borrow().is_empty());
        assert!(gl.viewport.get().is_none());
    }
}
