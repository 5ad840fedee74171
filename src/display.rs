//! Display state handed to the scene on every resize.

use std::sync::Arc;

use glam::Vec2;

use crate::abs::Gpu;

/// A render target with a resizable backing store.
pub trait Canvas {
    type Gpu: Gpu;

    /// Returns the graphics context of this canvas, if one could be created.
    fn context(&self) -> Option<Arc<Self::Gpu>>;

    /// Returns the size of the backing store in physical pixels.
    fn backing_size(&self) -> (u32, u32);

    /// Resizes the backing store.
    fn set_backing_size(&mut self, width: u32, height: u32);
}

/// Logical size of the stage and its pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayState {
    pub stage_size: Vec2,
    pub pixel_ratio: f32,
}

impl DisplayState {
    pub fn new(stage_size: Vec2, pixel_ratio: f32) -> Self {
        Self {
            stage_size,
            pixel_ratio,
        }
    }

    /// Derives the display state from a window's logical and drawable sizes.
    pub fn from_sizes(logical: (u32, u32), drawable: (u32, u32)) -> Self {
        let pixel_ratio = if logical.0 == 0 {
            1.0
        } else {
            drawable.0 as f32 / logical.0 as f32
        };
        Self::new(Vec2::new(logical.0 as f32, logical.1 as f32), pixel_ratio)
    }

    /// Size of the stage in physical pixels.
    pub fn physical_size(&self) -> Vec2 {
        self.stage_size * self.pixel_ratio
    }
}

/// Receives human readable debug text.
pub trait DebugSink {
    fn update_debug(&mut self, text: &str);
}

impl<F: FnMut(&str)> DebugSink for F {
    fn update_debug(&mut self, text: &str) {
        self(text)
    }
}

/// Everything [`Scene::on_resize`](crate::scene::Scene::on_resize) reads or writes.
pub struct ResizeContext<'a, C: Canvas> {
    pub canvas: &'a mut C,
    pub display: &'a DisplayState,
    pub debug: &'a mut dyn DebugSink,
}

impl<'a, C: Canvas> ResizeContext<'a, C> {
    /// Creates a new `ResizeContext` from the given canvas, display state and debug sink.
    pub fn new(
        canvas: &'a mut C,
        display: &'a DisplayState,
        debug: &'a mut dyn DebugSink,
    ) -> Self {
        Self {
            canvas,
            display,
            debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physical_size() {
        let display = DisplayState::new(Vec2::new(400.0, 300.0), 2.0);
        assert_eq!(display.physical_size(), Vec2::new(800.0, 600.0));
    }

    #[test]
    fn test_from_sizes() {
        let display = DisplayState::from_sizes((640, 480), (1280, 960));
        assert_eq!(display.stage_size, Vec2::new(640.0, 480.0));
        assert_eq!(display.pixel_ratio, 2.0);

        let minimized = DisplayState::from_sizes((0, 0), (0, 0));
        assert_eq!(minimized.pixel_ratio, 1.0);
    }

    #[test]
    fn test_closure_debug_sink() {
        let mut lines = Vec::new();
        {
            let mut sink = |text: &str| lines.push(text.to_string());
            sink.update_debug("hello");
        }
        assert_eq!(lines, vec!["hello".to_string()]);
    }
}
