//! A window that redraws two random rectangles whenever it is resized.

pub mod abs;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod scene;

pub use display::{Canvas, DebugSink, DisplayState, ResizeContext};
pub use error::{ConfigError, SceneError};
pub use scene::Scene;
