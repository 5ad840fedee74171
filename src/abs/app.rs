//! SDL2 and OpenGL application management.
//!
//! This module defines the [`App`] struct which encapsulates the SDL2
//! window and, when the driver provides one, its OpenGL context.

use std::sync::Arc;

use crate::{config::Config, display::Canvas};

/// The [`App`] struct encapsulates the SDL2 and OpenGL context.
pub struct App {
    pub sdl: sdl2::Sdl,
    pub video_subsystem: sdl2::VideoSubsystem,
    pub window: sdl2::video::Window,
    pub gl_context: Option<sdl2::video::GLContext>,
    pub gl: Option<Arc<glow::Context>>,
    pub event_pump: sdl2::EventPump,
}

impl App {
    /// Creates a new [`App`] instance from the given [`Config`].
    /// The width and height options are ignored if `fullscreen` is set to `true`.
    ///
    /// A missing OpenGL context is not an error here; it surfaces when a scene
    /// asks the canvas for one.
    pub fn new(config: &Config) -> Result<Self, String> {
        let sdl = sdl2::init()?;
        let video_subsystem = sdl.video()?;
        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
        gl_attr.set_context_version(3, 3);
        gl_attr.set_depth_size(24);
        gl_attr.set_double_buffer(true);

        let (width, height) = if config.fullscreen {
            let display_mode = video_subsystem.current_display_mode(0)?;
            (display_mode.w as u32, display_mode.h as u32)
        } else {
            (config.width, config.height)
        };
        let mut window = video_subsystem
            .window(&config.title, width, height)
            .opengl()
            .resizable()
            .allow_highdpi()
            .build()
            .map_err(|e| e.to_string())?;
        window.set_fullscreen(if config.fullscreen {
            sdl2::video::FullscreenType::Desktop
        } else {
            sdl2::video::FullscreenType::Off
        })?;

        let gl_context = match window.gl_create_context() {
            Ok(ctx) => Some(ctx),
            Err(e) => {
                log::error!("Failed to create OpenGL context: {e}");
                None
            }
        };
        let gl = match &gl_context {
            Some(ctx) => match window.gl_make_current(ctx) {
                Ok(()) => {
                    let gl = unsafe {
                        glow::Context::from_loader_function(|s| {
                            video_subsystem.gl_get_proc_address(s) as *const _
                        })
                    };
                    Some(Arc::new(gl))
                }
                Err(e) => {
                    log::error!("Failed to make OpenGL context current: {e}");
                    None
                }
            },
            None => None,
        };

        let event_pump = sdl.event_pump()?;

        log::info!(
            "Window created ({}x{}, fullscreen = {})",
            width,
            height,
            config.fullscreen
        );

        Ok(Self {
            sdl,
            video_subsystem,
            window,
            gl_context,
            gl,
            event_pump,
        })
    }
}

impl Canvas for App {
    type Gpu = glow::Context;

    fn context(&self) -> Option<Arc<glow::Context>> {
        self.gl.clone()
    }

    fn backing_size(&self) -> (u32, u32) {
        self.window.drawable_size()
    }

    /// The drawable follows the window, so the window is resized to the logical
    /// size that yields the requested drawable size.
    fn set_backing_size(&mut self, width: u32, height: u32) {
        let (logical_width, _) = self.window.size();
        let (drawable_width, _) = self.window.drawable_size();
        let ratio = if logical_width == 0 || drawable_width == 0 {
            1.0
        } else {
            drawable_width as f32 / logical_width as f32
        };

        let logical = (
            (width as f32 / ratio).round() as u32,
            (height as f32 / ratio).round() as u32,
        );
        if let Err(e) = self.window.set_size(logical.0, logical.1) {
            log::warn!("Failed to resize window to {}x{}: {e}", logical.0, logical.1);
        }
    }
}
