use rectscene::{DisplayState, ResizeContext, Scene, abs::App, config::Config, logging};
use sdl2::{event::Event, event::WindowEvent, keyboard::Keycode};

fn main() {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::init(config.log_level_filter()) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let mut app = match App::new(&config) {
        Ok(app) => app,
        Err(e) => {
            log::error!("Failed to initialize SDL: {e}");
            std::process::exit(1);
        }
    };

    let mut scene = match Scene::new(&app) {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    let title = config.title.clone();
    let resize = |app: &mut App, scene: &mut Scene<glow::Context>| {
        let display = DisplayState::from_sizes(app.window.size(), app.window.drawable_size());
        let mut debug_text = None;
        let mut sink = |text: &str| debug_text = Some(text.to_string());
        scene.on_resize(ResizeContext::new(&mut *app, &display, &mut sink));

        if let Some(text) = debug_text {
            log::debug!("{text}");
            if let Err(e) = app.window.set_title(&format!("{title} | {text}")) {
                log::warn!("Failed to set window title: {e}");
            }
        }
        app.window.gl_swap_window();
    };

    resize(&mut app, &mut scene);

    'running: loop {
        let event = app.event_pump.wait_event();
        match event {
            Event::Quit { .. }
            | Event::KeyDown {
                keycode: Some(Keycode::Escape),
                ..
            } => break 'running,
            Event::Window {
                win_event: WindowEvent::SizeChanged(..),
                ..
            } => resize(&mut app, &mut scene),
            _ => {}
        }

        scene.update();
    }

    scene.destroy();
}
