//! ego sample: two rings of textured quads spinning in a 3D scene.
//!
//! winit drives the loop via `ApplicationHandler` with `ControlFlow::Poll`:
//!
//!   1. window events are mapped to `PlatformEvent` and dispatched to the
//!      `Lifecycle` (quit / resize, everything else ignored)
//!   2. on `RedrawRequested`, the lifecycle advances the clock and rewrites
//!      every mesh transform
//!   3. the renderer draws all scenes and presents
//!
//! Startup failures are carried out of the event loop as a `StartupError` and
//! turned into the process exit code.

mod bootstrap;
mod config;
mod error;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use bootstrap::SampleScene;
use config::{load_config, SampleConfig};
use ego_core::{Lifecycle, PlatformEvent};
use ego_render::Renderer;
use error::StartupError;

const CONFIG_PATH: &str = "assets/sample.json";

/// Everything that exists once the window is up. Field order is drop order:
/// GPU resources go before the window they render into.
struct SampleState {
    renderer: Renderer,
    scene: SampleScene,
    lifecycle: Lifecycle,
    window: Arc<Window>,
}

impl SampleState {
    fn new(event_loop: &ActiveEventLoop, config: &SampleConfig) -> Result<Self, StartupError> {
        let window = ego_platform::window::create_window(event_loop, &config.window)?;
        let size = window.inner_size();
        log::info!("Window created: {}x{}", size.width, size.height);

        let mut renderer = Renderer::new(window.clone(), config.present_mode())?;
        let scene = SampleScene::build(&mut renderer, config, size.width, size.height);
        let lifecycle = Lifecycle::new(size.width, size.height);

        Ok(Self {
            renderer,
            scene,
            lifecycle,
            window,
        })
    }
}

struct App {
    config: SampleConfig,
    state: Option<SampleState>,
    startup_error: Option<StartupError>,
}

impl App {
    fn new(config: SampleConfig) -> Self {
        Self {
            config,
            state: None,
            startup_error: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.startup_error.is_some() {
            return;
        }
        match SampleState::new(event_loop, &self.config) {
            Ok(state) => self.state = Some(state),
            Err(err) => {
                self.startup_error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            if state.lifecycle.is_running() {
                state.window.request_redraw();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let platform_event = match &event {
            WindowEvent::CloseRequested => PlatformEvent::Quit,
            WindowEvent::Resized(size) => PlatformEvent::Resized {
                width: size.width,
                height: size.height,
            },
            _ => PlatformEvent::Other,
        };

        let scene_id = state.scene.scene;
        if let Some(viewport) = state
            .lifecycle
            .dispatch(platform_event, state.renderer.scene_mut(scene_id))
        {
            state.renderer.resize(viewport.width, viewport.height);
            state
                .scene
                .resize(&mut state.renderer, viewport.width, viewport.height);
        }

        if !state.lifecycle.is_running() {
            event_loop.exit();
            return;
        }

        if let WindowEvent::RedrawRequested = event {
            let produced = state
                .lifecycle
                .frame_now(&state.scene.rings, state.renderer.scene_mut(scene_id));
            if produced {
                state.renderer.draw_all_scenes();
            }
        }
    }
}

fn run() -> Result<(), StartupError> {
    let event_loop = EventLoop::new()?;
    if !image::ImageFormat::Png.reading_enabled() {
        return Err(StartupError::ImageDecoderUnavailable);
    }
    let config = load_config(Path::new(CONFIG_PATH))?;

    event_loop.set_control_flow(ControlFlow::Poll);
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.startup_error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("ego sample starting...");

    match run() {
        Ok(()) => {
            log::info!("Clean exit");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
