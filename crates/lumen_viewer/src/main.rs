use anyhow::Result;
use lumen_renderer::{presets, RenderConfig, RenderSession};
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

mod present;

use present::Presenter;

const TITLE: &str = "Raytracing";

/// Application state
struct App {
    config: RenderConfig,
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    session: Option<RenderSession>,

    /// Staging copy of the pixel buffer, uploaded every redraw
    frame: Vec<u8>,
    shown_samples: Option<u32>,
    /// Setup failure raised inside the event loop, returned from main
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: RenderConfig) -> Self {
        Self {
            config,
            window: None,
            presenter: None,
            session: None,
            frame: Vec::new(),
            shown_samples: None,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(winit::dpi::PhysicalSize::new(self.config.width, self.config.height))
            .with_resizable(false);

        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let presenter = pollster::block_on(Presenter::new(
            window.clone(),
            (self.config.width, self.config.height),
        ))?;

        let scene = presets::cornell(self.config.aspect_ratio())?;
        let session = RenderSession::start(scene, self.config.clone())?;

        self.frame = vec![0; presenter.frame_len()];
        window.request_redraw();

        self.window = Some(window);
        self.presenter = Some(presenter);
        self.session = Some(session);

        log::info!("Window and render session initialized");
        Ok(())
    }

    /// Stop the workers and wait for them before the window goes away.
    fn stop_session(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(e) = session.shutdown() {
                log::error!("Render session ended with an error: {e}");
            }
        }
    }

    fn update_title(&mut self) {
        let (Some(window), Some(session)) = (&self.window, &self.session) else {
            return;
        };

        let done = session.samples_completed();
        if self.shown_samples == Some(done) {
            return;
        }
        self.shown_samples = Some(done);

        window.set_title(&format!(
            "{TITLE} - {done}/{} samples ({:.1}s)",
            session.config().samples,
            session.elapsed().as_secs_f32()
        ));
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                log::error!("Failed to start viewer: {e:#}");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                self.stop_session();
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(presenter) = &mut self.presenter {
                    presenter.resize((physical_size.width, physical_size.height));
                }
            }
            WindowEvent::RedrawRequested => {
                let mut out_of_memory = false;

                if let (Some(presenter), Some(session)) = (&mut self.presenter, &self.session) {
                    // No frame-complete signal: take whatever the workers have written
                    session.pixels().copy_to(&mut self.frame);
                    presenter.upload(&self.frame);

                    match presenter.render() {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            presenter.resize(presenter.size);
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => out_of_memory = true,
                        Err(e) => log::error!("Surface error: {:?}", e),
                    }
                }

                if out_of_memory {
                    log::error!("Out of memory!");
                    self.stop_session();
                    event_loop.exit();
                    return;
                }

                self.update_title();

                // Request next frame
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.stop_session();
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Starting Lumen viewer");

    let config = RenderConfig::default();
    config.validate()?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
