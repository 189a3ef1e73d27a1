use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::WindowId;
use log::{error, info, warn};

use crate::config::DemoConfig;
use crate::engine::error::{RenderError, Result};
use crate::engine::graphics::{Renderer, WgpuBackend};
use crate::engine::window::WindowManager;

/// Maps winit's lifecycle onto the renderer: `resumed` loads, `Resized`
/// resizes, `RedrawRequested` renders and `exiting` unloads.
pub struct App {
    config: DemoConfig,
    window_manager: WindowManager,
    backend: Option<WgpuBackend>,
    renderer: Renderer<WgpuBackend>,
    fatal: Option<RenderError>,
}

impl Default for App {
    fn default() -> Self {
        Self::new(DemoConfig::default())
    }
}

impl App {
    pub fn new(config: DemoConfig) -> Self {
        let renderer = Renderer::new(&config);
        Self {
            config,
            window_manager: WindowManager::new(),
            backend: None,
            renderer,
            fatal: None,
        }
    }

    /// The error that stopped the event loop, if any.
    pub fn take_error(&mut self) -> Option<RenderError> {
        self.fatal.take()
    }

    fn load(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = self
            .window_manager
            .create_window(event_loop, &self.config.title, self.config.window_size)?;
        let size = window.inner_size();

        let mut backend = pollster::block_on(WgpuBackend::new(window))?;
        self.renderer.on_load(&mut backend, size)?;
        self.backend = Some(backend);
        self.window_manager.request_redraw();
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: RenderError) {
        error!("{}", err);
        self.fatal = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.backend.is_some() || self.fatal.is_some() {
            return;
        }
        if let Err(e) = self.load(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                self.renderer.on_resize(backend, physical_size);
            }
            WindowEvent::RedrawRequested => {
                match self.renderer.on_render_frame(backend) {
                    Ok(_) => self.window_manager.request_redraw(),
                    Err(e) => self.fail(event_loop, e),
                }
            }
            _ => (),
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        match self.backend.as_mut() {
            Some(backend) => self.renderer.on_unload(backend),
            None => warn!("Exiting before the renderer was loaded"),
        }
        info!("Shutting down");
    }
}
