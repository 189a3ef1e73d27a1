//! Window creation and placement.

use std::sync::Arc;

use log::{debug, error};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

use crate::engine::error::Result;

/// Top-left corner that centers `window_size` on a monitor.
pub fn centered_position(
    monitor_position: PhysicalPosition<i32>,
    monitor_size: PhysicalSize<u32>,
    window_size: PhysicalSize<u32>,
) -> PhysicalPosition<i32> {
    let offset = |monitor: u32, window: u32| (monitor as i32 - window as i32) / 2;
    PhysicalPosition::new(
        monitor_position.x + offset(monitor_size.width, window_size.width),
        monitor_position.y + offset(monitor_size.height, window_size.height),
    )
}

#[derive(Default)]
pub struct WindowManager {
    window: Option<Arc<Window>>,
}

impl WindowManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a hidden window, centers it on the primary monitor and shows it.
    pub fn create_window(
        &mut self,
        event_loop: &ActiveEventLoop,
        title: &str,
        size: PhysicalSize<u32>,
    ) -> Result<Arc<Window>> {
        let attributes = Window::default_attributes()
            .with_title(title)
            .with_inner_size(size)
            .with_visible(false);
        let window = event_loop.create_window(attributes).map_err(|e| {
            error!("Failed to create window: {:?}", e);
            e
        })?;

        let monitor = event_loop.primary_monitor().or_else(|| window.current_monitor());
        if let Some(monitor) = monitor {
            let position = centered_position(monitor.position(), monitor.size(), window.outer_size());
            window.set_outer_position(position);
            debug!("Window centered at {:?}", position);
        }
        window.set_visible(true);

        let window = Arc::new(window);
        self.window = Some(Arc::clone(&window));
        Ok(window)
    }

    pub fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
