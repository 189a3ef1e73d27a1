//! Application entry point.

use winit::event_loop::{ControlFlow, EventLoop};
use log::{info, error};

use t_prism::engine::logging::init_logging;
use t_prism::{App, DemoConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    info!("Logger initialized");

    let event_loop = EventLoop::new().map_err(|e| {
        error!("Failed to create event loop: {:?}", e);
        e
    })?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(DemoConfig::default());
    if let Err(e) = event_loop.run_app(&mut app) {
        error!("Application error: {:?}", e);
        return Err(Box::new(e));
    }
    if let Some(e) = app.take_error() {
        return Err(Box::new(e));
    }

    Ok(())
}
