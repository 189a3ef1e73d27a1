//! Engine module containing graphics, window management, errors and logging.

pub mod error;
pub mod graphics;
pub mod logging;
pub mod window;

// Re-export commonly used types
pub use error::{RenderError, Result};
pub use graphics::{renderer::Renderer, vertex::Vertex};
