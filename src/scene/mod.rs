//! The demo scene: geometry, fixed camera and the window lifecycle.

pub mod app;
pub mod camera;
pub mod mesh;

pub use app::App;
pub use camera::CameraState;
pub use mesh::{Mesh, MeshVariant};
