//! Startup settings. Everything is fixed at compile time; `RUST_LOG` is the
//! only thing read from the environment.

use winit::dpi::PhysicalSize;

use crate::scene::mesh::MeshVariant;

#[derive(Clone, Debug, PartialEq)]
pub struct DemoConfig {
    pub title: String,
    pub window_size: PhysicalSize<u32>,
    pub clear_color: wgpu::Color,
    pub fov_y_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
    /// How far the camera sits back from the origin along +z.
    pub camera_distance: f32,
    pub mesh: MeshVariant,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: "T Prism".to_string(),
            window_size: PhysicalSize::new(800, 600),
            clear_color: wgpu::Color {
                r: 0.3,
                g: 0.4,
                b: 0.5,
                a: 1.0,
            },
            fov_y_degrees: 45.0,
            z_near: 0.1,
            z_far: 100.0,
            camera_distance: 3.0,
            mesh: MeshVariant::Reference,
        }
    }
}
