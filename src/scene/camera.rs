use glam::{Mat4, Vec3};
use log::debug;

use crate::config::DemoConfig;
use crate::engine::graphics::uniform::TransformUniform;

/// Perspective projection with a vertical field of view in degrees.
pub fn compute_projection(fov_y_degrees: f32, width: u32, height: u32, z_near: f32, z_far: f32) -> Mat4 {
    let aspect = width as f32 / height as f32;
    Mat4::perspective_rh(fov_y_degrees.to_radians(), aspect, z_near, z_far)
}

/// Fixed camera: only the projection follows the viewport.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraState {
    pub fov_y_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
    projection: Mat4,
    view: Mat4,
    model: Mat4,
}

impl CameraState {
    pub fn new(config: &DemoConfig) -> Self {
        let size = config.window_size;
        let mut camera = Self {
            fov_y_degrees: config.fov_y_degrees,
            z_near: config.z_near,
            z_far: config.z_far,
            projection: Mat4::IDENTITY,
            view: Mat4::from_translation(Vec3::new(0.0, 0.0, -config.camera_distance)),
            model: Mat4::IDENTITY,
        };
        camera.on_resize(size.width, size.height);
        camera
    }

    pub fn compute_projection(&self, width: u32, height: u32) -> Mat4 {
        compute_projection(self.fov_y_degrees, width, height, self.z_near, self.z_far)
    }

    /// Recomputes the projection. A zero-sized viewport (minimized window)
    /// keeps the previous one and returns `false`.
    pub fn on_resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            debug!("Ignoring zero-sized viewport {}x{}", width, height);
            return false;
        }
        self.projection = self.compute_projection(width, height);
        true
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn model(&self) -> Mat4 {
        self.model
    }

    pub fn uniform(&self) -> TransformUniform {
        TransformUniform::new(self.model, self.view, self.projection)
    }
}
