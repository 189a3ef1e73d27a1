//! Error types for renderer setup and the frame loop.

use thiserror::Error;

use crate::engine::graphics::shader::ShaderStage;

/// Everything that can stop the renderer from starting or drawing.
///
/// None of these are recovered from locally: setup errors abort startup and
/// frame errors terminate the event loop.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to compile {stage} shader:\n{log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("failed to link shader program:\n{log}")]
    ProgramLink { log: String },

    #[error("failed to allocate GPU resource '{label}': {log}")]
    Allocation { label: String, log: String },

    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("surface error: {0}")]
    Surface(wgpu::SurfaceError),

    #[error("no compatible GPU adapter found")]
    AdapterUnavailable,

    #[error("failed to create GPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("renderer is not ready (not loaded or already disposed)")]
    NotReady,

    #[error("renderer has already been loaded")]
    AlreadyLoaded,
}

pub type Result<T> = std::result::Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_compile_message_names_stage_and_log() {
        let err = RenderError::ShaderCompile {
            stage: ShaderStage::Fragment,
            log: "error: expected ';'".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("fragment shader"));
        assert!(message.contains("expected ';'"));
    }
}
