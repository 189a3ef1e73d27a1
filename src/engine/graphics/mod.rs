pub mod backend;
pub mod renderer;
pub mod shader;
pub mod uniform;
pub mod vertex;
pub mod wgpu_backend;

pub use backend::{BufferKind, Frame, FrameOutcome, GpuBackend};
pub use renderer::{Lifecycle, Renderer};
pub use shader::ShaderStage;
pub use uniform::TransformUniform;
pub use vertex::Vertex;
pub use wgpu_backend::{GpuProgram, WgpuBackend};
