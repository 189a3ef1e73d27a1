//! The seam between the renderer and the GPU driver.
//!
//! [`Renderer`](super::Renderer) only ever talks to a [`GpuBackend`]. The
//! production implementation is [`WgpuBackend`](super::WgpuBackend); tests
//! plug in a backend that just counts allocations.

use winit::dpi::PhysicalSize;

use crate::engine::error::Result;
use crate::engine::graphics::shader::ShaderStage;
use crate::engine::graphics::uniform::TransformUniform;

/// What a static GPU buffer is used for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BufferKind {
    Vertex,
    Index,
}

/// Result of one frame submission.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The frame was drawn and presented.
    Presented,
    /// The surface was not available this tick (lost, outdated or timed out).
    Skipped,
}

/// Everything the backend needs to draw one frame.
pub struct Frame<'a, B: GpuBackend + ?Sized> {
    pub program: &'a B::Program,
    pub vertex_buffer: &'a B::Buffer,
    pub index_buffer: &'a B::Buffer,
    pub index_count: u32,
    pub transforms: TransformUniform,
    pub clear_color: wgpu::Color,
}

pub trait GpuBackend {
    type Buffer;
    type Shader;
    type Program;

    /// Uploads `contents` once into a static buffer.
    fn create_buffer(&mut self, label: &str, contents: &[u8], kind: BufferKind) -> Result<Self::Buffer>;

    /// Compiles one shader stage. Failures carry the compiler log.
    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Result<Self::Shader>;

    /// Links both stages and the vertex layout into a drawable program.
    fn link_program(
        &mut self,
        vertex: &Self::Shader,
        fragment: &Self::Shader,
        layout: &wgpu::VertexBufferLayout<'static>,
    ) -> Result<Self::Program>;

    /// Adapts the presentation surface and depth buffer to a new size.
    fn resize_surface(&mut self, size: PhysicalSize<u32>);

    /// Clears color and depth, draws the indexed mesh once and presents.
    fn draw_frame(&mut self, frame: &Frame<'_, Self>) -> Result<FrameOutcome>;

    fn release_shader(&mut self, shader: Self::Shader);
    fn release_buffer(&mut self, buffer: Self::Buffer);
    fn release_program(&mut self, program: Self::Program);
}
