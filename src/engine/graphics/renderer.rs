use log::{debug, info, trace};
use winit::dpi::PhysicalSize;

use crate::config::DemoConfig;
use crate::engine::error::{RenderError, Result};
use crate::engine::graphics::backend::{BufferKind, Frame, FrameOutcome, GpuBackend};
use crate::engine::graphics::shader::ShaderStage;
use crate::engine::graphics::vertex::Vertex;
use crate::scene::camera::CameraState;
use crate::scene::mesh::Mesh;

/// `Uninitialized -> Ready -> Disposed`, nothing else.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Ready,
    Disposed,
}

struct GpuResources<B: GpuBackend> {
    vertex_buffer: B::Buffer,
    index_buffer: B::Buffer,
    program: B::Program,
}

/// Owns the mesh, the camera matrices and every GPU handle the demo creates.
///
/// The backend is passed in on each call rather than stored, so the caller
/// decides when the GPU context exists.
pub struct Renderer<B: GpuBackend> {
    mesh: Mesh,
    camera: CameraState,
    clear_color: wgpu::Color,
    resources: Option<GpuResources<B>>,
    lifecycle: Lifecycle,
}

impl<B: GpuBackend> Renderer<B> {
    pub fn new(config: &DemoConfig) -> Self {
        Self {
            mesh: Mesh::new(config.mesh),
            camera: CameraState::new(config),
            clear_color: config.clear_color,
            resources: None,
            lifecycle: Lifecycle::Uninitialized,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Uploads the mesh, builds the shader program and sets the projection
    /// for `size`. On error nothing stays allocated.
    pub fn on_load(&mut self, backend: &mut B, size: PhysicalSize<u32>) -> Result<()> {
        if self.lifecycle != Lifecycle::Uninitialized {
            return Err(RenderError::AlreadyLoaded);
        }
        self.mesh.validate()?;

        let vertex_buffer = backend.create_buffer(
            "T Prism Vertex Buffer",
            bytemuck::cast_slice(&self.mesh.vertices),
            BufferKind::Vertex,
        )?;
        let index_buffer = match backend.create_buffer(
            "T Prism Index Buffer",
            bytemuck::cast_slice(&self.mesh.indices),
            BufferKind::Index,
        ) {
            Ok(buffer) => buffer,
            Err(e) => {
                backend.release_buffer(vertex_buffer);
                return Err(e);
            }
        };
        let program = match build_program(backend) {
            Ok(program) => program,
            Err(e) => {
                backend.release_buffer(index_buffer);
                backend.release_buffer(vertex_buffer);
                return Err(e);
            }
        };

        self.resources = Some(GpuResources {
            vertex_buffer,
            index_buffer,
            program,
        });
        self.camera.on_resize(size.width, size.height);
        self.lifecycle = Lifecycle::Ready;
        info!(
            "Renderer ready: {} vertices, {} triangles, viewport {}x{}",
            self.mesh.vertices.len(),
            self.mesh.triangle_count(),
            size.width,
            size.height
        );
        Ok(())
    }

    pub fn on_resize(&mut self, backend: &mut B, size: PhysicalSize<u32>) {
        if !self.camera.on_resize(size.width, size.height) {
            return;
        }
        debug!("Resized to {}x{}", size.width, size.height);
        if self.lifecycle == Lifecycle::Ready {
            backend.resize_surface(size);
        }
    }

    pub fn on_render_frame(&mut self, backend: &mut B) -> Result<FrameOutcome> {
        let resources = self.resources.as_ref().ok_or(RenderError::NotReady)?;
        let frame = Frame {
            program: &resources.program,
            vertex_buffer: &resources.vertex_buffer,
            index_buffer: &resources.index_buffer,
            index_count: self.mesh.index_count(),
            transforms: self.camera.uniform(),
            clear_color: self.clear_color,
        };
        let outcome = backend.draw_frame(&frame)?;
        trace!("Frame {:?}", outcome);
        Ok(outcome)
    }

    /// Releases the buffers and the program. A no-op unless the renderer is
    /// `Ready`.
    pub fn on_unload(&mut self, backend: &mut B) {
        let Some(resources) = self.resources.take() else {
            // Never loaded: stay loadable.
            return;
        };
        backend.release_buffer(resources.vertex_buffer);
        backend.release_buffer(resources.index_buffer);
        backend.release_program(resources.program);
        self.lifecycle = Lifecycle::Disposed;
        info!("Renderer resources released");
    }
}

fn build_program<B: GpuBackend>(backend: &mut B) -> Result<B::Program> {
    let vertex = backend.compile_shader(ShaderStage::Vertex, ShaderStage::Vertex.source())?;
    let fragment = match backend.compile_shader(ShaderStage::Fragment, ShaderStage::Fragment.source()) {
        Ok(shader) => shader,
        Err(e) => {
            backend.release_shader(vertex);
            return Err(e);
        }
    };
    let program = backend.link_program(&vertex, &fragment, &Vertex::desc());
    backend.release_shader(vertex);
    backend.release_shader(fragment);
    program
}
