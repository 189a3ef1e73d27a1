use std::borrow::Cow;
use std::sync::Arc;

use bytemuck::Zeroable;
use log::{debug, info, warn};
use wgpu;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::engine::error::{RenderError, Result};
use crate::engine::graphics::backend::{BufferKind, Frame, FrameOutcome, GpuBackend};
use crate::engine::graphics::shader::ShaderStage;
use crate::engine::graphics::uniform::TransformUniform;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// A linked pipeline together with the uniform buffer its bind group points at.
pub struct GpuProgram {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

pub struct WgpuBackend {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
}

impl WgpuBackend {
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::AdapterUnavailable)?;
        info!("Using adapter: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("T Prism Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| RenderError::Allocation {
                label: "Surface".to_string(),
                log: "surface reports no supported formats".to_string(),
            })?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_view = create_depth_view(&device, config.width, config.height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_view,
        })
    }

    /// Runs `create` inside an error scope and reports what the scope caught.
    fn scoped<T>(&self, filter: wgpu::ErrorFilter, create: impl FnOnce(&wgpu::Device) -> T) -> (T, Option<wgpu::Error>) {
        self.device.push_error_scope(filter);
        let value = create(&self.device);
        let error = pollster::block_on(self.device.pop_error_scope());
        (value, error)
    }
}

impl GpuBackend for WgpuBackend {
    type Buffer = wgpu::Buffer;
    type Shader = wgpu::ShaderModule;
    type Program = GpuProgram;

    fn create_buffer(&mut self, label: &str, contents: &[u8], kind: BufferKind) -> Result<wgpu::Buffer> {
        let usage = match kind {
            BufferKind::Vertex => wgpu::BufferUsages::VERTEX,
            BufferKind::Index => wgpu::BufferUsages::INDEX,
        };
        let (buffer, error) = self.scoped(wgpu::ErrorFilter::OutOfMemory, |device| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage,
            })
        });
        if let Err(e) = check_scope(error, |log| RenderError::Allocation {
            label: label.to_string(),
            log,
        }) {
            buffer.destroy();
            return Err(e);
        }
        debug!("Uploaded {} ({} bytes)", label, contents.len());
        Ok(buffer)
    }

    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Result<wgpu::ShaderModule> {
        let (module, error) = self.scoped(wgpu::ErrorFilter::Validation, |device| {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(stage.label()),
                source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(source)),
            })
        });
        check_scope(error, |log| RenderError::ShaderCompile { stage, log })?;
        Ok(module)
    }

    fn link_program(
        &mut self,
        vertex: &wgpu::ShaderModule,
        fragment: &wgpu::ShaderModule,
        layout: &wgpu::VertexBufferLayout<'static>,
    ) -> Result<GpuProgram> {
        let (uniform_buffer, error) = self.scoped(wgpu::ErrorFilter::OutOfMemory, |device| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Transform Buffer"),
                contents: bytemuck::bytes_of(&TransformUniform::zeroed()),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            })
        });
        if let Err(e) = check_scope(error, |log| RenderError::Allocation {
            label: "Transform Buffer".to_string(),
            log,
        }) {
            uniform_buffer.destroy();
            return Err(e);
        }

        let format = self.config.format;
        let ((bind_group, pipeline), error) = self.scoped(wgpu::ErrorFilter::Validation, |device| {
            let transform_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Transform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(TransformUniform::SIZE),
                    },
                    count: None,
                }],
            });

            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Transform Bind Group"),
                layout: &transform_bind_group_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });

            let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("T Prism Pipeline Layout"),
                bind_group_layouts: &[&transform_bind_group_layout],
                push_constant_ranges: &[],
            });

            let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("T Prism Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: vertex,
                    entry_point: ShaderStage::Vertex.entry_point(),
                    buffers: std::slice::from_ref(layout),
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: fragment,
                    entry_point: ShaderStage::Fragment.entry_point(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    // The authored mesh mixes windings.
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState {
                    count: 1,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
            });

            (bind_group, pipeline)
        });
        if let Err(e) = check_scope(error, |log| RenderError::ProgramLink { log }) {
            uniform_buffer.destroy();
            return Err(e);
        }

        Ok(GpuProgram {
            pipeline,
            uniform_buffer,
            bind_group,
        })
    }

    fn resize_surface(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, size.width, size.height);
    }

    fn draw_frame(&mut self, frame: &Frame<'_, Self>) -> Result<FrameOutcome> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(FrameOutcome::Skipped);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(RenderError::Surface(wgpu::SurfaceError::OutOfMemory));
            }
            Err(e) => {
                warn!("Skipping frame: {}", e);
                return Ok(FrameOutcome::Skipped);
            }
        };
        let view = surface_texture.texture.create_view(&wgpu::TextureViewDescriptor::default());

        self.queue.write_buffer(
            &frame.program.uniform_buffer,
            0,
            bytemuck::bytes_of(&frame.transforms),
        );

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(frame.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&frame.program.pipeline);
            render_pass.set_bind_group(0, &frame.program.bind_group, &[]);
            render_pass.set_vertex_buffer(0, frame.vertex_buffer.slice(..));
            render_pass.set_index_buffer(frame.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..frame.index_count, 0, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(FrameOutcome::Presented)
    }

    fn release_shader(&mut self, shader: wgpu::ShaderModule) {
        drop(shader);
    }

    fn release_buffer(&mut self, buffer: wgpu::Buffer) {
        buffer.destroy();
    }

    fn release_program(&mut self, program: GpuProgram) {
        program.uniform_buffer.destroy();
    }
}

/// Turns whatever an error scope caught into a `RenderError` carrying its log.
fn check_scope<E: std::fmt::Display>(caught: Option<E>, into_error: impl FnOnce(String) -> RenderError) -> Result<()> {
    match caught {
        Some(error) => Err(into_error(error.to_string())),
        None => Ok(()),
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        label: Some("Depth Texture"),
        view_formats: &[],
    });
    depth_texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_scope_passes() {
        let caught: Option<String> = None;
        assert!(check_scope(caught, |log| RenderError::ProgramLink { log }).is_ok());
    }

    #[test]
    fn caught_shader_error_names_stage_and_keeps_log() {
        let caught = Some("Shader parsing error: expected ';', found '}'");
        let err = check_scope(caught, |log| RenderError::ShaderCompile {
            stage: ShaderStage::Vertex,
            log,
        })
        .unwrap_err();

        match &err {
            RenderError::ShaderCompile { stage, log } => {
                assert_eq!(*stage, ShaderStage::Vertex);
                assert!(log.contains("expected ';'"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().starts_with("failed to compile vertex shader"));
    }

    #[test]
    fn caught_pipeline_error_becomes_link_failure() {
        let caught = Some("Entry point vs_main doesn't exist");
        let err = check_scope(caught, |log| RenderError::ProgramLink { log }).unwrap_err();
        assert!(matches!(err, RenderError::ProgramLink { ref log } if log.contains("vs_main")));
    }
}
