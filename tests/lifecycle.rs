use t_prism::engine::graphics::{BufferKind, Frame, FrameOutcome, GpuBackend, Lifecycle, Renderer, ShaderStage};
use t_prism::engine::{RenderError, Result};
use t_prism::scene::MeshVariant;
use t_prism::DemoConfig;
use winit::dpi::PhysicalSize;

#[derive(Debug)]
struct MockBuffer {
    kind: BufferKind,
    len: usize,
}

#[derive(Debug)]
struct MockShader(ShaderStage);

#[derive(Debug)]
struct MockProgram;

#[derive(Debug, Clone, PartialEq)]
struct DrawCall {
    index_count: u32,
    vertex_bytes: usize,
    index_bytes: usize,
    projection: [[f32; 4]; 4],
}

/// Counts live allocations and records draws instead of talking to a GPU.
#[derive(Default)]
struct CountingBackend {
    live_buffers: usize,
    live_shaders: usize,
    live_programs: usize,
    fail_stage: Option<ShaderStage>,
    fail_link: bool,
    fail_buffer: Option<BufferKind>,
    surface_size: Option<PhysicalSize<u32>>,
    layout_stride: Option<u64>,
    draws: Vec<DrawCall>,
}

impl CountingBackend {
    fn live(&self) -> usize {
        self.live_buffers + self.live_shaders + self.live_programs
    }
}

impl GpuBackend for CountingBackend {
    type Buffer = MockBuffer;
    type Shader = MockShader;
    type Program = MockProgram;

    fn create_buffer(&mut self, label: &str, contents: &[u8], kind: BufferKind) -> Result<MockBuffer> {
        if self.fail_buffer == Some(kind) {
            return Err(RenderError::Allocation {
                label: label.to_string(),
                log: "out of memory".to_string(),
            });
        }
        self.live_buffers += 1;
        Ok(MockBuffer {
            kind,
            len: contents.len(),
        })
    }

    fn compile_shader(&mut self, stage: ShaderStage, _source: &str) -> Result<MockShader> {
        if self.fail_stage == Some(stage) {
            return Err(RenderError::ShaderCompile {
                stage,
                log: "1:1: unexpected token".to_string(),
            });
        }
        self.live_shaders += 1;
        Ok(MockShader(stage))
    }

    fn link_program(
        &mut self,
        vertex: &MockShader,
        fragment: &MockShader,
        layout: &wgpu::VertexBufferLayout<'static>,
    ) -> Result<MockProgram> {
        assert_eq!(vertex.0, ShaderStage::Vertex);
        assert_eq!(fragment.0, ShaderStage::Fragment);
        if self.fail_link {
            return Err(RenderError::ProgramLink {
                log: "entry point not found".to_string(),
            });
        }
        self.layout_stride = Some(layout.array_stride);
        self.live_programs += 1;
        Ok(MockProgram)
    }

    fn resize_surface(&mut self, size: PhysicalSize<u32>) {
        self.surface_size = Some(size);
    }

    fn draw_frame(&mut self, frame: &Frame<'_, Self>) -> Result<FrameOutcome> {
        assert_eq!(frame.vertex_buffer.kind, BufferKind::Vertex);
        assert_eq!(frame.index_buffer.kind, BufferKind::Index);
        self.draws.push(DrawCall {
            index_count: frame.index_count,
            vertex_bytes: frame.vertex_buffer.len,
            index_bytes: frame.index_buffer.len,
            projection: frame.transforms.projection,
        });
        Ok(FrameOutcome::Presented)
    }

    fn release_shader(&mut self, _shader: MockShader) {
        self.live_shaders -= 1;
    }

    fn release_buffer(&mut self, _buffer: MockBuffer) {
        self.live_buffers -= 1;
    }

    fn release_program(&mut self, _program: MockProgram) {
        self.live_programs -= 1;
    }
}

fn loaded(backend: &mut CountingBackend, width: u32, height: u32) -> Renderer<CountingBackend> {
    let mut renderer = Renderer::new(&DemoConfig::default());
    renderer
        .on_load(backend, PhysicalSize::new(width, height))
        .expect("load should succeed");
    renderer
}

fn aspect(renderer: &Renderer<CountingBackend>) -> f32 {
    let projection = renderer.camera().projection();
    projection.y_axis.y / projection.x_axis.x
}

#[test]
fn load_uploads_mesh_and_discards_shader_objects() {
    let mut backend = CountingBackend::default();
    let renderer = loaded(&mut backend, 800, 600);

    assert_eq!(renderer.lifecycle(), Lifecycle::Ready);
    assert_eq!(backend.live_buffers, 2);
    assert_eq!(backend.live_programs, 1);
    assert_eq!(backend.live_shaders, 0);
    assert_eq!(backend.layout_stride, Some(12));
}

#[test]
fn frame_draws_all_36_indices() {
    let mut backend = CountingBackend::default();
    let mut renderer = loaded(&mut backend, 800, 600);

    assert_eq!(renderer.on_render_frame(&mut backend).unwrap(), FrameOutcome::Presented);
    assert_eq!(renderer.on_render_frame(&mut backend).unwrap(), FrameOutcome::Presented);

    assert_eq!(backend.draws.len(), 2);
    let draw = &backend.draws[0];
    assert_eq!(draw.index_count, 36);
    assert_eq!(draw.index_count, renderer.mesh().index_count());
    assert_eq!(renderer.mesh().triangle_count(), 12);
    assert_eq!(draw.vertex_bytes, 16 * 3 * 4);
    assert_eq!(draw.index_bytes, 36 * 4);
}

#[test]
fn closed_variant_draws_its_own_index_count() {
    let mut backend = CountingBackend::default();
    let config = DemoConfig {
        mesh: MeshVariant::Closed,
        ..DemoConfig::default()
    };
    let mut renderer = Renderer::new(&config);
    renderer.on_load(&mut backend, PhysicalSize::new(800, 600)).unwrap();
    renderer.on_render_frame(&mut backend).unwrap();

    assert_eq!(backend.draws[0].index_count, 72);
}

#[test]
fn teardown_returns_allocation_counts_to_zero() {
    let mut backend = CountingBackend::default();
    let mut renderer = loaded(&mut backend, 800, 600);
    renderer.on_render_frame(&mut backend).unwrap();

    renderer.on_unload(&mut backend);
    assert_eq!(backend.live(), 0);
    assert_eq!(renderer.lifecycle(), Lifecycle::Disposed);

    renderer.on_unload(&mut backend);
    assert_eq!(backend.live(), 0);
}

#[test]
fn unload_before_load_leaves_renderer_loadable() {
    let mut backend = CountingBackend::default();
    let mut renderer: Renderer<CountingBackend> = Renderer::new(&DemoConfig::default());

    renderer.on_unload(&mut backend);
    assert_eq!(renderer.lifecycle(), Lifecycle::Uninitialized);

    renderer.on_load(&mut backend, PhysicalSize::new(800, 600)).unwrap();
    assert_eq!(renderer.lifecycle(), Lifecycle::Ready);
    assert_eq!(backend.live_buffers, 2);
}

#[test]
fn render_outside_ready_state_is_rejected() {
    let mut backend = CountingBackend::default();
    let mut renderer: Renderer<CountingBackend> = Renderer::new(&DemoConfig::default());
    assert!(matches!(renderer.on_render_frame(&mut backend), Err(RenderError::NotReady)));

    renderer.on_load(&mut backend, PhysicalSize::new(800, 600)).unwrap();
    renderer.on_unload(&mut backend);
    assert!(matches!(renderer.on_render_frame(&mut backend), Err(RenderError::NotReady)));
    assert!(backend.draws.is_empty());
}

#[test]
fn second_load_is_rejected() {
    let mut backend = CountingBackend::default();
    let mut renderer = loaded(&mut backend, 800, 600);
    let err = renderer.on_load(&mut backend, PhysicalSize::new(800, 600)).unwrap_err();
    assert!(matches!(err, RenderError::AlreadyLoaded));
    assert_eq!(backend.live_buffers, 2);
}

#[test]
fn fragment_compile_failure_aborts_load_without_leaks() {
    let mut backend = CountingBackend {
        fail_stage: Some(ShaderStage::Fragment),
        ..CountingBackend::default()
    };
    let mut renderer: Renderer<CountingBackend> = Renderer::new(&DemoConfig::default());
    let err = renderer.on_load(&mut backend, PhysicalSize::new(800, 600)).unwrap_err();

    assert!(matches!(err, RenderError::ShaderCompile { stage: ShaderStage::Fragment, .. }));
    assert!(err.to_string().contains("fragment"));
    assert!(err.to_string().contains("unexpected token"));
    assert_eq!(renderer.lifecycle(), Lifecycle::Uninitialized);
    assert_eq!(backend.live(), 0);
}

#[test]
fn vertex_compile_failure_names_vertex_stage() {
    let mut backend = CountingBackend {
        fail_stage: Some(ShaderStage::Vertex),
        ..CountingBackend::default()
    };
    let mut renderer: Renderer<CountingBackend> = Renderer::new(&DemoConfig::default());
    let err = renderer.on_load(&mut backend, PhysicalSize::new(800, 600)).unwrap_err();

    assert!(matches!(err, RenderError::ShaderCompile { stage: ShaderStage::Vertex, .. }));
    assert_eq!(backend.live(), 0);
}

#[test]
fn link_failure_releases_everything() {
    let mut backend = CountingBackend {
        fail_link: true,
        ..CountingBackend::default()
    };
    let mut renderer: Renderer<CountingBackend> = Renderer::new(&DemoConfig::default());
    let err = renderer.on_load(&mut backend, PhysicalSize::new(800, 600)).unwrap_err();

    assert!(matches!(err, RenderError::ProgramLink { .. }));
    assert_eq!(backend.live(), 0);
}

#[test]
fn index_buffer_allocation_failure_releases_vertex_buffer() {
    let mut backend = CountingBackend {
        fail_buffer: Some(BufferKind::Index),
        ..CountingBackend::default()
    };
    let mut renderer: Renderer<CountingBackend> = Renderer::new(&DemoConfig::default());
    let err = renderer.on_load(&mut backend, PhysicalSize::new(800, 600)).unwrap_err();

    assert!(matches!(err, RenderError::Allocation { .. }));
    assert_eq!(backend.live(), 0);
}

#[test]
fn resize_updates_projection_only_when_aspect_changes() {
    let mut backend = CountingBackend::default();
    let mut renderer = loaded(&mut backend, 800, 600);
    assert!((aspect(&renderer) - 800.0 / 600.0).abs() < 1e-5);

    let view = renderer.camera().view();
    let model = renderer.camera().model();
    let at_800x600 = renderer.camera().projection();

    renderer.on_resize(&mut backend, PhysicalSize::new(1024, 768));
    assert_eq!(backend.surface_size, Some(PhysicalSize::new(1024, 768)));
    assert!((aspect(&renderer) - 1024.0 / 768.0).abs() < 1e-5);
    assert_eq!(renderer.camera().projection(), at_800x600);

    renderer.on_resize(&mut backend, PhysicalSize::new(1024, 600));
    assert!((aspect(&renderer) - 1024.0 / 600.0).abs() < 1e-5);
    assert_ne!(renderer.camera().projection(), at_800x600);

    assert_eq!(renderer.camera().view(), view);
    assert_eq!(renderer.camera().model(), model);

    renderer.on_render_frame(&mut backend).unwrap();
    let drawn = backend.draws.last().unwrap();
    assert_eq!(drawn.projection, renderer.camera().projection().to_cols_array_2d());
}

#[test]
fn minimized_window_keeps_last_projection() {
    let mut backend = CountingBackend::default();
    let mut renderer = loaded(&mut backend, 800, 600);
    let before = renderer.camera().projection();

    renderer.on_resize(&mut backend, PhysicalSize::new(0, 0));
    assert_eq!(renderer.camera().projection(), before);
    assert_eq!(backend.surface_size, None);
}
