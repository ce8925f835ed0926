use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use cgmath::{Point3, Vector3};
use simulation::{ControlInput, FrameDriver, PhysicsReader, Scenario};
use wgpu::util::{DeviceExt, StagingBelt};
use winit::{
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    keyboard::PhysicalKey,
    window::Window,
};

use crate::camera::{Camera, CameraUniform, Framing, OrbitController};
use crate::controls;
use crate::geometry::{self, MeshData, Vertex};
use crate::profiler::FrameTimer;
use crate::scene::{self, Instance, LineVertex, ViewInstances};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const MAX_SPHERE_INSTANCES: usize = 16;
const MAX_BOX_INSTANCES: usize = 8;
const TITLE_REFRESH_FRAMES: u64 = 15;
const FOVY: f32 = 50.0;

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    num_indices: u32,
}

impl GpuMesh {
    fn new(device: &wgpu::Device, label: &str, mesh: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            num_indices: mesh.indices.len() as u32,
        }
    }
}

/// Camera and instance buffers for one half of the window.
struct View {
    camera: Camera,
    camera_uniform: CameraUniform,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    sphere_instances: wgpu::Buffer,
    box_instances: wgpu::Buffer,
    num_spheres: u32,
    num_boxes: u32,
}

impl View {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        camera: Camera,
    ) -> Self {
        let mut camera_uniform = CameraUniform::new();
        camera_uniform.update_view_proj(&camera);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Camera Buffer")),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some(&format!("{label} camera_bind_group")),
        });

        let instance_buffer = |name: &str, capacity: usize| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("{label} {name} Instance Buffer")),
                size: (capacity * std::mem::size_of::<Instance>()) as wgpu::BufferAddress,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };

        Self {
            camera,
            camera_uniform,
            camera_buffer,
            camera_bind_group,
            sphere_instances: instance_buffer("Sphere", MAX_SPHERE_INSTANCES),
            box_instances: instance_buffer("Box", MAX_BOX_INSTANCES),
            num_spheres: 0,
            num_boxes: 0,
        }
    }

    /// Queues this frame's camera and instance data on the staging belt.
    fn upload(
        &mut self,
        instances: &ViewInstances,
        belt: &mut StagingBelt,
        encoder: &mut wgpu::CommandEncoder,
        device: &wgpu::Device,
    ) {
        self.camera_uniform.update_view_proj(&self.camera);
        write_buffer(
            belt,
            encoder,
            device,
            &self.camera_buffer,
            bytemuck::cast_slice(&[self.camera_uniform]),
        );

        let spheres = truncated(&instances.spheres, MAX_SPHERE_INSTANCES, "sphere");
        let boxes = truncated(&instances.boxes, MAX_BOX_INSTANCES, "box");
        write_buffer(belt, encoder, device, &self.sphere_instances, bytemuck::cast_slice(spheres));
        write_buffer(belt, encoder, device, &self.box_instances, bytemuck::cast_slice(boxes));
        self.num_spheres = spheres.len() as u32;
        self.num_boxes = boxes.len() as u32;
    }
}

fn truncated<'i>(instances: &'i [Instance], capacity: usize, what: &str) -> &'i [Instance] {
    if instances.len() > capacity {
        log::warn!(
            "{} {what} instances exceed the buffer capacity of {capacity}; dropping the rest",
            instances.len()
        );
        &instances[..capacity]
    } else {
        instances
    }
}

fn write_buffer(
    belt: &mut StagingBelt,
    encoder: &mut wgpu::CommandEncoder,
    device: &wgpu::Device,
    target: &wgpu::Buffer,
    data: &[u8],
) {
    if let Some(size) = wgpu::BufferSize::new(data.len() as u64) {
        belt.write_buffer(encoder, target, 0, size, device)
            .copy_from_slice(data);
    }
}

fn create_depth_view(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn half_aspect(width: u32, height: u32) -> f32 {
    (width / 2).max(1) as f32 / height.max(1) as f32
}

pub struct State<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
    window: Arc<Window>,
    depth_view: wgpu::TextureView,
    mesh_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    sphere_mesh: GpuMesh,
    box_mesh: GpuMesh,
    primary: View,
    relative: View,
    trail_buffer: wgpu::Buffer,
    trail_capacity: usize,
    trail_len: u32,
    orbit: OrbitController,
    framing: Framing,
    scenario: Scenario,
    driver: FrameDriver,
    physics: PhysicsReader,
    frame_timer: FrameTimer,
    #[cfg(not(target_arch = "wasm32"))]
    last_render_time: std::time::Instant,
    #[cfg(target_arch = "wasm32")]
    performance: web_sys::Performance,
    #[cfg(target_arch = "wasm32")]
    last_render_time: f64, // performance.now(), in milliseconds
    staging_belt: StagingBelt,
}

impl<'a> State<'a> {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<State<'a>> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::all(),
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(Arc::clone(&window))
            .context("creating the window surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no GPU adapter can present to this window")?;
        log::info!("adapter: {:?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: adapter.limits(),
                    label: None,
                },
                None,
            )
            .await
            .context("requesting a GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("surface reports no supported formats")?;

        let max_texture_size = device.limits().max_texture_dimension_2d;
        let width = size.width.max(1).min(max_texture_size);
        let height = size.height.max(1).min(max_texture_size);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!("surface configured: {width}x{height} {surface_format:?}");

        let depth_view = create_depth_view(&device, &config);

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("camera_bind_group_layout"),
            });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let depth_stencil = wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        };

        let mesh_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_mesh",
                buffers: &[Vertex::desc(), Instance::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_mesh",
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(depth_stencil.clone()),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let line_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Trail Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_line",
                buffers: &[LineVertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_line",
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(depth_stencil),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let sphere_mesh = GpuMesh::new(&device, "Sphere", &geometry::generate_sphere(1.0, 16, 32));
        let box_mesh = GpuMesh::new(&device, "Box", &geometry::generate_box());

        let driver = FrameDriver::default();
        let physics = driver.physics();
        let scenario = driver.scenario();
        let framing = scene::framing_for(scenario);
        let arm_length = driver.config().arm_length;
        let aspect = half_aspect(width, height);

        let primary = View::new(
            &device,
            &camera_bind_group_layout,
            "Primary",
            Camera::new(
                Point3::new(0.0, 4.0, framing.distance),
                Point3::new(0.0, 0.0, 0.0),
                Vector3::unit_y(),
                aspect,
                FOVY,
                0.1,
                2000.0,
            ),
        );
        let relative = View::new(
            &device,
            &camera_bind_group_layout,
            "Relative",
            Camera::new(
                Point3::new(0.0, arm_length * 0.5, arm_length * 3.0),
                Point3::new(0.0, arm_length * 0.5, 0.0),
                Vector3::unit_y(),
                aspect,
                FOVY,
                0.1,
                100.0,
            ),
        );

        let trail_capacity = driver.state().trail.capacity();
        let trail_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Trail Buffer"),
            size: (trail_capacity * std::mem::size_of::<LineVertex>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        #[cfg(target_arch = "wasm32")]
        let performance = web_sys::window()
            .and_then(|win| win.performance())
            .context("window.performance is unavailable")?;
        #[cfg(target_arch = "wasm32")]
        let last_render_time = performance.now();
        #[cfg(not(target_arch = "wasm32"))]
        let last_render_time = std::time::Instant::now();

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            window,
            depth_view,
            mesh_pipeline,
            line_pipeline,
            sphere_mesh,
            box_mesh,
            primary,
            relative,
            trail_buffer,
            trail_capacity,
            trail_len: 0,
            orbit: OrbitController::new(framing),
            framing,
            scenario,
            driver,
            physics,
            frame_timer: FrameTimer::new(),
            #[cfg(target_arch = "wasm32")]
            performance,
            last_render_time,
            staging_belt: StagingBelt::new(64 * 1024),
        })
    }

    pub fn apply(&mut self, input: ControlInput) {
        if let Err(err) = self.driver.apply(input) {
            log::warn!("rejected control input {input:?}: {err}");
        }
    }

    pub fn input(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat,
                        ..
                    },
                ..
            } => match controls::key_to_input(*key, &self.driver) {
                // Holding play/pause or reset shouldn't flicker.
                Some(ControlInput::TogglePlay | ControlInput::Reset) if *repeat => true,
                Some(input) => {
                    self.apply(input);
                    true
                }
                None => false,
            },
            WindowEvent::MouseInput { state, button, .. } => {
                if *button == MouseButton::Left {
                    self.orbit.process_mouse_button(*state);
                    true
                } else {
                    false
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.orbit.process_cursor_move(*position);
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.orbit.process_scroll(*delta);
                true
            }
            _ => false,
        }
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            let max_texture_size = self.device.limits().max_texture_dimension_2d;
            let width = new_size.width.min(max_texture_size);
            let height = new_size.height.min(max_texture_size);

            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_view(&self.device, &self.config);

            let aspect = half_aspect(width, height);
            self.primary.camera.update_aspect_ratio(aspect);
            self.relative.camera.update_aspect_ratio(aspect);
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn elapsed(&mut self) -> Duration {
        let now = self.performance.now();
        let dt_ms = (now - self.last_render_time).max(0.0);
        self.last_render_time = now;
        Duration::from_secs_f64(dt_ms / 1000.0)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn elapsed(&mut self) -> Duration {
        let now = std::time::Instant::now();
        let dt = now - self.last_render_time;
        self.last_render_time = now;
        dt
    }

    fn update_title(&self) {
        let kinematics = self.driver.kinematics();
        self.window.set_title(&format!(
            "Light Clock | {} | β = {:.2}  γ = {:.3} | {} | {} bounces | {:.0} fps",
            self.scenario,
            kinematics.beta.get(),
            kinematics.gamma(),
            if self.driver.is_running() { "running" } else { "paused" },
            self.driver.state().bounces,
            self.frame_timer.fps(),
        ));
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let dt = self.elapsed();
        self.frame_timer.record(dt);

        for input in crate::take_pending_inputs() {
            self.apply(input);
        }
        if self.driver.scenario() != self.scenario {
            self.scenario = self.driver.scenario();
            self.framing = scene::framing_for(self.scenario);
            self.orbit.apply_framing(self.framing);
        }

        let (primary_instances, trail, target) = {
            let frame = self.driver.tick(dt);
            let trail = if frame.trail.is_enabled() {
                scene::trail_vertices(&frame)
            } else {
                Vec::new()
            };
            (
                scene::primary_instances(&frame),
                trail,
                scene::camera_target(&frame, &self.framing),
            )
        };
        let relative_instances =
            scene::relative_instances(&self.physics, self.driver.config().arm_length);
        self.orbit.update_camera(&mut self.primary.camera, target);

        if self.driver.frame_count() % TITLE_REFRESH_FRAMES == 1 {
            self.update_title();
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.primary
            .upload(&primary_instances, &mut self.staging_belt, &mut encoder, &self.device);
        self.relative
            .upload(&relative_instances, &mut self.staging_belt, &mut encoder, &self.device);
        let trail = &trail[..trail.len().min(self.trail_capacity)];
        write_buffer(
            &mut self.staging_belt,
            &mut encoder,
            &self.device,
            &self.trail_buffer,
            bytemuck::cast_slice(trail),
        );
        self.trail_len = trail.len() as u32;

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Split View Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.01,
                            g: 0.01,
                            b: 0.03,
                            a: 1.0,
                        }),
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
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let half_width = (self.config.width / 2).max(1) as f32;
            let height = self.config.height as f32;

            for (x, target) in [(0.0, &self.primary), (half_width, &self.relative)] {
                render_pass.set_viewport(x, 0.0, half_width, height, 0.0, 1.0);
                render_pass.set_bind_group(0, &target.camera_bind_group, &[]);

                render_pass.set_pipeline(&self.mesh_pipeline);
                for (mesh, instances, count) in [
                    (&self.sphere_mesh, &target.sphere_instances, target.num_spheres),
                    (&self.box_mesh, &target.box_instances, target.num_boxes),
                ] {
                    if count == 0 {
                        continue;
                    }
                    render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    render_pass.set_vertex_buffer(1, instances.slice(..));
                    render_pass
                        .set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                    render_pass.draw_indexed(0..mesh.num_indices, 0, 0..count);
                }
            }

            if self.trail_len >= 2 {
                render_pass.set_viewport(0.0, 0.0, half_width, height, 0.0, 1.0);
                render_pass.set_bind_group(0, &self.primary.camera_bind_group, &[]);
                render_pass.set_pipeline(&self.line_pipeline);
                render_pass.set_vertex_buffer(0, self.trail_buffer.slice(..));
                render_pass.draw(0..self.trail_len, 0..1);
            }
        }

        self.staging_belt.finish();
        self.queue.submit(std::iter::once(encoder.finish()));
        self.staging_belt.recall();

        output.present();

        Ok(())
    }
}
