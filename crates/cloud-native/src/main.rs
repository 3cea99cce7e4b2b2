mod sim_tracker;

use std::time::Instant;
use wgpu::util::DeviceExt;
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use cloud_core::{GestureControl, Pattern, RenderFrame, Session, SessionConfig};
use glam::{EulerRot, Mat4, Vec3};
use sim_tracker::SimulatedTracker;

static PARTICLES_WGSL: &str = include_str!("../shaders/particles.wgsl");

const CAMERA_DISTANCE: f32 = 18.0;
const POINT_SIZE: f32 = 0.12;
const TINT_PRESETS: [&str; 5] = ["#ffffff", "#ff6ec7", "#6ecbff", "#ffd36e", "#8affa1"];

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    tint: [f32; 4],
    params: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct InstanceData {
    pos: [f32; 3],
    size: f32,
    color: [f32; 4],
}

struct GpuState<'w> {
    window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    quad_vb: wgpu::Buffer,
    instance_vb: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    instances: Vec<InstanceData>,
    width: u32,
    height: u32,
}

impl<'w> GpuState<'w> {
    async fn new(window: &'w winit::window::Window, particle_count: usize) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .first()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("particles"),
            source: wgpu::ShaderSource::Wgsl(PARTICLES_WGSL.into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniforms"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        // Quad corners for two triangles
        let quad_vertices: [f32; 12] = [
            -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
        ];
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&quad_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let instance_vb = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_vb"),
            size: (std::mem::size_of::<InstanceData>() * particle_count.max(1)) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let vertex_buffers = [
            // slot 0: quad corners
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 2) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                }],
            },
            // slot 1: one particle per instance
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<InstanceData>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 1,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32,
                        offset: 12,
                        shader_location: 2,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x4,
                        offset: 16,
                        shader_location: 3,
                    },
                ],
            },
        ];
        // Additive blending; the fragment stage writes premultiplied color.
        let additive = wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        };
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState {
                        color: additive,
                        alpha: additive,
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            pipeline,
            uniform_buffer,
            quad_vb,
            instance_vb,
            bind_group,
            instances: Vec::with_capacity(particle_count),
            width: size.width.max(1),
            height: size.height.max(1),
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.width = new_size.width;
        self.height = new_size.height;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    fn view_proj(&self) -> [[f32; 4]; 4] {
        let aspect = self.width as f32 / self.height as f32;
        let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, aspect, 0.1, 200.0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, CAMERA_DISTANCE), Vec3::ZERO, Vec3::Y);
        (proj * view).to_cols_array_2d()
    }

    fn render(&mut self, frame: &RenderFrame<'_>) -> Result<(), wgpu::SurfaceError> {
        let surface_tex = self.surface.get_current_texture()?;
        let view = surface_tex
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let [rx, ry, rz] = frame.rotation;
        let model = Mat4::from_euler(EulerRot::XYZ, rx, ry, rz);
        let tint = frame.tint.to_array();
        self.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: self.view_proj(),
                model: model.to_cols_array_2d(),
                tint: [tint[0], tint[1], tint[2], 1.0],
                params: [POINT_SIZE, 0.0, 0.0, 0.0],
            }),
        );

        // Full overwrite of the instance buffer every frame
        self.instances.clear();
        self.instances.extend(
            frame
                .positions
                .chunks_exact(3)
                .zip(frame.colors.chunks_exact(3))
                .zip(frame.sizes)
                .map(|((p, c), s)| InstanceData {
                    pos: [p[0], p[1], p[2]],
                    size: *s,
                    color: [c[0], c[1], c[2], 1.0],
                }),
        );
        self.queue
            .write_buffer(&self.instance_vb, 0, bytemuck::cast_slice(&self.instances));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("rpass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.0,
                            g: 0.0,
                            b: 0.02,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.bind_group, &[]);
            rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
            rpass.set_vertex_buffer(1, self.instance_vb.slice(..));
            rpass.draw(0..6, 0..self.instances.len() as u32);
        }
        self.queue.submit(Some(encoder.finish()));
        surface_tex.present();
        Ok(())
    }
}

/// Keyboard commands understood by the native window.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Command {
    SelectPattern(Pattern),
    ToggleGestures,
    ToggleHand,
    CycleTint,
    ToggleRotationProfile,
    Quit,
}

fn command_for_key(key: &Key) -> Option<Command> {
    match key {
        Key::Named(NamedKey::Escape) => Some(Command::Quit),
        Key::Character(c) => match c.to_ascii_lowercase().as_str() {
            "g" => Some(Command::ToggleGestures),
            "h" => Some(Command::ToggleHand),
            "c" => Some(Command::CycleTint),
            "r" => Some(Command::ToggleRotationProfile),
            digit => {
                let n: usize = digit.parse().ok()?;
                let pattern = Pattern::ALL.get(n.checked_sub(1)?)?;
                Some(Command::SelectPattern(*pattern))
            }
        },
        _ => None,
    }
}

/// Everything the event loop mutates apart from the GPU state.
struct App {
    session: Session,
    control: GestureControl<SimulatedTracker>,
    tint_index: usize,
}

impl App {
    fn new() -> anyhow::Result<Self> {
        let session = Session::new(SessionConfig::default())?;
        let mut app = Self {
            session,
            control: GestureControl::new(SimulatedTracker::new()),
            tint_index: 0,
        };
        app.enable_gestures();
        Ok(app)
    }

    fn enable_gestures(&mut self) {
        match pollster::block_on(self.control.enable()) {
            Ok(()) => self.session.set_gesture_enabled(true),
            Err(e) => log::warn!("gesture control unavailable: {}", e),
        }
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::SelectPattern(pattern) => self.session.select_pattern(pattern),
            Command::ToggleGestures => {
                if self.session.gesture_enabled() {
                    self.control.disable(&mut self.session);
                } else {
                    self.enable_gestures();
                }
            }
            Command::ToggleHand => {
                self.control.tracker().toggle_present();
            }
            Command::CycleTint => {
                self.tint_index = (self.tint_index + 1) % TINT_PRESETS.len();
                if let Err(e) = self.session.set_tint_hex(TINT_PRESETS[self.tint_index]) {
                    log::warn!("bad tint preset: {}", e);
                }
            }
            Command::ToggleRotationProfile => {
                let next = self.session.config().gesture.rotation.toggled();
                self.session.set_rotation_profile(next);
            }
            Command::Quit => {}
        }
    }

    fn title(&self) -> String {
        format!(
            "Gesture Cloud: {} (gestures {})",
            self.session.pattern().name(),
            if self.session.gesture_enabled() { "on" } else { "off" }
        )
    }

    /// One render tick: apply the newest camera frame, then smooth.
    fn step(&mut self) {
        self.control.pump(&mut self.session);
        self.session.tick();
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut app = App::new()?;

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title(app.title())
        .build(&event_loop)?;

    let mut state = pollster::block_on(GpuState::new(&window, app.session.particle_count()))?;
    let started = Instant::now();
    let mut frames: u64 = 0;
    log::info!("controls: 1-8 pattern, G gestures, H hand, C tint, R rotation profile, wheel pinch");

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::Resized(size),
            ..
        } => state.resize(size),
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => elwt.exit(),
        Event::WindowEvent {
            event: WindowEvent::CursorMoved { position, .. },
            ..
        } => {
            let x = position.x as f32 / state.width as f32;
            let y = position.y as f32 / state.height as f32;
            app.control.tracker().set_palm(x, y);
        }
        Event::WindowEvent {
            event: WindowEvent::MouseWheel { delta, .. },
            ..
        } => {
            let steps = match delta {
                MouseScrollDelta::LineDelta(_, y) => y,
                MouseScrollDelta::PixelDelta(p) => (p.y / 40.0) as f32,
            };
            app.control.tracker().adjust_pinch(steps);
        }
        Event::WindowEvent {
            event:
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key,
                            state: ElementState::Pressed,
                            repeat: false,
                            ..
                        },
                    ..
                },
            ..
        } => match command_for_key(&logical_key) {
            Some(Command::Quit) => elwt.exit(),
            Some(command) => {
                app.apply(command);
                state.window.set_title(&app.title());
            }
            None => {}
        },
        Event::AboutToWait => {
            app.step();
            match state.render(&app.session.frame()) {
                Ok(_) => state.window.request_redraw(),
                Err(wgpu::SurfaceError::Lost) => state.resize(state.window.inner_size()),
                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                Err(_) => {}
            }
            frames += 1;
            if frames % 600 == 0 {
                let fps = frames as f64 / started.elapsed().as_secs_f64();
                log::debug!("avg fps {:.1}", fps);
            }
        }
        _ => {}
    })?;
    Ok(())
}
