//! The wgpu engine behind the scene.
//!
//! [`Context`] owns the GPU device, the surface bound to the canvas, the camera
//! and light uniforms, the pipelines and everything that has been added to the
//! scene. It is the production [`SceneBackend`].

use std::{iter, sync::Arc};

use anyhow::Context as _;
use instant::Duration;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{
    backend::SceneBackend,
    camera::{self, CameraResources, CameraUniform, Projection},
    config::SceneConfig,
    data_structures::{
        batch::InstanceBatch,
        instance::Instance,
        model::{DrawModel, LineSet},
        texture::Texture,
    },
    pipelines::{
        basic::mk_mesh_pipeline,
        light::{LightResources, LightUniform},
        line::mk_line_pipeline,
    },
    resources::{cube_model, mesh::line_vertices, plane_model},
    scene::{FreeCamera, HemisphericLight, Mesh, Shape},
};

#[derive(Debug)]
pub struct Pipelines {
    pub mesh: wgpu::RenderPipeline,
    pub line: wgpu::RenderPipeline,
}

#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    is_surface_configured: bool,
    pub clear_colour: wgpu::Color,
    pub camera: CameraResources,
    pub projection: Projection,
    pub light: LightResources,
    pub pipelines: Pipelines,
    pub boxes: InstanceBatch,
    pub grounds: InstanceBatch,
    pub lines: Vec<LineSet>,
}

impl Context {
    pub async fn new(window: Arc<Window>, scene_config: &SceneConfig) -> anyhow::Result<Self> {
        let size = window.inner_size();

        // The instance is a handle to our GPU
        // BackendBit::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("Cannot create a surface for the canvas")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No graphics adapter can draw to the canvas")?;
        log::info!("Device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features, so if
                // we're building for the web we'll have to disable some.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                ..Default::default()
            })
            .await
            .context("The graphics adapter refused to open a device")?;

        log::info!("Surface");
        let surface_caps = surface.get_capabilities(&adapter);
        // The shaders output linear colours, so prefer an sRGB surface.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("The surface supports no texture format")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        // Replaced by the scene camera in `add_camera`.
        let camera = camera::Camera::looking_at(
            scene_config.camera_position,
            scene_config.camera_target,
        );
        let projection =
            camera::Projection::new(config.width, config.height, cgmath::Rad(0.8), 0.1, 1000.0);
        let camera_controller = camera::CameraController::new(10.0, 0.4);

        let mut camera_uniform = CameraUniform::new();
        camera_uniform.update_view_proj(&camera, &projection);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

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

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        let depth_texture =
            Texture::create_depth_texture(&device, [config.width, config.height], "depth_texture");

        let light = LightResources::new(LightUniform::dark(), &device);

        let pipelines = Pipelines {
            mesh: mk_mesh_pipeline(
                &device,
                &config,
                &camera_bind_group_layout,
                &light.bind_group_layout,
            ),
            line: mk_line_pipeline(&device, &config, &camera_bind_group_layout),
        };

        let camera = CameraResources {
            camera,
            controller: camera_controller,
            uniform: camera_uniform,
            buffer: camera_buffer,
            bind_group: camera_bind_group,
            bind_group_layout: camera_bind_group_layout,
        };

        let boxes = InstanceBatch::new(cube_model(&device));
        let grounds = InstanceBatch::new(plane_model(&device));

        let mut ctx = Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            is_surface_configured: false,
            clear_colour: scene_config.clear_colour,
            camera,
            projection,
            light,
            pipelines,
            boxes,
            grounds,
            lines: Vec::new(),
        };
        ctx.resize();
        Ok(ctx)
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    fn update_camera(&mut self, dt: Duration) {
        self.camera
            .controller
            .update(&mut self.camera.camera, dt);
        self.camera
            .uniform
            .update_view_proj(&self.camera.camera, &self.projection);
        self.queue.write_buffer(
            &self.camera.buffer,
            0,
            bytemuck::cast_slice(&[self.camera.uniform]),
        );
    }

    fn draw(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.boxes.sync(&self.device);
        self.grounds.sync(&self.device);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.pipelines.mesh);
            for batch in [&self.grounds, &self.boxes] {
                let Some(instance_buffer) = batch.instance_buffer() else {
                    continue;
                };
                render_pass.draw_model_instanced(
                    &batch.model,
                    instance_buffer,
                    0..batch.len() as u32,
                    &self.camera.bind_group,
                    &self.light.bind_group,
                );
            }

            render_pass.set_pipeline(&self.pipelines.line);
            for lines in &self.lines {
                render_pass.draw_lines(lines, &self.camera.bind_group);
            }
        }

        self.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

impl SceneBackend for Context {
    type Canvas = Arc<Window>;

    async fn attach(canvas: Arc<Window>, config: &SceneConfig) -> anyhow::Result<Self> {
        Context::new(canvas, config).await
    }

    fn add_camera(&mut self, camera: &FreeCamera) {
        self.camera.camera = camera::Camera::looking_at(camera.position, camera.target);
        self.camera
            .uniform
            .update_view_proj(&self.camera.camera, &self.projection);
        self.queue.write_buffer(
            &self.camera.buffer,
            0,
            bytemuck::cast_slice(&[self.camera.uniform]),
        );
    }

    fn add_light(&mut self, light: &HemisphericLight) {
        self.light.update(&self.queue, light);
    }

    fn add_mesh(&mut self, mesh: &Mesh) {
        match &mesh.shape {
            Shape::Box { .. } => {
                if let Some(instance) = Instance::from_mesh(mesh) {
                    self.boxes.push(instance);
                }
            }
            Shape::Ground { .. } => {
                if let Some(instance) = Instance::from_mesh(mesh) {
                    self.grounds.push(instance);
                }
            }
            Shape::Lines { .. } => {
                let vertices = line_vertices(mesh);
                if vertices.is_empty() {
                    log::warn!("Line mesh {} has no segments", mesh.name);
                    return;
                }
                self.lines
                    .push(LineSet::new(&self.device, &mesh.name, &vertices));
            }
        }
    }

    fn render(&mut self, dt: Duration) -> anyhow::Result<()> {
        self.update_camera(dt);
        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }
        match self.draw() {
            Ok(()) => Ok(()),
            // Reconfigure the surface if it's lost or outdated
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.resize();
                Ok(())
            }
            Err(e) => Err(e).context("Unable to render"),
        }
    }

    fn resize(&mut self) {
        let size = self.window.inner_size();
        if size.width > 0 && size.height > 0 {
            self.config.width = size.width;
            self.config.height = size.height;
            self.is_surface_configured = true;
            self.projection.resize(size.width, size.height);
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = Texture::create_depth_texture(
                &self.device,
                [self.config.width, self.config.height],
                "depth_texture",
            );
            log::debug!("Surface resized to {}x{}", size.width, size.height);
        }
    }
}
