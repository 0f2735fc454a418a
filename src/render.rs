use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use std::sync::Arc;
use winit::window::Window;

use crate::config::*;
use crate::game::GameState;
use crate::gpu::{
    DEPTH_FORMAT, create_depth_texture, create_index_buffer, create_uniform_bind_group,
    create_uniform_buffer, create_vertex_buffer, uniform_bind_group_layout,
};
use crate::mesh::{Mesh, Vertex};

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct CameraUniform {
    view_proj: [[f32; 4]; 4],
    sun_dir: [f32; 4],
    light: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ModelUniform {
    transform: [[f32; 4]; 4],
}

pub struct RenderContext {
    pub window: Arc<Window>,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
}

impl RenderContext {
    pub async fn new(window: Arc<Window>) -> Self {
        #[cfg(target_arch = "wasm32")]
        let (width, height) = {
            let web_window = web_sys::window().expect("No window");
            let dpr = web_window.device_pixel_ratio();
            let w = (web_window.inner_width().unwrap().as_f64().unwrap() * dpr) as u32;
            let h = (web_window.inner_height().unwrap().as_f64().unwrap() * dpr) as u32;
            (w.max(1), h.max(1))
        };

        #[cfg(not(target_arch = "wasm32"))]
        let (width, height) = {
            let size = window.inner_size();
            (size.width.max(1), size.height.max(1))
        };

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone()).unwrap();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to find adapter");

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .expect("Failed to create device");

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        Self {
            window,
            surface,
            device,
            queue,
            config,
        }
    }
}

struct MeshBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl MeshBuffers {
    fn upload(device: &wgpu::Device, mesh: &Mesh, label: &str) -> Vec<Self> {
        mesh.submeshes
            .iter()
            .filter(|s| !s.vertices.is_empty() && !s.indices.is_empty())
            .map(|s| Self {
                vertex_buffer: create_vertex_buffer(device, &s.vertices, label),
                index_buffer: create_index_buffer(device, &s.indices, label),
                index_count: s.indices.len() as u32,
            })
            .collect()
    }

    fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// A set of submeshes drawn with one model transform.
struct Drawable {
    meshes: Vec<MeshBuffers>,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
}

impl Drawable {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, mesh: &Mesh, label: &str) -> Self {
        let model_buffer = create_uniform_buffer(
            device,
            &ModelUniform {
                transform: Mat4::IDENTITY.to_cols_array_2d(),
            },
            label,
        );
        let model_bind_group = create_uniform_bind_group(device, layout, &model_buffer, label);
        Self {
            meshes: MeshBuffers::upload(device, mesh, label),
            model_buffer,
            model_bind_group,
        }
    }

    fn set_transform(&self, queue: &wgpu::Queue, transform: Mat4) {
        queue.write_buffer(
            &self.model_buffer,
            0,
            bytemuck::bytes_of(&ModelUniform {
                transform: transform.to_cols_array_2d(),
            }),
        );
    }

    fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_bind_group(1, &self.model_bind_group, &[]);
        for mesh in &self.meshes {
            mesh.draw(pass);
        }
    }
}

pub struct Renderer {
    pub ctx: RenderContext,
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    model_layout: wgpu::BindGroupLayout,
    depth_view: wgpu::TextureView,
    scene: Drawable,
    player: Drawable,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, player_size: f32) -> Self {
        let ctx = RenderContext::new(window).await;
        let device = &ctx.device;

        let camera_layout = uniform_bind_group_layout(device, "Camera Layout");
        let model_layout = uniform_bind_group_layout(device, "Model Layout");

        let camera_buffer = create_uniform_buffer(
            device,
            &CameraUniform {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
                sun_dir: SUN_POSITION.normalize().extend(0.0).to_array(),
                light: [AMBIENT_INTENSITY, SUN_INTENSITY, 0.0, 0.0],
            },
            "Camera Uniform",
        );
        let camera_bind_group =
            create_uniform_bind_group(device, &camera_layout, &camera_buffer, "Camera Bind Group");

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&camera_layout, &model_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Scene Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let (_, depth_view) = create_depth_texture(device, ctx.config.width, ctx.config.height);

        let scene = Drawable::new(device, &model_layout, &Mesh::default(), "Scene");
        let player = Drawable::new(
            device,
            &model_layout,
            &Mesh::cube(player_size, PLAYER_COLOR),
            "Player",
        );

        Self {
            ctx,
            pipeline,
            camera_buffer,
            camera_bind_group,
            model_layout,
            depth_view,
            scene,
            player,
        }
    }

    /// Replaces the scene geometry once the asset has loaded.
    pub fn upload_scene(&mut self, mesh: &Mesh) {
        self.scene = Drawable::new(&self.ctx.device, &self.model_layout, mesh, "Scene");
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.ctx
                .surface
                .configure(&self.ctx.device, &self.ctx.config);

            let (_, depth_view) = create_depth_texture(&self.ctx.device, width, height);
            self.depth_view = depth_view;
        }
    }

    pub fn render_frame(&mut self, game: &GameState) -> Result<(), wgpu::SurfaceError> {
        let aspect = self.ctx.config.width as f32 / self.ctx.config.height as f32;
        let projection =
            Mat4::perspective_rh(CAMERA_FOV_DEGREES.to_radians(), aspect, CAMERA_NEAR, CAMERA_FAR);
        let view_proj = projection * game.camera.view_matrix();

        self.ctx.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform {
                view_proj: view_proj.to_cols_array_2d(),
                sun_dir: SUN_POSITION.normalize().extend(0.0).to_array(),
                light: [AMBIENT_INTENSITY, SUN_INTENSITY, 0.0, 0.0],
            }),
        );
        self.player
            .set_transform(&self.ctx.queue, game.player.model_matrix());

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(BACKGROUND_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
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
                multiview_mask: None,
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.camera_bind_group, &[]);
            self.scene.draw(&mut pass);
            self.player.draw(&mut pass);
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    pub fn request_redraw(&self) {
        self.ctx.window.request_redraw();
    }

    pub fn width(&self) -> u32 {
        self.ctx.config.width
    }

    pub fn height(&self) -> u32 {
        self.ctx.config.height
    }
}
