use std::sync::Arc;

use glam::Mat4;
use tracing::{debug, info};
use wgpu::util::DeviceExt;
use winit::window::Window;

use conch3d::config::{LightingConfig, ViewerConfig};
use conch3d::error::ViewerError;
use conch3d::math::TriangleMesh;

use crate::renderer::camera::{Camera, CameraUniform, model_matrix};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub position: [f32; 3],
    pub cos_range: f32,
    pub direction: [f32; 3],
    pub focus: f32,
    pub color: [f32; 4],
    pub ambient: f32,
    pub _padding: [f32; 3],
}

impl LightUniform {
    pub fn from_config(config: &LightingConfig) -> Self {
        Self {
            position: config.position,
            cos_range: config.range.to_radians().cos(),
            direction: config.direction,
            focus: config.focus,
            color: config.color,
            ambient: config.ambient,
            _padding: [0.0; 3],
        }
    }
}

enum IndexBuffer {
    None,
    Indexed {
        buffer: wgpu::Buffer,
        format: wgpu::IndexFormat,
        count: u32,
    },
}

/// GPU copy of the current mesh. Replaced wholesale on every upload.
pub struct SurfaceBuffers {
    vertex_buffer: wgpu::Buffer,
    normal_buffer: wgpu::Buffer,
    index: IndexBuffer,
    vertex_count: u32,
}

impl SurfaceBuffers {
    pub fn from_mesh(device: &wgpu::Device, mesh: &TriangleMesh) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Surface Vertex Buffer"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let normal_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Surface Normal Buffer"),
            contents: bytemuck::cast_slice(&mesh.normals),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index = match index_data(mesh) {
            None => IndexBuffer::None,
            Some((bytes, format, count)) => IndexBuffer::Indexed {
                buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Surface Index Buffer"),
                    contents: &bytes,
                    usage: wgpu::BufferUsages::INDEX,
                }),
                format,
                count,
            },
        };

        Self {
            vertex_buffer,
            normal_buffer,
            index,
            vertex_count: mesh.vertex_count() as u32,
        }
    }

    pub fn index_format(&self) -> Option<wgpu::IndexFormat> {
        match &self.index {
            IndexBuffer::None => None,
            IndexBuffer::Indexed { format, .. } => Some(*format),
        }
    }
}

/// Index bytes in the narrowest format that addresses every vertex.
fn index_data(mesh: &TriangleMesh) -> Option<(Vec<u8>, wgpu::IndexFormat, u32)> {
    let indices = mesh.indices.as_ref()?;
    let count = indices.len() as u32;
    Some(match mesh.indices_u16() {
        Some(narrow) => (
            bytemuck::cast_slice(&narrow).to_vec(),
            wgpu::IndexFormat::Uint16,
            count,
        ),
        None => (
            bytemuck::cast_slice(indices).to_vec(),
            wgpu::IndexFormat::Uint32,
            count,
        ),
    })
}

/// The render context. Owned by the app and passed to every draw call.
pub struct GpuState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,

    pub pipeline_surface: wgpu::RenderPipeline,
    pub camera_buffer: wgpu::Buffer,
    pub light_buffer: wgpu::Buffer,
    pub scene_bind_group: wgpu::BindGroup,

    pub surface_buffers: Option<SurfaceBuffers>,
    pub depth_texture: wgpu::TextureView,
    pub model: Mat4,
}

fn surface_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: 12,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        }],
    }
}

fn surface_normal_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: 12,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x3,
        }],
    }
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

impl GpuState {
    pub async fn new(window: Arc<Window>, viewer: &ViewerConfig) -> Result<Self, ViewerError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(ViewerError::NoAdapter)?;

        info!(adapter = %adapter.get_info().name, "GPU adapter selected");

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await?;

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
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: present_mode(viewer.vsync),
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Surface Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders.wgsl").into()),
        });

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let light_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Light Buffer"),
            size: std::mem::size_of::<LightUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let scene_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Scene Bind Group Layout"),
                entries: &[uniform_entry(0), uniform_entry(1)],
            });

        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &scene_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: light_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Surface Pipeline Layout"),
            bind_group_layouts: &[&scene_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline_surface = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Surface Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_surface_main"),
                buffers: &[surface_vertex_layout(), surface_normal_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_surface_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
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
            multiview: None,
            cache: None,
        });

        let depth_texture = Self::create_depth_texture(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            pipeline_surface,
            camera_buffer,
            light_buffer,
            scene_bind_group,
            surface_buffers: None,
            depth_texture,
            model: model_matrix(),
        })
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
    ) -> wgpu::TextureView {
        let size = wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = Self::create_depth_texture(&self.device, &self.config);
        }
    }

    pub fn set_vsync(&mut self, enabled: bool) {
        self.config.present_mode = present_mode(enabled);
        self.surface.configure(&self.device, &self.config);
    }

    pub fn upload_mesh(&mut self, mesh: &TriangleMesh) {
        // wgpu rejects empty buffer slices.
        if mesh.triangle_count() == 0 {
            self.surface_buffers = None;
            return;
        }

        let buffers = SurfaceBuffers::from_mesh(&self.device, mesh);
        debug!(
            vertices = buffers.vertex_count,
            index_format = ?buffers.index_format(),
            "uploaded surface buffers"
        );
        self.surface_buffers = Some(buffers);
    }

    pub fn update_camera(&self, camera: &Camera) {
        let uniform = CameraUniform::new(camera, self.model);
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    pub fn update_light(&self, lighting: &LightingConfig) {
        let uniform = LightUniform::from_config(lighting);
        self.queue
            .write_buffer(&self.light_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    pub fn render_surface(
        &self,
        view: &wgpu::TextureView,
        encoder: &mut wgpu::CommandEncoder,
        background: [f32; 4],
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Surface Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: background[0] as f64,
                        g: background[1] as f64,
                        b: background[2] as f64,
                        a: background[3] as f64,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        let Some(buffers) = &self.surface_buffers else {
            return;
        };

        render_pass.set_pipeline(&self.pipeline_surface);
        render_pass.set_bind_group(0, &self.scene_bind_group, &[]);
        render_pass.set_vertex_buffer(0, buffers.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, buffers.normal_buffer.slice(..));

        match &buffers.index {
            IndexBuffer::None => render_pass.draw(0..buffers.vertex_count, 0..1),
            IndexBuffer::Indexed {
                buffer,
                format,
                count,
            } => {
                render_pass.set_index_buffer(buffer.slice(..), *format);
                render_pass.draw_indexed(0..*count, 0, 0..1);
            }
        }
    }
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_uniform_layout_matches_wgsl() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 64);
    }

    #[test]
    fn light_range_becomes_cosine() {
        let light = LightUniform::from_config(&LightingConfig {
            range: 60.0,
            ..LightingConfig::default()
        });
        assert!((light.cos_range - 0.5).abs() < 1e-6);
    }

    #[test]
    fn small_meshes_use_u16_indices() {
        let mesh = TriangleMesh {
            vertices: vec![0.0; 9],
            normals: vec![0.0; 9],
            indices: Some(vec![0, 1, 2]),
        };
        let (bytes, format, count) = index_data(&mesh).unwrap();
        assert_eq!(format, wgpu::IndexFormat::Uint16);
        assert_eq!(count, 3);
        assert_eq!(bytes.len(), 6);
    }

    #[test]
    fn large_meshes_fall_back_to_u32() {
        let vertices = 65_537;
        let mesh = TriangleMesh {
            vertices: vec![0.0; vertices * 3],
            normals: vec![0.0; vertices * 3],
            indices: Some(vec![0, 1, 65_536]),
        };
        let (bytes, format, _) = index_data(&mesh).unwrap();
        assert_eq!(format, wgpu::IndexFormat::Uint32);
        assert_eq!(bytes.len(), 12);
    }

    #[test]
    fn flat_meshes_have_no_index_data() {
        let mesh = TriangleMesh {
            vertices: vec![0.0; 9],
            normals: vec![0.0; 9],
            indices: None,
        };
        assert!(index_data(&mesh).is_none());
    }
}
