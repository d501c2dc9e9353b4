//! GPU renderer: static water mesh displaced in the vertex shader.

use std::path::Path;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};
use wgpu::util::DeviceExt;

use super::context::GpuContext;
use super::shaders::{compile_module, ShaderPair};
use crate::wave::{Vertex, WaveField, WaveMesh};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Uniform block shared by the wave vertex and fragment shaders (144 bytes).
///
/// Field order mirrors `WaveUniforms` in the WGSL sources; each `[f32; 3]`
/// is followed by an `f32` so the std140-style vec3 slots stay packed.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WaveUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 3],
    pub time: f32,
    pub light_pos: [f32; 3],
    pub amplitude: f32,
    pub ripple_origin: [f32; 2],
    pub ripple_age: f32,
    pub ripple_active: f32,
    pub frequency: f32,
    pub ripple_wavenumber: f32,
    pub ripple_falloff: f32,
    pub ripple_strength: f32,
    pub mouse_pos: [f32; 2],
    pub mouse_pressed: f32,
    pub aspect: f32,
}

/// Per-frame pointer state forwarded to the shader
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerState {
    /// Cursor in normalized device coordinates
    pub ndc: Vec2,
    pub pressed: bool,
}

impl WaveUniforms {
    /// Pack the field and camera state for upload
    pub fn new(
        field: &WaveField,
        view_proj: Mat4,
        camera_pos: Vec3,
        light_pos: Vec3,
        pointer: PointerState,
        aspect: f32,
    ) -> Self {
        let ripple = field.ripple();
        let config = field.params().ripple;
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            camera_pos: camera_pos.to_array(),
            time: field.elapsed_time(),
            light_pos: light_pos.to_array(),
            amplitude: field.amplitude(),
            ripple_origin: [ripple.origin_x, ripple.origin_y],
            ripple_age: ripple.age,
            ripple_active: if ripple.active { 1.0 } else { 0.0 },
            frequency: field.frequency(),
            ripple_wavenumber: config.wavenumber,
            ripple_falloff: config.falloff,
            ripple_strength: config.strength,
            mouse_pos: pointer.ndc.to_array(),
            mouse_pressed: if pointer.pressed { 1.0 } else { 0.0 },
            aspect,
        }
    }
}

/// Wave mesh pipeline, buffers, and depth target
pub struct WaveRenderer {
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
    index_count: u32,
    shader_origin: String,
}

impl WaveRenderer {
    /// Upload the mesh and build the pipeline.
    ///
    /// Shaders are read from `shader_dir`; if they cannot be read, compiled,
    /// or linked, the built-in pair is tried before giving up.
    pub async fn new(gpu: &GpuContext, mesh: &WaveMesh, shader_dir: &Path) -> Result<Self, String> {
        let device = &gpu.device;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Wave Vertex Buffer"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Wave Index Buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Wave Uniform Buffer"),
            size: std::mem::size_of::<WaveUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Wave Bind Group Layout"),
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
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Wave Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Wave Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let mut last_error = String::from("no shader candidates");
        let mut selected = None;
        for candidate in ShaderPair::candidates(shader_dir) {
            let attempt = match candidate {
                Ok(pair) => build_pipeline(gpu, &pipeline_layout, &pair)
                    .await
                    .map(|pipeline| (pipeline, pair.origin)),
                Err(e) => Err(e),
            };
            match attempt {
                Ok(found) => {
                    selected = Some(found);
                    break;
                }
                Err(e) => {
                    log::warn!("{}", e);
                    last_error = e;
                }
            }
        }
        let (render_pipeline, shader_origin) =
            selected.ok_or_else(|| format!("Failed to load shaders: {}", last_error))?;
        log::info!("Wave shaders: {}", shader_origin);

        let depth_view = create_depth_view(device, gpu.config.width, gpu.config.height);

        Ok(Self {
            render_pipeline,
            vertex_buffer,
            index_buffer,
            uniform_buffer,
            uniform_bind_group,
            depth_view,
            index_count: mesh.index_count(),
            shader_origin,
        })
    }

    /// Recreate the depth target after a surface resize
    pub fn resize(&mut self, gpu: &GpuContext) {
        self.depth_view = create_depth_view(&gpu.device, gpu.config.width, gpu.config.height);
    }

    pub fn update_uniforms(&self, gpu: &GpuContext, uniforms: &WaveUniforms) {
        gpu.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[*uniforms]));
    }

    pub fn shader_origin(&self) -> &str {
        &self.shader_origin
    }

    /// Draw one frame; skipped silently when the surface is unavailable
    pub fn render(&self, gpu: &GpuContext) {
        let Some(output) = gpu.acquire_frame() else {
            return;
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Wave Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Wave Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        // Sky
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.5,
                            g: 0.7,
                            b: 0.9,
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
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..self.index_count, 0, 0..1);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

/// Compile a shader pair and link it into a pipeline, reporting any
/// validation error instead of panicking
async fn build_pipeline(
    gpu: &GpuContext,
    layout: &wgpu::PipelineLayout,
    pair: &ShaderPair,
) -> Result<wgpu::RenderPipeline, String> {
    let device = &gpu.device;
    let vertex = compile_module(device, "Wave Vertex Shader", &pair.vertex)
        .await
        .map_err(|e| format!("{} ({})", e, pair.origin))?;
    let fragment = compile_module(device, "Wave Fragment Shader", &pair.fragment)
        .await
        .map_err(|e| format!("{} ({})", e, pair.origin))?;

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Wave Render Pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &vertex,
            entry_point: Some("vs_main"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[
                    wgpu::VertexAttribute {
                        offset: 0,
                        shader_location: 0,
                        format: wgpu::VertexFormat::Float32x3,
                    },
                    wgpu::VertexAttribute {
                        offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                        shader_location: 1,
                        format: wgpu::VertexFormat::Float32x2,
                    },
                ],
            }],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &fragment,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: gpu.format(),
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
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
    match device.pop_error_scope().await {
        Some(error) => Err(format!("Shader linking error ({}): {}", pair.origin, error)),
        None => Ok(pipeline),
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Wave Depth Texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
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
