use crate::buffers::{GpuMesh, vertex_buffer_layout};
use crate::shaders::{SHADER_BINDINGS, ShaderSources};
use crate::{RenderError, with_error_scope};
use meshview_render::{FramePlan, Object, ShaderUniforms};
use std::num::NonZeroU64;
use tracing::{debug, info, warn};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// wgpu-based mesh renderer.
///
/// Owns one [`GpuMesh`] per scene mesh, indexed the same way as the scene's
/// objects so a [`FramePlan`] draw maps directly onto GPU buffers.
pub struct WgpuRenderer {
    uniform_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    shaders: ShaderSources,
    pipeline: Option<wgpu::RenderPipeline>,
    objects: Vec<Vec<GpuMesh>>,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        shaders: ShaderSources,
    ) -> Self {
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: SHADER_BINDINGS.uniform_binding,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(size_of::<ShaderUniforms>() as u64),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });

        let depth_texture = Self::create_depth_texture(device, width, height);

        Self {
            uniform_layout,
            pipeline_layout,
            shaders,
            pipeline: None,
            objects: Vec::new(),
            depth_texture,
            surface_format,
        }
    }

    /// Upload every mesh of every object. Called once at startup.
    pub fn upload_objects(
        &mut self,
        device: &wgpu::Device,
        objects: &[Object],
    ) -> Result<(), RenderError> {
        let mut uploaded = Vec::with_capacity(objects.len());
        for (object_index, object) in objects.iter().enumerate() {
            let meshes = object
                .meshes
                .iter()
                .enumerate()
                .map(|(mesh_index, mesh)| {
                    let label = format!("{}_{object_index}_{mesh_index}", object.name);
                    GpuMesh::upload(device, &self.uniform_layout, mesh, &label)
                })
                .collect::<Result<Vec<_>, _>>()?;
            uploaded.push(meshes);
        }
        info!("uploaded {} objects to the GPU", uploaded.len());
        self.objects = uploaded;
        Ok(())
    }

    /// Compile shaders and build the pipeline: alpha blending, back-face
    /// culling, and a less-than depth test.
    pub fn initialise(&mut self, device: &wgpu::Device) -> Result<(), RenderError> {
        if self.pipeline.is_some() {
            return Ok(());
        }

        let pipeline = with_error_scope(device, || {
            let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("vertex_shader"),
                source: wgpu::ShaderSource::Wgsl(self.shaders.vertex.as_str().into()),
            });
            let fragment_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("fragment_shader"),
                source: wgpu::ShaderSource::Wgsl(self.shaders.fragment.as_str().into()),
            });

            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("mesh_pipeline"),
                layout: Some(&self.pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &vertex_module,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[vertex_buffer_layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &fragment_module,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.surface_format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: Some(wgpu::Face::Back),
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: Default::default(),
                    bias: Default::default(),
                }),
                multisample: Default::default(),
                multiview: None,
                cache: None,
            })
        })
        .map_err(|e| RenderError::Shader(e.to_string()))?;

        debug!("render pipeline created");
        self.pipeline = Some(pipeline);
        Ok(())
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    /// Render one frame: clear color and depth, then one indexed draw per
    /// planned mesh.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        plan: &FramePlan,
    ) -> Result<(), RenderError> {
        let pipeline = self.pipeline.as_ref().ok_or(RenderError::Uninitialised)?;

        let mut draws = Vec::with_capacity(plan.draws.len());
        for draw in &plan.draws {
            match self.objects.get(draw.object).and_then(|o| o.get(draw.mesh)) {
                Some(mesh) => {
                    mesh.write_uniforms(queue, &draw.uniforms);
                    draws.push(mesh);
                }
                None => warn!(
                    "no GPU mesh for object {} mesh {}, skipping draw",
                    draw.object, draw.mesh
                ),
            }
        }

        let [r, g, b, a] = plan.clear_color;
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
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
                ..Default::default()
            });

            pass.set_pipeline(pipeline);
            for mesh in draws {
                mesh.draw(&mut pass);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
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
        texture.create_view(&Default::default())
    }
}
