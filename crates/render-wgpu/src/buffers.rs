use crate::shaders::SHADER_BINDINGS;
use crate::{RenderError, with_error_scope};
use meshview_mesh::{Mesh, Vertex};
use meshview_render::ShaderUniforms;
use std::mem::{offset_of, size_of};
use tracing::debug;
use wgpu::util::DeviceExt;

/// Interleaved attributes of [`Vertex`], at the locations in [`SHADER_BINDINGS`].
pub const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x3,
        offset: offset_of!(Vertex, position) as u64,
        shader_location: SHADER_BINDINGS.position,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x4,
        offset: offset_of!(Vertex, color) as u64,
        shader_location: SHADER_BINDINGS.vertex_color,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x3,
        offset: offset_of!(Vertex, normal) as u64,
        shader_location: SHADER_BINDINGS.vertex_normal,
    },
];

/// Buffer layout with the `Vertex` struct size as stride.
pub fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES,
    }
}

/// GPU-side copy of one mesh plus its per-draw uniform block.
pub struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
}

impl GpuMesh {
    /// Upload `mesh` into static vertex and index buffers.
    ///
    /// Allocation and validation failures are reported instead of panicking.
    pub fn upload(
        device: &wgpu::Device,
        uniform_layout: &wgpu::BindGroupLayout,
        mesh: &Mesh,
        label: &str,
    ) -> Result<Self, RenderError> {
        let gpu_mesh = with_error_scope(device, || {
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label}_vertex_buffer")),
                contents: bytemuck::cast_slice(mesh.vertices()),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label}_index_buffer")),
                contents: bytemuck::cast_slice(mesh.indices()),
                usage: wgpu::BufferUsages::INDEX,
            });
            let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("{label}_uniform_buffer")),
                size: size_of::<ShaderUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("{label}_uniform_bind_group")),
                layout: uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: SHADER_BINDINGS.uniform_binding,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });

            Self {
                vertex_buffer,
                index_buffer,
                index_count: mesh.index_count() as u32,
                uniform_buffer,
                uniform_bind_group,
            }
        })
        .map_err(|e| RenderError::GpuResource(format!("{label}: {e}")))?;

        debug!(
            "uploaded {label}: {} vertices, {} indices",
            mesh.vertex_count(),
            mesh.index_count()
        );
        Ok(gpu_mesh)
    }

    pub(crate) fn write_uniforms(&self, queue: &wgpu::Queue, uniforms: &ShaderUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    pub(crate) fn draw<'pass>(&self, pass: &mut wgpu::RenderPass<'pass>) {
        pass.set_bind_group(SHADER_BINDINGS.uniform_group, &self.uniform_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}
