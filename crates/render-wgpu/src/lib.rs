//! wgpu render backend for the mesh viewer.
//!
//! Uploads each mesh once into static vertex/index buffers and draws a frame
//! plan with a single lit pipeline.
//!
//! # Invariants
//! - GPU buffers are written once at upload and never reassigned.
//! - Render state (pipeline, blending, culling, depth) is created on the first
//!   frame and reused afterwards.
//! - Every GPU resource is owned by the renderer and released when it drops.

mod buffers;
mod gpu;
mod shaders;

pub use buffers::{GpuMesh, VERTEX_ATTRIBUTES, vertex_buffer_layout};
pub use gpu::WgpuRenderer;
pub use shaders::{SHADER_BINDINGS, ShaderBindings, ShaderSources};

use std::path::PathBuf;

/// Errors from the wgpu backend.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("GPU resource creation failed: {0}")]
    GpuResource(String),
    #[error("shader error: {0}")]
    Shader(String),
    #[error("failed to read shader source {}: {source}", path.display())]
    ShaderSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("render state used before initialisation")]
    Uninitialised,
}

/// Run `f` inside out-of-memory and validation error scopes and report the
/// first captured error.
pub(crate) fn with_error_scope<T>(
    device: &wgpu::Device,
    f: impl FnOnce() -> T,
) -> Result<T, wgpu::Error> {
    device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = f();
    let validation = pollster::block_on(device.pop_error_scope());
    let out_of_memory = pollster::block_on(device.pop_error_scope());
    match validation.or(out_of_memory) {
        Some(err) => Err(err),
        None => Ok(value),
    }
}
