use crate::loader::LoadError;
use bytemuck::{Pod, Zeroable};

/// One interleaved vertex as it is laid out in the GPU vertex buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub normal: [f32; 3],
}

impl Vertex {
    /// Opaque black at the origin with a zero normal.
    pub const DEFAULT: Self = Self {
        position: [0.0; 3],
        color: [0.0, 0.0, 0.0, 1.0],
        normal: [0.0; 3],
    };
}

impl Default for Vertex {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A drawable surface: vertices plus a flat triangle-list index array.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u16>,
}

impl Mesh {
    /// Build a mesh, rejecting empty geometry and out-of-range indices.
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u16>) -> Result<Self, LoadError> {
        if vertices.is_empty() || indices.is_empty() {
            return Err(LoadError::EmptyGeometry {
                vertices: vertices.len(),
                indices: indices.len(),
            });
        }
        if let Some((position, &index)) = indices
            .iter()
            .enumerate()
            .find(|(_, i)| usize::from(**i) >= vertices.len())
        {
            return Err(LoadError::IndexOutOfRange {
                index,
                position,
                vertex_count: vertices.len(),
            });
        }
        Ok(Self { vertices, indices })
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of complete triangles. A trailing partial triple is not counted.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn vertex_layout_matches_gpu_stride() {
        assert_eq!(size_of::<Vertex>(), 40);
        assert_eq!(offset_of!(Vertex, position), 0);
        assert_eq!(offset_of!(Vertex, color), 12);
        assert_eq!(offset_of!(Vertex, normal), 28);
    }

    #[test]
    fn default_vertex_is_opaque_black() {
        assert_eq!(Vertex::default().color, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn mesh_rejects_empty_geometry() {
        let err = Mesh::new(vec![Vertex::DEFAULT], vec![]).unwrap_err();
        assert!(matches!(
            err,
            LoadError::EmptyGeometry {
                vertices: 1,
                indices: 0
            }
        ));
    }

    #[test]
    fn mesh_rejects_out_of_range_index() {
        let err = Mesh::new(vec![Vertex::DEFAULT; 3], vec![0, 1, 3]).unwrap_err();
        assert!(matches!(
            err,
            LoadError::IndexOutOfRange {
                index: 3,
                position: 2,
                vertex_count: 3
            }
        ));
    }

    #[test]
    fn triangle_count_ignores_partial_triples() {
        let mesh = Mesh::new(vec![Vertex::DEFAULT; 3], vec![0, 1, 2, 0]).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.index_count(), 4);
    }
}
