use std::io::Write;
use tracing::debug;

/// Geometry from an importer, before it is flattened into the text format.
///
/// Indices are local to this mesh; [`write_geometry`] re-bases them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceMesh {
    pub positions: Vec<[f32; 3]>,
    pub colors: Option<Vec<[f32; 4]>>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub indices: Vec<u32>,
}

/// Totals written by [`write_geometry`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeometryStats {
    pub meshes: usize,
    pub vertices: usize,
    pub indices: usize,
}

/// Errors from writing a geometry file.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0} vertices cannot be addressed by 16-bit indices")]
    TooManyVertices(usize),
    #[error("mesh {mesh}: index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        mesh: usize,
        index: u32,
        vertex_count: usize,
    },
}

/// Flatten `meshes` into one geometry file.
///
/// Every vertex line carries all ten fields. Missing colors are written as
/// opaque black and missing normals as zero. Each mesh's indices are offset by
/// the vertices written before it so they stay valid in the flattened file.
///
/// All meshes are validated before the first line is written, so an error
/// leaves `out` untouched.
pub fn write_geometry<W: Write>(
    mut out: W,
    meshes: &[SourceMesh],
) -> Result<GeometryStats, WriteError> {
    validate(meshes)?;

    let mut stats = GeometryStats::default();
    for mesh in meshes {
        let vertex_count = mesh.positions.len();
        for (i, p) in mesh.positions.iter().enumerate() {
            let c = mesh
                .colors
                .as_ref()
                .and_then(|colors| colors.get(i))
                .copied()
                .unwrap_or([0.0, 0.0, 0.0, 1.0]);
            let n = mesh
                .normals
                .as_ref()
                .and_then(|normals| normals.get(i))
                .copied()
                .unwrap_or([0.0; 3]);
            writeln!(
                out,
                "v {:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6}",
                p[0], p[1], p[2], c[0], c[1], c[2], c[3], n[0], n[1], n[2]
            )?;
        }

        for index in &mesh.indices {
            writeln!(out, "f {}", stats.vertices + *index as usize)?;
        }

        stats.meshes += 1;
        stats.vertices += vertex_count;
        stats.indices += mesh.indices.len();
    }

    out.flush()?;
    debug!(
        "wrote {} meshes: {} vertices, {} indices",
        stats.meshes, stats.vertices, stats.indices
    );
    Ok(stats)
}

fn validate(meshes: &[SourceMesh]) -> Result<(), WriteError> {
    let total_vertices: usize = meshes.iter().map(|m| m.positions.len()).sum();
    if total_vertices > usize::from(u16::MAX) + 1 {
        return Err(WriteError::TooManyVertices(total_vertices));
    }

    for (mesh_index, mesh) in meshes.iter().enumerate() {
        let vertex_count = mesh.positions.len();
        if let Some(&index) = mesh.indices.iter().find(|i| **i as usize >= vertex_count) {
            return Err(WriteError::IndexOutOfRange {
                mesh: mesh_index,
                index,
                vertex_count,
            });
        }
    }
    Ok(())
}
