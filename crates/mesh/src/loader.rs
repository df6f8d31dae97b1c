use crate::vertex::{Mesh, Vertex};
use std::collections::TryReserveError;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::path::Path;
use tracing::debug;

/// Fields on a vertex line: 3 position, 4 color, 3 normal.
const VERTEX_FIELDS: usize = 10;

/// Errors from loading a geometry file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no geometry: {vertices} vertices, {indices} indices")]
    EmptyGeometry { vertices: usize, indices: usize },
    #[error("index {index} at face entry {position} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        index: u16,
        position: usize,
        vertex_count: usize,
    },
    #[error("failed to allocate geometry buffers: {0}")]
    Allocation(#[from] TryReserveError),
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

/// Open and parse a geometry file.
pub fn load_mesh(path: impl AsRef<Path>) -> Result<Mesh, LoadError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mesh = read_mesh(BufReader::new(file))?;
    debug!(
        "loaded '{}': {} vertices, {} indices",
        path.display(),
        mesh.vertex_count(),
        mesh.index_count()
    );
    Ok(mesh)
}

/// Parse geometry from a seekable source.
///
/// The first pass counts vertex and face lines so both arrays are allocated
/// exactly once; the source is then rewound and parsed.
pub fn read_mesh<R: BufRead + Seek>(mut reader: R) -> Result<Mesh, LoadError> {
    let (vertex_lines, face_lines) = count_lines(&mut reader)?;
    if vertex_lines == 0 || face_lines == 0 {
        return Err(LoadError::EmptyGeometry {
            vertices: vertex_lines,
            indices: face_lines,
        });
    }

    reader.rewind()?;

    let mut vertices = Vec::new();
    vertices.try_reserve_exact(vertex_lines)?;
    let mut indices = Vec::new();
    indices.try_reserve_exact(face_lines)?;

    let mut line = String::new();
    let mut line_number = 0;
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        line_number += 1;

        if is_vertex_line(&line) {
            vertices.push(parse_vertex(&line, line_number)?);
        } else if is_face_line(&line) {
            indices.push(parse_index(&line, line_number)?);
        }
    }

    Mesh::new(vertices, indices)
}

fn count_lines<R: BufRead>(reader: &mut R) -> Result<(usize, usize), LoadError> {
    let mut vertices = 0;
    let mut faces = 0;
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Ok((vertices, faces));
        }
        if is_vertex_line(&line) {
            vertices += 1;
        } else if is_face_line(&line) {
            faces += 1;
        }
    }
}

fn is_vertex_line(line: &str) -> bool {
    line.starts_with("v ")
}

fn is_face_line(line: &str) -> bool {
    line.starts_with('f')
}

/// Missing trailing fields keep their defaults; fields past the tenth are ignored.
fn parse_vertex(line: &str, line_number: usize) -> Result<Vertex, LoadError> {
    let mut fields: [f32; VERTEX_FIELDS] = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0];
    for (slot, token) in fields.iter_mut().zip(line[2..].split_whitespace()) {
        *slot = token.parse().map_err(|_| LoadError::Malformed {
            line: line_number,
            reason: format!("invalid vertex field {token:?}"),
        })?;
    }

    Ok(Vertex {
        position: [fields[0], fields[1], fields[2]],
        color: [fields[3], fields[4], fields[5], fields[6]],
        normal: [fields[7], fields[8], fields[9]],
    })
}

fn parse_index(line: &str, line_number: usize) -> Result<u16, LoadError> {
    let token = line[1..]
        .split_whitespace()
        .next()
        .ok_or_else(|| LoadError::Malformed {
            line: line_number,
            reason: "face line has no index".into(),
        })?;
    token.parse().map_err(|_| LoadError::Malformed {
        line: line_number,
        reason: format!("invalid face index {token:?}"),
    })
}
