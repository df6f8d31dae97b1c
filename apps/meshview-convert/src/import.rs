use anyhow::{Context, Result};
use meshview_mesh::SourceMesh;
use std::path::Path;
use tracing::{debug, warn};

/// Import a glTF file and flatten every triangle primitive reachable from its
/// default scene.
pub fn import_file(path: &Path) -> Result<Vec<SourceMesh>> {
    let (document, buffers, _images) =
        gltf::import(path).with_context(|| format!("failed to import {}", path.display()))?;
    collect_meshes(&document, &buffers)
}

fn collect_meshes(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
) -> Result<Vec<SourceMesh>> {
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .context("model has no scene")?;

    let mut meshes = Vec::new();
    for node in scene.nodes() {
        walk_node(&node, buffers, &mut meshes);
    }
    debug!(
        "scene '{}': {} meshes",
        scene.name().unwrap_or("unnamed"),
        meshes.len()
    );
    Ok(meshes)
}

// Node transforms are not applied; vertices are written in mesh space.
fn walk_node(node: &gltf::Node, buffers: &[gltf::buffer::Data], out: &mut Vec<SourceMesh>) {
    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                warn!(
                    "skipping {:?} primitive in mesh '{}'",
                    primitive.mode(),
                    mesh.name().unwrap_or("unnamed")
                );
                continue;
            }
            if let Some(source) = read_primitive(&primitive, buffers) {
                out.push(source);
            }
        }
    }
    for child in node.children() {
        walk_node(&child, buffers, out);
    }
}

fn read_primitive(
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
) -> Option<SourceMesh> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| &data[..]));

    let positions: Vec<[f32; 3]> = reader.read_positions()?.collect();
    let colors = reader.read_colors(0).map(|c| c.into_rgba_f32().collect());
    let normals = reader.read_normals().map(|n| n.collect());
    // Unindexed primitives draw their vertices in order.
    let indices = match reader.read_indices() {
        Some(idx) => idx.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };

    Some(SourceMesh {
        positions,
        colors,
        normals,
        indices,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    // One triangle mesh, referenced by a root node and by its child.
    pub(crate) const TRIANGLE_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [ { "nodes": [0] } ],
        "nodes": [
            { "mesh": 0, "children": [1] },
            { "mesh": 0 }
        ],
        "meshes": [ {
            "primitives": [ { "attributes": { "POSITION": 0 }, "indices": 1 } ]
        } ],
        "buffers": [ {
            "byteLength": 44,
            "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAABAAIAAAA="
        } ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 6 }
        ],
        "accessors": [
            {
                "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
                "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]
            },
            { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
        ]
    }"#;

    // Two meshes sharing one vertex buffer; the second indexes vertex 9 of 3.
    pub(crate) const BAD_INDEX_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [ { "nodes": [0, 1] } ],
        "nodes": [ { "mesh": 0 }, { "mesh": 1 } ],
        "meshes": [
            { "primitives": [ { "attributes": { "POSITION": 0 }, "indices": 1 } ] },
            { "primitives": [ { "attributes": { "POSITION": 0 }, "indices": 2 } ] }
        ],
        "buffers": [ {
            "byteLength": 52,
            "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAABAAIAAAAAAAEACQAAAA=="
        } ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 6 },
            { "buffer": 0, "byteOffset": 44, "byteLength": 6 }
        ],
        "accessors": [
            {
                "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
                "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]
            },
            { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" },
            { "bufferView": 2, "componentType": 5123, "count": 3, "type": "SCALAR" }
        ]
    }"#;

    pub(crate) fn write_gltf(dir: &Path, name: &str, json: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, json).unwrap();
        path
    }

    pub(crate) fn write_triangle_gltf(dir: &Path) -> std::path::PathBuf {
        write_gltf(dir, "triangle.gltf", TRIANGLE_GLTF)
    }

    /// The triangle fixture drawn as points.
    pub(crate) fn points_gltf() -> String {
        TRIANGLE_GLTF.replace(r#""indices": 1 }"#, r#""indices": 1, "mode": 0 }"#)
    }

    #[test]
    fn walks_node_tree_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let meshes = import_file(&write_triangle_gltf(dir.path())).unwrap();
        assert_eq!(meshes.len(), 2);

        let tri = &meshes[0];
        let expected = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        assert_eq!(tri.positions, expected);
        assert_eq!(tri.indices, vec![0, 1, 2]);
        assert!(tri.colors.is_none());
        assert!(tri.normals.is_none());
    }

    #[test]
    fn invalid_payload_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.gltf");
        std::fs::write(&path, "not a model").unwrap();
        assert!(import_file(&path).is_err());
    }

    #[test]
    fn missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(import_file(&dir.path().join("missing.gltf")).is_err());
    }

    #[test]
    fn non_triangle_primitives_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_gltf(dir.path(), "points.gltf", &points_gltf());
        assert!(import_file(&path).unwrap().is_empty());
    }
}
