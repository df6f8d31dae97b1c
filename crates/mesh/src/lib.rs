//! Geometry format: the line-oriented mesh files the viewer loads.
//!
//! ```text
//! v <px> <py> <pz> <cr> <cg> <cb> <ca> <nx> <ny> <nz>
//! f <index>
//! ```
//!
//! Each `f` line carries a single index; consecutive triples form triangles.
//!
//! # Invariants
//! - A loaded [`Mesh`] has at least one vertex and at least one index.
//! - Every index references a vertex of the same mesh.

mod loader;
mod vertex;
mod writer;

pub use loader::{LoadError, load_mesh, read_mesh};
pub use vertex::{Mesh, Vertex};
pub use writer::{GeometryStats, SourceMesh, WriteError, write_geometry};
