mod import;

use anyhow::{Context, Result, bail};
use clap::Parser;
use meshview_mesh::write_geometry;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing_subscriber::EnvFilter;

/// Output file, created in the working directory.
const OUTPUT_PATH: &str = "output_model";

#[derive(Parser)]
#[command(
    name = "meshview-convert",
    version,
    about = "Convert a glTF model into the viewer's geometry format"
)]
struct Cli {
    /// Source model (.gltf or .glb)
    source: PathBuf,
}

/// Import `source` and write it to `output`.
///
/// The geometry goes to a temporary file next to `output` that replaces it only
/// once everything is written, so a failed run leaves any previous output as is.
fn convert(source: &Path, output: &Path) -> Result<()> {
    let meshes = import::import_file(source)?;
    if meshes.is_empty() {
        bail!("{} has no triangle geometry", source.display());
    }

    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create a temporary file in {}", dir.display()))?;
    let stats = {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        let stats = write_geometry(&mut writer, &meshes)?;
        writer.flush()?;
        stats
    };
    tmp.persist(output)
        .with_context(|| format!("failed to create {}", output.display()))?;

    tracing::info!(
        "wrote {}: {} meshes, {} vertices, {} indices",
        output.display(),
        stats.meshes,
        stats.vertices,
        stats.indices
    );
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("info"))
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(-1);
        }
    };

    if let Err(err) = convert(&cli.source, Path::new(OUTPUT_PATH)) {
        tracing::error!("{err:#}");
        std::process::exit(-1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::tests::{BAD_INDEX_GLTF, points_gltf, write_gltf, write_triangle_gltf};

    #[test]
    fn converted_model_loads_in_viewer_format() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_triangle_gltf(dir.path());
        let output = dir.path().join(OUTPUT_PATH);

        convert(&source, &output).unwrap();

        let mesh = meshview_mesh::load_mesh(&output).unwrap();
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.indices(), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(mesh.vertices()[4].position, [1.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices()[4].color, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn unreadable_source_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join(OUTPUT_PATH);
        assert!(convert(&dir.path().join("missing.glb"), &output).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn failed_write_keeps_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join(OUTPUT_PATH);
        convert(&write_triangle_gltf(dir.path()), &output).unwrap();
        let previous = std::fs::read(&output).unwrap();

        let source = write_gltf(dir.path(), "bad_index.gltf", BAD_INDEX_GLTF);
        let err = convert(&source, &output).unwrap_err();
        assert!(err.to_string().contains("index 9"), "{err:#}");

        assert_eq!(std::fs::read(&output).unwrap(), previous);
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 3);
    }

    #[test]
    fn bad_index_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join(OUTPUT_PATH);
        let source = write_gltf(dir.path(), "bad_index.gltf", BAD_INDEX_GLTF);
        assert!(convert(&source, &output).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn model_without_triangles_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join(OUTPUT_PATH);
        let source = write_gltf(dir.path(), "points.gltf", &points_gltf());
        let err = convert(&source, &output).unwrap_err();
        assert!(err.to_string().contains("no triangle geometry"));
        assert!(!output.exists());
    }

    #[test]
    fn source_argument_is_required() {
        assert!(Cli::try_parse_from(["meshview-convert"]).is_err());
        let cli = Cli::try_parse_from(["meshview-convert", "scene.glb"]).unwrap();
        assert_eq!(cli.source, PathBuf::from("scene.glb"));
    }
}
