use crate::frame::FramePlan;
use glam::Mat4;
use std::fmt::Write;

/// Text renderer for headless runs and logs.
///
/// Produces a human-readable summary of a frame plan instead of pixels.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame_index: u64, plan: &FramePlan) -> String {
        let mut out = String::new();
        let indices: u32 = plan.draws.iter().map(|d| d.index_count).sum();
        let _ = writeln!(
            out,
            "=== Frame {frame_index} ({} draws, {indices} indices) ===",
            plan.draws.len()
        );

        if let Some(first) = plan.draws.first() {
            let p = first.uniforms.camera_position;
            let view = Mat4::from_cols_array_2d(&first.uniforms.view);
            let forward = -view.row(2).truncate();
            let _ = writeln!(
                out,
                "Camera: pos=({:.2}, {:.2}, {:.2}) front=({:.2}, {:.2}, {:.2})",
                p[0], p[1], p[2], forward.x, forward.y, forward.z
            );
        }

        for draw in &plan.draws {
            let _ = writeln!(
                out,
                "  object {} mesh {}: {} indices",
                draw.object, draw.mesh, draw.index_count
            );
        }

        out
    }
}
