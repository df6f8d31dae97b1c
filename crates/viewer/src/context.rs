use crate::ViewerError;
use crate::clock::FrameClock;
use crate::config::ViewerConfig;
use meshview_input::{Camera, CameraController};
use meshview_render::{FramePlan, Light, Object, Viewport, plan_frame};
use tracing::info;

/// Whether the tick loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Quit,
}

/// Lifecycle of the host's render state (pipeline, blending, culling, depth).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Uninitialised,
    Ready,
}

/// All mutable scene state, owned by the top-level loop and passed to each
/// subsystem explicitly.
#[derive(Debug)]
pub struct SceneContext {
    pub controller: CameraController,
    pub clock: FrameClock,
    pub light: Light,
    pub objects: Vec<Object>,
    pub viewport: Viewport,
    pub clear_color: [f64; 4],
    status: RunStatus,
    render_state: RenderState,
}

impl SceneContext {
    pub fn new(config: &ViewerConfig, objects: Vec<Object>) -> Self {
        let camera = Camera::new(
            config.camera.position,
            config.camera.yaw,
            config.camera.pitch,
            config.camera.speed,
        );
        Self {
            controller: CameraController::new(camera, config.camera.sensitivity),
            clock: FrameClock::new(),
            light: Light {
                color: config.light.color,
                position: config.light.position,
            },
            objects,
            viewport: Viewport::new(config.window.width, config.window.height),
            clear_color: config.clear_color,
            status: RunStatus::Running,
            render_state: RenderState::Uninitialised,
        }
    }

    /// Load the configured model as the scene's single object.
    pub fn load(config: &ViewerConfig) -> Result<Self, ViewerError> {
        let path = &config.model_path;
        let mesh = meshview_mesh::load_mesh(path).map_err(|source| ViewerError::Load {
            path: path.clone(),
            source,
        })?;
        info!(
            "loaded {}: {} vertices, {} triangles",
            path.display(),
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        let object = Object::new(path.display().to_string(), vec![mesh]);
        Ok(Self::new(config, vec![object]))
    }

    pub fn camera(&self) -> &Camera {
        &self.controller.camera
    }

    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }

    pub fn request_quit(&mut self) {
        self.status = RunStatus::Quit;
    }

    pub fn render_state(&self) -> RenderState {
        self.render_state
    }

    pub(crate) fn mark_render_ready(&mut self) {
        self.render_state = RenderState::Ready;
    }

    /// Pointer callback: absolute cursor position in pixels.
    pub fn on_pointer_moved(&mut self, x: f64, y: f64) -> bool {
        self.controller.on_pointer_moved(x, y)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
    }

    /// Matrices and draws for the current camera and viewport.
    pub fn plan_frame(&self) -> FramePlan {
        plan_frame(
            &self.controller.camera,
            &self.light,
            &self.objects,
            self.viewport,
            self.clear_color,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::io::Write;

    #[test]
    fn new_context_uses_config() {
        let ctx = SceneContext::new(&ViewerConfig::default(), Vec::new());
        assert!(ctx.is_running());
        assert_eq!(ctx.render_state(), RenderState::Uninitialised);
        assert_eq!(ctx.camera().position, Vec3::new(-2.0, -13.0, 10.0));
        assert_eq!(ctx.camera().speed, 5.0);
        assert_eq!(ctx.viewport, Viewport::new(1280, 720));
        assert!((ctx.camera().front - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn load_builds_single_object() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0\nf 1\nf 2\n").unwrap();
        file.flush().unwrap();

        let config = ViewerConfig {
            model_path: file.path().to_path_buf(),
            ..ViewerConfig::default()
        };
        let ctx = SceneContext::load(&config).unwrap();
        assert_eq!(ctx.objects.len(), 1);
        assert_eq!(ctx.objects[0].meshes.len(), 1);
        assert_eq!(ctx.objects[0].index_count(), 3);
        assert_eq!(ctx.plan_frame().draws.len(), 1);
    }

    #[test]
    fn load_failure_is_recoverable() {
        let dir = tempfile::tempdir().unwrap();
        let config = ViewerConfig {
            model_path: dir.path().join("missing"),
            ..ViewerConfig::default()
        };
        let err = SceneContext::load(&config).unwrap_err();
        assert!(matches!(
            err,
            ViewerError::Load {
                source: meshview_mesh::LoadError::Io(_),
                ..
            }
        ));
    }

    #[test]
    fn resize_changes_projection_aspect() {
        let mut ctx = SceneContext::new(&ViewerConfig::default(), Vec::new());
        ctx.resize(800, 800);
        assert_eq!(ctx.viewport.aspect_ratio(), 1.0);
    }
}
