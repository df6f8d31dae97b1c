use crate::scene::{Light, Viewport};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use meshview_input::Camera;

pub const FIELD_OF_VIEW_DEGREES: f32 = 45.0;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 1000.0;

/// Identity, then translate by `position`, then scale by `scale`.
pub fn model_matrix(position: Vec3, scale: Vec3) -> Mat4 {
    Mat4::from_translation(position) * Mat4::from_scale(scale)
}

/// Look-at from the camera position towards `position + front`.
pub fn view_matrix(camera: &Camera) -> Mat4 {
    Mat4::look_at_rh(camera.position, camera.position + camera.front, camera.up)
}

/// Right-handed perspective with a 0..1 depth range.
pub fn projection_matrix(viewport: Viewport) -> Mat4 {
    Mat4::perspective_rh(
        FIELD_OF_VIEW_DEGREES.to_radians(),
        viewport.aspect_ratio(),
        NEAR_PLANE,
        FAR_PLANE,
    )
}

/// Uniform block consumed by the shading stage.
///
/// Field order and padding follow WGSL uniform layout: each `vec3<f32>` is
/// 16-byte aligned.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ShaderUniforms {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub light_color: [f32; 3],
    _pad0: f32,
    pub light_position: [f32; 3],
    _pad1: f32,
    pub camera_position: [f32; 3],
    _pad2: f32,
}

impl ShaderUniforms {
    pub fn new(
        model: Mat4,
        view: Mat4,
        projection: Mat4,
        light: &Light,
        camera_position: Vec3,
    ) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
            light_color: light.color.to_array(),
            _pad0: 0.0,
            light_position: light.position.to_array(),
            _pad1: 0.0,
            camera_position: camera_position.to_array(),
            _pad2: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn canonical_view_is_identity() {
        let cam = Camera {
            position: Vec3::ZERO,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            speed: 5.0,
            yaw: -90.0,
            pitch: 0.0,
        };
        assert!(view_matrix(&cam).abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn view_matches_look_at_from_camera() {
        let cam = Camera::new(Vec3::new(-2.0, -13.0, 10.0), -60.0, 20.0, 5.0);
        let expected = Mat4::look_at_rh(cam.position, cam.position + cam.front, Vec3::Y);
        assert!(view_matrix(&cam).abs_diff_eq(expected, 1e-6));

        // The camera's own position lands at the view-space origin.
        let eye = view_matrix(&cam) * cam.position.extend(1.0);
        assert!(eye.abs_diff_eq(Vec4::new(0.0, 0.0, 0.0, 1.0), 1e-4));
    }

    #[test]
    fn model_translates_then_scales() {
        let m = model_matrix(Vec3::new(1.0, 2.0, 3.0), Vec3::new(2.0, 3.0, 4.0));
        let p = m.transform_point3(Vec3::ONE);
        assert!(p.abs_diff_eq(Vec3::new(3.0, 5.0, 7.0), 1e-6));
        let identity = model_matrix(Vec3::ZERO, Vec3::ONE);
        assert!(identity.abs_diff_eq(Mat4::IDENTITY, 0.0));
    }

    #[test]
    fn projection_uses_fixed_fov_and_viewport_aspect() {
        let viewport = Viewport::new(1280, 720);
        let expected = Mat4::perspective_rh(45.0_f32.to_radians(), 1280.0 / 720.0, 0.1, 1000.0);
        assert!(projection_matrix(viewport).abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn uniform_block_layout() {
        assert_eq!(std::mem::size_of::<ShaderUniforms>(), 240);
        assert_eq!(std::mem::offset_of!(ShaderUniforms, light_color), 192);
        assert_eq!(std::mem::offset_of!(ShaderUniforms, light_position), 208);
        assert_eq!(std::mem::offset_of!(ShaderUniforms, camera_position), 224);
    }
}
