use crate::scene::{Light, Object, Viewport};
use crate::transform::{ShaderUniforms, model_matrix, projection_matrix, view_matrix};
use meshview_input::Camera;
use tracing::trace;

/// One indexed draw of one mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    /// Position of the object in the scene's object list.
    pub object: usize,
    /// Position of the mesh within its object.
    pub mesh: usize,
    pub index_count: u32,
    pub uniforms: ShaderUniforms,
}

/// Everything a renderer needs to produce one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    /// Linear RGBA used to clear the color target. Depth is always cleared to 1.
    pub clear_color: [f64; 4],
    pub draws: Vec<DrawCall>,
}

/// Build the draw list for a frame: one draw per mesh, in object then mesh order.
///
/// View and projection are shared by the whole frame; the model matrix is
/// rebuilt per object.
pub fn plan_frame(
    camera: &Camera,
    light: &Light,
    objects: &[Object],
    viewport: Viewport,
    clear_color: [f64; 4],
) -> FramePlan {
    let view = view_matrix(camera);
    let projection = projection_matrix(viewport);

    let mut draws = Vec::new();
    for (object_index, object) in objects.iter().enumerate() {
        let model = model_matrix(object.position, object.scale);
        let uniforms = ShaderUniforms::new(model, view, projection, light, camera.position);
        for (mesh_index, mesh) in object.meshes.iter().enumerate() {
            draws.push(DrawCall {
                object: object_index,
                mesh: mesh_index,
                index_count: mesh.index_count() as u32,
                uniforms,
            });
        }
    }

    trace!(
        "planned {} draws for {} objects",
        draws.len(),
        objects.len()
    );
    FramePlan { clear_color, draws }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3};
    use meshview_mesh::{Mesh, Vertex};

    fn triangle() -> Mesh {
        Mesh::new(vec![Vertex::DEFAULT; 3], vec![0, 1, 2]).unwrap()
    }

    #[test]
    fn one_draw_per_mesh_in_order() {
        let mut second = Object::new("b", vec![triangle()]);
        second.position = Vec3::new(4.0, 0.0, 0.0);
        let objects = vec![Object::new("a", vec![triangle(), triangle()]), second];

        let plan = plan_frame(
            &Camera::default(),
            &Light::default(),
            &objects,
            Viewport::new(1280, 720),
            [0.0; 4],
        );

        let order: Vec<_> = plan.draws.iter().map(|d| (d.object, d.mesh)).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 0)]);
        assert!(plan.draws.iter().all(|d| d.index_count == 3));

        let moved = Mat4::from_cols_array_2d(&plan.draws[2].uniforms.model);
        let expected = Mat4::from_translation(Vec3::new(4.0, 0.0, 0.0));
        assert!(moved.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn uniforms_carry_light_and_camera() {
        let mut camera = Camera::default();
        camera.position = Vec3::new(-2.0, -13.0, 10.0);
        let light = Light::default();
        let plan = plan_frame(
            &camera,
            &light,
            &[Object::new("a", vec![triangle()])],
            Viewport::new(640, 480),
            [0.52, 0.80, 0.92, 0.0],
        );

        let u = plan.draws[0].uniforms;
        assert_eq!(u.camera_position, [-2.0, -13.0, 10.0]);
        assert_eq!(u.light_color, [1.0, 1.0, 1.0]);
        assert_eq!(u.light_position, [0.0, 1000.0, 1000.0]);
        assert_eq!(plan.clear_color, [0.52, 0.80, 0.92, 0.0]);
    }

    #[test]
    fn empty_scene_plans_no_draws() {
        let plan = plan_frame(
            &Camera::default(),
            &Light::default(),
            &[],
            Viewport::new(1, 1),
            [0.0; 4],
        );
        assert!(plan.draws.is_empty());
    }
}
