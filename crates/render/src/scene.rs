use glam::Vec3;
use meshview_mesh::Mesh;

/// The scene's single light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub color: Vec3,
    pub position: Vec3,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            position: Vec3::new(0.0, 1000.0, 1000.0),
        }
    }
}

/// A drawable object: one or more meshes sharing a world placement.
#[derive(Debug, Clone)]
pub struct Object {
    pub name: String,
    pub meshes: Vec<Mesh>,
    pub position: Vec3,
    /// Non-uniform scale.
    pub scale: Vec3,
}

impl Object {
    /// An object at the origin with unit scale.
    pub fn new(name: impl Into<String>, meshes: Vec<Mesh>) -> Self {
        Self {
            name: name.into(),
            meshes,
            position: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    pub fn index_count(&self) -> usize {
        self.meshes.iter().map(Mesh::index_count).sum()
    }
}

/// Drawable surface size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height. Zero sizes (minimised windows) count as one pixel.
    pub fn aspect_ratio(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshview_mesh::Vertex;

    #[test]
    fn object_defaults_to_origin_and_unit_scale() {
        let mesh = Mesh::new(vec![Vertex::DEFAULT; 3], vec![0, 1, 2]).unwrap();
        let obj = Object::new("triangle", vec![mesh.clone(), mesh]);
        assert_eq!(obj.position, Vec3::ZERO);
        assert_eq!(obj.scale, Vec3::ONE);
        assert_eq!(obj.index_count(), 6);
    }

    #[test]
    fn aspect_ratio_survives_zero_height() {
        assert_eq!(Viewport::new(1280, 720).aspect_ratio(), 1280.0 / 720.0);
        assert_eq!(Viewport::new(800, 0).aspect_ratio(), 800.0);
    }
}
