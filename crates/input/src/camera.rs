use crate::keys::MoveKeys;
use crate::pointer::PointerTracker;
use glam::Vec3;

/// Pitch limit in degrees; looking straight up or down would flip the view.
pub const PITCH_LIMIT: f32 = 89.0;

/// First-person fly camera. Angles are in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Unit view direction derived from yaw and pitch.
    pub front: Vec3,
    pub up: Vec3,
    /// Units per second.
    pub speed: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, -90.0, 0.0, 5.0)
    }
}

impl Camera {
    pub fn new(position: Vec3, yaw: f32, pitch: f32, speed: f32) -> Self {
        let pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        Self {
            position,
            front: front_from_angles(yaw, pitch),
            up: Vec3::Y,
            speed,
            yaw,
            pitch,
        }
    }

    /// Unit vector to the camera's right.
    pub fn right(&self) -> Vec3 {
        self.front.cross(self.up).normalize_or_zero()
    }

    /// Turn by the given offsets. Positive `pitch_offset` looks down, matching
    /// screen-space y growing downwards.
    pub fn look(&mut self, yaw_offset: f32, pitch_offset: f32) {
        self.yaw += yaw_offset;
        self.pitch = (self.pitch - pitch_offset).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.front = front_from_angles(self.yaw, self.pitch);
    }

    /// Move for one tick. Held keys add up, so diagonal movement is faster
    /// than movement along a single axis.
    pub fn apply_movement(&mut self, keys: MoveKeys, dt: f32) {
        let step = self.speed * dt;
        if keys.forward {
            self.position += self.front * step;
        }
        if keys.backward {
            self.position -= self.front * step;
        }
        if keys.left {
            self.position -= self.right() * step;
        }
        if keys.right {
            self.position += self.right() * step;
        }
    }
}

/// Spherical to Cartesian: yaw around +Y from +X, pitch up from the XZ plane.
pub fn front_from_angles(yaw: f32, pitch: f32) -> Vec3 {
    let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());
    Vec3::new(
        yaw.cos() * pitch.cos(),
        pitch.sin(),
        yaw.sin() * pitch.cos(),
    )
    .normalize()
}

/// Camera plus the pointer tracker that steers it.
#[derive(Debug, Clone)]
pub struct CameraController {
    pub camera: Camera,
    pointer: PointerTracker,
}

impl CameraController {
    pub fn new(camera: Camera, sensitivity: f32) -> Self {
        Self {
            camera,
            pointer: PointerTracker::new(sensitivity),
        }
    }

    /// Feed an absolute cursor position. Returns whether the camera turned.
    pub fn on_pointer_moved(&mut self, x: f64, y: f64) -> bool {
        match self.pointer.track(x, y) {
            Some((dx, dy)) => {
                self.camera.look(dx, dy);
                true
            }
            None => false,
        }
    }

    /// Apply the keys polled for this tick.
    pub fn update(&mut self, keys: MoveKeys, dt: f32) {
        self.camera.apply_movement(keys, dt);
    }

    /// Drop pointer tracking so the next event re-seeds.
    pub fn release_pointer(&mut self) {
        self.pointer.reset();
    }
}
