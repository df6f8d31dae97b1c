//! Camera/input controller: first-person camera state from pointer and key input.
//!
//! # Invariants
//! - The first pointer event only seeds tracking; it never moves the camera.
//! - Pitch stays within [-89°, 89°].
//! - Keyboard state is polled once per tick, never accumulated from events.

pub mod camera;
pub mod keys;
pub mod pointer;

pub use camera::{Camera, CameraController};
pub use keys::MoveKeys;
pub use pointer::{PointerState, PointerTracker};
