//! Rendering adapter: renderer-agnostic scene description and transforms.
//!
//! # Invariants
//! - Renderers never mutate scene or camera state.
//! - Matrices are rebuilt every frame from camera, object, and viewport.
//! - A frame plan holds exactly one draw per mesh, in object then mesh order.

mod frame;
mod renderer;
mod scene;
mod transform;

pub use frame::{DrawCall, FramePlan, plan_frame};
pub use renderer::DebugTextRenderer;
pub use scene::{Light, Object, Viewport};
pub use transform::{
    FAR_PLANE, FIELD_OF_VIEW_DEGREES, NEAR_PLANE, ShaderUniforms, model_matrix, projection_matrix,
    view_matrix,
};
