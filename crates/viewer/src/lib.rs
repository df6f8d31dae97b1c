//! Viewer core: scene context, frame timing, and the tick loop.
//!
//! # Invariants
//! - All scene state lives in one [`SceneContext`] owned by the caller's loop.
//! - Each tick runs exit check, timing, input, render, present, event poll, in
//!   that order.
//! - Render state is initialised exactly once, on the first rendered frame.

pub mod clock;
pub mod config;
pub mod context;
pub mod headless;
pub mod scheduler;

pub use clock::FrameClock;
pub use config::{CameraConfig, LightConfig, ViewerConfig, WindowConfig};
pub use context::{RenderState, RunStatus, SceneContext};
pub use headless::HeadlessHost;
pub use scheduler::{FrameHost, FrameScheduler, TickOutcome};

use std::path::PathBuf;

/// Errors from setting up the viewer.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("failed to load model {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: meshview_mesh::LoadError,
    },
    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
    #[error("initialisation failed: {0}")]
    Initialization(String),
}
