use crate::scheduler::FrameHost;
use meshview_input::MoveKeys;
use meshview_render::{DebugTextRenderer, FramePlan};
use std::convert::Infallible;
use std::time::Duration;
use tracing::debug;

/// Host without a window or GPU.
///
/// Advances a simulated clock by a fixed step per frame, renders each frame
/// plan as text, and asks to close after `frame_limit` frames.
#[derive(Debug)]
pub struct HeadlessHost {
    renderer: DebugTextRenderer,
    frame_limit: u64,
    frames_presented: u64,
    step: Duration,
    now: Duration,
    keys: MoveKeys,
    render_state_ready: bool,
    pending: String,
    last_frame: String,
}

impl HeadlessHost {
    /// Default step, about 60 frames per second.
    pub const DEFAULT_STEP: Duration = Duration::from_micros(16_667);

    pub fn new(frame_limit: u64) -> Self {
        Self {
            renderer: DebugTextRenderer::new(),
            frame_limit,
            frames_presented: 0,
            step: Self::DEFAULT_STEP,
            now: Duration::ZERO,
            keys: MoveKeys::NONE,
            render_state_ready: false,
            pending: String::new(),
            last_frame: String::new(),
        }
    }

    pub fn with_step(mut self, step: Duration) -> Self {
        self.step = step;
        self
    }

    /// Keys reported as held on every frame.
    pub fn with_keys(mut self, keys: MoveKeys) -> Self {
        self.keys = keys;
        self
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Text of the most recently presented frame.
    pub fn last_frame(&self) -> &str {
        &self.last_frame
    }
}

impl FrameHost for HeadlessHost {
    type Error = Infallible;

    fn close_requested(&self) -> bool {
        self.frames_presented >= self.frame_limit
    }

    fn elapsed(&self) -> Duration {
        self.now
    }

    fn movement_keys(&self) -> MoveKeys {
        self.keys
    }

    fn initialise_render_state(&mut self) -> Result<(), Infallible> {
        self.render_state_ready = true;
        Ok(())
    }

    fn render(&mut self, frame: &FramePlan) -> Result<(), Infallible> {
        debug_assert!(self.render_state_ready);
        self.pending = self.renderer.render(self.frames_presented, frame);
        Ok(())
    }

    fn present(&mut self) -> Result<(), Infallible> {
        self.last_frame = std::mem::take(&mut self.pending);
        self.frames_presented += 1;
        debug!("{}", self.last_frame.trim_end());
        Ok(())
    }

    fn poll_events(&mut self) {
        self.now += self.step;
    }
}
