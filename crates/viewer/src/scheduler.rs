use crate::context::{RenderState, SceneContext};
use meshview_input::MoveKeys;
use meshview_render::FramePlan;
use std::time::Duration;
use tracing::{debug, info, trace};

/// Platform side of the tick loop: window, clock, keyboard, GPU, presentation.
pub trait FrameHost {
    type Error;

    /// The user asked to close the window.
    fn close_requested(&self) -> bool;

    /// Monotonic time since the host started.
    fn elapsed(&self) -> Duration;

    /// Directional keys currently held.
    fn movement_keys(&self) -> MoveKeys;

    /// One-time render state setup, called before the first frame is rendered.
    fn initialise_render_state(&mut self) -> Result<(), Self::Error>;

    /// Clear color and depth, then draw every planned mesh.
    fn render(&mut self, frame: &FramePlan) -> Result<(), Self::Error>;

    /// Show the rendered frame.
    fn present(&mut self) -> Result<(), Self::Error>;

    /// Dispatch pending window and input events.
    fn poll_events(&mut self);
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Quit,
}

/// Drives the per-frame update/render sequence.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    frames_rendered: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Run one tick: exit check, timing, keyboard, render, present, event poll.
    ///
    /// A close request ends the tick before anything is rendered.
    pub fn tick<H: FrameHost>(
        &mut self,
        ctx: &mut SceneContext,
        host: &mut H,
    ) -> Result<TickOutcome, H::Error> {
        if host.close_requested() {
            ctx.request_quit();
        }
        if !ctx.is_running() {
            info!("quit after {} frames", self.frames_rendered);
            return Ok(TickOutcome::Quit);
        }

        let dt = ctx.clock.tick(host.elapsed());

        let keys = host.movement_keys();
        ctx.controller.update(keys, dt);

        if ctx.render_state() == RenderState::Uninitialised {
            host.initialise_render_state()?;
            ctx.mark_render_ready();
            debug!("render state initialised");
        }
        let plan = ctx.plan_frame();
        host.render(&plan)?;
        host.present()?;
        self.frames_rendered += 1;
        trace!(
            "frame {} dt={dt:.4}s draws={}",
            self.frames_rendered,
            plan.draws.len()
        );

        host.poll_events();
        Ok(TickOutcome::Continue)
    }

    /// Tick until the host asks to close. Returns the number of frames rendered.
    pub fn run<H: FrameHost>(
        &mut self,
        ctx: &mut SceneContext,
        host: &mut H,
    ) -> Result<u64, H::Error> {
        while self.tick(ctx, host)? == TickOutcome::Continue {}
        Ok(self.frames_rendered)
    }
}
