use std::time::Duration;

/// Frame clock fed by the host's monotonic timestamps.
///
/// Delta time is the gap between consecutive ticks. The first tick measures
/// from time zero, i.e. from when the host started its clock.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Duration,
    delta: f32,
    frame_index: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to `now` and return the delta in seconds.
    ///
    /// A timestamp earlier than the previous one yields a zero delta.
    pub fn tick(&mut self, now: Duration) -> f32 {
        self.delta = now.saturating_sub(self.last).as_secs_f32();
        self.last = now;
        self.frame_index += 1;
        self.delta
    }

    /// Seconds between the last two ticks.
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Number of ticks so far.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}
