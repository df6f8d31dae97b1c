use tracing::trace;

/// Pointer tracking lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum PointerState {
    /// No pointer event seen yet; the next one only seeds the last position.
    #[default]
    Uninitialized,
    /// Offsets are measured from the last reported position.
    Tracking { last_x: f64, last_y: f64 },
}

/// Turns absolute cursor positions into scaled look offsets.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    state: PointerState,
    sensitivity: f32,
}

impl PointerTracker {
    pub fn new(sensitivity: f32) -> Self {
        Self {
            state: PointerState::Uninitialized,
            sensitivity,
        }
    }

    pub fn state(&self) -> PointerState {
        self.state
    }

    /// Record a cursor position and return the scaled `(x, y)` offset since the
    /// previous one. Returns `None` for the seeding event.
    pub fn track(&mut self, x: f64, y: f64) -> Option<(f32, f32)> {
        let previous = std::mem::replace(
            &mut self.state,
            PointerState::Tracking {
                last_x: x,
                last_y: y,
            },
        );
        match previous {
            PointerState::Uninitialized => {
                trace!("pointer tracking seeded at ({x}, {y})");
                None
            }
            PointerState::Tracking { last_x, last_y } => Some((
                (x - last_x) as f32 * self.sensitivity,
                (y - last_y) as f32 * self.sensitivity,
            )),
        }
    }

    /// Forget the last position, e.g. after the cursor was released and recaptured.
    pub fn reset(&mut self) {
        self.state = PointerState::Uninitialized;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_event_seeds_without_offset() {
        let mut tracker = PointerTracker::new(0.1);
        assert_eq!(tracker.state(), PointerState::Uninitialized);
        assert_eq!(tracker.track(640.0, 360.0), None);
        assert_eq!(
            tracker.state(),
            PointerState::Tracking {
                last_x: 640.0,
                last_y: 360.0
            }
        );
    }

    #[test]
    fn second_event_reports_scaled_offset() {
        let mut tracker = PointerTracker::new(0.5);
        tracker.track(100.0, 100.0);
        assert_eq!(tracker.track(110.0, 96.0), Some((5.0, -2.0)));
        assert_eq!(tracker.track(110.0, 96.0), Some((0.0, 0.0)));
    }

    #[test]
    fn reset_returns_to_uninitialized() {
        let mut tracker = PointerTracker::new(0.1);
        tracker.track(1.0, 1.0);
        tracker.reset();
        assert_eq!(tracker.track(500.0, 500.0), None);
    }
}
