use std::cell::Cell;
use std::rc::Rc;

/// Shared stop flag between an effect's handle and its frame callback.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Counts frames until cancelled; what a render loop checks before
/// rescheduling itself.
#[derive(Debug)]
pub struct FrameClock {
    token: CancelToken,
    frames: u64,
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new(token: CancelToken) -> Self {
        Self {
            token,
            frames: 0,
            last_ms: None,
        }
    }

    /// Registers a frame at `now_ms`. Returns the elapsed seconds since the
    /// previous frame (clamped to 0.1 s after tab switches), or `None` once
    /// cancelled.
    pub fn tick(&mut self, now_ms: f64) -> Option<f32> {
        if self.token.is_cancelled() {
            return None;
        }
        self.frames += 1;
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0).clamp(0.0, 0.1) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        Some(dt)
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_stops_after_cancel() {
        let token = CancelToken::new();
        let mut clock = FrameClock::new(token.clone());
        assert_eq!(clock.tick(0.0), Some(0.0));
        assert_eq!(clock.tick(16.0), Some(0.016));
        assert_eq!(clock.tick(5000.0), Some(0.1));
        token.cancel();
        assert_eq!(clock.tick(5016.0), None);
        assert_eq!(clock.frames(), 3);
    }
}
