/// Delta-time source for the frame loop. Created at mount, read once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    last: f64,
    elapsed: f64,
}

impl FrameClock {
    pub fn start(now: f64) -> Self {
        Self {
            last: now,
            elapsed: 0.0,
        }
    }

    /// Seconds since the previous call (or since `start`). Never negative.
    pub fn delta(&mut self, now: f64) -> f32 {
        let d = (now - self.last).max(0.0);
        self.last = now;
        self.elapsed += d;
        d as f32
    }

    /// Total seconds handed out by `delta` so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}
