use std::collections::VecDeque;

/// Rolling frame-time statistics over the last `window` frames.
#[derive(Debug, Clone)]
pub struct FrameStats {
    window: usize,
    samples: VecDeque<f32>,
    total_frames: u64,
}

impl FrameStats {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            samples: VecDeque::with_capacity(window),
            total_frames: 0,
        }
    }

    /// Record one frame's duration in seconds. Negative or non-finite
    /// values are dropped.
    pub fn record(&mut self, dt: f32) {
        if !dt.is_finite() || dt < 0.0 {
            tracing::trace!(dt, "frame time sample dropped");
            return;
        }
        if self.samples.len() == self.window {
            self.samples.pop_front();
        }
        self.samples.push_back(dt);
        self.total_frames += 1;
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Mean frame time in milliseconds over the window.
    pub fn mean_frame_ms(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f32>() / self.samples.len() as f32 * 1000.0
    }

    pub fn fps(&self) -> f32 {
        let ms = self.mean_frame_ms();
        if ms > 0.0 { 1000.0 / ms } else { 0.0 }
    }

    pub fn reset(&mut self) {
        self.samples.clear();
        self.total_frames = 0;
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(120)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stats() {
        let stats = FrameStats::default();
        assert_eq!(stats.fps(), 0.0);
        assert_eq!(stats.mean_frame_ms(), 0.0);
    }

    #[test]
    fn steady_sixty() {
        let mut stats = FrameStats::new(10);
        for _ in 0..30 {
            stats.record(1.0 / 60.0);
        }
        assert!((stats.fps() - 60.0).abs() < 0.01);
        assert_eq!(stats.total_frames(), 30);
    }

    #[test]
    fn window_forgets_old_samples() {
        let mut stats = FrameStats::new(2);
        stats.record(1.0);
        stats.record(0.01);
        stats.record(0.01);
        assert!((stats.mean_frame_ms() - 10.0).abs() < 1e-3);
    }

    #[test]
    fn bad_samples_dropped() {
        let mut stats = FrameStats::new(4);
        stats.record(-1.0);
        stats.record(f32::NAN);
        assert_eq!(stats.total_frames(), 0);
        stats.record(0.5);
        stats.reset();
        assert_eq!(stats.total_frames(), 0);
    }
}
