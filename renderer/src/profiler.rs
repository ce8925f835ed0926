use std::collections::VecDeque;
use std::time::Duration;

const MAX_FRAME_SAMPLES: usize = 60;

/// Rolling window of recent frame times, for the status line.
pub struct FrameTimer {
    samples: VecDeque<Duration>,
    total: Duration,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(MAX_FRAME_SAMPLES),
            total: Duration::ZERO,
        }
    }

    pub fn record(&mut self, frame_time: Duration) {
        if self.samples.len() == MAX_FRAME_SAMPLES {
            if let Some(oldest) = self.samples.pop_front() {
                self.total -= oldest;
            }
        }
        self.samples.push_back(frame_time);
        self.total += frame_time;
    }

    pub fn avg_frame_time_ms(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.total.as_secs_f32() * 1000.0 / self.samples.len() as f32
    }

    pub fn fps(&self) -> f32 {
        let avg = self.avg_frame_time_ms();
        if avg > 0.0 {
            1000.0 / avg
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_timer_reports_zero() {
        let timer = FrameTimer::new();
        assert_eq!(timer.fps(), 0.0);
        assert_eq!(timer.avg_frame_time_ms(), 0.0);
    }

    #[test]
    fn test_steady_frames() {
        let mut timer = FrameTimer::new();
        for _ in 0..10 {
            timer.record(Duration::from_millis(20));
        }
        assert!((timer.avg_frame_time_ms() - 20.0).abs() < 1e-3);
        assert!((timer.fps() - 50.0).abs() < 1e-2);
    }

    #[test]
    fn test_window_drops_old_samples() {
        let mut timer = FrameTimer::new();
        for _ in 0..MAX_FRAME_SAMPLES {
            timer.record(Duration::from_millis(100));
        }
        for _ in 0..MAX_FRAME_SAMPLES {
            timer.record(Duration::from_millis(10));
        }
        assert!((timer.avg_frame_time_ms() - 10.0).abs() < 1e-3);
    }
}
