use std::time::{Duration, Instant};

/// Rates measured over one logging window, plus the running tick total.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    pub fps: f32,
    pub tps: f32,
    pub frame_time_ms: f32,
    pub peak_frame_time_ms: f32,
    pub total_ticks: u64,
}

#[derive(Debug)]
pub(crate) struct MetricsWindow {
    started_at: Instant,
    length: Duration,
    frames: u32,
    ticks: u32,
    frame_time: Duration,
    peak_frame_time: Duration,
    total_ticks: u64,
    latest: Option<LoopMetricsSnapshot>,
}

impl MetricsWindow {
    pub(crate) fn new(length: Duration) -> Self {
        Self {
            started_at: Instant::now(),
            length,
            frames: 0,
            ticks: 0,
            frame_time: Duration::ZERO,
            peak_frame_time: Duration::ZERO,
            total_ticks: 0,
            latest: None,
        }
    }

    pub(crate) fn record_tick(&mut self) {
        self.ticks = self.ticks.saturating_add(1);
        self.total_ticks = self.total_ticks.saturating_add(1);
    }

    pub(crate) fn record_frame(&mut self, frame_dt: Duration) {
        self.frames = self.frames.saturating_add(1);
        self.frame_time = self.frame_time.saturating_add(frame_dt);
        self.peak_frame_time = self.peak_frame_time.max(frame_dt);
    }

    pub(crate) fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    /// Most recently closed window, if any window has closed yet.
    pub(crate) fn latest(&self) -> Option<LoopMetricsSnapshot> {
        self.latest
    }

    /// Closes the window once its length has elapsed and starts the next one.
    pub(crate) fn close_if_elapsed(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.started_at);
        if elapsed < self.length {
            return None;
        }

        let seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let frame_time_ms = match self.frames {
            0 => 0.0,
            frames => self.frame_time.as_secs_f32() * 1000.0 / frames as f32,
        };
        let snapshot = LoopMetricsSnapshot {
            fps: self.frames as f32 / seconds,
            tps: self.ticks as f32 / seconds,
            frame_time_ms,
            peak_frame_time_ms: self.peak_frame_time.as_secs_f32() * 1000.0,
            total_ticks: self.total_ticks,
        };

        self.started_at = now;
        self.frames = 0;
        self.ticks = 0;
        self.frame_time = Duration::ZERO;
        self.peak_frame_time = Duration::ZERO;
        self.latest = Some(snapshot);
        Some(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_window_reports_rates_peak_and_running_total() {
        let mut window = MetricsWindow::new(Duration::from_secs(1));
        let base = window.started_at;

        window.record_frame(Duration::from_millis(12));
        window.record_frame(Duration::from_millis(20));
        window.record_tick();
        window.record_tick();

        let first = window
            .close_if_elapsed(base + Duration::from_secs(1))
            .expect("window should close");
        assert!((first.fps - 2.0).abs() < 0.05);
        assert!((first.tps - 2.0).abs() < 0.05);
        assert!((first.frame_time_ms - 16.0).abs() < 0.001);
        assert!((first.peak_frame_time_ms - 20.0).abs() < 0.001);
        assert_eq!(first.total_ticks, 2);
        assert_eq!(window.latest(), Some(first));

        window.record_tick();
        let second = window
            .close_if_elapsed(base + Duration::from_secs(2))
            .expect("second window");
        assert_eq!(second.total_ticks, 3);
        assert_eq!(second.frame_time_ms, 0.0);
        assert_eq!(second.peak_frame_time_ms, 0.0);
    }

    #[test]
    fn window_stays_open_before_its_length() {
        let mut window = MetricsWindow::new(Duration::from_secs(1));
        let base = window.started_at;
        window.record_frame(Duration::from_millis(16));

        assert!(window
            .close_if_elapsed(base + Duration::from_millis(500))
            .is_none());
        assert_eq!(window.latest(), None);
    }
}
