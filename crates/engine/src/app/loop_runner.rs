use std::env;
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, warn};

use super::metrics::MetricsWindow;
use super::{InputSnapshot, LoopMetricsSnapshot, Scene, SceneCommand, SceneView, Viewport};

pub const MAX_FRAMES_ENV_VAR: &str = "TEDDY_MAX_FRAMES";

#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// Nominal step handed to every tick regardless of measured frame time.
    pub fixed_dt: Duration,
    pub viewport: Viewport,
    pub max_render_fps: Option<u32>,
    pub metrics_log_interval: Duration,
    pub max_frames: Option<u64>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            fixed_dt: Duration::from_millis(16),
            viewport: Viewport::default(),
            max_render_fps: Some(60),
            metrics_log_interval: Duration::from_secs(1),
            max_frames: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] crate::StartupError),
    #[error("fixed simulation step must be non-zero")]
    ZeroFixedStep,
}

/// Host-side producer of logical intents, polled once per frame.
pub trait InputSource {
    fn snapshot_for_tick(&mut self, view: &SceneView) -> InputSnapshot;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStopReason {
    Halted,
    QuitRequested,
    FrameLimit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopSummary {
    pub frames: u64,
    pub ticks: u64,
    pub stop_reason: LoopStopReason,
    /// Last closed metrics window; `None` when the run ended inside the first one.
    pub last_metrics: Option<LoopMetricsSnapshot>,
}

pub fn run_app(
    config: LoopConfig,
    scene: &mut dyn Scene,
    input: &mut dyn InputSource,
) -> Result<LoopSummary, AppError> {
    if config.fixed_dt.is_zero() {
        return Err(AppError::ZeroFixedStep);
    }
    let fixed_dt_seconds = config.fixed_dt.as_secs_f32();
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    let effective_render_cap = normalize_render_fps_cap(config.max_render_fps);
    let render_frame_target = target_frame_duration(effective_render_cap);
    let max_frames = resolve_max_frames(config.max_frames);

    scene.load();
    info!(entity_count = scene.entity_count(), "scene_loaded");
    info!(
        fixed_dt_ms = config.fixed_dt.as_millis() as u64,
        viewport_width = config.viewport.width,
        viewport_height = config.viewport.height,
        render_fps_cap = %format_render_cap(effective_render_cap),
        max_frames = %format_frame_limit(max_frames),
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        "loop_config"
    );

    let mut metrics = MetricsWindow::new(metrics_log_interval);
    let mut last_frame_instant = Instant::now();
    let mut frames = 0u64;

    let stop_reason = loop {
        if max_frames.is_some_and(|limit| frames >= limit) {
            info!(frames, "frame_limit_reached");
            break LoopStopReason::FrameLimit;
        }

        let frame_start = Instant::now();
        let view = scene.view();
        let snapshot = input.snapshot_for_tick(&view);
        if snapshot.quit_requested() {
            info!(reason = "quit_intent", "shutdown_requested");
            break LoopStopReason::QuitRequested;
        }

        let command = scene.update(fixed_dt_seconds, &snapshot);
        metrics.record_tick();
        scene.render(config.viewport);
        frames = frames.saturating_add(1);

        if command == SceneCommand::Halt {
            info!(
                frames,
                title = scene.debug_title().as_deref().unwrap_or(""),
                "simulation_halted"
            );
            break LoopStopReason::Halted;
        }

        let elapsed = Instant::now().saturating_duration_since(frame_start);
        let cap_sleep = compute_cap_sleep(elapsed, render_frame_target);
        if cap_sleep > Duration::ZERO {
            thread::sleep(cap_sleep);
        }

        let now = Instant::now();
        let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
        last_frame_instant = now;
        metrics.record_frame(raw_frame_dt);
        if let Some(window) = metrics.close_if_elapsed(now) {
            info!(
                fps = window.fps,
                tps = window.tps,
                frame_time_ms = window.frame_time_ms,
                peak_frame_time_ms = window.peak_frame_time_ms,
                total_ticks = window.total_ticks,
                entity_count = scene.entity_count(),
                "loop_metrics"
            );
        }
    };

    scene.unload();
    let summary = LoopSummary {
        frames,
        ticks: metrics.total_ticks(),
        stop_reason,
        last_metrics: metrics.latest(),
    };
    info!(
        frames = summary.frames,
        ticks = summary.ticks,
        stop_reason = ?summary.stop_reason,
        "shutdown"
    );
    Ok(summary)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn normalize_render_fps_cap(cap: Option<u32>) -> Option<u32> {
    cap.filter(|value| *value > 0)
}

fn target_frame_duration(max_render_fps: Option<u32>) -> Option<Duration> {
    max_render_fps.map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
}

fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}

fn format_render_cap(cap: Option<u32>) -> String {
    match cap {
        Some(value) => value.to_string(),
        None => "off".to_string(),
    }
}

fn format_frame_limit(limit: Option<u64>) -> String {
    match limit {
        Some(value) => value.to_string(),
        None => "unbounded".to_string(),
    }
}

fn resolve_max_frames(config_max_frames: Option<u64>) -> Option<u64> {
    match env::var(MAX_FRAMES_ENV_VAR) {
        Ok(value) => match value.parse::<u64>() {
            Ok(frames) => Some(frames),
            Err(_) => {
                warn!(
                    env_var = MAX_FRAMES_ENV_VAR,
                    value = value.as_str(),
                    "invalid frame-limit env var value; falling back to config"
                );
                config_max_frames
            }
        },
        Err(env::VarError::NotPresent) => config_max_frames,
        Err(err) => {
            warn!(
                env_var = MAX_FRAMES_ENV_VAR,
                error = %err,
                "unable to read frame-limit env var; falling back to config"
            );
            config_max_frames
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingScene {
        loaded: bool,
        unloaded: bool,
        ticks: u32,
        halt_after: Option<u32>,
        last_dt: f32,
        renders: u32,
    }

    impl Scene for CountingScene {
        fn load(&mut self) {
            self.loaded = true;
        }

        fn update(&mut self, fixed_dt_seconds: f32, _input: &InputSnapshot) -> SceneCommand {
            self.ticks += 1;
            self.last_dt = fixed_dt_seconds;
            match self.halt_after {
                Some(limit) if self.ticks >= limit => SceneCommand::Halt,
                _ => SceneCommand::Continue,
            }
        }

        fn render(&mut self, _viewport: Viewport) {
            self.renders += 1;
        }

        fn unload(&mut self) {
            self.unloaded = true;
        }

        fn view(&self) -> SceneView {
            SceneView::default()
        }

        fn entity_count(&self) -> usize {
            1
        }
    }

    struct ScriptedInput {
        quit_on_frame: Option<u32>,
        polled: u32,
    }

    impl InputSource for ScriptedInput {
        fn snapshot_for_tick(&mut self, _view: &SceneView) -> InputSnapshot {
            self.polled += 1;
            let quit = self.quit_on_frame == Some(self.polled);
            InputSnapshot::empty().with_quit_requested(quit)
        }
    }

    fn unpaced_config(max_frames: Option<u64>) -> LoopConfig {
        LoopConfig {
            max_render_fps: None,
            max_frames,
            ..LoopConfig::default()
        }
    }

    #[test]
    fn halt_command_stops_scheduling_after_that_tick() {
        let mut scene = CountingScene {
            halt_after: Some(3),
            ..CountingScene::default()
        };
        let mut input = ScriptedInput {
            quit_on_frame: None,
            polled: 0,
        };

        let summary = run_app(unpaced_config(Some(100)), &mut scene, &mut input).expect("run");

        assert_eq!(summary.stop_reason, LoopStopReason::Halted);
        assert_eq!(summary.ticks, 3);
        assert_eq!(scene.ticks, 3);
        assert_eq!(scene.renders, 3);
        assert!(scene.loaded && scene.unloaded);
    }

    #[test]
    fn every_tick_receives_the_nominal_step() {
        let mut scene = CountingScene::default();
        let mut input = ScriptedInput {
            quit_on_frame: None,
            polled: 0,
        };

        let summary = run_app(unpaced_config(Some(4)), &mut scene, &mut input).expect("run");

        assert_eq!(summary.stop_reason, LoopStopReason::FrameLimit);
        assert_eq!(summary.frames, 4);
        assert_eq!(summary.last_metrics, None);
        assert!((scene.last_dt - 0.016).abs() < 1e-6);
    }

    #[test]
    fn summary_carries_last_closed_metrics_window() {
        let mut scene = CountingScene::default();
        let mut input = ScriptedInput {
            quit_on_frame: None,
            polled: 0,
        };
        let config = LoopConfig {
            metrics_log_interval: Duration::from_nanos(1),
            ..unpaced_config(Some(3))
        };

        let summary = run_app(config, &mut scene, &mut input).expect("run");

        let metrics = summary.last_metrics.expect("closed window");
        assert_eq!(metrics.total_ticks, 3);
    }

    #[test]
    fn quit_intent_stops_before_update() {
        let mut scene = CountingScene::default();
        let mut input = ScriptedInput {
            quit_on_frame: Some(2),
            polled: 0,
        };

        let summary = run_app(unpaced_config(None), &mut scene, &mut input).expect("run");

        assert_eq!(summary.stop_reason, LoopStopReason::QuitRequested);
        assert_eq!(scene.ticks, 1);
    }

    #[test]
    fn zero_fixed_step_is_rejected() {
        let mut scene = CountingScene::default();
        let mut input = ScriptedInput {
            quit_on_frame: None,
            polled: 0,
        };
        let config = LoopConfig {
            fixed_dt: Duration::ZERO,
            ..unpaced_config(Some(1))
        };

        let result = run_app(config, &mut scene, &mut input);
        assert!(matches!(result, Err(AppError::ZeroFixedStep)));
        assert!(!scene.loaded);
    }

    #[test]
    fn cap_sleep_fills_remaining_frame_budget() {
        let target = target_frame_duration(Some(50));
        assert_eq!(
            compute_cap_sleep(Duration::from_millis(5), target),
            Duration::from_millis(15)
        );
        assert_eq!(
            compute_cap_sleep(Duration::from_millis(30), target),
            Duration::ZERO
        );
        assert_eq!(
            compute_cap_sleep(Duration::from_millis(5), None),
            Duration::ZERO
        );
    }

    #[test]
    fn zero_render_cap_disables_pacing() {
        assert_eq!(normalize_render_fps_cap(Some(0)), None);
        assert_eq!(normalize_render_fps_cap(Some(30)), Some(30));
    }
}
