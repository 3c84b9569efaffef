use std::process::ExitCode;

use engine::run_app;
use tracing::{error, info};

use super::bootstrap::AppWiring;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let AppWiring {
        config,
        mut scene,
        mut input,
    } = app;
    match run_app(config, &mut scene, &mut input) {
        Ok(summary) => {
            let hud = scene.hud();
            let tps = summary.last_metrics.map_or(0.0, |metrics| metrics.tps);
            info!(
                frames = summary.frames,
                ticks = summary.ticks,
                tps,
                stop_reason = ?summary.stop_reason,
                health = hud.health_text(),
                xp = hud.xp_text(),
                game_over = hud.game_over(),
                "run_finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "loop_failed");
            ExitCode::FAILURE
        }
    }
}
