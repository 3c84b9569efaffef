use std::env;
use std::path::Path;

use engine::{resolve_app_paths, AppError, LoopConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::autopilot::Autopilot;
use super::gameplay::{self, GameTuning, GameplayScene, SEED_ENV_VAR, TUNING_FILE_NAME};

/// Upper bound for an unattended run when `TEDDY_MAX_FRAMES` is not set.
const DEFAULT_HEADLESS_FRAMES: u64 = 18_000;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: GameplayScene,
    pub(crate) input: Autopilot,
}

pub(crate) fn build_app() -> Result<AppWiring, AppError> {
    init_tracing();
    info!("=== Teddy World Startup ===");

    let paths = resolve_app_paths()?;
    info!(root = %paths.root.display(), "app_root_resolved");
    let tuning = load_tuning_or_default(&paths.asset(TUNING_FILE_NAME));
    let seed = seed_from_env();
    match seed {
        Some(seed) => info!(seed, "rng_seeded"),
        None => info!("rng_seeded_from_entropy"),
    }

    let config = LoopConfig {
        max_frames: Some(DEFAULT_HEADLESS_FRAMES),
        ..LoopConfig::default()
    };
    Ok(AppWiring {
        config,
        scene: gameplay::build_scene(tuning, seed),
        input: Autopilot::default(),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn load_tuning_or_default(path: &Path) -> GameTuning {
    match GameTuning::load(path) {
        Ok(Some(tuning)) => {
            info!(path = %path.display(), "tuning_loaded");
            tuning
        }
        Ok(None) => {
            info!(path = %path.display(), "tuning_file_absent; using defaults");
            GameTuning::default()
        }
        Err(error) => {
            warn!(error = %error, "tuning_rejected; using defaults");
            GameTuning::default()
        }
    }
}

fn seed_from_env() -> Option<u64> {
    let raw = env::var(SEED_ENV_VAR).ok()?;
    let seed = parse_seed(&raw);
    if seed.is_none() {
        warn!(
            env_var = SEED_ENV_VAR,
            value = raw.as_str(),
            "invalid seed env var value; falling back to entropy"
        );
    }
    seed
}

fn parse_seed(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_parsing_trims_and_rejects_garbage() {
        assert_eq!(parse_seed(" 42 "), Some(42));
        assert_eq!(parse_seed("-1"), None);
        assert_eq!(parse_seed("teddy"), None);
    }

    #[test]
    fn missing_tuning_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let tuning = load_tuning_or_default(&dir.path().join(TUNING_FILE_NAME));
        assert_eq!(tuning, GameTuning::default());
    }

    #[test]
    fn malformed_tuning_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(TUNING_FILE_NAME);
        std::fs::write(&path, "{ \"world_size\": -3 }").expect("write");
        assert_eq!(load_tuning_or_default(&path), GameTuning::default());
    }

    #[test]
    fn partial_enemy_block_is_loaded_not_discarded() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(TUNING_FILE_NAME);
        std::fs::write(&path, "{ \"teddy\": { \"reach\": 5.0 } }").expect("write");
        assert_ne!(load_tuning_or_default(&path), GameTuning::default());
    }
}
