use std::fs;
use std::path::{Path, PathBuf};

use engine::{
    ChaseCamera, EntityId, EntityIdAllocator, InputSnapshot, Scene, SceneCommand, SceneView, Vec3,
    Viewport,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

pub(crate) const TUNING_FILE_NAME: &str = "tuning.json";
pub(crate) const SEED_ENV_VAR: &str = "TEDDY_SEED";
const SWING_DURATION_SECONDS: f32 = 0.5;
const ENEMY_ATTACK_ANIM_SECONDS: f32 = 0.33;
const LOOT_NOTICE_TTL_SECONDS: f32 = 3.4;
const LEVEL_UP_NOTICE_TTL_SECONDS: f32 = 1.2;
const HEALTH_BAR_ANCHOR_HEIGHT: f32 = 7.0;
const LOOK_RADIANS_PER_UNIT: f32 = 0.002;
const TURN_RADIANS_PER_SECOND: f32 = 2.5;

include!("tuning.rs");
include!("terrain.rs");
include!("types.rs");
include!("loot.rs");
include!("systems.rs");
include!("scene_state.rs");
include!("scene_impl.rs");
include!("util.rs");

/// `seed` pins the random stream; `None` draws it from OS entropy.
pub(crate) fn build_scene(tuning: GameTuning, seed: Option<u64>) -> GameplayScene {
    GameplayScene::new(tuning, seeded_rng(seed))
}
