#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameTuning {
    world_size: f32,
    teddy_population: usize,
    boss_spawn: [f32; 2],
    safe_zone_count: usize,
    safe_zone_radius: f32,
    safe_zone_heal_per_tick: f32,
    respawn_interval_seconds: f32,
    safe_zone_relocation_interval_seconds: f32,
    /// When off, equipped items are cosmetic and only show in the inventory.
    equipment_stat_bonuses: bool,
    player: PlayerTuning,
    progression: ProgressionTuning,
    #[serde(deserialize_with = "teddy_with_overrides")]
    teddy: EnemyTuning,
    #[serde(deserialize_with = "boss_with_overrides")]
    boss: EnemyTuning,
}

impl Default for GameTuning {
    fn default() -> Self {
        Self {
            world_size: 400.0,
            teddy_population: 8,
            boss_spawn: [140.0, 140.0],
            safe_zone_count: 3,
            safe_zone_radius: 7.0,
            safe_zone_heal_per_tick: 0.6,
            respawn_interval_seconds: 2.5,
            safe_zone_relocation_interval_seconds: 60.0,
            equipment_stat_bonuses: false,
            player: PlayerTuning::default(),
            progression: ProgressionTuning::default(),
            teddy: EnemyTuning::teddy(),
            boss: EnemyTuning::boss(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PlayerTuning {
    start_max_health: u32,
    start_attack: u32,
    move_speed: f32,
    jump_impulse: f32,
    gravity: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            start_max_health: 100,
            start_attack: 18,
            move_speed: 11.0,
            jump_impulse: 14.4,
            gravity: 37.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ProgressionTuning {
    start_xp_to_next: u32,
    max_health_growth: f32,
    attack_growth: f32,
    xp_threshold_growth: f32,
}

impl Default for ProgressionTuning {
    fn default() -> Self {
        Self {
            start_xp_to_next: 60,
            max_health_growth: 1.18,
            attack_growth: 1.13,
            xp_threshold_growth: 1.33,
        }
    }
}

/// Per-kind enemy numbers. `reach` is how close the player must stand to hit
/// this kind; `attack_range` is how close this kind must stand to hit back.
#[derive(Debug, Clone, PartialEq, Serialize)]
struct EnemyTuning {
    max_health: f32,
    move_speed: f32,
    pursuit_min_distance: f32,
    pursuit_max_distance: Option<f32>,
    reach: f32,
    bonus_damage_taken: u32,
    attack_range: f32,
    hit_chance_per_tick: f64,
    hit_damage: u32,
    xp_reward: u32,
    drop_chance: f64,
}

impl EnemyTuning {
    fn teddy() -> Self {
        Self {
            max_health: 60.0,
            move_speed: 6.0,
            pursuit_min_distance: 0.0,
            pursuit_max_distance: None,
            reach: 4.5,
            bonus_damage_taken: 0,
            attack_range: 3.0,
            hit_chance_per_tick: 0.012,
            hit_damage: 6,
            xp_reward: 28,
            drop_chance: 0.25,
        }
    }

    fn boss() -> Self {
        Self {
            max_health: 180.0,
            move_speed: 7.0,
            pursuit_min_distance: 5.0,
            pursuit_max_distance: Some(32.0),
            reach: 6.0,
            bonus_damage_taken: 4,
            attack_range: 5.0,
            hit_chance_per_tick: 0.018,
            hit_damage: 13,
            xp_reward: 80,
            drop_chance: 0.25,
        }
    }
}

/// An enemy block as written in the tuning file. Absent fields keep the
/// defaults of the kind the block belongs to.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct EnemyTuningOverrides {
    max_health: Option<f32>,
    move_speed: Option<f32>,
    pursuit_min_distance: Option<f32>,
    #[serde(default, deserialize_with = "present_nullable")]
    pursuit_max_distance: Option<Option<f32>>,
    reach: Option<f32>,
    bonus_damage_taken: Option<u32>,
    attack_range: Option<f32>,
    hit_chance_per_tick: Option<f64>,
    hit_damage: Option<u32>,
    xp_reward: Option<u32>,
    drop_chance: Option<f64>,
}

impl EnemyTuningOverrides {
    fn apply_to(self, base: EnemyTuning) -> EnemyTuning {
        EnemyTuning {
            max_health: self.max_health.unwrap_or(base.max_health),
            move_speed: self.move_speed.unwrap_or(base.move_speed),
            pursuit_min_distance: self
                .pursuit_min_distance
                .unwrap_or(base.pursuit_min_distance),
            pursuit_max_distance: self
                .pursuit_max_distance
                .unwrap_or(base.pursuit_max_distance),
            reach: self.reach.unwrap_or(base.reach),
            bonus_damage_taken: self.bonus_damage_taken.unwrap_or(base.bonus_damage_taken),
            attack_range: self.attack_range.unwrap_or(base.attack_range),
            hit_chance_per_tick: self.hit_chance_per_tick.unwrap_or(base.hit_chance_per_tick),
            hit_damage: self.hit_damage.unwrap_or(base.hit_damage),
            xp_reward: self.xp_reward.unwrap_or(base.xp_reward),
            drop_chance: self.drop_chance.unwrap_or(base.drop_chance),
        }
    }
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field (`None`).
fn present_nullable<'de, D>(deserializer: D) -> Result<Option<Option<f32>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<f32>::deserialize(deserializer).map(Some)
}

fn teddy_with_overrides<'de, D>(deserializer: D) -> Result<EnemyTuning, D::Error>
where
    D: serde::Deserializer<'de>,
{
    EnemyTuningOverrides::deserialize(deserializer)
        .map(|overrides| overrides.apply_to(EnemyTuning::teddy()))
}

fn boss_with_overrides<'de, D>(deserializer: D) -> Result<EnemyTuning, D::Error>
where
    D: serde::Deserializer<'de>,
{
    EnemyTuningOverrides::deserialize(deserializer)
        .map(|overrides| overrides.apply_to(EnemyTuning::boss()))
}

#[derive(Debug, Error)]
pub(crate) enum TuningError {
    #[error("failed to read tuning file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse tuning file {path} at {field_path}: {message}")]
    Parse {
        path: PathBuf,
        field_path: String,
        message: String,
    },
    #[error("tuning validation failed at {field_path}: {message}")]
    Invalid { field_path: String, message: String },
}

impl GameTuning {
    /// `Ok(None)` when the file does not exist; defaults then apply.
    pub(crate) fn load(path: &Path) -> Result<Option<Self>, TuningError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(TuningError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::parse(path, &raw).map(Some)
    }

    fn parse(path: &Path, raw: &str) -> Result<Self, TuningError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let tuning = serde_path_to_error::deserialize::<_, GameTuning>(&mut deserializer)
            .map_err(|error| {
                let field_path = error.path().to_string();
                TuningError::Parse {
                    path: path.to_path_buf(),
                    field_path: if field_path.is_empty() {
                        ".".to_string()
                    } else {
                        field_path
                    },
                    message: error.into_inner().to_string(),
                }
            })?;
        tuning.validate()?;
        Ok(tuning)
    }

    fn validate(&self) -> Result<(), TuningError> {
        Self::require_positive("world_size", self.world_size)?;
        if self.spawn_half_extent() <= 0.0 {
            return Err(Self::invalid(
                "world_size",
                format!("spawn area of world size {} collapses to a point", self.world_size),
            ));
        }
        Self::require_positive("safe_zone_radius", self.safe_zone_radius)?;
        Self::require_positive("respawn_interval_seconds", self.respawn_interval_seconds)?;
        Self::require_positive(
            "safe_zone_relocation_interval_seconds",
            self.safe_zone_relocation_interval_seconds,
        )?;
        Self::require_non_negative("safe_zone_heal_per_tick", self.safe_zone_heal_per_tick)?;
        if self.player.start_max_health == 0 {
            return Err(Self::invalid("player.start_max_health", "expected at least 1"));
        }
        Self::require_positive("player.move_speed", self.player.move_speed)?;
        Self::require_positive("player.gravity", self.player.gravity)?;
        Self::require_non_negative("player.jump_impulse", self.player.jump_impulse)?;
        if self.progression.start_xp_to_next == 0 {
            return Err(Self::invalid(
                "progression.start_xp_to_next",
                "expected at least 1",
            ));
        }
        for (field_path, factor) in [
            ("progression.max_health_growth", self.progression.max_health_growth),
            ("progression.attack_growth", self.progression.attack_growth),
            ("progression.xp_threshold_growth", self.progression.xp_threshold_growth),
        ] {
            if !factor.is_finite() || factor < 1.0 {
                return Err(Self::invalid(field_path, "expected a growth factor >= 1.0"));
            }
        }
        Self::validate_enemy("teddy", &self.teddy)?;
        Self::validate_enemy("boss", &self.boss)?;
        Ok(())
    }

    fn validate_enemy(prefix: &str, enemy: &EnemyTuning) -> Result<(), TuningError> {
        Self::require_positive(&format!("{prefix}.max_health"), enemy.max_health)?;
        Self::require_positive(&format!("{prefix}.reach"), enemy.reach)?;
        for (field, value) in [
            ("move_speed", enemy.move_speed),
            ("attack_range", enemy.attack_range),
            ("pursuit_min_distance", enemy.pursuit_min_distance),
        ] {
            Self::require_non_negative(&format!("{prefix}.{field}"), value)?;
        }
        for (field, chance) in [
            ("hit_chance_per_tick", enemy.hit_chance_per_tick),
            ("drop_chance", enemy.drop_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(Self::invalid(
                    &format!("{prefix}.{field}"),
                    format!("expected a probability in [0, 1], got {chance}"),
                ));
            }
        }
        if let Some(max_distance) = enemy.pursuit_max_distance {
            Self::require_non_negative(&format!("{prefix}.pursuit_max_distance"), max_distance)?;
            if max_distance < enemy.pursuit_min_distance {
                return Err(Self::invalid(
                    &format!("{prefix}.pursuit_max_distance"),
                    "expected pursuit_max_distance >= pursuit_min_distance",
                ));
            }
        }
        Ok(())
    }

    fn require_positive(field_path: &str, value: f32) -> Result<(), TuningError> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(Self::invalid(
                field_path,
                format!("expected a finite positive number, got {value}"),
            ))
        }
    }

    fn require_non_negative(field_path: &str, value: f32) -> Result<(), TuningError> {
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(Self::invalid(
                field_path,
                format!("expected a finite non-negative number, got {value}"),
            ))
        }
    }

    fn invalid(field_path: &str, message: impl Into<String>) -> TuningError {
        TuningError::Invalid {
            field_path: field_path.to_string(),
            message: message.into(),
        }
    }

    fn spawn_half_extent(&self) -> f32 {
        self.world_size * 0.4
    }

    fn enemy(&self, kind: EnemyKind) -> &EnemyTuning {
        match kind {
            EnemyKind::Teddy => &self.teddy,
            EnemyKind::Boss => &self.boss,
        }
    }
}
