#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
enum EnemyKind {
    Teddy,
    Boss,
}

impl EnemyKind {
    fn as_token(self) -> &'static str {
        match self {
            Self::Teddy => "teddy",
            Self::Boss => "boss",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Enemy {
    id: EntityId,
    kind: EnemyKind,
    position: Vec3,
    health: f32,
    max_health: f32,
    attack_anim_remaining: f32,
    alive: bool,
}

impl Enemy {
    fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health).clamp(0.0, 1.0)
    }
}

/// Enemy arena keyed by stable ids. Dead enemies stay in place with
/// `alive == false` until the next prune; they are never revived.
#[derive(Debug, Default)]
struct EnemyRoster {
    allocator: EntityIdAllocator,
    enemies: Vec<Enemy>,
}

impl EnemyRoster {
    fn spawn(&mut self, kind: EnemyKind, position: Vec3, max_health: f32) -> EntityId {
        let id = self.allocator.allocate();
        self.enemies.push(Enemy {
            id,
            kind,
            position,
            health: max_health,
            max_health,
            attack_anim_remaining: 0.0,
            alive: true,
        });
        id
    }

    fn get(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|enemy| enemy.id == id)
    }

    fn get_mut(&mut self, id: EntityId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|enemy| enemy.id == id)
    }

    fn ids(&self) -> Vec<EntityId> {
        self.enemies.iter().map(|enemy| enemy.id).collect()
    }

    fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter()
    }

    fn iter_alive(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|enemy| enemy.alive)
    }

    fn len(&self) -> usize {
        self.enemies.len()
    }

    fn count_of(&self, kind: EnemyKind) -> usize {
        self.enemies.iter().filter(|enemy| enemy.kind == kind).count()
    }

    fn prune_dead(&mut self) -> usize {
        let before = self.enemies.len();
        self.enemies.retain(|enemy| enemy.alive);
        before - self.enemies.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Player {
    position: Vec3,
    yaw: f32,
    pitch: f32,
    vertical_velocity: f32,
    grounded: bool,
    health: f32,
    max_health: u32,
    level: u32,
    xp: u32,
    xp_to_next: u32,
    base_attack: u32,
    swing_remaining: f32,
}

impl Player {
    fn spawn(tuning: &GameTuning) -> Self {
        Self {
            position: ground_point(0.0, 0.0),
            yaw: 0.0,
            pitch: 0.0,
            vertical_velocity: 0.0,
            grounded: true,
            health: tuning.player.start_max_health as f32,
            max_health: tuning.player.start_max_health,
            level: 1,
            xp: 0,
            xp_to_next: tuning.progression.start_xp_to_next,
            base_attack: tuning.player.start_attack,
            swing_remaining: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct SafeZone {
    id: u32,
    center: Vec3,
    radius: f32,
}

impl SafeZone {
    fn contains(&self, point: Vec3) -> bool {
        self.center.horizontal_distance(point) < self.radius
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
enum ItemSlot {
    Hat,
    Shirt,
    Pants,
    Weapon,
}

impl ItemSlot {
    const ALL: [ItemSlot; 4] = [Self::Hat, Self::Shirt, Self::Pants, Self::Weapon];

    fn index(self) -> usize {
        match self {
            Self::Hat => 0,
            Self::Shirt => 1,
            Self::Pants => 2,
            Self::Weapon => 3,
        }
    }

    fn as_token(self) -> &'static str {
        match self {
            Self::Hat => "hat",
            Self::Shirt => "shirt",
            Self::Pants => "pants",
            Self::Weapon => "weapon",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
struct StatBonus {
    health: u32,
    defense: u32,
    attack: u32,
}

impl StatBonus {
    const fn new(health: u32, defense: u32, attack: u32) -> Self {
        Self {
            health,
            defense,
            attack,
        }
    }

    fn plus(self, other: StatBonus) -> Self {
        Self {
            health: self.health.saturating_add(other.health),
            defense: self.defense.saturating_add(other.defense),
            attack: self.attack.saturating_add(other.attack),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ItemTemplate {
    slot: ItemSlot,
    name: &'static str,
    color: u32,
    base: StatBonus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct InventoryItem {
    slot: ItemSlot,
    name: &'static str,
    color: u32,
    bonus: StatBonus,
    level: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AcquireOutcome {
    New { index: usize },
    Leveled { index: usize, level: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
enum EquipError {
    #[error("no inventory entry at index {index} (inventory holds {inventory_len})")]
    UnknownInventoryIndex { index: usize, inventory_len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum GameplayEvent {
    EnemyDamaged {
        enemy_id: EntityId,
        amount: f32,
    },
    EnemyKilled {
        enemy_id: EntityId,
        kind: EnemyKind,
    },
    PlayerDamaged {
        amount: f32,
    },
    LootFound {
        inventory_index: usize,
    },
    LootLeveled {
        inventory_index: usize,
        level: u32,
    },
    ItemEquipped {
        slot: ItemSlot,
        inventory_index: usize,
    },
    LevelUp {
        level: u32,
    },
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GameplayEventKind {
    EnemyDamaged,
    EnemyKilled,
    PlayerDamaged,
    LootFound,
    LootLeveled,
    ItemEquipped,
    LevelUp,
    GameOver,
}

impl GameplayEvent {
    fn kind(self) -> GameplayEventKind {
        match self {
            Self::EnemyDamaged { .. } => GameplayEventKind::EnemyDamaged,
            Self::EnemyKilled { .. } => GameplayEventKind::EnemyKilled,
            Self::PlayerDamaged { .. } => GameplayEventKind::PlayerDamaged,
            Self::LootFound { .. } => GameplayEventKind::LootFound,
            Self::LootLeveled { .. } => GameplayEventKind::LootLeveled,
            Self::ItemEquipped { .. } => GameplayEventKind::ItemEquipped,
            Self::LevelUp { .. } => GameplayEventKind::LevelUp,
            Self::GameOver => GameplayEventKind::GameOver,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct GameplayEventCounts {
    total: u32,
    enemy_damaged: u32,
    enemy_killed: u32,
    player_damaged: u32,
    loot: u32,
    level_up: u32,
}

impl GameplayEventCounts {
    fn record(&mut self, kind: GameplayEventKind) {
        self.total = self.total.saturating_add(1);
        match kind {
            GameplayEventKind::EnemyDamaged => {
                self.enemy_damaged = self.enemy_damaged.saturating_add(1)
            }
            GameplayEventKind::EnemyKilled => {
                self.enemy_killed = self.enemy_killed.saturating_add(1)
            }
            GameplayEventKind::PlayerDamaged => {
                self.player_damaged = self.player_damaged.saturating_add(1)
            }
            GameplayEventKind::LootFound | GameplayEventKind::LootLeveled => {
                self.loot = self.loot.saturating_add(1)
            }
            GameplayEventKind::LevelUp => self.level_up = self.level_up.saturating_add(1),
            GameplayEventKind::ItemEquipped | GameplayEventKind::GameOver => {}
        }
    }
}

/// Side effects raised during a tick, drained by the derived-UI pass.
#[derive(Debug, Default)]
struct GameplayEventBus {
    current_tick_events: Vec<GameplayEvent>,
    last_tick_counts: GameplayEventCounts,
}

impl GameplayEventBus {
    fn emit(&mut self, event: GameplayEvent) {
        self.current_tick_events.push(event);
    }

    fn iter_emitted_so_far(&self) -> impl Iterator<Item = &GameplayEvent> {
        self.current_tick_events.iter()
    }

    fn finish_tick_rollover(&mut self) {
        let mut counts = GameplayEventCounts::default();
        for event in &self.current_tick_events {
            counts.record(event.kind());
        }
        self.last_tick_counts = counts;
        self.current_tick_events.clear();
    }

    fn last_tick_counts(&self) -> GameplayEventCounts {
        self.last_tick_counts
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum NotificationKind {
    LootFound,
    LootLeveled,
    LevelUp,
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Notification {
    kind: NotificationKind,
    message: String,
    /// `None` keeps the notice until the game ends.
    remaining_seconds: Option<f32>,
}

#[derive(Debug, Default)]
struct NotificationFeed {
    entries: Vec<Notification>,
}

impl NotificationFeed {
    fn push(&mut self, kind: NotificationKind, message: String, ttl_seconds: Option<f32>) {
        self.entries.push(Notification {
            kind,
            message,
            remaining_seconds: ttl_seconds,
        });
    }

    fn tick(&mut self, fixed_dt_seconds: f32) {
        for entry in &mut self.entries {
            if let Some(remaining) = entry.remaining_seconds.as_mut() {
                *remaining -= fixed_dt_seconds;
            }
        }
        self.entries
            .retain(|entry| entry.remaining_seconds.map_or(true, |remaining| remaining > 0.0));
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn entries(&self) -> &[Notification] {
        &self.entries
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum HealthBarBand {
    Healthy,
    Wounded,
    Critical,
}

impl HealthBarBand {
    fn from_fraction(fraction: f32) -> Self {
        if fraction > 0.5 {
            Self::Healthy
        } else if fraction > 0.2 {
            Self::Wounded
        } else {
            Self::Critical
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct EnemyHealthBar {
    enemy_id: EntityId,
    kind: EnemyKind,
    screen_x: f32,
    screen_y: f32,
    fraction: f32,
    band: HealthBarBand,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct InventoryEntryView {
    index: usize,
    slot: ItemSlot,
    name: &'static str,
    level: u32,
    stats: String,
    equipped: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct EquipmentSlotView {
    slot: ItemSlot,
    item: Option<String>,
}

/// Everything the UI collaborator reads. Rebuilt every tick from simulation
/// state, never written back.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub(crate) struct HudSnapshot {
    health_fraction: f32,
    health_text: String,
    xp_fraction: f32,
    xp_text: String,
    level: u32,
    resting: bool,
    game_over: bool,
    swing_progress: Option<f32>,
    notifications: Vec<Notification>,
    inventory: Vec<InventoryEntryView>,
    equipment: Vec<EquipmentSlotView>,
    enemy_health_bars: Vec<EnemyHealthBar>,
}

impl HudSnapshot {
    pub(crate) fn health_text(&self) -> &str {
        &self.health_text
    }

    pub(crate) fn xp_text(&self) -> &str {
        &self.xp_text
    }

    pub(crate) fn game_over(&self) -> bool {
        self.game_over
    }
}
