#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GameplaySystemId {
    InputIntent,
    PlayerMovement,
    EnemyAi,
    SafeZones,
    DerivedUi,
    Timers,
}

impl GameplaySystemId {
    fn name(self) -> &'static str {
        match self {
            Self::InputIntent => "InputIntent",
            Self::PlayerMovement => "PlayerMovement",
            Self::EnemyAi => "EnemyAi",
            Self::SafeZones => "SafeZones",
            Self::DerivedUi => "DerivedUi",
            Self::Timers => "Timers",
        }
    }
}

const GAMEPLAY_SYSTEM_ORDER: [GameplaySystemId; 6] = [
    GameplaySystemId::InputIntent,
    GameplaySystemId::PlayerMovement,
    GameplaySystemId::EnemyAi,
    GameplaySystemId::SafeZones,
    GameplaySystemId::DerivedUi,
    GameplaySystemId::Timers,
];

fn gameplay_system_order_text() -> String {
    GAMEPLAY_SYSTEM_ORDER
        .iter()
        .map(|system_id| system_id.name())
        .collect::<Vec<_>>()
        .join(">")
}

/// Read-side state owned by the scene: the camera the projection uses, the
/// notification feed, and the snapshot handed to the UI.
#[derive(Debug, Default)]
struct HudPresenter {
    camera: ChaseCamera,
    viewport: Viewport,
    notifications: NotificationFeed,
    snapshot: HudSnapshot,
}

struct GameplaySystemContext<'a> {
    fixed_dt_seconds: f32,
    input: &'a InputSnapshot,
    state: &'a mut GameState,
    presenter: &'a mut HudPresenter,
}

#[derive(Default)]
struct GameplaySystemsHost {
    last_tick_order: Vec<GameplaySystemId>,
}

impl GameplaySystemsHost {
    fn run_once_per_tick(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        state: &mut GameState,
        presenter: &mut HudPresenter,
    ) {
        self.last_tick_order.clear();
        let mut context = GameplaySystemContext {
            fixed_dt_seconds,
            input,
            state,
            presenter,
        };
        for system_id in GAMEPLAY_SYSTEM_ORDER {
            self.last_tick_order.push(system_id);
            self.run_system(system_id, &mut context);
        }
        context.state.events.finish_tick_rollover();
    }

    fn run_system(&mut self, system_id: GameplaySystemId, context: &mut GameplaySystemContext<'_>) {
        match system_id {
            GameplaySystemId::InputIntent => Self::input_intent_system(context),
            GameplaySystemId::PlayerMovement => context
                .state
                .step_player_movement(context.fixed_dt_seconds, context.input),
            GameplaySystemId::EnemyAi => context.state.run_enemy_ai(context.fixed_dt_seconds),
            GameplaySystemId::SafeZones => context.state.apply_safe_zone_healing(),
            GameplaySystemId::DerivedUi => Self::derived_ui_system(context),
            GameplaySystemId::Timers => context.state.advance_timers(context.fixed_dt_seconds),
        }
    }

    fn input_intent_system(context: &mut GameplaySystemContext<'_>) {
        let state = &mut *context.state;
        let input = context.input;
        state.advance_swing(context.fixed_dt_seconds);
        if state.game_over {
            return;
        }
        state.apply_look(input, context.fixed_dt_seconds);
        if input.jump_pressed() {
            state.try_jump();
        }
        if input.attack_pressed() {
            let hits = state.attack();
            debug!(hits, "player_attacked");
        }
        if let Some(inventory_index) = input.equip_request() {
            if let Err(error) = state.equip(inventory_index) {
                warn!(error = %error, "equip_rejected");
            }
        }
    }

    fn derived_ui_system(context: &mut GameplaySystemContext<'_>) {
        let state = &*context.state;
        let presenter = &mut *context.presenter;
        presenter.notifications.tick(context.fixed_dt_seconds);
        for event in state.events.iter_emitted_so_far() {
            if let Some((kind, message, ttl)) = notification_for_event(state, *event) {
                presenter.notifications.push(kind, message, ttl);
            }
        }
        presenter
            .camera
            .follow(state.player.position, state.player.yaw, state.player.pitch);
        presenter.snapshot = build_hud_snapshot(
            state,
            &presenter.camera,
            presenter.viewport,
            presenter.notifications.entries(),
        );
    }
}

fn notification_for_event(
    state: &GameState,
    event: GameplayEvent,
) -> Option<(NotificationKind, String, Option<f32>)> {
    match event {
        GameplayEvent::LootFound { inventory_index } => {
            let item = state.inventory.get(inventory_index)?;
            Some((
                NotificationKind::LootFound,
                format!("Found new item: {}!", item.name),
                Some(LOOT_NOTICE_TTL_SECONDS),
            ))
        }
        GameplayEvent::LootLeveled {
            inventory_index,
            level,
        } => {
            let item = state.inventory.get(inventory_index)?;
            Some((
                NotificationKind::LootLeveled,
                format!("{} leveled up! Now Lv.{level}", item.name),
                Some(LOOT_NOTICE_TTL_SECONDS),
            ))
        }
        GameplayEvent::LevelUp { level } => Some((
            NotificationKind::LevelUp,
            format!("Level Up! Now level {level}"),
            Some(LEVEL_UP_NOTICE_TTL_SECONDS),
        )),
        GameplayEvent::GameOver => Some((
            NotificationKind::GameOver,
            "Game Over".to_string(),
            None,
        )),
        GameplayEvent::EnemyDamaged { .. }
        | GameplayEvent::EnemyKilled { .. }
        | GameplayEvent::PlayerDamaged { .. }
        | GameplayEvent::ItemEquipped { .. } => None,
    }
}

fn build_hud_snapshot(
    state: &GameState,
    camera: &ChaseCamera,
    viewport: Viewport,
    notifications: &[Notification],
) -> HudSnapshot {
    let player = &state.player;
    let max_health = state.effective_max_health();
    let health_fraction = if max_health == 0 {
        0.0
    } else {
        (player.health / max_health as f32).clamp(0.0, 1.0)
    };
    let xp_fraction = if player.xp_to_next == 0 {
        0.0
    } else {
        (player.xp as f32 / player.xp_to_next as f32).clamp(0.0, 1.0)
    };

    let inventory = state
        .inventory
        .iter()
        .enumerate()
        .map(|(index, item)| InventoryEntryView {
            index,
            slot: item.slot,
            name: item.name,
            level: item.level,
            stats: item.stats_text(),
            equipped: state.equipment.is_equipped(index),
        })
        .collect();
    let equipment = ItemSlot::ALL
        .iter()
        .map(|slot| EquipmentSlotView {
            slot: *slot,
            item: state
                .equipment
                .equipped(*slot)
                .and_then(|index| state.inventory.get(index))
                .map(|item| item.name.to_string()),
        })
        .collect();
    let enemy_health_bars = state
        .enemies
        .iter_alive()
        .filter_map(|enemy| {
            let anchor = enemy.position + Vec3::UP * HEALTH_BAR_ANCHOR_HEIGHT;
            let (screen_x, screen_y) = camera.world_to_screen(anchor, viewport)?;
            let fraction = enemy.health_fraction();
            Some(EnemyHealthBar {
                enemy_id: enemy.id,
                kind: enemy.kind,
                screen_x,
                screen_y,
                fraction,
                band: HealthBarBand::from_fraction(fraction),
            })
        })
        .collect();

    HudSnapshot {
        health_fraction,
        health_text: format!(
            "{} / {} | Lvl: {}",
            player.health.round() as u32,
            max_health,
            player.level
        ),
        xp_fraction,
        xp_text: format!("XP: {} / {}", player.xp, player.xp_to_next),
        level: player.level,
        resting: state.resting,
        game_over: state.game_over,
        swing_progress: state.swing_progress(),
        notifications: notifications.to_vec(),
        inventory,
        equipment,
        enemy_health_bars,
    }
}
