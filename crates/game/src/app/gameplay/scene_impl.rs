pub(crate) struct GameplayScene {
    state: GameState,
    systems_host: GameplaySystemsHost,
    presenter: HudPresenter,
    system_order_text: String,
    ticks: u64,
}

impl GameplayScene {
    fn new(tuning: GameTuning, rng: ChaCha8Rng) -> Self {
        Self {
            state: GameState::new(tuning, rng),
            systems_host: GameplaySystemsHost::default(),
            presenter: HudPresenter::default(),
            system_order_text: gameplay_system_order_text(),
            ticks: 0,
        }
    }

    pub(crate) fn hud(&self) -> &HudSnapshot {
        &self.presenter.snapshot
    }

    fn refresh_presentation(&mut self) {
        let state = &self.state;
        let presenter = &mut self.presenter;
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

impl Scene for GameplayScene {
    fn load(&mut self) {
        self.presenter.notifications.clear();
        self.ticks = 0;
        self.refresh_presentation();
        info!(
            enemies = self.state.enemies.len(),
            safe_zones = self.state.safe_zones.len(),
            sys = %self.system_order_text,
            "scene_loaded"
        );
    }

    fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        if self.state.game_over {
            return SceneCommand::Halt;
        }
        self.systems_host.run_once_per_tick(
            fixed_dt_seconds,
            input,
            &mut self.state,
            &mut self.presenter,
        );
        self.ticks = self.ticks.saturating_add(1);
        let counts = self.state.events.last_tick_counts();
        if counts.total > 0 {
            debug!(
                tick = self.ticks,
                total = counts.total,
                enemy_damaged = counts.enemy_damaged,
                enemy_killed = counts.enemy_killed,
                player_damaged = counts.player_damaged,
                loot = counts.loot,
                level_up = counts.level_up,
                "tick_events"
            );
        }
        if self.state.game_over {
            SceneCommand::Halt
        } else {
            SceneCommand::Continue
        }
    }

    fn render(&mut self, viewport: Viewport) {
        if self.presenter.viewport != viewport {
            self.presenter.viewport = viewport;
            self.refresh_presentation();
        }
    }

    fn unload(&mut self) {
        let hud = &self.presenter.snapshot;
        info!(
            ticks = self.ticks,
            level = self.state.player.level,
            health = %hud.health_text,
            xp = %hud.xp_text,
            items = hud.inventory.len(),
            game_over = self.state.game_over,
            "scene_unloaded"
        );
        match serde_json::to_string(hud) {
            Ok(json) => debug!(hud = %json, "final_hud"),
            Err(error) => warn!(error = %error, "final_hud_serialize_failed"),
        }
    }

    fn view(&self) -> SceneView {
        SceneView {
            player_position: self.state.player.position,
            player_yaw: self.state.player.yaw,
            hostile_positions: self.state.hostile_positions(),
            halted: self.state.game_over,
        }
    }

    fn entity_count(&self) -> usize {
        1 + self.state.enemies.len() + self.state.safe_zones.len()
    }

    fn debug_title(&self) -> Option<String> {
        Some(format!(
            "HP {} | enemies {}",
            self.presenter.snapshot.health_text,
            self.state.enemies.iter_alive().count()
        ))
    }
}
